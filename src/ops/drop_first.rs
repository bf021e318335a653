use crate::{
  publisher::Publisher,
  subscriber::{Completion, Demand, Subscriber},
  subscription::BoxedSubscription,
};

/// DropFirst operator: skips a fixed number of leading values.
#[derive(Clone)]
pub struct DropFirst<S> {
  pub source: S,
  pub count: usize,
}

pub struct DropFirstSubscriber<O> {
  downstream: O,
  remaining: usize,
}

impl<O, Item, Err> Subscriber<Item, Err> for DropFirstSubscriber<O>
where
  O: Subscriber<Item, Err>,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.downstream.receive_subscription(subscription)
  }

  fn receive(&mut self, value: Item) -> Demand {
    if self.remaining > 0 {
      self.remaining -= 1;
      Demand::max(1)
    } else {
      self.downstream.receive(value)
    }
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    self.downstream.receive_completion(completion)
  }
}

impl<S: Publisher> Publisher for DropFirst<S> {
  type Output = S::Output;
  type Failure = S::Failure;

  fn subscribe<O>(self, subscriber: O)
  where
    O: Subscriber<S::Output, S::Failure> + 'static,
  {
    self
      .source
      .subscribe(DropFirstSubscriber { downstream: subscriber, remaining: self.count })
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxcombine_macro::test]
  fn skips_leading() {
    let values = Rc::new(RefCell::new(vec![]));
    let c_values = values.clone();
    let _c = from_iter(1..=10)
      .drop_first(8)
      .sink_value(move |v| c_values.borrow_mut().push(v));
    assert_eq!(*values.borrow(), vec![9, 10]);
  }

  #[rxcombine_macro::test]
  fn count_larger_than_source() {
    let values = Rc::new(RefCell::new(vec![]));
    let c_values = values.clone();
    let done = Rc::new(RefCell::new(false));
    let c_done = done.clone();
    let _c = from_iter(1..=3)
      .drop_first(5)
      .sink(move |_| *c_done.borrow_mut() = true, move |v| c_values.borrow_mut().push(v));
    assert!(values.borrow().is_empty());
    assert!(*done.borrow());
  }
}
