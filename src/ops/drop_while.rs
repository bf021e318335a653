use crate::{
  publisher::Publisher,
  subscriber::{Completion, Demand, Subscriber},
  subscription::BoxedSubscription,
};

/// DropWhile operator: skips values until the predicate first returns
/// `false`, then passes everything.
#[derive(Clone)]
pub struct DropWhile<S, F> {
  pub source: S,
  pub predicate: F,
}

pub struct DropWhileSubscriber<O, F> {
  downstream: O,
  predicate: F,
  dropping: bool,
}

impl<O, F, Item, Err> Subscriber<Item, Err> for DropWhileSubscriber<O, F>
where
  O: Subscriber<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.downstream.receive_subscription(subscription)
  }

  fn receive(&mut self, value: Item) -> Demand {
    if self.dropping {
      if (self.predicate)(&value) {
        return Demand::max(1);
      }
      self.dropping = false;
    }
    self.downstream.receive(value)
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    self.downstream.receive_completion(completion)
  }
}

impl<S, F> Publisher for DropWhile<S, F>
where
  S: Publisher,
  F: FnMut(&S::Output) -> bool + 'static,
{
  type Output = S::Output;
  type Failure = S::Failure;

  fn subscribe<O>(self, subscriber: O)
  where
    O: Subscriber<S::Output, S::Failure> + 'static,
  {
    let DropWhile { source, predicate } = self;
    source.subscribe(DropWhileSubscriber { downstream: subscriber, predicate, dropping: true })
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxcombine_macro::test]
  fn passes_everything_after_first_failure() {
    let values = Rc::new(RefCell::new(vec![]));
    let c_values = values.clone();
    let _c = from_iter([-1, -5, 0, 7, -4, 3])
      .drop_while(|v| *v < 0)
      .sink_value(move |v| c_values.borrow_mut().push(v));
    assert_eq!(*values.borrow(), vec![0, 7, -4, 3]);
  }
}
