use std::{convert::Infallible, marker::PhantomData};

use crate::{
  publisher::Publisher,
  subscriber::{Completion, Demand, Subscriber},
  subscription::{BoxedSubscription, Subscription},
};

/// IgnoreOutput operator: requests everything, drops every value and keeps
/// only the terminal signal.
#[derive(Clone)]
pub struct IgnoreOutput<S> {
  pub source: S,
}

pub struct IgnoreOutputSubscriber<O, Item> {
  downstream: O,
  _hint: PhantomData<fn(Item)>,
}

impl<O, Item, Err> Subscriber<Item, Err> for IgnoreOutputSubscriber<O, Item>
where
  O: Subscriber<Infallible, Err>,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.downstream.receive_subscription(subscription.clone());
    subscription.request(Demand::Unlimited);
  }

  fn receive(&mut self, _: Item) -> Demand { Demand::NONE }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    self.downstream.receive_completion(completion)
  }
}

impl<S: Publisher> Publisher for IgnoreOutput<S> {
  type Output = Infallible;
  type Failure = S::Failure;

  fn subscribe<O>(self, subscriber: O)
  where
    O: Subscriber<Infallible, S::Failure> + 'static,
  {
    self
      .source
      .subscribe(IgnoreOutputSubscriber { downstream: subscriber, _hint: PhantomData })
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxcombine_macro::test]
  fn only_completion() {
    let done = Rc::new(RefCell::new(false));
    let c_done = done.clone();
    let _c = from_iter(1..=10_000)
      .ignore_output()
      .sink(move |c| *c_done.borrow_mut() = c.is_finished(), |_| unreachable!());
    assert!(*done.borrow());
  }

  #[rxcombine_macro::test]
  fn failure_forwarded() {
    let completion = Rc::new(RefCell::new(None));
    let c_completion = completion.clone();
    let _c = Fail::<i32, _>::new(3)
      .ignore_output()
      .sink(move |c| *c_completion.borrow_mut() = Some(c), |_| {});
    assert_eq!(*completion.borrow(), Some(Completion::Failure(3)));
  }
}
