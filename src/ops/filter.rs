use crate::{
  publisher::Publisher,
  subscriber::{Completion, Demand, Subscriber},
  subscription::BoxedSubscription,
};

/// Filter operator: passes only values satisfying the predicate.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxcombine::prelude::*;
///
/// let coll = Rc::new(RefCell::new(vec![]));
/// let c_coll = coll.clone();
///
/// let _c = from_iter(0..10)
///   .filter(|v| v % 2 == 0)
///   .sink_value(move |v| c_coll.borrow_mut().push(v));
///
/// // only even numbers received.
/// assert_eq!(*coll.borrow(), vec![0, 2, 4, 6, 8]);
/// ```
#[derive(Clone)]
pub struct Filter<S, F> {
  pub source: S,
  pub predicate: F,
}

pub struct FilterSubscriber<O, F> {
  downstream: O,
  predicate: F,
}

impl<O, F, Item, Err> Subscriber<Item, Err> for FilterSubscriber<O, F>
where
  O: Subscriber<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.downstream.receive_subscription(subscription)
  }

  fn receive(&mut self, value: Item) -> Demand {
    if (self.predicate)(&value) { self.downstream.receive(value) } else { Demand::max(1) }
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    self.downstream.receive_completion(completion)
  }
}

impl<S, F> Publisher for Filter<S, F>
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
    let Filter { source, predicate } = self;
    source.subscribe(FilterSubscriber { downstream: subscriber, predicate })
  }
}
