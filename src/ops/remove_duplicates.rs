//! RemoveDuplicates operator implementation
//!
//! Suppresses a value when it matches the value delivered immediately before
//! it. Only adjacent duplicates are removed.

use crate::{
  publisher::Publisher,
  subscriber::{Completion, Demand, Subscriber},
  subscription::BoxedSubscription,
};

/// RemoveDuplicates operator: `predicate(previous, current)` returning `true`
/// marks `current` as a duplicate.
#[derive(Clone)]
pub struct RemoveDuplicates<S, F> {
  pub source: S,
  pub predicate: F,
}

pub struct RemoveDuplicatesSubscriber<O, F, Item> {
  downstream: O,
  predicate: F,
  last: Option<Item>,
}

impl<O, F, Item, Err> Subscriber<Item, Err> for RemoveDuplicatesSubscriber<O, F, Item>
where
  O: Subscriber<Item, Err>,
  F: FnMut(&Item, &Item) -> bool,
  Item: Clone,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.downstream.receive_subscription(subscription)
  }

  fn receive(&mut self, value: Item) -> Demand {
    if let Some(last) = &self.last {
      if (self.predicate)(last, &value) {
        return Demand::max(1);
      }
    }
    self.last = Some(value.clone());
    self.downstream.receive(value)
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    self.downstream.receive_completion(completion)
  }
}

impl<S, F> Publisher for RemoveDuplicates<S, F>
where
  S: Publisher,
  S::Output: Clone,
  F: FnMut(&S::Output, &S::Output) -> bool + 'static,
{
  type Output = S::Output;
  type Failure = S::Failure;

  fn subscribe<O>(self, subscriber: O)
  where
    O: Subscriber<S::Output, S::Failure> + 'static,
  {
    let RemoveDuplicates { source, predicate } = self;
    source.subscribe(RemoveDuplicatesSubscriber { downstream: subscriber, predicate, last: None })
  }
}
