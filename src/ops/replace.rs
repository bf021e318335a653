use super::relay::{Relay, UpstreamDemand};
use crate::{
  publisher::Publisher,
  subscriber::{Completion, Demand, Subscriber},
  subscription::BoxedSubscription,
};

// ============================================================================
// ReplaceNil
// ============================================================================

/// ReplaceNil operator: unwraps `Option` values, substituting a default for
/// `None`.
#[derive(Clone)]
pub struct ReplaceNil<S, T> {
  pub source: S,
  pub with: T,
}

pub struct ReplaceNilSubscriber<O, T> {
  downstream: O,
  with: T,
}

impl<O, T, Err> Subscriber<Option<T>, Err> for ReplaceNilSubscriber<O, T>
where
  O: Subscriber<T, Err>,
  T: Clone,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.downstream.receive_subscription(subscription)
  }

  fn receive(&mut self, value: Option<T>) -> Demand {
    let value = value.unwrap_or_else(|| self.with.clone());
    self.downstream.receive(value)
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    self.downstream.receive_completion(completion)
  }
}

impl<S, T> Publisher for ReplaceNil<S, T>
where
  S: Publisher<Output = Option<T>>,
  T: Clone + 'static,
{
  type Output = T;
  type Failure = S::Failure;

  fn subscribe<O>(self, subscriber: O)
  where
    O: Subscriber<T, S::Failure> + 'static,
  {
    let ReplaceNil { source, with } = self;
    source.subscribe(ReplaceNilSubscriber { downstream: subscriber, with })
  }
}

// ============================================================================
// ReplaceEmpty
// ============================================================================

/// ReplaceEmpty operator: emits a substitute value when the upstream finishes
/// without having emitted anything. Otherwise it changes nothing.
#[derive(Clone)]
pub struct ReplaceEmpty<S: Publisher> {
  pub source: S,
  pub with: S::Output,
}

pub struct ReplaceEmptySubscriber<O, Item, Err> {
  relay: Relay<O, Item, Err>,
  with: Option<Item>,
}

impl<O, Item, Err> Subscriber<Item, Err> for ReplaceEmptySubscriber<O, Item, Err>
where
  O: Subscriber<Item, Err> + 'static,
  Item: 'static,
  Err: 'static,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.relay.attach(subscription)
  }

  fn receive(&mut self, value: Item) -> Demand {
    self.with = None;
    self.relay.forward(value)
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    let with = self.with.take();
    match completion {
      Completion::Finished => self.relay.finish(with, Completion::Finished),
      failure => self.relay.finish(None, failure),
    }
  }
}

impl<S: Publisher> Publisher for ReplaceEmpty<S> {
  type Output = S::Output;
  type Failure = S::Failure;

  fn subscribe<O>(self, subscriber: O)
  where
    O: Subscriber<S::Output, S::Failure> + 'static,
  {
    let ReplaceEmpty { source, with } = self;
    let relay = Relay::new(subscriber, UpstreamDemand::Forward);
    source.subscribe(ReplaceEmptySubscriber { relay, with: Some(with) })
  }
}
