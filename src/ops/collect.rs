//! Collect operators
//!
//! [`Collect`] gathers the whole upstream into one `Vec`; [`CollectByCount`]
//! emits fixed-size batches as they fill and a final partial batch on
//! completion. A failure discards whatever was buffered.

use super::relay::{Relay, UpstreamDemand};
use crate::{
  publisher::Publisher,
  subscriber::{Completion, Demand, Subscriber},
  subscription::BoxedSubscription,
};

#[derive(Clone)]
pub struct Collect<S> {
  pub source: S,
}

pub struct CollectSubscriber<O, Item, Err> {
  relay: Relay<O, Vec<Item>, Err>,
  buffer: Vec<Item>,
}

impl<O, Item, Err> Subscriber<Item, Err> for CollectSubscriber<O, Item, Err>
where
  O: Subscriber<Vec<Item>, Err> + 'static,
  Item: 'static,
  Err: 'static,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.relay.attach(subscription)
  }

  fn receive(&mut self, value: Item) -> Demand {
    self.buffer.push(value);
    Demand::NONE
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    let buffer = std::mem::take(&mut self.buffer);
    match completion {
      Completion::Finished => self.relay.finish(Some(buffer), Completion::Finished),
      failure => self.relay.finish(None, failure),
    }
  }
}

impl<S: Publisher> Publisher for Collect<S> {
  type Output = Vec<S::Output>;
  type Failure = S::Failure;

  fn subscribe<O>(self, subscriber: O)
  where
    O: Subscriber<Vec<S::Output>, S::Failure> + 'static,
  {
    let relay = Relay::new(subscriber, UpstreamDemand::Unlimited);
    self
      .source
      .subscribe(CollectSubscriber { relay, buffer: vec![] })
  }
}

#[derive(Clone)]
pub struct CollectByCount<S> {
  pub source: S,
  pub count: usize,
}

pub struct CollectByCountSubscriber<O, Item, Err> {
  relay: Relay<O, Vec<Item>, Err>,
  buffer: Vec<Item>,
  count: usize,
}

impl<O, Item, Err> Subscriber<Item, Err> for CollectByCountSubscriber<O, Item, Err>
where
  O: Subscriber<Vec<Item>, Err> + 'static,
  Item: 'static,
  Err: 'static,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.relay.attach(subscription)
  }

  fn receive(&mut self, value: Item) -> Demand {
    self.buffer.push(value);
    if self.buffer.len() < self.count {
      return Demand::NONE;
    }
    let batch = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.count));
    self.relay.forward(batch)
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    let buffer = std::mem::take(&mut self.buffer);
    match completion {
      Completion::Finished => {
        let last = (!buffer.is_empty()).then_some(buffer);
        self.relay.finish(last, Completion::Finished)
      }
      failure => self.relay.finish(None, failure),
    }
  }
}

impl<S: Publisher> Publisher for CollectByCount<S> {
  type Output = Vec<S::Output>;
  type Failure = S::Failure;

  fn subscribe<O>(self, subscriber: O)
  where
    O: Subscriber<Vec<S::Output>, S::Failure> + 'static,
  {
    let count = self.count.max(1);
    let relay = Relay::new(subscriber, UpstreamDemand::Scaled(count));
    self.source.subscribe(CollectByCountSubscriber {
      relay,
      buffer: Vec::with_capacity(count),
      count,
    })
  }
}
