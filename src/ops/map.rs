use crate::{
  publisher::Publisher,
  subscriber::{Completion, Demand, Subscriber},
  subscription::BoxedSubscription,
};

/// Map operator: transforms each value with a closure.
#[derive(Clone)]
pub struct Map<S, F> {
  pub source: S,
  pub func: F,
}

pub struct MapSubscriber<O, F> {
  downstream: O,
  func: F,
}

impl<O, F, Item, B, Err> Subscriber<Item, Err> for MapSubscriber<O, F>
where
  O: Subscriber<B, Err>,
  F: FnMut(Item) -> B,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.downstream.receive_subscription(subscription)
  }

  fn receive(&mut self, value: Item) -> Demand { self.downstream.receive((self.func)(value)) }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    self.downstream.receive_completion(completion)
  }
}

impl<S, F, B> Publisher for Map<S, F>
where
  S: Publisher,
  F: FnMut(S::Output) -> B + 'static,
  B: 'static,
{
  type Output = B;
  type Failure = S::Failure;

  fn subscribe<O>(self, subscriber: O)
  where
    O: Subscriber<B, S::Failure> + 'static,
  {
    let Map { source, func } = self;
    source.subscribe(MapSubscriber { downstream: subscriber, func })
  }
}
