use crate::{
  publisher::Publisher,
  subscriber::{Completion, Demand, Subscriber},
  subscription::BoxedSubscription,
};

/// CompactMap operator: maps values through a closure returning `Option` and
/// passes on only the `Some` results.
#[derive(Clone)]
pub struct CompactMap<S, F> {
  pub source: S,
  pub func: F,
}

pub struct CompactMapSubscriber<O, F> {
  downstream: O,
  func: F,
}

impl<O, F, Item, B, Err> Subscriber<Item, Err> for CompactMapSubscriber<O, F>
where
  O: Subscriber<B, Err>,
  F: FnMut(Item) -> Option<B>,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.downstream.receive_subscription(subscription)
  }

  fn receive(&mut self, value: Item) -> Demand {
    match (self.func)(value) {
      Some(value) => self.downstream.receive(value),
      // The dropped value used up one unit of demand upstream.
      None => Demand::max(1),
    }
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    self.downstream.receive_completion(completion)
  }
}

impl<S, F, B> Publisher for CompactMap<S, F>
where
  S: Publisher,
  F: FnMut(S::Output) -> Option<B> + 'static,
  B: 'static,
{
  type Output = B;
  type Failure = S::Failure;

  fn subscribe<O>(self, subscriber: O)
  where
    O: Subscriber<B, S::Failure> + 'static,
  {
    let CompactMap { source, func } = self;
    source.subscribe(CompactMapSubscriber { downstream: subscriber, func })
  }
}
