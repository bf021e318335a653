use crate::{
  publisher::Publisher,
  subscriber::{Completion, Demand, Subscriber},
  subscription::BoxedSubscription,
};

/// Scan operator: emits each intermediate accumulation. An empty upstream
/// produces no values, only its completion.
#[derive(Clone)]
pub struct Scan<S, Acc, F> {
  pub source: S,
  pub initial: Acc,
  pub func: F,
}

pub struct ScanSubscriber<O, Acc, F> {
  downstream: O,
  acc: Acc,
  func: F,
}

impl<O, Acc, F, Item, Err> Subscriber<Item, Err> for ScanSubscriber<O, Acc, F>
where
  O: Subscriber<Acc, Err>,
  Acc: Clone,
  F: FnMut(Acc, Item) -> Acc,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.downstream.receive_subscription(subscription)
  }

  fn receive(&mut self, value: Item) -> Demand {
    self.acc = (self.func)(self.acc.clone(), value);
    self.downstream.receive(self.acc.clone())
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    self.downstream.receive_completion(completion)
  }
}

impl<S, Acc, F> Publisher for Scan<S, Acc, F>
where
  S: Publisher,
  Acc: Clone + 'static,
  F: FnMut(Acc, S::Output) -> Acc + 'static,
{
  type Output = Acc;
  type Failure = S::Failure;

  fn subscribe<O>(self, subscriber: O)
  where
    O: Subscriber<Acc, S::Failure> + 'static,
  {
    let Scan { source, initial, func } = self;
    source.subscribe(ScanSubscriber { downstream: subscriber, acc: initial, func })
  }
}
