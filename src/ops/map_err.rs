use crate::{
  publisher::Publisher,
  subscriber::{Completion, Demand, Subscriber},
  subscription::BoxedSubscription,
};

#[derive(Clone)]
pub struct MapErr<S, F> {
  pub source: S,
  pub func: F,
}

pub struct MapErrSubscriber<O, F> {
  downstream: O,
  func: Option<F>,
}

impl<O, F, Item, Err, OutErr> Subscriber<Item, Err> for MapErrSubscriber<O, F>
where
  O: Subscriber<Item, OutErr>,
  F: FnOnce(Err) -> OutErr,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.downstream.receive_subscription(subscription)
  }

  fn receive(&mut self, value: Item) -> Demand { self.downstream.receive(value) }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    let completion = match completion {
      Completion::Finished => Completion::Finished,
      Completion::Failure(err) => match self.func.take() {
        Some(func) => Completion::Failure(func(err)),
        None => return,
      },
    };
    self.downstream.receive_completion(completion)
  }
}

impl<S, F, OutErr> Publisher for MapErr<S, F>
where
  S: Publisher,
  F: FnOnce(S::Failure) -> OutErr + 'static,
  OutErr: 'static,
{
  type Output = S::Output;
  type Failure = OutErr;

  fn subscribe<O>(self, subscriber: O)
  where
    O: Subscriber<S::Output, OutErr> + 'static,
  {
    let MapErr { source, func } = self;
    source.subscribe(MapErrSubscriber { downstream: subscriber, func: Some(func) })
  }
}
