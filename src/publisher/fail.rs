use std::marker::PhantomData;

use crate::{
  publisher::Publisher,
  subscriber::{Completion, Subscriber},
  subscription::{Producer, ProducerSubscription},
};

/// Terminates with `error` right after the subscription is handed over.
pub struct Fail<T, E> {
  error: E,
  _hint: PhantomData<fn() -> T>,
}

impl<T, E> Fail<T, E> {
  pub fn new(error: E) -> Self { Self { error, _hint: PhantomData } }
}

impl<T, E: Clone> Clone for Fail<T, E> {
  fn clone(&self) -> Self { Self::new(self.error.clone()) }
}

struct FailProducer<T, E> {
  error: Option<E>,
  _hint: PhantomData<fn() -> T>,
}

impl<T: 'static, E: 'static> Producer for FailProducer<T, E> {
  type Item = T;
  type Err = E;

  fn next_value(&mut self) -> Option<T> { None }

  fn completion(&mut self) -> Option<Completion<E>> { self.error.take().map(Completion::Failure) }
}

impl<T: 'static, E: 'static> Publisher for Fail<T, E> {
  type Output = T;
  type Failure = E;

  fn subscribe<S>(self, subscriber: S)
  where
    S: Subscriber<T, E> + 'static,
  {
    ProducerSubscription::start(FailProducer { error: Some(self.error), _hint: PhantomData }, subscriber);
  }
}
