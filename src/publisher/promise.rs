use crate::{
  publisher::Publisher,
  rc::MutRc,
  subscriber::{Completion, Subscriber},
  subscription::{DynamicSubscriptions, Producer, ProducerSubscription},
};

struct PromiseState<T, E> {
  result: Option<Result<T, E>>,
  /// Wake-ups of the subscriptions still waiting for the result, keyed so a
  /// cancelled subscription can take its own out.
  waiting: DynamicSubscriptions<Box<dyn FnOnce()>>,
}

/// A publisher that eventually produces a single value or fails.
///
/// The body runs once, immediately, when the promise is created. Its result,
/// whenever it arrives, is delivered to every subscriber: those waiting at
/// resolution time and any that subscribe later. A successful value still
/// waits for demand; a failure does not.
///
/// ```rust
/// use std::convert::Infallible;
///
/// use rxcombine::prelude::*;
///
/// let mut resolver = None;
/// let future = Promise::<i32, Infallible>::new(|resolve| resolver = Some(resolve));
///
/// let _c = future.clone().sink_value(|v| println!("first: {v}"));
/// resolver.unwrap().resolve(Ok(42));
/// let _c2 = future.sink_value(|v| println!("second: {v}"));
/// ```
pub struct Promise<T, E> {
  state: MutRc<PromiseState<T, E>>,
}

impl<T, E> Clone for Promise<T, E> {
  fn clone(&self) -> Self { Self { state: self.state.clone() } }
}

/// The one-shot completion handle passed to a [`Promise`] body. Only the first
/// resolution counts.
pub struct Resolver<T, E> {
  state: MutRc<PromiseState<T, E>>,
}

impl<T, E> Clone for Resolver<T, E> {
  fn clone(&self) -> Self { Self { state: self.state.clone() } }
}

impl<T, E> Resolver<T, E> {
  pub fn resolve(&self, result: Result<T, E>) {
    let waiting = {
      let mut state = self.state.rc_deref_mut();
      if state.result.is_some() {
        tracing::debug!("promise already resolved, result ignored");
        return;
      }
      state.result = Some(result);
      state.waiting.drain().collect::<Vec<_>>()
    };
    for wake in waiting {
      wake();
    }
  }
}

impl<T, E> Promise<T, E> {
  pub fn new(body: impl FnOnce(Resolver<T, E>)) -> Self {
    let state = MutRc::own(PromiseState { result: None, waiting: DynamicSubscriptions::new() });
    body(Resolver { state: state.clone() });
    Self { state }
  }

  pub fn is_resolved(&self) -> bool { self.state.rc_deref().result.is_some() }
}

struct PromiseProducer<T, E> {
  state: MutRc<PromiseState<T, E>>,
  delivered: bool,
  waiter: usize,
}

impl<T, E> Producer for PromiseProducer<T, E>
where
  T: Clone + 'static,
  E: Clone + 'static,
{
  type Item = T;
  type Err = E;

  fn next_value(&mut self) -> Option<T> {
    match &self.state.rc_deref().result {
      Some(Ok(value)) if !self.delivered => {
        self.delivered = true;
        Some(value.clone())
      }
      _ => None,
    }
  }

  fn completion(&mut self) -> Option<Completion<E>> {
    match &self.state.rc_deref().result {
      None => None,
      Some(Ok(_)) => self.delivered.then_some(Completion::Finished),
      Some(Err(err)) => Some(Completion::Failure(err.clone())),
    }
  }

  fn cancelled(&mut self) {
    let waiter = self.state.rc_deref_mut().waiting.remove(self.waiter);
    drop(waiter);
  }
}

impl<T, E> Publisher for Promise<T, E>
where
  T: Clone + 'static,
  E: Clone + 'static,
{
  type Output = T;
  type Failure = E;

  fn subscribe<S>(self, subscriber: S)
  where
    S: Subscriber<T, E> + 'static,
  {
    let waiter = self.state.rc_deref_mut().waiting.reserve_id();
    let producer = PromiseProducer { state: self.state.clone(), delivered: false, waiter };
    let subscription = ProducerSubscription::start(producer, subscriber);
    let mut state = self.state.rc_deref_mut();
    if state.result.is_none() && !subscription.is_closed() {
      state.waiting.insert(waiter, Box::new(move || subscription.drain()));
    }
  }
}
