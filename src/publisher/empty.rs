use std::marker::PhantomData;

use crate::{
  publisher::Publisher,
  subscriber::{Completion, Subscriber},
  subscription::{Producer, ProducerSubscription},
};

/// A publisher that never emits a value.
///
/// With `complete_immediately` it finishes right after the subscription is
/// handed over; otherwise it stays silent until cancelled.
pub struct Empty<T, E> {
  complete_immediately: bool,
  _hint: PhantomData<fn() -> (T, E)>,
}

impl<T, E> Empty<T, E> {
  pub fn new(complete_immediately: bool) -> Self {
    Self { complete_immediately, _hint: PhantomData }
  }
}

impl<T, E> Default for Empty<T, E> {
  fn default() -> Self { Self::new(true) }
}

impl<T, E> Clone for Empty<T, E> {
  fn clone(&self) -> Self { Self::new(self.complete_immediately) }
}

struct EmptyProducer<T, E> {
  complete_immediately: bool,
  _hint: PhantomData<fn() -> (T, E)>,
}

impl<T: 'static, E: 'static> Producer for EmptyProducer<T, E> {
  type Item = T;
  type Err = E;

  fn next_value(&mut self) -> Option<T> { None }

  fn completion(&mut self) -> Option<Completion<E>> {
    self.complete_immediately.then_some(Completion::Finished)
  }
}

impl<T: 'static, E: 'static> Publisher for Empty<T, E> {
  type Output = T;
  type Failure = E;

  fn subscribe<S>(self, subscriber: S)
  where
    S: Subscriber<T, E> + 'static,
  {
    let producer = EmptyProducer { complete_immediately: self.complete_immediately, _hint: PhantomData };
    ProducerSubscription::start(producer, subscriber);
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use crate::prelude::*;

  #[rxcombine_macro::test]
  fn completes_immediately() {
    let done = Rc::new(RefCell::new(false));
    let c_done = done.clone();
    let _c = Empty::<i32, Infallible>::default().sink(
      move |c| *c_done.borrow_mut() = c.is_finished(),
      |_| unreachable!(),
    );
    assert!(*done.borrow());
  }

  #[rxcombine_macro::test]
  fn never_completes() {
    let done = Rc::new(RefCell::new(false));
    let c_done = done.clone();
    let c = Empty::<i32, Infallible>::new(false).sink(
      move |_| *c_done.borrow_mut() = true,
      |_| unreachable!(),
    );
    c.cancel();
    assert!(!*done.borrow());
  }
}
