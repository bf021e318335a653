use std::convert::Infallible;

use crate::{
  publisher::Publisher,
  subscriber::{Completion, Subscriber},
  subscription::{Producer, ProducerSubscription},
};

/// Emits a single value once it is demanded, then finishes.
///
/// ```rust
/// use rxcombine::prelude::*;
///
/// let _c = Just(1).sink_value(|v| assert_eq!(v, 1));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Just<T>(pub T);

struct JustProducer<T>(Option<T>);

impl<T: 'static> Producer for JustProducer<T> {
  type Item = T;
  type Err = Infallible;

  fn next_value(&mut self) -> Option<T> { self.0.take() }

  fn completion(&mut self) -> Option<Completion<Infallible>> {
    self.0.is_none().then_some(Completion::Finished)
  }
}

impl<T: 'static> Publisher for Just<T> {
  type Output = T;
  type Failure = Infallible;

  fn subscribe<S>(self, subscriber: S)
  where
    S: Subscriber<T, Infallible> + 'static,
  {
    ProducerSubscription::start(JustProducer(Some(self.0)), subscriber);
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxcombine_macro::test]
  fn emits_once_then_finishes() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let v_log = log.clone();

    let _c = Just("hello").sink(
      move |c| c_log.borrow_mut().push(format!("{c:?}")),
      move |v| v_log.borrow_mut().push(v.to_string()),
    );

    assert_eq!(*log.borrow(), vec!["hello", "Finished"]);
  }

  #[rxcombine_macro::test]
  fn resubscribe_replays() {
    let count = Rc::new(RefCell::new(0));
    let just = Just(2);
    for _ in 0..3 {
      let c_count = count.clone();
      let _c = just.clone().sink_value(move |v| *c_count.borrow_mut() += v);
    }
    assert_eq!(*count.borrow(), 6);
  }
}
