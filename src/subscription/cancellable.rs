use std::{
  cell::Cell,
  fmt::{Debug, Formatter},
};

use super::{BoxedSubscription, Subscription};

/// A cancellation token that cancels when it is dropped.
///
/// Returned by [`sink`](crate::ops::PublisherExt::sink) and
/// [`assign`](crate::ops::PublisherExt::assign). Keep it alive for as long as
/// the values should keep flowing, typically by storing it in a collection
/// owned by whoever consumes the stream.
///
/// ```rust
/// use std::convert::Infallible;
///
/// use rxcombine::prelude::*;
///
/// let subject = PassthroughSubject::<i32, Infallible>::new();
/// let mut subscriptions = Vec::new();
///
/// subject
///   .clone()
///   .sink_value(|v| println!("{v}"))
///   .store(&mut subscriptions);
/// assert_eq!(subject.subscriber_count(), 1);
///
/// subscriptions.clear();
/// assert_eq!(subject.subscriber_count(), 0);
/// ```
#[must_use = "dropping the token cancels the subscription right away"]
pub struct AnyCancellable {
  cancel: Cell<Option<Box<dyn FnOnce()>>>,
}

impl AnyCancellable {
  /// Wrap an arbitrary cancel action; it runs at most once.
  pub fn new(cancel: impl FnOnce() + 'static) -> Self {
    Self { cancel: Cell::new(Some(Box::new(cancel))) }
  }

  /// A token that cancels `subscription`.
  pub fn from_subscription(subscription: BoxedSubscription) -> Self {
    Self::new(move || subscription.cancel())
  }

  /// Run the cancel action now. Later calls, and the drop, do nothing.
  pub fn cancel(&self) {
    if let Some(cancel) = self.cancel.take() {
      tracing::trace!("cancellable cancelled");
      cancel();
    }
  }

  /// Move the token into `collection`, tying the subscription's lifetime to
  /// it.
  pub fn store<C: Extend<AnyCancellable>>(self, collection: &mut C) {
    collection.extend(std::iter::once(self));
  }
}

impl Drop for AnyCancellable {
  fn drop(&mut self) { self.cancel(); }
}

impl Debug for AnyCancellable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let pending = self.cancel.take();
    let cancelled = pending.is_none();
    self.cancel.set(pending);
    f.debug_struct("AnyCancellable")
      .field("cancelled", &cancelled)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;

  #[rxcombine_macro::test]
  fn cancels_once() {
    let count = Rc::new(RefCell::new(0));
    let c_count = count.clone();
    let token = AnyCancellable::new(move || *c_count.borrow_mut() += 1);

    token.cancel();
    token.cancel();
    drop(token);

    assert_eq!(*count.borrow(), 1);
  }

  #[rxcombine_macro::test]
  fn cancels_on_drop() {
    let count = Rc::new(RefCell::new(0));
    let c_count = count.clone();
    {
      let _token = AnyCancellable::new(move || *c_count.borrow_mut() += 1);
    }
    assert_eq!(*count.borrow(), 1);
  }

  #[rxcombine_macro::test]
  fn store_keeps_alive() {
    let count = Rc::new(RefCell::new(0));
    let mut bag = Vec::new();
    let c_count = count.clone();
    AnyCancellable::new(move || *c_count.borrow_mut() += 1).store(&mut bag);

    assert_eq!(*count.borrow(), 0);
    assert_eq!(format!("{:?}", bag[0]), "AnyCancellable { cancelled: false }");
    bag.clear();
    assert_eq!(*count.borrow(), 1);
  }

  #[rxcombine_macro::test]
  fn discarded_token_cancels_immediately() {
    use std::convert::Infallible;

    use crate::prelude::*;

    let subject = PassthroughSubject::<i32, Infallible>::new();
    let _ = subject.clone().sink_value(|_| {});
    assert_eq!(subject.subscriber_count(), 0);

    let _kept = subject.clone().sink_value(|_| {});
    assert_eq!(subject.subscriber_count(), 1);
  }
}
