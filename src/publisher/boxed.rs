//! Type-erased publisher
//!
//! [`AnyPublisher`] hides the concrete operator chain behind a trait object so
//! publishers of different shapes can share a type, be stored, or be returned
//! from functions.

use crate::{
  publisher::Publisher,
  subscriber::{BoxedSubscriber, Subscriber},
};

// ============================================================================
// DynPublisher Trait
// ============================================================================

/// Object-safe publisher trait for type erasure.
pub trait DynPublisher<Item, Err> {
  fn dyn_subscribe(self: Box<Self>, subscriber: BoxedSubscriber<Item, Err>);

  /// Clone this publisher into a new boxed trait object.
  fn clone_box(&self) -> Box<dyn DynPublisher<Item, Err>>;
}

impl<P> DynPublisher<P::Output, P::Failure> for P
where
  P: Publisher + Clone + 'static,
{
  fn dyn_subscribe(self: Box<Self>, subscriber: BoxedSubscriber<P::Output, P::Failure>) {
    (*self).subscribe(subscriber)
  }

  fn clone_box(&self) -> Box<dyn DynPublisher<P::Output, P::Failure>> { Box::new(self.clone()) }
}

// ============================================================================
// AnyPublisher
// ============================================================================

/// A publisher with its concrete type erased; only the value and failure
/// types remain.
///
/// Created by [`erase_to_any_publisher`](crate::ops::PublisherExt::erase_to_any_publisher).
///
/// ```rust
/// use std::convert::Infallible;
///
/// use rxcombine::prelude::*;
///
/// let publishers: Vec<AnyPublisher<i32, Infallible>> = vec![
///   Just(1).erase_to_any_publisher(),
///   from_iter(2..4).map(|v| v * 10).erase_to_any_publisher(),
/// ];
/// for p in publishers {
///   let _c = p.sink_value(|v| println!("{v}"));
/// }
/// ```
pub struct AnyPublisher<Item, Err>(Box<dyn DynPublisher<Item, Err>>);

impl<Item, Err> AnyPublisher<Item, Err> {
  pub fn new<P>(publisher: P) -> Self
  where
    P: Publisher<Output = Item, Failure = Err> + Clone + 'static,
  {
    Self(Box::new(publisher))
  }
}

impl<Item, Err> Clone for AnyPublisher<Item, Err> {
  fn clone(&self) -> Self { Self(self.0.clone_box()) }
}

impl<Item: 'static, Err: 'static> Publisher for AnyPublisher<Item, Err> {
  type Output = Item;
  type Failure = Err;

  fn subscribe<S>(self, subscriber: S)
  where
    S: Subscriber<Item, Err> + 'static,
  {
    self.0.dyn_subscribe(Box::new(subscriber))
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use crate::prelude::*;

  #[rxcombine_macro::test]
  fn erased_publishers_share_a_type() {
    let values = Rc::new(RefCell::new(vec![]));
    let publishers: Vec<AnyPublisher<i32, Infallible>> =
      vec![Just(1).erase_to_any_publisher(), from_iter(2..4).erase_to_any_publisher()];

    for p in publishers {
      let c_values = values.clone();
      let _c = p.clone().sink_value(move |v| c_values.borrow_mut().push(v));
    }
    assert_eq!(*values.borrow(), vec![1, 2, 3]);
  }

  #[rxcombine_macro::test]
  fn erase_keeps_subjects_hot() {
    let subject = PassthroughSubject::<&str, Infallible>::new();
    let erased = subject.clone().erase_to_any_publisher();
    let values = Rc::new(RefCell::new(vec![]));
    let c_values = values.clone();
    let _c = erased.sink_value(move |v| c_values.borrow_mut().push(v));

    subject.send("x");
    assert_eq!(*values.borrow(), vec!["x"]);
  }
}
