//! Subscriber trait and the built-in subscribers
//!
//! A subscriber is the consuming end of a stream. It receives, in order:
//! one subscription, zero or more values (each answered with additional
//! demand), and at most one completion.

use crate::subscription::BoxedSubscription;

mod assign;
mod completion;
mod demand;
mod sink;

pub use assign::*;
pub use completion::*;
pub use demand::*;
pub use sink::*;

// ============================================================================
// Subscriber Trait
// ============================================================================

/// Subscriber trait: the consumer of a publisher's values.
///
/// Implement it directly to control demand value by value:
///
/// ```rust
/// use std::{cell::RefCell, convert::Infallible, rc::Rc};
///
/// use rxcombine::prelude::*;
///
/// struct TakeTwo(Rc<RefCell<Vec<i32>>>);
///
/// impl Subscriber<i32, Infallible> for TakeTwo {
///   fn receive_subscription(&mut self, subscription: BoxedSubscription) {
///     subscription.request(Demand::max(2));
///   }
///
///   fn receive(&mut self, value: i32) -> Demand {
///     self.0.borrow_mut().push(value);
///     Demand::NONE
///   }
///
///   fn receive_completion(&mut self, _: Completion<Infallible>) {}
/// }
///
/// let received = Rc::new(RefCell::new(vec![]));
/// from_iter(1..10).subscribe(TakeTwo(received.clone()));
/// assert_eq!(*received.borrow(), vec![1, 2]);
/// ```
pub trait Subscriber<Item, Err> {
  /// Called once, first, with the handle used to request values or cancel.
  fn receive_subscription(&mut self, subscription: BoxedSubscription);

  /// Called for every value; the returned demand is added to the outstanding
  /// demand of the subscription.
  fn receive(&mut self, value: Item) -> Demand;

  /// Called at most once, last.
  fn receive_completion(&mut self, completion: Completion<Err>);
}

/// Type-erased subscriber, used where subscribers of different types share
/// one container (subjects, erased publishers).
pub type BoxedSubscriber<Item, Err> = Box<dyn Subscriber<Item, Err>>;

impl<Item, Err> Subscriber<Item, Err> for Box<dyn Subscriber<Item, Err>> {
  #[inline]
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    (**self).receive_subscription(subscription)
  }

  #[inline]
  fn receive(&mut self, value: Item) -> Demand { (**self).receive(value) }

  #[inline]
  fn receive_completion(&mut self, completion: Completion<Err>) {
    (**self).receive_completion(completion)
  }
}
