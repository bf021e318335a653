use std::{
  fmt::{Debug, Formatter},
  rc::Rc,
};

use super::Subscription;
use crate::subscriber::Demand;

/// A cloneable, type-erased subscription handle.
///
/// Every subscriber receives one of these. Clones point at the same link, so
/// cancelling through any clone cancels the link for all of them.
///
/// # Examples
///
/// ```rust
/// use rxcombine::prelude::*;
///
/// let sub = BoxedSubscription::new(());
/// let other = sub.clone();
/// other.request(Demand::max(1));
/// sub.cancel();
/// assert!(sub.is_same(&other));
/// ```
#[derive(Clone)]
pub struct BoxedSubscription(Rc<dyn Subscription>);

impl BoxedSubscription {
  /// Erase the type of any subscription.
  #[inline]
  pub fn new(subscription: impl Subscription + 'static) -> Self { Self(Rc::new(subscription)) }

  /// Whether both handles refer to the same link.
  #[inline]
  pub fn is_same(&self, other: &BoxedSubscription) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl Subscription for BoxedSubscription {
  #[inline]
  fn request(&self, demand: Demand) { self.0.request(demand) }

  #[inline]
  fn cancel(&self) { self.0.cancel() }
}

impl Debug for BoxedSubscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BoxedSubscription")
      .field("handles", &Rc::strong_count(&self.0))
      .finish()
  }
}
