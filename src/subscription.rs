//! Subscription trait and the handles built on it
//!
//! A subscription is the link between one publisher and one subscriber. The
//! subscriber uses it to ask for values ([`Subscription::request`]) or to tear
//! the link down ([`Subscription::cancel`]).

use crate::subscriber::Demand;

mod boxed;
mod cancellable;
mod dynamic;
mod producer;

pub use boxed::*;
pub use cancellable::*;
pub use dynamic::*;
pub use producer::*;

/// The demand and cancellation side of a publisher/subscriber link.
///
/// Both methods take `&self` because subscriptions are shared handles: the
/// publisher side keeps one to know whom to deliver to, and the subscriber
/// keeps one to talk back. Implementations must tolerate calls made from
/// inside the subscriber's own callbacks.
pub trait Subscription {
  /// Allow `demand` more values. Demand accumulates; requesting
  /// [`Demand::NONE`] does nothing.
  fn request(&self, demand: Demand);

  /// Stop the link. No value or completion is delivered afterwards, and the
  /// subscriber is released. Calling it again does nothing.
  fn cancel(&self);
}

/// The unit subscription: already closed, ignores everything.
///
/// Handed to subscribers of a publisher that has nothing left to deliver but a
/// terminal signal.
impl Subscription for () {
  #[inline]
  fn request(&self, _: Demand) {}

  #[inline]
  fn cancel(&self) {}
}
