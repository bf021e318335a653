//! Publisher trait and the source publishers
//!
//! A publisher describes a stream of values of one type that ends with a
//! [`Completion`](crate::subscriber::Completion). Nothing happens until a
//! subscriber is attached with [`Publisher::subscribe`]; each subscription
//! runs the stream independently.
//!
//! Sources provided here:
//!
//! - [`Just`]: one value, then finished
//! - [`Empty`]: no values, finished (or never, if asked)
//! - [`Fail`]: no values, failed
//! - [`Sequence`]: the values of an iterator ([`from_iter`], [`IntoPublisher`])
//! - [`Promise`]: one eventually produced result, shared by all subscribers
//! - [`Deferred`]: a publisher built anew for every subscriber
//! - [`AnyPublisher`]: a type-erased publisher

use crate::subscriber::Subscriber;

mod boxed;
mod deferred;
mod empty;
mod fail;
mod just;
mod promise;
mod sequence;

pub use boxed::*;
pub use deferred::*;
pub use empty::*;
pub use fail::*;
pub use just::*;
pub use promise::*;
pub use sequence::*;

// ============================================================================
// Publisher Trait
// ============================================================================

/// The producing end of a stream.
///
/// `subscribe` takes the publisher by value; publishers are cheap handles or
/// descriptions, clone them to subscribe more than once. The subscriber first
/// receives a subscription, then only as many values as it demanded, then at
/// most one completion.
///
/// Operators are provided by [`PublisherExt`](crate::ops::PublisherExt), which
/// every publisher implements.
pub trait Publisher: Sized {
  /// The value type.
  type Output: 'static;
  /// The error type, [`Infallible`](std::convert::Infallible) for publishers
  /// that cannot fail.
  type Failure: 'static;

  fn subscribe<S>(self, subscriber: S)
  where
    S: Subscriber<Self::Output, Self::Failure> + 'static;
}
