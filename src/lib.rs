//! # rxcombine: demand-driven reactive streams
//!
//! Publishers emit values to subscribers only as fast as the subscribers ask
//! for them. Every subscription carries a [`Demand`], and every value a
//! subscriber receives may grow it.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxcombine::prelude::*;
//!
//! let received = Rc::new(RefCell::new(vec![]));
//! let c_received = received.clone();
//!
//! let subject = CurrentValueSubject::<i32, std::convert::Infallible>::new(0);
//! let _cancellable = subject
//!   .clone()
//!   .filter(|v| v % 2 == 0)
//!   .sink_value(move |v| c_received.borrow_mut().push(v));
//!
//! subject.send(1);
//! subject.send(2);
//! assert_eq!(*received.borrow(), vec![0, 2]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Publisher`] | A source of values, subscribed to at most once per value |
//! | [`Subscriber`] | Receives a subscription, values and one completion |
//! | [`Subscription`] | The link that carries demand upstream and cancellation |
//! | [`AnyCancellable`] | Cancels a subscription when dropped |
//! | [`PassthroughSubject`] / [`CurrentValueSubject`] | Imperative multicast sources |
//!
//! Everything is single-threaded: state is shared through `Rc<RefCell<_>>`
//! and no type is `Send`.
//!
//! ## Feature Flags
//!
//! - **`stream`** (default): [`values`](ops::PublisherExt::values) bridges a
//!   publisher into a `futures::Stream`.
//!
//! [`Demand`]: subscriber::Demand
//! [`Publisher`]: publisher::Publisher
//! [`Subscriber`]: subscriber::Subscriber
//! [`Subscription`]: subscription::Subscription
//! [`AnyCancellable`]: subscription::AnyCancellable
//! [`PassthroughSubject`]: subject::PassthroughSubject
//! [`CurrentValueSubject`]: subject::CurrentValueSubject

pub mod error;
pub mod ops;
pub mod prelude;
pub mod publisher;
pub mod rc;
pub mod subject;
pub mod subscriber;
pub mod subscription;

pub use prelude::*;
