//! Subjects: publishers fed by hand
//!
//! A subject is both a publisher that any number of subscribers can attach to
//! and an entry point for pushing values ([`send`](PassthroughSubject::send))
//! and a terminal signal ([`send_completion`](PassthroughSubject::send_completion)).
//!
//! - [`PassthroughSubject`] keeps no value: subscribers see what is sent while
//!   they are attached and have demand.
//! - [`CurrentValueSubject`] stores the latest value and hands it to every new
//!   subscriber first.
//!
//! Both are cheap handles; clones share the same subscriber set. Each
//! subscriber has its own demand, so a slow subscriber never holds back its
//! siblings.

mod current_value;
mod passthrough;
mod subscribers;

pub use current_value::*;
pub use passthrough::*;
