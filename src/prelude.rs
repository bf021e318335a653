//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Errors
pub use crate::error::Error;
// Operators
pub use crate::ops::*;
// Sources
pub use crate::publisher::*;
// Subject
pub use crate::subject::*;
// Subscriber
pub use crate::subscriber::*;
// Subscription
pub use crate::subscription::*;
