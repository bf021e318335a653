//! Errors raised by the strict entry points of the crate.
//!
//! Stream failures travel through the typed failure channel of each publisher
//! (see [`Completion`](crate::subscriber::Completion)); this module only covers
//! misuse of the API that callers opt into detecting.

/// Errors returned by the `try_*` family of subject methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
  /// The subject already delivered a terminal signal; nothing more can be sent.
  #[error("subject has already received a terminal signal")]
  SubjectCompleted,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[rxcombine_macro::test]
  fn display() {
    assert_eq!(
      Error::SubjectCompleted.to_string(),
      "subject has already received a terminal signal"
    );
  }
}
