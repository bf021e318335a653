/// The terminal signal of a subscription.
///
/// Exactly one completion is delivered per subscription, and nothing follows
/// it. Publishers that can never fail use [`std::convert::Infallible`] as
/// their failure type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Completion<E> {
  /// The publisher ran out of values normally.
  Finished,
  /// The publisher stopped because of an error.
  Failure(E),
}

impl<E> Completion<E> {
  #[inline]
  pub fn is_finished(&self) -> bool { matches!(self, Completion::Finished) }

  #[inline]
  pub fn into_result(self) -> Result<(), E> {
    match self {
      Completion::Finished => Ok(()),
      Completion::Failure(err) => Err(err),
    }
  }

  pub fn map_failure<E2>(self, f: impl FnOnce(E) -> E2) -> Completion<E2> {
    match self {
      Completion::Finished => Completion::Finished,
      Completion::Failure(err) => Completion::Failure(f(err)),
    }
  }
}

impl<E> From<Result<(), E>> for Completion<E> {
  fn from(result: Result<(), E>) -> Self {
    match result {
      Ok(()) => Completion::Finished,
      Err(err) => Completion::Failure(err),
    }
  }
}
