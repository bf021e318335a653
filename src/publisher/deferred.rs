use crate::{publisher::Publisher, subscriber::Subscriber};

/// Builds a fresh publisher for every subscriber by calling the factory at
/// subscribe time.
///
/// ```rust
/// use rxcombine::prelude::*;
///
/// let deferred = Deferred::new(|| {
///   println!("building");
///   Just("Hello!")
/// });
/// let _a = deferred.clone().sink_value(|v| println!("{v}"));
/// let _b = deferred.sink_value(|v| println!("{v}"));
/// // Prints "building" before each "Hello!"
/// ```
#[derive(Clone)]
pub struct Deferred<F>(F);

impl<F, P> Deferred<F>
where
  F: Fn() -> P,
  P: Publisher,
{
  pub fn new(factory: F) -> Self { Self(factory) }
}

impl<F, P> Publisher for Deferred<F>
where
  F: Fn() -> P,
  P: Publisher,
{
  type Output = P::Output;
  type Failure = P::Failure;

  fn subscribe<S>(self, subscriber: S)
  where
    S: Subscriber<P::Output, P::Failure> + 'static,
  {
    (self.0)().subscribe(subscriber)
  }
}
