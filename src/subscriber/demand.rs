use std::{
  fmt::{Display, Formatter},
  ops::{Add, AddAssign},
};

/// The number of values a subscriber is still willing to receive.
///
/// Demand only ever grows through [`Subscription::request`] and the value
/// returned from [`Subscriber::receive`]; a publisher consumes one unit per
/// delivered value. Arithmetic saturates, and anything combined with
/// [`Demand::Unlimited`] stays unlimited.
///
/// ```rust
/// use rxcombine::prelude::*;
///
/// assert_eq!(Demand::max(2) + Demand::max(3), Demand::max(5));
/// assert_eq!(Demand::max(2) + Demand::Unlimited, Demand::Unlimited);
/// assert!(Demand::NONE.is_none());
/// ```
///
/// [`Subscription::request`]: crate::subscription::Subscription::request
/// [`Subscriber::receive`]: crate::subscriber::Subscriber::receive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Demand {
  /// At most this many further values.
  Max(usize),
  /// Any number of values.
  Unlimited,
}

impl Demand {
  /// No additional values.
  pub const NONE: Demand = Demand::Max(0);

  #[inline]
  pub const fn max(n: usize) -> Self { Demand::Max(n) }

  #[inline]
  pub fn is_none(&self) -> bool { *self == Demand::NONE }

  #[inline]
  pub fn is_unlimited(&self) -> bool { *self == Demand::Unlimited }

  /// Account for one delivered value. Outstanding demand never drops below
  /// zero.
  #[inline]
  pub fn consume_one(&mut self) {
    if let Demand::Max(n) = self {
      *n = n.saturating_sub(1);
    }
  }

  /// Multiply the demand, used when one downstream value stands for `factor`
  /// upstream values.
  #[inline]
  pub fn scaled(self, factor: usize) -> Self {
    match self {
      Demand::Max(n) => Demand::Max(n.saturating_mul(factor)),
      Demand::Unlimited => Demand::Unlimited,
    }
  }
}

impl Default for Demand {
  fn default() -> Self { Demand::NONE }
}

impl Add for Demand {
  type Output = Demand;

  fn add(self, rhs: Demand) -> Demand {
    match (self, rhs) {
      (Demand::Max(a), Demand::Max(b)) => Demand::Max(a.saturating_add(b)),
      _ => Demand::Unlimited,
    }
  }
}

impl AddAssign for Demand {
  #[inline]
  fn add_assign(&mut self, rhs: Demand) { *self = *self + rhs; }
}

impl Display for Demand {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Demand::Max(n) => write!(f, "max({n})"),
      Demand::Unlimited => f.write_str("unlimited"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[rxcombine_macro::test]
  fn accumulates_additively() {
    let mut demand = Demand::NONE;
    for n in [1, 2, 3] {
      demand += Demand::max(n);
    }
    assert_eq!(demand, Demand::max(6));
  }

  #[rxcombine_macro::test]
  fn saturates() {
    assert_eq!(Demand::max(usize::MAX) + Demand::max(1), Demand::max(usize::MAX));
    assert_eq!(Demand::max(usize::MAX).scaled(2), Demand::max(usize::MAX));
    assert_eq!(Demand::Unlimited + Demand::NONE, Demand::Unlimited);
  }

  #[rxcombine_macro::test]
  fn consume_never_goes_negative() {
    let mut demand = Demand::max(1);
    demand.consume_one();
    demand.consume_one();
    assert!(demand.is_none());

    let mut unlimited = Demand::Unlimited;
    unlimited.consume_one();
    assert!(unlimited.is_unlimited());
  }

  #[rxcombine_macro::test]
  fn display() {
    assert_eq!(Demand::max(2).to_string(), "max(2)");
    assert_eq!(Demand::Unlimited.to_string(), "unlimited");
  }
}
