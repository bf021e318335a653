//! Operators
//!
//! Every operator is a publisher wrapping its upstream publisher; subscribing
//! to it subscribes an adapter subscriber upstream. They are reached through
//! [`PublisherExt`], which every [`Publisher`] implements, and compose by
//! chaining:
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxcombine::prelude::*;
//!
//! let received = Rc::new(RefCell::new(vec![]));
//! let c_received = received.clone();
//!
//! let _c = from_iter(1..=10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 10)
//!   .collect(2)
//!   .sink_value(move |batch| c_received.borrow_mut().push(batch));
//!
//! assert_eq!(*received.borrow(), vec![vec![20, 40], vec![60, 80], vec![100]]);
//! ```

use std::{cell::RefCell, convert::Infallible, fmt::Debug, rc::Rc};

use crate::{
  publisher::{AnyPublisher, Publisher},
  subject::CurrentValueSubject,
  subscriber::{Assign, AssignTo, Completion, Demand, Sink},
  subscription::AnyCancellable,
};

mod collect;
mod compact_map;
mod drop_first;
mod drop_while;
mod filter;
mod first;
mod flat_map;
mod handle_events;
mod ignore_output;
mod last;
mod map;
mod map_err;
mod print;
mod relay;
mod remove_duplicates;
mod replace;
mod scan;
mod try_map;
#[cfg(feature = "stream")]
mod values;

pub use collect::*;
pub use compact_map::*;
pub use drop_first::*;
pub use drop_while::*;
pub use filter::*;
pub use first::*;
pub use flat_map::*;
pub use handle_events::*;
pub use ignore_output::*;
pub use last::*;
pub use map::*;
pub use map_err::*;
pub use remove_duplicates::*;
pub use replace::*;
pub use scan::*;
pub use try_map::*;
#[cfg(feature = "stream")]
pub use values::*;

fn always<T>(_: &T) -> bool { true }

fn absurd<E>(never: Infallible) -> E { match never {} }

/// The operator methods available on every publisher.
pub trait PublisherExt: Publisher {
  // ==========================================================================
  // Transforming
  // ==========================================================================

  /// Transform each value with `func`.
  fn map<B, F>(self, func: F) -> Map<Self, F>
  where
    F: FnMut(Self::Output) -> B,
  {
    Map { source: self, func }
  }

  /// Transform each value with a fallible `func`. The first `Err` cancels the
  /// upstream and becomes the failure of the stream.
  fn try_map<B, F>(self, func: F) -> TryMap<Self, F>
  where
    F: FnMut(Self::Output) -> Result<B, Self::Failure>,
  {
    TryMap { source: self, func }
  }

  /// Transform each value, dropping those mapped to `None`.
  fn compact_map<B, F>(self, func: F) -> CompactMap<Self, F>
  where
    F: FnMut(Self::Output) -> Option<B>,
  {
    CompactMap { source: self, func }
  }

  /// Convert the failure with `func`.
  fn map_err<E, F>(self, func: F) -> MapErr<Self, F>
  where
    F: FnOnce(Self::Failure) -> E,
  {
    MapErr { source: self, func }
  }

  /// Give a publisher that cannot fail any failure type, so it can be
  /// combined with fallible publishers.
  fn set_failure_type<E>(self) -> MapErr<Self, fn(Infallible) -> E>
  where
    Self: Publisher<Failure = Infallible>,
  {
    MapErr { source: self, func: absurd::<E> as fn(Infallible) -> E }
  }

  /// Emit the running accumulation of `func`, starting from `initial`.
  fn scan<Acc, F>(self, initial: Acc, func: F) -> Scan<Self, Acc, F>
  where
    Acc: Clone,
    F: FnMut(Acc, Self::Output) -> Acc,
  {
    Scan { source: self, initial, func }
  }

  /// Map every value to a publisher and merge the values of all of them.
  fn flat_map<P, F>(self, func: F) -> FlatMap<Self, F>
  where
    P: Publisher<Failure = Self::Failure>,
    F: FnMut(Self::Output) -> P,
  {
    self.flat_map_max(Demand::Unlimited, func)
  }

  /// Like [`flat_map`](Self::flat_map), with at most `max_publishers` inner
  /// publishers active at a time.
  /// [`Demand::NONE`] is treated as `max(1)`.
  fn flat_map_max<P, F>(self, max_publishers: Demand, func: F) -> FlatMap<Self, F>
  where
    P: Publisher<Failure = Self::Failure>,
    F: FnMut(Self::Output) -> P,
  {
    FlatMap { source: self, max_publishers, func }
  }

  /// Replace `None` values with `with`.
  fn replace_nil<T>(self, with: T) -> ReplaceNil<Self, T>
  where
    Self: Publisher<Output = Option<T>>,
    T: Clone,
  {
    ReplaceNil { source: self, with }
  }

  /// Emit `with` if the upstream finishes without emitting anything.
  fn replace_empty(self, with: Self::Output) -> ReplaceEmpty<Self> { ReplaceEmpty { source: self, with } }

  // ==========================================================================
  // Filtering
  // ==========================================================================

  /// Pass only values satisfying `predicate`.
  fn filter<F>(self, predicate: F) -> Filter<Self, F>
  where
    F: FnMut(&Self::Output) -> bool,
  {
    Filter { source: self, predicate }
  }

  /// Drop values equal to the previously delivered one.
  fn remove_duplicates(self) -> RemoveDuplicates<Self, fn(&Self::Output, &Self::Output) -> bool>
  where
    Self::Output: PartialEq + Clone,
  {
    let eq: fn(&Self::Output, &Self::Output) -> bool = <Self::Output as PartialEq>::eq;
    RemoveDuplicates { source: self, predicate: eq }
  }

  /// Drop values for which `predicate(previous, current)` holds.
  fn remove_duplicates_by<F>(self, predicate: F) -> RemoveDuplicates<Self, F>
  where
    Self::Output: Clone,
    F: FnMut(&Self::Output, &Self::Output) -> bool,
  {
    RemoveDuplicates { source: self, predicate }
  }

  /// The first value, then finish.
  fn first(self) -> First<Self, fn(&Self::Output) -> bool> {
    self.first_where(always::<Self::Output> as fn(&Self::Output) -> bool)
  }

  /// The first value satisfying `predicate`, then finish and cancel upstream.
  fn first_where<F>(self, predicate: F) -> First<Self, F>
  where
    F: FnMut(&Self::Output) -> bool,
  {
    First { source: self, predicate }
  }

  /// The last value, emitted once the upstream finishes.
  fn last(self) -> Last<Self, fn(&Self::Output) -> bool> {
    self.last_where(always::<Self::Output> as fn(&Self::Output) -> bool)
  }

  /// The last value satisfying `predicate`, emitted once the upstream
  /// finishes.
  fn last_where<F>(self, predicate: F) -> Last<Self, F>
  where
    F: FnMut(&Self::Output) -> bool,
  {
    Last { source: self, predicate }
  }

  /// Skip the first `count` values.
  fn drop_first(self, count: usize) -> DropFirst<Self> { DropFirst { source: self, count } }

  /// Skip values until `predicate` first returns `false`.
  fn drop_while<F>(self, predicate: F) -> DropWhile<Self, F>
  where
    F: FnMut(&Self::Output) -> bool,
  {
    DropWhile { source: self, predicate }
  }

  /// Drop every value, keeping only the terminal signal.
  fn ignore_output(self) -> IgnoreOutput<Self> { IgnoreOutput { source: self } }

  // ==========================================================================
  // Collecting
  // ==========================================================================

  /// Emit batches of up to `count` values; the last batch may be shorter. A
  /// `count` of zero is treated as one.
  fn collect(self, count: usize) -> CollectByCount<Self> {
    CollectByCount { source: self, count: count.max(1) }
  }

  /// Emit all values as one `Vec` when the upstream finishes.
  fn collect_all(self) -> Collect<Self> { Collect { source: self } }

  // ==========================================================================
  // Debugging
  // ==========================================================================

  /// Run side effects on lifecycle events without changing the stream.
  fn handle_events(self, hooks: EventHooks<Self::Output, Self::Failure>) -> HandleEvents<Self> {
    HandleEvents { source: self, hooks }
  }

  /// Log every lifecycle event through `tracing` at info level.
  fn print(self, prefix: impl Into<String>) -> HandleEvents<Self>
  where
    Self::Output: Debug,
    Self::Failure: Debug,
  {
    self.handle_events(print::print_hooks(prefix.into()))
  }

  // ==========================================================================
  // Erasing and bridging
  // ==========================================================================

  fn erase_to_any_publisher(self) -> AnyPublisher<Self::Output, Self::Failure>
  where
    Self: Clone + 'static,
  {
    AnyPublisher::new(self)
  }

  /// A `futures::Stream` of the values, requesting one value per poll.
  #[cfg(feature = "stream")]
  fn values(self) -> Values<Self::Output, Self::Failure> { Values::new(self) }

  // ==========================================================================
  // Subscribing
  // ==========================================================================

  /// Subscribe with closures, requesting unlimited demand.
  fn sink<FC, FV>(self, on_completion: FC, on_value: FV) -> AnyCancellable
  where
    FC: FnOnce(Completion<Self::Failure>) + 'static,
    FV: FnMut(Self::Output) + 'static,
  {
    let sink = Sink::new(on_completion, on_value);
    let cancellable = sink.cancellable();
    self.subscribe(sink);
    cancellable
  }

  /// [`sink`](Self::sink) for publishers that cannot fail.
  fn sink_value<FV>(self, on_value: FV) -> AnyCancellable
  where
    Self: Publisher<Failure = Infallible>,
    FV: FnMut(Self::Output) + 'static,
  {
    self.sink(|_| {}, on_value)
  }

  /// Write every value into `target` through `setter`.
  fn assign<T, F>(self, target: Rc<RefCell<T>>, setter: F) -> AnyCancellable
  where
    Self: Publisher<Failure = Infallible>,
    T: 'static,
    F: FnMut(&mut T, Self::Output) + 'static,
  {
    let assign = Assign::new(target, setter);
    let cancellable = assign.cancellable();
    self.subscribe(assign);
    cancellable
  }

  /// Republish every value into `subject`. Lives as long as the upstream.
  fn assign_to(self, subject: CurrentValueSubject<Self::Output, Infallible>)
  where
    Self: Publisher<Failure = Infallible>,
    Self::Output: Clone,
  {
    self.subscribe(AssignTo::new(subject))
  }
}

impl<P: Publisher> PublisherExt for P {}
