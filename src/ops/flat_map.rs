//! FlatMap operator implementation
//!
//! Each upstream value is mapped to an inner publisher; the values of all
//! active inner publishers are merged into one stream in the order they
//! arrive. The stream finishes once the upstream and every inner publisher
//! have finished, and fails as soon as any of them fails.
//!
//! Every inner publisher is asked for one value at a time and at most one
//! value per inner publisher waits for downstream demand, so arrival order is
//! preserved without unbounded buffering.

use std::collections::VecDeque;

use crate::{
  publisher::Publisher,
  rc::MutRc,
  subscriber::{Completion, Demand, Subscriber},
  subscription::{BoxedSubscription, DynamicSubscriptions, Subscription},
};

/// FlatMap operator: see the module documentation.
#[derive(Clone)]
pub struct FlatMap<S, F> {
  pub source: S,
  pub max_publishers: Demand,
  pub func: F,
}

struct FlatMapState<O, Item, Err> {
  downstream: Option<O>,
  demand: Demand,
  upstream: Option<BoxedSubscription>,
  max_publishers: Demand,
  /// Inner subscriptions by inner id; `None` until the subscription arrives.
  inners: DynamicSubscriptions<Option<BoxedSubscription>>,
  buffer: VecDeque<(usize, Item)>,
  outer_finished: bool,
  pending_failure: Option<Err>,
  busy: bool,
  closed: bool,
}

/// The state shared by the outer subscriber, every inner subscriber and the
/// subscription handed downstream.
pub struct FlatMapCore<O, Item, Err>(MutRc<FlatMapState<O, Item, Err>>);

impl<O, Item, Err> Clone for FlatMapCore<O, Item, Err> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<O, Item, Err> FlatMapCore<O, Item, Err>
where
  O: Subscriber<Item, Err> + 'static,
  Item: 'static,
  Err: 'static,
{
  fn new(downstream: O, max_publishers: Demand) -> Self {
    // No active inner at all would never pull from upstream.
    let max_publishers = if max_publishers.is_none() { Demand::max(1) } else { max_publishers };
    Self(MutRc::own(FlatMapState {
      downstream: Some(downstream),
      demand: Demand::NONE,
      upstream: None,
      max_publishers,
      inners: DynamicSubscriptions::default(),
      buffer: VecDeque::new(),
      outer_finished: false,
      pending_failure: None,
      busy: false,
      closed: false,
    }))
  }

  fn attach(&self, upstream: BoxedSubscription) {
    let downstream = {
      let mut state = self.0.rc_deref_mut();
      state.upstream = Some(upstream.clone());
      state.busy = true;
      state.downstream.take()
    };
    let Some(mut downstream) = downstream else {
      return;
    };
    downstream.receive_subscription(BoxedSubscription::new(self.clone()));
    self.restore(downstream, Demand::NONE);

    let initial = {
      let state = self.0.rc_deref();
      (!state.closed).then_some(state.max_publishers)
    };
    if let Some(initial) = initial {
      upstream.request(initial);
    }
  }

  fn restore(&self, mut downstream: O, more: Demand) {
    let failure = {
      let mut state = self.0.rc_deref_mut();
      state.busy = false;
      if !state.closed {
        state.demand += more;
        state.downstream = Some(downstream);
        return;
      }
      state.pending_failure.take()
    };
    if let Some(err) = failure {
      downstream.receive_completion(Completion::Failure(err));
    }
  }

  fn register_inner(&self) -> Option<usize> {
    let mut state = self.0.rc_deref_mut();
    (!state.closed).then(|| state.inners.add(None))
  }

  fn inner_subscribed(&self, id: usize, subscription: BoxedSubscription) {
    let accepted = {
      let mut state = self.0.rc_deref_mut();
      if state.closed {
        false
      } else if let Some(slot) = state.inners.get_mut(id) {
        *slot = Some(subscription.clone());
        true
      } else {
        false
      }
    };
    if accepted {
      subscription.request(Demand::max(1));
    } else {
      subscription.cancel();
    }
  }

  fn inner_value(&self, id: usize, value: Item) {
    {
      let mut state = self.0.rc_deref_mut();
      if state.closed {
        return;
      }
      state.buffer.push_back((id, value));
    }
    self.drain();
  }

  fn inner_finished(&self, id: usize) {
    let upstream = {
      let mut state = self.0.rc_deref_mut();
      if state.closed {
        return;
      }
      let removed = state.inners.remove(id);
      drop(removed);
      let bounded = !state.max_publishers.is_unlimited();
      if bounded && !state.outer_finished {
        state.upstream.clone()
      } else {
        None
      }
    };
    if let Some(upstream) = upstream {
      upstream.request(Demand::max(1));
    }
    self.try_finish();
  }

  fn outer_finished(&self) {
    {
      let mut state = self.0.rc_deref_mut();
      state.outer_finished = true;
      state.upstream = None;
    }
    self.try_finish();
  }

  fn fail(&self, err: Err) {
    let (inners, upstream, downstream) = {
      let mut state = self.0.rc_deref_mut();
      if state.closed {
        return;
      }
      state.closed = true;
      state.buffer.clear();
      let inners: Vec<_> = state.inners.drain().flatten().collect();
      (inners, state.upstream.take(), state.downstream.take())
    };

    for inner in inners {
      inner.cancel();
    }
    if let Some(upstream) = upstream {
      upstream.cancel();
    }
    match downstream {
      Some(mut downstream) => downstream.receive_completion(Completion::Failure(err)),
      // The downstream is mid-call; `restore` delivers the failure.
      None => self.0.rc_deref_mut().pending_failure = Some(err),
    }
  }

  /// Deliver buffered values while there is demand.
  fn drain(&self) {
    loop {
      let (mut downstream, value, inner) = {
        let mut state = self.0.rc_deref_mut();
        if state.busy || state.closed || state.demand.is_none() {
          break;
        }
        let Some(downstream) = state.downstream.take() else {
          break;
        };
        let Some((id, value)) = state.buffer.pop_front() else {
          state.downstream = Some(downstream);
          break;
        };
        state.demand.consume_one();
        state.busy = true;
        let inner = state.inners.get(id).cloned().flatten();
        (downstream, value, inner)
      };

      let more = downstream.receive(value);
      self.restore(downstream, more);
      if let Some(inner) = inner {
        inner.request(Demand::max(1));
      }
    }
    self.try_finish();
  }

  fn try_finish(&self) {
    let downstream = {
      let mut state = self.0.rc_deref_mut();
      let done = state.outer_finished && state.inners.is_empty() && state.buffer.is_empty();
      if !done || state.busy || state.closed {
        return;
      }
      state.closed = true;
      state.downstream.take()
    };
    if let Some(mut downstream) = downstream {
      downstream.receive_completion(Completion::Finished);
    }
  }
}

impl<O, Item, Err> Subscription for FlatMapCore<O, Item, Err>
where
  O: Subscriber<Item, Err> + 'static,
  Item: 'static,
  Err: 'static,
{
  fn request(&self, demand: Demand) {
    if demand.is_none() {
      return;
    }
    {
      let mut state = self.0.rc_deref_mut();
      if state.closed {
        return;
      }
      state.demand += demand;
    }
    self.drain();
  }

  fn cancel(&self) {
    let (inners, upstream, downstream) = {
      let mut state = self.0.rc_deref_mut();
      if state.closed {
        return;
      }
      state.closed = true;
      state.buffer.clear();
      let inners: Vec<_> = state.inners.drain().flatten().collect();
      (inners, state.upstream.take(), state.downstream.take())
    };
    drop(downstream);
    for inner in inners {
      inner.cancel();
    }
    if let Some(upstream) = upstream {
      upstream.cancel();
    }
  }
}

/// Subscribes to the upstream and spawns an inner subscription per value.
pub struct FlatMapSubscriber<O, F, Item, Err> {
  core: FlatMapCore<O, Item, Err>,
  func: F,
}

impl<O, F, In, P, Item, Err> Subscriber<In, Err> for FlatMapSubscriber<O, F, Item, Err>
where
  O: Subscriber<Item, Err> + 'static,
  F: FnMut(In) -> P,
  P: Publisher<Output = Item, Failure = Err>,
  Item: 'static,
  Err: 'static,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) { self.core.attach(subscription) }

  fn receive(&mut self, value: In) -> Demand {
    let Some(id) = self.core.register_inner() else {
      return Demand::NONE;
    };
    let inner = (self.func)(value);
    inner.subscribe(InnerSubscriber { core: self.core.clone(), id });
    Demand::NONE
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    match completion {
      Completion::Finished => self.core.outer_finished(),
      Completion::Failure(err) => self.core.fail(err),
    }
  }
}

/// Feeds one inner publisher into the shared state.
pub struct InnerSubscriber<O, Item, Err> {
  core: FlatMapCore<O, Item, Err>,
  id: usize,
}

impl<O, Item, Err> Subscriber<Item, Err> for InnerSubscriber<O, Item, Err>
where
  O: Subscriber<Item, Err> + 'static,
  Item: 'static,
  Err: 'static,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.core.inner_subscribed(self.id, subscription)
  }

  fn receive(&mut self, value: Item) -> Demand {
    self.core.inner_value(self.id, value);
    Demand::NONE
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    match completion {
      Completion::Finished => self.core.inner_finished(self.id),
      Completion::Failure(err) => self.core.fail(err),
    }
  }
}

impl<S, F, P> Publisher for FlatMap<S, F>
where
  S: Publisher,
  F: FnMut(S::Output) -> P + 'static,
  P: Publisher<Failure = S::Failure>,
{
  type Output = P::Output;
  type Failure = S::Failure;

  fn subscribe<O>(self, subscriber: O)
  where
    O: Subscriber<P::Output, S::Failure> + 'static,
  {
    let FlatMap { source, max_publishers, func } = self;
    let core = FlatMapCore::new(subscriber, max_publishers);
    source.subscribe(FlatMapSubscriber { core, func })
  }
}
