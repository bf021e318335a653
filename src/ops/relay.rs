//! Downstream side of operators that decouple upstream from downstream demand
//!
//! Operators such as `last`, `collect` or `replace_empty` emit values the
//! upstream never sent, possibly after the upstream has finished. They cannot
//! hand the upstream subscription through; instead the downstream gets a
//! [`Relay`], which tracks the downstream demand, translates requests for the
//! upstream, and holds a trailing value until the downstream asks for it.

use crate::{
  rc::MutRc,
  subscriber::{Completion, Demand, Subscriber},
  subscription::{BoxedSubscription, Subscription},
};

/// How downstream demand turns into upstream demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UpstreamDemand {
  /// Request everything from the upstream once subscribed.
  Unlimited,
  /// Pass each request through unchanged.
  Forward,
  /// Each downstream value stands for this many upstream values.
  Scaled(usize),
}

struct RelayState<O, Item, Err> {
  downstream: Option<O>,
  upstream: Option<BoxedSubscription>,
  mode: UpstreamDemand,
  demand: Demand,
  /// Terminal emission waiting for demand or for the downstream to return.
  pending: Option<(Option<Item>, Completion<Err>)>,
  busy: bool,
  closed: bool,
}

pub(crate) struct Relay<O, Item, Err>(MutRc<RelayState<O, Item, Err>>);

impl<O, Item, Err> Clone for Relay<O, Item, Err> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<O, Item, Err> Relay<O, Item, Err>
where
  O: Subscriber<Item, Err> + 'static,
  Item: 'static,
  Err: 'static,
{
  pub(crate) fn new(downstream: O, mode: UpstreamDemand) -> Self {
    Self(MutRc::own(RelayState {
      downstream: Some(downstream),
      upstream: None,
      mode,
      demand: Demand::NONE,
      pending: None,
      busy: false,
      closed: false,
    }))
  }

  /// Keep the upstream subscription and hand the relay to the downstream.
  pub(crate) fn attach(&self, upstream: BoxedSubscription) {
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

    let unlimited = {
      let state = self.0.rc_deref();
      !state.closed && state.mode == UpstreamDemand::Unlimited
    };
    if unlimited {
      upstream.request(Demand::Unlimited);
    }
    self.deliver_pending();
  }

  /// Deliver `value` downstream now; returns the demand to add upstream.
  pub(crate) fn forward(&self, value: Item) -> Demand {
    let (mut downstream, mode) = {
      let mut state = self.0.rc_deref_mut();
      if state.closed {
        return Demand::NONE;
      }
      if state.busy {
        tracing::warn!("value dropped: downstream is still handling a previous delivery");
        return Demand::NONE;
      }
      let Some(downstream) = state.downstream.take() else {
        return Demand::NONE;
      };
      state.demand.consume_one();
      state.busy = true;
      (downstream, state.mode)
    };

    let more = downstream.receive(value);
    self.restore(downstream, more);
    match mode {
      UpstreamDemand::Unlimited => Demand::NONE,
      UpstreamDemand::Forward => more,
      UpstreamDemand::Scaled(n) => more.scaled(n),
    }
  }

  /// Terminate: `value` (if any) is delivered once the downstream has demand,
  /// followed by `completion`.
  pub(crate) fn finish(&self, value: Option<Item>, completion: Completion<Err>) {
    {
      let mut state = self.0.rc_deref_mut();
      if state.closed || state.pending.is_some() {
        return;
      }
      state.upstream = None;
      state.pending = Some((value, completion));
    }
    self.deliver_pending();
  }

  fn restore(&self, downstream: O, more: Demand) {
    let dropped = {
      let mut state = self.0.rc_deref_mut();
      state.busy = false;
      if state.closed {
        Some(downstream)
      } else {
        state.demand += more;
        state.downstream = Some(downstream);
        None
      }
    };
    drop(dropped);
  }

  fn deliver_pending(&self) {
    let (value, completion, mut downstream) = {
      let mut state = self.0.rc_deref_mut();
      if state.busy || state.closed {
        return;
      }
      let ready = match &state.pending {
        None => false,
        Some((Some(_), _)) => !state.demand.is_none(),
        Some((None, _)) => true,
      };
      if !ready {
        return;
      }
      let (Some((value, completion)), Some(downstream)) =
        (state.pending.take(), state.downstream.take())
      else {
        return;
      };
      state.busy = true;
      (value, completion, downstream)
    };

    if let Some(value) = value {
      let _ = downstream.receive(value);
    }

    let cancelled = {
      let mut state = self.0.rc_deref_mut();
      state.busy = false;
      std::mem::replace(&mut state.closed, true)
    };
    if !cancelled {
      downstream.receive_completion(completion);
    }
  }
}

impl<O, Item, Err> Subscription for Relay<O, Item, Err>
where
  O: Subscriber<Item, Err> + 'static,
  Item: 'static,
  Err: 'static,
{
  fn request(&self, demand: Demand) {
    if demand.is_none() {
      return;
    }
    let upstream = {
      let mut state = self.0.rc_deref_mut();
      if state.closed {
        return;
      }
      state.demand += demand;
      match state.mode {
        UpstreamDemand::Unlimited => None,
        UpstreamDemand::Forward => state.upstream.clone().map(|up| (up, demand)),
        UpstreamDemand::Scaled(n) => state.upstream.clone().map(|up| (up, demand.scaled(n))),
      }
    };
    if let Some((upstream, demand)) = upstream {
      upstream.request(demand);
    }
    self.deliver_pending();
  }

  fn cancel(&self) {
    let (downstream, upstream, pending) = {
      let mut state = self.0.rc_deref_mut();
      if state.closed {
        return;
      }
      state.closed = true;
      (state.downstream.take(), state.upstream.take(), state.pending.take())
    };
    drop(pending);
    drop(downstream);
    if let Some(upstream) = upstream {
      upstream.cancel();
    }
  }
}
