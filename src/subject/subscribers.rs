use std::collections::BTreeMap;

use crate::{
  error::Error,
  rc::MutRc,
  subscriber::{BoxedSubscriber, Completion, Demand},
  subscription::{BoxedSubscription, Subscription},
};

/// Per-subscriber delivery state of a subject.
///
/// The subscriber is moved out while it is being called (`busy`), so a
/// callback can re-enter the subject without tripping over an active borrow.
pub(crate) struct Conduit<Item, Err> {
  subscriber: Option<BoxedSubscriber<Item, Err>>,
  demand: Demand,
  /// Newest undelivered value, kept only when `retain_latest` is set.
  pending: Option<Item>,
  pending_completion: Option<Completion<Err>>,
  retain_latest: bool,
  busy: bool,
  closed: bool,
}

impl<Item, Err> Conduit<Item, Err> {
  fn new(initial: Option<Item>, retain_latest: bool) -> Self {
    Self {
      subscriber: None,
      demand: Demand::NONE,
      pending: initial,
      pending_completion: None,
      retain_latest,
      busy: true,
      closed: false,
    }
  }

  /// Hand the subscriber back after a call and account for its new demand.
  fn restore(this: &MutRc<Self>, subscriber: BoxedSubscriber<Item, Err>, more: Demand) {
    let dropped = {
      let mut conduit = this.rc_deref_mut();
      conduit.busy = false;
      if conduit.closed {
        Some(subscriber)
      } else {
        conduit.demand += more;
        conduit.subscriber = Some(subscriber);
        None
      }
    };
    drop(dropped);
  }

  /// Deliver a held value (if there is demand) and a deferred completion.
  fn flush(this: &MutRc<Self>) {
    loop {
      let mut conduit = this.rc_deref_mut();
      if conduit.busy || conduit.closed {
        return;
      }

      if !conduit.demand.is_none() && conduit.pending.is_some() {
        let (Some(value), Some(mut subscriber)) = (conduit.pending.take(), conduit.subscriber.take())
        else {
          return;
        };
        conduit.demand.consume_one();
        conduit.busy = true;
        drop(conduit);

        let more = subscriber.receive(value);
        Self::restore(this, subscriber, more);
        continue;
      }

      if let Some(completion) = conduit.pending_completion.take() {
        conduit.closed = true;
        let subscriber = conduit.subscriber.take();
        drop(conduit);
        if let Some(mut subscriber) = subscriber {
          subscriber.receive_completion(completion);
        }
      }
      return;
    }
  }

  /// Try to deliver `value`; returns whether the subscriber received it.
  fn offer(this: &MutRc<Self>, value: Item) -> bool {
    let mut conduit = this.rc_deref_mut();
    if conduit.closed {
      return false;
    }
    if conduit.busy || conduit.demand.is_none() {
      if conduit.retain_latest {
        conduit.pending = Some(value);
      } else if conduit.busy {
        tracing::warn!("value dropped: subscriber is still handling a previous delivery");
      } else {
        tracing::trace!("value dropped: subscriber has no outstanding demand");
      }
      return false;
    }

    let Some(mut subscriber) = conduit.subscriber.take() else {
      return false;
    };
    conduit.demand.consume_one();
    conduit.busy = true;
    drop(conduit);

    let more = subscriber.receive(value);
    Self::restore(this, subscriber, more);
    Self::flush(this);
    true
  }

  fn complete(this: &MutRc<Self>, completion: Completion<Err>) {
    let (subscriber, pending) = {
      let mut conduit = this.rc_deref_mut();
      if conduit.closed {
        return;
      }
      if conduit.busy {
        conduit.pending_completion = Some(completion);
        return;
      }
      conduit.closed = true;
      (conduit.subscriber.take(), conduit.pending.take())
    };
    drop(pending);
    if let Some(mut subscriber) = subscriber {
      subscriber.receive_completion(completion);
    }
  }
}

/// The subscriber set shared by all clones of a subject.
pub(crate) struct Subscribers<Item, Err> {
  conduits: BTreeMap<usize, MutRc<Conduit<Item, Err>>>,
  next_id: usize,
  completion: Option<Completion<Err>>,
  /// Publishers the subject is subscribed to; cancelled on completion.
  upstreams: Vec<BoxedSubscription>,
}

impl<Item, Err> Default for Subscribers<Item, Err> {
  fn default() -> Self {
    Self { conduits: BTreeMap::new(), next_id: 0, completion: None, upstreams: vec![] }
  }
}

/// The broadcasting core behind both subject kinds.
pub(crate) struct SubjectCore<Item, Err> {
  subscribers: MutRc<Subscribers<Item, Err>>,
  retain_latest: bool,
}

impl<Item, Err> Clone for SubjectCore<Item, Err> {
  fn clone(&self) -> Self {
    Self { subscribers: self.subscribers.clone(), retain_latest: self.retain_latest }
  }
}

impl<Item, Err> SubjectCore<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  pub(crate) fn new(retain_latest: bool) -> Self {
    Self { subscribers: MutRc::default(), retain_latest }
  }

  pub(crate) fn subscriber_count(&self) -> usize { self.subscribers.rc_deref().conduits.len() }

  pub(crate) fn is_completed(&self) -> bool { self.subscribers.rc_deref().completion.is_some() }

  /// Attach `subscriber`; `initial` is delivered first, once there is demand.
  pub(crate) fn subscribe(&self, mut subscriber: BoxedSubscriber<Item, Err>, initial: Option<Item>) {
    let completion = self.subscribers.rc_deref().completion.clone();
    if let Some(completion) = completion {
      subscriber.receive_subscription(BoxedSubscription::new(()));
      subscriber.receive_completion(completion);
      return;
    }

    let conduit = MutRc::own(Conduit::new(initial, self.retain_latest));
    let id = {
      let mut subscribers = self.subscribers.rc_deref_mut();
      let id = subscribers.next_id;
      subscribers.next_id += 1;
      subscribers.conduits.insert(id, conduit.clone());
      id
    };

    let subscription = ConduitSubscription {
      subscribers: self.subscribers.clone(),
      conduit: conduit.clone(),
      id,
    };
    subscriber.receive_subscription(BoxedSubscription::new(subscription));
    Conduit::restore(&conduit, subscriber, Demand::NONE);
    Conduit::flush(&conduit);
  }

  /// Keep `subscription` to an upstream publisher feeding the subject and ask
  /// it for everything. A completed subject cancels it right away.
  pub(crate) fn attach_upstream(&self, subscription: BoxedSubscription) {
    let completed = {
      let mut subscribers = self.subscribers.rc_deref_mut();
      if subscribers.completion.is_none() {
        subscribers.upstreams.push(subscription.clone());
      }
      subscribers.completion.is_some()
    };
    if completed {
      subscription.cancel();
    } else {
      subscription.request(Demand::Unlimited);
    }
  }

  /// Broadcast `value` in subscription order; returns how many subscribers
  /// received it.
  pub(crate) fn send(&self, value: Item) -> Result<usize, Error> {
    let conduits: Vec<_> = {
      let subscribers = self.subscribers.rc_deref();
      if subscribers.completion.is_some() {
        return Err(Error::SubjectCompleted);
      }
      subscribers.conduits.values().cloned().collect()
    };

    let last = conduits.len().saturating_sub(1);
    let mut value = Some(value);
    let mut delivered = 0;
    for (idx, conduit) in conduits.iter().enumerate() {
      let v = if idx == last { value.take() } else { value.clone() };
      if let Some(v) = v {
        if Conduit::offer(conduit, v) {
          delivered += 1;
        }
      }
    }
    Ok(delivered)
  }

  pub(crate) fn send_completion(&self, completion: Completion<Err>) -> Result<(), Error> {
    let (conduits, upstreams) = {
      let mut subscribers = self.subscribers.rc_deref_mut();
      if subscribers.completion.is_some() {
        return Err(Error::SubjectCompleted);
      }
      subscribers.completion = Some(completion.clone());
      (std::mem::take(&mut subscribers.conduits), std::mem::take(&mut subscribers.upstreams))
    };

    tracing::debug!(subscribers = conduits.len(), finished = completion.is_finished(), "subject completed");
    for conduit in conduits.into_values() {
      Conduit::complete(&conduit, completion.clone());
    }
    for upstream in upstreams {
      upstream.cancel();
    }
    Ok(())
  }
}

/// The subscription a subject hands to each of its subscribers.
struct ConduitSubscription<Item, Err> {
  subscribers: MutRc<Subscribers<Item, Err>>,
  conduit: MutRc<Conduit<Item, Err>>,
  id: usize,
}

impl<Item, Err> Subscription for ConduitSubscription<Item, Err> {
  fn request(&self, demand: Demand) {
    if demand.is_none() {
      return;
    }
    {
      let mut conduit = self.conduit.rc_deref_mut();
      if conduit.closed {
        return;
      }
      conduit.demand += demand;
    }
    Conduit::flush(&self.conduit);
  }

  fn cancel(&self) {
    let (subscriber, pending) = {
      let mut conduit = self.conduit.rc_deref_mut();
      if conduit.closed {
        return;
      }
      conduit.closed = true;
      (conduit.subscriber.take(), conduit.pending.take())
    };
    let removed = self.subscribers.rc_deref_mut().conduits.remove(&self.id);
    drop(removed);
    drop(pending);
    drop(subscriber);
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::subscriber::Subscriber;

  type Log = Rc<RefCell<Vec<String>>>;

  struct Probe {
    log: Log,
    initial: Demand,
    reply: Demand,
    subscription: Rc<RefCell<Option<BoxedSubscription>>>,
  }

  impl Subscriber<i32, &'static str> for Probe {
    fn receive_subscription(&mut self, subscription: BoxedSubscription) {
      subscription.request(self.initial);
      *self.subscription.borrow_mut() = Some(subscription);
    }

    fn receive(&mut self, value: i32) -> Demand {
      self.log.borrow_mut().push(value.to_string());
      self.reply
    }

    fn receive_completion(&mut self, completion: Completion<&'static str>) {
      self.log.borrow_mut().push(format!("{completion:?}"));
      self.subscription.borrow_mut().take();
    }
  }

  fn probe(initial: Demand, reply: Demand) -> (Box<Probe>, Log, Rc<RefCell<Option<BoxedSubscription>>>) {
    let log = Log::default();
    let subscription = Rc::new(RefCell::new(None));
    let p = Probe { log: log.clone(), initial, reply, subscription: subscription.clone() };
    (Box::new(p), log, subscription)
  }

  #[rxcombine_macro::test]
  fn send_counts_receivers() {
    let core = SubjectCore::<i32, &str>::new(false);
    let (a, a_log, _a) = probe(Demand::Unlimited, Demand::NONE);
    let (b, b_log, _b) = probe(Demand::max(1), Demand::NONE);
    core.subscribe(a, None);
    core.subscribe(b, None);

    assert_eq!(core.send(1), Ok(2));
    assert_eq!(core.send(2), Ok(1));
    assert_eq!(*a_log.borrow(), vec!["1", "2"]);
    assert_eq!(*b_log.borrow(), vec!["1"]);
  }

  #[rxcombine_macro::test]
  fn retained_value_waits_for_demand() {
    let core = SubjectCore::<i32, &str>::new(true);
    let (a, log, sub) = probe(Demand::NONE, Demand::NONE);
    core.subscribe(a, Some(0));
    core.send(1).unwrap();
    core.send(2).unwrap();
    assert!(log.borrow().is_empty());

    sub.borrow().clone().unwrap().request(Demand::max(1));
    assert_eq!(*log.borrow(), vec!["2"]);
  }

  #[rxcombine_macro::test]
  fn completion_is_terminal() {
    let core = SubjectCore::<i32, &str>::new(false);
    let (a, log, _sub) = probe(Demand::Unlimited, Demand::NONE);
    core.subscribe(a, None);

    assert_eq!(core.send_completion(Completion::Failure("e")), Ok(()));
    assert_eq!(core.send_completion(Completion::Finished), Err(Error::SubjectCompleted));
    assert_eq!(core.send(1), Err(Error::SubjectCompleted));
    assert_eq!(core.subscriber_count(), 0);
    assert_eq!(*log.borrow(), vec!["Failure(\"e\")"]);

    let (late, late_log, _late) = probe(Demand::NONE, Demand::NONE);
    core.subscribe(late, None);
    assert_eq!(*late_log.borrow(), vec!["Failure(\"e\")"]);
  }

  #[rxcombine_macro::test]
  fn cancel_removes_subscriber() {
    let core = SubjectCore::<i32, &str>::new(false);
    let (a, log, sub) = probe(Demand::Unlimited, Demand::NONE);
    core.subscribe(a, None);
    core.send(1).unwrap();

    let subscription = sub.borrow_mut().take().unwrap();
    subscription.cancel();
    subscription.cancel();
    assert_eq!(core.subscriber_count(), 0);
    assert_eq!(core.send(2), Ok(0));
    assert_eq!(*log.borrow(), vec!["1"]);
  }

  #[derive(Default)]
  struct Upstream {
    requested: RefCell<Vec<Demand>>,
    cancelled: RefCell<usize>,
  }

  impl Subscription for Rc<Upstream> {
    fn request(&self, demand: Demand) { self.requested.borrow_mut().push(demand); }

    fn cancel(&self) { *self.cancelled.borrow_mut() += 1; }
  }

  #[rxcombine_macro::test]
  fn completion_cancels_upstreams() {
    let core = SubjectCore::<i32, &str>::new(false);
    let upstream = Rc::new(Upstream::default());
    core.attach_upstream(BoxedSubscription::new(upstream.clone()));
    assert_eq!(*upstream.requested.borrow(), vec![Demand::Unlimited]);
    assert_eq!(*upstream.cancelled.borrow(), 0);

    core.send_completion(Completion::Finished).unwrap();
    assert_eq!(*upstream.cancelled.borrow(), 1);

    let late = Rc::new(Upstream::default());
    core.attach_upstream(BoxedSubscription::new(late.clone()));
    assert!(late.requested.borrow().is_empty());
    assert_eq!(*late.cancelled.borrow(), 1);
  }
}
