use super::{BoxedSubscription, Subscription};
use crate::{
  rc::MutRc,
  subscriber::{Completion, Demand, Subscriber},
};

/// A pull-based value source that the source publishers are built on.
///
/// [`ProducerSubscription`] asks for the next value only while the subscriber
/// has outstanding demand, and asks for the completion before every pull, so a
/// producer that has nothing left never needs demand to terminate.
pub trait Producer: 'static {
  type Item;
  type Err;

  /// The next value. Only called after [`completion`](Self::completion)
  /// returned `None`.
  fn next_value(&mut self) -> Option<Self::Item>;

  /// `Some` once the producer is exhausted or failed.
  fn completion(&mut self) -> Option<Completion<Self::Err>>;

  /// The subscription was cancelled before the producer completed.
  fn cancelled(&mut self) {}
}

struct ProducerState<P, S> {
  producer: P,
  subscriber: Option<S>,
  demand: Demand,
  draining: bool,
  closed: bool,
}

/// The subscription handed out by every synchronous source publisher.
///
/// It owns the subscriber while the link is open and drops it on completion or
/// cancellation. Values are pushed from `request` (and from the subscriber's
/// returned demand) in a loop; a `request` issued from inside a delivery only
/// raises the demand, the running loop picks it up.
pub struct ProducerSubscription<P, S>(MutRc<ProducerState<P, S>>);

impl<P, S> Clone for ProducerSubscription<P, S> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<P, S> ProducerSubscription<P, S>
where
  P: Producer,
  S: Subscriber<P::Item, P::Err> + 'static,
{
  /// Hand a new subscription to `subscriber`, then push whatever it asked for.
  pub fn start(producer: P, subscriber: S) -> Self {
    let this = Self(MutRc::own(ProducerState {
      producer,
      subscriber: None,
      demand: Demand::NONE,
      draining: true,
      closed: false,
    }));

    let mut subscriber = subscriber;
    subscriber.receive_subscription(BoxedSubscription::new(this.clone()));
    let dropped = {
      let mut state = this.0.rc_deref_mut();
      state.draining = false;
      if state.closed {
        Some(subscriber)
      } else {
        state.subscriber = Some(subscriber);
        None
      }
    };
    drop(dropped);

    this.drain();
    this
  }

  pub(crate) fn is_closed(&self) -> bool { self.0.rc_deref().closed }

  pub(crate) fn drain(&self) {
    {
      let mut state = self.0.rc_deref_mut();
      if state.draining || state.closed {
        return;
      }
      state.draining = true;
    }

    loop {
      let mut state = self.0.rc_deref_mut();
      if state.closed {
        state.draining = false;
        return;
      }

      if let Some(completion) = state.producer.completion() {
        state.closed = true;
        state.draining = false;
        let subscriber = state.subscriber.take();
        drop(state);
        if let Some(mut subscriber) = subscriber {
          subscriber.receive_completion(completion);
        }
        return;
      }

      if state.demand.is_none() {
        state.draining = false;
        return;
      }

      let Some(value) = state.producer.next_value() else {
        // Nothing available yet; a later wake-up resumes the drain.
        state.draining = false;
        return;
      };
      state.demand.consume_one();
      let Some(mut subscriber) = state.subscriber.take() else {
        state.draining = false;
        return;
      };
      drop(state);

      let more = subscriber.receive(value);

      let mut state = self.0.rc_deref_mut();
      if state.closed {
        state.draining = false;
        drop(state);
        drop(subscriber);
        return;
      }
      state.demand += more;
      state.subscriber = Some(subscriber);
    }
  }
}

impl<P, S> Subscription for ProducerSubscription<P, S>
where
  P: Producer,
  S: Subscriber<P::Item, P::Err> + 'static,
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
    let subscriber = {
      let mut state = self.0.rc_deref_mut();
      if state.closed {
        return;
      }
      state.closed = true;
      state.producer.cancelled();
      state.subscriber.take()
    };
    drop(subscriber);
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use super::*;

  struct Counter {
    next: i32,
    end: i32,
  }

  impl Producer for Counter {
    type Item = i32;
    type Err = Infallible;

    fn next_value(&mut self) -> Option<i32> {
      let v = self.next;
      self.next += 1;
      Some(v)
    }

    fn completion(&mut self) -> Option<Completion<Infallible>> {
      (self.next >= self.end).then_some(Completion::Finished)
    }
  }

  /// Records values and keeps its subscription for the test to drive.
  struct Manual {
    values: Rc<RefCell<Vec<i32>>>,
    done: Rc<RefCell<bool>>,
    subscription: Rc<RefCell<Option<BoxedSubscription>>>,
    reply: Demand,
  }

  impl Subscriber<i32, Infallible> for Manual {
    fn receive_subscription(&mut self, subscription: BoxedSubscription) {
      *self.subscription.borrow_mut() = Some(subscription);
    }

    fn receive(&mut self, value: i32) -> Demand {
      self.values.borrow_mut().push(value);
      self.reply
    }

    fn receive_completion(&mut self, _: Completion<Infallible>) { *self.done.borrow_mut() = true; }
  }

  type Probe = (Manual, Rc<RefCell<Vec<i32>>>, Rc<RefCell<bool>>, Rc<RefCell<Option<BoxedSubscription>>>);

  fn manual(reply: Demand) -> Probe {
    let values = Rc::new(RefCell::new(vec![]));
    let done = Rc::new(RefCell::new(false));
    let subscription = Rc::new(RefCell::new(None));
    let m = Manual {
      values: values.clone(),
      done: done.clone(),
      subscription: subscription.clone(),
      reply,
    };
    (m, values, done, subscription)
  }

  #[rxcombine_macro::test]
  fn delivers_only_requested() {
    let (m, values, done, subscription) = manual(Demand::NONE);
    ProducerSubscription::start(Counter { next: 0, end: 10 }, m);
    assert!(values.borrow().is_empty());

    let sub = subscription.borrow().clone().unwrap();
    sub.request(Demand::max(2));
    assert_eq!(*values.borrow(), vec![0, 1]);
    sub.request(Demand::NONE);
    sub.request(Demand::max(3));
    assert_eq!(*values.borrow(), vec![0, 1, 2, 3, 4]);
    assert!(!*done.borrow());

    sub.request(Demand::Unlimited);
    assert_eq!(values.borrow().len(), 10);
    assert!(*done.borrow());
  }

  #[rxcombine_macro::test]
  fn returned_demand_accumulates() {
    let (m, values, done, subscription) = manual(Demand::max(1));
    ProducerSubscription::start(Counter { next: 0, end: 3 }, m);
    subscription.borrow().clone().unwrap().request(Demand::max(1));
    assert_eq!(*values.borrow(), vec![0, 1, 2]);
    assert!(*done.borrow());
  }

  #[rxcombine_macro::test]
  fn empty_completes_without_demand() {
    let (m, values, done, _subscription) = manual(Demand::NONE);
    ProducerSubscription::start(Counter { next: 0, end: 0 }, m);
    assert!(values.borrow().is_empty());
    assert!(*done.borrow());
  }

  #[rxcombine_macro::test]
  fn cancel_stops_delivery() {
    let (m, values, done, subscription) = manual(Demand::NONE);
    ProducerSubscription::start(Counter { next: 0, end: 10 }, m);
    let sub = subscription.borrow().clone().unwrap();
    sub.request(Demand::max(1));
    sub.cancel();
    sub.cancel();
    sub.request(Demand::Unlimited);
    assert_eq!(*values.borrow(), vec![0]);
    assert!(!*done.borrow());
  }

  struct CancelOnSecond(Rc<RefCell<Vec<i32>>>, Option<BoxedSubscription>);

  impl Subscriber<i32, Infallible> for CancelOnSecond {
    fn receive_subscription(&mut self, subscription: BoxedSubscription) {
      subscription.request(Demand::Unlimited);
      self.1 = Some(subscription);
    }

    fn receive(&mut self, value: i32) -> Demand {
      self.0.borrow_mut().push(value);
      if value == 1 {
        if let Some(sub) = &self.1 {
          sub.cancel();
        }
      }
      Demand::NONE
    }

    fn receive_completion(&mut self, _: Completion<Infallible>) {
      unreachable!("cancelled subscriber must not complete");
    }
  }

  #[rxcombine_macro::test]
  fn cancel_from_inside_receive() {
    let values = Rc::new(RefCell::new(vec![]));
    let subscriber = CancelOnSecond(values.clone(), None);
    ProducerSubscription::start(Counter { next: 0, end: 10 }, subscriber);
    assert_eq!(*values.borrow(), vec![0, 1]);
  }
}
