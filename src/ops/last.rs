use super::relay::{Relay, UpstreamDemand};
use crate::{
  publisher::Publisher,
  subscriber::{Completion, Demand, Subscriber},
  subscription::BoxedSubscription,
};

/// Last operator: consumes the whole upstream and emits the last value
/// matching the predicate once the upstream finishes. A failure discards the
/// candidate.
#[derive(Clone)]
pub struct Last<S, F> {
  pub source: S,
  pub predicate: F,
}

pub struct LastSubscriber<O, F, Item, Err> {
  relay: Relay<O, Item, Err>,
  predicate: F,
  last: Option<Item>,
}

impl<O, F, Item, Err> Subscriber<Item, Err> for LastSubscriber<O, F, Item, Err>
where
  O: Subscriber<Item, Err> + 'static,
  F: FnMut(&Item) -> bool,
  Item: 'static,
  Err: 'static,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.relay.attach(subscription)
  }

  fn receive(&mut self, value: Item) -> Demand {
    if (self.predicate)(&value) {
      self.last = Some(value);
    }
    Demand::NONE
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    match completion {
      Completion::Finished => self.relay.finish(self.last.take(), Completion::Finished),
      failure => {
        self.last = None;
        self.relay.finish(None, failure)
      }
    }
  }
}

impl<S, F> Publisher for Last<S, F>
where
  S: Publisher,
  F: FnMut(&S::Output) -> bool + 'static,
{
  type Output = S::Output;
  type Failure = S::Failure;

  fn subscribe<O>(self, subscriber: O)
  where
    O: Subscriber<S::Output, S::Failure> + 'static,
  {
    let Last { source, predicate } = self;
    let relay = Relay::new(subscriber, UpstreamDemand::Unlimited);
    source.subscribe(LastSubscriber { relay, predicate, last: None })
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use crate::prelude::*;

  #[rxcombine_macro::test]
  fn last_match_after_completion() {
    let subject = PassthroughSubject::<i32, Infallible>::new();
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let v_log = log.clone();
    let _c = subject.clone().last_where(|v| v % 2 == 0).sink(
      move |c| c_log.borrow_mut().push(format!("{c:?}")),
      move |v| v_log.borrow_mut().push(v.to_string()),
    );

    for v in 1..=9 {
      subject.send(v);
    }
    assert!(log.borrow().is_empty());

    subject.send_completion(Completion::Finished);
    assert_eq!(*log.borrow(), vec!["8", "Finished"]);
  }

  #[rxcombine_macro::test]
  fn no_match_only_completes() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let v_log = log.clone();
    let _c = from_iter([1, 3]).last_where(|v| v % 2 == 0).sink(
      move |c| c_log.borrow_mut().push(format!("{c:?}")),
      move |v| v_log.borrow_mut().push(v.to_string()),
    );
    assert_eq!(*log.borrow(), vec!["Finished"]);
  }

  #[rxcombine_macro::test]
  fn failure_drops_candidate() {
    let subject = PassthroughSubject::<i32, &str>::new();
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let v_log = log.clone();
    let _c = subject.clone().last().sink(
      move |c| c_log.borrow_mut().push(format!("{c:?}")),
      move |v| v_log.borrow_mut().push(v.to_string()),
    );
    subject.send(1);
    subject.send_completion(Completion::Failure("late"));
    assert_eq!(*log.borrow(), vec!["Failure(\"late\")"]);
  }

  /// Requests nothing until told to.
  struct Lazy(Rc<RefCell<Vec<i32>>>, Rc<RefCell<Option<BoxedSubscription>>>);

  impl Subscriber<i32, Infallible> for Lazy {
    fn receive_subscription(&mut self, subscription: BoxedSubscription) {
      *self.1.borrow_mut() = Some(subscription);
    }

    fn receive(&mut self, value: i32) -> Demand {
      self.0.borrow_mut().push(value);
      Demand::NONE
    }

    fn receive_completion(&mut self, _: Completion<Infallible>) { self.0.borrow_mut().push(-1); }
  }

  #[rxcombine_macro::test]
  fn trailing_value_waits_for_demand() {
    let values = Rc::new(RefCell::new(vec![]));
    let subscription = Rc::new(RefCell::new(None));
    from_iter(1..=3)
      .last()
      .subscribe(Lazy(values.clone(), subscription.clone()));
    assert!(values.borrow().is_empty());

    let sub = subscription.borrow_mut().take().unwrap();
    sub.request(Demand::max(1));
    assert_eq!(*values.borrow(), vec![3, -1]);
  }
}
