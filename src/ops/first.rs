use crate::{
  publisher::Publisher,
  subscriber::{Completion, Demand, Subscriber},
  subscription::{BoxedSubscription, Subscription},
};

/// First operator: delivers the first value matching the predicate, then
/// finishes and cancels the upstream.
#[derive(Clone)]
pub struct First<S, F> {
  pub source: S,
  pub predicate: F,
}

pub struct FirstSubscriber<O, F> {
  downstream: O,
  predicate: F,
  upstream: Option<BoxedSubscription>,
  done: bool,
}

impl<O, F, Item, Err> Subscriber<Item, Err> for FirstSubscriber<O, F>
where
  O: Subscriber<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.upstream = Some(subscription.clone());
    self.downstream.receive_subscription(subscription)
  }

  fn receive(&mut self, value: Item) -> Demand {
    if self.done {
      return Demand::NONE;
    }
    if !(self.predicate)(&value) {
      return Demand::max(1);
    }

    self.done = true;
    if let Some(upstream) = self.upstream.take() {
      upstream.cancel();
    }
    self.downstream.receive(value);
    self.downstream.receive_completion(Completion::Finished);
    Demand::NONE
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    self.upstream = None;
    if !self.done {
      self.done = true;
      self.downstream.receive_completion(completion)
    }
  }
}

impl<S, F> Publisher for First<S, F>
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
    let First { source, predicate } = self;
    source.subscribe(FirstSubscriber { downstream: subscriber, predicate, upstream: None, done: false })
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxcombine_macro::test]
  fn first_match_then_finish() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let v_log = log.clone();
    let p_log = log.clone();

    let _c = from_iter(1..=9)
      .handle_events(EventHooks::default().on_output(move |v| p_log.borrow_mut().push(format!("pulled {v}"))))
      .first_where(|v| v % 2 == 0)
      .sink(
        move |c| c_log.borrow_mut().push(format!("{c:?}")),
        move |v| v_log.borrow_mut().push(v.to_string()),
      );

    assert_eq!(*log.borrow(), vec!["pulled 1", "pulled 2", "2", "Finished"]);
  }

  #[rxcombine_macro::test]
  fn no_match_forwards_completion() {
    let done = Rc::new(RefCell::new(false));
    let c_done = done.clone();
    let _c = from_iter([1, 3, 5])
      .first_where(|v| v % 2 == 0)
      .sink(move |c| *c_done.borrow_mut() = c.is_finished(), |_| unreachable!());
    assert!(*done.borrow());
  }

  #[rxcombine_macro::test]
  fn first_of_subject() {
    let subject = PassthroughSubject::<i32, std::convert::Infallible>::new();
    let values = Rc::new(RefCell::new(vec![]));
    let c_values = values.clone();
    let _c = subject.clone().first().sink_value(move |v| c_values.borrow_mut().push(v));

    subject.send(7);
    subject.send(8);
    assert_eq!(*values.borrow(), vec![7]);
    assert_eq!(subject.subscriber_count(), 0);
  }
}
