use crate::{
  publisher::Publisher,
  subscriber::{Completion, Demand, Subscriber},
  subscription::{BoxedSubscription, Subscription},
};

/// TryMap operator: a map whose closure may fail. A failure cancels the
/// upstream and terminates the stream with that error.
#[derive(Clone)]
pub struct TryMap<S, F> {
  pub source: S,
  pub func: F,
}

pub struct TryMapSubscriber<O, F> {
  downstream: O,
  func: F,
  upstream: Option<BoxedSubscription>,
  done: bool,
}

impl<O, F, Item, B, Err> Subscriber<Item, Err> for TryMapSubscriber<O, F>
where
  O: Subscriber<B, Err>,
  F: FnMut(Item) -> Result<B, Err>,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.upstream = Some(subscription.clone());
    self.downstream.receive_subscription(subscription)
  }

  fn receive(&mut self, value: Item) -> Demand {
    if self.done {
      return Demand::NONE;
    }
    match (self.func)(value) {
      Ok(value) => self.downstream.receive(value),
      Err(err) => {
        self.done = true;
        if let Some(upstream) = self.upstream.take() {
          upstream.cancel();
        }
        self.downstream.receive_completion(Completion::Failure(err));
        Demand::NONE
      }
    }
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    self.upstream = None;
    if !self.done {
      self.done = true;
      self.downstream.receive_completion(completion)
    }
  }
}

impl<S, F, B> Publisher for TryMap<S, F>
where
  S: Publisher,
  F: FnMut(S::Output) -> Result<B, S::Failure> + 'static,
  B: 'static,
{
  type Output = B;
  type Failure = S::Failure;

  fn subscribe<O>(self, subscriber: O)
  where
    O: Subscriber<B, S::Failure> + 'static,
  {
    let TryMap { source, func } = self;
    source.subscribe(TryMapSubscriber { downstream: subscriber, func, upstream: None, done: false })
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[derive(Debug, Clone, PartialEq)]
  enum ParseError {
    NotANumber(String),
  }

  #[rxcombine_macro::test]
  fn error_terminates_and_cancels() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let v_log = log.clone();
    let pulled = Rc::new(RefCell::new(0));
    let c_pulled = pulled.clone();

    let _c = from_iter(["1", "2", "x", "4"])
      .handle_events(EventHooks::default().on_output(move |_| *c_pulled.borrow_mut() += 1))
      .set_failure_type::<ParseError>()
      .try_map(|s| s.parse::<i32>().map_err(|_| ParseError::NotANumber(s.to_string())))
      .sink(
        move |c| c_log.borrow_mut().push(format!("{c:?}")),
        move |v| v_log.borrow_mut().push(v.to_string()),
      );

    assert_eq!(*log.borrow(), vec!["1", "2", "Failure(NotANumber(\"x\"))"]);
    assert_eq!(*pulled.borrow(), 3);
  }

  #[rxcombine_macro::test]
  fn all_ok_finishes() {
    let values = Rc::new(RefCell::new(vec![]));
    let c_values = values.clone();
    let done = Rc::new(RefCell::new(false));
    let c_done = done.clone();
    let _c = from_iter(1..=3)
      .set_failure_type::<String>()
      .try_map(|v| Ok(v * 2))
      .sink(move |c| *c_done.borrow_mut() = c.is_finished(), move |v| c_values.borrow_mut().push(v));
    assert_eq!(*values.borrow(), vec![2, 4, 6]);
    assert!(*done.borrow());
  }
}
