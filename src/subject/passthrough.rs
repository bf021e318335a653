use super::subscribers::SubjectCore;
use crate::{
  error::Error,
  publisher::Publisher,
  subscriber::{Completion, Demand, Subscriber},
  subscription::BoxedSubscription,
};

/// A subject that broadcasts values without keeping any of them.
///
/// A value reaches every attached subscriber that has outstanding demand;
/// subscribers without demand, and subscribers that attach later, miss it.
///
/// ```rust
/// use std::{cell::RefCell, convert::Infallible, rc::Rc};
///
/// use rxcombine::prelude::*;
///
/// let subject = PassthroughSubject::<&str, Infallible>::new();
/// let received = Rc::new(RefCell::new(vec![]));
/// let c_received = received.clone();
///
/// subject.send("missed");
/// let _c = subject.clone().sink_value(move |v| c_received.borrow_mut().push(v));
/// subject.send("Hello");
/// subject.send("World");
///
/// assert_eq!(*received.borrow(), vec!["Hello", "World"]);
/// ```
pub struct PassthroughSubject<Item, Err> {
  core: SubjectCore<Item, Err>,
}

impl<Item, Err> Clone for PassthroughSubject<Item, Err> {
  fn clone(&self) -> Self { Self { core: self.core.clone() } }
}

impl<Item, Err> PassthroughSubject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  pub fn new() -> Self { Self { core: SubjectCore::new(false) } }

  /// Broadcast `value`. Does nothing once the subject has completed.
  pub fn send(&self, value: Item) { let _ = self.core.send(value); }

  /// Broadcast the terminal signal. Only the first call has an effect.
  pub fn send_completion(&self, completion: Completion<Err>) {
    let _ = self.core.send_completion(completion);
  }

  /// Like [`send`](Self::send), but reports a send after completion and
  /// returns how many subscribers received the value.
  pub fn try_send(&self, value: Item) -> Result<usize, Error> { self.core.send(value) }

  pub fn try_send_completion(&self, completion: Completion<Err>) -> Result<(), Error> {
    self.core.send_completion(completion)
  }

  pub fn subscriber_count(&self) -> usize { self.core.subscriber_count() }

  pub fn is_completed(&self) -> bool { self.core.is_completed() }
}

impl<Item, Err> Default for PassthroughSubject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  fn default() -> Self { Self::new() }
}

impl<Item, Err> Publisher for PassthroughSubject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  type Output = Item;
  type Failure = Err;

  fn subscribe<S>(self, subscriber: S)
  where
    S: Subscriber<Item, Err> + 'static,
  {
    self.core.subscribe(Box::new(subscriber), None)
  }
}

impl<Item, Err> Subscriber<Item, Err> for PassthroughSubject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) { self.core.attach_upstream(subscription); }

  fn receive(&mut self, value: Item) -> Demand {
    self.send(value);
    Demand::NONE
  }

  fn receive_completion(&mut self, completion: Completion<Err>) { self.send_completion(completion); }
}
