use super::subscribers::SubjectCore;
use crate::{
  error::Error,
  publisher::Publisher,
  rc::MutRc,
  subscriber::{Completion, Demand, Subscriber},
  subscription::BoxedSubscription,
};

/// A subject that stores its latest value and replays it to new subscribers.
///
/// Every subscriber receives the value current at subscribe time as its first
/// delivery, as soon as it has demand. A subscriber without demand keeps only
/// the newest value it has not received yet.
///
/// ```rust
/// use std::{cell::RefCell, convert::Infallible, rc::Rc};
///
/// use rxcombine::prelude::*;
///
/// let subject = CurrentValueSubject::<i32, Infallible>::new(0);
/// let first = Rc::new(RefCell::new(vec![]));
/// let c_first = first.clone();
/// let _a = subject.clone().sink_value(move |v| c_first.borrow_mut().push(v));
///
/// subject.send(1);
/// subject.send(2);
/// subject.set_value(3);
/// assert_eq!(*first.borrow(), vec![0, 1, 2, 3]);
/// assert_eq!(subject.value(), 3);
///
/// let second = Rc::new(RefCell::new(vec![]));
/// let c_second = second.clone();
/// let _b = subject.clone().sink_value(move |v| c_second.borrow_mut().push(v));
/// assert_eq!(*second.borrow(), vec![3]);
/// ```
pub struct CurrentValueSubject<Item, Err> {
  core: SubjectCore<Item, Err>,
  value: MutRc<Item>,
}

impl<Item, Err> Clone for CurrentValueSubject<Item, Err> {
  fn clone(&self) -> Self { Self { core: self.core.clone(), value: self.value.clone() } }
}

impl<Item, Err> CurrentValueSubject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  pub fn new(value: Item) -> Self { Self { core: SubjectCore::new(true), value: MutRc::own(value) } }

  /// The latest value.
  pub fn value(&self) -> Item { self.value.rc_deref().clone() }

  /// Same as [`send`](Self::send).
  pub fn set_value(&self, value: Item) { self.send(value) }

  /// Store `value` and broadcast it. Does nothing once the subject has
  /// completed.
  pub fn send(&self, value: Item) { let _ = self.try_send(value); }

  pub fn send_completion(&self, completion: Completion<Err>) {
    let _ = self.core.send_completion(completion);
  }

  /// Like [`send`](Self::send), but reports a send after completion and
  /// returns how many subscribers received the value right away.
  pub fn try_send(&self, value: Item) -> Result<usize, Error> {
    if self.core.is_completed() {
      return Err(Error::SubjectCompleted);
    }
    let old = std::mem::replace(&mut *self.value.rc_deref_mut(), value.clone());
    drop(old);
    self.core.send(value)
  }

  pub fn try_send_completion(&self, completion: Completion<Err>) -> Result<(), Error> {
    self.core.send_completion(completion)
  }

  pub fn subscriber_count(&self) -> usize { self.core.subscriber_count() }

  pub fn is_completed(&self) -> bool { self.core.is_completed() }
}

impl<Item, Err> Publisher for CurrentValueSubject<Item, Err>
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
    let current = self.value();
    self.core.subscribe(Box::new(subscriber), Some(current))
  }
}

impl<Item, Err> Subscriber<Item, Err> for CurrentValueSubject<Item, Err>
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
