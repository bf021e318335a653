use std::{cell::RefCell, convert::Infallible, rc::Rc};

use super::sink::SubscriptionSlot;
use crate::{
  subject::CurrentValueSubject,
  subscriber::{Completion, Demand, Subscriber},
  subscription::{AnyCancellable, BoxedSubscription, Subscription},
};

/// Writes every received value into a shared target through `setter`.
///
/// Only publishers that cannot fail can be assigned; a completion just
/// releases the subscription.
pub struct Assign<T, F> {
  target: Rc<RefCell<T>>,
  setter: F,
  slot: SubscriptionSlot,
}

impl<T, F> Assign<T, F> {
  pub fn new(target: Rc<RefCell<T>>, setter: F) -> Self {
    Self { target, setter, slot: SubscriptionSlot::default() }
  }

  pub fn cancellable(&self) -> AnyCancellable { self.slot.cancellable() }
}

impl<Item, T, F> Subscriber<Item, Infallible> for Assign<T, F>
where
  F: FnMut(&mut T, Item),
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.slot.hold(subscription.clone());
    subscription.request(Demand::Unlimited);
  }

  fn receive(&mut self, value: Item) -> Demand {
    (self.setter)(&mut self.target.borrow_mut(), value);
    Demand::NONE
  }

  fn receive_completion(&mut self, _: Completion<Infallible>) { self.slot.release(); }
}

/// Republishes every value into a current-value subject. The subject's own
/// subscribers are not completed when the upstream finishes.
pub struct AssignTo<Item> {
  subject: CurrentValueSubject<Item, Infallible>,
}

impl<Item> AssignTo<Item> {
  pub fn new(subject: CurrentValueSubject<Item, Infallible>) -> Self { Self { subject } }
}

impl<Item: Clone + 'static> Subscriber<Item, Infallible> for AssignTo<Item> {
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    subscription.request(Demand::Unlimited);
  }

  fn receive(&mut self, value: Item) -> Demand {
    self.subject.send(value);
    Demand::NONE
  }

  fn receive_completion(&mut self, _: Completion<Infallible>) {}
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use crate::prelude::*;

  #[derive(Default)]
  struct Label {
    text: String,
  }

  #[rxcombine_macro::test]
  fn assign_writes_target() {
    let label = Rc::new(RefCell::new(Label::default()));
    let subject = PassthroughSubject::<i32, Infallible>::new();

    let cancellable = subject
      .clone()
      .map(|v| format!("value {v}"))
      .assign(label.clone(), |label, text| label.text = text);

    subject.send(1);
    assert_eq!(label.borrow().text, "value 1");
    subject.send(2);
    assert_eq!(label.borrow().text, "value 2");

    drop(cancellable);
    subject.send(3);
    assert_eq!(label.borrow().text, "value 2");
  }

  #[rxcombine_macro::test]
  fn assign_to_republishes() {
    let target = CurrentValueSubject::<i32, Infallible>::new(0);
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    let _c = target.clone().sink_value(move |v| c_seen.borrow_mut().push(v));

    from_iter(1..=3).assign_to(target.clone());

    assert_eq!(*seen.borrow(), vec![0, 1, 2, 3]);
    assert_eq!(target.value(), 3);
    assert!(!target.is_completed());
  }
}
