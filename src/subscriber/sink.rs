use crate::{
  rc::MutRc,
  subscriber::{Completion, Demand, Subscriber},
  subscription::{AnyCancellable, BoxedSubscription, Subscription},
};

/// Holds the subscription of a terminal subscriber so that an
/// [`AnyCancellable`] created before the subscription arrives can still
/// cancel it.
///
/// Releasing the slot on completion breaks the cycle between the subscription
/// (which owns the subscriber) and the subscriber (which owns the slot).
#[derive(Clone, Default)]
pub(crate) struct SubscriptionSlot(MutRc<Option<BoxedSubscription>>);

impl SubscriptionSlot {
  pub(crate) fn hold(&self, subscription: BoxedSubscription) {
    let old = self.0.rc_deref_mut().replace(subscription);
    drop(old);
  }

  pub(crate) fn release(&self) {
    let old = self.0.rc_deref_mut().take();
    drop(old);
  }

  pub(crate) fn cancellable(&self) -> AnyCancellable {
    let slot = self.clone();
    AnyCancellable::new(move || {
      let subscription = slot.0.rc_deref_mut().take();
      if let Some(subscription) = subscription {
        subscription.cancel();
      }
    })
  }
}

/// The general purpose subscriber: requests unlimited demand up front and
/// hands every event to a closure.
///
/// Usually created through [`sink`](crate::ops::PublisherExt::sink) or
/// [`sink_value`](crate::ops::PublisherExt::sink_value), which also return
/// the [`AnyCancellable`] controlling it.
pub struct Sink<FC, FV> {
  on_completion: Option<FC>,
  on_value: FV,
  slot: SubscriptionSlot,
}

impl<FC, FV> Sink<FC, FV> {
  pub fn new(on_completion: FC, on_value: FV) -> Self {
    Self { on_completion: Some(on_completion), on_value, slot: SubscriptionSlot::default() }
  }

  /// A token cancelling this sink's subscription, now or once it arrives.
  pub fn cancellable(&self) -> AnyCancellable { self.slot.cancellable() }
}

impl<Item, Err, FC, FV> Subscriber<Item, Err> for Sink<FC, FV>
where
  FC: FnOnce(Completion<Err>),
  FV: FnMut(Item),
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    self.slot.hold(subscription.clone());
    subscription.request(Demand::Unlimited);
  }

  fn receive(&mut self, value: Item) -> Demand {
    (self.on_value)(value);
    Demand::NONE
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    self.slot.release();
    if let Some(on_completion) = self.on_completion.take() {
      on_completion(completion);
    }
  }
}
