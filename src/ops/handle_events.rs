//! HandleEvents operator
//!
//! Runs side effects on every lifecycle event of a subscription without
//! changing the values or the terminal signal that flow through it.
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxcombine::prelude::*;
//!
//! let seen = Rc::new(RefCell::new(vec![]));
//! let c_seen = seen.clone();
//! let _c = from_iter([1, 2])
//!   .handle_events(EventHooks::default().on_output(move |v| c_seen.borrow_mut().push(*v)))
//!   .sink_value(|_| {});
//! assert_eq!(*seen.borrow(), vec![1, 2]);
//! ```

use std::rc::Rc;

use crate::{
  publisher::Publisher,
  subscriber::{Completion, Demand, Subscriber},
  subscription::{BoxedSubscription, Subscription},
};

/// The side effects run by [`HandleEvents`]. Every hook is optional.
pub struct EventHooks<Item, Err> {
  subscription: Option<Rc<dyn Fn()>>,
  output: Option<Rc<dyn Fn(&Item)>>,
  completion: Option<Rc<dyn Fn(&Completion<Err>)>>,
  cancel: Option<Rc<dyn Fn()>>,
  request: Option<Rc<dyn Fn(Demand)>>,
}

impl<Item, Err> Default for EventHooks<Item, Err> {
  fn default() -> Self {
    Self { subscription: None, output: None, completion: None, cancel: None, request: None }
  }
}

impl<Item, Err> Clone for EventHooks<Item, Err> {
  fn clone(&self) -> Self {
    Self {
      subscription: self.subscription.clone(),
      output: self.output.clone(),
      completion: self.completion.clone(),
      cancel: self.cancel.clone(),
      request: self.request.clone(),
    }
  }
}

impl<Item, Err> EventHooks<Item, Err> {
  /// Called when the upstream hands over its subscription.
  pub fn on_subscription(mut self, hook: impl Fn() + 'static) -> Self {
    self.subscription = Some(Rc::new(hook));
    self
  }

  /// Called with every value before it is passed on.
  pub fn on_output(mut self, hook: impl Fn(&Item) + 'static) -> Self {
    self.output = Some(Rc::new(hook));
    self
  }

  /// Called with the terminal signal before it is passed on.
  pub fn on_completion(mut self, hook: impl Fn(&Completion<Err>) + 'static) -> Self {
    self.completion = Some(Rc::new(hook));
    self
  }

  /// Called when the downstream cancels.
  pub fn on_cancel(mut self, hook: impl Fn() + 'static) -> Self {
    self.cancel = Some(Rc::new(hook));
    self
  }

  /// Called with every demand the downstream requests explicitly.
  pub fn on_request(mut self, hook: impl Fn(Demand) + 'static) -> Self {
    self.request = Some(Rc::new(hook));
    self
  }
}

pub struct HandleEvents<S: Publisher> {
  pub source: S,
  pub hooks: EventHooks<S::Output, S::Failure>,
}

impl<S: Publisher + Clone> Clone for HandleEvents<S> {
  fn clone(&self) -> Self { Self { source: self.source.clone(), hooks: self.hooks.clone() } }
}

pub struct HandleEventsSubscriber<O, Item, Err> {
  downstream: O,
  hooks: EventHooks<Item, Err>,
}

impl<O, Item, Err> Subscriber<Item, Err> for HandleEventsSubscriber<O, Item, Err>
where
  O: Subscriber<Item, Err>,
  Item: 'static,
  Err: 'static,
{
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    if let Some(hook) = &self.hooks.subscription {
      hook();
    }
    let subscription = EventsSubscription {
      upstream: subscription,
      cancel: self.hooks.cancel.clone(),
      request: self.hooks.request.clone(),
    };
    self
      .downstream
      .receive_subscription(BoxedSubscription::new(subscription))
  }

  fn receive(&mut self, value: Item) -> Demand {
    if let Some(hook) = &self.hooks.output {
      hook(&value);
    }
    self.downstream.receive(value)
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    if let Some(hook) = &self.hooks.completion {
      hook(&completion);
    }
    self.downstream.receive_completion(completion)
  }
}

struct EventsSubscription {
  upstream: BoxedSubscription,
  cancel: Option<Rc<dyn Fn()>>,
  request: Option<Rc<dyn Fn(Demand)>>,
}

impl Subscription for EventsSubscription {
  fn request(&self, demand: Demand) {
    if let Some(hook) = &self.request {
      hook(demand);
    }
    self.upstream.request(demand)
  }

  fn cancel(&self) {
    if let Some(hook) = &self.cancel {
      hook();
    }
    self.upstream.cancel()
  }
}

impl<S: Publisher> Publisher for HandleEvents<S> {
  type Output = S::Output;
  type Failure = S::Failure;

  fn subscribe<O>(self, subscriber: O)
  where
    O: Subscriber<S::Output, S::Failure> + 'static,
  {
    let HandleEvents { source, hooks } = self;
    source.subscribe(HandleEventsSubscriber { downstream: subscriber, hooks })
  }
}
