//! Values bridge
//!
//! Turns a publisher into a `futures::Stream` yielding `Result<Output,
//! Failure>`. The stream pulls lazily: every poll that finds nothing buffered
//! requests exactly one more value, so a slow consumer never makes the
//! publisher produce ahead of it.
//!
//! - `Ok(value)` for each value.
//! - `Err(failure)` once if the publisher fails, followed by the end of the
//!   stream.
//! - `None` after the publisher finishes.
//!
//! Dropping the stream cancels the subscription.
//!
//! ```rust
//! use futures::StreamExt;
//! use rxcombine::prelude::*;
//!
//! let values = futures::executor::block_on(from_iter(1..=3).values().collect::<Vec<_>>());
//! assert_eq!(values, vec![Ok(1), Ok(2), Ok(3)]);
//! ```

use std::{
  collections::VecDeque,
  pin::Pin,
  task::{Context, Poll, Waker},
};

use futures::Stream;

use crate::{
  publisher::Publisher,
  rc::MutRc,
  subscriber::{Completion, Demand, Subscriber},
  subscription::{BoxedSubscription, Subscription},
};

struct ValuesState<Item, Err> {
  subscription: Option<BoxedSubscription>,
  queue: VecDeque<Result<Item, Err>>,
  finished: bool,
  /// A value was requested and has not arrived yet.
  requested: bool,
  waker: Option<Waker>,
}

/// A `Stream` of the values of a publisher. Created by
/// [`values`](crate::ops::PublisherExt::values).
pub struct Values<Item, Err> {
  state: MutRc<ValuesState<Item, Err>>,
}

impl<Item: 'static, Err: 'static> Values<Item, Err> {
  pub fn new<P>(publisher: P) -> Self
  where
    P: Publisher<Output = Item, Failure = Err>,
  {
    let state = MutRc::own(ValuesState {
      subscription: None,
      queue: VecDeque::new(),
      finished: false,
      requested: false,
      waker: None,
    });
    publisher.subscribe(ValuesSubscriber { state: state.clone() });
    Values { state }
  }
}

impl<Item, Err> Values<Item, Err> {
  fn pop(&self) -> Poll<Option<Result<Item, Err>>> {
    let mut state = self.state.rc_deref_mut();
    if let Some(item) = state.queue.pop_front() {
      Poll::Ready(Some(item))
    } else if state.finished {
      Poll::Ready(None)
    } else {
      Poll::Pending
    }
  }
}

impl<Item, Err> Stream for Values<Item, Err> {
  type Item = Result<Item, Err>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    if let Poll::Ready(item) = self.pop() {
      return Poll::Ready(item);
    }

    let subscription = {
      let mut state = self.state.rc_deref_mut();
      state.waker = Some(cx.waker().clone());
      if state.requested {
        None
      } else {
        state.requested = true;
        state.subscription.clone()
      }
    };
    // A synchronous publisher may deliver right here.
    if let Some(subscription) = subscription {
      subscription.request(Demand::max(1));
    }
    self.pop()
  }
}

impl<Item, Err> Drop for Values<Item, Err> {
  fn drop(&mut self) {
    let subscription = {
      let mut state = self.state.rc_deref_mut();
      state.finished = true;
      state.subscription.take()
    };
    if let Some(subscription) = subscription {
      subscription.cancel();
    }
  }
}

struct ValuesSubscriber<Item, Err> {
  state: MutRc<ValuesState<Item, Err>>,
}

impl<Item, Err> ValuesSubscriber<Item, Err> {
  fn wake(&self) {
    let waker = self.state.rc_deref_mut().waker.take();
    if let Some(waker) = waker {
      waker.wake();
    }
  }
}

impl<Item, Err> Subscriber<Item, Err> for ValuesSubscriber<Item, Err> {
  fn receive_subscription(&mut self, subscription: BoxedSubscription) {
    let mut state = self.state.rc_deref_mut();
    if state.finished {
      drop(state);
      subscription.cancel();
    } else {
      state.subscription = Some(subscription);
    }
  }

  fn receive(&mut self, value: Item) -> Demand {
    {
      let mut state = self.state.rc_deref_mut();
      state.queue.push_back(Ok(value));
      state.requested = false;
    }
    self.wake();
    Demand::NONE
  }

  fn receive_completion(&mut self, completion: Completion<Err>) {
    let subscription = {
      let mut state = self.state.rc_deref_mut();
      if let Completion::Failure(err) = completion {
        state.queue.push_back(Err(err));
      }
      state.finished = true;
      state.subscription.take()
    };
    drop(subscription);
    self.wake();
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use futures::{FutureExt, StreamExt};

  use crate::prelude::*;

  #[rxcombine_macro::test]
  fn collects_synchronous_values() {
    let values = futures::executor::block_on(from_iter(1..=4).map(|v| v * 2).values().collect::<Vec<_>>());
    assert_eq!(values, vec![Ok(2), Ok(4), Ok(6), Ok(8)]);
  }

  #[rxcombine_macro::test]
  fn failure_ends_the_stream() {
    let values = futures::executor::block_on(
      from_iter([1, 2])
        .set_failure_type::<&str>()
        .try_map(|v| if v < 2 { Ok(v) } else { Err("too big") })
        .values()
        .collect::<Vec<_>>(),
    );
    assert_eq!(values, vec![Ok(1), Err("too big")]);
  }

  #[rxcombine_macro::test]
  fn pulls_one_value_per_poll() {
    let pulled = Rc::new(RefCell::new(0));
    let c_pulled = pulled.clone();
    let mut stream = from_iter(1..=100)
      .handle_events(EventHooks::default().on_output(move |_| *c_pulled.borrow_mut() += 1))
      .values();

    futures::executor::block_on(async {
      assert_eq!(stream.next().await, Some(Ok(1)));
      assert_eq!(stream.next().await, Some(Ok(2)));
    });
    assert_eq!(*pulled.borrow(), 2);
  }

  #[rxcombine_macro::test]
  async fn subject_values_arrive_after_send() {
    let subject = PassthroughSubject::<i32, Infallible>::new();
    let mut stream = subject.clone().values();

    assert_eq!(stream.next().now_or_never(), None);
    subject.send(1);
    assert_eq!(stream.next().await, Some(Ok(1)));

    subject.send_completion(Completion::Finished);
    assert_eq!(stream.next().await, None);
  }

  #[rxcombine_macro::test]
  fn dropping_the_stream_cancels() {
    let subject = PassthroughSubject::<i32, Infallible>::new();
    let stream = subject.clone().values();
    assert_eq!(subject.subscriber_count(), 1);
    drop(stream);
    assert_eq!(subject.subscriber_count(), 0);
  }
}
