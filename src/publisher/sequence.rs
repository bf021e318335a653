use std::{convert::Infallible, iter::Peekable};

use crate::{
  publisher::Publisher,
  subscriber::{Completion, Subscriber},
  subscription::{Producer, ProducerSubscription},
};

/// Publishes the values of an iterator, one per unit of demand, and finishes
/// when the iterator is exhausted. Never fails.
///
/// # Examples
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxcombine::prelude::*;
///
/// let received = Rc::new(RefCell::new(vec![]));
/// let c_received = received.clone();
/// let _c = from_iter(0..4).sink_value(move |v| c_received.borrow_mut().push(v));
/// assert_eq!(*received.borrow(), vec![0, 1, 2, 3]);
/// ```
///
/// Or through [`IntoPublisher`]:
///
/// ```rust
/// use rxcombine::prelude::*;
///
/// let _c = vec!["a", "b"].publisher().sink_value(|v| println!("{v}"));
/// ```
pub fn from_iter<I: IntoIterator>(iter: I) -> Sequence<I::IntoIter> { Sequence(iter.into_iter()) }

#[derive(Clone, Debug)]
pub struct Sequence<I>(I);

/// Turns any collection into a [`Sequence`] publisher.
pub trait IntoPublisher: IntoIterator + Sized {
  fn publisher(self) -> Sequence<Self::IntoIter> { from_iter(self) }
}

impl<T: IntoIterator> IntoPublisher for T {}

struct SequenceProducer<I: Iterator>(Peekable<I>);

impl<I> Producer for SequenceProducer<I>
where
  I: Iterator + 'static,
  I::Item: 'static,
{
  type Item = I::Item;
  type Err = Infallible;

  fn next_value(&mut self) -> Option<I::Item> { self.0.next() }

  fn completion(&mut self) -> Option<Completion<Infallible>> {
    self.0.peek().is_none().then_some(Completion::Finished)
  }
}

impl<I> Publisher for Sequence<I>
where
  I: Iterator + 'static,
  I::Item: 'static,
{
  type Output = I::Item;
  type Failure = Infallible;

  fn subscribe<S>(self, subscriber: S)
  where
    S: Subscriber<I::Item, Infallible> + 'static,
  {
    ProducerSubscription::start(SequenceProducer(self.0.peekable()), subscriber);
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use crate::prelude::*;

  /// Requests a fixed demand once and never again.
  struct Fixed(usize, Rc<RefCell<Vec<i32>>>, Rc<RefCell<bool>>);

  impl Subscriber<i32, Infallible> for Fixed {
    fn receive_subscription(&mut self, subscription: BoxedSubscription) {
      subscription.request(Demand::max(self.0));
    }

    fn receive(&mut self, value: i32) -> Demand {
      self.1.borrow_mut().push(value);
      Demand::NONE
    }

    fn receive_completion(&mut self, _: Completion<Infallible>) { *self.2.borrow_mut() = true; }
  }

  #[rxcombine_macro::test]
  fn never_exceeds_demand() {
    for n in 0..6 {
      let values = Rc::new(RefCell::new(vec![]));
      let done = Rc::new(RefCell::new(false));
      from_iter(0..4).subscribe(Fixed(n, values.clone(), done.clone()));
      assert_eq!(values.borrow().len(), n.min(4));
      assert_eq!(*done.borrow(), n >= 4);
    }
  }

  #[rxcombine_macro::test]
  fn empty_completes() {
    let values = Rc::new(RefCell::new(vec![]));
    let done = Rc::new(RefCell::new(false));
    Vec::<i32>::new()
      .publisher()
      .subscribe(Fixed(0, values.clone(), done.clone()));
    assert!(values.borrow().is_empty());
    assert!(*done.borrow());
  }

  #[rxcombine_macro::test]
  fn clone_restarts() {
    let sum = Rc::new(RefCell::new(0));
    let source = from_iter(1..=3);
    let c_sum = sum.clone();
    let _c = source.clone().sink_value(move |v| *c_sum.borrow_mut() += v);
    let c_sum = sum.clone();
    let _c = source.sink_value(move |v| *c_sum.borrow_mut() += v);
    assert_eq!(*sum.borrow(), 12);
  }
}
