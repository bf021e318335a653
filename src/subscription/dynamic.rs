use smallvec::SmallVec;

/// A container for a changing set of items with ID-based tracking.
///
/// Used by operators that hold several upstream links at once (for example
/// the inner publishers of `flat_map`), where each link must be found again by
/// the ID it was registered under.
///
/// - **SmallVec Optimization**: up to two items live inline, the common case
///   for merging operators.
/// - **Pre-allocation Pattern**: `reserve_id()` + `insert()` hands out the ID
///   before the item exists, so a subscriber can learn its own ID before its
///   subscription arrives.
///
/// # Examples
///
/// ```rust
/// use rxcombine::subscription::DynamicSubscriptions;
///
/// let mut subs: DynamicSubscriptions<&str> = DynamicSubscriptions::default();
///
/// let id1 = subs.add("first");
/// let id2 = subs.reserve_id();
/// subs.insert(id2, "second");
/// assert_eq!(subs.len(), 2);
///
/// assert_eq!(subs.remove(id1), Some("first"));
/// assert_eq!(subs.get(id2), Some(&"second"));
/// assert_eq!(subs.len(), 1);
/// ```
pub struct DynamicSubscriptions<U> {
  next_id: usize,
  items: SmallVec<[(usize, U); 2]>,
}

impl<U> Default for DynamicSubscriptions<U> {
  fn default() -> Self { Self { next_id: 0, items: SmallVec::new() } }
}

impl<U> DynamicSubscriptions<U> {
  /// Create an empty container.
  #[inline]
  pub fn new() -> Self { Self::default() }

  /// Add an item and return its unique ID.
  #[inline]
  pub fn add(&mut self, item: U) -> usize {
    let id = self.reserve_id();
    self.items.push((id, item));
    id
  }

  /// Reserve the next ID without adding an item.
  #[inline]
  pub fn reserve_id(&mut self) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    id
  }

  /// Insert an item with a pre-reserved ID.
  #[inline]
  pub fn insert(&mut self, id: usize, item: U) { self.items.push((id, item)); }

  /// Remove an item by ID.
  pub fn remove(&mut self, id: usize) -> Option<U> {
    self
      .items
      .iter()
      .position(|(i, _)| *i == id)
      .map(|pos| self.items.remove(pos).1)
  }

  #[inline]
  pub fn get(&self, id: usize) -> Option<&U> {
    self
      .items
      .iter()
      .find(|(i, _)| *i == id)
      .map(|(_, item)| item)
  }

  #[inline]
  pub fn get_mut(&mut self, id: usize) -> Option<&mut U> {
    self
      .items
      .iter_mut()
      .find(|(i, _)| *i == id)
      .map(|(_, item)| item)
  }

  #[inline]
  pub fn len(&self) -> usize { self.items.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  /// Drain all items.
  #[inline]
  pub fn drain(&mut self) -> impl Iterator<Item = U> + '_ {
    self.items.drain(..).map(|(_, item)| item)
  }
}
