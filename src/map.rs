//! Keyed double-ended priority map.
//!
//! [`HeapMap`] behaves like a hash map from keys to priorities, but
//! additionally keeps the entries on a min-max heap, so the entry with the
//! globally lowest *or* highest priority can be read in O(1) and removed in
//! O(log n), and the priority of any existing key can be changed in
//! O(log n) without a scan.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                          HeapMap<K, P>                               │
//! │                                                                      │
//! │   ┌──────────────────────────────────────────────────────────────┐   │
//! │   │  index: FxHashMap<K, SlotId>      (key → record, O(1))       │   │
//! │   │                                                              │   │
//! │   │    ┌─────────┬────────┐                                      │   │
//! │   │    │  key    │ SlotId │                                      │   │
//! │   │    ├─────────┼────────┤                                      │   │
//! │   │    │  "a"    │  id_0  │                                      │   │
//! │   │    │  "b"    │  id_1  │                                      │   │
//! │   │    │  "c"    │  id_2  │                                      │   │
//! │   │    └─────────┴────────┘                                      │   │
//! │   └──────────────────────────────────────────────────────────────┘   │
//! │                                                                      │
//! │   ┌──────────────────────────────────────────────────────────────┐   │
//! │   │  heap: MinMaxHeap<K, P>                                      │   │
//! │   │                                                              │   │
//! │   │    dense position array over the same records; each swap     │   │
//! │   │    rewrites the records' pos fields, so the index above      │   │
//! │   │    never goes stale                                          │   │
//! │   └──────────────────────────────────────────────────────────────┘   │
//! │                                                                      │
//! │   head ─► id_0 ◄──► id_1 ◄──► id_2 ◄── tail   (insertion order,      │
//! │           intrusive prev/next links threaded through the records)    │
//! └──────────────────────────────────────────────────────────────────────┘
//!
//! Upsert Flow
//! ───────────
//!   insert("b", 3):
//!     1. index lookup             → id_1 (present)
//!     2. overwrite priority       (record mutated in place)
//!     3. bubble-up + trickle-down (direction of violation unknown;
//!        whichever finds none is a no-op)
//!
//! Pop Flow
//! ────────
//!   pop_max():
//!     1. max position: root child with larger priority  (O(1))
//!     2. unregister its key from the index
//!     3. detach its insertion-order links
//!     4. heap removal: tail record refills the hole, repairs both ways
//! ```
//!
//! ## Operations
//!
//! | Operation             | Description                              | Complexity |
//! |-----------------------|------------------------------------------|------------|
//! | `insert`              | Upsert priority for a key                | O(log n)   |
//! | `get` / `contains_key`| Read through the key index               | O(1)       |
//! | `set_priority`        | Update-only variant, errors when absent  | O(log n)   |
//! | `remove`              | Delete an arbitrary key                  | O(log n)   |
//! | `peek_min` / `peek_max` | Read an extreme entry                  | O(1)       |
//! | `pop_min` / `pop_max` | Remove an extreme entry                  | O(log n)   |
//! | `pop_last_inserted`   | Remove the most recently inserted entry  | O(log n)   |
//! | `FromIterator`        | Bulk build: one scan + bottom-up repair  | O(n)       |
//!
//! ## Key Concepts
//!
//! - **Insertion order**: iteration visits keys in first-insertion order,
//!   like an ordered dictionary. Priority updates never move a key;
//!   removing and re-inserting moves it to the end.
//! - **Duplicate keys in bulk build**: the first-seen key instance is kept,
//!   the last-seen priority wins, and no duplicate record is created.
//! - **Clones are independent**: `clone()` allocates fresh records; no state
//!   is shared with the original.
//!
//! ## Example Usage
//!
//! ```
//! use heapkit::HeapMap;
//!
//! let mut tasks = HeapMap::new();
//! tasks.insert("deploy", 30);
//! tasks.insert("triage", 5);
//! tasks.insert("backup", 12);
//!
//! // Both extremes are visible at once.
//! assert_eq!(tasks.peek_min(), Some((&"triage", &5)));
//! assert_eq!(tasks.peek_max(), Some((&"deploy", &30)));
//!
//! // Re-prioritize an arbitrary key in O(log n).
//! tasks.insert("deploy", 1);
//! assert_eq!(tasks.pop_min(), Some(("deploy", 1)));
//!
//! // Drain the high-priority end.
//! assert_eq!(tasks.pop_max(), Some(("backup", 12)));
//! assert_eq!(tasks.pop_max(), Some(("triage", 5)));
//! assert_eq!(tasks.pop_max(), None);
//! ```
//!
//! ## Thread Safety
//!
//! `HeapMap` is a single-owner structure with no interior mutability; wrap
//! it in a mutex for concurrent access.
//!
//! ## Implementation Notes
//!
//! - The key index and the position array never reference each other's
//!   storage directly; both address records through stable arena handles,
//!   so heap swaps cannot invalidate the index.
//! - A priority type whose `Ord` panics mid-comparison can leave the heap
//!   invariant unrestored; treat the instance as poisoned afterwards.
//! - `check_invariants()` is available in debug/test builds.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::min_max_heap::MinMaxHeap;
use crate::ds::slot_arena::SlotId;
#[cfg(any(test, debug_assertions))]
use crate::error::InvariantError;
use crate::error::KeyNotFoundError;

/// Hash-map-like container with O(1) access to both priority extremes.
///
/// Keys must be `Hash + Eq + Clone` (the record and the index each own a
/// copy, cloned once per first insertion); priorities must be `Ord`.
/// See the module documentation for the full picture.
#[derive(Clone)]
pub struct HeapMap<K, P> {
    heap: MinMaxHeap<K, P>,
    index: FxHashMap<K, SlotId>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<K, P> HeapMap<K, P> {
    /// Creates an empty map.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::HeapMap;
    ///
    /// let map: HeapMap<String, u32> = HeapMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            heap: MinMaxHeap::new(),
            index: FxHashMap::default(),
            head: None,
            tail: None,
        }
    }

    /// Creates an empty map with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: MinMaxHeap::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            head: None,
            tail: None,
        }
    }

    /// Reserves capacity for at least `additional` more entries.
    pub fn reserve(&mut self, additional: usize)
    where
        K: Eq + Hash,
    {
        self.heap.reserve(additional);
        self.index.reserve(additional);
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
    }

    /// Returns the entry with the lowest priority, or `None` if empty.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::HeapMap;
    ///
    /// let map = HeapMap::from([("a", 10), ("b", 5), ("c", 7)]);
    /// assert_eq!(map.peek_min(), Some((&"b", &5)));
    /// ```
    pub fn peek_min(&self) -> Option<(&K, &P)> {
        self.heap.peek_min()
    }

    /// Iterates over `(key, priority)` pairs in insertion order.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::HeapMap;
    ///
    /// let map = HeapMap::from([("b", 5), ("a", 10), ("c", 7)]);
    /// let pairs: Vec<_> = map.iter().map(|(k, p)| (*k, *p)).collect();
    /// assert_eq!(pairs, vec![("b", 5), ("a", 10), ("c", 7)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, P> {
        Iter {
            heap: &self.heap,
            next: self.head,
            remaining: self.len(),
        }
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> Keys<'_, K, P> {
        Keys(self.iter())
    }

    /// Iterates over priorities in insertion order.
    pub fn priorities(&self) -> Priorities<'_, K, P> {
        Priorities(self.iter())
    }
}

impl<K, P: Ord> HeapMap<K, P> {
    /// Returns the entry with the highest priority, or `None` if empty.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::HeapMap;
    ///
    /// let map = HeapMap::from([("a", 10), ("b", 5), ("c", 7)]);
    /// assert_eq!(map.peek_max(), Some((&"a", &10)));
    /// ```
    pub fn peek_max(&self) -> Option<(&K, &P)> {
        self.heap.peek_max()
    }
}

impl<K: Eq + Hash, P> HeapMap<K, P> {
    /// Returns the priority of `key`, or `None` if absent.
    pub fn get<Q>(&self, key: &Q) -> Option<&P>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.index.get(key)?;
        Some(self.heap.priority(id))
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }
}

impl<K: Eq + Hash, P: Ord> HeapMap<K, P> {
    /// Changes the priority of an existing key and returns the previous
    /// priority. Never inserts; fails when the key is absent.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::HeapMap;
    ///
    /// let mut map = HeapMap::from([("a", 10), ("b", 5)]);
    /// assert_eq!(map.set_priority(&"a", 1), Ok(10));
    /// assert_eq!(map.peek_min(), Some((&"a", &1)));
    /// assert!(map.set_priority(&"x", 1).is_err());
    /// ```
    pub fn set_priority<Q>(&mut self, key: &Q, priority: P) -> Result<P, KeyNotFoundError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.index.get(key).ok_or(KeyNotFoundError)?;
        Ok(self.heap.set_priority(id, priority))
    }

    /// Removes `key` and returns its priority, or `None` if absent.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::HeapMap;
    ///
    /// let mut map = HeapMap::from([("a", 10), ("b", 5), ("c", 7)]);
    /// assert_eq!(map.remove(&"b"), Some(5));
    /// assert_eq!(map.remove(&"b"), None);
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<P>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, priority)| priority)
    }

    /// Removes `key` and returns the stored `(key, priority)` pair.
    ///
    /// The returned key is the instance retained at first insertion.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, P)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (stored_key, id) = self.index.remove_entry(key)?;
        self.detach(id);
        let (_, priority) = self.heap.remove(id);
        Some((stored_key, priority))
    }

    /// Removes and returns the entry with the lowest priority.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::HeapMap;
    ///
    /// let mut map = HeapMap::from([("a", 10), ("b", 5), ("c", 7)]);
    /// assert_eq!(map.pop_min(), Some(("b", 5)));
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn pop_min(&mut self) -> Option<(K, P)> {
        let id = self.heap.min_id()?;
        Some(self.remove_id(id))
    }

    /// Removes and returns the entry with the highest priority.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::HeapMap;
    ///
    /// let mut map = HeapMap::from([("a", 10), ("b", 5), ("c", 7)]);
    /// assert_eq!(map.pop_max(), Some(("a", 10)));
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn pop_max(&mut self) -> Option<(K, P)> {
        let id = self.heap.max_id()?;
        Some(self.remove_id(id))
    }

    /// Removes and returns the most recently inserted entry still present,
    /// by insertion order rather than priority.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::HeapMap;
    ///
    /// let mut map = HeapMap::from([("a", 10), ("b", 5)]);
    /// map.insert("a", 99); // update, does not change insertion order
    /// assert_eq!(map.pop_last_inserted(), Some(("b", 5)));
    /// assert_eq!(map.pop_last_inserted(), Some(("a", 99)));
    /// assert_eq!(map.pop_last_inserted(), None);
    /// ```
    pub fn pop_last_inserted(&mut self) -> Option<(K, P)> {
        let id = self.tail?;
        Some(self.remove_id(id))
    }

    /// Full removal of a live record: index entry, order links, heap slot.
    fn remove_id(&mut self, id: SlotId) -> (K, P) {
        let (stored_key, _) = self
            .index
            .remove_entry(self.heap.key(id))
            .expect("index must contain every heap key");
        self.detach(id);
        let (_, priority) = self.heap.remove(id);
        (stored_key, priority)
    }

    /// Unlinks a record from the insertion-order chain.
    fn detach(&mut self, id: SlotId) {
        let record = self.heap.record_mut(id);
        let prev = record.prev.take();
        let next = record.next.take();
        match prev {
            Some(p) => self.heap.record_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.heap.record_mut(n).prev = prev,
            None => self.tail = prev,
        }
    }

    /// Appends a record to the insertion-order chain.
    fn attach_back(&mut self, id: SlotId) {
        match self.tail {
            Some(t) => {
                self.heap.record_mut(t).next = Some(id);
                self.heap.record_mut(id).prev = Some(t);
            }
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }

    #[cfg(any(test, debug_assertions))]
    /// Validates heap, index, and order-chain consistency
    /// (debug/test builds only).
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.heap.check_invariants()?;
        if self.index.len() != self.heap.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but the heap holds {} records",
                self.index.len(),
                self.heap.len()
            )));
        }
        for (key, &id) in &self.index {
            if !self.heap.contains(id) {
                return Err(InvariantError::new("index entry points at a freed record"));
            }
            if self.heap.key(id) != key {
                return Err(InvariantError::new("index entry points at another key's record"));
            }
        }
        let mut cursor = self.head;
        let mut prev = None;
        let mut visited = 0usize;
        while let Some(id) = cursor {
            if visited >= self.len() {
                return Err(InvariantError::new("insertion-order chain has a cycle"));
            }
            let record = self.heap.record(id);
            if record.prev != prev {
                return Err(InvariantError::new("insertion-order back-link mismatch"));
            }
            prev = Some(id);
            cursor = record.next;
            visited += 1;
        }
        if self.tail != prev {
            return Err(InvariantError::new("insertion-order tail mismatch"));
        }
        if visited != self.len() {
            return Err(InvariantError::new(format!(
                "insertion-order chain visits {visited} of {} records",
                self.len()
            )));
        }
        Ok(())
    }
}

impl<K: Eq + Hash + Clone, P: Ord> HeapMap<K, P> {
    /// Inserts a key or updates its priority; returns the previous priority
    /// if the key was present.
    ///
    /// An update mutates the existing record in place and repairs from its
    /// current position, so the key keeps its insertion-order position.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::HeapMap;
    ///
    /// let mut map = HeapMap::new();
    /// assert_eq!(map.insert("a", 10), None);
    /// assert_eq!(map.insert("a", 3), Some(10));
    /// assert_eq!(map.get(&"a"), Some(&3));
    /// ```
    pub fn insert(&mut self, key: K, priority: P) -> Option<P> {
        if let Some(&id) = self.index.get(&key) {
            return Some(self.heap.set_priority(id, priority));
        }
        let id = self.heap.push(key.clone(), priority);
        self.index.insert(key, id);
        self.attach_back(id);
        None
    }

    /// Single-scan bulk load; the caller runs the O(n) rebuild afterwards.
    /// Duplicate keys update the existing record instead of appending.
    fn extend_deferred<I: IntoIterator<Item = (K, P)>>(&mut self, pairs: I) {
        for (key, priority) in pairs {
            if let Some(&id) = self.index.get(&key) {
                self.heap.record_mut(id).priority = priority;
            } else {
                let id = self.heap.push_deferred(key.clone(), priority);
                self.index.insert(key, id);
                self.attach_back(id);
            }
        }
    }
}

impl<K, P> Default for HeapMap<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, P: fmt::Debug> fmt::Debug for HeapMap<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Two maps are equal when they hold the same key→priority mapping,
/// irrespective of insertion order or internal layout.
impl<K: Eq + Hash, P: PartialEq> PartialEq for HeapMap<K, P> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(key, priority)| other.get(key) == Some(priority))
    }
}

impl<K: Eq + Hash, P: Eq> Eq for HeapMap<K, P> {}

/// Bulk construction: one scan, then a single O(n) bottom-up repair. For
/// duplicate keys the first-seen key instance is kept and the last-seen
/// priority wins.
///
/// # Example
///
/// ```
/// use heapkit::HeapMap;
///
/// let map: HeapMap<_, _> = [("k", 1), ("x", 9), ("k", 3)].into_iter().collect();
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get(&"k"), Some(&3));
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, vec!["k", "x"]);
/// ```
impl<K: Eq + Hash + Clone, P: Ord> FromIterator<(K, P)> for HeapMap<K, P> {
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity(iter.size_hint().0);
        map.extend_deferred(iter);
        map.heap.rebuild();
        map
    }
}

impl<K: Eq + Hash + Clone, P: Ord, const N: usize> From<[(K, P); N]> for HeapMap<K, P> {
    fn from(pairs: [(K, P); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Eq + Hash + Clone, P: Ord> Extend<(K, P)> for HeapMap<K, P> {
    fn extend<I: IntoIterator<Item = (K, P)>>(&mut self, iter: I) {
        for (key, priority) in iter {
            self.insert(key, priority);
        }
    }
}

/// Insertion-order iterator over `(&K, &P)` pairs.
pub struct Iter<'a, K, P> {
    heap: &'a MinMaxHeap<K, P>,
    next: Option<SlotId>,
    remaining: usize,
}

impl<'a, K, P> Iterator for Iter<'a, K, P> {
    type Item = (&'a K, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let record = self.heap.record(id);
        self.next = record.next;
        self.remaining -= 1;
        Some((&record.key, &record.priority))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, P> ExactSizeIterator for Iter<'_, K, P> {}

/// Insertion-order iterator over keys.
pub struct Keys<'a, K, P>(Iter<'a, K, P>);

impl<'a, K, P> Iterator for Keys<'a, K, P> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, P> ExactSizeIterator for Keys<'_, K, P> {}

/// Insertion-order iterator over priorities.
pub struct Priorities<'a, K, P>(Iter<'a, K, P>);

impl<'a, K, P> Iterator for Priorities<'a, K, P> {
    type Item = &'a P;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, priority)| priority)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, P> ExactSizeIterator for Priorities<'_, K, P> {}

impl<'a, K, P> IntoIterator for &'a HeapMap<K, P> {
    type Item = (&'a K, &'a P);
    type IntoIter = Iter<'a, K, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Consuming insertion-order iterator over `(K, P)` pairs.
pub struct IntoIter<K, P> {
    inner: std::vec::IntoIter<(K, P)>,
}

impl<K, P> Iterator for IntoIter<K, P> {
    type Item = (K, P);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, P> ExactSizeIterator for IntoIter<K, P> {}

impl<K, P> IntoIterator for HeapMap<K, P> {
    type Item = (K, P);
    type IntoIter = IntoIter<K, P>;

    fn into_iter(mut self) -> Self::IntoIter {
        let mut pairs = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let record = self.heap.take_record(id);
            cursor = record.next;
            pairs.push((record.key, record.priority));
        }
        IntoIter {
            inner: pairs.into_iter(),
        }
    }
}
