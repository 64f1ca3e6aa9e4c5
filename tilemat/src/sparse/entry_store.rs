//! Capacity-bounded coordinate to value store
//!
//! Backs the sparse matrix types. Only non-zero values are kept: writing
//! zero deletes the entry. When a maximum entry count is configured the
//! store rejects inserts that would exceed it; it never evicts.

use std::collections::{btree_map, BTreeMap};

use hashbrown::HashMap;
use num_traits::Zero;
use tilemat_core::{MatrixElement, Result, TilematError};

/// `(row, col)` key of a stored entry
pub type Coordinate = (usize, usize);

/// Maximum number of explicit entries a store may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Capacity {
    #[default]
    Unbounded,
    Bounded(usize),
}

impl Capacity {
    /// Interpret a signed maximum where any negative value means unbounded
    pub fn from_signed(max_entries: i64) -> Self {
        usize::try_from(max_entries).map_or(Capacity::Unbounded, Capacity::Bounded)
    }

    /// The configured bound, if any
    pub fn limit(&self) -> Option<usize> {
        match self {
            Capacity::Unbounded => None,
            Capacity::Bounded(max) => Some(*max),
        }
    }

    /// Whether a store holding `len` entries may add one more
    pub fn admits(&self, len: usize) -> bool {
        match self {
            Capacity::Unbounded => true,
            Capacity::Bounded(max) => len < *max,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    value: T,
    sequence: u64,
}

/// Coordinate-keyed map of non-zero values with an optional entry bound
///
/// Lookups are hash-based. A separate sequence index keeps entries in
/// first-insertion order for iteration; overwriting a live entry keeps its
/// position, while deleting and re-inserting moves it to the end.
#[derive(Debug, Clone)]
pub struct SparseEntryStore<T: MatrixElement> {
    entries: HashMap<Coordinate, Slot<T>>,
    order: BTreeMap<u64, Coordinate>,
    next_sequence: u64,
    capacity: Capacity,
}

impl<T: MatrixElement> SparseEntryStore<T> {
    /// Create an unbounded store
    pub fn new() -> Self {
        Self::with_capacity(Capacity::Unbounded)
    }

    /// Create a store holding at most `max_entries` entries
    pub fn bounded(max_entries: usize) -> Self {
        Self::with_capacity(Capacity::Bounded(max_entries))
    }

    /// Create a store with the given capacity policy
    pub fn with_capacity(capacity: Capacity) -> Self {
        Self {
            entries: HashMap::new(),
            order: BTreeMap::new(),
            next_sequence: 0,
            capacity,
        }
    }

    /// Write a value
    ///
    /// Zero removes any entry at the coordinate and never counts against
    /// capacity. A new non-zero entry on a full store fails with
    /// `CapacityExceeded` and leaves the store unchanged.
    pub fn put(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if value.is_zero() {
            self.remove(row, col);
            return Ok(());
        }

        if let Some(slot) = self.entries.get_mut(&(row, col)) {
            slot.value = value;
            return Ok(());
        }

        if !self.capacity.admits(self.entries.len()) {
            return Err(TilematError::CapacityExceeded {
                max_entries: self.capacity.limit().unwrap_or(usize::MAX),
            });
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.insert((row, col), Slot { value, sequence });
        self.order.insert(sequence, (row, col));
        Ok(())
    }

    /// Read a value; absent coordinates read as zero
    pub fn get(&self, row: usize, col: usize) -> T {
        self.entries
            .get(&(row, col))
            .map_or_else(T::zero, |slot| slot.value)
    }

    /// Whether an explicit entry exists at the coordinate
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.entries.contains_key(&(row, col))
    }

    /// Delete the entry at the coordinate, returning its value
    pub fn remove(&mut self, row: usize, col: usize) -> Option<T> {
        let slot = self.entries.remove(&(row, col))?;
        self.order.remove(&slot.sequence);
        Some(slot.value)
    }

    /// Number of explicit (non-zero) entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured capacity policy
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Whether a new coordinate would be rejected
    pub fn is_full(&self) -> bool {
        !self.capacity.admits(self.entries.len())
    }

    /// Remove every entry; the capacity policy is kept
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Entries in insertion order
    pub fn iter(&self) -> Entries<'_, T> {
        Entries {
            order: self.order.values(),
            entries: &self.entries,
        }
    }

    /// Occupied coordinates in insertion order
    pub fn coordinates(&self) -> impl ExactSizeIterator<Item = Coordinate> + '_ {
        self.order.values().copied()
    }
}

impl<T: MatrixElement> Default for SparseEntryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: MatrixElement> IntoIterator for &'a SparseEntryStore<T> {
    type Item = (Coordinate, T);
    type IntoIter = Entries<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a store in insertion order
pub struct Entries<'a, T> {
    order: btree_map::Values<'a, u64, Coordinate>,
    entries: &'a HashMap<Coordinate, Slot<T>>,
}

impl<'a, T: Copy> Iterator for Entries<'a, T> {
    type Item = (Coordinate, T);

    fn next(&mut self) -> Option<Self::Item> {
        let coordinate = *self.order.next()?;
        let slot = self.entries.get(&coordinate)?;
        Some((coordinate, slot.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<'a, T: Copy> ExactSizeIterator for Entries<'a, T> {
    fn len(&self) -> usize {
        self.order.len()
    }
}
