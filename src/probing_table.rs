use std::{borrow::Borrow, iter, mem, slice};

use crate::utils::CodeSum;

/// Number of slots in a freshly created or cleared table
pub const INITIAL_CAPACITY: usize = 16;

/// Load factor, as a percentage, that an insertion may not push the table past
pub const LOAD_FACTOR_PERCENT: usize = 50;

/// The state of a single slot
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot<K, V> {
    /// Never written since the last rehash; terminates lookups
    Empty,
    /// Previously occupied; lookups continue past it, insertions may reuse it
    Tombstone,
    /// A live key-value pair
    Occupied(K, V),
}

/// Position of a live key found by the lookup scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Located {
    /// Slot index holding the key
    index: usize,
    /// Number of slots examined to reach it, home slot included
    probes: usize,
}

/// A hash table using open addressing with linear probing.
///
/// Deleted entries leave a tombstone behind so that keys further along the same probe
/// sequence stay reachable. The table doubles its capacity before any insertion that would
/// push the load factor past `LOAD_FACTOR_PERCENT`, dropping all tombstones in the rehash.
///
/// Keys are hashed with [`CodeSum`], so `ProbingHashTable<String, V>` can be queried with
/// `&str`.
#[derive(Debug, Clone)]
pub struct ProbingHashTable<K, V> {
    /// The slots; the length is the capacity and always a power of two
    slots: Vec<Slot<K, V>>,
    /// Number of occupied slots, tombstones excluded
    size: usize,
}

impl<K, V> Default for ProbingHashTable<K, V>
where
    K: CodeSum + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Allocates `capacity` empty slots
fn empty_slots<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
    iter::repeat_with(|| Slot::Empty).take(capacity).collect()
}

impl<K, V> ProbingHashTable<K, V>
where
    K: CodeSum + Eq,
{
    /// Creates an empty table with `INITIAL_CAPACITY` slots
    #[must_use]
    pub fn new() -> Self {
        Self { slots: empty_slots(INITIAL_CAPACITY), size: 0 }
    }

    /// Home slot of a key. The capacity is a power of two, so masking is the modulo.
    fn home_index<Q: CodeSum + ?Sized>(&self, key: &Q) -> usize {
        key.code_sum() & self.capacity().saturating_sub(1)
    }

    /// Walks every slot once in probe order, starting at `start` and wrapping around
    fn probe_from(&self, start: usize) -> impl Iterator<Item = (usize, &Slot<K, V>)> {
        let mask = self.capacity().saturating_sub(1);
        (0..self.capacity()).filter_map(move |step| {
            let index = start.wrapping_add(step) & mask;
            self.slots.get(index).map(|slot| (index, slot))
        })
    }

    /// Whether inserting one more entry would exceed the load factor
    fn needs_growth(&self) -> bool {
        self.size.saturating_add(1).saturating_mul(100) >
            self.capacity().saturating_mul(LOAD_FACTOR_PERCENT)
    }

    /// Finds the slot a key should be written to.
    ///
    /// Returns the slot holding the key if it is present, otherwise the first tombstone met
    /// before the terminating empty slot, otherwise that empty slot. When the scan covers every
    /// slot without meeting an empty one the key is known to be absent and the first tombstone
    /// is returned; `None` means every slot is occupied by another key.
    fn find_slot(&self, key: &K) -> Option<usize> {
        let mut first_tombstone = None;

        for (index, slot) in self.probe_from(self.home_index(key)) {
            match slot {
                Slot::Empty => return Some(first_tombstone.unwrap_or(index)),
                Slot::Tombstone => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Slot::Occupied(existing, _) if existing == key => return Some(index),
                Slot::Occupied(..) => {}
            }
        }

        first_tombstone
    }

    /// Finds the slot holding a live key. Stops at the first empty slot.
    fn locate<Q>(&self, key: &Q) -> Option<Located>
    where
        K: Borrow<Q>,
        Q: CodeSum + Eq + ?Sized,
    {
        for (step, (index, slot)) in self.probe_from(self.home_index(key)).enumerate() {
            match slot {
                Slot::Empty => return None,
                Slot::Occupied(existing, _) if existing.borrow() == key => {
                    return Some(Located { index, probes: step.saturating_add(1) });
                }
                Slot::Occupied(..) | Slot::Tombstone => {}
            }
        }

        None
    }

    /// Writes a key-value pair without checking the load factor
    ///
    /// # Panics
    ///
    /// Panics if every slot is occupied by another key. Growing ahead of each insertion keeps
    /// at least half of the slots free, so this indicates the growth trigger was bypassed.
    #[allow(clippy::expect_used)]
    fn place(&mut self, key: K, value: V) -> Option<V> {
        let index = self
            .find_slot(&key)
            .expect("probe sequence exhausted with every slot occupied; table failed to grow");

        match self.slots.get_mut(index) {
            Some(Slot::Occupied(_, current)) => Some(mem::replace(current, value)),
            Some(slot) => {
                *slot = Slot::Occupied(key, value);
                self.size = self.size.saturating_add(1);
                None
            }
            None => None,
        }
    }

    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// The table grows first whenever `(len + 1) / capacity` would exceed the load factor.
    /// A new key takes the first tombstone on its probe sequence if there is one.
    ///
    /// # Panics
    ///
    /// Panics if the probe scan finds no usable slot, which growth rules out.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        if self.needs_growth() {
            self.grow();
        }

        self.place(key, value)
    }

    /// Retrieves the value stored for a key
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: CodeSum + Eq + ?Sized,
    {
        let Located { index, .. } = self.locate(key)?;
        match self.slots.get(index) {
            Some(Slot::Occupied(_, value)) => Some(value),
            _ => None,
        }
    }

    /// Retrieves a mutable reference to the value stored for a key
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: CodeSum + Eq + ?Sized,
    {
        let Located { index, .. } = self.locate(key)?;
        match self.slots.get_mut(index) {
            Some(Slot::Occupied(_, value)) => Some(value),
            _ => None,
        }
    }

    /// Returns true if the table holds the key
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: CodeSum + Eq + ?Sized,
    {
        self.locate(key).is_some()
    }

    /// Removes a key, leaving a tombstone in its slot, and returns its value.
    /// Removing an absent key does nothing.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: CodeSum + Eq + ?Sized,
    {
        let Located { index, .. } = self.locate(key)?;
        let slot = self.slots.get_mut(index)?;

        match mem::replace(slot, Slot::Tombstone) {
            Slot::Occupied(_, value) => {
                self.size = self.size.saturating_sub(1);
                Some(value)
            }
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Number of slots the lookup scan examines to reach a key, or `None` if it is absent.
    /// A key sitting in its home slot has a probe length of 1.
    pub fn probe_length<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: CodeSum + Eq + ?Sized,
    {
        self.locate(key).map(|located| located.probes)
    }

    /// Doubles the capacity and re-inserts every live entry in slot order.
    /// Tombstones are not carried over.
    fn grow(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity.saturating_mul(2);
        let old_slots = mem::replace(&mut self.slots, empty_slots(new_capacity));
        self.size = 0;

        let mut dropped_tombstones: usize = 0;
        for slot in old_slots {
            match slot {
                Slot::Occupied(key, value) => {
                    self.place(key, value);
                }
                Slot::Tombstone => dropped_tombstones = dropped_tombstones.saturating_add(1),
                Slot::Empty => {}
            }
        }

        log::debug!(
            "grew probing table from {old_capacity} to {new_capacity} slots: {} entries \
             rehashed, {dropped_tombstones} tombstones dropped",
            self.size
        );
    }

    /// Resets the table to a fresh `INITIAL_CAPACITY` table
    pub fn clear(&mut self) {
        log::debug!("clearing probing table of {} entries", self.size);
        *self = Self::new();
    }
}

impl<K, V> ProbingHashTable<K, V> {
    /// Returns the number of entries in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the table holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of tombstones awaiting the next rehash
    #[must_use]
    pub fn tombstones(&self) -> usize {
        self.slots.iter().filter(|slot| matches!(slot, Slot::Tombstone)).count()
    }

    /// Returns the ratio of entries to slots
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.slots.len() as f64
    }

    /// Returns an iterator over the key-value pairs in slot order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { slots: self.slots.iter() }
    }

    /// Returns the keys in slot order
    #[must_use]
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Returns the values in slot order
    #[must_use]
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.iter().map(|(_, value)| value.clone()).collect()
    }

    /// Returns the key-value pairs in slot order
    #[must_use]
    pub fn entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(key, value)| (key.clone(), value.clone())).collect()
    }
}

/// Iterator over the key-value pairs of a `ProbingHashTable`, in slot order
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    /// Remaining slots
    slots: slice::Iter<'a, Slot<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.find_map(|slot| match slot {
            Slot::Occupied(key, value) => Some((key, value)),
            Slot::Empty | Slot::Tombstone => None,
        })
    }
}

impl<'a, K, V> IntoIterator for &'a ProbingHashTable<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    /// Checks that every live key is reachable from its home slot without crossing an empty slot
    fn probe_sequences_intact<K: CodeSum + Eq, V>(table: &ProbingHashTable<K, V>) -> bool {
        table.slots.iter().enumerate().all(|(index, slot)| match slot {
            Slot::Occupied(key, _) => table
                .probe_from(table.home_index(key))
                .take_while(|&(probed, _)| probed != index)
                .all(|(_, passed)| !matches!(passed, Slot::Empty)),
            Slot::Empty | Slot::Tombstone => true,
        })
    }

    #[test]
    fn test_set_and_get() {
        let mut table = ProbingHashTable::new();
        assert_eq!(table.set("a".to_string(), 1), None);

        assert_eq!(table.get("a"), Some(&1));
        assert_eq!(table.values(), vec![1]);
    }

    #[test]
    fn test_override() {
        let mut table = ProbingHashTable::new();
        table.set("a".to_string(), 1);
        assert_eq!(table.set("a".to_string(), 2), Some(1));

        assert_eq!(table.values(), vec![2]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_absent_key() {
        let table: ProbingHashTable<String, i32> = ProbingHashTable::new();
        assert_eq!(table.get("a"), None);
        assert!(!table.has("a"));
    }

    #[test]
    fn test_absent_is_distinct_from_falsy_value() {
        let mut table = ProbingHashTable::new();
        table.set("zero", 0);

        assert_eq!(table.get("zero"), Some(&0));
        assert_eq!(table.get("missing"), None);
    }

    #[test]
    fn test_delete() {
        let mut table = ProbingHashTable::new();
        table.set("a".to_string(), 1);

        assert_eq!(table.delete("a"), Some(1));
        assert_eq!(table.get("a"), None);
        assert_eq!(table.delete("a"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let mut table: ProbingHashTable<String, i32> = ProbingHashTable::new();
        assert_eq!(table.delete("a"), None);
        assert_eq!(table.len(), 0);
        assert_eq!(table.tombstones(), 0);
    }

    #[test]
    fn test_home_slot_is_code_sum_modulo_capacity() {
        let mut table = ProbingHashTable::new();
        table.set("a", 1); // 97 % 16 == 1
        table.set("b", 2); // 98 % 16 == 2

        assert_eq!(table.slots.get(1), Some(&Slot::Occupied("a", 1)));
        assert_eq!(table.slots.get(2), Some(&Slot::Occupied("b", 2)));
        assert_eq!(table.probe_length("a"), Some(1));
    }

    #[test]
    fn test_linear_probing_on_collision() {
        let mut table = ProbingHashTable::new();
        // "ab", "ba" and "c" all have their home in slot 3
        table.set("ab", 1);
        table.set("ba", 2);
        table.set("c", 3);

        assert_eq!(table.slots.get(3), Some(&Slot::Occupied("ab", 1)));
        assert_eq!(table.slots.get(4), Some(&Slot::Occupied("ba", 2)));
        assert_eq!(table.slots.get(5), Some(&Slot::Occupied("c", 3)));
        assert_eq!(table.probe_length("c"), Some(3));
    }

    #[test]
    fn test_probe_sequence_survives_deletion() {
        let mut table = ProbingHashTable::new();
        table.set("ab", 1);
        table.set("ba", 2);
        table.set("c", 3);

        table.delete("ba");

        assert_eq!(table.slots.get(4), Some(&Slot::Tombstone));
        assert_eq!(table.get("c"), Some(&3));
        assert!(table.has("c"));
        assert_eq!(table.probe_length("c"), Some(3));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_reuses_first_tombstone() {
        let mut table = ProbingHashTable::new();
        table.set("ab", 1);
        table.set("ba", 2);
        table.delete("ab");

        table.set("c", 3);

        assert_eq!(table.slots.get(3), Some(&Slot::Occupied("c", 3)));
        assert_eq!(table.tombstones(), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_existing_key_behind_tombstone_is_updated_in_place() {
        let mut table = ProbingHashTable::new();
        table.set("ab", 1);
        table.set("ba", 2);
        table.delete("ab");

        assert_eq!(table.set("ba", 20), Some(2));

        assert_eq!(table.slots.get(3), Some(&Slot::Tombstone));
        assert_eq!(table.slots.get(4), Some(&Slot::Occupied("ba", 20)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_probing_wraps_around() {
        let mut table = ProbingHashTable::new();
        // 'o' is 111, home slot 15
        table.set("o", 1);
        table.set("o\u{10}", 2); // 127 % 16 == 15, wraps to slot 0

        assert_eq!(table.slots.get(0), Some(&Slot::Occupied("o\u{10}", 2)));
        assert_eq!(table.probe_length("o\u{10}"), Some(2));
    }

    #[test]
    fn test_resize_at_load_factor() {
        let mut table = ProbingHashTable::new();
        assert_eq!(table.capacity(), INITIAL_CAPACITY);

        for i in 0..8 {
            table.set(format!("key{i}"), i);
        }
        assert_eq!(table.capacity(), 16);

        // 9 / 16 > 0.5
        table.set("key8".to_string(), 8);
        assert_eq!(table.capacity(), 32);
    }

    #[test]
    fn test_resize_preserves_entries() {
        let mut table = ProbingHashTable::new();
        for i in 0..30 {
            table.set(format!("key{i}"), i);
        }

        for i in 0..30 {
            assert_eq!(table.get(&format!("key{i}")), Some(&i));
        }
        assert_eq!(table.len(), 30);
        assert_eq!(table.capacity(), 64);
    }

    #[test]
    fn test_resize_drops_tombstones() {
        let mut table = ProbingHashTable::new();
        for i in 0..8 {
            table.set(format!("key{i}"), i);
        }
        table.delete("key2");
        table.delete("key5");
        assert_eq!(table.tombstones(), 2);

        table.set("key8".to_string(), 8);
        table.set("key9".to_string(), 9);
        table.set("key10".to_string(), 10);
        assert_eq!(table.capacity(), 32);
        assert_eq!(table.tombstones(), 0);
        assert_eq!(table.len(), 9);
        assert_eq!(table.get("key2"), None);
    }

    #[test]
    fn test_multiple_deletions_and_insertions() {
        let mut table = ProbingHashTable::new();
        for i in 0..10 {
            table.set(format!("key{i}"), i);
        }

        table.delete("key2");
        table.delete("key5");
        table.delete("key7");
        assert_eq!(table.len(), 7);

        table.set("new1".to_string(), 100);
        table.set("new2".to_string(), 200);

        assert_eq!(table.len(), 9);
        assert_eq!(table.get("new1"), Some(&100));
        assert_eq!(table.get("new2"), Some(&200));
        assert_eq!(table.get("key2"), None);
    }

    #[test]
    fn test_update_after_resize() {
        let mut table = ProbingHashTable::new();
        for i in 0..15 {
            table.set(format!("key{i}"), i);
        }

        table.set("key0".to_string(), 100);
        table.set("key5".to_string(), 200);
        table.set("key14".to_string(), 300);

        assert_eq!(table.get("key0"), Some(&100));
        assert_eq!(table.get("key5"), Some(&200));
        assert_eq!(table.get("key14"), Some(&300));
        assert_eq!(table.len(), 15);
    }

    #[test]
    fn test_get_mut() {
        let mut table = ProbingHashTable::new();
        table.set("key1".to_string(), 1);

        if let Some(value) = table.get_mut("key1") {
            *value += 10;
        }

        assert_eq!(table.get("key1"), Some(&11));
        assert_eq!(table.get_mut("key2"), None);
    }

    #[test]
    fn test_clear() {
        let mut table = ProbingHashTable::new();
        for i in 0..20 {
            table.set(format!("key{i}"), i);
        }
        table.delete("key3");
        assert_eq!(table.capacity(), 64);

        table.clear();
        assert_eq!(table.len(), 0);
        assert_eq!(table.capacity(), INITIAL_CAPACITY);
        assert_eq!(table.tombstones(), 0);
        assert_eq!(table.get("key1"), None);

        table.clear();
        assert_eq!(table.len(), 0);
        assert_eq!(table.capacity(), INITIAL_CAPACITY);
    }

    #[test]
    fn test_keys_values_entries_in_slot_order() {
        let mut table = ProbingHashTable::new();
        table.set("c", 3);
        table.set("a", 1);
        table.set("b", 2);

        assert_eq!(table.keys(), vec!["a", "b", "c"]);
        assert_eq!(table.values(), vec![1, 2, 3]);
        assert_eq!(table.entries(), vec![("a", 1), ("b", 2), ("c", 3)]);
    }

    #[test]
    fn test_iter() {
        let mut table = ProbingHashTable::new();
        table.set("a".to_string(), 1);
        table.set("b".to_string(), 2);
        table.set("c".to_string(), 3);
        table.delete("b");

        let mut count = 0;
        let mut sum = 0;
        for (_, &value) in &table {
            count += 1;
            sum += value;
        }

        assert_eq!(count, 2);
        assert_eq!(sum, 4);
    }

    #[test]
    fn test_load_factor_stays_at_or_below_threshold() {
        let mut table = ProbingHashTable::new();
        for i in 0..100 {
            table.set(format!("key{i}"), i);
            assert!(table.load_factor() <= 0.5);
        }
        assert!(probe_sequences_intact(&table));
    }

    #[test]
    #[should_panic(expected = "probe sequence exhausted")]
    fn test_full_table_without_growth_is_a_contract_violation() {
        let mut table = ProbingHashTable { slots: empty_slots(2), size: 0 };
        table.place("a", 1);
        table.place("b", 2);
        table.place("c", 3);
    }

    #[test]
    fn test_full_table_without_empty_slot_reuses_tombstone() {
        let mut table = ProbingHashTable { slots: empty_slots(2), size: 0 };
        table.place("a", 1);
        table.place("b", 2);
        table.delete("a");

        assert_eq!(table.place("c", 3), None);
        assert_eq!(table.get("c"), Some(&3));
        assert_eq!(table.get("b"), Some(&2));
        assert_eq!(table.len(), 2);
    }

    /// A single table operation
    #[derive(Debug, Clone)]
    enum Op {
        /// Insert or overwrite
        Set(String, u16),
        /// Remove
        Delete(String),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        // A small alphabet keeps keys colliding and tombstones piling up
        let key = "[a-d]{1,3}";
        prop_oneof![
            3 => (key, any::<u16>()).prop_map(|(k, v)| Op::Set(k, v)),
            2 => key.prop_map(Op::Delete),
        ]
    }

    proptest! {
        #[test]
        fn test_probe_invariant_under_random_operations(
            ops in proptest::collection::vec(op_strategy(), 0..200)
        ) {
            let mut table = ProbingHashTable::new();
            let mut model = HashMap::new();

            for op in ops {
                match op {
                    Op::Set(key, value) => {
                        prop_assert_eq!(table.set(key.clone(), value), model.insert(key, value));
                    }
                    Op::Delete(key) => {
                        prop_assert_eq!(table.delete(key.as_str()), model.remove(&key));
                    }
                }
                prop_assert!(probe_sequences_intact(&table));
                prop_assert_eq!(table.len(), model.len());
            }

            for (key, value) in &model {
                prop_assert_eq!(table.get(key.as_str()), Some(value));
            }
            prop_assert!(table.capacity().is_power_of_two());
        }
    }
}
