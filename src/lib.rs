//! # Classic data structures
//!
//! Two structures whose correctness rests on a non-trivial invariant:
//!
//! - `ProbingHashTable`: open addressing with linear probing. Deletion leaves tombstones so
//!   that every live key stays reachable from its home slot, and the table doubles before an
//!   insertion could push the load factor past 50%.
//! - `BinaryHeap`: an array-backed heap parameterised by a [`HeapOrder`] predicate, restored
//!   by sift-up after insertion and sift-down after extraction. `PriorityQueue` is a thin
//!   adapter over it.
//!
//! ## Hash table
//!
//! ```rust
//! use classic_ds::ProbingHashTable;
//!
//! let mut table = ProbingHashTable::new();
//!
//! table.set("apple".to_string(), 1);
//! table.set("banana".to_string(), 2);
//! assert_eq!(table.get("apple"), Some(&1));
//!
//! // Overwriting keeps a single entry
//! table.set("apple".to_string(), 10);
//! assert_eq!(table.get("apple"), Some(&10));
//! assert_eq!(table.len(), 2);
//!
//! // Absent keys are `None`, never errors
//! table.delete("apple");
//! assert_eq!(table.get("apple"), None);
//! assert!(!table.has("apple"));
//!
//! // Filling past half of the 16 initial slots doubles the capacity
//! for i in 0..9 {
//!     table.set(format!("key{i}"), i);
//! }
//! assert_eq!(table.capacity(), 32);
//! ```
//!
//! ## Heap and priority queue
//!
//! ```rust
//! use classic_ds::{BinaryHeap, MaxOrder, PriorityQueue};
//!
//! let mut heap = BinaryHeap::new_min();
//! for n in [5, 3, 10, 1] {
//!     heap.insert(n);
//! }
//! // Display shows the array layout, not the sorted order
//! assert_eq!(heap.to_string(), "1,3,10,5");
//! assert_eq!(heap.extract_top(), Some(1));
//!
//! let mut queue = PriorityQueue::from_items([5, 3, 10, 1, 7], MaxOrder);
//! assert_eq!(queue.dequeue(), Some(10));
//! assert_eq!(queue.peek(), Some(&7));
//!
//! // Any `Fn(&T, &T) -> bool` is an order
//! let mut by_len = BinaryHeap::with_order(|a: &&str, b: &&str| a.len() <= b.len());
//! by_len.extend(["ccc", "a", "bb"]);
//! assert_eq!(by_len.peek(), Some(&"a"));
//! ```

/// Module implementing the comparator-driven binary heap
mod heap;
/// Module implementing the priority queue adapter
mod priority_queue;
/// Module implementing the open-addressing hash table
mod probing_table;
/// Key hashing and bulk constructors for the hash table
mod utils;

pub use heap::{BinaryHeap, HeapOrder, MaxOrder, MinOrder};
pub use priority_queue::PriorityQueue;
pub use probing_table::{INITIAL_CAPACITY, Iter, LOAD_FACTOR_PERCENT, ProbingHashTable};
pub use utils::CodeSum;
