//! Priority queue adapter over `BinaryHeap`

use std::fmt;

use crate::heap::{BinaryHeap, HeapOrder, MaxOrder, MinOrder};

/// A queue that dequeues the highest-priority item first.
///
/// Every operation delegates to a [`BinaryHeap`]; priority is decided by the heap order.
#[derive(Debug, Clone)]
pub struct PriorityQueue<T, O = MinOrder> {
    /// The backing heap
    heap: BinaryHeap<T, O>,
}

impl<T: PartialOrd> PriorityQueue<T> {
    /// Creates an empty queue dequeuing the smallest item first
    #[must_use]
    pub fn new() -> Self {
        Self::new_min()
    }

    /// Creates an empty queue dequeuing the smallest item first
    #[must_use]
    pub fn new_min() -> Self {
        Self::with_order(MinOrder)
    }
}

impl<T: PartialOrd> PriorityQueue<T, MaxOrder> {
    /// Creates an empty queue dequeuing the largest item first
    #[must_use]
    pub fn new_max() -> Self {
        Self::with_order(MaxOrder)
    }
}

impl<T, O: HeapOrder<T> + Default> Default for PriorityQueue<T, O> {
    fn default() -> Self {
        Self::with_order(O::default())
    }
}

impl<T, O: HeapOrder<T>> PriorityQueue<T, O> {
    /// Creates an empty queue prioritised by `order`
    pub fn with_order(order: O) -> Self {
        Self { heap: BinaryHeap::with_order(order) }
    }

    /// Creates a queue holding `items`, enqueued in iteration order
    pub fn from_items<I: IntoIterator<Item = T>>(items: I, order: O) -> Self {
        Self { heap: BinaryHeap::from_items(items, order) }
    }

    /// Adds an item
    pub fn enqueue(&mut self, item: T) {
        self.heap.insert(item);
    }

    /// Removes and returns the highest-priority item
    pub fn dequeue(&mut self) -> Option<T> {
        self.heap.extract_top()
    }

    /// Returns the highest-priority item without removing it
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.heap.peek()
    }

    /// Returns true if the queue holds no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

impl<T, O: HeapOrder<T>> Extend<T> for PriorityQueue<T, O> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.heap.extend(iter);
    }
}

impl<T: fmt::Display, O> fmt::Display for PriorityQueue<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.heap, f)
    }
}
