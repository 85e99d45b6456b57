//! Array-backed binary heap ordered by a caller-supplied predicate

use std::{fmt, mem};

/// Decides which of two elements belongs closer to the root.
///
/// `precedes(a, b)` returning `true` means `a` may sit above `b`. It must be a total
/// preorder: equal elements answer `true` in both directions, and such ties never cause a
/// swap. Any `Fn(&T, &T) -> bool` closure is an order.
pub trait HeapOrder<T: ?Sized> {
    /// Returns true if `a` may be the parent of `b`
    fn precedes(&self, a: &T, b: &T) -> bool;
}

/// Smallest element on top (`a <= b`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MinOrder;

/// Largest element on top (`a >= b`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MaxOrder;

impl<T: PartialOrd + ?Sized> HeapOrder<T> for MinOrder {
    fn precedes(&self, a: &T, b: &T) -> bool {
        a <= b
    }
}

impl<T: PartialOrd + ?Sized> HeapOrder<T> for MaxOrder {
    fn precedes(&self, a: &T, b: &T) -> bool {
        a >= b
    }
}

impl<T: ?Sized, F> HeapOrder<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn precedes(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Parent of a non-root index
const fn parent_of(index: usize) -> usize {
    index.saturating_sub(1) / 2
}

/// Left child of an index; the right child follows it
const fn left_child_of(index: usize) -> usize {
    index.saturating_mul(2).saturating_add(1)
}

/// A binary heap stored as a complete tree in a `Vec`.
///
/// The root is at index 0 and the children of `i` are at `2i + 1` and `2i + 2`. For every
/// non-root index `i`, `order.precedes(elements[parent(i)], elements[i])` holds. The min and
/// max heaps are the same algorithm with [`MinOrder`] or [`MaxOrder`].
///
/// `Display` renders the elements comma-separated in array order, which is part of the
/// contract: it reflects the exact layout produced by sift-up and sift-down.
#[derive(Debug, Clone)]
pub struct BinaryHeap<T, O = MinOrder> {
    /// The elements in tree order
    elements: Vec<T>,
    /// The priority predicate
    order: O,
}

impl<T: PartialOrd> BinaryHeap<T> {
    /// Creates an empty min-heap
    #[must_use]
    pub fn new() -> Self {
        Self::new_min()
    }

    /// Creates an empty min-heap
    #[must_use]
    pub fn new_min() -> Self {
        Self::with_order(MinOrder)
    }
}

impl<T: PartialOrd> BinaryHeap<T, MaxOrder> {
    /// Creates an empty max-heap
    #[must_use]
    pub fn new_max() -> Self {
        Self::with_order(MaxOrder)
    }
}

impl<T, O: HeapOrder<T> + Default> Default for BinaryHeap<T, O> {
    fn default() -> Self {
        Self::with_order(O::default())
    }
}

impl<T, O: HeapOrder<T>> BinaryHeap<T, O> {
    /// Creates an empty heap ordered by `order`
    pub fn with_order(order: O) -> Self {
        Self { elements: Vec::new(), order }
    }

    /// Creates a heap by inserting `items` one at a time, in iteration order
    pub fn from_items<I: IntoIterator<Item = T>>(items: I, order: O) -> Self {
        let mut heap = Self::with_order(order);
        heap.extend(items);
        heap
    }

    /// Adds an element and sifts it up to its place
    pub fn insert(&mut self, item: T) {
        self.elements.push(item);
        self.sift_up(self.elements.len().saturating_sub(1));
    }

    /// Returns the top element without removing it
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.elements.first()
    }

    /// Removes and returns the top element.
    ///
    /// The last element takes the root's place and is sifted down.
    pub fn extract_top(&mut self) -> Option<T> {
        let last = self.elements.pop()?;
        if self.elements.is_empty() {
            return Some(last);
        }

        let top = mem::replace(self.elements.first_mut()?, last);
        self.sift_down(0);
        Some(top)
    }

    /// Returns the number of elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the heap holds no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Removes every element, keeping the order
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// The elements in array order
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    /// Consumes the heap, returning the elements in array order
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.elements
    }

    /// The order the heap was built with
    pub fn order(&self) -> &O {
        &self.order
    }

    /// Whether the element at `upper` may sit above the one at `lower`
    fn precedes_at(&self, upper: usize, lower: usize) -> bool {
        match (self.elements.get(upper), self.elements.get(lower)) {
            (Some(a), Some(b)) => self.order.precedes(a, b),
            _ => true,
        }
    }

    /// Moves the element at `start` towards the root until its parent precedes it
    fn sift_up(&mut self, start: usize) {
        let mut index = start;
        while index > 0 {
            let parent = parent_of(index);
            if self.precedes_at(parent, index) {
                break;
            }
            self.elements.swap(parent, index);
            index = parent;
        }
    }

    /// Moves the element at `start` away from the root until it precedes both children
    fn sift_down(&mut self, start: usize) {
        let len = self.elements.len();
        let mut index = start;

        loop {
            let left = left_child_of(index);
            if left >= len {
                break;
            }

            // Children that tie go to the right one
            let right = left.saturating_add(1);
            let child = if right < len && self.precedes_at(right, left) { right } else { left };

            if self.precedes_at(index, child) {
                break;
            }
            self.elements.swap(index, child);
            index = child;
        }
    }
}

impl<T, O: HeapOrder<T>> Extend<T> for BinaryHeap<T, O> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: PartialOrd> FromIterator<T> for BinaryHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_items(iter, MinOrder)
    }
}

impl<T: fmt::Display, O> fmt::Display for BinaryHeap<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, element) in self.elements.iter().enumerate() {
            if position > 0 {
                f.write_str(",")?;
            }
            write!(f, "{element}")?;
        }
        Ok(())
    }
}
