//! Key hashing and bulk constructors for `ProbingHashTable`

use crate::ProbingHashTable;

/// Keys that can be placed in a `ProbingHashTable`.
///
/// The table hashes a key by summing its character codes (UTF-16 code units) and reducing
/// the sum modulo the capacity. Keys that spell the same characters in a different order
/// share a home slot, so clustering under similar keys is expected and absorbed by linear
/// probing and growth.
pub trait CodeSum {
    /// Returns the sum of the key's character codes
    fn code_sum(&self) -> usize;
}

impl CodeSum for str {
    fn code_sum(&self) -> usize {
        self.encode_utf16().fold(0, |sum, unit| sum.wrapping_add(usize::from(unit)))
    }
}

impl CodeSum for String {
    fn code_sum(&self) -> usize {
        self.as_str().code_sum()
    }
}

impl CodeSum for Box<str> {
    fn code_sum(&self) -> usize {
        (**self).code_sum()
    }
}

impl<T: CodeSum + ?Sized> CodeSum for &T {
    fn code_sum(&self) -> usize {
        (**self).code_sum()
    }
}

impl<K, V> FromIterator<(K, V)> for ProbingHashTable<K, V>
where
    K: CodeSum + Eq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<K, V> Extend<(K, V)> for ProbingHashTable<K, V>
where
    K: CodeSum + Eq,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}
