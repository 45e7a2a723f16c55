//! Table: fixed-bucket chained hash table layered on [`Chain`].
//!
//! Every mutator hashes the key to one bucket and hands the structural edit to
//! that bucket's chain. The table owns the invariants the chains know nothing
//! about:
//! - a record with key `k` lives in bucket `hash(k)`;
//! - keys are unique across all buckets;
//! - `total_records` equals the sum of the bucket lengths between calls.
//!
//! Buckets never share nodes: each chain owns its own arena, and copies always
//! allocate fresh chains.

use crate::chain::{Chain, NodeHandle};
use core::fmt;
use core::mem;
use log::{debug, trace};
use std::io::{self, Write};
use thiserror::Error;

/// Default number of buckets.
pub const TABLE_SIZE: usize = 10;

/// Capability required of stored records: an integer key used both for hashing
/// and for uniqueness.
pub trait Keyed {
    fn key(&self) -> i64;
}

/// A bare key is a valid record.
impl Keyed for i64 {
    fn key(&self) -> i64 {
        *self
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("bucket {index} is out of range for a table with {buckets} buckets")]
    BucketOutOfRange { index: usize, buckets: usize },
    #[error("failed to write bucket contents: {0}")]
    Io(#[from] io::Error),
}

/// Chained hash table with `N` buckets and modulo hashing.
///
/// # Time Complexity
/// `L` is the length of the chain in the key's bucket.
///
/// | Method | Complexity |
/// |-|-|
/// | `insert` / `remove` | `O(L)` |
/// | `find` / `get` / `is_present` | `O(L)` |
/// | `size` | `O(1)` |
/// | `clone` / `clear` | `O(n + N)` |
///
/// There is no rehashing, so `L` grows without bound when keys collide.
pub struct Table<R, const N: usize = TABLE_SIZE> {
    buckets: [Chain<R>; N],
    total_records: usize,
}

// Construction and inspection need no key; only record operations hash.
impl<R> Table<R> {
    /// Creates an empty table with [`TABLE_SIZE`] buckets.
    pub fn new() -> Self {
        Self::with_buckets()
    }
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, const N: usize> Table<R, N> {
    const HAS_BUCKETS: () = assert!(N > 0, "a table needs at least one bucket");

    /// Creates an empty table with `N` buckets.
    pub fn with_buckets() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::HAS_BUCKETS;
        Self {
            buckets: core::array::from_fn(|_| Chain::new()),
            total_records: 0,
        }
    }

    pub const fn bucket_count(&self) -> usize {
        N
    }

    /// Bucket index for `key`, always in `0..N`; negative keys wrap like
    /// `rem_euclid`.
    pub fn hash(key: i64) -> usize {
        key.rem_euclid(N as i64) as usize
    }

    /// Number of records in the table.
    pub fn size(&self) -> usize {
        self.total_records
    }

    pub fn len(&self) -> usize {
        self.total_records
    }

    pub fn is_empty(&self) -> bool {
        self.total_records == 0
    }

    /// Releases every record in every bucket along with the buckets' node storage.
    pub fn clear(&mut self) {
        for chain in self.buckets.iter_mut() {
            chain.clear();
        }
        if self.total_records > 0 {
            trace!("cleared {} records", self.total_records);
        }
        self.total_records = 0;
    }

    /// Read-only view of one bucket's chain, head to tail.
    pub fn bucket(&self, index: usize) -> Result<&Chain<R>, TableError> {
        self.buckets
            .get(index)
            .ok_or(TableError::BucketOutOfRange { index, buckets: N })
    }
}

impl<R: Keyed, const N: usize> Table<R, N> {
    /// Inserts `entry`, replacing any record with the same key in place.
    ///
    /// Returns the replaced record, or `None` if the key was new. New keys are
    /// linked at the head of their bucket.
    pub fn insert(&mut self, entry: R) -> Option<R> {
        let key = entry.key();
        let bucket = Self::hash(key);
        let chain = &mut self.buckets[bucket];
        match chain.search_by(|r| r.key() == key) {
            Some(node) => {
                trace!("replacing record {key} in bucket {bucket}");
                match node.value_mut(chain) {
                    Some(slot) => Some(mem::replace(slot, entry)),
                    None => unreachable!("search returned a released node"),
                }
            }
            None => {
                chain.head_insert(entry);
                self.total_records += 1;
                trace!("inserted record {key} into bucket {bucket}");
                None
            }
        }
    }

    /// Removes the record with `key` and returns it. Absent keys leave the
    /// table unchanged.
    pub fn remove(&mut self, key: i64) -> Option<R> {
        let bucket = Self::hash(key);
        let (precursor, _) = self.find_node(bucket, key)?;
        let chain = &mut self.buckets[bucket];
        let removed = match precursor {
            None => chain.head_remove(),
            Some(previous) => chain.remove_after(previous),
        };
        self.total_records -= 1;
        trace!("removed record {key} from bucket {bucket}");
        Some(removed)
    }

    pub fn get(&self, key: i64) -> Option<&R> {
        let chain = &self.buckets[Self::hash(key)];
        chain
            .search_by(|r| r.key() == key)
            .and_then(|node| node.value(chain))
    }

    pub fn contains_key(&self, key: i64) -> bool {
        self.get(key).is_some()
    }

    /// True if a record with the same key as `target` is stored. Only the key
    /// is compared.
    pub fn is_present(&self, target: &R) -> bool {
        self.contains_key(target.key())
    }

    /// Locates `key` in `bucket`, returning the matching node together with the
    /// node before it (`None` when the match is the head).
    fn find_node(&self, bucket: usize, key: i64) -> Option<(Option<NodeHandle>, NodeHandle)> {
        let chain = &self.buckets[bucket];
        let mut precursor = None;
        let mut cursor = chain.head();
        while let Some(node) = cursor {
            if node.value(chain).is_some_and(|r| r.key() == key) {
                return Some((precursor, node));
            }
            precursor = Some(node);
            cursor = node.next(chain);
        }
        None
    }

    /// Keys of one bucket in chain order.
    pub fn bucket_keys(&self, index: usize) -> Result<Vec<i64>, TableError> {
        Ok(self.bucket(index)?.iter().map(|r| r.key()).collect())
    }

    /// Writes one bucket as `[index] k1 -> k2 -> ...`, or `[index] NULL` when
    /// the bucket is empty.
    pub fn write_bucket<W: Write>(&self, index: usize, out: &mut W) -> Result<(), TableError> {
        let chain = self.bucket(index)?;
        write!(out, "[{index}]")?;
        if chain.is_empty() {
            writeln!(out, " NULL")?;
            return Ok(());
        }
        let mut sep = " ";
        for record in chain {
            write!(out, "{sep}{}", record.key())?;
            sep = " -> ";
        }
        writeln!(out)?;
        Ok(())
    }

    /// [`write_bucket`](Self::write_bucket) to standard output.
    pub fn print(&self, index: usize) -> Result<(), TableError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_bucket(index, &mut out)
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut seen = std::collections::BTreeSet::new();
        let mut total = 0;
        for (index, chain) in self.buckets.iter().enumerate() {
            for record in chain {
                let key = record.key();
                assert_eq!(Self::hash(key), index, "key {key} stored in the wrong bucket");
                assert!(seen.insert(key), "key {key} stored twice");
                total += 1;
            }
        }
        assert_eq!(total, self.total_records, "record count out of sync with buckets");
    }
}

impl<R: Keyed + Clone, const N: usize> Table<R, N> {
    /// Copy of the record stored under `key`.
    pub fn find(&self, key: i64) -> Option<R> {
        self.get(key).cloned()
    }

    /// Copies the record stored under `key` into `result` and returns true. On a
    /// miss returns false and leaves `result` untouched.
    pub fn find_into(&self, key: i64, result: &mut R) -> bool {
        match self.get(key) {
            Some(record) => {
                result.clone_from(record);
                true
            }
            None => false,
        }
    }

    /// Replaces this table's contents with a deep copy of `source`.
    ///
    /// The replacement buckets are fully built before the current ones are
    /// released.
    pub fn assign(&mut self, source: &Self) {
        let replacement = source.clone();
        let released = mem::replace(self, replacement);
        debug!(
            "assigned table: {} records released, {} copied",
            released.total_records, self.total_records
        );
    }
}

impl<R: Keyed + Clone, const N: usize> Clone for Table<R, N> {
    fn clone(&self) -> Self {
        let buckets: [Chain<R>; N] = core::array::from_fn(|i| self.buckets[i].copy().0);
        debug_assert_eq!(
            buckets.iter().map(Chain::len).sum::<usize>(),
            self.total_records,
            "copied chains disagree with the record count"
        );
        trace!("copied table with {} records", self.total_records);
        Self {
            buckets,
            total_records: self.total_records,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}

impl<R, const N: usize> Drop for Table<R, N> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<R: Keyed, const N: usize> Extend<R> for Table<R, N> {
    fn extend<I: IntoIterator<Item = R>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl<R: Keyed, const N: usize> FromIterator<R> for Table<R, N> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let mut table = Self::with_buckets();
        table.extend(iter);
        table
    }
}

impl<R: fmt::Debug, const N: usize> fmt::Debug for Table<R, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("total_records", &self.total_records)
            .field("buckets", &self.buckets)
            .finish()
    }
}
