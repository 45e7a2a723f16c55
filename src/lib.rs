//! chained-table: a fixed-bucket chained hash table built on a generic
//! singly-linked chain toolkit.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the node-level chain surgery and the hashing bookkeeping in
//!   separate layers so each can be reasoned about on its own.
//! - Layers:
//!   - Chain<T>: a singly-linked chain with the classic toolkit primitives
//!     (head insert, insert after, search, 1-based locate, head remove,
//!     remove after, clear, copy, copy of a sub-range). It knows nothing
//!     about keys or hashing.
//!   - Table<R, N>: `N` chains (10 by default), a record count and a modulo
//!     hash. Every mutator hashes once and delegates to one chain.
//!
//! Constraints
//! - Single-threaded; no interior mutability and no synchronization.
//! - Fixed bucket count; no rehashing, so a bucket's chain grows without
//!   bound under collisions. All walks are iterative.
//! - Records expose an integer key through the `Keyed` trait. Keys are
//!   unique: inserting a present key overwrites the stored record.
//!
//! Ownership
//! - Each chain stores its nodes in its own generational arena
//!   (`slotmap::SlotMap`); links between nodes are arena keys. A chain
//!   exclusively owns its nodes and a table exclusively owns its chains, so
//!   two buckets (or two tables) can never alias a node.
//! - `NodeHandle` is the toolkit's node reference. It carries the identity of
//!   the chain that produced it, so it never resolves in another chain, and a
//!   handle to a released node stops resolving even when its slot is reused.
//! - Copies (`Clone`, `Table::assign`) build complete replacement chains
//!   before anything is released, so a failed copy leaves the target intact.
//!
//! Failure semantics
//! - Absent keys are ordinary outcomes (`Option`/`bool`), never errors.
//! - Toolkit precondition breaches (locate at position 0, head removal from
//!   an empty chain, remove-after on the tail, stale or foreign handles) panic in every
//!   build profile.
//! - Bucket inspection with an out-of-range index, and I/O failures while
//!   printing a bucket, are reported as `TableError`.
//!
//! Logging
//! - Structural events go through the `log` facade at `trace`/`debug`
//!   level; the host picks the logger.

pub mod chain;
mod chain_proptest;
pub mod table;
mod table_proptest;

// Public surface
pub use chain::{Chain, NodeHandle};
pub use table::{Keyed, Table, TableError, TABLE_SIZE};
