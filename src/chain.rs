//! Chain: singly-linked node chain over a generational arena, plus the toolkit
//! primitives the table is built from.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use slotmap::{DefaultKey, SlotMap};

/// Reference to one node of one [`Chain`].
///
/// A handle records which chain produced it. Using it with any other chain, or
/// after its node was released, never resolves: accessors return `None` and
/// structural edits panic.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeHandle {
    owner: u64,
    key: DefaultKey,
}

impl NodeHandle {
    pub(crate) fn new(owner: u64, key: DefaultKey) -> Self {
        NodeHandle { owner, key }
    }
    pub(crate) fn raw_handle(&self) -> DefaultKey {
        self.key
    }

    pub fn value<'a, T>(&self, chain: &'a Chain<T>) -> Option<&'a T> {
        chain.resolve(*self).map(|n| &n.value)
    }

    pub fn value_mut<'a, T>(&self, chain: &'a mut Chain<T>) -> Option<&'a mut T> {
        chain.resolve_mut(*self).map(|n| &mut n.value)
    }

    /// The node linked after this one, or `None` at the tail (or for a handle
    /// that does not resolve in `chain`).
    pub fn next<T>(&self, chain: &Chain<T>) -> Option<NodeHandle> {
        chain
            .resolve(*self)
            .and_then(|n| n.next)
            .map(|k| chain.handle(k))
    }
}

// Chain identities; a fresh one is taken whenever a chain gets a new arena.
static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

fn next_owner() -> u64 {
    NEXT_OWNER.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug)]
struct Node<T> {
    value: T,
    next: Option<DefaultKey>,
}

/// A singly-linked chain. Every node in `nodes` is reachable from `head`.
///
/// # Time Complexity
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(n)` |
/// | `head_insert` / `insert_after` | `O(1)` |
/// | `head_remove` / `remove_after` | `O(1)` |
/// | `search` / `search_by` | `O(n)` |
/// | `locate` | `O(position)` |
/// | `clear` / `copy` | `O(n)` |
/// | `copy_range` | `O(range)` |
///
/// Released slots are recycled by later insertions but the arena does not
/// shrink on `head_remove`/`remove_after`; only `clear` returns its memory.
pub struct Chain<T> {
    owner: u64,
    head: Option<DefaultKey>,
    nodes: SlotMap<DefaultKey, Node<T>>,
}

impl<T> Chain<T> {
    pub fn new() -> Self {
        Self {
            owner: next_owner(),
            head: None,
            nodes: SlotMap::new(),
        }
    }

    pub fn head(&self) -> Option<NodeHandle> {
        self.head.map(|k| self.handle(k))
    }

    /// Counts the nodes by walking from the head; the length is not cached.
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.head;
        while let Some(k) = cursor {
            count += 1;
            cursor = self.nodes[k].next;
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Links a new node holding `value` in front of the current head.
    pub fn head_insert(&mut self, value: T) -> NodeHandle {
        let k = self.nodes.insert(Node {
            value,
            next: self.head,
        });
        self.head = Some(k);
        self.handle(k)
    }

    /// Splices a new node holding `value` directly after `previous`.
    ///
    /// # Panics
    /// Panics if `previous` belongs to another chain or its node was released.
    pub fn insert_after(&mut self, previous: NodeHandle, value: T) -> NodeHandle {
        let next = self.live(previous).next;
        let k = self.nodes.insert(Node { value, next });
        self.live_mut(previous).next = Some(k);
        self.handle(k)
    }

    /// First node whose value satisfies `pred`, in chain order.
    pub fn search_by<F>(&self, mut pred: F) -> Option<NodeHandle>
    where
        F: FnMut(&T) -> bool,
    {
        let mut cursor = self.head;
        while let Some(k) = cursor {
            let node = &self.nodes[k];
            if pred(&node.value) {
                return Some(self.handle(k));
            }
            cursor = node.next;
        }
        None
    }

    /// Node at the 1-based `position`, or `None` past the end of the chain.
    ///
    /// # Panics
    /// Panics if `position` is zero.
    pub fn locate(&self, position: usize) -> Option<NodeHandle> {
        assert!(position > 0, "chain positions are 1-based, got position 0");
        let mut cursor = self.head;
        for _ in 1..position {
            cursor = self.nodes[cursor?].next;
        }
        cursor.map(|k| self.handle(k))
    }

    /// Unlinks the head node and returns its value; the second node becomes the head.
    ///
    /// # Panics
    /// Panics if the chain is empty.
    pub fn head_remove(&mut self) -> T {
        let Some(head) = self.head else {
            panic!("head_remove called on an empty chain");
        };
        let node = self.release(head);
        self.head = node.next;
        node.value
    }

    /// Unlinks the successor of `previous` and returns its value.
    ///
    /// # Panics
    /// Panics if `previous` belongs to another chain, if its node was released,
    /// or if it is the tail.
    pub fn remove_after(&mut self, previous: NodeHandle) -> T {
        let Some(target) = self.live(previous).next else {
            panic!("remove_after called on the tail node");
        };
        let node = self.release(target);
        self.live_mut(previous).next = node.next;
        node.value
    }

    /// Releases every node and the arena's memory; the chain is empty
    /// afterwards and handles taken before the call no longer resolve.
    pub fn clear(&mut self) {
        let mut cursor = self.head.take();
        while let Some(k) = cursor {
            cursor = self.release(k).next;
        }
        debug_assert!(self.nodes.is_empty(), "unreachable nodes left in chain arena");
        // A fresh arena restarts slot generations, so the identity must change too.
        self.nodes = SlotMap::new();
        self.owner = next_owner();
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            chain: self,
            cursor: self.head,
        }
    }

    fn handle(&self, k: DefaultKey) -> NodeHandle {
        NodeHandle::new(self.owner, k)
    }

    fn resolve(&self, h: NodeHandle) -> Option<&Node<T>> {
        if h.owner != self.owner {
            return None;
        }
        self.nodes.get(h.raw_handle())
    }

    fn resolve_mut(&mut self, h: NodeHandle) -> Option<&mut Node<T>> {
        if h.owner != self.owner {
            return None;
        }
        self.nodes.get_mut(h.raw_handle())
    }

    fn live(&self, h: NodeHandle) -> &Node<T> {
        assert!(h.owner == self.owner, "node handle belongs to a different chain");
        match self.nodes.get(h.raw_handle()) {
            Some(node) => node,
            None => panic!("node handle is not live in this chain"),
        }
    }

    fn live_mut(&mut self, h: NodeHandle) -> &mut Node<T> {
        assert!(h.owner == self.owner, "node handle belongs to a different chain");
        match self.nodes.get_mut(h.raw_handle()) {
            Some(node) => node,
            None => panic!("node handle is not live in this chain"),
        }
    }

    fn release(&mut self, k: DefaultKey) -> Node<T> {
        match self.nodes.remove(k) {
            Some(node) => node,
            None => panic!("chain link points at a released node"),
        }
    }
}

impl<T: PartialEq> Chain<T> {
    /// First node whose value equals `target`.
    pub fn search(&self, target: &T) -> Option<NodeHandle> {
        self.search_by(|v| v == target)
    }
}

impl<T: Clone> Chain<T> {
    /// Builds an independent chain holding clones of every value, in order.
    /// Returns it together with the handle of its tail (`None` when empty).
    pub fn copy(&self) -> (Chain<T>, Option<NodeHandle>) {
        match self.head {
            None => (Chain::new(), None),
            Some(head) => {
                let (copy, tail) = self.copy_from(head, None);
                (copy, Some(tail))
            }
        }
    }

    /// Copies the inclusive sub-chain `start..=end` into a new chain and returns
    /// it with the handle of its tail.
    ///
    /// # Panics
    /// Panics if either handle belongs to another chain or to a released node,
    /// or if `end` is not reachable from `start`.
    pub fn copy_range(&self, start: NodeHandle, end: NodeHandle) -> (Chain<T>, NodeHandle) {
        let _ = self.live(start);
        let _ = self.live(end);
        self.copy_from(start.raw_handle(), Some(end.raw_handle()))
    }

    fn copy_from(&self, start: DefaultKey, end: Option<DefaultKey>) -> (Chain<T>, NodeHandle) {
        let mut copy = Chain::new();
        let mut tail = copy.head_insert(self.nodes[start].value.clone());
        let mut cursor = start;
        while Some(cursor) != end {
            match self.nodes[cursor].next {
                Some(next) => {
                    tail = copy.insert_after(tail, self.nodes[next].value.clone());
                    cursor = next;
                }
                None if end.is_none() => break,
                None => panic!("copy_range end is not reachable from start"),
            }
        }
        (copy, tail)
    }
}

/// Iterator over the values of a [`Chain`], head to tail.
pub struct Iter<'a, T> {
    chain: &'a Chain<T>,
    cursor: Option<DefaultKey>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let chain = self.chain;
        let node = &chain.nodes[self.cursor?];
        self.cursor = node.next;
        Some(&node.value)
    }
}

impl<'a, T> IntoIterator for &'a Chain<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Chain<T> {
    fn clone(&self) -> Self {
        self.copy().0
    }
}

impl<T> FromIterator<T> for Chain<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut chain = Chain::new();
        let mut tail: Option<NodeHandle> = None;
        for value in iter {
            tail = Some(match tail {
                None => chain.head_insert(value),
                Some(t) => chain.insert_after(t, value),
            });
        }
        chain
    }
}

impl<T: PartialEq> PartialEq for Chain<T> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Chain<T> {}

impl<T: fmt::Debug> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
