//! Recency-ordered doubly linked list stored in a [`SlotArena`].
//!
//! The front is the most recently used entry and the back the least. Nodes
//! refer to their neighbours by [`SlotId`], so there are no pointers to
//! dangle, and a handle whose node has gone is detected instead of
//! silently aliasing whatever took over the slot.
//!
//! ```text
//!   head ─► [x] ◄──► [y] ◄──► [z] ◄─ tail
//!   (MRU)                        (LRU)
//!
//!   A missing `prev` means "the head" and a missing `next` means "the tail",
//!   so a single pair of helpers can rewrite either a node link or an end:
//!
//!     point_next(None, to)     → head = to
//!     point_prev(None, to)     → tail = to
//! ```
//!
//! All edits are O(1) and take no locks; whoever owns the list serializes
//! access.

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Ordered sequence of values, front = most recently used.
#[derive(Debug)]
pub struct RecencyList<T> {
    nodes: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> RecencyList<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `true` while `id` names a node still in the list.
    pub fn contains(&self, id: SlotId) -> bool {
        self.nodes.contains(id)
    }

    pub fn front(&self) -> Option<&T> {
        self.get(self.head?)
    }

    pub fn back(&self) -> Option<&T> {
        self.get(self.tail?)
    }

    pub fn front_id(&self) -> Option<SlotId> {
        self.head
    }

    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.nodes.get(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.nodes.get_mut(id).map(|node| &mut node.value)
    }

    /// Values from front (MRU) to back (LRU).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len(),
        }
    }

    /// Adds `value` as the most recently used entry.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.nodes.insert(Node {
            value,
            prev: None,
            next: None,
        });
        self.link_after(id, None);
        id
    }

    /// Adds `value` as the least recently used entry.
    pub fn push_back(&mut self, value: T) -> SlotId {
        let id = self.nodes.insert(Node {
            value,
            prev: None,
            next: None,
        });
        self.link_after(id, self.tail);
        id
    }

    /// Removes the least recently used entry.
    pub fn pop_back(&mut self) -> Option<T> {
        self.remove(self.tail?)
    }

    /// Unlinks `id` and returns its value. `None` for a stale handle.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.unlink(id)?;
        self.nodes.remove(id).map(|node| node.value)
    }

    /// Makes `id` the most recently used entry. `false` for a stale handle.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        match self.links(id) {
            None => false,
            // No predecessor: already the head.
            Some((None, _)) => true,
            Some(_) => {
                self.unlink(id);
                self.link_after(id, None);
                true
            },
        }
    }

    /// Drops every node; handles issued before the clear go stale.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    fn links(&self, id: SlotId) -> Option<(Option<SlotId>, Option<SlotId>)> {
        self.nodes.get(id).map(|node| (node.prev, node.next))
    }

    /// Sets the `next` link of `at`, or the head when `at` is `None`.
    fn point_next(&mut self, at: Option<SlotId>, to: Option<SlotId>) {
        match at.and_then(|id| self.nodes.get_mut(id)) {
            Some(node) => node.next = to,
            None => self.head = to,
        }
    }

    /// Sets the `prev` link of `at`, or the tail when `at` is `None`.
    fn point_prev(&mut self, at: Option<SlotId>, to: Option<SlotId>) {
        match at.and_then(|id| self.nodes.get_mut(id)) {
            Some(node) => node.prev = to,
            None => self.tail = to,
        }
    }

    /// Bridges `id`'s neighbours over it. The node itself stays allocated.
    fn unlink(&mut self, id: SlotId) -> Option<()> {
        let (prev, next) = self.links(id)?;
        self.point_next(prev, next);
        self.point_prev(next, prev);
        Some(())
    }

    /// Splices a detached `id` in after `prev`, or at the head for `None`.
    fn link_after(&mut self, id: SlotId, prev: Option<SlotId>) {
        let next = match prev {
            Some(p) => self.links(p).and_then(|(_, n)| n),
            None => self.head,
        };
        if let Some(node) = self.nodes.get_mut(id) {
            node.prev = prev;
            node.next = next;
        }
        self.point_next(prev, Some(id));
        self.point_prev(next, Some(id));
    }

    /// Walks head to tail and verifies the linkage.
    ///
    /// Every node's `prev` must name the node visited before it, the walk
    /// must stop at `tail`, and it must visit exactly `len()` nodes.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut visited = 0usize;
        let mut expected_prev = None;
        let mut cursor = self.head;

        while let Some(id) = cursor {
            let (prev, next) = self.links(id).ok_or_else(|| {
                InvariantError::new(format!("link to vacant slot {}", id.index()))
            })?;
            if prev != expected_prev {
                return Err(InvariantError::new(format!(
                    "slot {} links back to {:?}, walk came from {:?}",
                    id.index(),
                    prev,
                    expected_prev
                )));
            }
            visited += 1;
            if visited > self.len() {
                return Err(InvariantError::new("cycle detected in recency list"));
            }
            expected_prev = Some(id);
            cursor = next;
        }

        if expected_prev != self.tail {
            return Err(InvariantError::new(format!(
                "walk ended at {:?} but tail is {:?}",
                expected_prev, self.tail
            )));
        }
        if visited != self.len() {
            return Err(InvariantError::new(format!(
                "walk visited {} of {} nodes",
                visited,
                self.len()
            )));
        }
        Ok(())
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over a [`RecencyList`].
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: Option<SlotId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.nodes.get(self.cursor?)?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
