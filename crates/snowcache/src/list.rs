//! Recency list: doubly-linked list of cache entries
//!
//! Nodes live in an arena and link to each other by slot index, so the list
//! owns every node outright and callers hold only [`NodeHandle`]s. Each slot
//! carries a generation stamp that changes when the slot is freed, so a
//! handle to an evicted node can't reach whichever node reuses the slot.
//!
//! Order runs from head (most recently used) to tail (least recently used).
//! `prev` points toward the head, `next` toward the tail.

/// Largest number of nodes a list can address
pub const MAX_NODES: usize = u32::MAX as usize;

/// Non-owning reference to a node in a [`RecencyList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    index: u32,
    generation: u32,
}

struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<u32>,
    next: Option<u32>,
}

struct Slot<K, V> {
    generation: u32,
    node: Option<Node<K, V>>,
}

/// Recency-ordered list with O(1) insert, promote and evict
pub struct RecencyList<K, V> {
    slots: Vec<Slot<K, V>>,
    free_list: Vec<u32>,
    head: Option<u32>,
    tail: Option<u32>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with arena room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of linked nodes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle to the most recently used node
    pub fn head(&self) -> Option<NodeHandle> {
        self.head.map(|idx| self.handle(idx))
    }

    /// Handle to the least recently used node
    pub fn tail(&self) -> Option<NodeHandle> {
        self.tail.map(|idx| self.handle(idx))
    }

    /// Key of the least recently used node
    pub fn tail_key(&self) -> Option<&K> {
        self.tail.and_then(|idx| self.node(idx)).map(|node| &node.key)
    }

    /// Check that `handle` still refers to a linked node
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|slot| slot.generation == handle.generation && slot.node.is_some())
    }

    /// Key stored at `handle`
    pub fn key(&self, handle: NodeHandle) -> Option<&K> {
        self.resolve(handle).map(|node| &node.key)
    }

    /// Value stored at `handle`
    pub fn value(&self, handle: NodeHandle) -> Option<&V> {
        self.resolve(handle).map(|node| &node.value)
    }

    /// Mutable value stored at `handle`; recency is left unchanged
    pub fn value_mut(&mut self, handle: NodeHandle) -> Option<&mut V> {
        if !self.contains(handle) {
            return None;
        }
        self.node_mut(handle.index).map(|node| &mut node.value)
    }

    /// Insert a new node as the head
    ///
    /// # Returns
    /// * `NodeHandle` - Handle valid until the node is removed
    pub fn insert_at_head(&mut self, key: K, value: V) -> NodeHandle {
        let idx = self.alloc_slot();
        self.slots[idx as usize].node = Some(Node {
            key,
            value,
            prev: None,
            next: None,
        });
        self.link_front(idx);
        self.len += 1;
        self.handle(idx)
    }

    /// Move the node at `handle` to the head
    ///
    /// # Returns
    /// * `bool` - False if the handle is stale
    pub fn move_to_head(&mut self, handle: NodeHandle) -> bool {
        if !self.contains(handle) {
            return false;
        }
        if self.head == Some(handle.index) {
            return true; // Already at front
        }

        self.unlink(handle.index);
        self.link_front(handle.index);
        true
    }

    /// Unlink and return the least recently used entry
    pub fn remove_tail(&mut self) -> Option<(K, V)> {
        let tail = self.tail?;
        self.release(tail)
    }

    /// Unlink and return the entry at `handle`
    pub fn remove(&mut self, handle: NodeHandle) -> Option<(K, V)> {
        if !self.contains(handle) {
            return None;
        }
        self.release(handle.index)
    }

    /// Drop every node, invalidating all outstanding handles
    pub fn clear(&mut self) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free_list.push(idx as u32);
            }
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterate entries from most to least recently used
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Walk the links both ways and check them against `len`
    pub(crate) fn is_well_formed(&self) -> bool {
        let mut forward = 0;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let Some(node) = self.node(idx) else {
                return false;
            };
            if node.prev != prev || forward > self.len {
                return false;
            }
            forward += 1;
            prev = Some(idx);
            cursor = node.next;
        }
        if prev != self.tail || forward != self.len {
            return false;
        }

        let mut backward = 0;
        let mut cursor = self.tail;
        while let Some(idx) = cursor {
            let Some(node) = self.node(idx) else {
                return false;
            };
            backward += 1;
            if backward > self.len {
                return false;
            }
            cursor = node.prev;
        }
        backward == self.len
    }

    fn handle(&self, idx: u32) -> NodeHandle {
        NodeHandle {
            index: idx,
            generation: self.slots[idx as usize].generation,
        }
    }

    fn resolve(&self, handle: NodeHandle) -> Option<&Node<K, V>> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node(&self, idx: u32) -> Option<&Node<K, V>> {
        self.slots.get(idx as usize).and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, idx: u32) -> Option<&mut Node<K, V>> {
        self.slots.get_mut(idx as usize).and_then(|slot| slot.node.as_mut())
    }

    fn link_front(&mut self, idx: u32) {
        let old_head = self.head;

        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = old_head;
        }

        if let Some(head_idx) = old_head {
            if let Some(head) = self.node_mut(head_idx) {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn unlink(&mut self, idx: u32) {
        let (prev, next) = match self.node(idx) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = self.node_mut(prev_idx) {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = self.node_mut(next_idx) {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = None;
        }
    }

    fn release(&mut self, idx: u32) -> Option<(K, V)> {
        self.unlink(idx);
        let slot = &mut self.slots[idx as usize];
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(idx);
        self.len -= 1;
        Some((node.key, node.value))
    }

    fn alloc_slot(&mut self) -> u32 {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            debug_assert!(self.slots.len() < MAX_NODES, "recency list arena exhausted");
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: None,
            });
            idx
        }
    }
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a [`RecencyList`], head to tail
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<u32>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
