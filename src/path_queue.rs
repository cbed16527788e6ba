use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

use crate::utils::{self, FnvHashMap};

#[derive(Debug, Clone, PartialEq, Eq)]
struct QueueEntry<T> {
    item: T,
    priority: u32,
    sequence: u64,
}

impl<T: Eq> Ord for QueueEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse for BinaryHeap to be a min-heap, equal priorities come out first in first out
        (self.priority, self.sequence).cmp(&(other.priority, other.sequence)).reverse()
    }
}

impl<T: Eq> PartialOrd for QueueEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min priority queue with lazy decrease-key.
///
/// Enqueueing an item that is already queued keeps whichever priority is lower. Superseded heap
/// entries stay in the heap and are skipped when they surface.
#[derive(Debug, Clone)]
pub struct PathQueue<T: Hash + Eq + Copy> {
    heap: BinaryHeap<QueueEntry<T>>,
    live: FnvHashMap<T, u32>,
    next_sequence: u64,
}

impl<T: Hash + Eq + Copy> PathQueue<T> {
    pub fn new() -> PathQueue<T> {
        PathQueue::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> PathQueue<T> {
        PathQueue {
            heap: BinaryHeap::with_capacity(capacity),
            live: utils::fnv_hashmap(capacity),
            next_sequence: 0,
        }
    }

    pub fn enqueue(&mut self, item: T, priority: u32) {
        let best = self.live.entry(item).or_insert(priority);
        if priority > *best {
            return;
        }
        *best = priority;

        self.heap.push(QueueEntry {
            item,
            priority,
            sequence: self.next_sequence,
        });
        self.next_sequence += 1;
    }

    /// Remove the item with the lowest priority.
    pub fn dequeue_min(&mut self) -> Option<(T, u32)> {
        while let Some(entry) = self.heap.pop() {
            if self.live.get(&entry.item) == Some(&entry.priority) {
                self.live.remove(&entry.item);
                return Some((entry.item, entry.priority));
            }
        }
        None
    }

    pub fn contains(&self, item: &T) -> bool {
        self.live.contains_key(item)
    }

    pub fn priority_of(&self, item: &T) -> Option<u32> {
        self.live.get(item).cloned()
    }

    /// The number of distinct queued items, superseded entries are not counted.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl<T: Hash + Eq + Copy> Default for PathQueue<T> {
    fn default() -> PathQueue<T> {
        PathQueue::new()
    }
}
