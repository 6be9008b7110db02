//! Buffered direction input

use std::collections::VecDeque;

use super::direction::Direction;

/// What happened to an enqueued intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    /// Appended to the queue
    Queued,
    /// Appended after evicting the oldest entry
    Overwrote,
    /// Same as the last buffered direction
    Duplicate,
    /// Opposite of the last buffered direction
    Opposite,
    /// Opposite of the snake's current heading; earns a visual pulse only
    Reversal,
}

/// Bounded FIFO of direction intents, newest overwrites oldest
#[derive(Debug, Clone)]
pub struct InputQueue {
    queue: VecDeque<Direction>,
    capacity: usize,
    capacity_near_wall: usize,
}

impl InputQueue {
    pub fn new(capacity: usize, capacity_near_wall: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity_near_wall),
            capacity,
            capacity_near_wall,
        }
    }

    /// Capacity in effect for the given head position
    pub fn capacity(&self, near_wall: bool) -> usize {
        if near_wall {
            self.capacity_near_wall
        } else {
            self.capacity
        }
    }

    /// Buffer a direction intent.
    ///
    /// `current` is the heading applied last tick and `pending` the direction
    /// the next tick will commit when nothing is queued.
    pub fn enqueue(
        &mut self,
        desired: Direction,
        current: Direction,
        pending: Direction,
        near_wall: bool,
    ) -> Enqueued {
        if desired.is_opposite(&current) {
            return Enqueued::Reversal;
        }

        let last = self.queue.back().copied().unwrap_or(pending);
        if desired == last {
            return Enqueued::Duplicate;
        }
        if desired.is_opposite(&last) {
            return Enqueued::Opposite;
        }

        let capacity = self.capacity(near_wall);
        let mut outcome = Enqueued::Queued;
        while self.queue.len() >= capacity {
            self.queue.pop_front();
            outcome = Enqueued::Overwrote;
        }
        self.queue.push_back(desired);
        outcome
    }

    /// Pop the oldest intent for this tick.
    ///
    /// Returns `None` when empty or when the intent became a reversal of
    /// `current` after it was queued.
    pub fn dequeue_one(&mut self, current: Direction) -> Option<Direction> {
        let next = self.queue.pop_front()?;
        if next.is_opposite(&current) {
            None
        } else {
            Some(next)
        }
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Direction> {
        self.queue.iter()
    }
}
