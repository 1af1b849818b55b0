//! Fixed-capacity ring buffer.

use std::num::NonZeroUsize;

/// A fixed-capacity FIFO that overwrites its oldest element when full.
#[derive(Debug)]
pub struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer holding at most `capacity` elements.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        let cap = capacity.get();
        let mut slots = Vec::with_capacity(cap);
        slots.resize_with(cap, || None);
        Self {
            slots,
            head: 0,
            len: 0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends a value, returning the evicted oldest value when full.
    pub fn push(&mut self, value: T) -> Option<T> {
        let cap = self.slots.len();
        if self.len < cap {
            let idx = (self.head + self.len) % cap;
            self.slots[idx] = Some(value);
            self.len += 1;
            None
        } else {
            let evicted = self.slots[self.head].replace(value);
            self.head = (self.head + 1) % cap;
            evicted
        }
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        let cap = self.slots.len();
        (0..self.len).filter_map(move |i| self.slots[(self.head + i) % cap].as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(cap: usize) -> RingBuffer<u32> {
        RingBuffer::new(NonZeroUsize::new(cap).unwrap())
    }

    #[test]
    fn push_until_full() {
        let mut buf = ring(3);
        assert_eq!(buf.push(1), None);
        assert_eq!(buf.push(2), None);
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn overflow_evicts_oldest() {
        let mut buf = ring(3);
        for value in 1..=3 {
            buf.push(value);
        }
        assert_eq!(buf.push(4), Some(1));
        assert_eq!(buf.push(5), Some(2));
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(buf.iter().rev().copied().collect::<Vec<_>>(), vec![5, 4, 3]);
    }

    #[test]
    fn clear_resets() {
        let mut buf = ring(2);
        buf.push(1);
        buf.push(2);
        buf.push(3);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.iter().count(), 0);
        buf.push(9);
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![9]);
    }

    #[test]
    fn capacity_one() {
        let mut buf = ring(1);
        assert_eq!(buf.push(1), None);
        assert_eq!(buf.push(2), Some(1));
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(buf.capacity(), 1);
    }
}
