// Fixed-capacity history buffer

/// Circular buffer holding at most `capacity` items.
///
/// The buffer is pre-filled at creation so that `snapshot()` always has
/// exactly `capacity` entries; once full, each push overwrites the oldest slot.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Vec<T>,
    // Index of the oldest item
    zero: usize,
}

impl<T: Clone> RingBuffer<T> {
    pub fn new(capacity: usize, fill: T) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![fill; capacity],
            zero: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn push(&mut self, item: T) {
        self.slots[self.zero] = item;
        self.zero = (self.zero + 1) % self.slots.len();
    }

    /// Ordered copy, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        let (newer, older) = self.slots.split_at(self.zero);
        older.iter().chain(newer.iter()).cloned().collect()
    }

    pub fn latest(&self) -> &T {
        let size = self.slots.len();
        &self.slots[(self.zero + size - 1) % size]
    }
}
