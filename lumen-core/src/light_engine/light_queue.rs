//! FIFO queue for light propagation entries.
//!
//! A ring buffer with a power-of-two capacity, one per light level bucket.

use lumen_utils::BlockPos;

/// A FIFO queue of positions using a ring buffer.
///
/// The backing buffer is always fully initialised and its length is a power of
/// two, so wrapping is a mask instead of a modulo.
#[derive(Debug, Clone)]
pub struct LightQueue {
    buffer: Vec<BlockPos>,
    head: usize,
    len: usize,
}

impl LightQueue {
    /// Creates a new empty light queue with pre-allocated capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Creates a new light queue holding at least `capacity` entries before growing.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(16).next_power_of_two();
        Self {
            buffer: vec![BlockPos::new(0, 0, 0); capacity],
            head: 0,
            len: 0,
        }
    }

    #[inline]
    fn mask(&self) -> usize {
        self.buffer.len() - 1
    }

    /// Appends a position.
    #[inline]
    pub fn enqueue(&mut self, pos: BlockPos) {
        if self.len == self.buffer.len() {
            self.grow();
        }
        let tail = (self.head + self.len) & self.mask();
        self.buffer[tail] = pos;
        self.len += 1;
    }

    /// Removes the oldest position.
    ///
    /// Returns `None` if the queue is empty.
    #[inline]
    pub fn dequeue(&mut self) -> Option<BlockPos> {
        if self.len == 0 {
            return None;
        }
        let item = self.buffer[self.head];
        self.head = (self.head + 1) & self.mask();
        self.len -= 1;
        Some(item)
    }

    /// Checks if the queue is empty.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of entries in the queue.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Clears all entries from the queue.
    #[inline]
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Doubles the buffer, moving the entries to the front in order.
    fn grow(&mut self) {
        let mask = self.mask();
        let mut new_buffer = Vec::with_capacity(self.buffer.len() * 2);
        new_buffer.extend((0..self.len).map(|i| self.buffer[(self.head + i) & mask]));
        new_buffer.resize(self.buffer.len() * 2, BlockPos::new(0, 0, 0));

        self.buffer = new_buffer;
        self.head = 0;
    }
}

impl Default for LightQueue {
    fn default() -> Self {
        Self::new()
    }
}
