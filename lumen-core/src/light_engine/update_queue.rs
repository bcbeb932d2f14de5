//! Pending positions of one light type.

use lumen_utils::BlockPos;
use rustc_hash::FxHashSet;

/// Positions waiting for re-evaluation.
///
/// Scheduling a position that is already pending does nothing. Positions are
/// handed out in the order they were first scheduled.
#[derive(Debug, Default)]
pub struct UpdateQueue {
    pending: FxHashSet<BlockPos>,
    order: Vec<BlockPos>,
}

impl UpdateQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `pos`. Returns false if it was already pending.
    #[inline]
    pub fn push(&mut self, pos: BlockPos) -> bool {
        if self.pending.insert(pos) {
            self.order.push(pos);
            true
        } else {
            false
        }
    }

    /// Whether nothing is pending.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of pending positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Drops every pending position.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.order.clear();
    }

    /// Moves every pending position into `out`, oldest first, and empties the queue.
    pub fn drain_into(&mut self, out: &mut Vec<BlockPos>) {
        out.append(&mut self.order);
        self.pending.clear();
    }
}
