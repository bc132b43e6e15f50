//! Undo/redo snapshot stacks for the ring being edited.
//!
//! Stacks hold full ring snapshots, not deltas. Rings are tens of vertices
//! at most, so whole-copy history is simpler to get right and cheap enough.
//!
//! The stacks never contain the *current* ring: every committed mutation
//! pushes the pre-mutation snapshot, and `undo`/`redo` exchange the caller's
//! current ring against the stack tops. The undo-while-actively-sketching
//! special case (removing the last placed vertex) lives in
//! [`super::DrawSession`], not here.

use crate::constants::MAX_HISTORY_SIZE;

use super::ring::CoordinateRing;

/// Linear-timeline undo/redo stacks of ring snapshots.
#[derive(Debug, Default)]
pub struct RingHistory {
    /// Pre-mutation snapshots that can be restored (most recent last)
    undo_stack: Vec<CoordinateRing>,
    /// Snapshots undone past, restorable until the next push (most recent last)
    redo_stack: Vec<CoordinateRing>,
}

impl RingHistory {
    /// Record the pre-mutation state of a committed change.
    ///
    /// Clears the redo stack: the timeline is linear, a new change after an
    /// undo discards the undone branch.
    pub fn push(&mut self, ring: CoordinateRing) {
        self.redo_stack.clear();

        self.undo_stack.push(ring);

        // Trim history if it exceeds max size
        while self.undo_stack.len() > MAX_HISTORY_SIZE {
            self.undo_stack.remove(0);
        }
    }

    /// Pop the most recent snapshot, parking `current` on the redo stack.
    /// Returns `None` (and leaves `current` untouched) when there is
    /// nothing to undo.
    pub fn undo(&mut self, current: &CoordinateRing) -> Option<CoordinateRing> {
        let restored = self.undo_stack.pop()?;
        self.redo_stack.push(current.clone());
        Some(restored)
    }

    /// Symmetric counterpart of [`Self::undo`].
    pub fn redo(&mut self, current: &CoordinateRing) -> Option<CoordinateRing> {
        let restored = self.redo_stack.pop()?;
        self.undo_stack.push(current.clone());
        Some(restored)
    }

    /// Check if there are snapshots to undo
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if there are snapshots to redo
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the count of undoable snapshots
    #[allow(dead_code)]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the count of redoable snapshots
    #[allow(dead_code)]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::DVec2;

    fn ring(coords: &[(f64, f64)]) -> CoordinateRing {
        CoordinateRing::from_coords(coords.iter().map(|&(x, y)| DVec2::new(x, y)).collect())
    }

    #[test]
    fn test_push_makes_undo_available() {
        let mut history = RingHistory::default();
        assert!(!history.can_undo());

        history.push(ring(&[(0.0, 0.0)]));
        assert!(history.can_undo());
        assert_eq!(history.undo_count(), 1);
    }

    #[test]
    fn test_undo_redo_round_trip_restores_ring() {
        let mut history = RingHistory::default();
        let before = ring(&[(0.0, 0.0), (1.0, 0.0)]);
        let after = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);

        history.push(before.clone());

        let restored = history.undo(&after).unwrap();
        assert_eq!(restored, before);
        assert!(history.can_redo());

        let replayed = history.redo(&restored).unwrap();
        assert_eq!(replayed, after);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_empty_stack_is_noop() {
        let mut history = RingHistory::default();
        let current = ring(&[(5.0, 5.0)]);
        assert!(history.undo(&current).is_none());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_redo_empty_stack_is_noop() {
        let mut history = RingHistory::default();
        assert!(history.redo(&ring(&[])).is_none());
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = RingHistory::default();
        history.push(ring(&[(0.0, 0.0)]));
        history.push(ring(&[(1.0, 1.0)]));

        let _ = history.undo(&ring(&[(2.0, 2.0)]));
        assert!(history.can_redo());

        // A new committed change discards the undone branch
        history.push(ring(&[(3.0, 3.0)]));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_history_trimmed_to_max_size() {
        let mut history = RingHistory::default();
        for i in 0..150 {
            history.push(ring(&[(i as f64, 0.0)]));
        }
        assert_eq!(history.undo_count(), crate::constants::MAX_HISTORY_SIZE);
    }

    #[test]
    fn test_clear_empties_both_stacks() {
        let mut history = RingHistory::default();
        history.push(ring(&[(0.0, 0.0)]));
        let _ = history.undo(&ring(&[(1.0, 1.0)]));
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
