//! Applying a placement order to per-brick placement state.
//!
//! Placement is monotonic: once a brick records its stride it is never cleared, and a
//! failed step leaves every earlier write in place.

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};
use wall_core::{unknown_brick, BrickId, ErrorInfo, WallError};

use crate::order::PlacementOrder;

/// Stride each brick was placed in, `None` while unplaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementState {
    placed_in_stride: Vec<Option<usize>>,
}

impl PlacementState {
    /// State for `len` unplaced bricks.
    pub fn new(len: usize) -> Self {
        Self {
            placed_in_stride: vec![None; len],
        }
    }

    /// Stride the brick was placed in, if any. Unknown ids read as unplaced.
    pub fn placed_in_stride(&self, id: BrickId) -> Option<usize> {
        self.placed_in_stride.get(id.index()).copied().flatten()
    }

    /// All entries indexed by brick.
    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.placed_in_stride
    }

    /// Number of bricks tracked.
    pub fn len(&self) -> usize {
        self.placed_in_stride.len()
    }

    /// Whether no bricks are tracked.
    pub fn is_empty(&self) -> bool {
        self.placed_in_stride.is_empty()
    }

    /// Number of placed bricks.
    pub fn placed_count(&self) -> usize {
        self.placed_in_stride.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether every brick is placed.
    pub fn is_complete(&self) -> bool {
        self.placed_in_stride.iter().all(Option::is_some)
    }

    /// Starts applying `order`. Nothing is written until the cursor is advanced.
    pub fn apply<'a>(&'a mut self, order: &'a PlacementOrder) -> PlacementCursor<'a> {
        PlacementCursor {
            state: self,
            order,
            stride: 0,
            position: 0,
            sequence: 0,
            finished: false,
        }
    }

    fn place(&mut self, brick: BrickId, stride: usize) -> Result<(), WallError> {
        let len = self.placed_in_stride.len();
        let slot = self
            .placed_in_stride
            .get_mut(brick.index())
            .ok_or_else(|| unknown_brick(brick, len))?;
        if let Some(previous) = *slot {
            return Err(WallError::Replay(
                ErrorInfo::new("already-placed", "brick was already placed")
                    .with_context("brick", brick)
                    .with_context("placed_in_stride", previous)
                    .with_context("stride", stride)
                    .with_hint("apply a placement order to fresh state only once"),
            ));
        }
        *slot = Some(stride);
        Ok(())
    }
}

/// One brick placed by a [`PlacementCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementEvent {
    /// The placed brick.
    pub brick: BrickId,
    /// Stride it was placed in.
    pub stride: usize,
    /// Position within the stride.
    pub position: usize,
    /// Position within the whole order.
    pub sequence: usize,
}

/// Single-pass cursor placing one brick per step.
///
/// Stops for good after the last brick or after the first error; further calls to
/// [`PlacementCursor::place_next`] fail with `sequence-exhausted`. The iterator view
/// yields each step's result and then ends.
#[derive(Debug)]
pub struct PlacementCursor<'a> {
    state: &'a mut PlacementState,
    order: &'a PlacementOrder,
    stride: usize,
    position: usize,
    sequence: usize,
    finished: bool,
}

impl PlacementCursor<'_> {
    /// Places the next brick, or returns `Ok(None)` once after the last one.
    pub fn place_next(&mut self) -> Result<Option<PlacementEvent>, WallError> {
        if self.finished {
            return Err(WallError::Replay(
                ErrorInfo::new("sequence-exhausted", "placement sequence already consumed")
                    .with_context("placed", self.sequence),
            ));
        }
        let strides = self.order.strides();
        while self.stride < strides.len() && self.position >= strides[self.stride].len() {
            self.stride += 1;
            self.position = 0;
        }
        let Some(brick) = strides
            .get(self.stride)
            .and_then(|bricks| bricks.get(self.position))
            .copied()
        else {
            self.finished = true;
            return Ok(None);
        };

        if let Err(err) = self.state.place(brick, self.stride) {
            self.finished = true;
            return Err(err);
        }
        let event = PlacementEvent {
            brick,
            stride: self.stride,
            position: self.position,
            sequence: self.sequence,
        };
        self.position += 1;
        self.sequence += 1;
        Ok(Some(event))
    }

    /// Bricks placed through this cursor so far.
    pub fn placed(&self) -> usize {
        self.sequence
    }

    /// Whether the cursor has stopped.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Current placement state.
    pub fn state(&self) -> &PlacementState {
        &*self.state
    }
}

impl Iterator for PlacementCursor<'_> {
    type Item = Result<PlacementEvent, WallError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        self.place_next().transpose()
    }
}

impl FusedIterator for PlacementCursor<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(strides: &[&[u32]]) -> PlacementOrder {
        PlacementOrder::new(
            strides
                .iter()
                .map(|stride| stride.iter().copied().map(BrickId::from_raw).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn events_follow_strides_then_positions() {
        let order = order(&[&[2, 0], &[1]]);
        let mut state = PlacementState::new(3);
        let events: Vec<_> = state.apply(&order).collect::<Result<_, _>>().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].brick, BrickId::from_raw(2));
        assert_eq!((events[1].stride, events[1].position), (0, 1));
        assert_eq!((events[2].stride, events[2].position, events[2].sequence), (1, 0, 2));
        assert_eq!(state.placed_in_stride(BrickId::from_raw(1)), Some(1));
        assert!(state.is_complete());
    }

    #[test]
    fn exhausted_cursor_reports_replay() {
        let order = order(&[&[0]]);
        let mut state = PlacementState::new(1);
        let mut cursor = state.apply(&order);
        assert!(cursor.place_next().unwrap().is_some());
        assert!(cursor.place_next().unwrap().is_none());
        let err = cursor.place_next().unwrap_err();
        assert_eq!(err.code(), "sequence-exhausted");
        assert!(cursor.next().is_none());
    }

    #[test]
    fn partial_application_is_kept_after_failure() {
        let order = order(&[&[0, 1]]);
        let mut state = PlacementState::new(2);
        {
            let mut cursor = state.apply(&order);
            cursor.place_next().unwrap();
        }
        let mut cursor = state.apply(&order);
        let err = cursor.next().unwrap().unwrap_err();
        assert_eq!(err.code(), "already-placed");
        assert!(cursor.next().is_none());
        assert_eq!(state.placed_count(), 1);
    }

    #[test]
    fn foreign_brick_is_rejected() {
        let order = order(&[&[5]]);
        let mut state = PlacementState::new(2);
        let err = state.apply(&order).next().unwrap().unwrap_err();
        assert_eq!(err.code(), "unknown-brick");
    }
}
