//! Bounded seat-count selector with press-and-hold auto-repeat.
//!
//! The selector is a pure state machine: `Idle`, repeating up, or repeating
//! down. Auto-repeat is not a free-floating interval handle - it is a chain of
//! `Effect::Delay` ticks that the reducer re-arms only while the repeat state
//! still matches. Each armed chain carries the epoch at which it was started;
//! ending a repeat (or starting the opposite direction) bumps the epoch, so a
//! tick that was already sleeping when the state changed arrives with a stale
//! epoch and dies without mutating anything. That makes start idempotent and
//! stop always safe, and a "stuck" repeat after release or teardown impossible.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed period of the auto-repeat tick chain
pub const REPEAT_PERIOD: Duration = Duration::from_millis(100);

/// Direction of a count adjustment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatDirection {
    /// Towards `max_selectable`
    Up,
    /// Towards zero
    Down,
}

/// Auto-repeat portion of the selector state
///
/// `active` is the direction currently repeating, if any; the two directions
/// are mutually exclusive. `epoch` is a generation counter bumped on every
/// transition, used to invalidate ticks armed under a previous generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RepeatState {
    /// Direction currently repeating, `None` when idle
    pub active: Option<RepeatDirection>,
    /// Generation counter for tick validation
    pub epoch: u64,
}

/// Seats currently chosen, bounded by the remaining inventory
///
/// Invariant: every mutation clamps `count` into `0..=max_selectable`, so a
/// bound that shrank since the last mutation is re-applied on the very next
/// step (including every auto-repeat tick).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Seats currently chosen
    pub count: u32,
    /// Upper bound, derived from `total_seats - sold_seats`
    pub max_selectable: u32,
    /// Press-and-hold auto-repeat machine
    pub repeat: RepeatState,
}

impl SelectionState {
    /// Increase the count by one, clamped to the bound; no-op at the ceiling
    pub const fn increment(&mut self) {
        self.count = next_count(self.count, RepeatDirection::Up, self.max_selectable);
    }

    /// Decrease the count by one, clamped to zero; no-op at the floor
    pub const fn decrement(&mut self) {
        self.count = next_count(self.count, RepeatDirection::Down, self.max_selectable);
    }

    /// Apply one step in the given direction, clamped into range
    pub const fn step(&mut self, direction: RepeatDirection) {
        self.count = next_count(self.count, direction, self.max_selectable);
    }

    /// Clear the selection
    pub const fn reset(&mut self) {
        self.count = 0;
    }

    /// Install a freshly-fetched bound
    ///
    /// When the bound shrinks below the current count, the selection is reset
    /// to zero rather than silently clamped to the new ceiling - the seats the
    /// user had chosen no longer exist.
    pub const fn set_bound(&mut self, bound: u32) {
        self.max_selectable = bound;
        if self.count > bound {
            self.count = 0;
        }
    }

    /// Fail-closed bound after an inventory fetch failure
    ///
    /// The bound drops to zero so nothing can be selected against unknown
    /// inventory. The count is left in place and clamps on the next mutation.
    pub const fn fail_closed(&mut self) {
        self.max_selectable = 0;
    }

    /// Start auto-repeat in `direction`
    ///
    /// Returns `true` when a new tick chain must be armed. Idempotent: if the
    /// same direction is already repeating, nothing changes and no second
    /// chain is armed. Starting while the opposite direction is active cancels
    /// it first (the epoch bump kills its chain).
    pub fn begin_repeat(&mut self, direction: RepeatDirection) -> bool {
        if self.repeat.active == Some(direction) {
            return false;
        }
        self.repeat.active = Some(direction);
        self.repeat.epoch += 1;
        true
    }

    /// Stop auto-repeat in `direction`
    ///
    /// Safe to call when nothing is repeating, or when the other direction is
    /// active - both are no-ops. Invoked on explicit release, on the pointer
    /// leaving the control, and on teardown.
    pub fn end_repeat(&mut self, direction: RepeatDirection) {
        if self.repeat.active == Some(direction) {
            self.repeat.active = None;
            self.repeat.epoch += 1;
        }
    }

    /// Whether a tick armed at `epoch` in `direction` is still live
    #[must_use]
    pub fn tick_is_live(&self, direction: RepeatDirection, epoch: u64) -> bool {
        epoch == self.repeat.epoch && self.repeat.active == Some(direction)
    }
}

/// One clamped step of the bounded counter
const fn next_count(count: u32, direction: RepeatDirection, max: u32) -> u32 {
    let stepped = match direction {
        RepeatDirection::Up => count.saturating_add(1),
        RepeatDirection::Down => count.saturating_sub(1),
    };
    if stepped > max { max } else { stepped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn increment_clamps_at_bound() {
        let mut selection = SelectionState {
            count: 3,
            max_selectable: 3,
            ..Default::default()
        };
        selection.increment();
        assert_eq!(selection.count, 3);
    }

    #[test]
    fn decrement_clamps_at_zero() {
        let mut selection = SelectionState::default();
        selection.decrement();
        assert_eq!(selection.count, 0);
    }

    #[test]
    fn shrinking_bound_below_count_resets() {
        let mut selection = SelectionState {
            count: 5,
            max_selectable: 10,
            ..Default::default()
        };
        selection.set_bound(3);
        assert_eq!(selection.count, 0);
        assert_eq!(selection.max_selectable, 3);
    }

    #[test]
    fn growing_bound_keeps_count() {
        let mut selection = SelectionState {
            count: 2,
            max_selectable: 5,
            ..Default::default()
        };
        selection.set_bound(8);
        assert_eq!(selection.count, 2);
    }

    #[test]
    fn fail_closed_leaves_count_until_next_mutation() {
        let mut selection = SelectionState {
            count: 4,
            max_selectable: 10,
            ..Default::default()
        };
        selection.fail_closed();
        assert_eq!(selection.count, 4);
        assert_eq!(selection.max_selectable, 0);

        selection.increment();
        assert_eq!(selection.count, 0);
    }

    #[test]
    fn begin_repeat_is_idempotent() {
        let mut selection = SelectionState::default();
        assert!(selection.begin_repeat(RepeatDirection::Up));
        let epoch = selection.repeat.epoch;
        assert!(!selection.begin_repeat(RepeatDirection::Up));
        assert_eq!(selection.repeat.epoch, epoch);
    }

    #[test]
    fn begin_repeat_cancels_opposite_direction() {
        let mut selection = SelectionState::default();
        assert!(selection.begin_repeat(RepeatDirection::Up));
        let up_epoch = selection.repeat.epoch;

        assert!(selection.begin_repeat(RepeatDirection::Down));
        assert_eq!(selection.repeat.active, Some(RepeatDirection::Down));
        assert!(!selection.tick_is_live(RepeatDirection::Up, up_epoch));
    }

    #[test]
    fn end_repeat_without_active_is_noop() {
        let mut selection = SelectionState::default();
        let before = selection.repeat;
        selection.end_repeat(RepeatDirection::Down);
        assert_eq!(selection.repeat, before);
    }

    #[test]
    fn end_repeat_invalidates_in_flight_tick() {
        let mut selection = SelectionState::default();
        selection.begin_repeat(RepeatDirection::Up);
        let epoch = selection.repeat.epoch;
        assert!(selection.tick_is_live(RepeatDirection::Up, epoch));

        selection.end_repeat(RepeatDirection::Up);
        assert!(!selection.tick_is_live(RepeatDirection::Up, epoch));
    }

    proptest! {
        /// Invariant: after any sequence of steps, 0 <= count <= max_selectable.
        #[test]
        fn count_stays_in_range(
            max in 0u32..50,
            steps in proptest::collection::vec(any::<bool>(), 0..200),
        ) {
            let mut selection = SelectionState {
                count: 0,
                max_selectable: max,
                ..Default::default()
            };
            for up in steps {
                if up {
                    selection.increment();
                } else {
                    selection.decrement();
                }
                prop_assert!(selection.count <= selection.max_selectable);
            }
        }
    }
}
