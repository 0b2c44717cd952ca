//! # Shift-Mode Enforcement
//!
//! Keeps a shape's anchor tick from moving against its configured direction
//! between queries. The combinator is shared by every family: geometric
//! shapes anchor on their min tick, the uniform shape on its lower bound
//! (see `UniformDistribution::with_anchor` for how the upper bound follows).

use crate::types::ShiftMode;

/// Combine a freshly computed anchor with the previously stored one
pub fn enforce_shift(raw_anchor_tick: i32, previous_anchor_tick: i32, mode: ShiftMode) -> i32 {
    match mode {
        ShiftMode::Static | ShiftMode::Both => raw_anchor_tick,
        ShiftMode::Right => raw_anchor_tick.max(previous_anchor_tick),
        ShiftMode::Left => raw_anchor_tick.min(previous_anchor_tick),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_modes_return_raw() {
        assert_eq!(enforce_shift(-50, 100, ShiftMode::Static), -50);
        assert_eq!(enforce_shift(150, 100, ShiftMode::Both), 150);
        assert_eq!(enforce_shift(-50, 100, ShiftMode::Both), -50);
    }

    #[test]
    fn test_monotonic_modes() {
        assert_eq!(enforce_shift(90, 100, ShiftMode::Right), 100);
        assert_eq!(enforce_shift(110, 100, ShiftMode::Right), 110);
        assert_eq!(enforce_shift(90, 100, ShiftMode::Left), 90);
        assert_eq!(enforce_shift(110, 100, ShiftMode::Left), 100);
    }
}
