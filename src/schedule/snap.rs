//! Grid snapping for timeline drag and resize

use crate::domain::{TimeOfDay, MINUTES_PER_DAY};

/// Timeline grid in minutes
pub const SNAP_MINUTES: i32 = 15;

/// Latest start a dragged item can land on (23:45)
pub const LATEST_START: i32 = MINUTES_PER_DAY as i32 - SNAP_MINUTES;

/// Round to the nearest grid line; halfway rounds up. Saturates at the
/// ends of `i32`.
fn round_to_grid(minutes: i32) -> i32 {
    minutes
        .saturating_add(SNAP_MINUTES / 2)
        .div_euclid(SNAP_MINUTES)
        .saturating_mul(SNAP_MINUTES)
}

/// Start time for an item dropped at `raw_minutes` past midnight.
///
/// Values outside the day (from dragging past either edge) are clamped to
/// 00:00 ..= 23:45.
pub fn snap_start(raw_minutes: i32) -> TimeOfDay {
    let snapped = round_to_grid(raw_minutes).clamp(0, LATEST_START);
    TimeOfDay::from_minutes(snapped as u16).unwrap_or(TimeOfDay::MIDNIGHT)
}

/// Duration after a resize, never shorter than one grid step
pub fn snap_duration(raw_minutes: i32) -> u32 {
    round_to_grid(raw_minutes).max(SNAP_MINUTES) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_to_0907_snaps_to_grid() {
        let t = snap_start(9 * 60 + 7);
        assert_eq!(t.to_string(), "09:00");
        assert_eq!(t.minutes() % 15, 0);
        assert_eq!(snap_start(9 * 60 + 8).to_string(), "09:15");
    }

    #[test]
    fn test_every_minute_lands_on_grid() {
        for raw in -30..(24 * 60 + 30) {
            let t = snap_start(raw);
            assert_eq!(t.minutes() % 15, 0, "raw {raw}");
            assert!((t.minutes() as i32) <= LATEST_START);
        }
    }

    #[test]
    fn test_edges_clamp() {
        assert_eq!(snap_start(-40).to_string(), "00:00");
        assert_eq!(snap_start(23 * 60 + 59).to_string(), "23:45");
    }

    #[test]
    fn test_duration_floor() {
        assert_eq!(snap_duration(3), 15);
        assert_eq!(snap_duration(-20), 15);
        assert_eq!(snap_duration(37), 30);
        assert_eq!(snap_duration(38), 45);
        assert_eq!(snap_duration(90), 90);
    }

    #[test]
    fn test_extreme_inputs_saturate() {
        assert_eq!(snap_start(i32::MAX).to_string(), "23:45");
        assert_eq!(snap_start(i32::MIN).to_string(), "00:00");
        assert_eq!(snap_duration(i32::MIN), 15);

        let longest = snap_duration(i32::MAX);
        assert_eq!(longest % 15, 0);
        assert!(longest > 0);
    }
}
