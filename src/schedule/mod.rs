//! Timeline scheduling for tasks and time-boxed habits
//!
//! Items with a time of day sit on today's timeline, the rest live in the
//! inbox. Dragging snaps to a 15 minute grid; overlaps are allowed.

mod snap;
mod timeline;

pub use snap::{snap_duration, snap_start, LATEST_START, SNAP_MINUTES};
pub use timeline::{DayView, ItemKind, ItemRef, TimelineItem};

use crate::domain::{Habit, Task, TimeOfDay};

/// Anything that can be placed on the timeline
pub trait Schedulable {
    fn slot(&self) -> Option<TimeOfDay>;
    fn set_slot(&mut self, time: Option<TimeOfDay>);
    fn set_duration(&mut self, minutes: u32);
}

impl Schedulable for Task {
    fn slot(&self) -> Option<TimeOfDay> {
        self.due_time
    }

    fn set_slot(&mut self, time: Option<TimeOfDay>) {
        self.due_time = time;
    }

    fn set_duration(&mut self, minutes: u32) {
        self.duration = minutes;
    }
}

impl Schedulable for Habit {
    fn slot(&self) -> Option<TimeOfDay> {
        self.time
    }

    fn set_slot(&mut self, time: Option<TimeOfDay>) {
        self.time = time;
    }

    fn set_duration(&mut self, minutes: u32) {
        self.duration = Some(minutes);
    }
}

/// Drop an item at `raw_minutes` past midnight; returns the snapped start.
/// Duration is left untouched.
pub fn drop_at<T: Schedulable + ?Sized>(item: &mut T, raw_minutes: i32) -> TimeOfDay {
    let start = snap_start(raw_minutes);
    item.set_slot(Some(start));
    start
}

/// Resize to `raw_minutes`; returns the snapped duration. Start is kept.
pub fn resize<T: Schedulable + ?Sized>(item: &mut T, raw_minutes: i32) -> u32 {
    let duration = snap_duration(raw_minutes);
    item.set_duration(duration);
    duration
}

/// Take an item off the timeline
pub fn move_to_inbox<T: Schedulable + ?Sized>(item: &mut T) {
    item.set_slot(None);
}
