//! Application state and the controller that owns it

mod action;
mod controller;
mod state;

pub use action::{Action, NewEntry, NewHabit, NewTask};
pub use controller::{ChatTurn, Controller};
pub use state::AppState;

use crate::store::StorageKey;

/// Sent to subscribers after a storage key was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub key: StorageKey,
}
