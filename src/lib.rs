//! Lumen - a gamified life tracker
//!
//! Lumen keeps a journal, mood log, tasks, habits and goals in a local
//! SQLite file and turns progress into XP, levels, streaks and badges. A
//! companion ("Sophus") backed by a language model writes prompts,
//! insights and plans.
//!
//! ## Layout
//!
//! - [`app`]: the single state owner. Mutations are [`app::Action`]s sent
//!   through [`app::Controller::dispatch`].
//! - [`gamification`]: XP ledger, levels, ranks, streak and badges
//! - [`schedule`]: today's timeline vs. inbox, drag and resize snapping
//! - [`assistant`]: the [`assistant::Delegate`] seam and its Gemini client
//! - [`store`]: one JSON snapshot per storage key
//! - [`clock`]: injectable "now" so date logic stays testable

pub mod app;
pub mod assistant;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod gamification;
pub mod insights;
pub mod schedule;
pub mod store;

pub use domain::*;
pub use error::{LumenError, Result};
