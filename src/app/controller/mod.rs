//! The state controller
//!
//! [`Controller`] is the only owner of [`AppState`]. Every mutation goes
//! through [`Controller::dispatch`], which validates the action, applies it,
//! re-evaluates badges, writes the touched storage keys and tells
//! subscribers which keys changed. A failed action leaves the state as it
//! was.

mod chat;
mod records;
mod tasks;

pub use chat::ChatTurn;

use std::collections::BTreeSet;
use std::sync::mpsc;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use super::action::Action;
use super::state::AppState;
use super::StateChange;
use crate::clock::Clock;
use crate::config::AppConfig;
use crate::domain::DEFAULT_TASK_XP;
use crate::error::{LumenError, Result};
use crate::gamification::{evaluate_badges, GamificationEvent};
use crate::insights::{daily_points, earliest_record, DayPoint, InsightRange, InsightSummary};
use crate::schedule::DayView;
use crate::store::{StorageKey, Store};

/// Storage keys touched while applying one action
type Changed = BTreeSet<StorageKey>;

pub struct Controller {
    state: AppState,
    store: Store,
    clock: Arc<dyn Clock>,
    subscribers: Vec<mpsc::Sender<StateChange>>,
    default_task_xp: u32,
    locked: bool,
    session_started: bool,
    chat_in_flight: bool,
}

impl Controller {
    /// Load state from `store`. The app starts locked when a PIN lock is
    /// configured.
    pub fn open(store: Store, clock: Arc<dyn Clock>) -> Result<Self> {
        let state = AppState::load(&store)?;
        let locked = state.settings.app_lock_enabled && !state.settings.app_lock_pin.is_empty();

        tracing::debug!(
            tasks = state.tasks.len(),
            habits = state.habits.len(),
            entries = state.entries.len(),
            locked,
            "State loaded"
        );

        Ok(Self {
            state,
            store,
            clock,
            subscribers: Vec::new(),
            default_task_xp: DEFAULT_TASK_XP,
            locked,
            session_started: false,
            chat_in_flight: false,
        })
    }

    pub fn with_config(mut self, config: &AppConfig) -> Self {
        if config.default_task_xp > 0 {
            self.default_task_xp = config.default_task_xp;
        }
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Receive a [`StateChange`] for every key written from now on
    pub fn subscribe(&mut self) -> mpsc::Receiver<StateChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Unlock with the configured PIN
    pub fn unlock(&mut self, pin: &str) -> Result<()> {
        if !self.locked {
            return Ok(());
        }
        if !self.state.settings.pin_matches(pin) {
            tracing::warn!("Wrong PIN");
            return Err(LumenError::Locked);
        }
        self.locked = false;
        tracing::debug!("App unlocked");
        Ok(())
    }

    /// Advance the daily login streak. Only the first call per controller
    /// does anything.
    pub fn start_session(&mut self) -> Result<Vec<GamificationEvent>> {
        if self.session_started {
            return Ok(Vec::new());
        }
        self.session_started = true;

        let today = self.today();
        let now = self.now();
        let mut events = Vec::new();
        let mut changed = Changed::new();

        if let Some(event) = self.state.stats.advance_daily_streak(today) {
            events.push(event);
            changed.insert(StorageKey::Stats);
        }

        let unlocked = evaluate_badges(&mut self.state.stats, &mut self.state.badges, now);
        if !unlocked.is_empty() {
            changed.insert(StorageKey::Stats);
            changed.insert(StorageKey::Badges);
        }
        events.extend(unlocked);

        self.persist(&changed)?;
        Ok(events)
    }

    /// Apply one action and persist the result
    pub fn dispatch(&mut self, action: Action) -> Result<Vec<GamificationEvent>> {
        if self.locked {
            return Err(LumenError::Locked);
        }

        let name = action.name();
        let now = self.now();
        let mut changed = Changed::new();

        let mut events = self.apply(action, now, &mut changed).map_err(|e| {
            tracing::debug!(action = name, error = %e, "Action rejected");
            e
        })?;

        let unlocked = evaluate_badges(&mut self.state.stats, &mut self.state.badges, now);
        if !unlocked.is_empty() {
            changed.insert(StorageKey::Stats);
            changed.insert(StorageKey::Badges);
        }
        events.extend(unlocked);

        self.persist(&changed)?;
        tracing::debug!(action = name, keys = changed.len(), events = events.len(), "Action applied");
        Ok(events)
    }

    fn apply(
        &mut self,
        action: Action,
        now: DateTime<Utc>,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        match action {
            Action::AddTask(new) => self.add_task(new, changed),
            Action::CompleteTask { id } => self.toggle_task(&id, now, changed),
            Action::DeleteTask { id } => self.delete_task(&id, changed),
            Action::ScheduleItem {
                item,
                start_minutes,
            } => self.schedule_item(&item, start_minutes, changed),
            Action::ResizeItem {
                item,
                duration_minutes,
            } => self.resize_item(&item, duration_minutes, changed),
            Action::UnscheduleItem { item } => self.unschedule_item(&item, changed),
            Action::AddHabit(new) => self.add_habit(new, changed),
            Action::ToggleHabit { id } => self.toggle_habit(&id, now, changed),
            Action::RelapseHabit { id } => self.relapse_habit(&id, now, changed),
            Action::DeleteHabit { id } => self.delete_habit(&id, changed),
            Action::AddJournalEntry(new) => self.add_journal_entry(new, now, changed),
            Action::DeleteJournalEntry { id } => self.delete_journal_entry(&id, changed),
            Action::LogMood { mood, note } => self.log_mood(mood, note, now, changed),
            Action::AddGoal { title } => self.add_goal(&title, now, changed).map(|_| Vec::new()),
            Action::SetGoalStatus { id, status } => self.set_goal_status(&id, status, changed),
            Action::DeleteGoal { id } => self.delete_goal(&id, changed),
            Action::BreakdownGoal { title } => self.breakdown_goal(&title, now, changed),
            Action::AcceptPlan { message_id } => self.accept_plan(&message_id, changed),
            Action::AppendChatMessage(message) => {
                self.state.chat.push(message);
                changed.insert(StorageKey::Chat);
                Ok(Vec::new())
            }
            Action::ClearChat => self.clear_chat(changed),
            Action::UpdateSettings(settings) => self.update_settings(*settings, changed),
            Action::LikeQuote { quote } => self.like_quote(&quote, changed),
        }
    }

    /// Wipe every stored key and go back to first-run defaults
    pub fn reset(&mut self) -> Result<()> {
        if self.locked {
            return Err(LumenError::Locked);
        }
        self.store.clear()?;
        self.state = AppState::default();
        self.chat_in_flight = false;
        tracing::info!("All data reset");

        for key in StorageKey::ALL {
            self.notify(key);
        }
        Ok(())
    }

    pub fn day_view(&self) -> DayView {
        self.state.day_view(self.today())
    }

    /// Mood and productivity per day over `range`, oldest first
    pub fn insight_series(&self, range: InsightRange) -> Vec<DayPoint> {
        let state = &self.state;
        let local_date = |at| self.clock.local_date(at);
        let earliest = earliest_record(
            &state.moods,
            &state.tasks,
            &state.habits,
            &state.entries,
            local_date,
        );
        let days = range.days(self.today(), earliest);
        daily_points(&days, &state.moods, &state.tasks, &state.habits, local_date)
    }

    pub fn insight_summary(&self) -> InsightSummary {
        let state = &self.state;
        InsightSummary::collect(&state.moods, &state.tasks, &state.habits, &state.entries)
    }

    fn persist(&mut self, changed: &Changed) -> Result<()> {
        for &key in changed {
            self.state.save_key(&self.store, key)?;
            self.notify(key);
        }
        Ok(())
    }

    fn notify(&mut self, key: StorageKey) {
        // Receivers that hung up are dropped
        self.subscribers
            .retain(|tx| tx.send(StateChange { key }).is_ok());
    }
}

/// Trimmed text, or a validation error naming `field`
fn required(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LumenError::invalid(format!("{field} is required")));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests;
