//! Tasks, habits and the timeline

use chrono::{DateTime, Utc};

use super::{required, Changed, Controller};
use crate::app::action::{NewHabit, NewTask};
use crate::domain::{
    Habit, HabitKind, HabitToggle, Task, TimeOfDay, DEFAULT_HABIT_PENALTY, DEFAULT_HABIT_XP,
};
use crate::error::{LumenError, Result};
use crate::gamification::{GamificationEvent, XpKind};
use crate::schedule::{drop_at, move_to_inbox, resize, ItemRef, Schedulable};
use crate::store::StorageKey;

/// Parse an optional "HH:MM" field
fn parse_time(value: Option<&str>) -> Result<Option<TimeOfDay>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => TimeOfDay::parse(raw)
            .map(Some)
            .ok_or_else(|| LumenError::invalid(format!("Invalid time '{raw}', expected HH:MM"))),
    }
}

impl Controller {
    pub(super) fn add_task(
        &mut self,
        new: NewTask,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        let text = required(&new.text, "Task text")?;
        let due_time = parse_time(new.due_time.as_deref())?;

        let mut task = Task::new(text, new.date.unwrap_or_else(|| self.today()));
        task.kind = new.kind;
        task.due_time = due_time;
        if let Some(duration) = new.duration.filter(|d| *d > 0) {
            task.duration = duration;
        }
        task.priority = new.priority;
        task.recurrence = new.recurrence;
        task.xp_value = new
            .xp_value
            .filter(|xp| *xp > 0)
            .unwrap_or(self.default_task_xp);

        tracing::debug!(id = %task.id, date = %task.date, "Task added");
        self.state.tasks.push(task);
        changed.insert(StorageKey::Tasks);
        Ok(Vec::new())
    }

    /// Complete an open task or reopen a completed one. Completing a
    /// recurring task queues its next occurrence.
    pub(super) fn toggle_task(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        let idx = self.state.task_index(id)?;
        let task = &mut self.state.tasks[idx];
        let reward = task.reward();
        let text = task.text.clone();

        let events = if task.completed {
            task.completed = false;
            task.completed_at = None;
            self.state
                .stats
                .apply_xp(reward, format!("Undo Task: {text}"), XpKind::Loss, now)
        } else {
            task.completed = true;
            task.completed_at = Some(now);
            let successor = task.next_occurrence();

            self.state.stats.tasks_completed += 1;
            let events = self
                .state
                .stats
                .apply_xp(reward, format!("Task: {text}"), XpKind::Gain, now);

            if let Some(next) = successor {
                tracing::debug!(id = %next.id, date = %next.date, "Next occurrence queued");
                self.state.tasks.push(next);
            }
            events
        };

        changed.insert(StorageKey::Tasks);
        changed.insert(StorageKey::Stats);
        Ok(events)
    }

    pub(super) fn delete_task(
        &mut self,
        id: &str,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        let idx = self.state.task_index(id)?;
        self.state.tasks.remove(idx);
        changed.insert(StorageKey::Tasks);
        Ok(Vec::new())
    }

    /// Run `f` on the task or habit behind `item`
    fn with_item<R>(
        &mut self,
        item: &ItemRef,
        changed: &mut Changed,
        f: impl FnOnce(&mut dyn Schedulable) -> Result<R>,
    ) -> Result<R> {
        match item {
            ItemRef::Task(id) => {
                let idx = self.state.task_index(id)?;
                let out = f(&mut self.state.tasks[idx])?;
                changed.insert(StorageKey::Tasks);
                Ok(out)
            }
            ItemRef::Habit(id) => {
                let idx = self.state.habit_index(id)?;
                let out = f(&mut self.state.habits[idx])?;
                changed.insert(StorageKey::Habits);
                Ok(out)
            }
        }
    }

    pub(super) fn schedule_item(
        &mut self,
        item: &ItemRef,
        start_minutes: i32,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        let today = self.today();
        if let ItemRef::Task(id) = item {
            // Anything dropped on the timeline belongs to today
            let idx = self.state.task_index(id)?;
            self.state.tasks[idx].date = today;
        }

        let start = self.with_item(item, changed, |target| Ok(drop_at(target, start_minutes)))?;
        tracing::debug!(kind = item.kind(), id = item.id(), %start, "Item scheduled");
        Ok(Vec::new())
    }

    pub(super) fn resize_item(
        &mut self,
        item: &ItemRef,
        duration_minutes: i32,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        let duration = self.with_item(item, changed, |target| {
            if target.slot().is_none() {
                return Err(LumenError::invalid(format!(
                    "{} {} is not on the timeline",
                    item.kind(),
                    item.id()
                )));
            }
            Ok(resize(target, duration_minutes))
        })?;
        tracing::debug!(kind = item.kind(), id = item.id(), duration, "Item resized");
        Ok(Vec::new())
    }

    pub(super) fn unschedule_item(
        &mut self,
        item: &ItemRef,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        self.with_item(item, changed, |target| {
            move_to_inbox(target);
            Ok(())
        })?;
        Ok(Vec::new())
    }

    pub(super) fn add_habit(
        &mut self,
        new: NewHabit,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        let title = required(&new.title, "Habit title")?;
        let time = parse_time(new.time.as_deref())?;

        let mut habit = Habit::new(
            title,
            new.kind,
            new.xp_value.unwrap_or(DEFAULT_HABIT_XP),
            new.penalty_value.unwrap_or(DEFAULT_HABIT_PENALTY),
        );
        habit.time = time;
        habit.duration = new.duration.filter(|d| *d > 0);

        tracing::debug!(id = %habit.id, kind = habit.kind.as_str(), "Habit added");
        self.state.habits.push(habit);
        changed.insert(StorageKey::Habits);
        Ok(Vec::new())
    }

    /// Mark today done, or undo today's mark
    pub(super) fn toggle_habit(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        let idx = self.state.habit_index(id)?;
        let today = self.today();
        let habit = &mut self.state.habits[idx];

        let (kind, source) = match habit.toggle(today) {
            HabitToggle::Completed => (XpKind::Gain, format!("Habit: {}", habit.title)),
            HabitToggle::Undone => (XpKind::Loss, format!("Undo Habit: {}", habit.title)),
        };
        let amount = habit.xp_value;
        let events = self.state.stats.apply_xp(amount, source, kind, now);

        changed.insert(StorageKey::Habits);
        changed.insert(StorageKey::Stats);
        Ok(events)
    }

    pub(super) fn relapse_habit(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        let idx = self.state.habit_index(id)?;
        let habit = &mut self.state.habits[idx];
        if habit.kind != HabitKind::Break {
            return Err(LumenError::invalid(format!(
                "Only break habits can relapse: {}",
                habit.title
            )));
        }

        habit.relapse();
        let penalty = habit.penalty_value;
        let source = format!("Relapse: {}", habit.title);
        tracing::debug!(id, penalty, "Relapse recorded");
        let events = self.state.stats.apply_xp(penalty, source, XpKind::Loss, now);

        changed.insert(StorageKey::Habits);
        changed.insert(StorageKey::Stats);
        Ok(events)
    }

    pub(super) fn delete_habit(
        &mut self,
        id: &str,
        changed: &mut Changed,
    ) -> Result<Vec<GamificationEvent>> {
        let idx = self.state.habit_index(id)?;
        self.state.habits.remove(idx);
        changed.insert(StorageKey::Habits);
        Ok(Vec::new())
    }
}
