use crate::errors::ClientError;
use crate::logs::LogsApi;
use crate::models::{Habit, HabitLog, HabitStats};
use crate::stats::StatsApi;
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Weak};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, error, warn};

pub const CALENDAR_WINDOW_DAYS: usize = 90;
pub const DAYS_PER_ROW: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellState {
    Future,
    Completed,
    NotCompleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub completed: bool,
    pub is_future: bool,
    pub log_id: Option<i64>,
    pub notes: Option<String>,
}

impl CalendarDay {
    pub fn state(&self) -> CellState {
        if self.is_future {
            CellState::Future
        } else if self.completed {
            CellState::Completed
        } else {
            CellState::NotCompleted
        }
    }
}

pub fn build_calendar(logs: &[HabitLog]) -> Vec<CalendarDay> {
    build_calendar_at(Local::now().date_naive(), logs)
}

pub fn build_calendar_at(today: NaiveDate, logs: &[HabitLog]) -> Vec<CalendarDay> {
    build_calendar_window(today, today, logs)
}

/// A window of [`CALENDAR_WINDOW_DAYS`] days ending on `window_end`. Days after
/// `today` are marked future.
pub fn build_calendar_window(window_end: NaiveDate, today: NaiveDate, logs: &[HabitLog]) -> Vec<CalendarDay> {
    let by_date = index_logs(logs);

    let mut days = Vec::with_capacity(CALENDAR_WINDOW_DAYS);
    for offset in (0..CALENDAR_WINDOW_DAYS).rev() {
        let date = window_end - Duration::days(offset as i64);
        let log = by_date.get(&date).copied();
        days.push(CalendarDay {
            date,
            completed: log.is_some_and(|log| log.completed),
            is_future: date > today,
            log_id: log.and_then(|log| log.id),
            notes: log.and_then(|log| log.notes.clone()),
        });
    }
    days
}

pub fn weeks(days: &[CalendarDay]) -> Vec<&[CalendarDay]> {
    days.chunks(DAYS_PER_ROW).collect()
}

/// Sunday of the ISO week containing `date`.
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    date + Duration::days(6 - date.weekday().num_days_from_monday() as i64)
}

// A completed log wins if the server ever returns two for one date.
fn index_logs(logs: &[HabitLog]) -> HashMap<NaiveDate, &HabitLog> {
    let mut by_date: HashMap<NaiveDate, &HabitLog> = HashMap::with_capacity(logs.len());
    for log in logs {
        by_date
            .entry(log.date)
            .and_modify(|existing| {
                if log.completed && !existing.completed {
                    *existing = log;
                }
            })
            .or_insert(log);
    }
    by_date
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    Updated(CalendarDay),
    FutureDay,
    InFlight,
    OutsideWindow,
    Detached,
}

#[derive(Debug, Default)]
struct CalendarState {
    habit: Option<Habit>,
    days: Vec<CalendarDay>,
    habit_stats: Option<HabitStats>,
    in_flight: HashSet<NaiveDate>,
}

#[derive(Debug, Clone)]
struct ToggleContext {
    habit_id: i64,
    logs: LogsApi,
    stats: StatsApi,
}

#[derive(Debug)]
pub struct CalendarView {
    context: ToggleContext,
    state: Arc<Mutex<CalendarState>>,
}

impl CalendarView {
    pub fn new(habit_id: i64, logs: LogsApi, stats: StatsApi) -> Self {
        Self {
            context: ToggleContext {
                habit_id,
                logs,
                stats,
            },
            state: Arc::new(Mutex::new(CalendarState::default())),
        }
    }

    pub fn habit_id(&self) -> i64 {
        self.context.habit_id
    }

    pub async fn habit(&self) -> Option<Habit> {
        self.state.lock().await.habit.clone()
    }

    pub async fn set_habit(&self, habit: Habit) {
        self.state.lock().await.habit = Some(habit);
    }

    pub async fn days(&self) -> Vec<CalendarDay> {
        self.state.lock().await.days.clone()
    }

    pub async fn habit_stats(&self) -> Option<HabitStats> {
        self.state.lock().await.habit_stats.clone()
    }

    pub async fn load(&self) -> Result<(), ClientError> {
        let today = Local::now().date_naive();
        self.load_window(today, today).await
    }

    /// Rebuilds the grid from a fresh log fetch. On failure the grid already shown is
    /// kept and the error returned.
    pub async fn load_window(&self, window_end: NaiveDate, today: NaiveDate) -> Result<(), ClientError> {
        let logs = match self
            .context
            .logs
            .list_for_habit(self.context.habit_id, CALENDAR_WINDOW_DAYS)
            .await
        {
            Ok(logs) => logs,
            Err(err) => {
                warn!(habit_id = self.context.habit_id, error = %err, "failed to load habit logs, keeping previous calendar");
                return Err(err);
            }
        };

        self.state.lock().await.days = build_calendar_window(window_end, today, &logs);
        refresh_habit_stats(&self.context, &self.state).await;
        Ok(())
    }

    pub async fn refresh_stats(&self) -> Option<HabitStats> {
        refresh_habit_stats(&self.context, &self.state).await
    }

    pub async fn toggle(&self, date: NaiveDate) -> Result<ToggleOutcome, ClientError> {
        run_toggle(self.context.clone(), Arc::downgrade(&self.state), date).await
    }

    /// Runs the toggle on its own task. The task only holds a weak handle to the view,
    /// so a response arriving after the view is dropped is discarded.
    pub fn spawn_toggle(&self, date: NaiveDate) -> JoinHandle<Result<ToggleOutcome, ClientError>> {
        tokio::spawn(run_toggle(
            self.context.clone(),
            Arc::downgrade(&self.state),
            date,
        ))
    }
}

async fn run_toggle(
    context: ToggleContext,
    state: Weak<Mutex<CalendarState>>,
    date: NaiveDate,
) -> Result<ToggleOutcome, ClientError> {
    {
        let Some(view) = state.upgrade() else {
            return Ok(ToggleOutcome::Detached);
        };
        let mut view = view.lock().await;
        let Some(day) = view.days.iter().find(|day| day.date == date) else {
            return Ok(ToggleOutcome::OutsideWindow);
        };
        if day.is_future {
            debug!(habit_id = context.habit_id, %date, "ignoring toggle on a future day");
            return Ok(ToggleOutcome::FutureDay);
        }
        if !view.in_flight.insert(date) {
            debug!(habit_id = context.habit_id, %date, "toggle already in flight");
            return Ok(ToggleOutcome::InFlight);
        }
    }

    let result = context.logs.toggle(context.habit_id, date).await;

    let Some(view) = state.upgrade() else {
        debug!(habit_id = context.habit_id, %date, "calendar closed before toggle completed");
        return result.map(|_| ToggleOutcome::Detached);
    };

    let outcome = {
        let mut guard = view.lock().await;
        guard.in_flight.remove(&date);
        let log = match result {
            Ok(log) => log,
            Err(err) => {
                error!(habit_id = context.habit_id, %date, error = %err, "failed to toggle habit log");
                return Err(err);
            }
        };
        match guard.days.iter_mut().find(|day| day.date == date) {
            Some(day) => {
                day.completed = log.completed;
                day.log_id = log.id;
                day.notes = log.notes;
                ToggleOutcome::Updated(day.clone())
            }
            None => ToggleOutcome::OutsideWindow,
        }
    };

    if matches!(outcome, ToggleOutcome::Updated(_)) {
        refresh_habit_stats(&context, &view).await;
    }
    Ok(outcome)
}

async fn refresh_habit_stats(context: &ToggleContext, state: &Mutex<CalendarState>) -> Option<HabitStats> {
    match context.stats.habit(context.habit_id).await {
        Ok(stats) => {
            state.lock().await.habit_stats = Some(stats.clone());
            Some(stats)
        }
        Err(err) => {
            warn!(habit_id = context.habit_id, error = %err, "failed to refresh habit stats");
            state.lock().await.habit_stats.clone()
        }
    }
}
