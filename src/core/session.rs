//! Interactive `watch` session: one view kept up to date by a stream of
//! events, processed strictly one at a time.

use crate::core::bulk::apply_bulk_feed;
use crate::core::feed::set_fed;
use crate::core::order::{Direction, MoveOutcome, move_adjacent};
use crate::core::view::{Change, ListView, Reconciled, reconcile, render_all};
use crate::db::store::FeedStore;
use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, NaiveDateTime};

pub const HELP: &str = "commands: feed <id> | unfeed <id> | toggle <id> | all | none | up <id> | down <id> | refresh | help | quit";

/// Something the session loop has to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Input(String),
    Midnight(NaiveDateTime),
    /// Input stream closed.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Feed(i64),
    Unfeed(i64),
    Toggle(i64),
    FeedAll,
    UnfeedAll,
    Move(i64, Direction),
    Refresh,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_action(line: &str) -> AppResult<Option<Action>> {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Ok(None);
    };

    let mut pet_id = || -> AppResult<i64> {
        let raw = words
            .next()
            .ok_or_else(|| AppError::Other(format!("'{cmd}' needs a pet id")))?;
        raw.trim_start_matches('#')
            .parse()
            .map_err(|_| AppError::Other(format!("'{raw}' is not a pet id")))
    };

    let action = match cmd.to_ascii_lowercase().as_str() {
        "feed" | "f" => Action::Feed(pet_id()?),
        "unfeed" | "u" => Action::Unfeed(pet_id()?),
        "toggle" | "t" => Action::Toggle(pet_id()?),
        "all" => Action::FeedAll,
        "none" => Action::UnfeedAll,
        "up" => Action::Move(pet_id()?, Direction::Up),
        "down" => Action::Move(pet_id()?, Direction::Down),
        "refresh" | "r" => Action::Refresh,
        "help" | "?" => Action::Help,
        "quit" | "q" | "exit" => Action::Quit,
        other => return Err(AppError::Other(format!("unknown command '{other}'"))),
    };
    Ok(Some(action))
}

/// What the loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Updated(Reconciled),
    Unchanged,
    Help,
    Quit,
}

pub struct Session<S: FeedStore> {
    store: S,
    view: ListView,
}

impl<S: FeedStore> Session<S> {
    pub fn open(store: S, today: NaiveDate, window_days: usize) -> AppResult<Self> {
        let view = render_all(&store, today, window_days)?;
        Ok(Self { store, view })
    }

    pub fn view(&self) -> &ListView {
        &self.view
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Rebuild the view for the day that starts at `midnight`.
    pub fn roll_day(&mut self, midnight: NaiveDateTime) -> AppResult<Reconciled> {
        log::debug!("day rolled over to {}", midnight.date());
        reconcile(&self.store, &mut self.view, Change::DayRolled(midnight.date()))
    }

    /// Run `action` as of `now`. A view still showing an earlier day is
    /// rolled forward first so the action lands on the visible day.
    pub fn apply(&mut self, action: Action, now: NaiveDateTime) -> AppResult<Step> {
        let mut rolled = false;
        if now.date() != self.view.today {
            self.roll_day(now)?;
            rolled = true;
        }

        let change = match action {
            Action::Feed(id) => return self.set_pet_fed(id, Some(true), now, rolled),
            Action::Unfeed(id) => return self.set_pet_fed(id, Some(false), now, rolled),
            Action::Toggle(id) => return self.set_pet_fed(id, None, now, rolled),
            Action::FeedAll | Action::UnfeedAll => {
                let report = apply_bulk_feed(&mut self.store, now, action == Action::FeedAll)?;
                (!report.changed.is_empty()).then_some(Change::BulkApplied)
            }
            Action::Move(id, dir) => match move_adjacent(&mut self.store, id, dir)? {
                MoveOutcome::Moved { .. } => Some(Change::Reordered),
                MoveOutcome::Unchanged => None,
            },
            Action::Refresh => Some(Change::DayRolled(now.date())),
            Action::Help => return Ok(Step::Help),
            Action::Quit => return Ok(Step::Quit),
        };

        match change {
            Some(change) => Ok(Step::Updated(reconcile(&self.store, &mut self.view, change)?)),
            None if rolled => Ok(Step::Updated(Reconciled::Rebuilt)),
            None => Ok(Step::Unchanged),
        }
    }

    /// Set one pet's state for today, `None` meaning the opposite of what
    /// the store holds right now. The pet's entry is always re-read, so a
    /// feeding written by another process shows up even when this call
    /// writes nothing.
    fn set_pet_fed(&mut self, id: i64, fed: Option<bool>, now: NaiveDateTime, rolled: bool) -> AppResult<Step> {
        let fed = match fed {
            Some(fed) => fed,
            None => self.store.feed_on_day(id, now.date())?.is_none(),
        };

        let before = self.view.entry(id).cloned();
        let wrote = set_fed(&mut self.store, id, now, fed)?;
        let how = reconcile(&self.store, &mut self.view, Change::FeedToggled(id))?;

        if rolled {
            Ok(Step::Updated(Reconciled::Rebuilt))
        } else if wrote || self.view.entry(id) != before.as_ref() {
            Ok(Step::Updated(how))
        } else {
            Ok(Step::Unchanged)
        }
    }
}
