//! Pet view models and the decision between patching one pet and
//! rebuilding the whole list.

use crate::core::bulk::aggregate_feed_state;
use crate::core::calendar::trailing_window;
use crate::core::feed::{FeedStatus, HistoryCell, feed_health, feed_status, history_strip};
use crate::db::store::FeedStore;
use crate::errors::{AppError, AppResult};
use crate::models::feed::FeedEvent;
use crate::models::health::{AggregateState, FeedHealth};
use crate::models::pet::Pet;
use chrono::NaiveDate;
use serde::Serialize;

/// Everything the presentation layer needs to draw one pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PetView {
    pub pet_id: i64,
    pub name: String,
    pub kind: String,
    pub has_image: bool,
    pub ideal_min_days: Option<u32>,
    pub ideal_max_days: Option<u32>,
    pub fed_today: bool,
    pub history: Vec<HistoryCell>,
    pub health: FeedHealth,
    pub days_since_last_feed: Option<i64>,
}

/// The whole list as of `today`. `aggregate` is `None` when there are no
/// pets: the bulk control is not shown and a placeholder is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    pub today: NaiveDate,
    pub window_days: usize,
    pub entries: Vec<PetView>,
    pub aggregate: Option<AggregateState>,
}

impl ListView {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self, pet_id: i64) -> Option<usize> {
        self.entries.iter().position(|e| e.pet_id == pet_id)
    }

    pub fn entry(&self, pet_id: i64) -> Option<&PetView> {
        self.entries.iter().find(|e| e.pet_id == pet_id)
    }

    fn refresh_aggregate(&mut self) {
        let fed = self.entries.iter().filter(|e| e.fed_today).count();
        self.aggregate =
            (!self.entries.is_empty()).then(|| AggregateState::from_counts(fed, self.entries.len()));
    }
}

/// What happened since the view was last built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    FeedToggled(i64),
    PetEdited(i64),
    HistoryChanged(i64),
    PetAdded(i64),
    PetDeleted(i64),
    Reordered,
    BulkApplied,
    DayRolled(NaiveDate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch {
    Replaced { index: usize },
    NotPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// Only this pet's entry was recomputed.
    Patched(i64),
    Rebuilt,
}

/// Build the view model of one pet.
///
/// A feeding dated after `today` makes the elapsed-days count meaningless;
/// it is reported in the log and the count is clamped to zero.
pub fn build_pet_view(pet: &Pet, events: &[FeedEvent], window: &[NaiveDate], today: NaiveDate) -> AppResult<PetView> {
    let status = match feed_status(pet, events, today) {
        Ok(s) => s,
        Err(AppError::FutureFeed { feed, today: t }) => {
            log::warn!("pet #{} has a feeding dated {feed}, after {t}", pet.id);
            FeedStatus {
                fed_today: false,
                days_since_last_feed: Some(0),
                health: feed_health(0, pet.ideal_min_days, pet.ideal_max_days),
            }
        }
        Err(e) => return Err(e),
    };

    Ok(PetView {
        pet_id: pet.id,
        name: pet.name.clone(),
        kind: pet.kind.clone(),
        has_image: pet.image.is_some(),
        ideal_min_days: pet.ideal_min_days,
        ideal_max_days: pet.ideal_max_days,
        fed_today: status.fed_today,
        history: history_strip(pet.id, events, window, today),
        health: status.health,
        days_since_last_feed: status.days_since_last_feed,
    })
}

/// Full rebuild from the store.
pub fn render_all<S: FeedStore>(store: &S, today: NaiveDate, window_days: usize) -> AppResult<ListView> {
    build_list(&store.pets()?, &store.feeds()?, today, window_days)
}

/// The list as it stood at the end of `day`: later feedings are ignored.
pub fn render_as_of<S: FeedStore>(store: &S, day: NaiveDate, window_days: usize) -> AppResult<ListView> {
    let events: Vec<FeedEvent> = store
        .feeds()?
        .into_iter()
        .filter(|f| f.day() <= day)
        .collect();
    build_list(&store.pets()?, &events, day, window_days)
}

fn build_list(pets: &[Pet], events: &[FeedEvent], today: NaiveDate, window_days: usize) -> AppResult<ListView> {
    let window = trailing_window(today, window_days);

    let entries = pets
        .iter()
        .map(|p| build_pet_view(p, events, &window, today))
        .collect::<AppResult<Vec<_>>>()?;

    let aggregate = if pets.is_empty() {
        None
    } else {
        Some(aggregate_feed_state(pets, events, today))
    };

    Ok(ListView {
        today,
        window_days,
        entries,
        aggregate,
    })
}

/// Recompute a single pet and replace its entry in place. Other entries
/// are left exactly as they were.
pub fn render_one<S: FeedStore>(store: &S, view: &mut ListView, pet_id: i64) -> AppResult<Patch> {
    let Some(index) = view.position(pet_id) else {
        return Ok(Patch::NotPresent);
    };
    let Some(pet) = store.pet(pet_id)? else {
        return Ok(Patch::NotPresent);
    };

    let events = store.feeds_for_pet(pet_id)?;
    let window = trailing_window(view.today, view.window_days);

    view.entries[index] = build_pet_view(&pet, &events, &window, view.today)?;
    view.refresh_aggregate();

    Ok(Patch::Replaced { index })
}

/// Bring `view` up to date after `change`, patching when the change is
/// confined to one pet and rebuilding otherwise.
pub fn reconcile<S: FeedStore>(store: &S, view: &mut ListView, change: Change) -> AppResult<Reconciled> {
    match change {
        Change::FeedToggled(id) | Change::PetEdited(id) | Change::HistoryChanged(id) => {
            match render_one(store, view, id)? {
                Patch::Replaced { .. } => Ok(Reconciled::Patched(id)),
                Patch::NotPresent => {
                    *view = render_all(store, view.today, view.window_days)?;
                    Ok(Reconciled::Rebuilt)
                }
            }
        }
        Change::DayRolled(today) => {
            *view = render_all(store, today, view.window_days)?;
            Ok(Reconciled::Rebuilt)
        }
        Change::PetAdded(_) | Change::PetDeleted(_) | Change::Reordered | Change::BulkApplied => {
            *view = render_all(store, view.today, view.window_days)?;
            Ok(Reconciled::Rebuilt)
        }
    }
}
