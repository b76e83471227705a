//! Aggregate "fed today" state across all pets and the bulk toggle.

use crate::core::feed::{record_feed, todays_feed, undo_feed};
use crate::db::store::FeedStore;
use crate::errors::AppResult;
use crate::models::feed::FeedEvent;
use crate::models::health::AggregateState;
use crate::models::pet::Pet;
use chrono::{NaiveDate, NaiveDateTime};

/// Outcome of a bulk feed/unfeed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    pub changed: Vec<i64>,
    pub unchanged: Vec<i64>,
}

/// `All` when every pet was fed today, `None` when no pet was, `Some` otherwise.
/// An empty pet list counts as `None`.
pub fn aggregate_feed_state(pets: &[Pet], events: &[FeedEvent], today: NaiveDate) -> AggregateState {
    let fed = pets
        .iter()
        .filter(|p| todays_feed(p.id, events, today).is_some())
        .count();

    AggregateState::from_counts(fed, pets.len())
}

/// Set every pet's "fed today" state to `set_fed`.
///
/// The pet list is read once, but each pet's feedings are re-read right
/// before its write so that changes made in between are not overwritten.
pub fn apply_bulk_feed<S: FeedStore>(store: &mut S, now: NaiveDateTime, set_fed: bool) -> AppResult<BulkReport> {
    let today = now.date();
    let mut report = BulkReport::default();

    for pet in store.pets()? {
        let fresh = store.feeds_for_pet(pet.id)?;
        let has_feed = todays_feed(pet.id, &fresh, today).is_some();

        let changed = match (set_fed, has_feed) {
            (true, false) => record_feed(store, pet.id, now)?.is_created(),
            (false, true) => undo_feed(store, pet.id, today)?.is_some(),
            _ => false,
        };

        if changed {
            report.changed.push(pet.id);
        } else {
            report.unchanged.push(pet.id);
        }
    }

    store.audit(
        "bulk",
        &today.to_string(),
        &format!(
            "{} pets marked {} ({} already were)",
            report.changed.len(),
            if set_fed { "fed" } else { "unfed" },
            report.unchanged.len()
        ),
    );

    Ok(report)
}
