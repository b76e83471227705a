//! Per-pet, per-day feed state.
//!
//! Pure helpers take the event list they work on; the operations that
//! write (`record_feed`, `undo_feed`, ...) read what they need from the
//! store right before writing.

use crate::core::calendar::{days_elapsed, same_calendar_day};
use crate::db::store::FeedStore;
use crate::errors::{AppError, AppResult};
use crate::models::feed::{FeedEvent, FeedRecord};
use crate::models::health::FeedHealth;
use crate::models::pet::Pet;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One day of the history strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryCell {
    pub date: NaiveDate,
    pub fed: bool,
    /// Only today's cell can be toggled; past days are read-only.
    pub interactive: bool,
}

/// Derived status of one pet for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedStatus {
    pub fed_today: bool,
    pub days_since_last_feed: Option<i64>,
    pub health: FeedHealth,
}

/// The feeding of `pet_id` on `today`, if any.
pub fn todays_feed(pet_id: i64, events: &[FeedEvent], today: NaiveDate) -> Option<&FeedEvent> {
    events
        .iter()
        .find(|f| f.pet_id == pet_id && same_calendar_day(f.fed_at, today))
}

/// Most recent calendar day with a feeding for `pet_id`.
pub fn last_feed_before(pet_id: i64, events: &[FeedEvent], _today: NaiveDate) -> Option<NaiveDate> {
    events
        .iter()
        .filter(|f| f.pet_id == pet_id)
        .map(FeedEvent::day)
        .max()
}

/// Classify the gap since the last feeding against the pet's ideal interval.
pub fn feed_health(diff_days: i64, ideal_min_days: Option<u32>, ideal_max_days: Option<u32>) -> FeedHealth {
    if ideal_min_days.is_none() && ideal_max_days.is_none() {
        return FeedHealth::None;
    }

    if let Some(min) = ideal_min_days
        && diff_days < i64::from(min)
    {
        return FeedHealth::TooSoon;
    }

    if let Some(max) = ideal_max_days
        && diff_days > i64::from(max)
    {
        return FeedHealth::TooLate;
    }

    FeedHealth::Ideal
}

/// Status of `pet` on `today`.
///
/// When the pet was fed today the elapsed-days indicator and the health
/// label are suppressed. A feeding dated after `today` is a data error.
pub fn feed_status(pet: &Pet, events: &[FeedEvent], today: NaiveDate) -> AppResult<FeedStatus> {
    if todays_feed(pet.id, events, today).is_some() {
        return Ok(FeedStatus {
            fed_today: true,
            days_since_last_feed: None,
            health: FeedHealth::None,
        });
    }

    let Some(last) = last_feed_before(pet.id, events, today) else {
        return Ok(FeedStatus {
            fed_today: false,
            days_since_last_feed: None,
            health: FeedHealth::None,
        });
    };

    let diff = days_elapsed(last, today)?;
    Ok(FeedStatus {
        fed_today: false,
        days_since_last_feed: Some(diff),
        health: feed_health(diff, pet.ideal_min_days, pet.ideal_max_days),
    })
}

/// One cell per window date, today interactive, everything else static.
pub fn history_strip(
    pet_id: i64,
    events: &[FeedEvent],
    window: &[NaiveDate],
    today: NaiveDate,
) -> Vec<HistoryCell> {
    window
        .iter()
        .map(|&date| HistoryCell {
            date,
            fed: events
                .iter()
                .any(|f| f.pet_id == pet_id && same_calendar_day(f.fed_at, date)),
            interactive: date == today,
        })
        .collect()
}

fn ensure_pet<S: FeedStore>(store: &S, pet_id: i64) -> AppResult<Pet> {
    store.pet(pet_id)?.ok_or(AppError::PetNotFound(pet_id))
}

/// Record a feeding at `at`. A second call for the same calendar day
/// returns the existing feeding and writes nothing.
pub fn record_feed<S: FeedStore>(store: &mut S, pet_id: i64, at: NaiveDateTime) -> AppResult<FeedRecord> {
    let pet = ensure_pet(store, pet_id)?;
    let record = store.insert_feed_once(pet_id, at)?;

    match &record {
        FeedRecord::Created(ev) => {
            store.audit(
                "feed",
                &format!("pet #{}", pet_id),
                &format!("{} fed on {}", pet.name, ev.stamp_str()),
            );
        }
        FeedRecord::AlreadyFed(ev) => {
            log::debug!("pet #{pet_id} already fed on {}", ev.day_str());
        }
    }

    Ok(record)
}

/// Remove the feeding of `pet_id` on `day`. Missing feeding is not an
/// error: it is logged and `None` is returned.
pub fn undo_feed<S: FeedStore>(store: &mut S, pet_id: i64, day: NaiveDate) -> AppResult<Option<FeedEvent>> {
    remove_feed_on(store, pet_id, day, "unfeed")
}

/// Explicit deletion of a past history entry.
pub fn delete_history_entry<S: FeedStore>(
    store: &mut S,
    pet_id: i64,
    day: NaiveDate,
) -> AppResult<Option<FeedEvent>> {
    remove_feed_on(store, pet_id, day, "history")
}

fn remove_feed_on<S: FeedStore>(
    store: &mut S,
    pet_id: i64,
    day: NaiveDate,
    operation: &str,
) -> AppResult<Option<FeedEvent>> {
    ensure_pet(store, pet_id)?;

    let feeds = store.feeds_for_pet(pet_id)?;
    let Some(found) = feeds.into_iter().find(|f| same_calendar_day(f.fed_at, day)) else {
        log::warn!("no feeding for pet #{pet_id} on {day}, nothing to undo");
        store.audit(
            operation,
            &format!("pet #{}", pet_id),
            &format!("No feeding on {day}, nothing removed"),
        );
        return Ok(None);
    };

    store.delete_feed(found.id)?;
    store.audit(
        operation,
        &format!("pet #{}", pet_id),
        &format!("Feeding of {} removed", found.day_str()),
    );
    Ok(Some(found))
}

/// Bring the "fed on `at`'s day" checkbox of one pet to `fed`.
/// Returns true when something was written.
pub fn set_fed<S: FeedStore>(store: &mut S, pet_id: i64, at: NaiveDateTime, fed: bool) -> AppResult<bool> {
    if fed {
        Ok(record_feed(store, pet_id, at)?.is_created())
    } else {
        Ok(undo_feed(store, pet_id, at.date())?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calendar::trailing_window;
    use crate::db::initialize::init_db;
    use crate::db::pool::DbPool;
    use crate::models::pet::NewPet;

    fn store() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        pool
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn ev(id: i64, pet_id: i64, s: &str) -> FeedEvent {
        FeedEvent {
            id,
            pet_id,
            fed_at: at(s),
        }
    }

    fn pet(id: i64, min: Option<u32>, max: Option<u32>) -> Pet {
        Pet {
            id,
            name: format!("pet{id}"),
            kind: "cat".into(),
            image: None,
            order: id,
            ideal_min_days: min,
            ideal_max_days: max,
        }
    }

    #[test]
    fn record_then_undo_round_trip() {
        let mut db = store();
        let p = db.add_pet(&NewPet::new("Mochi", "gecko"), 0).unwrap();
        let today = d("2025-07-01");

        let rec = record_feed(&mut db, p.id, at("2025-07-01 07:30")).unwrap();
        let feeds = db.feeds().unwrap();
        assert_eq!(todays_feed(p.id, &feeds, today), Some(rec.event()));

        let removed = undo_feed(&mut db, p.id, today).unwrap();
        assert_eq!(removed.as_ref(), Some(rec.event()));
        assert_eq!(todays_feed(p.id, &db.feeds().unwrap(), today), None);
    }

    #[test]
    fn recording_twice_keeps_a_single_event() {
        let mut db = store();
        let p = db.add_pet(&NewPet::new("Mochi", "gecko"), 0).unwrap();

        let first = record_feed(&mut db, p.id, at("2025-07-01 07:30")).unwrap();
        let second = record_feed(&mut db, p.id, at("2025-07-01 18:00")).unwrap();

        assert!(first.is_created());
        assert!(!second.is_created());
        assert_eq!(second.event(), first.event());
        assert_eq!(db.feeds_for_pet(p.id).unwrap().len(), 1);
    }

    #[test]
    fn undo_without_feed_is_a_quiet_no_op() {
        let mut db = store();
        let p = db.add_pet(&NewPet::new("Mochi", "gecko"), 0).unwrap();
        record_feed(&mut db, p.id, at("2025-06-30 07:30")).unwrap();

        assert_eq!(undo_feed(&mut db, p.id, d("2025-07-01")).unwrap(), None);
        assert_eq!(db.feeds().unwrap().len(), 1);
    }

    #[test]
    fn operations_on_unknown_pet_fail() {
        let mut db = store();
        assert!(matches!(
            record_feed(&mut db, 7, at("2025-07-01 07:30")),
            Err(AppError::PetNotFound(7))
        ));
        assert!(matches!(
            undo_feed(&mut db, 7, d("2025-07-01")),
            Err(AppError::PetNotFound(7))
        ));
    }

    #[test]
    fn set_fed_reports_whether_it_wrote() {
        let mut db = store();
        let p = db.add_pet(&NewPet::new("Mochi", "gecko"), 0).unwrap();
        let now = at("2025-07-01 07:30");

        assert!(set_fed(&mut db, p.id, now, true).unwrap());
        assert!(!set_fed(&mut db, p.id, now, true).unwrap());
        assert!(set_fed(&mut db, p.id, now, false).unwrap());
        assert!(!set_fed(&mut db, p.id, now, false).unwrap());
    }

    #[test]
    fn health_classification_against_interval() {
        assert_eq!(feed_health(1, Some(2), Some(5)), FeedHealth::TooSoon);
        assert_eq!(feed_health(2, Some(2), Some(5)), FeedHealth::Ideal);
        assert_eq!(feed_health(3, Some(2), Some(5)), FeedHealth::Ideal);
        assert_eq!(feed_health(5, Some(2), Some(5)), FeedHealth::Ideal);
        assert_eq!(feed_health(6, Some(2), Some(5)), FeedHealth::TooLate);
        for diff in [0, 1, 3, 100] {
            assert_eq!(feed_health(diff, None, None), FeedHealth::None);
        }
        assert_eq!(feed_health(9, None, Some(5)), FeedHealth::TooLate);
        assert_eq!(feed_health(1, Some(3), None), FeedHealth::TooSoon);
        assert_eq!(feed_health(30, Some(3), None), FeedHealth::Ideal);
    }

    #[test]
    fn last_feed_is_the_latest_day_of_that_pet() {
        let events = vec![
            ev(1, 1, "2025-06-20 08:00"),
            ev(2, 1, "2025-06-25 08:00"),
            ev(3, 2, "2025-06-28 08:00"),
            ev(4, 1, "2025-06-22 08:00"),
        ];
        let today = d("2025-07-01");
        assert_eq!(last_feed_before(1, &events, today), Some(d("2025-06-25")));
        assert_eq!(last_feed_before(3, &events, today), None);
    }

    #[test]
    fn status_suppresses_elapsed_days_when_fed_today() {
        let p = pet(1, Some(2), Some(5));
        let today = d("2025-07-01");

        let fed = vec![ev(1, 1, "2025-06-25 08:00"), ev(2, 1, "2025-07-01 06:00")];
        let s = feed_status(&p, &fed, today).unwrap();
        assert!(s.fed_today);
        assert_eq!(s.days_since_last_feed, None);
        assert_eq!(s.health, FeedHealth::None);

        let late = vec![ev(1, 1, "2025-06-25 08:00")];
        let s = feed_status(&p, &late, today).unwrap();
        assert!(!s.fed_today);
        assert_eq!(s.days_since_last_feed, Some(6));
        assert_eq!(s.health, FeedHealth::TooLate);

        let never = feed_status(&p, &[], today).unwrap();
        assert_eq!(never.days_since_last_feed, None);
        assert_eq!(never.health, FeedHealth::None);
    }

    #[test]
    fn status_surfaces_future_feeds() {
        let p = pet(1, None, None);
        let events = vec![ev(1, 1, "2025-07-03 08:00")];
        assert!(matches!(
            feed_status(&p, &events, d("2025-07-01")),
            Err(AppError::FutureFeed { .. })
        ));
    }

    #[test]
    fn history_strip_marks_only_today_interactive() {
        let today = d("2025-07-01");
        let window = trailing_window(today, 14);
        let events = vec![
            ev(1, 1, "2025-06-18 08:00"),
            ev(2, 1, "2025-06-30 23:59"),
            ev(3, 2, "2025-07-01 08:00"),
            ev(4, 1, "2025-06-17 08:00"), // outside the window
        ];

        let strip = history_strip(1, &events, &window, today);
        assert_eq!(strip.len(), 14);
        assert_eq!(strip.iter().filter(|c| c.fed).count(), 2);
        assert!(strip[0].fed && strip[0].date == d("2025-06-18"));
        assert!(strip[12].fed);
        assert!(!strip[13].fed);
        assert_eq!(strip.iter().filter(|c| c.interactive).count(), 1);
        assert!(strip[13].interactive);
    }
}
