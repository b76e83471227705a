//! Store interface used by the feed engine.
//!
//! Engine code never opens a connection on its own: every operation gets a
//! `FeedStore` handed in, which keeps the logic testable against an
//! in-memory database and makes the cascade/uniqueness rules live in one
//! place.

use crate::db::log::pflog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::feed::{FeedEvent, FeedRecord};
use crate::models::pet::{NewPet, Pet};
use chrono::{NaiveDate, NaiveDateTime};

pub trait FeedStore {
    fn pet(&self, id: i64) -> AppResult<Option<Pet>>;

    /// Pets sorted by order key, ties broken by id.
    fn pets(&self) -> AppResult<Vec<Pet>>;

    fn add_pet(&mut self, pet: &NewPet, order: i64) -> AppResult<Pet>;

    fn update_pet(&mut self, pet: &Pet) -> AppResult<()>;

    /// Removes the pet and every feeding that references it.
    fn delete_pet(&mut self, id: i64) -> AppResult<usize>;

    fn feeds(&self) -> AppResult<Vec<FeedEvent>>;

    fn feeds_for_pet(&self, pet_id: i64) -> AppResult<Vec<FeedEvent>>;

    fn feed_on_day(&self, pet_id: i64, day: NaiveDate) -> AppResult<Option<FeedEvent>>;

    /// Stores a feeding unless one already exists for that pet and day.
    fn insert_feed_once(&mut self, pet_id: i64, at: NaiveDateTime) -> AppResult<FeedRecord>;

    fn delete_feed(&mut self, id: i64) -> AppResult<()>;

    /// Writes all given `(pet_id, order)` pairs atomically.
    fn set_orders(&mut self, orders: &[(i64, i64)]) -> AppResult<()>;

    /// Wipes pets and feeds and inserts the given collections.
    fn replace_all(&mut self, pets: &[Pet], feeds: &[FeedEvent]) -> AppResult<()>;

    fn meta(&self, key: &str) -> AppResult<Option<String>>;

    fn set_meta(&mut self, key: &str, value: &str) -> AppResult<()>;

    /// Append to the audit trail. Never fails.
    fn audit(&self, operation: &str, target: &str, message: &str);
}

impl FeedStore for DbPool {
    fn pet(&self, id: i64) -> AppResult<Option<Pet>> {
        queries::load_pet(&self.conn, id)
    }

    fn pets(&self) -> AppResult<Vec<Pet>> {
        queries::load_pets(&self.conn)
    }

    fn add_pet(&mut self, pet: &NewPet, order: i64) -> AppResult<Pet> {
        let id = queries::insert_pet(&self.conn, pet, order)?;
        Ok(Pet {
            id,
            name: pet.name.clone(),
            kind: pet.kind.clone(),
            image: pet.image.clone(),
            order,
            ideal_min_days: pet.ideal_min_days,
            ideal_max_days: pet.ideal_max_days,
        })
    }

    fn update_pet(&mut self, pet: &Pet) -> AppResult<()> {
        queries::update_pet(&self.conn, pet)
    }

    fn delete_pet(&mut self, id: i64) -> AppResult<usize> {
        queries::delete_pet_cascade(&mut self.conn, id)
    }

    fn feeds(&self) -> AppResult<Vec<FeedEvent>> {
        queries::load_feeds(&self.conn)
    }

    fn feeds_for_pet(&self, pet_id: i64) -> AppResult<Vec<FeedEvent>> {
        queries::load_feeds_for_pet(&self.conn, pet_id)
    }

    fn feed_on_day(&self, pet_id: i64, day: NaiveDate) -> AppResult<Option<FeedEvent>> {
        queries::find_feed_on_day(&self.conn, pet_id, day)
    }

    fn insert_feed_once(&mut self, pet_id: i64, at: NaiveDateTime) -> AppResult<FeedRecord> {
        queries::insert_feed_once(&self.conn, pet_id, at)
    }

    fn delete_feed(&mut self, id: i64) -> AppResult<()> {
        queries::delete_feed(&self.conn, id)
    }

    fn set_orders(&mut self, orders: &[(i64, i64)]) -> AppResult<()> {
        queries::update_orders(&mut self.conn, orders)
    }

    fn replace_all(&mut self, pets: &[Pet], feeds: &[FeedEvent]) -> AppResult<()> {
        queries::replace_all(&mut self.conn, pets, feeds)
    }

    fn meta(&self, key: &str) -> AppResult<Option<String>> {
        queries::meta_get(&self.conn, key)
    }

    fn set_meta(&mut self, key: &str, value: &str) -> AppResult<()> {
        queries::meta_put(&self.conn, key, value)
    }

    fn audit(&self, operation: &str, target: &str, message: &str) {
        pflog_quiet(&self.conn, operation, target, message);
    }
}
