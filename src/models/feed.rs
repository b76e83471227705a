use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

pub const DAY_FORMAT: &str = "%Y-%m-%d";
pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single feeding, as stored in the `feeds` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedEvent {
    pub id: i64,
    pub pet_id: i64,          // ⇔ feeds.pet_id (no FK cascade, see FeedStore::delete_pet)
    pub fed_at: NaiveDateTime, // ⇔ feeds.fed_at (local time, TEXT)
}

impl FeedEvent {
    /// Calendar day of the feeding; the only part that matters for tracking.
    pub fn day(&self) -> NaiveDate {
        self.fed_at.date()
    }

    pub fn day_str(&self) -> String {
        self.fed_at.format(DAY_FORMAT).to_string()
    }

    pub fn stamp_str(&self) -> String {
        self.fed_at.format(STAMP_FORMAT).to_string()
    }
}

/// Result of asking the store to record a feeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedRecord {
    Created(FeedEvent),
    /// The pet already had a feeding that day; nothing was written.
    AlreadyFed(FeedEvent),
}

impl FeedRecord {
    pub fn event(&self) -> &FeedEvent {
        match self {
            FeedRecord::Created(ev) | FeedRecord::AlreadyFed(ev) => ev,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, FeedRecord::Created(_))
    }
}
