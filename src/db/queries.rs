use crate::errors::{AppError, AppResult};
use crate::models::feed::{DAY_FORMAT, FeedEvent, FeedRecord, STAMP_FORMAT};
use crate::models::pet::{NewPet, Pet};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const PET_COLUMNS: &str = "id, name, kind, image, sort_order, ideal_min_days, ideal_max_days";

pub fn map_pet(row: &Row) -> Result<Pet> {
    Ok(Pet {
        id: row.get("id")?,
        name: row.get("name")?,
        kind: row.get("kind")?,
        image: row.get("image")?,
        order: row.get("sort_order")?,
        ideal_min_days: row.get("ideal_min_days")?,
        ideal_max_days: row.get("ideal_max_days")?,
    })
}

pub fn map_feed(row: &Row) -> Result<FeedEvent> {
    let stamp: String = row.get("fed_at")?;

    let fed_at = NaiveDateTime::parse_from_str(&stamp, STAMP_FORMAT).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(stamp.clone())),
        )
    })?;

    Ok(FeedEvent {
        id: row.get("id")?,
        pet_id: row.get("pet_id")?,
        fed_at,
    })
}

// ---------------------------------------------------------------------------
// Pets
// ---------------------------------------------------------------------------

/// All pets in display order (order key, then id).
pub fn load_pets(conn: &Connection) -> AppResult<Vec<Pet>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {PET_COLUMNS} FROM pets ORDER BY sort_order ASC, id ASC"
    ))?;

    let rows = stmt.query_map([], map_pet)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_pet(conn: &Connection, id: i64) -> AppResult<Option<Pet>> {
    let mut stmt = conn.prepare_cached(&format!("SELECT {PET_COLUMNS} FROM pets WHERE id = ?1"))?;
    Ok(stmt.query_row([id], map_pet).optional()?)
}

pub fn insert_pet(conn: &Connection, pet: &NewPet, order: i64) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO pets (name, kind, image, sort_order, ideal_min_days, ideal_max_days)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            pet.name,
            pet.kind,
            pet.image,
            order,
            pet.ideal_min_days,
            pet.ideal_max_days,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_pet(conn: &Connection, pet: &Pet) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE pets
            SET name = ?1, kind = ?2, image = ?3, sort_order = ?4,
                ideal_min_days = ?5, ideal_max_days = ?6
          WHERE id = ?7",
        params![
            pet.name,
            pet.kind,
            pet.image,
            pet.order,
            pet.ideal_min_days,
            pet.ideal_max_days,
            pet.id,
        ],
    )?;

    if changed == 0 {
        return Err(AppError::PetNotFound(pet.id));
    }
    Ok(())
}

/// Delete a pet together with all of its feedings, in one transaction.
/// Returns the number of feedings removed.
pub fn delete_pet_cascade(conn: &mut Connection, id: i64) -> AppResult<usize> {
    let tx = conn.transaction()?;

    let feeds = tx.execute("DELETE FROM feeds WHERE pet_id = ?1", [id])?;
    let pets = tx.execute("DELETE FROM pets WHERE id = ?1", [id])?;

    if pets == 0 {
        // dropping the transaction rolls back the feed deletion
        return Err(AppError::PetNotFound(id));
    }

    tx.commit()?;
    Ok(feeds)
}

/// Write several order keys at once; either all of them land or none.
pub fn update_orders(conn: &mut Connection, orders: &[(i64, i64)]) -> AppResult<()> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare("UPDATE pets SET sort_order = ?1 WHERE id = ?2")?;
        for (id, order) in orders {
            if stmt.execute(params![order, id])? == 0 {
                return Err(AppError::PetNotFound(*id));
            }
        }
    }
    tx.commit()?;
    Ok(())
}

pub fn count_pets(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM pets", [], |row| row.get(0))?)
}

// ---------------------------------------------------------------------------
// Feeds
// ---------------------------------------------------------------------------

pub fn load_feeds(conn: &Connection) -> AppResult<Vec<FeedEvent>> {
    let mut stmt =
        conn.prepare_cached("SELECT id, pet_id, fed_at FROM feeds ORDER BY fed_at ASC, id ASC")?;

    let rows = stmt.query_map([], map_feed)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_feeds_for_pet(conn: &Connection, pet_id: i64) -> AppResult<Vec<FeedEvent>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, pet_id, fed_at FROM feeds
          WHERE pet_id = ?1
          ORDER BY fed_at ASC, id ASC",
    )?;

    let rows = stmt.query_map([pet_id], map_feed)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_feed_on_day(
    conn: &Connection,
    pet_id: i64,
    day: NaiveDate,
) -> AppResult<Option<FeedEvent>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, pet_id, fed_at FROM feeds
          WHERE pet_id = ?1 AND day = ?2",
    )?;

    let day_str = day.format(DAY_FORMAT).to_string();
    Ok(stmt.query_row(params![pet_id, day_str], map_feed).optional()?)
}

/// Insert a feeding unless the pet already has one on that calendar day.
///
/// This is the single place where the one-feed-per-day rule is enforced:
/// the unique index on `(pet_id, day)` turns a duplicate into a no-op and
/// the existing row is returned instead.
pub fn insert_feed_once(
    conn: &Connection,
    pet_id: i64,
    at: NaiveDateTime,
) -> AppResult<FeedRecord> {
    let stamp = at.format(STAMP_FORMAT).to_string();
    let day = at.format(DAY_FORMAT).to_string();

    let inserted = conn.execute(
        "INSERT INTO feeds (pet_id, fed_at, day) VALUES (?1, ?2, ?3)
         ON CONFLICT(pet_id, day) DO NOTHING",
        params![pet_id, stamp, day],
    )?;

    if inserted == 1 {
        return Ok(FeedRecord::Created(FeedEvent {
            id: conn.last_insert_rowid(),
            pet_id,
            fed_at: at,
        }));
    }

    let existing = find_feed_on_day(conn, pet_id, at.date())?.ok_or_else(|| {
        AppError::Other(format!(
            "feeding for pet #{pet_id} on {day} was neither inserted nor found"
        ))
    })?;
    Ok(FeedRecord::AlreadyFed(existing))
}

pub fn delete_feed(conn: &Connection, id: i64) -> AppResult<()> {
    conn.execute("DELETE FROM feeds WHERE id = ?1", [id])?;
    Ok(())
}

pub fn count_feeds(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM feeds", [], |row| row.get(0))?)
}

// ---------------------------------------------------------------------------
// Bulk replace (import)
// ---------------------------------------------------------------------------

/// Destructive full replace of pets and feeds. Ids are preserved.
/// Runs in one transaction so a failure leaves the old data in place.
pub fn replace_all(conn: &mut Connection, pets: &[Pet], feeds: &[FeedEvent]) -> AppResult<()> {
    let tx = conn.transaction()?;

    tx.execute("DELETE FROM feeds", [])?;
    tx.execute("DELETE FROM pets", [])?;

    {
        let mut ins_pet = tx.prepare(
            "INSERT INTO pets (id, name, kind, image, sort_order, ideal_min_days, ideal_max_days)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for p in pets {
            ins_pet.execute(params![
                p.id,
                p.name,
                p.kind,
                p.image,
                p.order,
                p.ideal_min_days,
                p.ideal_max_days,
            ])?;
        }

        let mut ins_feed =
            tx.prepare("INSERT INTO feeds (id, pet_id, fed_at, day) VALUES (?1, ?2, ?3, ?4)")?;
        for f in feeds {
            ins_feed.execute(params![f.id, f.pet_id, f.stamp_str(), f.day_str()])?;
        }
    }

    tx.commit()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Meta
// ---------------------------------------------------------------------------

pub fn meta_get(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    Ok(conn
        .query_row("SELECT value FROM meta WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?)
}

pub fn meta_put(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [key, value],
    )?;
    Ok(())
}
