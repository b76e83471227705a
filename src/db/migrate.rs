use crate::ui::messages::{success, warning};
use rusqlite::{Connection, Error, OptionalExtension, Result};

const MIGRATION_PET_ORDER: &str = "20250310_0002_pet_order_and_interval";
const MIGRATION_FEED_DAY: &str = "20250322_0003_feed_day_unique";

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn ensure_meta_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([table], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

pub(crate) fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Create the `pets` table with the modern schema.
fn create_pets_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS pets (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            name           TEXT NOT NULL,
            kind           TEXT NOT NULL,
            image          TEXT,
            sort_order     INTEGER NOT NULL DEFAULT 0,
            ideal_min_days INTEGER CHECK(ideal_min_days IS NULL OR ideal_min_days > 0),
            ideal_max_days INTEGER CHECK(ideal_max_days IS NULL OR ideal_max_days > 0),
            created_at     TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_pets_order ON pets(sort_order, id);
        "#,
    )?;
    Ok(())
}

/// Create the `feeds` table. `day` duplicates the date part of `fed_at` so
/// that SQLite itself rejects a second feeding on the same calendar day.
fn create_feeds_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS feeds (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            pet_id  INTEGER NOT NULL,
            fed_at  TEXT NOT NULL,
            day     TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_feeds_pet_day ON feeds(pet_id, day);
        "#,
    )?;
    Ok(())
}

/// Early databases had pets without a manual order or feeding interval.
fn migrate_pet_order_and_interval(conn: &Connection) -> Result<()> {
    if migration_applied(conn, MIGRATION_PET_ORDER)? || column_exists(conn, "pets", "sort_order")? {
        return Ok(());
    }

    warning("Adding order and feeding interval columns to pets table...");

    conn.execute_batch(
        r#"
        BEGIN;

        ALTER TABLE pets ADD COLUMN sort_order INTEGER NOT NULL DEFAULT 0;
        ALTER TABLE pets ADD COLUMN ideal_min_days INTEGER;
        ALTER TABLE pets ADD COLUMN ideal_max_days INTEGER;

        UPDATE pets
           SET sort_order = (SELECT COUNT(*) FROM pets AS p2 WHERE p2.id < pets.id);

        CREATE INDEX IF NOT EXISTS idx_pets_order ON pets(sort_order, id);

        COMMIT;
        "#,
    )
    .map_err(|e| {
        Error::SqliteFailure(
            rusqlite::ffi::Error::new(1),
            Some(format!("Failed to add order columns to pets: {}", e)),
        )
    })?;

    mark_applied(
        conn,
        MIGRATION_PET_ORDER,
        "Added sort_order and ideal interval to pets",
    )?;

    success(format!(
        "Migration applied: {} → pets keep their creation order",
        MIGRATION_PET_ORDER
    ));

    Ok(())
}

/// Early databases stored only `fed_at`; add `day`, drop same-day
/// duplicates (the oldest row wins) and enforce uniqueness.
fn migrate_feed_day_unique(conn: &Connection) -> Result<()> {
    if migration_applied(conn, MIGRATION_FEED_DAY)? || column_exists(conn, "feeds", "day")? {
        return Ok(());
    }

    warning("Adding calendar day column to feeds table...");

    let before: i64 = conn.query_row("SELECT COUNT(*) FROM feeds", [], |row| row.get(0))?;

    conn.execute_batch(
        r#"
        BEGIN;

        ALTER TABLE feeds ADD COLUMN day TEXT NOT NULL DEFAULT '';
        UPDATE feeds SET day = substr(fed_at, 1, 10);

        DELETE FROM feeds
         WHERE id NOT IN (SELECT MIN(id) FROM feeds GROUP BY pet_id, day);

        CREATE UNIQUE INDEX IF NOT EXISTS idx_feeds_pet_day ON feeds(pet_id, day);

        COMMIT;
        "#,
    )
    .map_err(|e| {
        Error::SqliteFailure(
            rusqlite::ffi::Error::new(1),
            Some(format!("Failed to add 'day' column to feeds: {}", e)),
        )
    })?;

    let after: i64 = conn.query_row("SELECT COUNT(*) FROM feeds", [], |row| row.get(0))?;
    let dropped = before - after;

    mark_applied(
        conn,
        MIGRATION_FEED_DAY,
        &format!("Added day column to feeds, removed {dropped} same-day duplicates"),
    )?;

    if dropped > 0 {
        warning(format!("Removed {dropped} duplicate same-day feeding(s)."));
    }
    success(format!(
        "Migration applied: {} → one feeding per pet and day",
        MIGRATION_FEED_DAY
    ));

    Ok(())
}

fn backup_before_migration(db_path: &str) -> Result<()> {
    use chrono::Local;
    use std::fs::{self, File};
    use std::io::Write;
    use zip::CompressionMethod;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    let to_sql_err = |stage: &str, e: &dyn std::fmt::Display| {
        Error::ToSqlConversionFailure(Box::new(std::io::Error::other(format!(
            "Backup failed ({stage}): {e}"
        ))))
    };

    let backup_name = format!(
        "{}-backup_db_pre_migration.zip",
        Local::now().format("%Y%m%d_%H%M%S")
    );

    let parent = std::path::Path::new(db_path)
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."));
    let backup_path = parent.join(&backup_name);

    let file = File::create(&backup_path).map_err(|e| to_sql_err("create", &e))?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("database.sqlite", options)
        .map_err(|e| to_sql_err("start_file", &e))?;

    let db_content = fs::read(db_path).map_err(|e| to_sql_err("read", &e))?;
    zip.write_all(&db_content)
        .map_err(|e| to_sql_err("write_all", &e))?;
    zip.finish().map_err(|e| to_sql_err("finish", &e))?;

    success(format!("📦 Backup created: {}", backup_path.display()));
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log + meta tables
    ensure_log_table(conn)?;
    ensure_meta_table(conn)?;

    // 2) Detect legacy schema
    let pets_exists = table_exists(conn, "pets")?;
    let feeds_exists = table_exists(conn, "feeds")?;

    let legacy_pets = pets_exists && !column_exists(conn, "pets", "sort_order")?;
    let legacy_feeds = feeds_exists && !column_exists(conn, "feeds", "day")?;

    // 3) If legacy → backup first
    if legacy_pets || legacy_feeds {
        warning("Legacy schema detected, taking a zip copy before migrating...");

        let db_path: String = conn
            .query_row("PRAGMA database_list;", [], |row| row.get::<_, String>(2))
            .unwrap_or_default();

        if !db_path.is_empty() {
            backup_before_migration(&db_path)?;
        } else {
            warning("Could not determine the database path, backup skipped.");
        }
    }

    // 4) Create or upgrade pets
    if !pets_exists {
        create_pets_table(conn)?;
    } else if legacy_pets {
        migrate_pet_order_and_interval(conn)?;
    }

    // 5) Create or upgrade feeds
    if !feeds_exists {
        create_feeds_table(conn)?;
    } else if legacy_feeds {
        migrate_feed_day_unique(conn)?;
    } else {
        conn.execute_batch(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_feeds_pet_day ON feeds(pet_id, day);",
        )?;
    }

    Ok(())
}
