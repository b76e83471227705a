use crate::errors::AppResult;
use chrono::Local;
use rusqlite::Connection;
use rusqlite::params;

/// Write an internal log line into the `log` table.
pub fn pflog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// Same as [`pflog`] but never fails: a broken audit trail must not abort
/// the operation that triggered it.
pub fn pflog_quiet(conn: &Connection, operation: &str, target: &str, message: &str) {
    if let Err(e) = pflog(conn, operation, target, message) {
        log::warn!("failed to write internal log ({operation}): {e}");
    }
}
