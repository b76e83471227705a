use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use chrono::NaiveDate;
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);

    //
    // 2) TOTALS
    //
    let pets: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM pets", [], |row| row.get(0))?;
    let feeds: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM feeds", [], |row| row.get(0))?;
    println!("{}• Pets:{} {}{}{}", CYAN, RESET, GREEN, pets, RESET);
    println!("{}• Feedings:{} {}{}{}", CYAN, RESET, GREEN, feeds, RESET);

    //
    // 3) DATE RANGE
    //
    let first_day: Option<String> = pool
        .conn
        .query_row("SELECT MIN(day) FROM feeds", [], |row| row.get(0))
        .optional()?
        .flatten();

    let last_day: Option<String> = pool
        .conn
        .query_row("SELECT MAX(day) FROM feeds", [], |row| row.get(0))
        .optional()?
        .flatten();

    let fmt_first = first_day
        .clone()
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last_day
        .clone()
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    //
    // 4) AVERAGE FEEDINGS/DAY
    //
    if let (Some(f), Some(l)) = (first_day, last_day) {
        let d1 = parse_date(&f)?;
        let d2 = parse_date(&l)?;
        let days = (d2 - d1).num_days() + 1;

        let avg = feeds as f64 / days as f64;
        println!("{}• Average feedings/day:{} {:.2}", CYAN, RESET, avg);
    }

    println!();
    Ok(())
}

fn parse_date(date_str: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Problems in the feeding data that SQLite's own integrity check does not
/// see. An empty list means the data is consistent.
pub fn consistency_problems(pool: &DbPool) -> rusqlite::Result<Vec<String>> {
    let count = |sql: &str| -> rusqlite::Result<i64> { pool.conn.query_row(sql, [], |r| r.get(0)) };

    let mut problems = Vec::new();

    let orphans = count("SELECT COUNT(*) FROM feeds WHERE pet_id NOT IN (SELECT id FROM pets)")?;
    if orphans > 0 {
        problems.push(format!("{orphans} feeding(s) belong to no pet"));
    }

    let duplicates = count(
        "SELECT COUNT(*) FROM (SELECT 1 FROM feeds GROUP BY pet_id, day HAVING COUNT(*) > 1)",
    )?;
    if duplicates > 0 {
        problems.push(format!("{duplicates} pet/day pair(s) have more than one feeding"));
    }

    let stale_day = count("SELECT COUNT(*) FROM feeds WHERE day <> substr(fed_at, 1, 10)")?;
    if stale_day > 0 {
        problems.push(format!("{stale_day} feeding(s) with a day not matching their timestamp"));
    }

    Ok(problems)
}
