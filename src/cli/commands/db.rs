use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::db::store::FeedStore;
use crate::errors::AppResult;
use crate::ui::messages::{header, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;

        if *migrate {
            header("Running migrations…");
            run_pending_migrations(&pool.conn)?;
            success("Schema is up to date.");
        }

        if *info {
            stats::print_db_info(&pool, &cfg.database)?;
        }

        if *check {
            header("Checking the database…");
            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;
            if integrity != "ok" {
                warning(format!("SQLite integrity check failed: {integrity}"));
            }

            let problems = stats::consistency_problems(&pool)?;
            for p in &problems {
                warning(p);
            }
            if integrity == "ok" && problems.is_empty() {
                success("Pets and feedings are consistent.");
            }
        }

        if *vacuum {
            header("Compacting the database…");
            pool.conn.execute_batch("VACUUM;")?;
            pool.audit("vacuum", &cfg.database, "Database compacted");
            success("Vacuum completed.");
        }
    }

    Ok(())
}
