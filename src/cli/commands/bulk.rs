use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::bulk::apply_bulk_feed;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Bulk { fed, .. } = cmd {
        let mut pool = open_store(cfg)?;
        let report = apply_bulk_feed(&mut pool, cfg.now(), *fed)?;

        let state = if *fed { "fed" } else { "not fed" };
        if report.changed.is_empty() && report.unchanged.is_empty() {
            info("No pets to update.");
        } else {
            success(format!(
                "{} pet(s) marked {} today, {} unchanged.",
                report.changed.len(),
                state,
                report.unchanged.len()
            ));
        }
    }

    Ok(())
}
