use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::transfer::{apply_import, parse_document};
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::fs_utils::ask_confirmation;
use std::fs;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { file, yes } = cmd {
        // the whole document is validated before the database is touched
        let plan = parse_document(&fs::read_to_string(file)?)?;

        let prompt = format!(
            "Replace ALL pets and feedings with {} pets and {} feedings from '{}'?",
            plan.pets.len(),
            plan.feeds.len(),
            file
        );
        if !*yes && !ask_confirmation(&prompt)? {
            info("Import cancelled.");
            return Ok(());
        }

        let mut pool = open_store(cfg)?;
        let summary = apply_import(&mut pool, &plan)?;

        if summary.collapsed > 0 {
            warning(format!(
                "{} same-day duplicate feeding(s) were dropped.",
                summary.collapsed
            ));
        }
        success(format!(
            "Imported {} pets and {} feedings.",
            summary.pets, summary.feeds
        ));
    }

    Ok(())
}
