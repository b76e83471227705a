use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::feed::delete_history_entry;
use crate::db::store::FeedStore;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{CYAN, GREY, RESET};
use crate::utils::date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::History { pet, delete } = cmd {
        let mut pool = open_store(cfg)?;
        let found = pool.pet(*pet)?.ok_or(AppError::PetNotFound(*pet))?;

        if let Some(day) = delete {
            let day = date::parse_date(day)?;
            match delete_history_entry(&mut pool, *pet, day)? {
                Some(ev) => success(format!(
                    "Deleted feeding of {} on {}.",
                    found.name,
                    ev.day_str()
                )),
                None => warning(format!("{} has no feeding on {}.", found.name, day)),
            }
            return Ok(());
        }

        let mut feeds = pool.feeds_for_pet(*pet)?;
        if feeds.is_empty() {
            info(format!("{} has never been fed.", found.name));
            return Ok(());
        }
        feeds.sort_by(|a, b| b.fed_at.cmp(&a.fed_at));

        println!("{}📅 Feedings of #{} {}{}\n", CYAN, found.id, found.name, RESET);
        let mut previous = None;
        for f in &feeds {
            // gap to the next (more recent) feeding
            let gap = previous
                .map(|p: chrono::NaiveDate| (p - f.day()).num_days())
                .map(|d| format!("{GREY}(+{d}d){RESET}"))
                .unwrap_or_default();
            println!("  {}  {}", f.stamp_str(), gap);
            previous = Some(f.day());
        }
    }

    Ok(())
}
