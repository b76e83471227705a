use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::feed::{record_feed, undo_feed};
use crate::errors::AppResult;
use crate::models::feed::FeedRecord;
use crate::ui::messages::{info, success, warning};

/// Handle `feed` and `unfeed`
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let now = cfg.now();

    match cmd {
        Commands::Feed { ids } => {
            let mut pool = open_store(cfg)?;
            for id in ids {
                match record_feed(&mut pool, *id, now)? {
                    FeedRecord::Created(ev) => {
                        success(format!("Pet #{} fed at {}", id, ev.stamp_str()))
                    }
                    FeedRecord::AlreadyFed(ev) => {
                        info(format!("Pet #{} was already fed at {}", id, ev.stamp_str()))
                    }
                }
            }
        }
        Commands::Unfeed { ids } => {
            let mut pool = open_store(cfg)?;
            for id in ids {
                match undo_feed(&mut pool, *id, now.date())? {
                    Some(ev) => success(format!("Removed feeding of pet #{} on {}", id, ev.day_str())),
                    None => warning(format!("Pet #{} has no feeding on {}", id, now.date())),
                }
            }
        }
        _ => {}
    }

    Ok(())
}
