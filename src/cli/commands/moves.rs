use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::order::{Direction, MoveOutcome, move_adjacent};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handle the `move` command
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Move { id, up, .. } = cmd {
        let direction = if *up { Direction::Up } else { Direction::Down };
        let mut pool = open_store(cfg)?;

        match move_adjacent(&mut pool, *id, direction)? {
            MoveOutcome::Moved { with } => success(format!(
                "Pet #{} moved {} (swapped with #{}).",
                id,
                direction.as_str(),
                with
            )),
            MoveOutcome::Unchanged => info(format!(
                "Pet #{} is already {} of the list.",
                id,
                if *up { "at the top" } else { "at the bottom" }
            )),
        }
    }

    Ok(())
}
