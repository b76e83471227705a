use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::pets::{PetLogic, fmt_interval};
use crate::errors::AppResult;
use crate::models::pet::PetChanges;
use crate::ui::messages::{info, success};

/// `--min N` sets, `--clear-min` removes, neither leaves the value alone.
fn optional_change(value: Option<u32>, clear: bool) -> Option<Option<u32>> {
    if clear { Some(None) } else { value.map(Some) }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        id,
        name,
        kind,
        min,
        max,
        clear_min,
        clear_max,
    } = cmd
    {
        let changes = PetChanges {
            name: name.as_ref().map(|s| s.trim().to_string()),
            kind: kind.as_ref().map(|s| s.trim().to_string()),
            image: None,
            ideal_min_days: optional_change(*min, *clear_min),
            ideal_max_days: optional_change(*max, *clear_max),
        };

        if changes.is_empty() {
            info("Nothing to change.");
            return Ok(());
        }

        let mut pool = open_store(cfg)?;
        let pet = PetLogic::edit(&mut pool, *id, &changes)?;

        success(format!(
            "Updated pet #{}: {} ({}) {}",
            pet.id,
            pet.name,
            pet.kind,
            fmt_interval(pet.ideal_min_days, pet.ideal_max_days)
        ));
    }

    Ok(())
}
