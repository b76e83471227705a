use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::pets::{PetLogic, fmt_interval};
use crate::core::thumbnail::thumbnail_from_file;
use crate::errors::AppResult;
use crate::models::pet::NewPet;
use crate::ui::messages::success;
use std::path::Path;

/// Handle the `add` command
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        name,
        kind,
        min,
        max,
        image,
    } = cmd
    {
        let mut pet = NewPet::new(name.trim(), kind.trim()).with_interval(*min, *max);
        // validate before decoding a possibly large picture
        pet.validate()?;

        if let Some(path) = image {
            pet.image = Some(thumbnail_from_file(Path::new(path))?);
        }

        let mut pool = open_store(cfg)?;
        let created = PetLogic::add(&mut pool, &pet)?;

        let interval = if created.has_interval() {
            format!(" ideal interval {}", fmt_interval(created.ideal_min_days, created.ideal_max_days))
        } else {
            String::new()
        };
        success(format!(
            "Added pet #{}: {} ({}){}",
            created.id, created.name, created.kind, interval
        ));
    }

    Ok(())
}
