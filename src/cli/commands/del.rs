use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::pets::PetLogic;
use crate::db::store::FeedStore;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::fs_utils::ask_confirmation;
use crate::utils::formatting::plural;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { id, yes } = cmd {
        let mut pool = open_store(cfg)?;
        let pet = pool.pet(*id)?.ok_or(AppError::PetNotFound(*id))?;

        //
        // Confirmation prompt
        //
        let prompt = format!(
            "Delete pet #{} {} and its whole feeding history? This action is irreversible.",
            pet.id, pet.name
        );
        if !*yes && !ask_confirmation(&prompt)? {
            info("Operation cancelled.");
            return Ok(());
        }

        let (pet, feeds) = PetLogic::delete(&mut pool, *id)?;
        success(format!(
            "Pet #{} {} deleted together with {}.",
            pet.id,
            pet.name,
            plural(feeds as i64, "feeding")
        ));
    }

    Ok(())
}
