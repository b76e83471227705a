use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::pets::PetLogic;
use crate::core::thumbnail::{THUMB_SIZE, decode_data_uri, thumbnail_from_file};
use crate::db::store::FeedStore;
use crate::errors::{AppError, AppResult};
use crate::models::pet::PetChanges;
use crate::ui::messages::{info, success};
use crate::utils::fs_utils::ensure_writable;
use std::fs;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Thumb {
        id,
        image,
        clear,
        out,
    } = cmd
    {
        let mut pool = open_store(cfg)?;

        if let Some(path) = out {
            let pet = pool.pet(*id)?.ok_or(AppError::PetNotFound(*id))?;
            let Some(uri) = pet.image else {
                info(format!("Pet #{} has no thumbnail.", id));
                return Ok(());
            };
            let path = Path::new(path);
            ensure_writable(path, false)?;
            fs::write(path, decode_data_uri(&uri)?)?;
            success(format!("Thumbnail written to {}", path.display()));
            return Ok(());
        }

        let image = if *clear {
            None
        } else if let Some(path) = image {
            Some(thumbnail_from_file(Path::new(path))?)
        } else {
            return Err(AppError::Other(
                "give a picture, --clear or --out FILE".into(),
            ));
        };

        let changes = PetChanges {
            image: Some(image),
            ..Default::default()
        };
        let pet = PetLogic::edit(&mut pool, *id, &changes)?;

        if pet.image.is_some() {
            success(format!(
                "Thumbnail of #{} {} set ({}x{} PNG).",
                pet.id, pet.name, THUMB_SIZE, THUMB_SIZE
            ));
        } else {
            success(format!("Thumbnail of #{} {} removed.", pet.id, pet.name));
        }
    }

    Ok(())
}
