use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::transfer::build_document;
use crate::db::store::FeedStore;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::fs_utils::ensure_writable;
use std::fs;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export { file, force } = cmd {
        let pool = open_store(cfg)?;
        let path = Path::new(file);

        ensure_writable(path, *force)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let doc = build_document(&pool)?;
        fs::write(path, serde_json::to_string_pretty(&doc)?)?;

        pool.audit(
            "export",
            &path.to_string_lossy(),
            &format!("Exported {} pets and {} feedings", doc.pets.len(), doc.feeds.len()),
        );
        success(format!(
            "Exported {} pets and {} feedings to {}",
            doc.pets.len(),
            doc.feeds.len(),
            path.display()
        ));
    }

    Ok(())
}
