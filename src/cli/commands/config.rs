use crate::cli::parser::Commands;
use crate::config::Config;
use crate::config::migrate::{migrate_file, missing_keys};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::path::Path;
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        // ---- PRINT CONFIG ----
        if *print_config {
            println!("📄 Current configuration:\n");
            println!("{}", serde_yaml::to_string(cfg)?);
        }

        // ---- CHECK CONFIG ----
        if *check {
            if !path.exists() {
                warning(format!(
                    "No configuration file at {} (defaults in use). Run `rpetfeed init`.",
                    path.display()
                ));
            } else {
                let missing = missing_keys(&fs::read_to_string(&path)?)?;
                if missing.is_empty() {
                    success("Configuration file is complete.");
                } else {
                    warning(format!(
                        "Missing fields: {} (run `rpetfeed config --migrate`)",
                        missing.join(", ")
                    ));
                }
            }
        }

        // ---- MIGRATE CONFIG ----
        if *migrate {
            let added = migrate_file(&path)?;
            if added.is_empty() {
                info("Configuration already up to date.");
            } else {
                success(format!("Added to {}: {}", path.display(), added.join(", ")));
            }
        }

        // ---- EDIT CONFIG ----
        if *edit_config {
            let used = open_in_editor(&path, editor.as_deref())?;
            match Config::load_from(&path) {
                Ok(_) => success(format!("Configuration edited with '{used}'.")),
                Err(e) => warning(format!("Configuration saved but not readable: {e}")),
            }
        }
    }

    Ok(())
}

/// Run `preferred`, then `$EDITOR`/`$VISUAL`, then the platform default on
/// `path`, stopping at the first editor that exits successfully.
fn open_in_editor(path: &Path, preferred: Option<&str>) -> AppResult<String> {
    let fallback = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    let mut candidates: Vec<String> = preferred.map(str::to_string).into_iter().collect();
    if !candidates.contains(&fallback) {
        candidates.push(fallback);
    }

    for editor in &candidates {
        match Command::new(editor).arg(path).status() {
            Ok(s) if s.success() => return Ok(editor.clone()),
            Ok(s) => log::warn!("editor '{editor}' exited with {s}"),
            Err(e) => log::warn!("editor '{editor}' could not be started: {e}"),
        }
    }

    Err(AppError::Config(format!(
        "no usable editor among: {}",
        candidates.join(", ")
    )))
}
