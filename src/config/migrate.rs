use super::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Documentation injected after the keys that need it when the file is rewritten.
fn key_comment(key: &str) -> Option<&'static str> {
    match key {
        "history_days" => Some("  # number of days in the history strip (today included)\n"),
        "seed_sample_pet" => {
            Some("  # insert a placeholder pet the first time the database is used\n")
        }
        "show_health" => Some("  # colour the list by feeding interval (on time / too soon / overdue)\n"),
        _ => None,
    }
}

fn defaults_mapping() -> AppResult<Mapping> {
    match serde_yaml::to_value(Config::default())? {
        Value::Mapping(m) => Ok(m),
        _ => Err(AppError::Config("default configuration is not a mapping".into())),
    }
}

fn parse_mapping(content: &str) -> AppResult<Mapping> {
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(content)? {
        Value::Mapping(m) => Ok(m),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config("configuration file is not a YAML mapping".into())),
    }
}

/// Keys known to the current version that the file does not define.
pub fn missing_keys(content: &str) -> AppResult<Vec<String>> {
    let current = parse_mapping(content)?;
    let defaults = defaults_mapping()?;

    Ok(defaults
        .keys()
        .filter(|k| !current.contains_key(*k))
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect())
}

/// Fill every missing key of the file at `path` with its default value.
/// Existing values are never touched. Returns the keys that were added.
pub fn migrate_file(path: &Path) -> AppResult<Vec<String>> {
    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut current = parse_mapping(&content)?;
    let defaults = defaults_mapping()?;
    let mut added = Vec::new();

    for (key, value) in defaults {
        if !current.contains_key(&key) {
            if let Some(k) = key.as_str() {
                added.push(k.to_string());
            }
            current.insert(key, value);
        }
    }

    if added.is_empty() {
        return Ok(added);
    }

    let serialized = serde_yaml::to_string(&Value::Mapping(current))?;

    let mut new_content = String::new();
    for line in serialized.lines() {
        new_content.push_str(line);
        new_content.push('\n');

        if let Some((key, _)) = line.split_once(':')
            && added.iter().any(|a| a == key)
            && let Some(comment) = key_comment(key)
        {
            new_content.push_str(comment);
        }
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, new_content)?;

    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_keys_absent_from_an_old_file() {
        let missing = missing_keys("database: /tmp/a.sqlite\nseparator_char: '='\n").unwrap();
        assert_eq!(missing, vec!["history_days", "seed_sample_pet", "show_health"]);
        assert!(missing_keys("").unwrap().contains(&"database".to_string()));
    }

    #[test]
    fn migration_fills_defaults_and_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rpetfeed.conf");
        fs::write(&path, "database: /tmp/a.sqlite\nhistory_days: 30\n").unwrap();

        let added = migrate_file(&path).unwrap();
        assert_eq!(added, vec!["seed_sample_pet", "separator_char", "show_health"]);

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.database, "/tmp/a.sqlite");
        assert_eq!(cfg.history_days, 30);
        assert!(fs::read_to_string(&path).unwrap().contains("# insert a placeholder pet"));

        // second run has nothing left to do
        assert!(migrate_file(&path).unwrap().is_empty());
    }

    #[test]
    fn non_mapping_file_is_a_config_error() {
        assert!(matches!(missing_keys("- a\n- b\n"), Err(AppError::Config(_))));
    }
}
