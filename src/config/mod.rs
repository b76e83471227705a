use crate::errors::AppResult;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod migrate; // missing-key detection and back-fill for old config files

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    /// Days shown in the history strip, today included.
    #[serde(default = "default_history_days")]
    pub history_days: usize,
    /// Insert a placeholder pet the first time the database is used.
    #[serde(default = "default_true")]
    pub seed_sample_pet: bool,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
    #[serde(default = "default_true")]
    pub show_health: bool,

    // runtime-only settings, filled from the command line
    #[serde(skip)]
    pub no_color: bool,
    #[serde(skip)]
    pub now_override: Option<NaiveDateTime>,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_history_days() -> usize {
    crate::core::calendar::DEFAULT_WINDOW
}
fn default_true() -> bool {
    true
}
fn default_separator_char() -> String {
    "-".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            history_days: default_history_days(),
            seed_sample_pet: true,
            separator_char: default_separator_char(),
            show_health: true,
            no_color: false,
            now_override: None,
        }
    }
}

impl Config {
    /// Current local time, unless the command line pinned it.
    pub fn now(&self) -> NaiveDateTime {
        self.now_override.unwrap_or_else(crate::utils::date::now)
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA")
                .map(PathBuf::from)
                .ok()
                .or_else(dirs::config_dir)
                .unwrap_or_else(|| PathBuf::from("."));
            appdata.join("rpetfeed")
        } else {
            // HOME first so tests and scripts can redirect it
            let home = env::var("HOME")
                .map(PathBuf::from)
                .ok()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."));
            home.join(".rpetfeed")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rpetfeed.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rpetfeed.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    /// Keys missing from the file take their default values.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was configured.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else if is_test {
                // test databases are resolved against the working directory
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(db_path)
    }
}
