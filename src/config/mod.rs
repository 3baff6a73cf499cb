use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Event store written by `ingest` and read by the report commands
    pub database: String,
    /// Directory where chart PDFs are written
    #[serde(default = "default_plot_dir")]
    pub plot_dir: String,
    /// Number of groups drawn before the rest collapses into "Other"
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Rows shown by `summary` before the totals
    #[serde(default = "default_list_tail")]
    pub list_tail: usize,
    #[serde(default = "default_totals_levels")]
    pub totals_levels: Vec<String>,
    /// Levels printed alphabetically instead of by time
    #[serde(default = "default_sort_levels")]
    pub sort_levels: Vec<String>,
    /// Base URL of the webhook receiver, read with `--remote`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Shared secret sent as `X-Gitlab-Token`; `SECRET_TOKEN` in the
    /// environment is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_plot_dir() -> String {
    ".".to_string()
}
fn default_top_n() -> usize {
    5
}
fn default_list_tail() -> usize {
    20
}
fn default_totals_levels() -> Vec<String> {
    vec!["dev".into(), "project".into(), "issue".into()]
}
fn default_sort_levels() -> Vec<String> {
    vec!["project".into(), "dev".into()]
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file().to_string_lossy().to_string())
    }
}

impl Config {
    fn with_database(database: String) -> Self {
        Self {
            database,
            plot_dir: default_plot_dir(),
            top_n: default_top_n(),
            list_tail: default_list_tail(),
            totals_levels: default_totals_levels(),
            sort_levels: default_sort_levels(),
            url: None,
            token: None,
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("gltime")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".gltime")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("gltime.conf")
    }

    /// Return the default path of the event store
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("gltime.db")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    /// Initialize configuration and event store files.
    /// Returns the path of the configured event store.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // store name: user provided or default
        let db_path = match custom_name {
            Some(name) => {
                let p = PathBuf::from(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Self::with_database(db_path.to_string_lossy().to_string());

        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file()).map_err(|_| AppError::ConfigSave)?;
            file.write_all(yaml.as_bytes())
                .map_err(|_| AppError::ConfigSave)?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        Ok(db_path)
    }
}
