//! Settings resolved once per invocation and shared by every command.

use crate::config::Config;
use crate::core::Source;
use crate::errors::{AppError, AppResult};
use crate::models::Column;
use crate::utils::path::expand_tilde;
use std::env;
use std::path::PathBuf;

pub struct Context {
    pub cfg: Config,
    /// Test mode: never touch the user's configuration file
    pub test: bool,
}

impl Context {
    pub fn new(cfg: Config, test: bool) -> Self {
        Self { cfg, test }
    }

    /// The configured event store.
    pub fn store(&self) -> PathBuf {
        expand_tilde(&self.cfg.database)
    }

    pub fn plot_dir(&self) -> PathBuf {
        expand_tilde(&self.cfg.plot_dir)
    }

    /// Sources named on the command line plus an optional receiver, or the
    /// configured store when neither is given.
    pub fn sources(&self, paths: &[String], remote: Option<Source>) -> AppResult<Vec<Source>> {
        let mut sources = paths
            .iter()
            .map(|p| Source::from_path(p))
            .collect::<AppResult<Vec<_>>>()?;
        sources.extend(remote);

        if sources.is_empty() {
            sources.push(Source::Database(self.store()));
        }
        Ok(sources)
    }

    /// Receiver to read from: `explicit`, else the configured one when
    /// `use_config` is set.
    pub fn remote(&self, explicit: Option<&str>, use_config: bool) -> AppResult<Option<Source>> {
        let url = match (explicit, use_config) {
            (Some(url), _) => url.to_string(),
            (None, true) => self.cfg.url.clone().ok_or_else(|| {
                AppError::Config("--remote needs `url` in the configuration file".into())
            })?,
            (None, false) => return Ok(None),
        };

        Ok(Some(Source::Remote {
            url,
            token: self.token(),
        }))
    }

    pub fn token(&self) -> Option<String> {
        self.cfg
            .token
            .clone()
            .or_else(|| env::var("SECRET_TOKEN").ok())
            .filter(|t| !t.is_empty())
    }

    pub fn totals_levels(&self) -> AppResult<Vec<Column>> {
        Column::parse_list(&self.cfg.totals_levels)
    }

    pub fn sort_levels(&self) -> AppResult<Vec<Column>> {
        Column::parse_list(&self.cfg.sort_levels)
    }
}
