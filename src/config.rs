// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Settings come from, in increasing priority: `tallybook.toml` in the
//! platform config dir, `TALLYBOOK_*` environment variables, CLI flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::Deserialize;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Tallybook", "tallybook"));

const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdviceSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: Option<String>,
}

impl Default for AdviceSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Identity for the synced store. Absent means a local session.
    pub user: Option<String>,
    pub database: Option<PathBuf>,
    pub demo: bool,
    pub advice: AdviceSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user: None,
            database: None,
            demo: true,
            advice: AdviceSettings::default(),
        }
    }
}

/// Flag overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub user: Option<String>,
    pub database: Option<PathBuf>,
    pub local: bool,
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP.0, APP.1, APP.2).context("Could not determine platform-specific dirs")
}

pub fn config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("tallybook.toml"))
}

pub fn default_db_path() -> Result<PathBuf> {
    let proj = project_dirs()?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("tallybook.sqlite"))
}

impl Settings {
    pub fn load(overrides: Overrides) -> Result<Self> {
        let path = config_path()?;
        Self::load_from(&path, overrides)
    }

    pub fn load_from(path: &Path, overrides: Overrides) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("TALLYBOOK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("Read settings from {}", path.display()))?;
        let mut settings: Settings = settings
            .try_deserialize()
            .context("Invalid tallybook settings")?;
        settings.apply(overrides);
        Ok(settings)
    }

    fn apply(&mut self, overrides: Overrides) {
        if let Some(user) = overrides.user {
            self.user = Some(user);
        }
        if let Some(db) = overrides.database {
            self.database = Some(db);
        }
        if overrides.local {
            self.user = None;
        }
        self.user = self
            .user
            .take()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(p) => Ok(p.clone()),
            None => default_db_path(),
        }
    }
}
