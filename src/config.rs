// Local configuration.
//
// Stored as pretty-printed JSON at `~/.job-bot-config.json`. The file is
// rewritten wholesale on every save.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cli::Platform;
use crate::models::default_platforms;

const CONFIG_FILE: &str = ".job-bot-config.json";

/// User search preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub keywords: String,
    pub location: String,
    pub platforms: Vec<String>,
    /// Empty when no resume has been configured.
    #[serde(default)]
    pub resume_path: String,
    pub daily_limit: u32,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            keywords: "Software Engineer".to_string(),
            location: "Remote".to_string(),
            platforms: default_platforms(),
            resume_path: String::new(),
            daily_limit: 50,
        }
    }
}

/// Answers collected by the interactive configure flow. `None` or blank
/// means "keep the current value". `platforms` holds the known platforms
/// that were ticked; see `Configuration::apply_answers`.
#[derive(Debug, Clone, Default)]
pub struct ConfigAnswers {
    pub keywords: Option<String>,
    pub location: Option<String>,
    pub platforms: Option<Vec<String>>,
    pub resume_path: Option<String>,
    pub daily_limit: Option<String>,
}

impl Configuration {
    /// Merge interactive answers into this configuration. A daily limit
    /// that is not a non-negative integer is ignored.
    ///
    /// Platforms keep their configured order: known platforms that were
    /// unticked are removed, newly ticked ones are appended, and entries
    /// outside the known set are left alone. Duplicates collapse to the
    /// first occurrence.
    pub fn apply_answers(&mut self, answers: ConfigAnswers) {
        if let Some(keywords) = non_blank(answers.keywords) {
            self.keywords = keywords;
        }
        if let Some(location) = non_blank(answers.location) {
            self.location = location;
        }
        if let Some(picked) = answers.platforms {
            let merged = merge_platforms(&self.platforms, &picked);
            if !merged.is_empty() {
                self.platforms = merged;
            }
        }
        if let Some(resume) = non_blank(answers.resume_path) {
            self.resume_path = resume;
        }
        if let Some(limit) = non_blank(answers.daily_limit).and_then(|l| l.parse::<u32>().ok()) {
            self.daily_limit = limit;
        }
    }
}

fn merge_platforms(current: &[String], picked: &[String]) -> Vec<String> {
    let known = |p: &str| Platform::all().iter().any(|k| k.as_str() == p);

    let mut merged: Vec<String> = Vec::with_capacity(current.len() + picked.len());
    let kept = current.iter().filter(|p| !known(p) || picked.contains(p));
    for p in kept.chain(picked) {
        if !merged.contains(p) {
            merged.push(p.clone());
        }
    }
    merged
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reads and writes the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store at the fixed per-user location.
    pub fn user_default() -> Result<Self> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(Self::at(home.join(CONFIG_FILE)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration, or the defaults when no file exists yet.
    pub fn load(&self) -> Result<Configuration> {
        if !self.path.exists() {
            return Ok(Configuration::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config file {}", self.path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", self.path.display()))
    }

    pub fn save(&self, config: &Configuration) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write config file {}", self.path.display()))?;

        info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }
}
