// The last search result set.
//
// Apply addresses jobs by their 1-based position in the most recent search,
// so the cached list and its selection rule live together here. The list is
// persisted as a bare JSON array at `~/.job-bot-jobs.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::models::Job;

const JOBS_FILE: &str = ".job-bot-jobs.json";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchSession {
    jobs: Vec<Job>,
}

impl SearchSession {
    pub fn new(jobs: Vec<Job>) -> Self {
        Self { jobs }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Jobs targeted by an apply call.
    ///
    /// With no indices, the whole list in cache order. Otherwise the jobs at
    /// the given 1-based positions in the order the indices were given;
    /// indices outside `1..=len`, negative ones included, are dropped and a
    /// repeated index only counts once.
    pub fn select(&self, indices: Option<&[i64]>) -> Vec<Job> {
        let Some(indices) = indices else {
            return self.jobs.clone();
        };

        let mut seen = Vec::with_capacity(indices.len());
        let mut selected = Vec::with_capacity(indices.len());
        for &i in indices {
            let pos = match usize::try_from(i) {
                Ok(p) if (1..=self.jobs.len()).contains(&p) => p,
                _ => continue,
            };
            if seen.contains(&pos) {
                continue;
            }
            seen.push(pos);
            selected.push(self.jobs[pos - 1].clone());
        }
        selected
    }
}

/// Reads and writes the cached search results.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn user_default() -> Result<Self> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(Self::at(home.join(JOBS_FILE)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` until a search has been cached.
    pub fn load(&self) -> Result<Option<SearchSession>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read job cache {}", self.path.display()))?;
        let jobs: Vec<Job> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse job cache {}", self.path.display()))?;

        Ok(Some(SearchSession::new(jobs)))
    }

    pub fn save(&self, session: &SearchSession) -> Result<()> {
        let content =
            serde_json::to_string_pretty(session.jobs()).context("Failed to serialize jobs")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write job cache {}", self.path.display()))?;

        info!(path = %self.path.display(), count = session.len(), "search results cached");
        Ok(())
    }
}
