// Search, apply, stats and configuration commands behind `jobbot`.

use anyhow::Result;
use tracing::debug;

use crate::api::JobService;
use crate::config::{ConfigAnswers, ConfigStore};
use crate::models::{ApplyRequest, Job, SearchRequest};
use crate::session::{SearchSession, SessionStore};
use crate::ui::{self, report_api_error, Output, Panel, Table};

pub struct JobBot<'a, S> {
    service: &'a S,
    config: &'a ConfigStore,
    session: &'a SessionStore,
}

impl<'a, S: JobService> JobBot<'a, S> {
    pub fn new(service: &'a S, config: &'a ConfigStore, session: &'a SessionStore) -> Self {
        Self {
            service,
            config,
            session,
        }
    }

    /// Search with the given keywords/location, falling back to the
    /// configured ones. Any successful response replaces the cached result
    /// set, even an empty one. Failures leave the cache alone and yield an
    /// empty list.
    pub fn search(
        &self,
        out: &mut dyn Output,
        keywords: Option<String>,
        location: Option<String>,
    ) -> Result<Vec<Job>> {
        let config = self.config.load()?;
        let req = SearchRequest {
            keywords: keywords
                .filter(|k| !k.trim().is_empty())
                .unwrap_or(config.keywords),
            location: location
                .filter(|l| !l.trim().is_empty())
                .unwrap_or(config.location),
            platforms: config.platforms,
        };

        out.heading("Searching for jobs...");
        out.plain(&format!("Keywords: {}", req.keywords));
        out.plain(&format!("Location: {}", req.location));
        out.plain("");

        out.start_progress("Scraping job boards...");
        let result = self.service.search(&req);
        out.finish_progress();

        let jobs = match result {
            Ok(jobs) => jobs,
            Err(err) => {
                report_api_error(out, &err);
                return Ok(Vec::new());
            }
        };

        let session = SearchSession::new(jobs);
        self.session.save(&session)?;

        if session.is_empty() {
            out.warning("No jobs found matching your criteria");
            return Ok(Vec::new());
        }

        out.success(&format!("Found {} jobs!", session.len()));
        out.plain("");

        let mut table = Table::new(["#", "Title", "Company", "Location", "Platform"]);
        for (idx, job) in session.jobs().iter().enumerate() {
            table.add_row([
                (idx + 1).to_string(),
                job.title_or_na().to_string(),
                job.company_or_na().to_string(),
                job.location_or_na().to_string(),
                job.platform_or_na().to_string(),
            ]);
        }
        out.table(&table);
        out.plain("");
        out.dim(&format!("Jobs saved to {}", self.session.path().display()));

        Ok(session.jobs().to_vec())
    }

    /// Apply to jobs from the last search. `indices` are 1-based positions;
    /// `None` means every cached job.
    pub fn apply(&self, out: &mut dyn Output, indices: Option<&[i64]>) -> Result<()> {
        let Some(session) = self.session.load()? else {
            out.error("No jobs found. Run 'search' first!");
            return Ok(());
        };

        if session.is_empty() {
            out.warning("No jobs available to apply to");
            return Ok(());
        }

        let jobs = session.select(indices);
        if jobs.is_empty() {
            out.warning(&format!(
                "None of the given indices match the {} cached jobs (valid: 1-{})",
                session.len(),
                session.len()
            ));
            return Ok(());
        }

        let config = self.config.load()?;
        debug!(selected = jobs.len(), cached = session.len(), "applying");
        out.heading(&format!("Applying to {} job(s)...", jobs.len()));
        out.plain("");

        let req = ApplyRequest {
            jobs,
            resume_path: config.resume_path,
            cover_letter: String::new(),
        };
        let results = match self.service.apply(&req) {
            Ok(results) => results,
            Err(err) => {
                report_api_error(out, &err);
                return Ok(());
            }
        };

        let mut table = Table::new(["Job", "Company", "Status", "Message"]);
        for result in &results {
            table.add_row([
                result.job.clone().unwrap_or_default(),
                result.company.clone().unwrap_or_default(),
                result.status.to_string(),
                result.message.clone(),
            ]);
        }
        out.table(&table);
        out.plain("");
        out.success("Application process completed!");
        Ok(())
    }

    pub fn stats(&self, out: &mut dyn Output) -> Result<()> {
        let stats = match self.service.stats() {
            Ok(stats) => stats,
            Err(err) => {
                report_api_error(out, &err);
                return Ok(());
            }
        };

        out.panel(
            &Panel::new("📊 Application Statistics")
                .field("Total Applications", stats.total)
                .field("Successful", stats.successful)
                .field("Pending", stats.pending)
                .field("Failed", stats.failed),
        );
        Ok(())
    }

    /// Application history as recorded by the backend.
    pub fn applications(&self, out: &mut dyn Output) -> Result<()> {
        let records = match self.service.applications() {
            Ok(records) => records,
            Err(err) => {
                report_api_error(out, &err);
                return Ok(());
            }
        };

        if records.is_empty() {
            out.warning("No applications recorded yet");
            return Ok(());
        }

        out.heading(&format!("Applications ({})", records.len()));
        out.plain("");
        let mut table = Table::new([
            "When", "Title", "Company", "Location", "Platform", "Status", "Message",
        ]);
        for r in &records {
            table.add_row([
                r.timestamp.clone().unwrap_or_default(),
                r.title.clone().unwrap_or_default(),
                r.company.clone().unwrap_or_default(),
                r.location.clone().unwrap_or_default(),
                r.platform.clone().unwrap_or_default(),
                r.status.to_string(),
                r.message.clone().unwrap_or_default(),
            ]);
        }
        out.table(&table);
        Ok(())
    }

    pub fn health(&self, out: &mut dyn Output) -> Result<()> {
        match self.service.health() {
            Ok(health) => {
                let message = if health.message.is_empty() {
                    health.status
                } else {
                    format!("{} ({})", health.message, health.status)
                };
                out.success(&format!("Backend is reachable: {}", message));
            }
            Err(err) => report_api_error(out, &err),
        }
        Ok(())
    }

    /// Prompt for every setting and save the result.
    pub fn configure(&self, out: &mut dyn Output) -> Result<()> {
        out.heading("Configuration Setup");
        out.plain("");
        let current = self.config.load()?;
        let answers = ui::prompt_configuration(&current)?;
        self.save_answers(out, answers)
    }

    /// Merge `answers` into the stored configuration and write it back.
    pub fn save_answers(&self, out: &mut dyn Output, answers: ConfigAnswers) -> Result<()> {
        let mut config = self.config.load()?;
        config.apply_answers(answers);
        self.config.save(&config)?;
        out.success(&format!(
            "Configuration saved to {}",
            self.config.path().display()
        ));
        Ok(())
    }

    pub fn show_config(&self, out: &mut dyn Output) -> Result<()> {
        let config = self.config.load()?;
        let resume = if config.resume_path.is_empty() {
            "Not set".to_string()
        } else {
            config.resume_path.clone()
        };

        out.panel(
            &Panel::new("⚙️  Current Configuration")
                .field("Keywords", &config.keywords)
                .field("Location", &config.location)
                .field("Platforms", config.platforms.join(", "))
                .field("Resume Path", resume)
                .field("Daily Limit", config.daily_limit)
                .note(format!("Stored in {}", self.config.path().display())),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockJobService;
    use crate::config::Configuration;
    use crate::error::ApiError;
    use crate::models::{ApplicationRecord, ApplicationStats, ApplyResult, ApplyStatus};
    use crate::ui::{Recorder, Tone};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        config: ConfigStore,
        session: SessionStore,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let config = ConfigStore::at(dir.path().join("config.json"));
        let session = SessionStore::at(dir.path().join("jobs.json"));
        Fixture {
            _dir: dir,
            config,
            session,
        }
    }

    fn job(title: &str, company: &str) -> Job {
        Job {
            title: Some(title.to_string()),
            company: Some(company.to_string()),
            location: Some("Remote".to_string()),
            platform: Some("LinkedIn".to_string()),
            ..Default::default()
        }
    }

    fn titles(jobs: &[Job]) -> Vec<&str> {
        jobs.iter().map(|j| j.title_or_na()).collect()
    }

    fn unreachable() -> ApiError {
        ApiError::Unreachable {
            url: "http://localhost:5000".into(),
        }
    }

    #[test]
    fn search_caches_jobs_in_received_order() {
        let fx = fixture();
        let mut service = MockJobService::new();
        service
            .expect_search()
            .times(1)
            .returning(|_| Ok(vec![job("b", "B"), job("a", "A"), job("c", "C")]));

        let bot = JobBot::new(&service, &fx.config, &fx.session);
        let mut out = Recorder::new();
        let jobs = bot.search(&mut out, None, None).unwrap();

        assert_eq!(titles(&jobs), vec!["b", "a", "c"]);
        let cached = fx.session.load().unwrap().unwrap();
        assert_eq!(cached.jobs(), jobs.as_slice());

        let table = out.tables()[0];
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0][0], "1");
        assert_eq!(table.rows[0][1], "b");
    }

    #[test]
    fn search_falls_back_to_configured_terms() {
        let fx = fixture();
        let mut config = Configuration::default();
        config.keywords = "Rust Developer".into();
        config.platforms = vec!["glassdoor".into()];
        fx.config.save(&config).unwrap();

        let mut service = MockJobService::new();
        service
            .expect_search()
            .withf(|req| {
                req.keywords == "Rust Developer"
                    && req.location == "Berlin"
                    && req.platforms == vec!["glassdoor".to_string()]
            })
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let bot = JobBot::new(&service, &fx.config, &fx.session);
        let mut out = Recorder::new();
        bot.search(&mut out, Some("  ".into()), Some("Berlin".into()))
            .unwrap();
    }

    #[test]
    fn empty_search_result_is_still_cached() {
        let fx = fixture();
        let mut service = MockJobService::new();
        service.expect_search().returning(|_| Ok(Vec::new()));

        let bot = JobBot::new(&service, &fx.config, &fx.session);
        let mut out = Recorder::new();
        let jobs = bot.search(&mut out, None, None).unwrap();

        assert!(jobs.is_empty());
        assert!(fx.session.load().unwrap().unwrap().is_empty());
        assert!(out.contains("No jobs found"));
    }

    #[test]
    fn unreachable_backend_does_not_touch_cache() {
        let fx = fixture();
        fx.session
            .save(&SearchSession::new(vec![job("old", "Old")]))
            .unwrap();

        let mut service = MockJobService::new();
        service.expect_search().returning(|_| Err(unreachable()));

        let bot = JobBot::new(&service, &fx.config, &fx.session);
        let mut out = Recorder::new();
        let jobs = bot.search(&mut out, None, None).unwrap();

        assert!(jobs.is_empty());
        assert!(out.lines(Tone::Error)[0].contains("Cannot connect to backend"));
        assert!(out.contains("npm start"));
        let cached = fx.session.load().unwrap().unwrap();
        assert_eq!(titles(cached.jobs()), vec!["old"]);
    }

    #[test]
    fn unreachable_backend_on_fresh_setup_writes_no_cache() {
        let fx = fixture();
        let mut service = MockJobService::new();
        service.expect_search().returning(|_| Err(unreachable()));

        let bot = JobBot::new(&service, &fx.config, &fx.session);
        bot.search(&mut Recorder::new(), None, None).unwrap();
        assert!(!fx.session.path().exists());
    }

    #[test]
    fn error_status_is_reported_by_code() {
        let fx = fixture();
        let mut service = MockJobService::new();
        service.expect_search().returning(|_| Err(ApiError::Status(500)));

        let bot = JobBot::new(&service, &fx.config, &fx.session);
        let mut out = Recorder::new();
        assert!(bot.search(&mut out, None, None).unwrap().is_empty());
        assert_eq!(out.lines(Tone::Error), vec!["Error: 500"]);
        assert!(!fx.session.path().exists());
    }

    #[test]
    fn apply_without_search_makes_no_request() {
        let fx = fixture();
        // No expectations: any call on the mock panics.
        let service = MockJobService::new();

        let bot = JobBot::new(&service, &fx.config, &fx.session);
        let mut out = Recorder::new();
        bot.apply(&mut out, None).unwrap();
        bot.apply(&mut out, Some(&[1, 2][..])).unwrap();

        assert_eq!(out.lines(Tone::Error).len(), 2);
        assert!(out.lines(Tone::Error)[0].contains("Run 'search' first"));
    }

    #[test]
    fn apply_with_indices_sends_valid_jobs_in_index_order() {
        let fx = fixture();
        fx.session
            .save(&SearchSession::new(vec![
                job("a", "A"),
                job("b", "B"),
                job("c", "C"),
            ]))
            .unwrap();
        let mut config = Configuration::default();
        config.resume_path = "/home/me/cv.pdf".into();
        fx.config.save(&config).unwrap();

        let mut service = MockJobService::new();
        service
            .expect_apply()
            .withf(|req| {
                titles(&req.jobs) == vec!["c", "a"]
                    && req.resume_path == "/home/me/cv.pdf"
                    && req.cover_letter.is_empty()
            })
            .times(1)
            .returning(|_| {
                Ok(vec![
                    ApplyResult {
                        job: Some("c".into()),
                        company: Some("C".into()),
                        status: ApplyStatus::Success,
                        message: "Applied".into(),
                    },
                    ApplyResult {
                        job: Some("a".into()),
                        company: Some("A".into()),
                        status: ApplyStatus::Skipped,
                        message: "Already applied to this position".into(),
                    },
                ])
            });

        let bot = JobBot::new(&service, &fx.config, &fx.session);
        let mut out = Recorder::new();
        bot.apply(&mut out, Some(&[3, 0, -1, 7, 1, 3][..])).unwrap();

        let table = out.tables()[0];
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][2], "success");
        assert_eq!(table.rows[1][2], "skipped");
        assert!(out.contains("Application process completed!"));

        // The cache stays usable for another round.
        assert_eq!(fx.session.load().unwrap().unwrap().len(), 3);
    }

    #[test]
    fn apply_without_indices_sends_whole_cache() {
        let fx = fixture();
        fx.session
            .save(&SearchSession::new(vec![job("a", "A"), job("b", "B")]))
            .unwrap();

        let mut service = MockJobService::new();
        service
            .expect_apply()
            .withf(|req| titles(&req.jobs) == vec!["a", "b"] && req.resume_path.is_empty())
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let bot = JobBot::new(&service, &fx.config, &fx.session);
        bot.apply(&mut Recorder::new(), None).unwrap();
    }

    #[test]
    fn apply_with_only_invalid_indices_makes_no_request() {
        let fx = fixture();
        fx.session
            .save(&SearchSession::new(vec![job("a", "A")]))
            .unwrap();
        let service = MockJobService::new();

        let bot = JobBot::new(&service, &fx.config, &fx.session);
        let mut out = Recorder::new();
        bot.apply(&mut out, Some(&[0, -2, 2][..])).unwrap();
        assert!(out.lines(Tone::Warning)[0].contains("None of the given indices"));
    }

    #[test]
    fn apply_on_empty_cache_makes_no_request() {
        let fx = fixture();
        fx.session.save(&SearchSession::default()).unwrap();
        let service = MockJobService::new();

        let bot = JobBot::new(&service, &fx.config, &fx.session);
        let mut out = Recorder::new();
        bot.apply(&mut out, None).unwrap();
        assert_eq!(out.lines(Tone::Warning), vec!["No jobs available to apply to"]);
    }

    #[test]
    fn stats_panel_shows_all_counters() {
        let fx = fixture();
        let mut service = MockJobService::new();
        service.expect_stats().returning(|| {
            Ok(ApplicationStats {
                total: 7,
                successful: 4,
                pending: 1,
                failed: 2,
            })
        });

        let bot = JobBot::new(&service, &fx.config, &fx.session);
        let mut out = Recorder::new();
        bot.stats(&mut out).unwrap();

        let panel = out.panels()[0];
        let values: Vec<&str> = panel.fields.iter().map(|(_, v)| v.as_str()).collect();
        assert_eq!(values, vec!["7", "4", "1", "2"]);
    }

    #[test]
    fn history_shows_location_and_raw_status() {
        let fx = fixture();
        let mut service = MockJobService::new();
        service.expect_applications().returning(|| {
            Ok(vec![ApplicationRecord {
                title: Some("SRE".into()),
                company: Some("Globex".into()),
                location: Some("Berlin".into()),
                status: ApplyStatus::from("queued"),
                ..Default::default()
            }])
        });

        let bot = JobBot::new(&service, &fx.config, &fx.session);
        let mut out = Recorder::new();
        bot.applications(&mut out).unwrap();

        let table = out.tables()[0];
        assert_eq!(table.rows[0][3], "Berlin");
        assert_eq!(table.rows[0][5], "queued");
    }

    #[test]
    fn save_answers_persists_merged_config() {
        let fx = fixture();
        let service = MockJobService::new();
        let bot = JobBot::new(&service, &fx.config, &fx.session);

        let mut out = Recorder::new();
        bot.save_answers(
            &mut out,
            ConfigAnswers {
                keywords: Some("Platform Engineer".into()),
                daily_limit: Some("10".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let saved = fx.config.load().unwrap();
        assert_eq!(saved.keywords, "Platform Engineer");
        assert_eq!(saved.location, "Remote");
        assert_eq!(saved.daily_limit, 10);
        assert!(out.lines(Tone::Success)[0].starts_with("Configuration saved to"));
    }

    #[test]
    fn show_config_renders_defaults() {
        let fx = fixture();
        let service = MockJobService::new();
        let bot = JobBot::new(&service, &fx.config, &fx.session);

        let mut out = Recorder::new();
        bot.show_config(&mut out).unwrap();

        let panel = out.panels()[0];
        assert!(panel
            .fields
            .contains(&("Platforms".to_string(), "linkedin, indeed".to_string())));
        assert!(panel
            .fields
            .contains(&("Resume Path".to_string(), "Not set".to_string())));
    }
}
