// Watch-list management and monitor control behind `jobbot-monitor`.
//
// The backend owns all watch state; nothing here is cached locally.

use anyhow::Result;

use crate::api::MonitorService;
use crate::models::{OpaqueId, WatchItem, WatchRequest};
use crate::ui::{report_api_error, Output, Panel, Table};

/// Watch criteria as collected from the command line, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchDraft {
    pub keywords: Option<String>,
    pub location: Option<String>,
    /// Empty means the default platforms.
    pub platforms: Vec<String>,
    pub auto_apply: bool,
    pub remote: bool,
    pub email: Option<String>,
    pub resume_path: Option<String>,
    pub min_salary: Option<u64>,
}

impl Default for WatchDraft {
    fn default() -> Self {
        Self {
            keywords: None,
            location: None,
            platforms: Vec::new(),
            auto_apply: true,
            remote: false,
            email: None,
            resume_path: None,
            min_salary: None,
        }
    }
}

impl WatchDraft {
    /// `None` unless both keywords and location are present and not blank.
    pub fn into_request(self) -> Option<WatchRequest> {
        let keywords = self.keywords.filter(|k| !k.trim().is_empty())?;
        let location = self.location.filter(|l| !l.trim().is_empty())?;

        let mut req = WatchRequest::new(keywords, location).with_platforms(self.platforms);
        req.auto_apply = self.auto_apply;
        req.remote = self.remote;
        req.user_email = self.email.filter(|e| !e.is_empty());
        req.resume_path = self.resume_path.filter(|r| !r.is_empty());
        req.min_salary = self.min_salary.filter(|m| *m > 0);
        Some(req)
    }
}

pub struct Monitor<'a, S> {
    service: &'a S,
}

impl<'a, S: MonitorService> Monitor<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    pub fn add(&self, out: &mut dyn Output, draft: WatchDraft) -> Result<()> {
        let Some(req) = draft.into_request() else {
            out.error("Error: --keywords and --location are required");
            return Ok(());
        };

        match self.service.add_watch(&req) {
            Ok(Some(watch)) => {
                out.success("Watch criteria added successfully!");
                out.plain("");
                out.panel(&watch_panel("🔍 New Watch Created", &watch));
                out.plain("");
                out.dim("Use 'jobbot-monitor start' to begin monitoring");
            }
            Ok(None) => {
                out.success("Watch criteria added successfully!");
                out.dim("The backend did not echo the new watch; run 'jobbot-monitor list' to see it");
            }
            Err(err) => report_api_error(out, &err),
        }
        Ok(())
    }

    pub fn list(&self, out: &mut dyn Output) -> Result<()> {
        let watches = match self.service.list_watches() {
            Ok(watches) => watches,
            Err(err) => {
                report_api_error(out, &err);
                return Ok(());
            }
        };

        if watches.is_empty() {
            out.warning("No watch criteria configured");
            out.dim("Use 'jobbot-monitor add' to create one");
            return Ok(());
        }

        out.heading(&format!("Active Watch Criteria ({})", watches.len()));
        out.plain("");

        let mut table = Table::new([
            "ID",
            "Keywords",
            "Location",
            "Platforms",
            "Auto-Apply",
            "Status",
        ]);
        for watch in &watches {
            table.add_row([
                watch.id.to_string(),
                watch.keywords.clone(),
                watch.location.clone(),
                watch.platforms.join(", "),
                yes_no(watch.auto_apply).to_string(),
                if watch.enabled { "Active" } else { "Paused" }.to_string(),
            ]);
        }
        out.table(&table);
        Ok(())
    }

    /// Delete a watch. Success is judged by status code alone.
    pub fn remove(&self, out: &mut dyn Output, id: Option<String>) -> Result<()> {
        let Some(id) = id.filter(|i| !i.trim().is_empty()) else {
            out.error("Error: a watch ID is required (jobbot-monitor remove <ID>)");
            return Ok(());
        };
        let id = OpaqueId::from(id.trim());

        match self.service.remove_watch(&id) {
            Ok(()) => out.success(&format!("Watch {} removed successfully", id)),
            Err(err) => report_api_error(out, &err),
        }
        Ok(())
    }

    /// Pause or resume a watch without deleting it.
    pub fn set_enabled(&self, out: &mut dyn Output, id: &str, enabled: bool) -> Result<()> {
        let id = OpaqueId::from(id.trim());
        match self.service.set_watch_enabled(&id, enabled) {
            Ok(Some(watch)) => {
                let verb = if watch.enabled { "resumed" } else { "paused" };
                out.success(&format!("Watch {} {}", watch.id, verb));
            }
            Ok(None) => out.error(&format!("Error: no watch with ID {}", id)),
            Err(err) => report_api_error(out, &err),
        }
        Ok(())
    }

    pub fn start(&self, out: &mut dyn Output) -> Result<()> {
        match self.service.start_monitor() {
            Ok(()) => {
                out.success("Job monitor started successfully!");
                out.plain("");
                out.panel(
                    &Panel::new("🚀 Monitor Active")
                        .note("Monitor is now running in the background.")
                        .note("New jobs matching your watches are checked on every interval")
                        .note("and applied to automatically when auto-apply is on.")
                        .note("Use 'jobbot-monitor status' to check progress."),
                );
            }
            Err(err) => report_api_error(out, &err),
        }
        Ok(())
    }

    pub fn stop(&self, out: &mut dyn Output) -> Result<()> {
        match self.service.stop_monitor() {
            Ok(()) => out.warning("⏸️  Job monitor stopped"),
            Err(err) => report_api_error(out, &err),
        }
        Ok(())
    }

    pub fn status(&self, out: &mut dyn Output) -> Result<()> {
        let status = match self.service.monitor_status() {
            Ok(status) => status,
            Err(err) => {
                report_api_error(out, &err);
                return Ok(());
            }
        };

        let state = if status.is_monitoring {
            "🟢 Running"
        } else {
            "⏸️  Stopped"
        };
        out.panel(
            &Panel::new("📊 Monitor Status")
                .field("Status", state)
                .field("Active Watches", status.watch_list_count)
                .field("Jobs Tracked", status.seen_jobs_count)
                .field(
                    "Check Interval",
                    format!("Every {} minutes", status.check_interval_minutes),
                )
                .field(
                    "Today's Applications",
                    format!(
                        "{} / {}",
                        status.daily_application_count, status.daily_limit
                    ),
                ),
        );
        Ok(())
    }

    pub fn interval(&self, out: &mut dyn Output, minutes: u32) -> Result<()> {
        match self.service.set_check_interval(minutes) {
            Ok(()) => out.success(&format!("Check interval set to {} minutes", minutes)),
            Err(err) => report_api_error(out, &err),
        }
        Ok(())
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn watch_panel(title: &str, watch: &WatchItem) -> Panel {
    let mut panel = Panel::new(title)
        .field("Keywords", &watch.keywords)
        .field("Location", &watch.location)
        .field("Platforms", watch.platforms.join(", "))
        .field("Auto-Apply", yes_no(watch.auto_apply));
    if let Some(filters) = &watch.filters {
        if filters.remote {
            panel = panel.field("Remote Only", "Yes");
        }
        if let Some(min) = filters.min_salary {
            panel = panel.field("Min Salary", min);
        }
    }
    if let Some(created) = watch.created_at.as_deref().filter(|c| !c.is_empty()) {
        panel = panel.field("Created", created);
    }
    panel.field("Watch ID", &watch.id)
}
