// Wire types exchanged with the job-application backend. Field names follow
// the backend's camelCase JSON; anything the CLI does not need is either
// ignored or, for jobs, carried through untouched.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Platforms used when neither the configuration nor the caller picks any.
pub const DEFAULT_PLATFORMS: [&str; 2] = ["linkedin", "indeed"];

pub fn default_platforms() -> Vec<String> {
    DEFAULT_PLATFORMS.iter().map(|p| p.to_string()).collect()
}

/// A job posting as returned by search. Only the four display fields are
/// typed; every other field (url, description, ...) is kept in `extra` so
/// that apply sends back exactly what search produced.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Job {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    pub fn title_or_na(&self) -> &str {
        or_na(&self.title)
    }

    pub fn company_or_na(&self) -> &str {
        or_na(&self.company)
    }

    pub fn location_or_na(&self) -> &str {
        or_na(&self.location)
    }

    pub fn platform_or_na(&self) -> &str {
        or_na(&self.platform)
    }
}

fn or_na(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("N/A")
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub keywords: String,
    pub location: String,
    pub platforms: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub jobs: Vec<Job>,
    pub resume_path: String,
    pub cover_letter: String,
}

/// Outcome tag the backend attaches to each application attempt. Tags the
/// CLI does not know are kept verbatim so they can still be shown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ApplyStatus {
    Success,
    Failed,
    Skipped,
    Pending,
    Other(String),
    /// No tag was sent.
    #[default]
    Unknown,
}

impl ApplyStatus {
    pub fn is_success(&self) -> bool {
        *self == ApplyStatus::Success
    }
}

impl From<&str> for ApplyStatus {
    fn from(tag: &str) -> Self {
        match tag {
            "success" => ApplyStatus::Success,
            "failed" => ApplyStatus::Failed,
            "skipped" => ApplyStatus::Skipped,
            "pending" => ApplyStatus::Pending,
            other => ApplyStatus::Other(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for ApplyStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<String>::deserialize(deserializer)? {
            Some(tag) => ApplyStatus::from(tag.as_str()),
            None => ApplyStatus::Unknown,
        })
    }
}

impl fmt::Display for ApplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApplyStatus::Success => "success",
            ApplyStatus::Failed => "failed",
            ApplyStatus::Skipped => "skipped",
            ApplyStatus::Pending => "pending",
            ApplyStatus::Other(tag) => tag.as_str(),
            ApplyStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ApplyResult {
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub status: ApplyStatus,
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct ApplyResponse {
    #[serde(default)]
    pub results: Vec<ApplyResult>,
}

/// Aggregate application counters. Missing counters read as zero.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplicationStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub successful: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub pending: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub failed: u64,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct StatsResponse {
    #[serde(default)]
    pub stats: ApplicationStats,
}

/// One entry of the backend's application history.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ApplicationRecord {
    #[serde(default)]
    pub id: Option<OpaqueId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: ApplyStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct ApplicationsResponse {
    #[serde(default)]
    pub applications: Vec<ApplicationRecord>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Backend-issued identifier. The backend emits numbers such as
/// `1696789012345.678`; the client only ever echoes them back, so the
/// textual form is all that is kept.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct OpaqueId(String);

impl OpaqueId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OpaqueId {
    fn from(s: &str) -> Self {
        OpaqueId(s.to_string())
    }
}

impl fmt::Display for OpaqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for OpaqueId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => OpaqueId(s),
            Raw::Number(n) => OpaqueId(n.to_string()),
        })
    }
}

/// Payload for creating a watch. Optional fields are left out of the JSON
/// entirely when unset.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchRequest {
    pub keywords: String,
    pub location: String,
    pub platforms: Vec<String>,
    pub auto_apply: bool,
    pub remote: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_salary: Option<u64>,
}

impl WatchRequest {
    /// New watch on the default platforms with auto-apply enabled.
    pub fn new(keywords: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            location: location.into(),
            platforms: default_platforms(),
            auto_apply: true,
            remote: false,
            user_email: None,
            resume_path: None,
            min_salary: None,
        }
    }

    /// Replace the platform list; an empty list keeps the defaults.
    pub fn with_platforms(mut self, platforms: Vec<String>) -> Self {
        if !platforms.is_empty() {
            self.platforms = platforms;
        }
        self
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WatchUpdate {
    pub enabled: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WatchFilters {
    #[serde(default, deserialize_with = "lenient_opt_count")]
    pub min_salary: Option<u64>,
    #[serde(default)]
    pub remote: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WatchItem {
    #[serde(default)]
    pub id: OpaqueId,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub auto_apply: bool,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub filters: Option<WatchFilters>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WatchItemResponse {
    #[serde(default)]
    pub watch_item: Option<WatchItem>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WatchListResponse {
    #[serde(default)]
    pub watch_list: Vec<WatchItem>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IntervalRequest {
    pub minutes: u32,
}

/// Snapshot of the backend monitor. Absent fields read as zero / stopped.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    #[serde(default)]
    pub is_monitoring: bool,
    #[serde(default, deserialize_with = "lenient_count")]
    pub watch_list_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub seen_jobs_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub check_interval_minutes: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub daily_application_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub daily_limit: u64,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct MonitorStatusResponse {
    #[serde(default)]
    pub status: MonitorStatus,
}

// The backend computes some counters with floating point division, so
// `2.0` or `0.5` can show up where an integer is expected. Null, negative
// and non-numeric values read as zero.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(lenient_opt_count(deserializer)?.unwrap_or(0))
}

fn lenient_opt_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.round() as u64)
        }),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn job_keeps_unknown_fields() {
        let raw = json!({
            "title": "Rust Engineer",
            "company": "Acme",
            "location": "Remote",
            "platform": "LinkedIn",
            "url": "https://example.com/jobs/1",
            "postedDate": "2024-01-01"
        });
        let job: Job = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(job.title_or_na(), "Rust Engineer");
        assert_eq!(job.extra["url"], "https://example.com/jobs/1");
        assert_eq!(serde_json::to_value(&job).unwrap(), raw);
    }

    #[test]
    fn job_missing_fields_display_as_na() {
        let job: Job = serde_json::from_value(json!({"url": "x"})).unwrap();
        assert_eq!(job.title_or_na(), "N/A");
        assert_eq!(job.company_or_na(), "N/A");
        assert_eq!(job.location_or_na(), "N/A");
        assert_eq!(job.platform_or_na(), "N/A");
    }

    #[test]
    fn numeric_watch_id_is_kept_as_text() {
        let item: WatchItem =
            serde_json::from_value(json!({"id": 1696789012345.678, "keywords": "Go"})).unwrap();
        assert_eq!(item.id.as_str(), "1696789012345.678");

        let item: WatchItem = serde_json::from_value(json!({"id": "abc"})).unwrap();
        assert_eq!(item.id.as_str(), "abc");
    }

    #[test]
    fn watch_request_omits_unset_optionals() {
        let req = WatchRequest::new("Python Developer", "Remote");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "keywords": "Python Developer",
                "location": "Remote",
                "platforms": ["linkedin", "indeed"],
                "autoApply": true,
                "remote": false
            })
        );
    }

    #[test]
    fn watch_request_includes_optionals_when_set() {
        let mut req = WatchRequest::new("DevOps", "Berlin");
        req.user_email = Some("me@example.com".into());
        req.resume_path = Some("/tmp/cv.pdf".into());
        req.min_salary = Some(90_000);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["userEmail"], "me@example.com");
        assert_eq!(value["resumePath"], "/tmp/cv.pdf");
        assert_eq!(value["minSalary"], 90_000);
    }

    #[test]
    fn empty_platform_override_keeps_defaults() {
        let req = WatchRequest::new("a", "b").with_platforms(Vec::new());
        assert_eq!(req.platforms, vec!["linkedin", "indeed"]);

        let req = WatchRequest::new("a", "b").with_platforms(vec!["upwork".into()]);
        assert_eq!(req.platforms, vec!["upwork"]);
    }

    #[test]
    fn monitor_status_tolerates_missing_and_fractional_fields() {
        let resp: MonitorStatusResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(resp.status, MonitorStatus::default());

        let status: MonitorStatus = serde_json::from_value(json!({
            "isMonitoring": true,
            "watchListCount": 3,
            "checkIntervalMinutes": 2.0,
            "dailyLimit": null
        }))
        .unwrap();
        assert!(status.is_monitoring);
        assert_eq!(status.watch_list_count, 3);
        assert_eq!(status.check_interval_minutes, 2);
        assert_eq!(status.daily_limit, 0);
        assert_eq!(status.seen_jobs_count, 0);
    }

    #[test]
    fn unknown_apply_status_is_kept_verbatim() {
        let result: ApplyResult = serde_json::from_value(json!({
            "job": "Dev",
            "company": "Acme",
            "status": "queued",
            "message": "later"
        }))
        .unwrap();
        assert_eq!(result.status, ApplyStatus::Other("queued".into()));
        assert_eq!(result.status.to_string(), "queued");

        let result: ApplyResult =
            serde_json::from_value(json!({"status": null, "message": "?"})).unwrap();
        assert_eq!(result.status.to_string(), "unknown");

        let result: ApplyResult =
            serde_json::from_value(json!({"status": "success", "message": "ok"})).unwrap();
        assert!(result.status.is_success());
    }

    #[test]
    fn stats_default_to_zero() {
        let resp: StatsResponse = serde_json::from_value(json!({"stats": {"total": 4}})).unwrap();
        assert_eq!(resp.stats.total, 4);
        assert_eq!(resp.stats.successful, 0);
        assert_eq!(resp.stats.failed, 0);
    }
}
