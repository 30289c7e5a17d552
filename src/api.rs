// API client module: a small blocking HTTP client for the job-application
// backend. Commands talk to it through the `JobService` and
// `MonitorService` traits so tests can swap in mocks.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::models::{
    ApplicationRecord, ApplicationStats, ApplicationsResponse, ApplyRequest, ApplyResponse,
    ApplyResult, HealthStatus, IntervalRequest, Job, MonitorStatus, MonitorStatusResponse,
    OpaqueId, SearchRequest, SearchResponse, StatsResponse, WatchItem, WatchItemResponse,
    WatchListResponse, WatchRequest, WatchUpdate,
};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Scraping several boards can take a while.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(60);
/// The backend drives a browser per job, with delays in between.
pub const APPLY_TIMEOUT: Duration = Duration::from_secs(120);
/// Status, list and control calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Search, apply and reporting endpoints.
#[cfg_attr(test, mockall::automock)]
pub trait JobService {
    fn search(&self, req: &SearchRequest) -> Result<Vec<Job>, ApiError>;

    fn apply(&self, req: &ApplyRequest) -> Result<Vec<ApplyResult>, ApiError>;

    fn stats(&self) -> Result<ApplicationStats, ApiError>;

    fn applications(&self) -> Result<Vec<ApplicationRecord>, ApiError>;

    fn health(&self) -> Result<HealthStatus, ApiError>;
}

/// Watch-list and background monitor endpoints.
#[cfg_attr(test, mockall::automock)]
pub trait MonitorService {
    /// Returns the watch as echoed by the backend, if it echoed one.
    fn add_watch(&self, req: &WatchRequest) -> Result<Option<WatchItem>, ApiError>;

    fn list_watches(&self) -> Result<Vec<WatchItem>, ApiError>;

    fn remove_watch(&self, id: &OpaqueId) -> Result<(), ApiError>;

    /// Returns `None` when the backend has no watch with that id.
    fn set_watch_enabled(&self, id: &OpaqueId, enabled: bool)
        -> Result<Option<WatchItem>, ApiError>;

    fn start_monitor(&self) -> Result<(), ApiError>;

    fn stop_monitor(&self) -> Result<(), ApiError>;

    fn monitor_status(&self) -> Result<MonitorStatus, ApiError>;

    fn set_check_interval(&self, minutes: u32) -> Result<(), ApiError>;
}

/// Blocking client bound to one backend base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url`. A trailing slash is ignored.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder().build().map_err(ApiError::Http)?;
        Ok(Self::with_client(client, base_url))
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, timeout: Duration) -> RequestBuilder {
        debug!(path, ?timeout, "{} request", method);
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .timeout(timeout)
    }

    /// Send the request and reject anything but a success status.
    fn send(&self, req: RequestBuilder, path: &str) -> Result<Response, ApiError> {
        let res = req
            .send()
            .map_err(|e| ApiError::from_transport(e, &self.base_url, path))?;
        let status = res.status();
        if !status.is_success() {
            warn!(path, status = status.as_u16(), "backend returned error status");
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(res)
    }

    fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder, path: &str) -> Result<T, ApiError> {
        let res = self.send(req, path)?;
        res.json().map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

impl JobService for ApiClient {
    fn search(&self, req: &SearchRequest) -> Result<Vec<Job>, ApiError> {
        let path = "/api/jobs/search";
        let builder = self.request(Method::POST, path, SEARCH_TIMEOUT).json(req);
        let resp: SearchResponse = self.send_json(builder, path)?;
        debug!(count = resp.jobs.len(), "search returned jobs");
        Ok(resp.jobs)
    }

    fn apply(&self, req: &ApplyRequest) -> Result<Vec<ApplyResult>, ApiError> {
        let path = "/api/jobs/apply";
        let builder = self.request(Method::POST, path, APPLY_TIMEOUT).json(req);
        let resp: ApplyResponse = self.send_json(builder, path)?;
        Ok(resp.results)
    }

    fn stats(&self) -> Result<ApplicationStats, ApiError> {
        let path = "/api/stats";
        let resp: StatsResponse =
            self.send_json(self.request(Method::GET, path, DEFAULT_TIMEOUT), path)?;
        Ok(resp.stats)
    }

    fn applications(&self) -> Result<Vec<ApplicationRecord>, ApiError> {
        let path = "/api/applications";
        let resp: ApplicationsResponse =
            self.send_json(self.request(Method::GET, path, DEFAULT_TIMEOUT), path)?;
        Ok(resp.applications)
    }

    fn health(&self) -> Result<HealthStatus, ApiError> {
        let path = "/api/health";
        self.send_json(self.request(Method::GET, path, DEFAULT_TIMEOUT), path)
    }
}

impl MonitorService for ApiClient {
    fn add_watch(&self, req: &WatchRequest) -> Result<Option<WatchItem>, ApiError> {
        let path = "/api/monitor/watch";
        let builder = self.request(Method::POST, path, DEFAULT_TIMEOUT).json(req);
        let resp: WatchItemResponse = self.send_json(builder, path)?;
        Ok(resp.watch_item)
    }

    fn list_watches(&self) -> Result<Vec<WatchItem>, ApiError> {
        let path = "/api/monitor/watch";
        let resp: WatchListResponse =
            self.send_json(self.request(Method::GET, path, DEFAULT_TIMEOUT), path)?;
        Ok(resp.watch_list)
    }

    fn remove_watch(&self, id: &OpaqueId) -> Result<(), ApiError> {
        let path = format!("/api/monitor/watch/{}", id);
        self.send(self.request(Method::DELETE, &path, DEFAULT_TIMEOUT), &path)?;
        Ok(())
    }

    fn set_watch_enabled(
        &self,
        id: &OpaqueId,
        enabled: bool,
    ) -> Result<Option<WatchItem>, ApiError> {
        let path = format!("/api/monitor/watch/{}", id);
        let builder = self
            .request(Method::PUT, &path, DEFAULT_TIMEOUT)
            .json(&WatchUpdate { enabled });
        let resp: WatchItemResponse = self.send_json(builder, &path)?;
        Ok(resp.watch_item)
    }

    fn start_monitor(&self) -> Result<(), ApiError> {
        let path = "/api/monitor/start";
        self.send(self.request(Method::POST, path, DEFAULT_TIMEOUT), path)?;
        Ok(())
    }

    fn stop_monitor(&self) -> Result<(), ApiError> {
        let path = "/api/monitor/stop";
        self.send(self.request(Method::POST, path, DEFAULT_TIMEOUT), path)?;
        Ok(())
    }

    fn monitor_status(&self) -> Result<MonitorStatus, ApiError> {
        let path = "/api/monitor/status";
        let resp: MonitorStatusResponse =
            self.send_json(self.request(Method::GET, path, DEFAULT_TIMEOUT), path)?;
        Ok(resp.status)
    }

    fn set_check_interval(&self, minutes: u32) -> Result<(), ApiError> {
        let path = "/api/monitor/interval";
        let builder = self
            .request(Method::POST, path, DEFAULT_TIMEOUT)
            .json(&IntervalRequest { minutes });
        self.send(builder, path)?;
        Ok(())
    }
}
