// Startup preflight: resolve everything an invocation needs before any
// command runs, and fail fast with a plain message when something is off.

use anyhow::{bail, Context as _, Result};
use reqwest::Url;
use tracing::debug;

use crate::api::ApiClient;
use crate::config::ConfigStore;
use crate::session::SessionStore;

pub struct Context {
    pub api: ApiClient,
    pub config: ConfigStore,
    pub session: SessionStore,
}

impl Context {
    /// Check the backend URL and the home directory, then build the client
    /// and the per-user stores.
    pub fn preflight(api_url: &str) -> Result<Self> {
        check_api_url(api_url)?;

        let config = ConfigStore::user_default()?;
        let session = SessionStore::user_default()?;
        let api = ApiClient::new(api_url).context("Failed to build HTTP client")?;

        debug!(
            api_url,
            config = %config.path().display(),
            cache = %session.path().display(),
            "preflight ok"
        );
        Ok(Self {
            api,
            config,
            session,
        })
    }
}

fn check_api_url(api_url: &str) -> Result<()> {
    let url = Url::parse(api_url).with_context(|| format!("Invalid backend URL: {}", api_url))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "Invalid backend URL: {} (expected an http:// or https:// address)",
            api_url
        );
    }
    if url.host_str().is_none() {
        bail!("Invalid backend URL: {} (missing host)", api_url);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(check_api_url("http://localhost:5000").is_ok());
        assert!(check_api_url("https://jobs.example.com/").is_ok());
    }

    #[test]
    fn rejects_garbage_and_other_schemes() {
        assert!(check_api_url("localhost:5000").is_err());
        assert!(check_api_url("ftp://example.com").is_err());
        assert!(check_api_url("not a url").is_err());
    }
}
