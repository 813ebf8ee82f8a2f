use crate::descriptor::SiteDescriptor;
use crate::error::{FetchError, Result};
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Anything that can turn a site.json location into a validated descriptor.
pub trait SiteSource {
    fn fetch_site(&self, url: &str) -> impl Future<Output = Result<SiteDescriptor>> + Send;
}

#[derive(Clone)]
pub struct SiteFetcher {
    client: Client,
}

impl SiteFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(
                "sitelens/",
                env!("CARGO_PKG_VERSION"),
                " (https://github.com/trapdoorsec/sitelens)"
            ))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` and validate the body as a site descriptor.
    pub async fn fetch(&self, url: &str) -> Result<SiteDescriptor> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;

        debug!("Fetching {}", parsed);
        let start = Instant::now();
        let response = self.client.get(parsed.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::StatusError {
                status: status.as_u16(),
                url: parsed.to_string(),
            });
        }

        let body = response.text().await?;
        debug!(
            "Received {} bytes from {} in {:?}",
            body.len(),
            parsed,
            start.elapsed()
        );

        let value: Value = serde_json::from_str(&body).map_err(|source| FetchError::JsonError {
            url: parsed.to_string(),
            source,
        })?;

        let descriptor = SiteDescriptor::from_value(value)?;
        info!(
            "Loaded site.json from {} ({} items)",
            parsed,
            descriptor.items.len()
        );
        Ok(descriptor)
    }
}

impl SiteSource for SiteFetcher {
    async fn fetch_site(&self, url: &str) -> Result<SiteDescriptor> {
        self.fetch(url).await
    }
}
