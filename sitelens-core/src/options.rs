use crate::query::QueryPolicy;
use sitelens_fetch::fetcher::DEFAULT_TIMEOUT_SECS;
use url::Url;

/// Base that relative item links are resolved against.
pub const DEFAULT_BASE_URL: &str = "https://haxtheweb.org/";

/// Options for configuring an analyzer
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    pub base_url: Url,
    pub policy: QueryPolicy,
    pub timeout_secs: u64,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            policy: QueryPolicy::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AnalyzerOptions {
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_policy(mut self, policy: QueryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}
