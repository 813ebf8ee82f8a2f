// Query validation and site.json target normalization

use thiserror::Error;

pub const SITE_JSON: &str = "site.json";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("site location is empty")]
    Empty,

    #[error("site location must start with http: {0}")]
    MissingHttpPrefix(String),
}

/// How a user-entered site location becomes a fetch target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    /// Reject locations that do not start with `http`.
    pub require_http_prefix: bool,
    /// Append `/site.json` to locations that do not already end with it.
    pub append_site_json: bool,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self {
            require_http_prefix: true,
            append_site_json: true,
        }
    }
}

impl QueryPolicy {
    /// Fetch the query exactly as typed.
    pub fn raw() -> Self {
        Self {
            require_http_prefix: true,
            append_site_json: false,
        }
    }

    pub fn validate<'a>(&self, query: &'a str) -> Result<&'a str, QueryError> {
        if query.is_empty() {
            return Err(QueryError::Empty);
        }
        if self.require_http_prefix && !query.starts_with("http") {
            return Err(QueryError::MissingHttpPrefix(query.to_string()));
        }
        Ok(query)
    }

    /// Validate `query` and derive the URL to fetch.
    pub fn target_for(&self, query: &str) -> Result<String, QueryError> {
        let query = self.validate(query)?;
        if self.append_site_json {
            Ok(normalize_site_url(query))
        } else {
            Ok(query.to_string())
        }
    }
}

/// Append `/site.json` unless the location already ends with `site.json`.
pub fn normalize_site_url(query: &str) -> String {
    if query.ends_with(SITE_JSON) {
        query.to_string()
    } else {
        format!("{}/{}", query, SITE_JSON)
    }
}
