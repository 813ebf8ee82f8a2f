use crate::options::AnalyzerOptions;
use crate::view::AnalyzerView;
use serde::Serialize;
use sitelens_fetch::{ContentItem, FetchError, SiteDescriptor, SiteMetadata, SiteSource};
use tracing::{debug, error, info, warn};

/// Snapshot of everything the analyzer shows.
///
/// Only [`Analyzer`] mutates it; renderers get a shared reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyzerState {
    pub query: String,
    pub loading: bool,
    pub error: bool,
    pub metadata: Option<SiteMetadata>,
    pub items: Vec<ContentItem>,
    pub generation: u64,
    pub last_target: Option<String>,
}

/// Handle for one accepted fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    target: String,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Normalized URL this attempt fetches.
    pub fn target(&self) -> &str {
        &self.target
    }
}

pub type FetchOutcome = Result<SiteDescriptor, FetchError>;

pub struct Analyzer {
    options: AnalyzerOptions,
    state: AnalyzerState,
}

impl Analyzer {
    pub fn new(options: AnalyzerOptions) -> Self {
        Self {
            options,
            state: AnalyzerState::default(),
        }
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    pub fn state(&self) -> &AnalyzerState {
        &self.state
    }

    pub fn query(&self) -> &str {
        &self.state.query
    }

    pub fn set_query(&mut self, value: impl Into<String>) {
        self.state.query = value.into();
    }

    /// Validate the current query and start a new attempt.
    ///
    /// Returns `None` (with `error` set and nothing else touched) when the
    /// query is rejected. Otherwise the previous results are cleared,
    /// `loading` is raised and any older ticket becomes stale.
    pub fn begin(&mut self) -> Option<FetchTicket> {
        let target = match self.options.policy.target_for(&self.state.query) {
            Ok(target) => target,
            Err(e) => {
                warn!("Rejected site location '{}': {}", self.state.query, e);
                self.state.error = true;
                return None;
            }
        };

        self.state.generation += 1;
        self.state.loading = true;
        self.state.error = false;
        self.state.items.clear();
        self.state.metadata = None;
        self.state.last_target = Some(target.clone());

        debug!("Attempt {} targets {}", self.state.generation, target);
        Some(FetchTicket {
            generation: self.state.generation,
            target,
        })
    }

    /// Settle the attempt behind `ticket`.
    ///
    /// Returns `false` when the ticket is stale; state is left untouched.
    pub fn complete(&mut self, ticket: &FetchTicket, outcome: FetchOutcome) -> bool {
        if ticket.generation != self.state.generation {
            debug!(
                "Discarding stale result for attempt {} (current {})",
                ticket.generation, self.state.generation
            );
            return false;
        }

        match outcome {
            Ok(descriptor) => {
                info!(
                    "Analyzed {} ({} items)",
                    ticket.target,
                    descriptor.items.len()
                );
                self.state.metadata = Some(descriptor.metadata);
                self.state.items = descriptor.items;
            }
            Err(e) => {
                error!("Error fetching site.json from {}: {}", ticket.target, e);
                self.state.error = true;
            }
        }

        self.state.loading = false;
        true
    }

    /// Run a whole attempt against `source`.
    ///
    /// Returns `true` when the attempt ended without the error flag.
    pub async fn analyze<S: SiteSource>(&mut self, source: &S) -> bool {
        let Some(ticket) = self.begin() else {
            return false;
        };
        let outcome = source.fetch_site(ticket.target()).await;
        self.complete(&ticket, outcome);
        !self.state.error
    }

    pub fn view(&self) -> AnalyzerView {
        AnalyzerView::build(&self.state, &self.options.base_url)
    }
}
