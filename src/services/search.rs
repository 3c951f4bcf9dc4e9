//! Search controller: turns selection changes into race-checked result sets.
//!
//! Every trigger mints a new [`SearchRequestToken`]. Responses are only
//! applied while their token is still the latest one, so the committed results
//! always belong to the most recently triggered search no matter in which
//! order responses arrive. Stale requests are not cancelled; their results are
//! dropped on arrival.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::clients::{BackendError, RecipeBackend};
use crate::domain::{QueryParams, SearchInput, SearchRequestToken};
use crate::models::Recipe;
use crate::services::facets::FacetUniverse;
use crate::services::normalize::normalize_response;
use crate::services::query::{build_query, is_unfiltered};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching,
    Settled,
}

/// What the presentation layer observes.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub phase: SearchPhase,

    /// Most recently minted token.
    pub latest: SearchRequestToken,

    /// Token whose outcome is currently committed, if any.
    pub committed: Option<SearchRequestToken>,

    pub results: Arc<Vec<Recipe>>,

    /// Set when the committed search failed in transport or with a
    /// non-success status.
    pub failed: bool,

    pub universe: FacetUniverse,
}

impl SearchState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Searching
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Committed {
        token: SearchRequestToken,
        count: usize,
    },
    Failed {
        token: SearchRequestToken,
        error: String,
    },
    Superseded {
        token: SearchRequestToken,
        latest: SearchRequestToken,
    },
}

impl SearchOutcome {
    #[must_use]
    pub const fn token(&self) -> SearchRequestToken {
        match self {
            Self::Committed { token, .. }
            | Self::Failed { token, .. }
            | Self::Superseded { token, .. } => *token,
        }
    }

    #[must_use]
    pub const fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }
}

pub struct SearchController {
    backend: Arc<dyn RecipeBackend>,
    state: watch::Sender<SearchState>,
}

impl SearchController {
    #[must_use]
    pub fn new(backend: Arc<dyn RecipeBackend>) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self { backend, state }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Mints a new token and enters `Searching`.
    pub fn begin(&self) -> SearchRequestToken {
        let mut minted = SearchRequestToken::default();
        self.state.send_modify(|state| {
            state.latest = state.latest.next();
            state.phase = SearchPhase::Searching;
            minted = state.latest;
        });
        minted
    }

    /// Applies a response for `token` if no newer search has been triggered.
    ///
    /// `params` are the parameters the request was sent with; a successful
    /// search that sent no filter seeds the cuisine/course universe the first
    /// time.
    pub fn apply(
        &self,
        token: SearchRequestToken,
        params: &QueryParams,
        response: Result<serde_json::Value, BackendError>,
    ) -> SearchOutcome {
        let result = response.map(|body| normalize_response(&body));
        let unfiltered = is_unfiltered(params);

        let mut outcome = SearchOutcome::Superseded {
            token,
            latest: token,
        };

        self.state.send_if_modified(|state| {
            if state.latest != token {
                outcome = SearchOutcome::Superseded {
                    token,
                    latest: state.latest,
                };
                return false;
            }

            match result {
                Ok(recipes) => {
                    if unfiltered && !state.universe.is_captured() {
                        state.universe = FacetUniverse::capture(&recipes);
                    }
                    outcome = SearchOutcome::Committed {
                        token,
                        count: recipes.len(),
                    };
                    state.results = Arc::new(recipes);
                    state.failed = false;
                    state.phase = SearchPhase::Settled;
                }
                Err(e) => {
                    outcome = SearchOutcome::Failed {
                        token,
                        error: e.to_string(),
                    };
                    state.results = Arc::new(Vec::new());
                    state.failed = true;
                    state.phase = SearchPhase::Idle;
                }
            }
            state.committed = Some(token);
            true
        });

        record_outcome(&outcome);
        outcome
    }

    /// Triggers a search and awaits it on the current task.
    pub async fn execute(&self, input: SearchInput) -> SearchOutcome {
        let token = self.begin();
        self.run_search(token, input).await
    }

    /// Triggers a search on a spawned task.
    ///
    /// The token is minted before this returns, so tokens follow trigger
    /// order even if the spawned tasks run out of order.
    pub fn trigger(self: &Arc<Self>, input: SearchInput) -> JoinHandle<SearchOutcome> {
        let token = self.begin();
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.run_search(token, input).await })
    }

    /// Re-searches on every selection change published by the store.
    pub fn start_listener(
        self: Arc<Self>,
        mut events: broadcast::Receiver<SearchInput>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(input) => {
                        drop(self.trigger(input));
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        warn!(count, "Search listener lagged behind selection changes");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Selection store closed, search listener stopping");
                        break;
                    }
                }
            }
        })
    }

    /// Resolves once the latest search has committed or failed.
    pub async fn wait_settled(&self) -> SearchState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    async fn run_search(&self, token: SearchRequestToken, input: SearchInput) -> SearchOutcome {
        let params = build_query(&input.selection, &input.catalog);

        info!(event = "search_issued", token = %token, params = %params, "Search issued");
        metrics::counter!("recetario_search_requests_total", "outcome" => "issued").increment(1);

        let start = Instant::now();
        let response = self.backend.search_recipes(&params).await;
        metrics::histogram!("recetario_search_duration_seconds")
            .record(start.elapsed().as_secs_f64());

        self.apply(token, &params, response)
    }
}

fn record_outcome(outcome: &SearchOutcome) {
    match outcome {
        SearchOutcome::Committed { token, count } => {
            info!(event = "search_committed", token = %token, count, "Search results committed");
            metrics::counter!("recetario_search_requests_total", "outcome" => "committed")
                .increment(1);
        }
        SearchOutcome::Failed { token, error } => {
            warn!(event = "search_failed", token = %token, error = %error, "Search failed");
            metrics::counter!("recetario_search_requests_total", "outcome" => "failed")
                .increment(1);
        }
        SearchOutcome::Superseded { token, latest } => {
            debug!(
                event = "search_superseded",
                token = %token,
                latest = %latest,
                "Discarding stale search response"
            );
            metrics::counter!("recetario_search_requests_total", "outcome" => "superseded")
                .increment(1);
        }
    }
}
