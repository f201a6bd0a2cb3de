//! Axum router and handlers for the data proxy.
//!
//! Routes:
//! - `GET /api/data?type={org|repos}`   - Normalized organization or repository data
//! - `GET /api/github?type={org|repos}` - Alias kept for older page builds
//! - `GET /healthz`                     - Health check
//! - anything else                      - Static assets (page shell, manifest, icons)
//!
//! Each request runs `Start -> Fetching -> {Success, UpstreamFailure} -> Responding`.
//! Upstream failures are answered according to the deployment's [`FailureMode`].

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use crate::config::{Config, FailureMode};
use crate::data::{Organization, RepositoryList, normalize_org, normalize_repos};
use crate::error::{MirrorError, Result};
use crate::github::{RepoQuery, Upstream};

use super::assets::{Assets, handle_asset};
use super::fallback::{fallback_org, fallback_repos};

/// Freshness window advertised for organization responses.
pub const ORG_MAX_AGE_SECS: u64 = 60 * 60;
/// Freshness window advertised for repository responses.
pub const REPOS_MAX_AGE_SECS: u64 = 30 * 60;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Shared state for the proxy handlers.
pub struct ProxyState {
    pub upstream: Arc<dyn Upstream>,
    pub org: String,
    pub failure_mode: FailureMode,
    pub avatar_override: Option<String>,
    pub repo_query: RepoQuery,
    pub assets: Assets,
}

impl ProxyState {
    pub fn new(upstream: Arc<dyn Upstream>, config: &Config) -> Self {
        Self {
            upstream,
            org: config.org.clone(),
            failure_mode: config.failure_mode,
            avatar_override: config.avatar_override.clone(),
            repo_query: RepoQuery::default(),
            assets: Assets::new(config.static_dir.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the axum [`Router`] with the proxy routes.
pub fn create_router(state: Arc<ProxyState>) -> Router {
    Router::new()
        .route("/api/data", get(handle_data))
        .route("/api/github", get(handle_data))
        .route("/healthz", get(handle_health))
        .fallback(handle_asset)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct DataQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Which view the page asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Org,
    Repos,
}

impl FromStr for DataKind {
    type Err = MirrorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "org" => Ok(DataKind::Org),
            "repos" => Ok(DataKind::Repos),
            _ => Err(MirrorError::InvalidRequest(
                "Invalid type parameter".to_string(),
            )),
        }
    }
}

impl DataKind {
    fn max_age(self) -> u64 {
        match self {
            DataKind::Org => ORG_MAX_AGE_SECS,
            DataKind::Repos => REPOS_MAX_AGE_SECS,
        }
    }
}

/// Successful body of a data request.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Payload {
    Org(Organization),
    Repos(RepositoryList),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /api/data?type=org|repos`
#[instrument(skip_all, fields(kind = ?query.kind))]
pub async fn handle_data(
    State(state): State<Arc<ProxyState>>,
    Query(query): Query<DataQuery>,
) -> Response {
    let kind = match query.kind.as_deref().unwrap_or_default().parse::<DataKind>() {
        Ok(kind) => kind,
        Err(e) => {
            debug!("rejecting data request without a valid type");
            return e.into_response();
        }
    };

    let outcome = fetch(Arc::clone(&state), kind).await;
    respond(&state, kind, outcome)
}

/// `GET /healthz`
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// Fetching / Responding
// ---------------------------------------------------------------------------

/// Fetch and normalize on a separate task so a panic is reported as an
/// upstream failure rather than tearing down the connection.
async fn fetch(state: Arc<ProxyState>, kind: DataKind) -> Result<Payload> {
    let task = tokio::spawn(async move {
        match kind {
            DataKind::Org => {
                let raw = state.upstream.fetch_organization(&state.org).await?;
                let mut org = normalize_org(raw);
                if let Some(avatar) = &state.avatar_override {
                    org.avatar_url = avatar.clone();
                }
                Ok(Payload::Org(org))
            }
            DataKind::Repos => {
                let raw = state
                    .upstream
                    .fetch_repositories(&state.org, &state.repo_query)
                    .await?;
                Ok(Payload::Repos(normalize_repos(raw)))
            }
        }
    });

    task.await
        .map_err(|e| MirrorError::Other(format!("data task failed: {}", e)))?
}

fn respond(state: &ProxyState, kind: DataKind, outcome: Result<Payload>) -> Response {
    match outcome {
        Ok(payload) => with_cache_control(
            Json(payload).into_response(),
            &format!("public, max-age={}", kind.max_age()),
        ),
        Err(e) => match state.failure_mode {
            FailureMode::Fallback => {
                warn!(error = %e, status = ?e.upstream_status(), ?kind, "upstream failed, serving fallback payload");
                let payload = match kind {
                    DataKind::Org => {
                        Payload::Org(fallback_org(&state.org, state.avatar_override.as_deref()))
                    }
                    DataKind::Repos => Payload::Repos(fallback_repos()),
                };
                with_cache_control(Json(payload).into_response(), "no-store")
            }
            FailureMode::Strict => {
                error!(error = %e, status = ?e.upstream_status(), ?kind, "upstream failed");
                e.into_response()
            }
        },
    }
}

fn with_cache_control(mut response: Response, value: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(value) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    response
}

// ---------------------------------------------------------------------------
// Error -> response mapping
// ---------------------------------------------------------------------------

impl IntoResponse for MirrorError {
    fn into_response(self) -> Response {
        let status = match &self {
            MirrorError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match self {
            MirrorError::InvalidRequest(msg) => msg,
            other => other.to_string(),
        };
        let response = (status, Json(ErrorBody { error: message })).into_response();
        with_cache_control(response, "no-store")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
