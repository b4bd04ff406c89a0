use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::warn;

use crate::config::AppConfig;
use crate::evaluation::{EvaluationError, EvaluationRequest, EvaluationResult};
use crate::session::{EvaluationSession, SessionSnapshot};
use crate::view::{json_projection, ResultView, ViewMode};

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<EvaluationSession>,
}

impl AppState {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            session: Arc::new(EvaluationSession::new(cfg.simulated_latency())),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: Arc::new(EvaluationSession::default()),
        }
    }
}

/// API routes only (no static UI, no metrics).
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/evaluate", post(evaluate))
        .route("/result", get(result))
        .route("/session", get(session))
        .route("/cancel", post(cancel))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// API routes plus the static UI fallback when `static_dir` exists.
pub fn router(state: AppState, cfg: &AppConfig) -> Router {
    let api = create_router(state);
    match &cfg.static_dir {
        Some(dir) if dir.is_dir() => api.fallback_service(ServeDir::new(dir)),
        Some(dir) => {
            warn!(static_dir = %dir.display(), "static UI directory not found; serving API only");
            api
        }
        None => api,
    }
}

#[derive(serde::Serialize)]
struct ErrorBody {
    kind: &'static str,
    title: &'static str,
    message: String,
}

impl IntoResponse for EvaluationError {
    fn into_response(self) -> Response {
        let status = if self.is_validation() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::CONFLICT
        };
        let body = ErrorBody {
            kind: self.kind(),
            title: self.title(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

async fn evaluate(
    State(state): State<AppState>,
    Json(req): Json<EvaluationRequest>,
) -> Result<Json<EvaluationResult>, EvaluationError> {
    state.session.run(req).await.map(Json)
}

#[derive(serde::Deserialize)]
struct ResultQuery {
    #[serde(default)]
    view: ViewMode,
}

async fn result(State(state): State<AppState>, Query(q): Query<ResultQuery>) -> Response {
    let Some(r) = state.session.current() else {
        return Json(Option::<ResultView>::None).into_response();
    };
    match q.view {
        ViewMode::Visual => Json(ResultView::from_result(&r)).into_response(),
        ViewMode::Json => match json_projection(&r) {
            Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
            Err(e) => {
                warn!(error = %e, "failed to render JSON projection");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
    }
}

async fn session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot())
}

#[derive(serde::Serialize)]
struct CancelOut {
    cancelled: bool,
}

async fn cancel(State(state): State<AppState>) -> Json<CancelOut> {
    Json(CancelOut {
        cancelled: state.session.cancel(),
    })
}
