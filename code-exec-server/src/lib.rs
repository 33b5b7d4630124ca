mod workspace;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use code_exec::{
    ExecConfig, ExecutionResult, Language, PreviewState, Registry, Session, SessionHandle,
    ToolchainStatus,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

pub use workspace::{SharedWorkspace, Workspace};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid language: {0}")]
    InvalidLanguage(String),
    #[error("Execution error: {0}")]
    ExecutionError(#[from] code_exec::Error),
    #[error("Server error: {0}")]
    ServerError(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServerError::InvalidLanguage(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::ExecutionError(code_exec::Error::SessionClosed) => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            ServerError::ExecutionError(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::ServerError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BufferUpdate {
    pub code: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BufferResponse {
    pub language: Language,
    pub code: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ActiveRequest {
    pub language: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ActiveResponse {
    pub language: Language,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OutputResponse {
    pub output: Option<ExecutionResult>,
    pub preview: PreviewState,
}

#[derive(Clone)]
pub struct AppState {
    workspace: SharedWorkspace,
    session: SessionHandle,
    registry: Arc<Registry>,
}

/// Build the router and spawn the session it feeds. The session stops once
/// the router and every clone of its state are dropped.
pub async fn create_app(config: ExecConfig) -> Result<Router, ServerError> {
    let workspace = SharedWorkspace::default();
    let (session, handle) = Session::new(&config, workspace.clone(), workspace.clone()).await?;
    session.spawn();

    let state = AppState {
        workspace,
        session: handle,
        registry: Arc::new(Registry::new(&config)),
    };

    let cors = CorsLayer::permissive();

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/languages", get(languages))
        .route("/buffers/:language", get(get_buffer).put(put_buffer))
        .route("/active", put(set_active))
        .route("/clear", post(clear))
        .route("/output", get(output))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    Ok(app)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), ServerError> {
    info!("Starting editor bridge on {}", addr);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::ServerError(e.to_string()))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::ServerError(e.to_string()))?;

    Ok(())
}

fn parse_language(raw: &str) -> Result<Language, ServerError> {
    raw.parse()
        .map_err(|_| ServerError::InvalidLanguage(raw.to_string()))
}

async fn health_check() -> &'static str {
    "OK"
}

async fn languages(State(state): State<AppState>) -> Json<Vec<ToolchainStatus>> {
    Json(state.registry.availability())
}

async fn get_buffer(
    State(state): State<AppState>,
    Path(language): Path<String>,
) -> Result<Json<BufferResponse>, ServerError> {
    let language = parse_language(&language)?;
    Ok(Json(BufferResponse {
        language,
        code: state.workspace.buffer(language),
    }))
}

async fn put_buffer(
    State(state): State<AppState>,
    Path(language): Path<String>,
    Json(payload): Json<BufferUpdate>,
) -> Result<Json<BufferResponse>, ServerError> {
    let language = parse_language(&language)?;
    debug!("{} buffer updated ({} bytes)", language, payload.code.len());

    state.workspace.set_buffer(language, payload.code.clone());
    state.session.notify_changed(language)?;

    Ok(Json(BufferResponse {
        language,
        code: payload.code,
    }))
}

async fn set_active(
    State(state): State<AppState>,
    Json(payload): Json<ActiveRequest>,
) -> Result<Json<ActiveResponse>, ServerError> {
    let language = parse_language(&payload.language)?;
    state.workspace.set_active(language);
    Ok(Json(ActiveResponse { language }))
}

async fn clear(State(state): State<AppState>) -> Result<StatusCode, ServerError> {
    state.session.clear()?;
    Ok(StatusCode::ACCEPTED)
}

async fn output(State(state): State<AppState>) -> Json<OutputResponse> {
    let snapshot = state.workspace.snapshot();
    Json(OutputResponse {
        output: snapshot.output,
        preview: snapshot.preview,
    })
}
