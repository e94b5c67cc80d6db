use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use include_dir::{include_dir, Dir};
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use uuid::Uuid;

use crate::{
    catalog::Catalog,
    config::SchoolProfile,
    docx::{render_docx, DOCX_MIME},
    error::{AppError, GENERATION_ERROR_MESSAGE},
    gemini::ContentGenerator,
    models::{FormPatch, Phase, PlanSession, SessionView},
    render::{export_file_name, render_preview, DocumentModel},
};

static ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<Uuid, PlanSession>>>,
    pub generator: Arc<dyn ContentGenerator>,
    pub school: SchoolProfile,
}

impl AppState {
    pub fn new(generator: Arc<dyn ContentGenerator>, school: SchoolProfile) -> Self {
        AppState {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            generator,
            school,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/catalog", get(get_catalog))
        .route("/api/plan", post(create_plan))
        .route("/api/plan/:id", get(get_plan).put(update_plan))
        .route("/api/plan/:id/generate", post(generate_plan))
        .route("/api/plan/:id/preview", get(preview_plan))
        .route("/api/plan/:id/export", get(export_plan))
        .route("/api/plan/:id/reset", post(reset_plan))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn index() -> impl IntoResponse {
    match ASSETS.get_file("index.html") {
        Some(file) => Html(file.contents_utf8().unwrap_or_default()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn get_catalog() -> Json<Catalog> {
    Json(Catalog::current())
}

pub async fn create_plan(
    State(state): State<AppState>,
    body: Option<Json<FormPatch>>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = PlanSession::new();
    if let Some(Json(patch)) = body {
        session.apply_update(patch)?;
    }

    info!("🚀 Created plan session {}", session.id);
    let view = session.view();
    state.sessions.write().insert(session.id, session);
    Ok(Json(view))
}

pub async fn get_plan(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<SessionView>, AppError> {
    let guard = state.sessions.read();
    let session = guard.get(&id).ok_or(AppError::SessionNotFound)?;
    Ok(Json(session.view()))
}

pub async fn update_plan(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(patch): Json<FormPatch>,
) -> Result<Json<SessionView>, AppError> {
    let mut guard = state.sessions.write();
    let session = guard.get_mut(&id).ok_or(AppError::SessionNotFound)?;
    session.apply_update(patch)?;
    Ok(Json(session.view()))
}

/// Submit: snapshot under the lock, call the generator outside it, re-lock to
/// apply the outcome. The Generating phase keeps the form frozen meanwhile.
#[axum::debug_handler]
pub async fn generate_plan(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<SessionView>, AppError> {
    let snapshot = {
        let mut guard = state.sessions.write();
        let session = guard.get_mut(&id).ok_or(AppError::SessionNotFound)?;
        session.begin_generation()?
    };

    info!(
        "🚀 Generating lesson plan {} for {} / {}",
        id, snapshot.subject, snapshot.class_phase
    );

    let outcome = state.generator.generate(&snapshot).await;

    let mut guard = state.sessions.write();
    let session = guard.get_mut(&id).ok_or(AppError::SessionNotFound)?;
    match outcome {
        Ok(content) => {
            info!(
                "✅ Lesson plan {} generated with {} core steps",
                id,
                content.core_activity_steps.len()
            );
            session.complete_generation(Ok(content));
            Ok(Json(session.view()))
        }
        Err(e) => {
            session.complete_generation(Err(GENERATION_ERROR_MESSAGE.to_string()));
            Err(AppError::Generation(e))
        }
    }
}

pub async fn preview_plan(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<DocumentModel>, AppError> {
    let guard = state.sessions.read();
    let session = guard.get(&id).ok_or(AppError::SessionNotFound)?;
    match (session.phase, &session.content) {
        (Phase::Reviewing, Some(content)) => Ok(Json(render_preview(
            &session.form,
            content,
            &state.school,
        ))),
        _ => Err(AppError::WrongPhase(session.phase)),
    }
}

/// Download: renders the package from the reviewed session without touching
/// its state, so a failed export can simply be retried.
pub async fn export_plan(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<(StatusCode, HeaderMap, Vec<u8>), AppError> {
    let (form, content) = {
        let guard = state.sessions.read();
        let session = guard.get(&id).ok_or(AppError::SessionNotFound)?;
        match (session.phase, &session.content) {
            (Phase::Reviewing, Some(content)) => (session.form.clone(), content.clone()),
            _ => return Err(AppError::WrongPhase(session.phase)),
        }
    };

    let bytes = render_docx(&form, &content, &state.school)?;
    let file_name = export_file_name(&form);
    info!("📄 Exporting {} ({} bytes)", file_name, bytes.len());

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(DOCX_MIME));
    let disposition = format!("attachment; filename=\"{file_name}\"");
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"RPP.docx\"")),
    );
    Ok((StatusCode::OK, headers, bytes))
}

pub async fn reset_plan(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<SessionView>, AppError> {
    let mut guard = state.sessions.write();
    let session = guard.get_mut(&id).ok_or(AppError::SessionNotFound)?;
    session.reset()?;
    info!("🔄 Plan session {} back to editing", id);
    Ok(Json(session.view()))
}
