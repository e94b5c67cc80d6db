use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::docx::DocxError;
use crate::gemini::GeminiError;
use crate::models::{Phase, StateError};

/// User-facing messages stay generic; the cause goes to the log only.
pub const GENERATION_ERROR_MESSAGE: &str =
    "Gagal membuat RPP. Silakan coba lagi atau periksa koneksi internet Anda.";
pub const EXPORT_ERROR_MESSAGE: &str = "Gagal membuat file DOCX.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("session not found")] SessionNotFound,
    #[error("missing required fields: {}", .0.join(", "))] ValidationBlock(Vec<&'static str>),
    #[error("generation already running")] GenerationInFlight,
    #[error("operation not allowed in {0:?} phase")] WrongPhase(Phase),
    #[error(transparent)] Generation(#[from] GeminiError),
    #[error(transparent)] Export(#[from] DocxError),
}

impl From<StateError> for AppError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::GenerationInFlight => AppError::GenerationInFlight,
            StateError::WrongPhase(phase) => AppError::WrongPhase(phase),
            StateError::MissingFields(fields) => AppError::ValidationBlock(fields),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::SessionNotFound => StatusCode::NOT_FOUND,
            AppError::ValidationBlock(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::GenerationInFlight | AppError::WrongPhase(_) => StatusCode::CONFLICT,
            AppError::Generation(_) => StatusCode::BAD_GATEWAY,
            AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::SessionNotFound => "SESSION_NOT_FOUND",
            AppError::ValidationBlock(_) => "VALIDATION",
            AppError::GenerationInFlight => "GENERATION_IN_FLIGHT",
            AppError::WrongPhase(_) => "WRONG_PHASE",
            AppError::Generation(_) => "GENERATION_FAILED",
            AppError::Export(_) => "EXPORT_FAILED",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            AppError::SessionNotFound => "Sesi tidak ditemukan.".to_string(),
            AppError::ValidationBlock(fields) => {
                format!("Harap lengkapi kolom berikut: {}", fields.join(", "))
            }
            AppError::GenerationInFlight => "Pembuatan RPP sedang berjalan.".to_string(),
            AppError::WrongPhase(_) => "Aksi tidak tersedia pada tahap ini.".to_string(),
            AppError::Generation(_) => GENERATION_ERROR_MESSAGE.to_string(),
            AppError::Export(_) => EXPORT_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Generation(e) => error!("❌ Generation failed: {}", e),
            AppError::Export(e) => error!("❌ Docx export failed: {}", e),
            _ => {}
        }

        let mut body = json!({
            "error": {
                "code": self.code(),
                "message": self.user_message(),
            }
        });
        if let AppError::ValidationBlock(fields) = &self {
            body["error"]["missing"] = json!(fields);
        }

        (self.status(), Json(body)).into_response()
    }
}
