#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use rpp_generator::config::SchoolProfile;
use rpp_generator::gemini::{ContentGenerator, GeminiError};
use rpp_generator::models::{ActivityStep, FormPatch, GeneratedContent, LessonRequest};
use rpp_generator::routes::AppState;

pub fn school() -> SchoolProfile {
    SchoolProfile {
        name: "MIS Al Muslimun".to_string(),
        city: "Kotabaru".to_string(),
        headmaster: "AHMAD HUSSAINI, S.Pd.I".to_string(),
    }
}

pub fn state_with(generator: Arc<dyn ContentGenerator>) -> AppState {
    AppState::new(generator, school())
}

pub fn filled_patch() -> FormPatch {
    FormPatch {
        subject: Some("Matematika".to_string()),
        class_phase: Some("Fase A / Kelas 1".to_string()),
        topic: Some("Penjumlahan".to_string()),
        value_themes: Some(vec!["Cinta Ilmu".to_string()]),
        ..FormPatch::default()
    }
}

pub fn sample_content() -> GeneratedContent {
    GeneratedContent {
        inserted_materials: vec!["Teliti saat berhitung".to_string()],
        objectives: vec![
            "Peserta didik mampu menjumlahkan bilangan sampai 10".to_string(),
            "Peserta didik mampu menyelesaikan soal cerita sederhana".to_string(),
        ],
        indicators: vec!["Menyelesaikan lima soal penjumlahan dengan benar".to_string()],
        learning_model_echo: "Problem Based Learning (PBL)".to_string(),
        opening: vec![
            "Guru membuka dengan salam dan doa".to_string(),
            "Guru menyapa peserta didik dengan hangat".to_string(),
        ],
        core_activity_steps: vec![
            ActivityStep {
                stage_name: "Orientasi Masalah".to_string(),
                activity_description: "Peserta didik mengamati kumpulan buah di meja guru".to_string(),
            },
            ActivityStep {
                stage_name: "Mengorganisasi Peserta Didik".to_string(),
                activity_description: "Peserta didik membentuk kelompok kecil".to_string(),
            },
            ActivityStep {
                stage_name: "Membimbing Penyelidikan".to_string(),
                activity_description: "Peserta didik menghitung benda konkret berpasangan".to_string(),
            },
        ],
        closing: vec!["Refleksi dan doa penutup".to_string()],
        formative_assessment: vec!["Tanya jawab lisan selama diskusi".to_string()],
        summative_assessment: vec!["Tes tertulis lima soal".to_string()],
        attitude_assessment: vec!["Observasi antusiasme bertanya".to_string()],
    }
}

/// Succeeds with fixed content and records every request it receives.
pub struct RecordingGenerator {
    pub requests: Mutex<Vec<LessonRequest>>,
}

impl RecordingGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { requests: Mutex::new(Vec::new()) })
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl ContentGenerator for RecordingGenerator {
    async fn generate(&self, request: &LessonRequest) -> Result<GeneratedContent, GeminiError> {
        self.requests.lock().push(request.clone());
        Ok(sample_content())
    }
}

/// Always fails, as a dead upstream would.
pub struct FailingGenerator;

#[async_trait]
impl ContentGenerator for FailingGenerator {
    async fn generate(&self, _request: &LessonRequest) -> Result<GeneratedContent, GeminiError> {
        Err(GeminiError::Http("status=500 body=upstream down".to_string()))
    }
}

/// Parks until released, to hold a session in the Generating phase.
pub struct PendingGenerator {
    pub started: Notify,
    pub release: Notify,
}

impl PendingGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { started: Notify::new(), release: Notify::new() })
    }
}

#[async_trait]
impl ContentGenerator for PendingGenerator {
    async fn generate(&self, _request: &LessonRequest) -> Result<GeneratedContent, GeminiError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(sample_content())
    }
}
