use crate::config::{Config, DEMO_KEY};
use crate::models::{ActivityStep, GeneratedContent, LessonRequest};
use crate::render::format_date_id;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, info};

const MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")] Http(String),
    #[error("no text content in response")] Empty,
    #[error("schema mismatch: {0}")] Schema(String),
}

/// Seam between the form controller and the generation service. Handlers talk
/// to this trait so tests can swap in scripted generators.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: &LessonRequest) -> Result<GeneratedContent, GeminiError>;
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    school_name: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_api_base.clone(),
            school_name: config.school.name.clone(),
        }
    }

    /// Instruction prompt sent alongside the response schema. Every form
    /// field is embedded verbatim so the model grounds each section in the
    /// actual request instead of producing generic filler.
    pub fn build_prompt(request: &LessonRequest, school_name: &str) -> String {
        let themes = request.value_themes.join(", ");
        let date = request
            .date
            .map(format_date_id)
            .unwrap_or_else(|| "-".to_string());
        let teacher = if request.teacher_name.trim().is_empty() {
            "-".to_string()
        } else {
            request.teacher_name.clone()
        };

        format!(
            r#"Peran: Anda adalah pakar kurikulum di {school} yang menyusun RPP Kurikulum Merdeka dengan pendekatan khas "Kurikulum Berbasis Cinta".

Tugas: Susun konten RPP yang SANGAT SPESIFIK, KOHEREN (NYAMBUNG), dan TERINTEGRASI berdasarkan data berikut:

=== DATA UTAMA ===
1. Mata Pelajaran: {subject}
2. Fase/Kelas: {class}
3. Materi Pokok: {topic}
4. Tema Kurikulum Berbasis Cinta (KBC): [{themes}]
5. Model Pembelajaran: {model}
6. Alokasi Waktu: {time}
7. Guru Pengampu: {teacher}
8. Tanggal Pelaksanaan: {date}

=== INSTRUKSI PENYUSUNAN KONTEN PER BAGIAN ===

A. TUJUAN PEMBELAJARAN & IKTP:
   - Rumuskan tujuan yang spesifik membahas Mata Pelajaran "{subject}" pada materi "{topic}".
   - Sesuaikan kedalaman materi dan KKO (Kata Kerja Operasional) dengan Fase {class}.
   - IKTP harus menurunkan tujuan tersebut menjadi indikator yang dapat diamati.

B. KEGIATAN PEMBELAJARAN:
   - Pendahuluan: Ciptakan suasana kelas yang hangat (Greeting, Doa) sesuai kultur {school}.
   - Kegiatan Inti (SANGAT PENTING):
     1. WAJIB menggunakan langkah-langkah/sintaks resmi dari "{model}". Jangan gunakan sintaks model lain.
     2. Isi kegiatan harus KONKRET membahas mata pelajaran "{subject}" materi "{topic}" untuk peserta didik pada fase "{class}". Jangan buat kalimat umum seperti "Guru menjelaskan materi". Ganti dengan "Guru menjelaskan tentang [konsep materi pokok]...".
     3. INTEGRASI TEMA KBC: Selipkan penerapan nilai [{themes}] dalam interaksi.
        - Contoh integrasi "Cinta Ilmu": "Siswa didorong untuk bertanya dengan antusias..."
        - Contoh integrasi "Cinta Lingkungan": "Siswa menjaga kebersihan area belajar saat mengerjakan proyek..."
        - Contoh integrasi "Cinta Diri dan Sesama": "Siswa berdiskusi dengan saling menghargai pendapat..."
   - Penutup: Refleksi materi dan penguatan kembali nilai-nilai Cinta yang telah dipraktikkan. Sesuaikan ritme kegiatan dengan alokasi waktu {time}.

C. MATERI INSERSI:
   - Tuliskan 2-3 poin nilai sikap spesifik dari [{themes}] yang sangat relevan dengan materi "{topic}" untuk fase "{class}".

D. ASESMEN DAN EVALUASI:
   - Asesmen Formatif & Sumatif: Harus mengukur pemahaman siswa terhadap "{topic}".
   - Asesmen Sikap: Harus secara spesifik mengobservasi kemunculan perilaku terkait [{themes}].

Format output wajib JSON valid sesuai schema. Gunakan Bahasa Indonesia yang baku, operasional, namun bernuansa pendidikan yang ramah."#,
            school = school_name,
            subject = request.subject,
            class = request.class_phase,
            topic = request.topic,
            themes = themes,
            model = request.learning_model,
            time = request.time_allocation,
            teacher = teacher,
            date = date,
        )
    }

    /// Strict output schema for `responseSchema`; every field is required so
    /// a structurally incomplete reply fails the whole attempt.
    pub fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "insertedMaterials": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "2-3 specific insertion-material points combining the topic and the selected value themes."
                },
                "objectives": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "2-3 specific learning objectives, strictly appropriate for the selected phase/class and topic."
                },
                "indicators": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Indicators for achieving the objectives (IKTP), using operational verbs appropriate for the phase."
                },
                "learningModelEcho": {
                    "type": "STRING",
                    "description": "The learning model used (matches the user selection)."
                },
                "opening": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Activities in the introduction phase, setting a warm atmosphere."
                },
                "coreActivitySteps": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "stageName": {
                                "type": "STRING",
                                "description": "Nama tahapan/sintaks RESMI sesuai Model Pembelajaran yang dipilih."
                            },
                            "activityDescription": {
                                "type": "STRING",
                                "description": "Deskripsi aktivitas mendetail yang menggabungkan Topik, Sintaks Model, dan Penerapan Nilai Cinta (Tema KBC)."
                            }
                        },
                        "required": ["stageName", "activityDescription"]
                    },
                    "description": "Langkah-langkah kegiatan inti yang MENGIKUTI SINTAKS RESMI Model Pembelajaran yang dipilih."
                },
                "closing": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Activities in the closing phase, including reflection on values."
                },
                "formativeAssessment": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Specific formative assessment methods for this topic."
                },
                "summativeAssessment": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Specific summative assessment methods for this topic."
                },
                "attitudeAssessment": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Attitude assessments specifically observing the selected value themes."
                }
            },
            "required": [
                "insertedMaterials", "objectives", "indicators", "learningModelEcho",
                "opening", "coreActivitySteps", "closing",
                "formativeAssessment", "summativeAssessment", "attitudeAssessment"
            ]
        })
    }

    async fn perform_api_call(&self, prompt: &str) -> Result<GeneratedContent, GeminiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, MODEL, self.api_key
        );

        info!("🔗 Making request to: {}", url.replace(&self.api_key, "***"));

        let request_body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": Self::response_schema(),
                "temperature": 0.7
            }
        });

        info!("📤 Prompt length: {} chars", prompt.len());

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| GeminiError::Http(e.to_string()))?;

        let status = response.status();
        info!("📥 Response status: {}", status);

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!("❌ API error response: {}", error_body);
            return Err(GeminiError::Http(format!(
                "status={} body={}",
                status, error_body
            )));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| GeminiError::Http(e.to_string()))?;

        parse_response(&response_text)
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(&self, request: &LessonRequest) -> Result<GeneratedContent, GeminiError> {
        if self.api_key == DEMO_KEY {
            info!("📦 Demo mode - returning locally built lesson content");
            return Ok(demo_content(request));
        }

        let prompt = Self::build_prompt(request, &self.school_name);
        let result = self.perform_api_call(&prompt).await;
        match &result {
            Ok(content) => {
                info!(
                    "✅ Lesson content generated: {} objectives, {} core steps",
                    content.objectives.len(),
                    content.core_activity_steps.len()
                );
            }
            Err(e) => {
                error!("❌ Lesson content generation failed: {}", e);
            }
        }
        result
    }
}

/// Deterministic stand-in content for runs without a real API key.
fn demo_content(request: &LessonRequest) -> GeneratedContent {
    let themes = request.value_themes.join(", ");
    let topic = &request.topic;
    GeneratedContent {
        inserted_materials: vec![
            format!("Penerapan nilai {themes} dalam materi {topic}"),
            format!("Pembiasaan sikap terpuji saat mempelajari {topic}"),
        ],
        objectives: vec![
            format!(
                "Peserta didik mampu menjelaskan {topic} pada mata pelajaran {}",
                request.subject
            ),
            format!("Peserta didik mampu menerapkan {topic} dalam kehidupan sehari-hari"),
        ],
        indicators: vec![
            format!("Menjelaskan kembali {topic} dengan bahasa sendiri"),
            format!("Menyelesaikan tugas tentang {topic} secara mandiri"),
        ],
        learning_model_echo: request.learning_model.clone(),
        opening: vec![
            "Guru membuka pembelajaran dengan salam dan doa bersama".to_string(),
            "Guru memeriksa kehadiran dan menyiapkan suasana kelas yang hangat".to_string(),
            format!("Guru menyampaikan tujuan pembelajaran tentang {topic}"),
        ],
        core_activity_steps: vec![
            ActivityStep {
                stage_name: "Orientasi".to_string(),
                activity_description: format!(
                    "Peserta didik mengamati permasalahan sederhana tentang {topic}"
                ),
            },
            ActivityStep {
                stage_name: "Eksplorasi".to_string(),
                activity_description: format!(
                    "Peserta didik menggali informasi tentang {topic} dengan bimbingan guru"
                ),
            },
            ActivityStep {
                stage_name: "Presentasi".to_string(),
                activity_description: format!(
                    "Peserta didik menyampaikan hasil kerjanya dengan menerapkan nilai {themes}"
                ),
            },
        ],
        closing: vec![
            format!("Guru dan peserta didik menyimpulkan pembelajaran tentang {topic}"),
            "Refleksi nilai-nilai yang telah dipraktikkan dan doa penutup".to_string(),
        ],
        formative_assessment: vec![format!(
            "Tanya jawab lisan tentang {topic} selama pembelajaran"
        )],
        summative_assessment: vec![format!("Tes tertulis singkat tentang {topic}")],
        attitude_assessment: vec![format!(
            "Observasi kemunculan perilaku {themes} selama pembelajaran"
        )],
    }
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Other(Value),
}

fn first_text(resp: &GeminiResponse) -> Option<&str> {
    for candidate in &resp.candidates {
        for part in &candidate.content.parts {
            if let Part::Text { text } = part {
                return Some(text.as_str());
            }
        }
    }
    None
}

/// Pulls the first text part out of the response envelope and parses it
/// against the lesson content shape.
fn parse_response(body: &str) -> Result<GeneratedContent, GeminiError> {
    let envelope: GeminiResponse =
        serde_json::from_str(body).map_err(|e| GeminiError::Schema(format!("envelope: {e}")))?;

    let text = first_text(&envelope).ok_or(GeminiError::Empty)?;

    serde_json::from_str(text).map_err(|e| GeminiError::Schema(e.to_string()))
}
