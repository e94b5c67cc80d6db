use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::config::SchoolProfile;
use crate::models::{ActivityStep, GeneratedContent, LessonRequest};

pub const DOC_TITLE: &str = "Rencana Pelaksanaan Pembelajaran (RPP)";

/// Signature fallbacks when the form leaves date or teacher empty.
pub const DATE_PLACEHOLDER: &str = "......................";
pub const TEACHER_PLACEHOLDER: &str = "................................";

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Indonesian long date, no leading zero: `17 Agustus 2025`.
pub fn format_date_id(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS_ID[date.month0() as usize],
        date.year()
    )
}

fn collapse_runs(input: &str, is_sep: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_sep = false;
    for c in input.chars() {
        if is_sep(c) {
            if !prev_sep {
                out.push('_');
            }
            prev_sep = true;
        } else {
            out.push(c);
            prev_sep = false;
        }
    }
    out
}

/// Download name for the exported document. Whitespace runs in the subject,
/// and whitespace or `/` runs in the class phase, collapse to one underscore.
pub fn export_file_name(request: &LessonRequest) -> String {
    let subject = collapse_runs(&request.subject, char::is_whitespace);
    let class = collapse_runs(&request.class_phase, |c| c.is_whitespace() || c == '/');
    format!("RPP_{subject}_{class}.docx")
}

/// Layout-neutral document structure shared by the on-screen preview and the
/// exported file. Every ordering decision lives here; the two targets only
/// decide typography.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModel {
    pub title_lines: Vec<String>,
    pub meta_rows: Vec<MetaRow>,
    pub sections: Vec<Section>,
    pub signature: SignatureBlock,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetaRow {
    pub label: String,
    pub value: MetaValue,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MetaValue {
    Text { text: String, bold: bool },
    DashedList { items: Vec<String> },
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub title: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Block {
    Bullets { items: Vec<String> },
    ModelLine { value: String },
    DashedSubsection { title: String, items: Vec<String> },
    StepSubsection { title: String, steps: Vec<ActivityStep> },
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignatureBlock {
    pub left: SignatureColumn,
    pub right: SignatureColumn,
}

/// Lines above the gap, then the signer name (rendered bold and underlined).
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignatureColumn {
    pub lines: Vec<String>,
    pub signer: String,
}

/// Builds the one structure both render targets consume. Deterministic for a
/// given request/content/profile triple.
pub fn compose(
    request: &LessonRequest,
    content: &GeneratedContent,
    school: &SchoolProfile,
) -> DocumentModel {
    let themes = if request.value_themes.is_empty() {
        "-".to_string()
    } else {
        request.value_themes.join(", ")
    };

    let formatted_date = request
        .date
        .map(format_date_id)
        .unwrap_or_else(|| DATE_PLACEHOLDER.to_string());

    let teacher = if request.teacher_name.trim().is_empty() {
        TEACHER_PLACEHOLDER.to_string()
    } else {
        request.teacher_name.clone()
    };

    DocumentModel {
        title_lines: vec![DOC_TITLE.to_string(), school.name.clone()],
        meta_rows: vec![
            MetaRow {
                label: "Mata Pelajaran".to_string(),
                value: MetaValue::Text {
                    text: request.subject.clone(),
                    bold: true,
                },
            },
            MetaRow {
                label: "Fase/Kelas".to_string(),
                value: MetaValue::Text {
                    text: request.class_phase.clone(),
                    bold: false,
                },
            },
            MetaRow {
                label: "Materi Pokok".to_string(),
                value: MetaValue::Text {
                    text: request.topic.clone(),
                    bold: false,
                },
            },
            MetaRow {
                label: "Tema Kurikulum Berbasis Cinta".to_string(),
                value: MetaValue::Text {
                    text: themes,
                    bold: false,
                },
            },
            MetaRow {
                label: "Materi Insersi".to_string(),
                value: MetaValue::DashedList {
                    items: content.inserted_materials.clone(),
                },
            },
            MetaRow {
                label: "Alokasi Waktu".to_string(),
                value: MetaValue::Text {
                    text: request.time_allocation.clone(),
                    bold: false,
                },
            },
        ],
        sections: vec![
            Section {
                title: "A. Tujuan Pembelajaran".to_string(),
                blocks: vec![Block::Bullets {
                    items: content.objectives.clone(),
                }],
            },
            Section {
                title: "B. Indikator Ketercapaian Tujuan Pembelajaran (IKTP)".to_string(),
                blocks: vec![Block::Bullets {
                    items: content.indicators.clone(),
                }],
            },
            Section {
                title: "C. Kegiatan Pembelajaran".to_string(),
                blocks: vec![
                    Block::ModelLine {
                        value: content.learning_model_echo.clone(),
                    },
                    Block::DashedSubsection {
                        title: "1. Pendahuluan".to_string(),
                        items: content.opening.clone(),
                    },
                    Block::StepSubsection {
                        title: "2. Kegiatan Inti".to_string(),
                        steps: content.core_activity_steps.clone(),
                    },
                    Block::DashedSubsection {
                        title: "3. Penutup".to_string(),
                        items: content.closing.clone(),
                    },
                ],
            },
            Section {
                title: "D. Asesmen dan Evaluasi".to_string(),
                blocks: vec![
                    Block::DashedSubsection {
                        title: "1. Asesmen Formatif".to_string(),
                        items: content.formative_assessment.clone(),
                    },
                    Block::DashedSubsection {
                        title: "2. Asesmen Sumatif".to_string(),
                        items: content.summative_assessment.clone(),
                    },
                    Block::DashedSubsection {
                        title: "3. Asesmen Sikap".to_string(),
                        items: content.attitude_assessment.clone(),
                    },
                ],
            },
        ],
        signature: SignatureBlock {
            left: SignatureColumn {
                lines: vec!["Mengetahui,".to_string(), "Kepala Madrasah".to_string()],
                signer: school.headmaster.clone(),
            },
            right: SignatureColumn {
                lines: vec![
                    format!("{}, {}", school.city, formatted_date),
                    "Guru Mata Pelajaran".to_string(),
                ],
                signer: teacher,
            },
        },
    }
}

/// Preview target: the composed model itself, serialized for the form page.
pub fn render_preview(
    request: &LessonRequest,
    content: &GeneratedContent,
    school: &SchoolProfile,
) -> DocumentModel {
    compose(request, content, school)
}
