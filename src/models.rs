use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog;

pub const FIELD_SUBJECT: &str = "Mata Pelajaran";
pub const FIELD_TOPIC: &str = "Materi";
pub const FIELD_THEMES: &str = "Tema Kurikulum Berbasis Cinta";

/// Form metadata for one lesson plan. `teacher_name` and `date` may stay
/// empty; the renderer substitutes signature placeholders for them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LessonRequest {
    pub subject: String,
    pub class_phase: String,
    pub topic: String,
    pub value_themes: Vec<String>,
    pub learning_model: String,
    pub time_allocation: String,
    pub teacher_name: String,
    pub date: Option<NaiveDate>,
}

impl LessonRequest {
    pub fn with_defaults() -> Self {
        LessonRequest {
            subject: String::new(),
            class_phase: String::new(),
            topic: String::new(),
            value_themes: Vec::new(),
            learning_model: catalog::DEFAULT_LEARNING_MODEL.to_string(),
            time_allocation: catalog::DEFAULT_TIME_ALLOCATION.to_string(),
            teacher_name: String::new(),
            date: Some(Utc::now().date_naive()),
        }
    }

    /// Labels of the fields that must be filled before generation.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.subject.trim().is_empty() {
            missing.push(FIELD_SUBJECT);
        }
        if self.topic.trim().is_empty() {
            missing.push(FIELD_TOPIC);
        }
        if self.value_themes.iter().all(|theme| theme.trim().is_empty()) {
            missing.push(FIELD_THEMES);
        }
        missing
    }
}

/// Partial form update. Absent fields are left untouched; `date` accepts an
/// explicit null to clear the value back to its signature placeholder.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct FormPatch {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub class_phase: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub value_themes: Option<Vec<String>>,
    #[serde(default)]
    pub learning_model: Option<String>,
    #[serde(default)]
    pub time_allocation: Option<String>,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub date: Option<Option<NaiveDate>>,
}

mod double_option {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<NaiveDate>::deserialize(deserializer).map(Some)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStep {
    pub stage_name: String,
    pub activity_description: String,
}

/// Structured lesson content as returned by the generation service. Received
/// whole; a later generation replaces it, nothing is merged.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub inserted_materials: Vec<String>,
    pub objectives: Vec<String>,
    pub indicators: Vec<String>,
    pub learning_model_echo: String,
    pub opening: Vec<String>,
    pub core_activity_steps: Vec<ActivityStep>,
    pub closing: Vec<String>,
    pub formative_assessment: Vec<String>,
    pub summative_assessment: Vec<String>,
    pub attitude_assessment: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Editing,
    Generating,
    Reviewing,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("generation already running")]
    GenerationInFlight,
    #[error("operation not allowed in {0:?} phase")]
    WrongPhase(Phase),
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// One drafting session: the live form plus its editing state machine.
/// Editing -> Generating on submit, Generating -> Reviewing on success,
/// Generating -> Editing on failure, Reviewing -> Editing on reset. The form
/// is only mutable in Editing, so the request sent to the generator always
/// matches what the session holds afterwards.
#[derive(Debug, Clone)]
pub struct PlanSession {
    pub id: Uuid,
    pub form: LessonRequest,
    pub phase: Phase,
    pub content: Option<GeneratedContent>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlanSession {
    pub fn new() -> Self {
        let now = Utc::now();
        PlanSession {
            id: Uuid::new_v4(),
            form: LessonRequest::with_defaults(),
            phase: Phase::Editing,
            content: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn guard_editing(&self) -> Result<(), StateError> {
        match self.phase {
            Phase::Editing => Ok(()),
            Phase::Generating => Err(StateError::GenerationInFlight),
            Phase::Reviewing => Err(StateError::WrongPhase(Phase::Reviewing)),
        }
    }

    /// Applies a partial update to the form. Changing the class pre-fills the
    /// teacher name from the homeroom lookup; an explicit teacher name in the
    /// same patch still wins.
    pub fn apply_update(&mut self, patch: FormPatch) -> Result<(), StateError> {
        self.guard_editing()?;

        if let Some(subject) = patch.subject {
            self.form.subject = subject;
        }
        if let Some(class_phase) = patch.class_phase {
            if class_phase != self.form.class_phase {
                if let Some(teacher) = catalog::teacher_for_class(&class_phase) {
                    self.form.teacher_name = teacher.to_string();
                }
            }
            self.form.class_phase = class_phase;
        }
        if let Some(topic) = patch.topic {
            self.form.topic = topic;
        }
        if let Some(value_themes) = patch.value_themes {
            self.form.value_themes = value_themes;
        }
        if let Some(learning_model) = patch.learning_model {
            self.form.learning_model = learning_model;
        }
        if let Some(time_allocation) = patch.time_allocation {
            self.form.time_allocation = time_allocation;
        }
        if let Some(teacher_name) = patch.teacher_name {
            self.form.teacher_name = teacher_name;
        }
        if let Some(date) = patch.date {
            self.form.date = date;
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.form.missing_fields()
    }

    pub fn can_generate(&self) -> bool {
        self.phase == Phase::Editing && self.missing_fields().is_empty()
    }

    /// Enters Generating and returns the request snapshot to send. Clears any
    /// error kept from the previous attempt.
    pub fn begin_generation(&mut self) -> Result<LessonRequest, StateError> {
        self.guard_editing()?;

        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(StateError::MissingFields(missing));
        }

        self.phase = Phase::Generating;
        self.error = None;
        self.updated_at = Utc::now();
        Ok(self.form.clone())
    }

    /// Applies the outcome of the in-flight generation call.
    pub fn complete_generation(&mut self, outcome: Result<GeneratedContent, String>) {
        match outcome {
            Ok(content) => {
                self.content = Some(content);
                self.error = None;
                self.phase = Phase::Reviewing;
            }
            Err(message) => {
                self.error = Some(message);
                self.phase = Phase::Editing;
            }
        }
        self.updated_at = Utc::now();
    }

    /// Back to the form. Content and error are discarded, field values stay.
    pub fn reset(&mut self) -> Result<(), StateError> {
        if self.phase == Phase::Generating {
            return Err(StateError::GenerationInFlight);
        }
        self.phase = Phase::Editing;
        self.content = None;
        self.error = None;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            phase: self.phase,
            form: self.form.clone(),
            can_generate: self.can_generate(),
            missing: self.missing_fields(),
            error: self.error.clone(),
            has_content: self.content.is_some(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Default for PlanSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire projection of a session, enough for the form page to drive itself.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub phase: Phase,
    pub form: LessonRequest,
    pub can_generate: bool,
    pub missing: Vec<&'static str>,
    pub error: Option<String>,
    pub has_content: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
