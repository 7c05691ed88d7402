//! Planning sheet entity model and DTOs.

use planner_core::planning::{AssessmentMethod, GeneratedPlanning, ProviderKind, Question};
use planner_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A planning sheet row from the `planning_sheets` table.
///
/// The generated content (objectives, questions, assessment methods) is
/// stored as JSONB and read/replaced wholesale.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlanningSheet {
    pub id: DbId,
    pub course_id: DbId,
    pub created_by: DbId,
    pub week_number: i32,
    pub session_date: Option<Timestamp>,
    pub weekly_abstract: String,
    pub learning_objectives: Json<Vec<String>>,
    pub questions: Json<Vec<Question>>,
    pub assessment_methods: Json<Vec<AssessmentMethod>>,
    pub additional_notes: Option<String>,
    #[sqlx(try_from = "String")]
    pub ai_provider: ProviderKind,
    /// Human-readable tag, e.g. `openai AI`.
    pub generated_with: Option<String>,
    /// Set the first time a user manually edits generated content.
    pub is_customized: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a freshly generated sheet.
#[derive(Debug, Clone)]
pub struct CreatePlanningSheet {
    pub course_id: DbId,
    pub created_by: DbId,
    pub week_number: i32,
    pub session_date: Option<Timestamp>,
    pub generated: GeneratedPlanning,
    pub ai_provider: ProviderKind,
    pub generated_with: String,
}

/// DTO for a manual update. All fields are optional; `is_customized` is
/// forced to `true` by the workflow whenever generated content is touched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlanningSheet {
    pub session_date: Option<Timestamp>,
    pub weekly_abstract: Option<String>,
    pub learning_objectives: Option<Vec<String>>,
    pub questions: Option<Vec<Question>>,
    pub assessment_methods: Option<Vec<AssessmentMethod>>,
    pub additional_notes: Option<String>,
    pub is_customized: Option<bool>,
}

impl UpdatePlanningSheet {
    /// Whether this update modifies any AI-generated content field.
    pub fn touches_generated_content(&self) -> bool {
        self.weekly_abstract.is_some()
            || self.learning_objectives.is_some()
            || self.questions.is_some()
            || self.assessment_methods.is_some()
    }
}
