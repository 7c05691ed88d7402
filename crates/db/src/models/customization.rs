//! Customization profile entity model and DTOs.

use planner_core::planning::{DifficultyMix, GenerationPreferences, ProviderKind};
use planner_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// Valid teaching style tags, matching the database CHECK constraint.
pub const TEACHING_STYLES: &[&str] = &[
    "interactive",
    "lecture",
    "discussion",
    "problem-solving",
    "collaborative",
];

/// Documented defaults applied when a profile is created lazily on first
/// generation.
pub mod defaults {
    pub const SESSION_DURATION: i32 = 90;
    pub const NUMBER_OF_QUESTIONS: i32 = 5;
    pub const DIFFICULTY_EASY: i32 = 30;
    pub const DIFFICULTY_MEDIUM: i32 = 50;
    pub const DIFFICULTY_HARD: i32 = 20;
    pub const ASSESSMENT_PREFERENCES: &[&str] =
        &["Quick Quiz", "Group Discussion", "Problem Solving"];
    pub const TEACHING_STYLE: &str = "interactive";
}

/// A customization profile row from the `customization_profiles` table.
/// One per course, owned by the course's session lead.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CustomizationProfile {
    pub id: DbId,
    pub course_id: DbId,
    pub user_id: DbId,
    #[sqlx(try_from = "String")]
    pub preferred_ai_provider: ProviderKind,
    pub default_session_duration: i32,
    pub number_of_questions: i32,
    pub difficulty_easy: i32,
    pub difficulty_medium: i32,
    pub difficulty_hard: i32,
    pub assessment_preferences: Json<Vec<String>>,
    pub teaching_style: String,
    pub additional_instructions: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CustomizationProfile {
    /// The profile as consumed by the prompt builder.
    pub fn preferences(&self) -> GenerationPreferences {
        GenerationPreferences {
            session_duration: self.default_session_duration,
            number_of_questions: self.number_of_questions,
            difficulty_mix: DifficultyMix {
                easy: self.difficulty_easy,
                medium: self.difficulty_medium,
                hard: self.difficulty_hard,
            },
            assessment_preferences: self.assessment_preferences.0.clone(),
            teaching_style: self.teaching_style.clone(),
            additional_instructions: self.additional_instructions.clone(),
        }
    }
}

/// DTO for creating or updating a profile. Omitted fields keep their
/// current value (or the documented default on first creation).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCustomizationProfile {
    pub preferred_ai_provider: Option<ProviderKind>,
    #[validate(range(min = 30, max = 240))]
    pub default_session_duration: Option<i32>,
    #[validate(range(min = 1, max = 20))]
    pub number_of_questions: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    pub difficulty_easy: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    pub difficulty_medium: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    pub difficulty_hard: Option<i32>,
    pub assessment_preferences: Option<Vec<String>>,
    pub teaching_style: Option<String>,
    #[validate(length(max = 1000))]
    pub additional_instructions: Option<String>,
}
