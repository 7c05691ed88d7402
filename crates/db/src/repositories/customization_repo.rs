//! Repository for the `customization_profiles` table.

use planner_core::planning::ProviderKind;
use planner_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::customization::{defaults, CustomizationProfile, UpdateCustomizationProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, course_id, user_id, preferred_ai_provider, default_session_duration, \
                       number_of_questions, difficulty_easy, difficulty_medium, difficulty_hard, \
                       assessment_preferences, teaching_style, additional_instructions, \
                       created_at, updated_at";

/// Provides CRUD operations for customization profiles.
pub struct CustomizationRepo;

impl CustomizationRepo {
    /// Find the profile for a course, if one exists.
    pub async fn find_by_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Option<CustomizationProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customization_profiles WHERE course_id = $1");
        sqlx::query_as::<_, CustomizationProfile>(&query)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// Create a profile with the documented defaults, used when generation
    /// runs for a course that has never been customized.
    pub async fn create_default(
        pool: &PgPool,
        course_id: DbId,
        user_id: DbId,
        preferred_ai_provider: ProviderKind,
    ) -> Result<CustomizationProfile, sqlx::Error> {
        let starter_assessments: Vec<String> = defaults::ASSESSMENT_PREFERENCES
            .iter()
            .map(|s| s.to_string())
            .collect();
        let query = format!(
            "INSERT INTO customization_profiles
                (course_id, user_id, preferred_ai_provider, default_session_duration,
                 number_of_questions, difficulty_easy, difficulty_medium, difficulty_hard,
                 assessment_preferences, teaching_style)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomizationProfile>(&query)
            .bind(course_id)
            .bind(user_id)
            .bind(preferred_ai_provider.to_string())
            .bind(defaults::SESSION_DURATION)
            .bind(defaults::NUMBER_OF_QUESTIONS)
            .bind(defaults::DIFFICULTY_EASY)
            .bind(defaults::DIFFICULTY_MEDIUM)
            .bind(defaults::DIFFICULTY_HARD)
            .bind(Json(starter_assessments))
            .bind(defaults::TEACHING_STYLE)
            .fetch_one(pool)
            .await
    }

    /// Create or update the profile for a course. Omitted fields keep their
    /// current value; on first creation they take the column defaults.
    pub async fn upsert(
        pool: &PgPool,
        course_id: DbId,
        user_id: DbId,
        input: &UpdateCustomizationProfile,
    ) -> Result<CustomizationProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO customization_profiles
                (course_id, user_id, preferred_ai_provider, default_session_duration,
                 number_of_questions, difficulty_easy, difficulty_medium, difficulty_hard,
                 assessment_preferences, teaching_style, additional_instructions)
             VALUES ($1, $2,
                COALESCE($3, 'openai'), COALESCE($4, 90), COALESCE($5, 5),
                COALESCE($6, 30), COALESCE($7, 50), COALESCE($8, 20),
                COALESCE($9, '[]'::jsonb), COALESCE($10, 'interactive'), $11)
             ON CONFLICT ON CONSTRAINT uq_customization_profiles_course DO UPDATE SET
                preferred_ai_provider = COALESCE($3, customization_profiles.preferred_ai_provider),
                default_session_duration = COALESCE($4, customization_profiles.default_session_duration),
                number_of_questions = COALESCE($5, customization_profiles.number_of_questions),
                difficulty_easy = COALESCE($6, customization_profiles.difficulty_easy),
                difficulty_medium = COALESCE($7, customization_profiles.difficulty_medium),
                difficulty_hard = COALESCE($8, customization_profiles.difficulty_hard),
                assessment_preferences = COALESCE($9, customization_profiles.assessment_preferences),
                teaching_style = COALESCE($10, customization_profiles.teaching_style),
                additional_instructions = COALESCE($11, customization_profiles.additional_instructions),
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomizationProfile>(&query)
            .bind(course_id)
            .bind(user_id)
            .bind(input.preferred_ai_provider.map(|p| p.to_string()))
            .bind(input.default_session_duration)
            .bind(input.number_of_questions)
            .bind(input.difficulty_easy)
            .bind(input.difficulty_medium)
            .bind(input.difficulty_hard)
            .bind(input.assessment_preferences.as_ref().map(Json))
            .bind(&input.teaching_style)
            .bind(&input.additional_instructions)
            .fetch_one(pool)
            .await
    }
}
