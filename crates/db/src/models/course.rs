//! Course entity model and DTOs.

use planner_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Valid semester names, matching the database CHECK constraint.
pub const SEMESTERS: &[&str] = &["Fall", "Spring", "Summer", "Winter"];

/// A course row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub session_lead_id: DbId,
    pub course_code: String,
    pub course_name: String,
    pub semester: String,
    pub year: i32,
    pub description: Option<String>,
    /// Study sessions per week.
    pub session_frequency: i32,
    pub total_weeks: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new course. The session lead is the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCourse {
    pub course_code: String,
    pub course_name: String,
    pub semester: String,
    pub year: i32,
    pub description: Option<String>,
    /// Defaults to 2 if omitted.
    #[validate(range(min = 1, max = 7))]
    pub session_frequency: Option<i32>,
    /// Defaults to 15 if omitted.
    #[validate(range(min = 1, max = 52))]
    pub total_weeks: Option<i32>,
}

/// DTO for updating an existing course. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCourse {
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub semester: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 7))]
    pub session_frequency: Option<i32>,
    #[validate(range(min = 1, max = 52))]
    pub total_weeks: Option<i32>,
}
