//! Course material entity model and DTOs.

use planner_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Valid material type tags, matching the database CHECK constraint.
pub const MATERIAL_TYPES: &[&str] = &[
    "syllabus",
    "lecture_notes",
    "textbook",
    "slides",
    "assignments",
    "exams",
    "other",
];

/// An uploaded document row from the `course_materials` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseMaterial {
    pub id: DbId,
    pub course_id: DbId,
    pub uploaded_by: DbId,
    pub title: String,
    pub description: Option<String>,
    pub material_type: String,
    /// Original file name as uploaded.
    pub file_name: String,
    /// Location in the upload store.
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    /// Best-effort plain text; empty extraction is stored as NULL.
    pub extracted_text: Option<String>,
    pub week_number: Option<i32>,
    pub uploaded_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new material row. Built by the upload handler after
/// the file has been stored and its text extracted.
#[derive(Debug, Clone)]
pub struct CreateCourseMaterial {
    pub course_id: DbId,
    pub uploaded_by: DbId,
    pub title: String,
    pub description: Option<String>,
    pub material_type: String,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub extracted_text: Option<String>,
    pub week_number: Option<i32>,
}
