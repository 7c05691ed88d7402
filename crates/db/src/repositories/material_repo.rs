//! Repository for the `course_materials` table.

use planner_core::types::DbId;
use sqlx::PgPool;

use crate::models::material::{CourseMaterial, CreateCourseMaterial};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, course_id, uploaded_by, title, description, material_type, \
                       file_name, file_path, file_size, mime_type, extracted_text, \
                       week_number, uploaded_at, created_at, updated_at";

/// Provides CRUD operations for course materials.
pub struct MaterialRepo;

impl MaterialRepo {
    /// Insert a new material row, returning the created row. Empty extracted
    /// text is stored as NULL.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCourseMaterial,
    ) -> Result<CourseMaterial, sqlx::Error> {
        let query = format!(
            "INSERT INTO course_materials
                (course_id, uploaded_by, title, description, material_type, file_name,
                 file_path, file_size, mime_type, extracted_text, week_number)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NULLIF($10, ''), $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CourseMaterial>(&query)
            .bind(input.course_id)
            .bind(input.uploaded_by)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.material_type)
            .bind(&input.file_name)
            .bind(&input.file_path)
            .bind(input.file_size)
            .bind(&input.mime_type)
            .bind(input.extracted_text.as_deref().unwrap_or_default())
            .bind(input.week_number)
            .fetch_one(pool)
            .await
    }

    /// Find a material by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CourseMaterial>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM course_materials WHERE id = $1");
        sqlx::query_as::<_, CourseMaterial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all materials for a course, by week then most recent upload.
    pub async fn list_by_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<CourseMaterial>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM course_materials
             WHERE course_id = $1
             ORDER BY week_number ASC NULLS LAST, uploaded_at DESC"
        );
        sqlx::query_as::<_, CourseMaterial>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// List materials tagged with a specific week, in upload order.
    pub async fn list_by_course_and_week(
        pool: &PgPool,
        course_id: DbId,
        week_number: i32,
    ) -> Result<Vec<CourseMaterial>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM course_materials
             WHERE course_id = $1 AND week_number = $2
             ORDER BY uploaded_at ASC"
        );
        sqlx::query_as::<_, CourseMaterial>(&query)
            .bind(course_id)
            .bind(week_number)
            .fetch_all(pool)
            .await
    }

    /// List an explicit subset of a course's materials by ID, in upload
    /// order. IDs belonging to other courses are silently excluded.
    pub async fn list_by_ids(
        pool: &PgPool,
        course_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<CourseMaterial>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM course_materials
             WHERE course_id = $1 AND id = ANY($2)
             ORDER BY uploaded_at ASC"
        );
        sqlx::query_as::<_, CourseMaterial>(&query)
            .bind(course_id)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Delete a material if it was uploaded by the given user.
    /// Returns the deleted row so the caller can remove the stored file.
    pub async fn delete_owned(
        pool: &PgPool,
        id: DbId,
        uploaded_by: DbId,
    ) -> Result<Option<CourseMaterial>, sqlx::Error> {
        let query = format!(
            "DELETE FROM course_materials
             WHERE id = $1 AND uploaded_by = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CourseMaterial>(&query)
            .bind(id)
            .bind(uploaded_by)
            .fetch_optional(pool)
            .await
    }
}
