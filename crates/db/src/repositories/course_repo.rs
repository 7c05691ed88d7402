//! Repository for the `courses` table.

use planner_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::{Course, CreateCourse, UpdateCourse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, session_lead_id, course_code, course_name, semester, year, \
                       description, session_frequency, total_weeks, created_at, updated_at";

/// Provides CRUD operations for courses.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a new course for the given session lead, returning the created
    /// row. Course codes are stored uppercased.
    pub async fn create(
        pool: &PgPool,
        session_lead_id: DbId,
        input: &CreateCourse,
    ) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses
                (session_lead_id, course_code, course_name, semester, year, description,
                 session_frequency, total_weeks)
             VALUES ($1, UPPER($2), $3, $4, $5, $6, COALESCE($7, 2), COALESCE($8, 15))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(session_lead_id)
            .bind(&input.course_code)
            .bind(&input.course_name)
            .bind(&input.semester)
            .bind(input.year)
            .bind(&input.description)
            .bind(input.session_frequency)
            .bind(input.total_weeks)
            .fetch_one(pool)
            .await
    }

    /// Find a course by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a session lead's courses, most recent semester first.
    pub async fn list_by_session_lead(
        pool: &PgPool,
        session_lead_id: DbId,
    ) -> Result<Vec<Course>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM courses
             WHERE session_lead_id = $1
             ORDER BY year DESC, semester DESC, course_code ASC"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(session_lead_id)
            .fetch_all(pool)
            .await
    }

    /// Update a course. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCourse,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET
                course_code = COALESCE(UPPER($2), course_code),
                course_name = COALESCE($3, course_name),
                semester = COALESCE($4, semester),
                year = COALESCE($5, year),
                description = COALESCE($6, description),
                session_frequency = COALESCE($7, session_frequency),
                total_weeks = COALESCE($8, total_weeks),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(&input.course_code)
            .bind(&input.course_name)
            .bind(&input.semester)
            .bind(input.year)
            .bind(&input.description)
            .bind(input.session_frequency)
            .bind(input.total_weeks)
            .fetch_optional(pool)
            .await
    }

    /// Delete a course by ID. Materials, the customization profile, and
    /// planning sheets go with it via `ON DELETE CASCADE`.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
