//! Repository for the `planning_sheets` table.

use planner_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::planning_sheet::{CreatePlanningSheet, PlanningSheet, UpdatePlanningSheet};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, course_id, created_by, week_number, session_date, weekly_abstract, \
                       learning_objectives, questions, assessment_methods, additional_notes, \
                       ai_provider, generated_with, is_customized, created_at, updated_at";

/// Provides CRUD operations for planning sheets.
pub struct PlanningSheetRepo;

impl PlanningSheetRepo {
    /// Insert a freshly generated sheet with `is_customized = false`.
    ///
    /// A concurrent insert for the same (course, week) loses to
    /// `uq_planning_sheets_course_week` and surfaces as a unique violation.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePlanningSheet,
    ) -> Result<PlanningSheet, sqlx::Error> {
        let query = format!(
            "INSERT INTO planning_sheets
                (course_id, created_by, week_number, session_date, weekly_abstract,
                 learning_objectives, questions, assessment_methods, additional_notes,
                 ai_provider, generated_with, is_customized)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, FALSE)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PlanningSheet>(&query)
            .bind(input.course_id)
            .bind(input.created_by)
            .bind(input.week_number)
            .bind(input.session_date)
            .bind(&input.generated.weekly_abstract)
            .bind(Json(&input.generated.learning_objectives))
            .bind(Json(&input.generated.questions))
            .bind(Json(&input.generated.assessment_methods))
            .bind(&input.generated.additional_notes)
            .bind(input.ai_provider.to_string())
            .bind(&input.generated_with)
            .fetch_one(pool)
            .await
    }

    /// Find a sheet by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PlanningSheet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM planning_sheets WHERE id = $1");
        sqlx::query_as::<_, PlanningSheet>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the sheet for a specific (course, week) slot.
    pub async fn find_by_course_and_week(
        pool: &PgPool,
        course_id: DbId,
        week_number: i32,
    ) -> Result<Option<PlanningSheet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM planning_sheets WHERE course_id = $1 AND week_number = $2"
        );
        sqlx::query_as::<_, PlanningSheet>(&query)
            .bind(course_id)
            .bind(week_number)
            .fetch_optional(pool)
            .await
    }

    /// List all sheets for a course, ordered by week.
    pub async fn list_by_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<PlanningSheet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM planning_sheets WHERE course_id = $1 ORDER BY week_number ASC"
        );
        sqlx::query_as::<_, PlanningSheet>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Abstracts of up to `limit` weeks strictly before `week_number`,
    /// most recent week first. Used as topic continuity hints.
    pub async fn list_previous_abstracts(
        pool: &PgPool,
        course_id: DbId,
        week_number: i32,
        limit: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT weekly_abstract FROM planning_sheets
             WHERE course_id = $1 AND week_number < $2
             ORDER BY week_number DESC
             LIMIT $3",
        )
        .bind(course_id)
        .bind(week_number)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Apply a manual update. Only non-`None` fields are applied; the
    /// caller decides the effective `is_customized` value beforehand.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlanningSheet,
    ) -> Result<Option<PlanningSheet>, sqlx::Error> {
        let query = format!(
            "UPDATE planning_sheets SET
                session_date = COALESCE($2, session_date),
                weekly_abstract = COALESCE($3, weekly_abstract),
                learning_objectives = COALESCE($4, learning_objectives),
                questions = COALESCE($5, questions),
                assessment_methods = COALESCE($6, assessment_methods),
                additional_notes = COALESCE($7, additional_notes),
                is_customized = COALESCE($8, is_customized),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PlanningSheet>(&query)
            .bind(id)
            .bind(input.session_date)
            .bind(&input.weekly_abstract)
            .bind(input.learning_objectives.as_ref().map(Json))
            .bind(input.questions.as_ref().map(Json))
            .bind(input.assessment_methods.as_ref().map(Json))
            .bind(&input.additional_notes)
            .bind(input.is_customized)
            .fetch_optional(pool)
            .await
    }

    /// Delete a sheet by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM planning_sheets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
