//! Planning sheet lifecycle: generate, manual update, regenerate, delete.
//!
//! Each (course, week) slot is either absent or holds exactly one sheet.
//! Generation moves a slot from absent to present; regeneration is a delete
//! followed by a fresh generation (deliberately not transactional: if the
//! second step fails the slot stays absent); manual edits keep the slot
//! present and may flip `is_customized`.

use planner_ai::Orchestrator;
use planner_core::error::CoreError;
use planner_core::planning::{PlanningContext, ProviderKind};
use planner_core::types::{DbId, Timestamp};
use planner_db::models::material::CourseMaterial;
use planner_db::models::planning_sheet::{
    CreatePlanningSheet, PlanningSheet, UpdatePlanningSheet,
};
use planner_db::repositories::{CourseRepo, CustomizationRepo, MaterialRepo, PlanningSheetRepo};
use planner_db::DbPool;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Extracted text is truncated to this many characters when a material is
/// excerpted into the generation context.
const MATERIAL_PREVIEW_CHARS: usize = 2000;

/// How many prior weeks' abstracts are fed back as topic continuity hints.
const PREVIOUS_WEEKS_LIMIT: i64 = 3;

/// Request body for `POST /planning/generate`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GeneratePlanningRequest {
    pub course_id: DbId,
    #[validate(range(min = 1, max = 52))]
    pub week_number: i32,
    pub session_date: Option<Timestamp>,
    /// Overrides the course's preferred provider for this generation only.
    pub ai_provider: Option<ProviderKind>,
    /// Explicit material subset; when absent, all materials tagged with the
    /// target week are used.
    pub specific_material_ids: Option<Vec<DbId>>,
}

/// Planning sheet state machine over (course, week) slots.
pub struct PlanningWorkflow;

impl PlanningWorkflow {
    /// Generate a new sheet for a (course, week) slot.
    ///
    /// Fails with a conflict if the slot is already occupied; the unique
    /// constraint backs up this check against concurrent generations.
    pub async fn generate(
        pool: &DbPool,
        orchestrator: &Orchestrator,
        user_id: DbId,
        input: GeneratePlanningRequest,
    ) -> AppResult<PlanningSheet> {
        input.validate()?;

        if PlanningSheetRepo::find_by_course_and_week(pool, input.course_id, input.week_number)
            .await?
            .is_some()
        {
            return Err(CoreError::Conflict(format!(
                "Planning sheet for week {} already exists",
                input.week_number
            ))
            .into());
        }

        let course = CourseRepo::find_by_id(pool, input.course_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Course",
                id: input.course_id,
            })?;
        if course.session_lead_id != user_id {
            return Err(CoreError::Forbidden(
                "Not authorized to generate planning for this course".into(),
            )
            .into());
        }

        // Lazily create the customization profile with documented defaults.
        let profile = match CustomizationRepo::find_by_course(pool, course.id).await? {
            Some(profile) => profile,
            None => {
                CustomizationRepo::create_default(
                    pool,
                    course.id,
                    user_id,
                    input.ai_provider.unwrap_or_default(),
                )
                .await?
            }
        };

        let materials = match &input.specific_material_ids {
            Some(ids) if !ids.is_empty() => {
                MaterialRepo::list_by_ids(pool, course.id, ids).await?
            }
            _ => {
                MaterialRepo::list_by_course_and_week(pool, course.id, input.week_number).await?
            }
        };

        let previous_weeks_topics = PlanningSheetRepo::list_previous_abstracts(
            pool,
            course.id,
            input.week_number,
            PREVIOUS_WEEKS_LIMIT,
        )
        .await?;

        let provider = input
            .ai_provider
            .unwrap_or(profile.preferred_ai_provider);

        let context = PlanningContext {
            course_code: course.course_code.clone(),
            course_name: course.course_name.clone(),
            week_number: input.week_number,
            materials: materials.iter().map(material_excerpt).collect(),
            preferences: profile.preferences(),
            previous_weeks_topics,
        };

        let generated = orchestrator.generate(&context, Some(provider)).await?;

        let sheet = PlanningSheetRepo::create(
            pool,
            &CreatePlanningSheet {
                course_id: course.id,
                created_by: user_id,
                week_number: input.week_number,
                session_date: input.session_date,
                generated,
                ai_provider: provider,
                generated_with: format!("{provider} AI"),
            },
        )
        .await?;

        tracing::info!(
            sheet_id = sheet.id,
            course_id = course.id,
            week = sheet.week_number,
            provider = %provider,
            "Planning sheet generated",
        );
        Ok(sheet)
    }

    /// Apply a manual edit to an existing sheet. Author-only.
    ///
    /// Touching any generated-content field forces `is_customized = true`
    /// regardless of the caller's supplied value; otherwise the flag follows
    /// the caller's value or keeps its prior state.
    pub async fn update(
        pool: &DbPool,
        user_id: DbId,
        sheet_id: DbId,
        mut input: UpdatePlanningSheet,
    ) -> AppResult<PlanningSheet> {
        Self::find_owned(pool, sheet_id, user_id, "update").await?;

        if input.touches_generated_content() {
            input.is_customized = Some(true);
        }

        let updated = PlanningSheetRepo::update(pool, sheet_id, &input)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "PlanningSheet",
                id: sheet_id,
            })?;
        Ok(updated)
    }

    /// Replace a sheet with a freshly generated one. Author-only.
    ///
    /// Capture (course, week), delete, then generate again with an optional
    /// provider override. Not atomic: if generation fails after the delete,
    /// the slot stays absent and the prior content is gone.
    pub async fn regenerate(
        pool: &DbPool,
        orchestrator: &Orchestrator,
        user_id: DbId,
        sheet_id: DbId,
        ai_provider: Option<ProviderKind>,
    ) -> AppResult<PlanningSheet> {
        let existing = Self::find_owned(pool, sheet_id, user_id, "regenerate").await?;

        let course_id = existing.course_id;
        let week_number = existing.week_number;

        PlanningSheetRepo::delete(pool, sheet_id).await?;

        Self::generate(
            pool,
            orchestrator,
            user_id,
            GeneratePlanningRequest {
                course_id,
                week_number,
                session_date: None,
                ai_provider,
                specific_material_ids: None,
            },
        )
        .await
    }

    /// Remove a sheet. Author-only.
    pub async fn delete(pool: &DbPool, user_id: DbId, sheet_id: DbId) -> AppResult<()> {
        Self::find_owned(pool, sheet_id, user_id, "delete").await?;
        PlanningSheetRepo::delete(pool, sheet_id).await?;
        Ok(())
    }

    /// Fetch a sheet and check the caller authored it.
    async fn find_owned(
        pool: &DbPool,
        sheet_id: DbId,
        user_id: DbId,
        action: &str,
    ) -> AppResult<PlanningSheet> {
        let sheet = PlanningSheetRepo::find_by_id(pool, sheet_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "PlanningSheet",
                id: sheet_id,
            })?;
        if sheet.created_by != user_id {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "Not authorized to {action} this planning sheet"
            ))));
        }
        Ok(sheet)
    }
}

/// Render a material into a context excerpt: title, type tag, and a bounded
/// preview of the extracted text (falling back to description, then title).
fn material_excerpt(material: &CourseMaterial) -> String {
    let preview: String = match material
        .extracted_text
        .as_deref()
        .filter(|text| !text.is_empty())
    {
        Some(text) => text.chars().take(MATERIAL_PREVIEW_CHARS).collect(),
        None => material
            .description
            .clone()
            .unwrap_or_else(|| material.title.clone()),
    };
    format!(
        "**{}** ({}): {}",
        material.title, material.material_type, preview
    )
}
