//! Handlers for the `/planning` resource.
//!
//! Thin shims over [`PlanningWorkflow`]; all lifecycle rules live there.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use planner_core::planning::ProviderKind;
use planner_core::types::DbId;
use planner_db::models::planning_sheet::{PlanningSheet, UpdatePlanningSheet};
use planner_db::repositories::PlanningSheetRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::workflow::planning::{GeneratePlanningRequest, PlanningWorkflow};

/// Request body for `POST /planning/{id}/regenerate`.
#[derive(Debug, Default, Deserialize)]
pub struct RegenerateRequest {
    pub ai_provider: Option<ProviderKind>,
}

/// POST /api/v1/planning/generate
pub async fn generate(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<GeneratePlanningRequest>,
) -> AppResult<(StatusCode, Json<PlanningSheet>)> {
    let sheet =
        PlanningWorkflow::generate(&state.pool, &state.orchestrator, user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(sheet)))
}

/// GET /api/v1/planning/course/{course_id}/week/{week_number}
pub async fn get_by_week(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((course_id, week_number)): Path<(DbId, i32)>,
) -> AppResult<Json<PlanningSheet>> {
    let sheet = PlanningSheetRepo::find_by_course_and_week(&state.pool, course_id, week_number)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No planning sheet for course {course_id} week {week_number}"
            ))
        })?;
    Ok(Json(sheet))
}

/// GET /api/v1/planning/course/{course_id}
pub async fn list_by_course(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<Vec<PlanningSheet>>> {
    let sheets = PlanningSheetRepo::list_by_course(&state.pool, course_id).await?;
    Ok(Json(sheets))
}

/// PUT /api/v1/planning/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePlanningSheet>,
) -> AppResult<Json<PlanningSheet>> {
    let sheet = PlanningWorkflow::update(&state.pool, user.user_id, id, input).await?;
    Ok(Json(sheet))
}

/// POST /api/v1/planning/{id}/regenerate
pub async fn regenerate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<RegenerateRequest>,
) -> AppResult<Json<PlanningSheet>> {
    let sheet = PlanningWorkflow::regenerate(
        &state.pool,
        &state.orchestrator,
        user.user_id,
        id,
        input.ai_provider,
    )
    .await?;
    Ok(Json(sheet))
}

/// DELETE /api/v1/planning/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    PlanningWorkflow::delete(&state.pool, user.user_id, id).await?;
    Ok(StatusCode::OK)
}
