//! Handlers for the `/settings` resource: per-course customization profiles
//! and AI provider diagnostics.

use axum::extract::{Path, State};
use axum::Json;
use planner_core::error::CoreError;
use planner_core::planning::ProviderKind;
use planner_core::types::DbId;
use planner_db::models::customization::{
    CustomizationProfile, UpdateCustomizationProfile, TEACHING_STYLES,
};
use planner_db::repositories::CustomizationRepo;
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::course;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/settings/course/{course_id}
pub async fn get_by_course(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<CustomizationProfile>> {
    let profile = CustomizationRepo::find_by_course(&state.pool, course_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "CustomizationProfile",
            id: course_id,
        })?;
    Ok(Json(profile))
}

/// PUT /api/v1/settings/course/{course_id}
///
/// Create-or-update; only the course's session lead may change settings.
pub async fn upsert(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<DbId>,
    Json(input): Json<UpdateCustomizationProfile>,
) -> AppResult<Json<CustomizationProfile>> {
    input.validate()?;
    if let Some(style) = &input.teaching_style {
        if !TEACHING_STYLES.contains(&style.as_str()) {
            return Err(CoreError::Validation(format!(
                "Invalid teaching_style '{style}'. Expected one of: {}",
                TEACHING_STYLES.join(", ")
            ))
            .into());
        }
    }
    course::find_owned(&state, course_id, user.user_id, "customize").await?;

    let profile = CustomizationRepo::upsert(&state.pool, course_id, user.user_id, &input).await?;
    Ok(Json(profile))
}

/// One provider's configuration status.
#[derive(Debug, Serialize)]
pub struct ProviderStatus {
    pub provider: ProviderKind,
    pub configured: bool,
}

/// GET /api/v1/settings/providers
pub async fn list_providers(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<ProviderStatus>>> {
    let statuses = ProviderKind::ALL
        .into_iter()
        .map(|provider| ProviderStatus {
            provider,
            configured: state.orchestrator.is_configured(provider),
        })
        .collect();
    Ok(Json(statuses))
}

/// Result of a provider connectivity self-test.
#[derive(Debug, Serialize)]
pub struct ProviderTestResult {
    pub provider: ProviderKind,
    pub ok: bool,
}

/// POST /api/v1/settings/providers/{provider}/test
///
/// Runs the vendor self-test. An unconfigured provider reports `ok: false`
/// without a network attempt.
pub async fn test_provider(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(provider): Path<String>,
) -> AppResult<Json<ProviderTestResult>> {
    let provider: ProviderKind = provider.parse().map_err(AppError::BadRequest)?;
    let ok = state.orchestrator.test_provider(provider).await;
    Ok(Json(ProviderTestResult { provider, ok }))
}
