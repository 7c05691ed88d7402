//! Handlers for the `/courses` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use planner_core::error::CoreError;
use planner_core::types::DbId;
use planner_db::models::course::{Course, CreateCourse, UpdateCourse, SEMESTERS};
use planner_db::repositories::CourseRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/courses
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateCourse>,
) -> AppResult<(StatusCode, Json<Course>)> {
    input.validate()?;
    check_semester(&input.semester)?;

    let course = CourseRepo::create(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// GET /api/v1/courses
pub async fn list(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Vec<Course>>> {
    let courses = CourseRepo::list_by_session_lead(&state.pool, user.user_id).await?;
    Ok(Json(courses))
}

/// GET /api/v1/courses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Course>> {
    let course = CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Course",
            id,
        })?;
    Ok(Json(course))
}

/// PUT /api/v1/courses/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCourse>,
) -> AppResult<Json<Course>> {
    input.validate()?;
    if let Some(semester) = &input.semester {
        check_semester(semester)?;
    }
    find_owned(&state, id, user.user_id, "update").await?;

    let course = CourseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Course",
            id,
        })?;
    Ok(Json(course))
}

/// DELETE /api/v1/courses/{id}
///
/// Removes the course along with its materials, customization profile, and
/// planning sheets (database-level cascade).
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_owned(&state, id, user.user_id, "delete").await?;
    CourseRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch a course and check the caller is its session lead.
pub(crate) async fn find_owned(
    state: &AppState,
    course_id: DbId,
    user_id: DbId,
    action: &str,
) -> AppResult<Course> {
    let course = CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        })?;
    if course.session_lead_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Not authorized to {action} this course"
        ))));
    }
    Ok(course)
}

fn check_semester(semester: &str) -> AppResult<()> {
    if SEMESTERS.contains(&semester) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid semester '{semester}'. Expected one of: {}",
            SEMESTERS.join(", ")
        ))
        .into())
    }
}
