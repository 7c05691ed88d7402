//! Handlers for the `/materials` resource.
//!
//! Upload accepts a multipart form with a required `file` field plus the
//! material metadata fields. Text is extracted best-effort at upload time so
//! generation never has to re-read the stored file.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use planner_core::error::CoreError;
use planner_core::extract::{extract_text, is_supported_mime};
use planner_core::types::DbId;
use planner_db::models::material::{CourseMaterial, CreateCourseMaterial, MATERIAL_TYPES};
use planner_db::repositories::{CourseRepo, MaterialRepo};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/materials
///
/// Multipart fields: `file` (required), `course_id` (required), `title`
/// (required), `material_type` (required), `description`, `week_number`.
pub async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<CourseMaterial>)> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut course_id: Option<DbId> = None;
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut material_type: Option<String> = None;
    let mut week_number: Option<i32> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((file_name, mime_type, data.to_vec()));
            }
            "course_id" => course_id = Some(parse_field(&name, field).await?),
            "title" => title = Some(text_field(field).await?),
            "description" => description = Some(text_field(field).await?),
            "material_type" => material_type = Some(text_field(field).await?),
            "week_number" => week_number = Some(parse_field(&name, field).await?),
            _ => {} // ignore unknown fields
        }
    }

    let (file_name, mime_type, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    let course_id =
        course_id.ok_or_else(|| AppError::BadRequest("Missing required 'course_id' field".into()))?;
    let title =
        title.ok_or_else(|| AppError::BadRequest("Missing required 'title' field".into()))?;
    let material_type = material_type
        .ok_or_else(|| AppError::BadRequest("Missing required 'material_type' field".into()))?;

    if !is_supported_mime(&mime_type) {
        return Err(AppError::BadRequest(format!(
            "Unsupported file type '{mime_type}'. Supported: PDF, Word, plain text"
        )));
    }
    if !MATERIAL_TYPES.contains(&material_type.as_str()) {
        return Err(CoreError::Validation(format!(
            "Invalid material_type '{material_type}'. Expected one of: {}",
            MATERIAL_TYPES.join(", ")
        ))
        .into());
    }
    if data.len() > state.config.upload.max_file_size {
        return Err(AppError::BadRequest(format!(
            "File exceeds the maximum upload size of {} bytes",
            state.config.upload.max_file_size
        )));
    }
    if let Some(week) = week_number {
        if !(1..=52).contains(&week) {
            return Err(CoreError::Validation("week_number must be between 1 and 52".into()).into());
        }
    }

    CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        })?;

    let extracted_text = extract_text(&data, &mime_type);
    if extracted_text.is_empty() {
        tracing::warn!(%file_name, %mime_type, "No text extracted from uploaded material");
    }

    // Store under a collision-free name; the original name stays in the row.
    let extension = file_name.rsplit('.').next().unwrap_or("bin").to_lowercase();
    let stored_name = format!("material-{}.{extension}", Uuid::new_v4());
    let file_path = state.config.upload.dir.join(&stored_name);
    tokio::fs::create_dir_all(&state.config.upload.dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    tokio::fs::write(&file_path, &data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let material = MaterialRepo::create(
        &state.pool,
        &CreateCourseMaterial {
            course_id,
            uploaded_by: user.user_id,
            title,
            description,
            material_type,
            file_name,
            file_path: file_path.to_string_lossy().to_string(),
            file_size: data.len() as i64,
            mime_type,
            extracted_text: Some(extracted_text),
            week_number,
        },
    )
    .await?;

    tracing::info!(
        material_id = material.id,
        course_id,
        size_bytes = material.file_size,
        "Material uploaded",
    );
    Ok((StatusCode::CREATED, Json(material)))
}

/// GET /api/v1/materials/course/{course_id}
pub async fn list_by_course(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<Vec<CourseMaterial>>> {
    let materials = MaterialRepo::list_by_course(&state.pool, course_id).await?;
    Ok(Json(materials))
}

/// DELETE /api/v1/materials/{id}
///
/// Only the uploader may delete a material. The stored file is removed
/// best-effort after the row.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = MaterialRepo::delete_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "CourseMaterial",
            id,
        })?;

    if let Err(e) = tokio::fs::remove_file(&deleted.file_path).await {
        tracing::warn!(path = %deleted.file_path, error = %e, "Failed to remove stored file");
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

async fn parse_field<T: std::str::FromStr>(
    name: &str,
    field: axum::extract::multipart::Field<'_>,
) -> AppResult<T> {
    text_field(field)
        .await?
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid value for '{name}'")))
}
