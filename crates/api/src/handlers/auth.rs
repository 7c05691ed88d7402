//! Handlers for the `/auth` resource (register, login, profile).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use planner_core::error::CoreError;
use planner_db::models::user::{CreateUser, User};
use planner_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub student_id: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account and return a token. Email and student id must both be
/// unused.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::Validation)?;

    let email = input.email.trim().to_lowercase();
    let student_id = input.student_id.trim().to_string();
    if email.is_empty() || student_id.is_empty() {
        return Err(CoreError::Validation("Email and student id are required".into()).into());
    }

    if UserRepo::find_by_email_or_student_id(&state.pool, &email, &student_id)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict(
            "User with this email or student ID already exists".into(),
        )
        .into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            password_hash,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            student_id,
        },
    )
    .await?;

    let token = generate_token(user.id, &user.email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            expires_in: state.config.jwt.expiry_secs(),
            user,
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns a token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = input.email.trim().to_lowercase();

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(CoreError::Unauthorized("Invalid email or password".into()).into());
    }

    let token = generate_token(user.id, &user.email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(AuthResponse {
        token,
        expires_in: state.config.jwt.expiry_secs(),
        user,
    }))
}

/// GET /api/v1/auth/profile
pub async fn profile(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<User>> {
    let user = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        })?;
    Ok(Json(user))
}
