pub mod auth;
pub mod course;
pub mod health;
pub mod material;
pub mod planning;
pub mod settings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/profile                                    current user (requires auth)
///
/// /courses                                         list, create
/// /courses/{id}                                    get, update, delete
///
/// /materials                                       upload (multipart)
/// /materials/course/{course_id}                    list for course
/// /materials/{id}                                  delete
///
/// /planning/generate                               generate sheet (POST)
/// /planning/course/{course_id}                     list for course
/// /planning/course/{course_id}/week/{week_number}  get by week
/// /planning/{id}                                   update, delete
/// /planning/{id}/regenerate                        regenerate (POST)
///
/// /settings/course/{course_id}                     get, upsert profile
/// /settings/providers                              provider configuration status
/// /settings/providers/{provider}/test              connectivity self-test (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/courses", course::router())
        .nest("/materials", material::router())
        .nest("/planning", planning::router())
        .nest("/settings", settings::router())
}
