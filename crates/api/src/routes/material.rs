//! Route definitions for the `/materials` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::material;
use crate::state::AppState;

/// Routes mounted at `/materials`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(material::upload))
        .route("/course/{course_id}", get(material::list_by_course))
        .route("/{id}", delete(material::delete))
}
