//! Route definitions for the `/planning` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::planning;
use crate::state::AppState;

/// Routes mounted at `/planning`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(planning::generate))
        .route("/course/{course_id}", get(planning::list_by_course))
        .route(
            "/course/{course_id}/week/{week_number}",
            get(planning::get_by_week),
        )
        .route(
            "/{id}",
            put(planning::update).delete(planning::delete),
        )
        .route("/{id}/regenerate", post(planning::regenerate))
}
