//! Route definitions for the `/settings` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/settings`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/course/{course_id}",
            get(settings::get_by_course).put(settings::upsert),
        )
        .route("/providers", get(settings::list_providers))
        .route("/providers/{provider}/test", post(settings::test_provider))
}
