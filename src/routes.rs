use axum::{routing::get, Router};

use crate::{
    config::HttpConfig,
    handlers::{
        health_check,
        moods::{create_mood, delete_mood, get_mood_by_id, list_moods, update_mood},
    },
    middleware::apply_middleware,
    state::AppState,
};

/// Create the Axum router with all endpoints and middleware
pub fn create_router(state: AppState, http: &HttpConfig) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/api/moods", get(list_moods).post(create_mood))
        .route(
            "/api/moods/:id",
            get(get_mood_by_id).put(update_mood).delete(delete_mood),
        )
        .with_state(state);

    apply_middleware(router, http)
}
