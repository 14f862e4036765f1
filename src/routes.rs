// routes.rs
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::handlers;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/polls/") }))
        .route("/polls/", get(handlers::index))
        .route("/polls/{question_id}/", get(handlers::detail))
        .route("/polls/{question_id}/results/", get(handlers::results))
        .route("/polls/{question_id}/vote/", post(handlers::vote))
        .route("/api/questions", get(handlers::list_questions))
        .route("/api/questions/{question_id}", get(handlers::get_question))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
