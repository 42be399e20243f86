use axum::routing::{get, post};
use axum::Router;

use crate::handlers::user_reviews;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user_reviews::list).post(user_reviews::create))
        .route("/queue", get(user_reviews::queue))
        .route("/my-queue", get(user_reviews::my_queue))
        .route("/count", get(user_reviews::count))
        .route("/exists", get(user_reviews::exists))
        .route("/bulk-delete", post(user_reviews::bulk_delete))
        .route(
            "/{id}",
            get(user_reviews::get_one).delete(user_reviews::delete),
        )
        .route("/{id}/start-review", post(user_reviews::start_review))
        .route("/{id}/decision", post(user_reviews::decision))
        .route("/{id}/appeal", post(user_reviews::appeal))
        .route(
            "/{id}/start-appeal-review",
            post(user_reviews::start_appeal_review),
        )
        .route("/{id}/appeal-decision", post(user_reviews::appeal_decision))
        .route("/{id}/watch", get(user_reviews::watch_one))
}
