use axum::routing::{get, post};
use axum::Router;

use crate::handlers::item_reviews;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(item_reviews::list).post(item_reviews::create))
        .route("/queue", get(item_reviews::queue))
        .route("/my-queue", get(item_reviews::my_queue))
        .route("/count", get(item_reviews::count))
        .route("/exists", get(item_reviews::exists))
        .route("/bulk-delete", post(item_reviews::bulk_delete))
        .route(
            "/{id}",
            get(item_reviews::get_one).delete(item_reviews::delete),
        )
        .route("/{id}/start-review", post(item_reviews::start_review))
        .route("/{id}/decision", post(item_reviews::decision))
        .route("/{id}/appeal", post(item_reviews::appeal))
        .route(
            "/{id}/start-appeal-review",
            post(item_reviews::start_appeal_review),
        )
        .route("/{id}/appeal-decision", post(item_reviews::appeal_decision))
        .route("/{id}/watch", get(item_reviews::watch_one))
}
