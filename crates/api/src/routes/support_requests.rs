use axum::routing::{get, post};
use axum::Router;

use crate::handlers::support_requests;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(support_requests::list).post(support_requests::create),
        )
        .route("/count", get(support_requests::count))
        .route("/exists", get(support_requests::exists))
        .route("/bulk-delete", post(support_requests::bulk_delete))
        .route(
            "/{id}",
            get(support_requests::get_one)
                .patch(support_requests::update)
                .delete(support_requests::delete),
        )
        .route("/{id}/watch", get(support_requests::watch_one))
}
