use axum::routing::{get, post};
use axum::Router;

use crate::handlers::event_types;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(event_types::list).post(event_types::create))
        .route("/count", get(event_types::count))
        .route("/exists", get(event_types::exists))
        .route("/bulk-delete", post(event_types::bulk_delete))
        .route(
            "/{id}",
            get(event_types::get_one)
                .patch(event_types::update)
                .delete(event_types::delete),
        )
}
