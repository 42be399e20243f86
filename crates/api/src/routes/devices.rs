use axum::routing::{get, post};
use axum::Router;

use crate::handlers::devices;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(devices::list).post(devices::create))
        .route("/count", get(devices::count))
        .route("/exists", get(devices::exists))
        .route("/bulk-delete", post(devices::bulk_delete))
        .route(
            "/{id}",
            get(devices::get_one)
                .patch(devices::update)
                .delete(devices::delete),
        )
}
