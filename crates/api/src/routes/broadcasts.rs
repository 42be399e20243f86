use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::broadcasts;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(broadcasts::list).post(broadcasts::create))
        .route("/count", get(broadcasts::count))
        .route("/exists", get(broadcasts::exists))
        .route("/bulk-delete", post(broadcasts::bulk_delete))
        .route(
            "/{id}",
            get(broadcasts::get_one)
                .patch(broadcasts::update)
                .delete(broadcasts::delete),
        )
        .route("/{id}/send", post(broadcasts::send))
        .route("/{id}/watch", get(broadcasts::watch_one))
        .route(
            "/{id}/schedules",
            get(broadcasts::list_schedules).post(broadcasts::create_schedule),
        )
        .route(
            "/{id}/schedules/{schedule_id}",
            patch(broadcasts::update_schedule),
        )
        .route("/{id}/deliveries", get(broadcasts::list_deliveries))
        .route(
            "/{id}/deliveries/{delivery_id}",
            patch(broadcasts::record_delivery_outcome),
        )
}
