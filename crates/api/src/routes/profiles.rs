use axum::routing::{get, post};
use axum::Router;

use crate::handlers::profiles;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(profiles::list).post(profiles::create))
        .route("/count", get(profiles::count))
        .route("/exists", get(profiles::exists))
        .route("/bulk-delete", post(profiles::bulk_delete))
        .route(
            "/{id}",
            get(profiles::get_one)
                .patch(profiles::update)
                .delete(profiles::delete),
        )
}
