use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notification_templates;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(notification_templates::list).post(notification_templates::create),
        )
        .route("/count", get(notification_templates::count))
        .route("/exists", get(notification_templates::exists))
        .route("/bulk-delete", post(notification_templates::bulk_delete))
        .route(
            "/{id}",
            get(notification_templates::get_one)
                .patch(notification_templates::update)
                .delete(notification_templates::delete),
        )
}
