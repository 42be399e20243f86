use axum::routing::{get, post};
use axum::Router;

use crate::handlers::coin_transaction_types;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(coin_transaction_types::list).post(coin_transaction_types::create),
        )
        .route("/count", get(coin_transaction_types::count))
        .route("/exists", get(coin_transaction_types::exists))
        .route("/bulk-delete", post(coin_transaction_types::bulk_delete))
        .route(
            "/{id}",
            get(coin_transaction_types::get_one)
                .patch(coin_transaction_types::update)
                .delete(coin_transaction_types::delete),
        )
}
