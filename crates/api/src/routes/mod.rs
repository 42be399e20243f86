//! Route tables for the versioned API.
//!
//! Everything except `/health` is mounted under `/api/v1`:
//!
//! | Prefix                      | Concern                              |
//! |-----------------------------|--------------------------------------|
//! | `/auth`                     | signup, login, refresh, logout, me   |
//! | `/profiles`                 | account administration               |
//! | `/event-types`              | notifiable event catalog             |
//! | `/notification-templates`   | template management                  |
//! | `/coin-transaction-types`   | Curby coin ledger configuration      |
//! | `/devices`                  | push registrations                   |
//! | `/support-requests`         | member support tickets               |
//! | `/broadcasts`               | announcements, schedules, deliveries |
//! | `/moderation/item-reviews`  | item report workflow                 |
//! | `/moderation/user-reviews`  | user report workflow                 |
//! | `/dashboard`                | headline statistics                  |

use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod broadcasts;
pub mod coin_transaction_types;
pub mod dashboard;
pub mod devices;
pub mod event_types;
pub mod health;
pub mod item_reviews;
pub mod notification_templates;
pub mod profiles;
pub mod support_requests;
pub mod user_reviews;

/// All routes mounted under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/profiles", profiles::router())
        .nest("/event-types", event_types::router())
        .nest("/notification-templates", notification_templates::router())
        .nest("/coin-transaction-types", coin_transaction_types::router())
        .nest("/devices", devices::router())
        .nest("/support-requests", support_requests::router())
        .nest("/broadcasts", broadcasts::router())
        .nest("/moderation/item-reviews", item_reviews::router())
        .nest("/moderation/user-reviews", user_reviews::router())
        .nest("/dashboard", dashboard::router())
}
