pub mod auth;
pub mod broadcasts;
pub mod coin_transaction_types;
pub mod dashboard;
pub mod devices;
pub mod event_types;
pub mod item_reviews;
pub mod notification_templates;
pub mod profiles;
pub mod support_requests;
pub mod user_reviews;
pub mod watch;
