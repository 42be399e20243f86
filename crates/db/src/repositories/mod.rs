//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` as the first argument. Generic listing (filters, search,
//! pagination, count, exists, bulk delete) lives in [`crate::listing`]; the
//! repositories add creation with audit stamping, COALESCE partial updates,
//! and entity-specific operations such as workflow transitions.

pub mod broadcast_repo;
pub mod coin_transaction_type_repo;
pub mod delivery_repo;
pub mod device_repo;
pub mod event_type_repo;
pub mod item_review_repo;
pub mod notification_template_repo;
pub mod profile_repo;
pub mod schedule_repo;
pub mod session_repo;
pub mod support_request_repo;
pub mod user_review_repo;

pub use broadcast_repo::BroadcastRepo;
pub use coin_transaction_type_repo::CoinTransactionTypeRepo;
pub use delivery_repo::DeliveryRepo;
pub use device_repo::DeviceRepo;
pub use event_type_repo::EventTypeRepo;
pub use item_review_repo::ItemReviewRepo;
pub use notification_template_repo::NotificationTemplateRepo;
pub use profile_repo::ProfileRepo;
pub use schedule_repo::ScheduleRepo;
pub use session_repo::SessionRepo;
pub use support_request_repo::SupportRequestRepo;
pub use user_review_repo::UserReviewRepo;
