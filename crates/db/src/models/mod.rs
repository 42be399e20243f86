//! Row structs and request/response DTOs, one module per entity area.
//!
//! Each module also carries the entity's static [`curby_core::filter::EntityMeta`]
//! table, which the listing layer uses to validate filters, ordering, and
//! search columns.

pub mod broadcast;
pub mod coin_transaction_type;
pub mod device;
pub mod event_type;
pub mod notification_template;
pub mod profile;
pub mod review;
pub mod session;
pub mod support_request;
