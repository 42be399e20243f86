//! Domain layer for the Curby admin backend.
//!
//! This crate has no internal dependencies so it can be used by the DB and
//! API layers as well as any future CLI or worker tooling. It holds shared
//! types, the error taxonomy, the typed filter/sort/pagination DSL, the
//! multi-column search condition builder, and the moderation review state
//! machine.

pub mod error;
pub mod filter;
pub mod review;
pub mod search;
pub mod types;
