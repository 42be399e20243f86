//! Curby admin HTTP API.
//!
//! Axum server exposing the admin back-office surface: auth, per-entity CRUD
//! with the generic filter/sort/pagination/search contract, the moderation
//! workflow, broadcast fan-out, dashboard aggregates, and realtime row
//! watching over server-sent events.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
