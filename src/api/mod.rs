//! HTTP surface: router, shared state and system handlers.

pub mod handlers;
pub mod routes;
pub mod state;
