//! JSON-RPC tool protocol: envelope types and the method dispatcher.

pub mod protocol;
pub mod server;
