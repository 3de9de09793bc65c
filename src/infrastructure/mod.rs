//! Infrastructure layer - external integrations.

pub mod baostock_bridge;

pub use baostock_bridge::BaostockBridge;
