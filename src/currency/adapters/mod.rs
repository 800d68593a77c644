//! Adapter implementations for currency ports.

pub mod http;
pub mod memory;
