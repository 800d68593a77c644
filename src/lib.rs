//! Taskhub: task management backend with an overdue sweep and cached
//! currency rates.
//!
//! # Architecture
//!
//! Taskhub follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, HTTP, memory)
//!
//! # Modules
//!
//! - [`task`]: Task records, CRUD service, and the overdue sweep
//! - [`currency`]: Upstream exchange rates behind a TTL cache
//! - [`api`]: REST endpoints over both services
//! - [`config`]: Command-line and environment configuration
//! - [`error`]: Error classification shared by the services

pub mod api;
pub mod config;
pub mod currency;
pub mod error;
pub mod task;

#[cfg(test)]
mod testing;
