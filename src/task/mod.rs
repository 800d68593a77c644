//! Task management for the task hub.
//!
//! Tasks carry a title, optional description and due date, and one of four
//! statuses. A background sweep moves elapsed, unfinished tasks to
//! `Overdue`. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
