//! Step definitions for overdue sweep scenarios.

mod given;
