//! Domain Layer - Core client state types and business logic.
//!
//! This layer contains the connection and subscription state types
//! with no external dependencies beyond std.

/// Connection lifecycle state.
pub mod connection;

/// Single-slot subscription tracking.
pub mod subscription;
