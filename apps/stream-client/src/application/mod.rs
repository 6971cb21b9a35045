//! Application Layer - Port definitions.
//!
//! This layer contains the port interfaces that define how the client
//! core interacts with the underlying transport.

/// Port interfaces for the duplex transport.
pub mod ports;
