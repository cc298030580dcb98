//! Ports layer for the Transaction Engine subsystem.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
