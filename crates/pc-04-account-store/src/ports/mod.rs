//! Ports layer for the Account State subsystem.

pub mod api;

pub use api::*;
