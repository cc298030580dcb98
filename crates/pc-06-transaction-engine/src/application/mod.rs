//! Application layer: the engine service implementing `TransactionEngineApi`.

pub mod service;

pub use service::*;
