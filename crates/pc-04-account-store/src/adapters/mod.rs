//! Adapters implementing the `AccountStore` port.

pub mod memory_store;

pub use memory_store::*;
