//! Cross-subsystem integration tests.

pub mod properties;
