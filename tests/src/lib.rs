//! # Capacity-Chain Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs              # Shared ledger setup
//! └── integration/             # Cross-subsystem flows
//!     ├── block_lifecycle.rs   # Engine + account store across blocks
//!     └── properties.rs        # Property tests for engine laws
//!
//! tests/benches/
//! └── engine_benchmarks.rs     # Criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p pc-tests
//!
//! # By category
//! cargo test -p pc-tests integration::block_lifecycle
//! cargo test -p pc-tests integration::properties
//!
//! # Benchmarks
//! cargo bench -p pc-tests
//! ```

pub mod fixtures;
pub mod integration;
