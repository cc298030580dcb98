//! # pc-04-account-store
//!
//! Account State subsystem for Capacity-Chain.
//!
//! ## Role in System
//!
//! - **Single Source of Truth** for account records: public-key binding and
//!   the confirmed, unconfirmed, committed and forged balances.
//! - **Driven by the Transaction Engine (6)**: every balance change is made
//!   through the `AccountStore` port while admitting, committing or releasing
//!   a transaction.
//!
//! ## Balances
//!
//! ```text
//! balance              confirmed funds, changed only when a block commits
//! unconfirmed_balance  balance minus reservations of pooled transactions
//! committed_balance    funds locked as capacity commitment
//! forged_balance       total block rewards earned
//! ```
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | `balance >= 0` | `domain/balance.rs` - `check_balance()` |
//! | `unconfirmed_balance >= 0` | `domain/balance.rs` - `check_balance()` |
//! | `unconfirmed_balance <= balance` | `domain/balance.rs` - `check_balance()` |
//! | `committed_balance >= 0` | `domain/balance.rs` - `check_committed()` |
//! | Bound key never changes | `adapters/memory_store.rs` - `set_or_verify_key()` |

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
