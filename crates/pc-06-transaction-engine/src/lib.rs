//! # Transaction Engine Subsystem
//!
//! **Subsystem ID:** 6
//!
//! ## Purpose
//!
//! Decides whether a transaction may enter the unconfirmed pool, reserves its
//! cost against the sender's unconfirmed balance, commits its effect to
//! confirmed balances when a block closes, and releases the reservation if
//! the transaction leaves the pool instead.
//!
//! ## Lifecycle
//!
//! ```text
//! [constructed] ──validate──→ [validated] ──apply_unconfirmed──→ [reserved]
//!                                                                    │
//!                                        ┌───────── apply ───────────┤
//!                                        ↓                           └── undo_unconfirmed ──→ [released]
//!                                    [applied]
//! ```
//!
//! `start_new_block` resets per-block state before the next block's
//! admissions begin.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | One commitment removal per sender per block | `application/service.rs` - `apply_unconfirmed()` |
//! | Release is the exact inverse of reservation | `domain/transaction_types.rs` - `undo_unconfirmed()` |
//! | Fee floor | `application/service.rs` - `validate()` |
//! | Validation stops at the first failing appendage | `application/service.rs` - `validate()` |
//! | Appendages apply in declared order | `application/service.rs` - `apply()` |
//! | Bound key never changes | `pc-04-account-store` - `set_or_verify_key()` |
//!
//! ## Outbound Dependencies
//!
//! | Subsystem | Trait | Purpose |
//! |-----------|-------|---------|
//! | 4 (Account State) | `AccountStore` | Account lookup and balance mutation |
//! | 2 (Block Storage) | `BlockchainContext` | Current chain height |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  application/service.rs - TransactionEngine                    │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - TransactionEngineApi trait                │
//! │  ports/outbound.rs - BlockchainContext, AccountStore           │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/entities.rs          - Transaction, TransactionBuilder │
//! │  domain/appendages.rs        - Appendage trait, Message, ...   │
//! │  domain/attachments.rs       - Attachment (kind specific)      │
//! │  domain/transaction_types.rs - TransactionType, registry       │
//! │  domain/lifecycle.rs         - Tracked<S> (compile-time states)│
//! │  domain/errors.rs            - ValidationError, EngineError    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::*;
pub use config::{EngineConfig, FeeSchedule};
pub use domain::*;
pub use ports::*;
