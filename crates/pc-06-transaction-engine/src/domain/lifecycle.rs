//! # Typed Transaction Lifecycle
//!
//! Encodes the engine state machine in the type system:
//!
//! ```text
//! [Validated] ──admit──→ [Reserved] ──commit──→ [Applied]
//!                             │
//!                             └── release ──→ [Released] ──into_transaction──→ validate again
//! ```
//!
//! Every transition consumes its input, so a value cannot be reserved
//! twice or both committed and released:
//!
//! ```ignore
//! let validated = Tracked::validate(&engine, tx)?;
//! let reserved = validated.admit(&mut engine).map_err(|_| "rejected")?;
//! let applied = reserved.commit(&mut engine)?;
//! // reserved.release(&mut engine);  // COMPILE ERROR: reserved already consumed
//! ```

use std::marker::PhantomData;

use super::entities::Transaction;
use super::errors::{EngineError, ValidationError};
use crate::ports::TransactionEngineApi;

// =============================================================================
// STATE MARKERS (Zero-Sized Types)
// =============================================================================

/// Marker: passed validation, holds no reservation.
#[derive(Debug, Clone, Copy)]
pub struct Validated;

/// Marker: unconfirmed balance reserved.
#[derive(Debug, Clone, Copy)]
pub struct Reserved;

/// Marker: committed to confirmed state (terminal).
#[derive(Debug, Clone, Copy)]
pub struct Applied;

/// Marker: reservation released (terminal).
#[derive(Debug, Clone, Copy)]
pub struct Released;

/// A transaction whose engine state is `S`.
#[derive(Debug)]
pub struct Tracked<S> {
    tx: Transaction,
    _state: PhantomData<S>,
}

impl<S> Tracked<S> {
    fn into_state<T>(self) -> Tracked<T> {
        Tracked {
            tx: self.tx,
            _state: PhantomData,
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }
}

impl Tracked<Validated> {
    /// The only entry point: run full validation.
    pub fn validate<E: TransactionEngineApi + ?Sized>(
        engine: &E,
        tx: Transaction,
    ) -> Result<Self, ValidationError> {
        engine.validate(&tx)?;
        Ok(Self {
            tx,
            _state: PhantomData,
        })
    }

    /// Reserve the transaction's cost; on rejection the validated value is
    /// handed back unchanged.
    pub fn admit<E: TransactionEngineApi + ?Sized>(
        self,
        engine: &mut E,
    ) -> Result<Tracked<Reserved>, Tracked<Validated>> {
        if engine.apply_unconfirmed(&self.tx) {
            Ok(self.into_state())
        } else {
            Err(self)
        }
    }
}

impl Tracked<Reserved> {
    pub fn commit<E: TransactionEngineApi + ?Sized>(
        self,
        engine: &mut E,
    ) -> Result<Tracked<Applied>, EngineError> {
        engine.apply(&self.tx)?;
        Ok(self.into_state())
    }

    pub fn release<E: TransactionEngineApi + ?Sized>(
        self,
        engine: &mut E,
    ) -> Result<Tracked<Released>, EngineError> {
        engine.undo_unconfirmed(&self.tx)?;
        Ok(self.into_state())
    }
}

impl Tracked<Released> {
    /// Give up tracking; the transaction must be validated again to re-enter.
    pub fn into_transaction(self) -> Transaction {
        self.tx
    }
}

impl Tracked<Applied> {
    pub fn into_transaction(self) -> Transaction {
        self.tx
    }
}
