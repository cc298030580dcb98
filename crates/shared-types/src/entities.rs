//! # Core Ledger Primitives
//!
//! ## Units
//!
//! All monetary values are `Amount`s in the minor unit ("planck").
//! One coin is `ONE_COIN` planck. Amounts are signed so that a debit can be
//! expressed as a negative delta; stored balances are never negative.
//!
//! ## Identifiers
//!
//! Identifiers are the first 8 bytes of a SHA-256 digest read little-endian:
//! - `AccountId` from the account's public key
//! - `TransactionId` from the transaction's full hash

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::errors::ParseIdError;

/// Chain height.
pub type Height = u32;

/// Signed quantity in planck.
pub type Amount = i64;

/// A 32-byte account public key.
pub type PublicKey = [u8; 32];

/// A 64-byte transaction signature.
pub type Signature = [u8; 64];

/// A 32-byte SHA-256 digest.
pub type FullHash = [u8; 32];

/// Planck per coin.
pub const ONE_COIN: Amount = 100_000_000;

/// Smallest fee step once fees were reduced.
pub const FEE_QUANT: Amount = 735_000;

/// Upper bound on any single balance or transferred amount.
pub const MAX_BALANCE: Amount = 2_158_812_800 * ONE_COIN;

/// Compute the SHA-256 digest of `data`.
pub fn full_hash(data: &[u8]) -> FullHash {
    Sha256::digest(data).into()
}

/// Take the 64-bit identifier of a full hash.
pub fn id_from_full_hash(hash: &FullHash) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash[..8]);
    u64::from_le_bytes(bytes)
}

/// Render a public key as lowercase hex.
pub fn public_key_to_hex(key: &PublicKey) -> String {
    hex::encode(key)
}

/// Parse a public key from 64 hex characters.
pub fn public_key_from_hex(text: &str) -> Result<PublicKey, ParseIdError> {
    let bytes = hex::decode(text).map_err(|_| ParseIdError::InvalidPublicKey(text.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| ParseIdError::InvalidPublicKey(text.to_string()))
}

/// Ledger account identifier.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl AccountId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw 64-bit value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Derive the account id owning `public_key`.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Self(id_from_full_hash(&full_hash(public_key)))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ParseIdError::NotUnsigned(s.to_string()))
    }
}

impl From<u64> for AccountId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Transaction identifier.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TransactionId(pub u64);

impl TransactionId {
    /// Identifier of the transaction whose full hash is `hash`.
    pub fn from_full_hash(hash: &FullHash) -> Self {
        Self(id_from_full_hash(hash))
    }

    /// The raw 64-bit value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ParseIdError::NotUnsigned(s.to_string()))
    }
}
