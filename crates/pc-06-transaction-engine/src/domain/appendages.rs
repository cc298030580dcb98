//! # Appendages
//!
//! A transaction carries an ordered list of appendages. Each one validates
//! its own content and applies its own confirmed-state effect:
//!
//! ```text
//! Transaction
//!   ├── [0] Attachment          (kind specific, always present)
//!   ├── [1] Message             (optional)
//!   └── [2] PublicKeyAnnouncement (optional)
//! ```
//!
//! Validation stops at the first failing appendage; application runs them
//! in the same order.

use pc_04_account_store::{Account, AccountError, AccountStore};
use shared_types::{AccountId, Height, PublicKey};
use std::fmt;
use tracing::debug;

use super::entities::Transaction;
use super::errors::ValidationError;

/// Read-only state available while validating.
pub struct ValidationContext<'a> {
    /// Current chain height
    pub height: Height,
    /// Maximum message length in bytes
    pub max_message_len: usize,
    /// Account state, for checks against existing accounts
    pub accounts: &'a dyn AccountStore,
}

/// A validate/apply capability carried by a transaction.
pub trait Appendage: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Serialized size in bytes; counts towards the fee.
    fn payload_len(&self) -> usize;

    /// Append the canonical encoding to `buf`.
    fn write_bytes(&self, buf: &mut Vec<u8>);

    fn validate(&self, tx: &Transaction, ctx: &ValidationContext<'_>)
        -> Result<(), ValidationError>;

    /// Apply the confirmed-state effect.
    ///
    /// `sender` and `recipient` are snapshots taken after the sender key
    /// was finalized and before the first appendage ran; all mutation goes
    /// through `store`.
    fn apply(
        &self,
        tx: &Transaction,
        sender: &Account,
        recipient: &Account,
        store: &dyn AccountStore,
    ) -> Result<(), AccountError>;
}

/// High bit of the message length header; set for text content.
const MESSAGE_TEXT_FLAG: u32 = 1 << 31;

/// Length header for a message of `len` bytes, `None` if `len` collides
/// with the text flag.
fn message_header(len: usize, is_text: bool) -> Option<u32> {
    let len = u32::try_from(len).ok().filter(|l| l & MESSAGE_TEXT_FLAG == 0)?;
    Some(if is_text { len | MESSAGE_TEXT_FLAG } else { len })
}

/// Free-form note attached to a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    bytes: Vec<u8>,
    is_text: bool,
}

impl Message {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            bytes: text.into().into_bytes(),
            is_text: true,
        }
    }

    pub fn binary(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            is_text: false,
        }
    }

    /// Raw constructor; text content is checked during validation.
    pub fn from_parts(bytes: Vec<u8>, is_text: bool) -> Self {
        Self { bytes, is_text }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_text(&self) -> bool {
        self.is_text
    }
}

impl Appendage for Message {
    fn name(&self) -> &'static str {
        "Message"
    }

    fn payload_len(&self) -> usize {
        4 + self.bytes.len()
    }

    fn write_bytes(&self, buf: &mut Vec<u8>) {
        // Unencodable lengths never pass validation; write a header that
        // keeps the text flag intact.
        let header = message_header(self.bytes.len(), self.is_text)
            .unwrap_or(MESSAGE_TEXT_FLAG - 1);
        buf.extend_from_slice(&header.to_le_bytes());
        buf.extend_from_slice(&self.bytes);
    }

    fn validate(
        &self,
        _tx: &Transaction,
        ctx: &ValidationContext<'_>,
    ) -> Result<(), ValidationError> {
        if message_header(self.bytes.len(), self.is_text).is_none() {
            return Err(ValidationError::InvalidAppendage {
                appendage: self.name(),
                reason: format!("length {} cannot be encoded", self.bytes.len()),
            });
        }
        if self.bytes.len() > ctx.max_message_len {
            return Err(ValidationError::InvalidAppendage {
                appendage: self.name(),
                reason: format!(
                    "length {} exceeds maximum {}",
                    self.bytes.len(),
                    ctx.max_message_len
                ),
            });
        }
        if self.is_text && std::str::from_utf8(&self.bytes).is_err() {
            return Err(ValidationError::InvalidAppendage {
                appendage: self.name(),
                reason: "text message is not valid UTF-8".to_string(),
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        _tx: &Transaction,
        _sender: &Account,
        _recipient: &Account,
        _store: &dyn AccountStore,
    ) -> Result<(), AccountError> {
        Ok(())
    }
}

/// Publishes the recipient's public key so it can be bound before the
/// recipient ever signs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKeyAnnouncement {
    public_key: PublicKey,
}

impl PublicKeyAnnouncement {
    pub fn new(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

impl Appendage for PublicKeyAnnouncement {
    fn name(&self) -> &'static str {
        "PublicKeyAnnouncement"
    }

    fn payload_len(&self) -> usize {
        32
    }

    fn write_bytes(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.public_key);
    }

    fn validate(
        &self,
        tx: &Transaction,
        ctx: &ValidationContext<'_>,
    ) -> Result<(), ValidationError> {
        if AccountId::from_public_key(&self.public_key) != tx.recipient_id() {
            return Err(ValidationError::InvalidAppendage {
                appendage: self.name(),
                reason: "announced public key does not match recipient id".to_string(),
            });
        }
        if let Some(recipient) = ctx.accounts.get(tx.recipient_id()) {
            if !recipient.accepts_key(&self.public_key) {
                return Err(ValidationError::NotCurrentlyValid(format!(
                    "account {} already has a different public key",
                    recipient.id()
                )));
            }
        }
        Ok(())
    }

    fn apply(
        &self,
        tx: &Transaction,
        _sender: &Account,
        recipient: &Account,
        store: &dyn AccountStore,
    ) -> Result<(), AccountError> {
        if store.set_or_verify_key(recipient.id(), &self.public_key, tx.height()) {
            debug!(account = %recipient.id(), height = tx.height(), "Announced public key bound");
            store.apply_key(recipient.id(), Some(&self.public_key), tx.height())?;
        }
        Ok(())
    }
}
