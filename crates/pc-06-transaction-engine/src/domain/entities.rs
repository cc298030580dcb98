//! Transaction entity and builder.

use serde::{Deserialize, Serialize};
use shared_types::{
    full_hash, AccountId, Amount, FullHash, Height, PublicKey, Signature, TransactionId,
};
use std::fmt;
use std::sync::Arc;

use super::appendages::{Appendage, Message, PublicKeyAnnouncement};
use super::attachments::Attachment;

/// Discriminator selecting per-kind transaction behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    OrdinaryPayment,
    ArbitraryMessage,
    AddCommitment,
    RemoveCommitment,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 4] = [
        Self::OrdinaryPayment,
        Self::ArbitraryMessage,
        Self::AddCommitment,
        Self::RemoveCommitment,
    ];

    /// Wire `(type, subtype)` pair.
    pub fn type_code(self) -> (u8, u8) {
        match self {
            Self::OrdinaryPayment => (0, 0),
            Self::ArbitraryMessage => (1, 0),
            Self::AddCommitment => (20, 1),
            Self::RemoveCommitment => (20, 2),
        }
    }

    /// Stable snake_case name, used as a metrics label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OrdinaryPayment => "ordinary_payment",
            Self::ArbitraryMessage => "arbitrary_message",
            Self::AddCommitment => "add_commitment",
            Self::RemoveCommitment => "remove_commitment",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable transaction.
///
/// The attachment is always the first appendage, and the kind is read from
/// it. Use `TransactionBuilder` to construct one.
#[derive(Clone, Debug)]
pub struct Transaction {
    id: TransactionId,
    full_hash: FullHash,
    sender_id: AccountId,
    recipient_id: AccountId,
    sender_public_key: Option<PublicKey>,
    signature: Option<Signature>,
    fee: Amount,
    height: Height,
    timestamp: u32,
    attachment: Attachment,
    appendages: Vec<Arc<dyn Appendage>>,
}

impl Transaction {
    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn full_hash(&self) -> &FullHash {
        &self.full_hash
    }

    pub fn sender_id(&self) -> AccountId {
        self.sender_id
    }

    pub fn recipient_id(&self) -> AccountId {
        self.recipient_id
    }

    pub fn sender_public_key(&self) -> Option<&PublicKey> {
        self.sender_public_key.as_ref()
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    pub fn fee(&self) -> Amount {
        self.fee
    }

    pub fn height(&self) -> Height {
        self.height
    }

    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    pub fn kind(&self) -> TransactionKind {
        self.attachment.kind()
    }

    pub fn attachment(&self) -> &Attachment {
        &self.attachment
    }

    /// Amount moved by the attachment, 0 if it moves none.
    pub fn amount(&self) -> Amount {
        self.attachment.amount()
    }

    /// All appendages in application order, attachment first.
    pub fn appendages(&self) -> &[Arc<dyn Appendage>] {
        &self.appendages
    }

    /// Total appendage payload in bytes.
    pub fn payload_len(&self) -> usize {
        self.appendages.iter().map(|a| a.payload_len()).sum()
    }

    /// Canonical bytes, signature included (zeroed if absent).
    pub fn bytes(&self) -> Vec<u8> {
        let mut buf = unsigned_bytes(
            self.kind(),
            self.timestamp,
            self.height,
            self.sender_public_key.as_ref(),
            self.sender_id,
            self.recipient_id,
            self.fee,
            &self.appendages,
        );
        buf.extend_from_slice(self.signature.as_ref().unwrap_or(&[0u8; 64]));
        buf
    }
}

#[allow(clippy::too_many_arguments)]
fn unsigned_bytes(
    kind: TransactionKind,
    timestamp: u32,
    height: Height,
    sender_public_key: Option<&PublicKey>,
    sender_id: AccountId,
    recipient_id: AccountId,
    fee: Amount,
    appendages: &[Arc<dyn Appendage>],
) -> Vec<u8> {
    let (type_byte, subtype) = kind.type_code();
    let mut buf = Vec::with_capacity(128);
    buf.push(type_byte);
    buf.push(subtype);
    buf.extend_from_slice(&timestamp.to_le_bytes());
    buf.extend_from_slice(&height.to_le_bytes());
    buf.extend_from_slice(sender_public_key.unwrap_or(&[0u8; 32]));
    buf.extend_from_slice(&sender_id.get().to_le_bytes());
    buf.extend_from_slice(&recipient_id.get().to_le_bytes());
    buf.extend_from_slice(&fee.to_le_bytes());
    for appendage in appendages {
        appendage.write_bytes(&mut buf);
    }
    buf
}

/// Builder for `Transaction`.
///
/// ```rust,ignore
/// let tx = TransactionBuilder::new(Attachment::OrdinaryPayment { amount: 5 * ONE_COIN })
///     .sender_public_key(key)
///     .recipient(bob)
///     .fee(FEE_QUANT)
///     .height(600_000)
///     .signature(sig)
///     .build();
/// ```
pub struct TransactionBuilder {
    sender_id: AccountId,
    recipient_id: AccountId,
    sender_public_key: Option<PublicKey>,
    signature: Option<Signature>,
    fee: Amount,
    height: Height,
    timestamp: u32,
    attachment: Attachment,
    appendages: Vec<Arc<dyn Appendage>>,
}

impl TransactionBuilder {
    pub fn new(attachment: Attachment) -> Self {
        Self {
            sender_id: AccountId::default(),
            recipient_id: AccountId::default(),
            sender_public_key: None,
            signature: None,
            fee: 0,
            height: 0,
            timestamp: 0,
            attachment,
            appendages: Vec::new(),
        }
    }

    /// Set the sender key; the sender id is derived from it.
    pub fn sender_public_key(mut self, key: PublicKey) -> Self {
        self.sender_id = AccountId::from_public_key(&key);
        self.sender_public_key = Some(key);
        self
    }

    /// Set the sender id for a transaction carrying no sender key.
    pub fn sender(mut self, id: AccountId) -> Self {
        self.sender_id = id;
        self.sender_public_key = None;
        self
    }

    pub fn recipient(mut self, id: AccountId) -> Self {
        self.recipient_id = id;
        self
    }

    pub fn fee(mut self, fee: Amount) -> Self {
        self.fee = fee;
        self
    }

    pub fn height(mut self, height: Height) -> Self {
        self.height = height;
        self
    }

    pub fn timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    pub fn message(self, message: Message) -> Self {
        self.appendage(Arc::new(message))
    }

    pub fn announce_public_key(self, public_key: PublicKey) -> Self {
        self.appendage(Arc::new(PublicKeyAnnouncement::new(public_key)))
    }

    /// Append an optional appendage after those already added.
    pub fn appendage(mut self, appendage: Arc<dyn Appendage>) -> Self {
        self.appendages.push(appendage);
        self
    }

    pub fn build(self) -> Transaction {
        let mut appendages: Vec<Arc<dyn Appendage>> = Vec::with_capacity(self.appendages.len() + 1);
        appendages.push(Arc::new(self.attachment));
        appendages.extend(self.appendages);

        let mut bytes = unsigned_bytes(
            self.attachment.kind(),
            self.timestamp,
            self.height,
            self.sender_public_key.as_ref(),
            self.sender_id,
            self.recipient_id,
            self.fee,
            &appendages,
        );
        bytes.extend_from_slice(self.signature.as_ref().unwrap_or(&[0u8; 64]));
        let hash = full_hash(&bytes);

        Transaction {
            id: TransactionId::from_full_hash(&hash),
            full_hash: hash,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            sender_public_key: self.sender_public_key,
            signature: self.signature,
            fee: self.fee,
            height: self.height,
            timestamp: self.timestamp,
            attachment: self.attachment,
            appendages,
        }
    }
}
