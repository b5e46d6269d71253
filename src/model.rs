//! Data model for checkout blocks: payload, block header and fingerprinting.

use serde::{Deserialize, Serialize};

use crate::crypto::hash_concat;

/// What a block records: one book checked out by one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutPayload {
    pub book_id: String,
    pub user: String,
    /// Opaque to the chain; never parsed.
    pub checkout_date: String,
    /// True only for the block at index 0.
    pub is_genesis: bool,
}

impl CheckoutPayload {
    pub fn new(
        book_id: impl Into<String>,
        user: impl Into<String>,
        checkout_date: impl Into<String>,
    ) -> Self {
        Self {
            book_id: book_id.into(),
            user: user.into(),
            checkout_date: checkout_date.into(),
            is_genesis: false,
        }
    }

    /// Compact JSON in declaration order. This is the byte form the fingerprint covers.
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(self).expect("payload serializes: only strings and a bool")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// 0 for genesis, then +1 per block.
    pub index: u64,
    /// Opaque timestamp supplied by the ledger clock.
    pub timestamp: String,
    pub data: CheckoutPayload,
    /// SHA-256 hex over (index, timestamp, canonical data, prev_hash).
    pub hash: String,
    /// `hash` of the preceding block; empty for genesis.
    pub prev_hash: String,
}

impl Block {
    fn sealed(index: u64, timestamp: String, data: CheckoutPayload, prev_hash: String) -> Self {
        let mut block = Block {
            index,
            timestamp,
            data,
            hash: String::new(),
            prev_hash,
        };
        block.hash = compute_block_hash(&block);
        block
    }

    /// The root block: index 0, no predecessor, `is_genesis` set.
    pub fn genesis(timestamp: impl Into<String>) -> Self {
        let data = CheckoutPayload {
            is_genesis: true,
            ..CheckoutPayload::default()
        };
        Self::sealed(0, timestamp.into(), data, String::new())
    }

    /// Recompute the fingerprint from the stored fields and compare.
    pub fn has_valid_hash(&self) -> bool {
        compute_block_hash(self) == self.hash
    }
}

/// Compute a block hash from its header fields.
/// Included, in order: decimal index, timestamp, canonical data JSON, prev_hash.
/// The stored `hash` field itself is ignored.
pub fn compute_block_hash(b: &Block) -> String {
    hash_concat(&[
        b.index.to_string().as_bytes(),
        b.timestamp.as_bytes(),
        b.data.canonical_json().as_bytes(),
        b.prev_hash.as_bytes(),
    ])
}

/// Build the successor of `prev` carrying `data`. Does not touch `prev`.
///
/// Saturates at `u64::MAX`; the validator rejects such a successor.
pub fn create_block(prev: &Block, data: CheckoutPayload, timestamp: impl Into<String>) -> Block {
    Block::sealed(prev.index.saturating_add(1), timestamp.into(), data, prev.hash.clone())
}
