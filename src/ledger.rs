//! The in-memory chain store. One lock guards every read and write.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::clock::Clock;
use crate::error::{LedgerError, Rejection};
use crate::model::{create_block, Block, CheckoutPayload};
use crate::validation::{is_valid_extension, verify_chain, Violation};

/// Append-only chain of checkout blocks, never empty.
///
/// Every operation holds `blocks` for its full duration, so concurrent
/// appends serialize against the true tail and a snapshot never sees a
/// half-built block.
pub struct Ledger {
    blocks: Mutex<Vec<Block>>,
    clock: Arc<dyn Clock>,
}

impl Ledger {
    /// New chain holding only the genesis block.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let genesis = Block::genesis(clock.now());
        tracing::debug!(hash = %genesis.hash, "genesis block created");
        Self {
            blocks: Mutex::new(vec![genesis]),
            clock,
        }
    }

    /// Build a block for `data` on top of the current tail and append it.
    pub fn append(&self, data: CheckoutPayload) -> Result<Block, LedgerError> {
        let mut blocks = self.blocks.lock();
        let candidate = create_block(tail_of(&blocks), data, self.clock.now());
        Self::push_checked(&mut blocks, candidate)
    }

    /// Append a block built elsewhere, if it validly extends the tail.
    pub fn submit(&self, candidate: Block) -> Result<Block, LedgerError> {
        let mut blocks = self.blocks.lock();
        Self::push_checked(&mut blocks, candidate)
    }

    fn push_checked(blocks: &mut Vec<Block>, candidate: Block) -> Result<Block, LedgerError> {
        let checked = if candidate.data.is_genesis {
            Err(Rejection::StrayGenesis {
                index: candidate.index,
            })
        } else {
            is_valid_extension(&candidate, tail_of(blocks))
        };
        if let Err(reason) = checked {
            tracing::warn!(index = candidate.index, %reason, "candidate block rejected");
            return Err(reason.into());
        }
        tracing::debug!(index = candidate.index, hash = %candidate.hash, "block appended");
        blocks.push(candidate.clone());
        Ok(candidate)
    }

    /// Copy of the full chain, genesis first.
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks.lock().clone()
    }

    pub fn tail(&self) -> Block {
        tail_of(&self.blocks.lock()).clone()
    }

    pub fn len(&self) -> usize {
        self.blocks.lock().len()
    }

    /// Audit the whole chain; empty means intact.
    pub fn verify(&self) -> Vec<Violation> {
        verify_chain(&self.snapshot())
    }

    /// Write every block to the log. Reads through `snapshot`.
    pub fn print_chain(&self) {
        for block in self.snapshot() {
            tracing::info!(
                index = block.index,
                timestamp = %block.timestamp,
                data = %block.data.canonical_json(),
                hash = %block.hash,
                prev_hash = %block.prev_hash,
                "block"
            );
        }
    }
}

fn tail_of(blocks: &[Block]) -> &Block {
    blocks
        .last()
        .expect("ledger always holds genesis: new() seeds it and nothing removes blocks")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn ledger() -> Ledger {
        Ledger::new(Arc::new(FixedClock("now".into())))
    }

    #[test]
    fn new_chain_is_just_genesis() {
        let l = ledger();
        let blocks = l.snapshot();
        assert_eq!(blocks.len(), 1);
        let g = &blocks[0];
        assert!(g.data.is_genesis);
        assert_eq!(g.index, 0);
        assert!(g.prev_hash.is_empty());
    }

    #[test]
    fn first_checkout_links_to_genesis() {
        let l = ledger();
        let g = l.tail();
        let b = l
            .append(CheckoutPayload::new("b1", "alice", "2024-01-01"))
            .unwrap();
        assert_eq!(l.len(), 2);
        let blocks = l.snapshot();
        assert_eq!(blocks[1], b);
        assert_eq!(b.index, 1);
        assert_eq!(b.prev_hash, g.hash);
        assert!(!b.data.is_genesis);
    }

    #[test]
    fn n_appends_give_contiguous_indices() {
        let l = ledger();
        for i in 0..25 {
            l.append(CheckoutPayload::new(format!("b{i}"), "bob", "2024-02-02"))
                .unwrap();
        }
        let blocks = l.snapshot();
        assert_eq!(blocks.len(), 26);
        for (pos, b) in blocks.iter().enumerate() {
            assert_eq!(b.index, pos as u64);
        }
        for pair in blocks.windows(2) {
            assert!(is_valid_extension(&pair[1], &pair[0]).is_ok());
        }
        assert!(l.verify().is_empty());
    }

    #[test]
    fn forged_candidate_leaves_chain_unchanged() {
        let l = ledger();
        l.append(CheckoutPayload::new("b1", "alice", "d")).unwrap();
        let before = l.snapshot();

        let mut fake_tail = l.tail();
        fake_tail.hash = "0".repeat(64);
        let forged = create_block(&fake_tail, CheckoutPayload::new("b2", "mallory", "d"), "now");

        assert_eq!(
            l.submit(forged),
            Err(LedgerError::Rejected(Rejection::BrokenLink { index: 2 }))
        );
        assert_eq!(l.snapshot(), before);
    }

    #[test]
    fn second_genesis_flag_is_refused() {
        let l = ledger();
        let data = CheckoutPayload {
            is_genesis: true,
            ..CheckoutPayload::new("b1", "mallory", "d")
        };
        // links and hashes correctly; only the flag is wrong
        let candidate = create_block(&l.tail(), data, "now");
        assert!(is_valid_extension(&candidate, &l.tail()).is_ok());

        assert_eq!(
            l.submit(candidate),
            Err(LedgerError::Rejected(Rejection::StrayGenesis { index: 1 }))
        );
        assert_eq!(l.len(), 1);
        assert!(l.verify().is_empty());
    }

    #[test]
    fn stale_candidate_is_rejected_after_tail_moves() {
        let l = ledger();
        let stale = create_block(&l.tail(), CheckoutPayload::new("b1", "alice", "d"), "now");
        l.append(CheckoutPayload::new("b2", "bob", "d")).unwrap();
        assert!(matches!(
            l.submit(stale),
            Err(LedgerError::Rejected(Rejection::IndexMismatch { expected: 2, got: 1 }))
        ));
        assert_eq!(l.len(), 2);
    }

    #[test]
    fn externally_built_valid_block_is_accepted() {
        let l = ledger();
        let b = create_block(&l.tail(), CheckoutPayload::new("b1", "alice", "d"), "client-time");
        assert_eq!(l.submit(b.clone()), Ok(b));
        assert_eq!(l.len(), 2);
    }

    #[test]
    fn snapshot_is_a_copy() {
        let l = ledger();
        let mut snap = l.snapshot();
        snap[0].data.user = "mallory".into();
        snap.clear();
        assert_eq!(l.len(), 1);
        assert!(l.verify().is_empty());
    }

    #[test]
    fn concurrent_appends_serialize() {
        let l = Arc::new(ledger());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let l = Arc::clone(&l);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        l.append(CheckoutPayload::new(format!("b{t}-{i}"), "u", "d"))
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(l.len(), 401);
        assert!(l.verify().is_empty());
    }
}
