//! Extension checks for a single candidate, and a full-chain audit.

use serde::Serialize;

use crate::error::Rejection;
use crate::model::Block;

/// May `candidate` be appended after `tail`?
///
/// Checks, in order:
/// 1. `candidate.index == tail.index + 1`
/// 2. `candidate.prev_hash == tail.hash`
/// 3. `candidate.hash` recomputes from the candidate's own fields
pub fn is_valid_extension(candidate: &Block, tail: &Block) -> Result<(), Rejection> {
    let expected = tail
        .index
        .checked_add(1)
        .ok_or(Rejection::IndexOverflow { tail: tail.index })?;
    if candidate.index != expected {
        return Err(Rejection::IndexMismatch {
            expected,
            got: candidate.index,
        });
    }
    if candidate.prev_hash != tail.hash {
        return Err(Rejection::BrokenLink {
            index: candidate.index,
        });
    }
    if !candidate.has_valid_hash() {
        return Err(Rejection::HashMismatch {
            index: candidate.index,
        });
    }
    Ok(())
}

pub fn is_valid_block(candidate: &Block, tail: &Block) -> bool {
    is_valid_extension(candidate, tail).is_ok()
}

/// One problem found while auditing a whole chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Position in the sequence (not the block's claimed index).
    pub position: usize,
    pub description: String,
}

/// Walk the chain from genesis and report every integrity problem.
pub fn verify_chain(blocks: &[Block]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut report = |position: usize, description: String| {
        violations.push(Violation {
            position,
            description,
        })
    };

    let Some(genesis) = blocks.first() else {
        report(0, "chain is empty".into());
        return violations;
    };
    if genesis.index != 0 {
        report(0, format!("genesis index is {}", genesis.index));
    }
    if !genesis.prev_hash.is_empty() {
        report(0, "genesis prev_hash should be empty".into());
    }
    if !genesis.data.is_genesis {
        report(0, "first block is not flagged genesis".into());
    }
    if !genesis.has_valid_hash() {
        report(0, "genesis hash mismatch".into());
    }

    for (i, pair) in blocks.windows(2).enumerate() {
        let (prev, cur) = (&pair[0], &pair[1]);
        if let Err(e) = is_valid_extension(cur, prev) {
            report(i + 1, e.to_string());
        }
        if cur.data.is_genesis {
            report(i + 1, format!("block {} flagged genesis", cur.index));
        }
    }

    violations
}
