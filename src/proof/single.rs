//! Single-element proof replay.
//!
//! A single proof carries one decommitment per tree level that has a
//! sibling on the leaf's path. The replay climbs from the leaf with two
//! registers, `idx` (the leaf's position at the current level) and
//! `upper` (the last position at that level); a level where
//! `idx == upper` and `idx` is even has no right sibling — the digest is
//! carried up unchanged and no witness word is consumed. Decommitments
//! sit deepest-last in the witness, so consumption walks the slice
//! backwards.
//!
//! The update fold runs a second register through the identical
//! decisions, consuming the same witness words: equal siblings force an
//! equal tree shape, so the rewritten root differs from the old one only
//! along the touched path.

use crate::error::{ProofError, ProofResult};
use crate::hash::{node_hash, pair_hash, Digest32, HashMode};

#[inline]
fn step(mode: HashMode, idx: u32, decommitment: &Digest32, hash: &Digest32) -> Digest32 {
    match mode {
        HashMode::SortedPair => pair_hash(decommitment, hash),
        HashMode::Ordered if idx & 1 == 1 => node_hash(decommitment, hash),
        HashMode::Ordered => node_hash(hash, decommitment),
    }
}

/// Reconstruct the element root from a leaf at `index` in a tree of
/// `count` elements.
///
/// Total over malformed witnesses: a short slice folds to a digest that
/// will fail the committed-root comparison; a slice with words left over
/// once the tree runs out of levels is rejected.
pub(crate) fn fold_single(
    mode: HashMode,
    index: u32,
    leaf: &Digest32,
    count: u32,
    decommitments: &[Digest32],
) -> ProofResult<Digest32> {
    debug_assert!(count > 0);
    let mut hash = *leaf;
    let mut idx = index;
    let mut upper = count - 1;
    let mut di = decommitments.len();

    while di > 0 {
        if upper == 0 {
            return Err(ProofError::InvalidProof);
        }
        if idx != upper || idx & 1 == 1 {
            di -= 1;
            hash = step(mode, idx, &decommitments[di], &hash);
        }
        idx >>= 1;
        upper >>= 1;
    }
    Ok(hash)
}

/// Run the replay twice in lockstep: once for the current leaf and once
/// for its replacement. Returns `(old_element_root, new_element_root)`.
pub(crate) fn fold_single_update(
    mode: HashMode,
    index: u32,
    leaf: &Digest32,
    update_leaf: &Digest32,
    count: u32,
    decommitments: &[Digest32],
) -> ProofResult<(Digest32, Digest32)> {
    debug_assert!(count > 0);
    let mut hash = *leaf;
    let mut update_hash = *update_leaf;
    let mut idx = index;
    let mut upper = count - 1;
    let mut di = decommitments.len();

    while di > 0 {
        if upper == 0 {
            return Err(ProofError::InvalidProof);
        }
        if idx != upper || idx & 1 == 1 {
            di -= 1;
            let d = &decommitments[di];
            hash = step(mode, idx, d, &hash);
            update_hash = step(mode, idx, d, &update_hash);
        }
        idx >>= 1;
        upper >>= 1;
    }
    Ok((hash, update_hash))
}

/* ----------------------------------- Tests ----------------------------------- */
