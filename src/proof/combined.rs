//! Combined proofs: derive an append witness while replaying a multi proof.
//!
//! A combined proof is an ordinary multi proof whose index set reaches
//! far enough right that its replay walks the whole append frontier. The
//! derivation tracks which queue slot currently holds the path of the
//! highest claimed element; every time that slot reaches the queue front
//! on a level where the element count has a 1-bit, the frontier node for
//! that level is visible to the replay and gets snapshotted:
//!
//! - carry step — the tracked node *is* the frontier node;
//! - queue-merge step — the frontier node is the next queue entry;
//! - decommitment step — it is the pending witness word.
//!
//! Snapshots land deepest-last, exactly the wire order of an append
//! witness. When the count is a power of two the frontier is the element
//! root itself and is filled in at termination. The derived witness is
//! then re-folded and must reproduce the reconstructed element root;
//! anything else — including an index set below
//! [`minimum_combined_index`] — is an invalid proof.

use crate::bits::{bitmap_get, frontier_size, BITMAP_BITS};
use crate::error::{ProofError, ProofResult};
use crate::hash::{pair_hash, Digest32, HashMode};

use super::append::fold_frontier;

/// Smallest element index whose inclusion in a multi proof guarantees
/// the replay touches every frontier subtree of a tree of `count`
/// elements (clears the lowest set bit of the count).
#[inline]
pub fn minimum_combined_index(count: u32) -> u32 {
    if count == 0 {
        return 0;
    }
    count & (count - 1)
}

/// Per-level frontier snapshots, kept alongside the multi replay.
struct FrontierTrace {
    snaps: Vec<Option<Digest32>>,
    /// Next slot to fill is `snaps[fill - 1]`; slots fill deepest-first.
    fill: usize,
    /// Bits of the element count not yet consumed; LSB = current level.
    level_bits: u32,
    /// Queue slot holding the tracked (highest-index) element's path.
    track: usize,
}

impl FrontierTrace {
    fn new(count: u32) -> Self {
        let m = frontier_size(count) as usize;
        Self {
            snaps: vec![None; m],
            fill: m,
            level_bits: count,
            track: 0,
        }
    }

    /// Record the frontier node for the current level, if one exists.
    fn snapshot(&mut self, node: Digest32) -> ProofResult<()> {
        if self.level_bits & 1 == 1 {
            if self.fill == 0 {
                return Err(ProofError::InvalidProof);
            }
            self.fill -= 1;
            self.snaps[self.fill] = Some(node);
        }
        self.level_bits >>= 1;
        Ok(())
    }

    /// Validate and seal the trace against the reconstructed element root.
    fn finish(mut self, element_root: &Digest32) -> ProofResult<Vec<Digest32>> {
        // A power-of-two count never steps onto its only frontier level;
        // the frontier is the element root itself.
        if self.fill == 1 && self.snaps[0].is_none() {
            self.snaps[0] = Some(*element_root);
        }
        let mut frontier = Vec::with_capacity(self.snaps.len());
        for s in self.snaps {
            frontier.push(s.ok_or(ProofError::InvalidProof)?);
        }
        if fold_frontier(HashMode::SortedPair, &frontier)? != *element_root {
            return Err(ProofError::InvalidProof);
        }
        Ok(frontier)
    }
}

/// Replay a multi proof and derive the append witness of the same tree.
///
/// Returns `(element_root, frontier_decommitments)`.
pub(crate) fn fold_multi_frontier(
    queue: &mut [Digest32],
    count: u32,
    flags: &Digest32,
    skips: &Digest32,
    decommitments: &[Digest32],
) -> ProofResult<(Digest32, Vec<Digest32>)> {
    let k = queue.len();
    debug_assert!(k > 0 && count > 0);
    let mut trace = FrontierTrace::new(count);
    let mut read = 0usize;
    let mut write = 0usize;
    let mut di = 0usize;

    for step in 0..BITMAP_BITS {
        let skip = bitmap_get(skips, step);
        let flag = bitmap_get(flags, step);

        if skip {
            if flag {
                let last = if write == 0 { k - 1 } else { write - 1 };
                let root = queue[last];
                let frontier = trace.finish(&root)?;
                return Ok((root, frontier));
            }
            if read == trace.track {
                trace.snapshot(queue[read])?;
                trace.track = write;
            }
            queue[write] = queue[read];
            read = (read + 1) % k;
            write = (write + 1) % k;
            continue;
        }

        if read == trace.track {
            let node = if flag {
                queue[(read + 1) % k]
            } else {
                *decommitments.get(di).ok_or(ProofError::InvalidProof)?
            };
            trace.snapshot(node)?;
            trace.track = write;
        }

        let right = if flag {
            let r = queue[read];
            read = (read + 1) % k;
            r
        } else {
            let d = *decommitments.get(di).ok_or(ProofError::InvalidProof)?;
            di += 1;
            d
        };

        queue[write] = pair_hash(&queue[read], &right);
        read = (read + 1) % k;
        write = (write + 1) % k;
    }

    Err(ProofError::InvalidProof)
}

/// Update-flavored [`fold_multi_frontier`]: two queues in lockstep, with
/// the frontier snapshotted from the *updated* side (the append happens
/// after the rewrite, so its witness must reflect the new digests).
///
/// Returns `(old_element_root, frontier_of_updated_tree)`.
pub(crate) fn fold_multi_update_frontier(
    queue: &mut [Digest32],
    update_queue: &mut [Digest32],
    count: u32,
    flags: &Digest32,
    skips: &Digest32,
    decommitments: &[Digest32],
) -> ProofResult<(Digest32, Vec<Digest32>)> {
    let k = queue.len();
    debug_assert!(k > 0 && count > 0 && update_queue.len() == k);
    let mut trace = FrontierTrace::new(count);
    let mut read = 0usize;
    let mut write = 0usize;
    let mut di = 0usize;

    for step in 0..BITMAP_BITS {
        let skip = bitmap_get(skips, step);
        let flag = bitmap_get(flags, step);

        if skip {
            if flag {
                let last = if write == 0 { k - 1 } else { write - 1 };
                let frontier = trace.finish(&update_queue[last])?;
                return Ok((queue[last], frontier));
            }
            if read == trace.track {
                trace.snapshot(update_queue[read])?;
                trace.track = write;
            }
            queue[write] = queue[read];
            update_queue[write] = update_queue[read];
            read = (read + 1) % k;
            write = (write + 1) % k;
            continue;
        }

        if read == trace.track {
            let node = if flag {
                update_queue[(read + 1) % k]
            } else {
                *decommitments.get(di).ok_or(ProofError::InvalidProof)?
            };
            trace.snapshot(node)?;
            trace.track = write;
        }

        if flag {
            let next = (read + 1) % k;
            queue[write] = pair_hash(&queue[next], &queue[read]);
            update_queue[write] = pair_hash(&update_queue[next], &update_queue[read]);
            read = (read + 2) % k;
        } else {
            let d = *decommitments.get(di).ok_or(ProofError::InvalidProof)?;
            di += 1;
            queue[write] = pair_hash(&queue[read], &d);
            update_queue[write] = pair_hash(&update_queue[read], &d);
            read = (read + 1) % k;
        }
        write = (write + 1) % k;
    }

    Err(ProofError::InvalidProof)
}

/* ----------------------------------- Tests ----------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::bitmap_set;
    use crate::hash::{keccak256, leaf_hash};

    #[test]
    fn minimum_index_clears_lowest_bit() {
        let table: &[(u32, u32)] = &[
            (1, 0),
            (2, 0),
            (3, 2),
            (4, 0),
            (5, 4),
            (8, 0),
            (23, 22),
            (48, 32),
            (365, 364),
            (384, 256),
            (580, 576),
            (1792, 1536),
        ];
        for &(count, expect) in table {
            assert_eq!(minimum_combined_index(count), expect, "count {count}");
        }
        assert_eq!(minimum_combined_index(0), 0);
    }

    /// Five-leaf sorted-pair tree, multi proof over {4, 1}: the derived
    /// frontier must be [c(c01, c23), l4].
    #[test]
    fn derives_frontier_of_five() {
        let l: Vec<Digest32> = (0..5u8).map(|i| leaf_hash(&keccak256(&[i]))).collect();
        let c01 = pair_hash(&l[0], &l[1]);
        let c23 = pair_hash(&l[2], &l[3]);
        let quad = pair_hash(&c01, &c23);
        let root = pair_hash(&quad, &l[4]);

        // Steps: carry l4; decommit l0 against l1; carry; decommit c23;
        // queue-merge; terminate.
        let mut flags = [0u8; 32];
        let mut skips = [0u8; 32];
        for b in [4usize, 5] {
            bitmap_set(&mut flags, b);
        }
        for b in [0usize, 2, 5] {
            bitmap_set(&mut skips, b);
        }

        let mut queue = [l[4], l[1]];
        let (got_root, frontier) =
            fold_multi_frontier(&mut queue, 5, &flags, &skips, &[l[0], c23]).unwrap();
        assert_eq!(got_root, root);
        assert_eq!(frontier, vec![quad, l[4]]);
    }

    /// An index set that skips the frontier cannot fold back to the
    /// reconstructed root and must be rejected.
    #[test]
    fn low_index_set_is_rejected() {
        let l: Vec<Digest32> = (0..5u8).map(|i| leaf_hash(&keccak256(&[i]))).collect();
        let c23 = pair_hash(&l[2], &l[3]);

        // Multi proof over {1} alone (minimum combined index for 5 is 4):
        // decommit l0, decommit c23, decommit l4-as-carried, terminate.
        let mut flags = [0u8; 32];
        let mut skips = [0u8; 32];
        bitmap_set(&mut flags, 3);
        bitmap_set(&mut skips, 3);

        let mut queue = [l[1]];
        let got = fold_multi_frontier(&mut queue, 5, &flags, &skips, &[l[0], c23, l[4]]);
        assert_eq!(got, Err(ProofError::InvalidProof));
    }
}
