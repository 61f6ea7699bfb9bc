//! Multi-element proof replay (sorted-pair hashing only).
//!
//! The witness drives a ring queue of `k` digests, one per claimed
//! element, supplied in strictly decreasing index order. Two 256-bit
//! words, `flags` and `skips`, encode one step per bit:
//!
//! | skip | flag | step |
//! |------|------|------|
//! | 0 | 0 | combine the queue front with the next decommitment |
//! | 0 | 1 | combine the two front queue entries with each other |
//! | 1 | 0 | carry the front entry up unchanged (absent right sibling) |
//! | 1 | 1 | terminate — the last written slot is the element root |
//!
//! Because `pair_hash` canonicalizes operand order, no step needs a
//! left/right position bit; this encoding is therefore only sound for
//! sorted-pair roots. A full lap of the queue corresponds to climbing
//! one tree level.
//!
//! The update fold shadows the queue with a second one of the same size,
//! driven by the same bits and the same decommitments.

use crate::bits::{bitmap_get, BITMAP_BITS};
use crate::error::{ProofError, ProofResult};
use crate::hash::{pair_hash, Digest32};

/// Replay a multi proof, reducing `queue` to the element root.
///
/// `queue` holds the leaf digests of the claimed elements, highest index
/// first. Missing decommitments or a bitmap with no terminator within
/// 256 steps are rejected; the on-chain ancestor of this routine would
/// instead run out of gas.
pub(crate) fn fold_multi(
    queue: &mut [Digest32],
    flags: &Digest32,
    skips: &Digest32,
    decommitments: &[Digest32],
) -> ProofResult<Digest32> {
    let k = queue.len();
    debug_assert!(k > 0);
    let mut read = 0usize;
    let mut write = 0usize;
    let mut di = 0usize;

    for step in 0..BITMAP_BITS {
        let skip = bitmap_get(skips, step);
        let flag = bitmap_get(flags, step);

        if skip {
            if flag {
                let last = if write == 0 { k - 1 } else { write - 1 };
                return Ok(queue[last]);
            }
            queue[write] = queue[read];
            read = (read + 1) % k;
            write = (write + 1) % k;
            continue;
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

/// Replay a multi proof over two queues in lockstep, returning
/// `(old_element_root, new_element_root)`.
pub(crate) fn fold_multi_update(
    queue: &mut [Digest32],
    update_queue: &mut [Digest32],
    flags: &Digest32,
    skips: &Digest32,
    decommitments: &[Digest32],
) -> ProofResult<(Digest32, Digest32)> {
    let k = queue.len();
    debug_assert!(k > 0 && update_queue.len() == k);
    let mut read = 0usize;
    let mut write = 0usize;
    let mut di = 0usize;

    for step in 0..BITMAP_BITS {
        let skip = bitmap_get(skips, step);
        let flag = bitmap_get(flags, step);

        if skip {
            if flag {
                let last = if write == 0 { k - 1 } else { write - 1 };
                return Ok((queue[last], update_queue[last]));
            }
            queue[write] = queue[read];
            update_queue[write] = update_queue[read];
            read = (read + 1) % k;
            write = (write + 1) % k;
            continue;
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
