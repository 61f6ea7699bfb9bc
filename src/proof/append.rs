//! Append proof replay.
//!
//! An append witness is the right frontier of the current tree: the
//! roots of the `frontier_size(N)` perfect subtrees that tile the
//! elements, shallowest first. Folding them inward (deepest first)
//! recovers the current element root; walking the appended leaves up the
//! virtual tree that grows from `N` to `N + k`, merging with a frontier
//! node whenever a level starts at an odd position, yields the new one.
//! Frontier nodes always sit left of appended material, so ordered mode
//! places them as the left operand.

use crate::bits::frontier_size;
use crate::error::{ProofError, ProofResult};
use crate::hash::{combine, Digest32, HashMode};

/// Fold the frontier decommitments into the current element root.
pub(crate) fn fold_frontier(mode: HashMode, decommitments: &[Digest32]) -> ProofResult<Digest32> {
    let mut hash = *decommitments.last().ok_or(ProofError::InvalidProof)?;
    for d in decommitments[..decommitments.len() - 1].iter().rev() {
        hash = combine(mode, d, &hash);
    }
    Ok(hash)
}

/// Append one leaf at index `count`.
///
/// Returns `(old_element_root, new_element_root)`. The caller must have
/// checked `decommitments.len() == frontier_size(count)` and `count > 0`.
pub(crate) fn fold_append_single(
    mode: HashMode,
    leaf: &Digest32,
    count: u32,
    decommitments: &[Digest32],
) -> ProofResult<(Digest32, Digest32)> {
    debug_assert!(count > 0);
    debug_assert_eq!(decommitments.len(), frontier_size(count) as usize);
    let old_root = fold_frontier(mode, decommitments)?;

    // Climb from the appended leaf; a set bit in `count` at the current
    // level means an existing subtree sits to the left.
    let mut new_root = *leaf;
    let mut pi = decommitments.len();
    let mut c = count;
    while c > 0 {
        if c & 1 == 1 {
            pi -= 1;
            new_root = combine(mode, &decommitments[pi], &new_root);
        }
        c >>= 1;
    }
    Ok((old_root, new_root))
}

/// Append `leaves.len()` leaves starting at index `count`.
///
/// `leaves` doubles as the working buffer for the level walk; positions
/// run `[count >> level, (count + k - 1) >> level]` per level, the first
/// one merging with a frontier decommitment when odd, the odd tail
/// carried unchanged. The old root is folded from the same decommitments
/// as they are consumed. Returns `(old_element_root, new_element_root)`.
pub(crate) fn fold_append_multi(
    mode: HashMode,
    leaves: &mut [Digest32],
    count: u32,
    decommitments: &[Digest32],
) -> ProofResult<(Digest32, Digest32)> {
    debug_assert!(count > 0);
    let k = leaves.len() as u64;
    if k == 0 || decommitments.len() != frontier_size(count) as usize {
        return Err(ProofError::InvalidProof);
    }

    let mut read = 0usize;
    let mut write = 0usize;
    let mut offset = count as u64;
    let mut index = offset;
    let mut upper = offset + k - 1;
    let mut pi = decommitments.len();
    let mut old_root = decommitments[pi - 1];

    while upper > 0 {
        if write == 0 && index & 1 == 1 {
            leaves[0] = combine(mode, &decommitments[pi - 1], &leaves[read]);
            if pi > 1 {
                pi -= 1;
                old_root = combine(mode, &decommitments[pi - 1], &old_root);
            }
            read += 1;
            write = 1;
            index += 1;
        } else if index < upper {
            leaves[write] = combine(mode, &leaves[read], &leaves[read + 1]);
            write += 1;
            read += 2;
            index += 2;
        }

        if index >= upper {
            if index == upper {
                // Odd tail: carry the lone node up unchanged.
                leaves[write] = leaves[read];
            }
            read = 0;
            write = 0;
            offset >>= 1;
            index = offset;
            upper >>= 1;
        }
    }

    Ok((old_root, leaves[0]))
}

/// Reduce a full leaf layer to its element root (no witness involved).
///
/// Used when appending into the empty tree, where the appended elements
/// *are* the whole vector. Same pairwise walk as the tree builder: the
/// odd tail of every level is carried up unchanged.
pub(crate) fn fold_leaves(mode: HashMode, leaves: &mut Vec<Digest32>) -> Option<Digest32> {
    if leaves.is_empty() {
        return None;
    }
    while leaves.len() > 1 {
        let mut next = Vec::with_capacity((leaves.len() + 1) / 2);
        let mut i = 0usize;
        while i + 1 < leaves.len() {
            next.push(combine(mode, &leaves[i], &leaves[i + 1]));
            i += 2;
        }
        if i < leaves.len() {
            next.push(leaves[i]);
        }
        *leaves = next;
    }
    Some(leaves[0])
}

/* ----------------------------------- Tests ----------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{keccak256, leaf_hash};

    fn leaves(count: usize) -> Vec<Digest32> {
        (0..count)
            .map(|i| leaf_hash(&keccak256(&[i as u8])))
            .collect()
    }

    #[test]
    fn frontier_fold_matches_build() {
        for mode in [HashMode::Ordered, HashMode::SortedPair] {
            // Five leaves: frontier is [c(c(l0,l1), c(l2,l3)), l4].
            let l = leaves(5);
            let quad = combine(
                mode,
                &combine(mode, &l[0], &l[1]),
                &combine(mode, &l[2], &l[3]),
            );
            let root = combine(mode, &quad, &l[4]);
            assert_eq!(fold_frontier(mode, &[quad, l[4]]).unwrap(), root);
        }
    }

    #[test]
    fn append_single_grows_by_one() {
        for mode in [HashMode::Ordered, HashMode::SortedPair] {
            let l = leaves(6);
            let quad = combine(
                mode,
                &combine(mode, &l[0], &l[1]),
                &combine(mode, &l[2], &l[3]),
            );
            let (old, new) = fold_append_single(mode, &l[5], 5, &[quad, l[4]]).unwrap();
            assert_eq!(old, combine(mode, &quad, &l[4]));
            assert_eq!(new, combine(mode, &quad, &combine(mode, &l[4], &l[5])));
        }
    }

    #[test]
    fn append_multi_crosses_levels() {
        let mode = HashMode::SortedPair;
        // Start from 3 elements, append 2 more (3 -> 5).
        let l = leaves(5);
        let pair01 = combine(mode, &l[0], &l[1]);
        let old_root = combine(mode, &pair01, &l[2]);

        let mut appended = vec![l[3], l[4]];
        let (old, new) = fold_append_multi(mode, &mut appended, 3, &[pair01, l[2]]).unwrap();
        assert_eq!(old, old_root);

        let quad = combine(mode, &pair01, &combine(mode, &l[2], &l[3]));
        assert_eq!(new, combine(mode, &quad, &l[4]));
    }

    #[test]
    fn wrong_frontier_width_is_rejected() {
        let l = leaves(2);
        let mut appended = vec![l[1]];
        // count = 3 has a two-node frontier; one decommitment is short.
        assert_eq!(
            fold_append_multi(HashMode::SortedPair, &mut appended, 3, &[l[0]]),
            Err(ProofError::InvalidProof)
        );
    }

    #[test]
    fn leaf_fold_carries_odd_tail() {
        let mode = HashMode::Ordered;
        let l = leaves(3);
        let expect = combine(mode, &combine(mode, &l[0], &l[1]), &l[2]);
        assert_eq!(fold_leaves(mode, &mut l.clone()).unwrap(), expect);
        assert_eq!(fold_leaves(mode, &mut Vec::new()), None);
    }
}
