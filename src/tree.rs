//! Tree builder: roots and witnesses from a full element sequence.
//!
//! The verifier in [`crate::proof`] never needs this module — it is the
//! inverse side, used by the party that holds the whole vector and hands
//! out proofs. The tree is materialized as the implicit balanced array:
//! `2 * balanced_leaf_count(N)` slots, leaves in the upper half, parents
//! at `i` over children `2i` and `2i + 1`, slot 0 unused. A parent whose
//! right child is absent equals its left child; `None` marks slots with
//! no node at all. That unbalanced rule — never hashing in a phantom
//! sibling — is what keeps append witnesses at `popcount(N)` words.
//!
//! Witness generation mirrors the replay loops in `proof` step for step,
//! so anything proven here verifies there by construction.

use crate::bits::{balanced_leaf_count, bitmap_set, tree_depth, BITMAP_BITS};
use crate::hash::{combine, leaf_hash, Digest32, Element, HashMode, ZERO_DIGEST};
use crate::proof::{committed_root, count_word};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// An in-memory element tree plus the hash mode it was built with.
#[derive(Clone, Debug)]
pub struct Tree {
    mode: HashMode,
    leaf_count: u32,
    /// Balanced array of `2 * balanced_leaf_count(leaf_count)` slots.
    nodes: Vec<Option<Digest32>>,
}

/* ------------------------------ Leaf hashing ------------------------------ */

#[cfg(feature = "rayon")]
fn hash_leaves(elements: &[Element]) -> Vec<Digest32> {
    elements.par_iter().map(leaf_hash).collect()
}

#[cfg(not(feature = "rayon"))]
fn hash_leaves(elements: &[Element]) -> Vec<Digest32> {
    elements.iter().map(leaf_hash).collect()
}

impl Tree {
    /// Build the tree for `elements` under `mode`.
    pub fn from_elements(mode: HashMode, elements: &[Element]) -> Self {
        assert!(
            elements.len() <= u32::MAX as usize,
            "element count exceeds the 32-bit tree format"
        );
        let leaf_count = elements.len() as u32;
        let width = balanced_leaf_count(leaf_count) as usize;
        let mut nodes: Vec<Option<Digest32>> = vec![None; 2 * width];

        for (slot, leaf) in nodes[width..width + elements.len()]
            .iter_mut()
            .zip(hash_leaves(elements))
        {
            *slot = Some(leaf);
        }

        for i in (1..width).rev() {
            nodes[i] = match (nodes[2 * i], nodes[2 * i + 1]) {
                (Some(l), Some(r)) => Some(combine(mode, &l, &r)),
                // Absent right child: the parent is its left child.
                (Some(l), None) => Some(l),
                (None, _) => None,
            };
        }

        Self {
            mode,
            leaf_count,
            nodes,
        }
    }

    /// Number of elements committed.
    #[inline]
    pub fn leaf_count(&self) -> u32 {
        self.leaf_count
    }

    /// The hash mode this tree was built with.
    #[inline]
    pub fn mode(&self) -> HashMode {
        self.mode
    }

    /// Levels between the leaves and the element root.
    #[inline]
    pub fn depth(&self) -> u32 {
        tree_depth(self.leaf_count)
    }

    /// Root of the element tree, or `None` for the empty vector.
    #[inline]
    pub fn element_root(&self) -> Option<Digest32> {
        self.nodes[1]
    }

    /// The committed root binding count and element root; the zero word
    /// for the empty vector.
    pub fn root(&self) -> Digest32 {
        match self.element_root() {
            Some(h) => committed_root(self.leaf_count, &h),
            None => ZERO_DIGEST,
        }
    }

    /// Node at `pos` of `level` (0 = leaves). Present by construction for
    /// every position the provers visit.
    fn node(&self, level: u32, pos: u32) -> Digest32 {
        let width = balanced_leaf_count(self.leaf_count);
        self.nodes[((width >> level) + pos) as usize].expect("node on a touched path")
    }

    /* ---------------------------- Witness derivation ---------------------------- */

    /// Witness for a single-element proof at `index`:
    /// `[N, d_shallowest, …, d_deepest]`. `None` when out of bounds.
    pub fn prove_single(&self, index: u32) -> Option<Vec<Digest32>> {
        if index >= self.leaf_count {
            return None;
        }
        let width = balanced_leaf_count(self.leaf_count) as usize;
        let mut path = Vec::with_capacity(self.depth() as usize);
        let mut pos = width + index as usize;
        while pos > 1 {
            // A level with no sibling is skipped by the replay too.
            if let Some(sibling) = self.nodes[pos ^ 1] {
                path.push(sibling);
            }
            pos >>= 1;
        }

        let mut witness = Vec::with_capacity(path.len() + 1);
        witness.push(count_word(self.leaf_count));
        witness.extend(path.into_iter().rev());
        Some(witness)
    }

    /// Witness for a multi-element proof over `indices`, which must be
    /// strictly decreasing and in bounds: `[N, flags, skips, d…]`.
    ///
    /// Bit-packed multi proofs only exist for sorted-pair trees; `None`
    /// for ordered trees, bad index sets, or a replay that would exceed
    /// the 256-step bitmaps.
    pub fn prove_multi(&self, indices: &[u32]) -> Option<Vec<Digest32>> {
        if self.mode != HashMode::SortedPair || indices.is_empty() {
            return None;
        }
        if indices[0] >= self.leaf_count || indices.windows(2).any(|w| w[0] <= w[1]) {
            return None;
        }

        let mut flags = [0u8; 32];
        let mut skips = [0u8; 32];
        let mut decommitments = Vec::new();

        // Simulate the replay: touched positions per level, descending,
        // one step per queue pop.
        let mut touched: Vec<u32> = indices.to_vec();
        let mut level = 0u32;
        let mut width = self.leaf_count;
        let mut step = 0usize;

        while width > 1 {
            let mut parents = Vec::with_capacity(touched.len());
            let mut i = 0usize;
            while i < touched.len() {
                if step >= BITMAP_BITS {
                    return None;
                }
                let pos = touched[i];
                if pos & 1 == 1 {
                    if touched.get(i + 1) == Some(&(pos - 1)) {
                        // Both children claimed: merge inside the queue.
                        bitmap_set(&mut flags, step);
                        i += 2;
                    } else {
                        decommitments.push(self.node(level, pos - 1));
                        i += 1;
                    }
                } else if pos == width - 1 {
                    // Absent right sibling: carry.
                    bitmap_set(&mut skips, step);
                    i += 1;
                } else {
                    decommitments.push(self.node(level, pos + 1));
                    i += 1;
                }
                parents.push(pos >> 1);
                step += 1;
            }
            touched = parents;
            level += 1;
            width = (width + 1) >> 1;
        }

        if step >= BITMAP_BITS {
            return None;
        }
        bitmap_set(&mut flags, step);
        bitmap_set(&mut skips, step);

        let mut witness = Vec::with_capacity(3 + decommitments.len());
        witness.push(count_word(self.leaf_count));
        witness.push(flags);
        witness.push(skips);
        witness.extend(decommitments);
        Some(witness)
    }

    /// Witness for appending at the current end:
    /// `[N, frontier_shallowest, …, frontier_deepest]`.
    ///
    /// For the empty tree this is the lone count word — the appender
    /// needs nothing else.
    pub fn prove_append(&self) -> Vec<Digest32> {
        let n = self.leaf_count;
        let mut witness = Vec::with_capacity(1 + n.count_ones() as usize);
        witness.push(count_word(n));
        for level in (0..u32::BITS).rev() {
            if n >> level & 1 == 1 {
                witness.push(self.node(level, (n >> level) - 1));
            }
        }
        witness
    }
}

/* ----------------------------------- Tests ----------------------------------- */
