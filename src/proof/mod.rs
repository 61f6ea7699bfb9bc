//! The proof engine: verify and transform compact Merkle proofs.
//!
//! Every operation here is a pure function of `(root, witness, inputs)`.
//! The witness is a dense sequence of 32-byte words:
//!
//! - word 0 — the element count `N`, big-endian (upper 28 bytes zero);
//! - words 1..2 (multi/combined proofs only) — the `flags` and `skips`
//!   step bitmaps;
//! - remaining words — decommitment digests in replay-consumption order.
//!
//! The committed root binds the count to the element tree,
//! `root = keccak256(be_u256(N) ‖ element_root)`, with the all-zero word
//! standing for the empty tree. Each operation reconstructs the element
//! root from the witness, recomposes the committed root and compares (or
//! returns the recomposed successor). No proof variant tag is embedded;
//! the caller selects the verifier, and callers that multiplex variants
//! over one channel must prepend their own domain tag.
//!
//! Multi and combined proofs are defined for sorted-pair roots only —
//! their bit-packed witnesses carry no left/right information. Single
//! and append proofs work for both modes and take [`HashMode`]
//! explicitly; nothing here ever infers a mode.

pub mod append;
pub mod combined;
pub mod multi;
pub mod single;

pub use combined::minimum_combined_index;

use crate::error::{ProofError, ProofResult};
use crate::hash::{leaf_hash, node_hash, Digest32, Element, HashMode, ZERO_DIGEST};

use append::{fold_append_multi, fold_append_single, fold_leaves};
use combined::{fold_multi_frontier, fold_multi_update_frontier};
use multi::{fold_multi, fold_multi_update};
use single::{fold_single, fold_single_update};

/* --------------------------- Witness word codecs --------------------------- */

/// Encode an element count as a witness word (big-endian u256).
#[inline]
pub(crate) fn count_word(count: u32) -> Digest32 {
    let mut w = [0u8; 32];
    w[28..].copy_from_slice(&count.to_be_bytes());
    w
}

/// Decode an element count from witness word 0.
///
/// Counts are 32-bit; a word with any of the upper 28 bytes set cannot
/// have been produced by this format.
#[inline]
fn count_from_word(word: &Digest32) -> ProofResult<u32> {
    if word[..28].iter().any(|&b| b != 0) {
        return Err(ProofError::InvalidProof);
    }
    Ok(u32::from_be_bytes([word[28], word[29], word[30], word[31]]))
}

/// Recompose the committed root for a non-empty tree.
#[inline]
pub fn committed_root(count: u32, element_root: &Digest32) -> Digest32 {
    node_hash(&count_word(count), element_root)
}

/// Split a membership witness into `(count, decommitments)`.
fn split_membership(witness: &[Digest32]) -> ProofResult<(u32, &[Digest32])> {
    let (head, rest) = witness.split_first().ok_or(ProofError::InvalidProof)?;
    Ok((count_from_word(head)?, rest))
}

/// Split a multi witness into `(count, flags, skips, decommitments)`.
fn split_multi(witness: &[Digest32]) -> ProofResult<(u32, &Digest32, &Digest32, &[Digest32])> {
    if witness.len() < 3 {
        return Err(ProofError::InvalidProof);
    }
    Ok((
        count_from_word(&witness[0])?,
        &witness[1],
        &witness[2],
        &witness[3..],
    ))
}

#[inline]
fn leaves_of(elements: &[Element]) -> Vec<Digest32> {
    elements.iter().map(leaf_hash).collect()
}

#[inline]
fn checked_len(elements: &[Element]) -> ProofResult<u32> {
    u32::try_from(elements.len()).map_err(|_| ProofError::InvalidProof)
}

/* ------------------------------ Single proofs ------------------------------ */

/// Check that `element` sits at `index` of the vector committed by `root`.
pub fn verify_single(
    mode: HashMode,
    root: &Digest32,
    index: u32,
    element: &Element,
    witness: &[Digest32],
) -> bool {
    let reconstructed = match split_membership(witness) {
        Ok((count, decommitments)) if count > 0 => {
            fold_single(mode, index, &leaf_hash(element), count, decommitments)
                .map(|h| committed_root(count, &h))
        }
        _ => return false,
    };
    reconstructed.as_ref() == Ok(root)
}

/// Replace the element at `index`, returning the committed root of the
/// rewritten vector. The witness is the same one `verify_single` takes.
pub fn update_single(
    mode: HashMode,
    root: &Digest32,
    index: u32,
    element: &Element,
    new_element: &Element,
    witness: &[Digest32],
) -> ProofResult<Digest32> {
    if *root == ZERO_DIGEST {
        return Err(ProofError::EmptyTree);
    }
    let (count, decommitments) = split_membership(witness)?;
    if count == 0 {
        return Err(ProofError::EmptyTree);
    }
    let (old, new) = fold_single_update(
        mode,
        index,
        &leaf_hash(element),
        &leaf_hash(new_element),
        count,
        decommitments,
    )?;
    if committed_root(count, &old) != *root {
        return Err(ProofError::InvalidProof);
    }
    Ok(committed_root(count, &new))
}

/* ------------------------------- Multi proofs ------------------------------ */

/// Check that `elements` (strictly decreasing index order) all belong to
/// the sorted-pair vector committed by `root`.
pub fn verify_multi(root: &Digest32, elements: &[Element], witness: &[Digest32]) -> bool {
    let reconstructed = match split_multi(witness) {
        Ok((count, flags, skips, decommitments)) if count > 0 && !elements.is_empty() => {
            let mut queue = leaves_of(elements);
            fold_multi(&mut queue, flags, skips, decommitments)
                .map(|h| committed_root(count, &h))
        }
        _ => return false,
    };
    reconstructed.as_ref() == Ok(root)
}

/// Replace `elements` with `new_elements` (parallel lists, decreasing
/// index order), returning the rewritten committed root. All `k`
/// replacements share the one witness.
pub fn update_multi(
    root: &Digest32,
    elements: &[Element],
    new_elements: &[Element],
    witness: &[Digest32],
) -> ProofResult<Digest32> {
    if elements.len() != new_elements.len() {
        return Err(ProofError::LengthMismatch);
    }
    if *root == ZERO_DIGEST {
        return Err(ProofError::EmptyTree);
    }
    let (count, flags, skips, decommitments) = split_multi(witness)?;
    if count == 0 {
        return Err(ProofError::EmptyTree);
    }
    if elements.is_empty() {
        return Err(ProofError::InvalidProof);
    }
    let mut queue = leaves_of(elements);
    let mut update_queue = leaves_of(new_elements);
    let (old, new) = fold_multi_update(&mut queue, &mut update_queue, flags, skips, decommitments)?;
    if committed_root(count, &old) != *root {
        return Err(ProofError::InvalidProof);
    }
    Ok(committed_root(count, &new))
}

/* ------------------------------ Append proofs ------------------------------ */

/// Append one element, returning the committed root of the grown vector.
///
/// Appending to the empty tree takes the zero root and a witness whose
/// count word is zero; everything past that word is ignored.
pub fn append_one(
    mode: HashMode,
    root: &Digest32,
    element: &Element,
    witness: &[Digest32],
) -> ProofResult<Digest32> {
    let count = count_from_word(witness.first().ok_or(ProofError::InvalidProof)?)?;
    if (*root == ZERO_DIGEST) != (count == 0) {
        return Err(ProofError::InvalidTree);
    }
    if count == 0 {
        return Ok(committed_root(1, &leaf_hash(element)));
    }
    let decommitments = &witness[1..];
    if decommitments.len() != count.count_ones() as usize {
        return Err(ProofError::InvalidProof);
    }
    let (old, new) = fold_append_single(mode, &leaf_hash(element), count, decommitments)?;
    if committed_root(count, &old) != *root {
        return Err(ProofError::InvalidProof);
    }
    let new_count = count.checked_add(1).ok_or(ProofError::InvalidProof)?;
    Ok(committed_root(new_count, &new))
}

/// Append `elements` in order, returning the new committed root.
/// Appending nothing is a no-op that hands the root back.
pub fn append_many(
    mode: HashMode,
    root: &Digest32,
    elements: &[Element],
    witness: &[Digest32],
) -> ProofResult<Digest32> {
    let count = count_from_word(witness.first().ok_or(ProofError::InvalidProof)?)?;
    if (*root == ZERO_DIGEST) != (count == 0) {
        return Err(ProofError::InvalidTree);
    }
    if elements.is_empty() {
        return Ok(*root);
    }
    let appended = checked_len(elements)?;
    let new_count = count.checked_add(appended).ok_or(ProofError::InvalidProof)?;
    let mut leaves = leaves_of(elements);
    if count == 0 {
        let element_root = fold_leaves(mode, &mut leaves).ok_or(ProofError::InvalidProof)?;
        return Ok(committed_root(new_count, &element_root));
    }
    let (old, new) = fold_append_multi(mode, &mut leaves, count, &witness[1..])?;
    if committed_root(count, &old) != *root {
        return Err(ProofError::InvalidProof);
    }
    Ok(committed_root(new_count, &new))
}

/* ----------------------------- Combined proofs ----------------------------- */

/// Prove `elements` and append `append_elements` in one shot.
///
/// The witness is a multi proof whose index set contains at least one
/// index `>= minimum_combined_index(count)`; the append witness is
/// derived from its replay. Sorted-pair roots only.
pub fn multi_and_append(
    root: &Digest32,
    elements: &[Element],
    append_elements: &[Element],
    witness: &[Digest32],
) -> ProofResult<Digest32> {
    let (count, flags, skips, decommitments) = split_multi(witness)?;
    if (*root == ZERO_DIGEST) != (count == 0) {
        return Err(ProofError::InvalidTree);
    }
    if count == 0 || elements.is_empty() || append_elements.is_empty() {
        return Err(ProofError::InvalidProof);
    }
    let mut queue = leaves_of(elements);
    let (element_root, frontier) =
        fold_multi_frontier(&mut queue, count, flags, skips, decommitments)?;
    if committed_root(count, &element_root) != *root {
        return Err(ProofError::InvalidProof);
    }
    let appended = checked_len(append_elements)?;
    let new_count = count.checked_add(appended).ok_or(ProofError::InvalidProof)?;
    let mut leaves = leaves_of(append_elements);
    let (_, new) = fold_append_multi(HashMode::SortedPair, &mut leaves, count, &frontier)?;
    Ok(committed_root(new_count, &new))
}

/// Rewrite `elements` to `new_elements` *and* append `append_elements`,
/// all against one witness. The derived append witness reflects the
/// rewritten digests, since the append lands on the updated tree.
pub fn multi_update_and_append(
    root: &Digest32,
    elements: &[Element],
    new_elements: &[Element],
    append_elements: &[Element],
    witness: &[Digest32],
) -> ProofResult<Digest32> {
    if elements.len() != new_elements.len() {
        return Err(ProofError::LengthMismatch);
    }
    let (count, flags, skips, decommitments) = split_multi(witness)?;
    if (*root == ZERO_DIGEST) != (count == 0) {
        return Err(ProofError::InvalidTree);
    }
    if count == 0 || elements.is_empty() || append_elements.is_empty() {
        return Err(ProofError::InvalidProof);
    }
    let mut queue = leaves_of(elements);
    let mut update_queue = leaves_of(new_elements);
    let (old_root, frontier) = fold_multi_update_frontier(
        &mut queue,
        &mut update_queue,
        count,
        flags,
        skips,
        decommitments,
    )?;
    if committed_root(count, &old_root) != *root {
        return Err(ProofError::InvalidProof);
    }
    let appended = checked_len(append_elements)?;
    let new_count = count.checked_add(appended).ok_or(ProofError::InvalidProof)?;
    let mut leaves = leaves_of(append_elements);
    let (_, new) = fold_append_multi(HashMode::SortedPair, &mut leaves, count, &frontier)?;
    Ok(committed_root(new_count, &new))
}

/* ----------------------------------- Tests ----------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::keccak256;

    #[test]
    fn count_word_round_trip() {
        for count in [0u32, 1, 5, 255, 256, u32::MAX] {
            assert_eq!(count_from_word(&count_word(count)).unwrap(), count);
        }
    }

    #[test]
    fn oversized_count_word_is_rejected() {
        let mut w = count_word(7);
        w[0] = 1;
        assert_eq!(count_from_word(&w), Err(ProofError::InvalidProof));
    }

    #[test]
    fn empty_witness_fails_closed() {
        let e = keccak256(b"e");
        assert!(!verify_single(HashMode::SortedPair, &ZERO_DIGEST, 0, &e, &[]));
        assert!(!verify_multi(&ZERO_DIGEST, &[e], &[]));
        assert_eq!(
            append_one(HashMode::SortedPair, &ZERO_DIGEST, &e, &[]),
            Err(ProofError::InvalidProof)
        );
    }

    #[test]
    fn append_gates_on_emptiness_agreement() {
        let e = keccak256(b"e");
        // Zero root with nonzero count, and vice versa.
        assert_eq!(
            append_one(HashMode::SortedPair, &ZERO_DIGEST, &e, &[count_word(3)]),
            Err(ProofError::InvalidTree)
        );
        let nonzero = keccak256(b"root");
        assert_eq!(
            append_one(HashMode::SortedPair, &nonzero, &e, &[count_word(0)]),
            Err(ProofError::InvalidTree)
        );
    }

    #[test]
    fn append_into_empty_tree() {
        let e = keccak256(b"first");
        let got = append_one(HashMode::SortedPair, &ZERO_DIGEST, &e, &[count_word(0)]).unwrap();
        assert_eq!(got, committed_root(1, &leaf_hash(&e)));

        // Words past the zero count are ignored.
        let with_junk = [count_word(0), keccak256(b"junk")];
        let got2 = append_one(HashMode::SortedPair, &ZERO_DIGEST, &e, &with_junk).unwrap();
        assert_eq!(got, got2);
    }

    #[test]
    fn update_gates_on_empty() {
        let e = keccak256(b"e");
        assert_eq!(
            update_single(HashMode::SortedPair, &ZERO_DIGEST, 0, &e, &e, &[count_word(1)]),
            Err(ProofError::EmptyTree)
        );
        assert_eq!(
            update_multi(&keccak256(b"r"), &[e], &[e, e], &[count_word(1)]),
            Err(ProofError::LengthMismatch)
        );
    }
}
