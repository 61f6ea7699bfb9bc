//! Digest types and the node/leaf hashing rules.
//!
//! This module fixes the three hashing primitives every tree and proof in
//! the crate is built from:
//!
//! - `node_hash(a, b)` — Keccak-256 of the two operands concatenated.
//! - `pair_hash(a, b)` — `node_hash` of the operands in canonical order
//!   (smaller first, comparing digests as big-endian unsigned integers).
//!   Discarding sibling order is what lets multi proofs get away with a
//!   one-bit-per-step witness.
//! - `leaf_hash(e)` — `node_hash(0, e)`. The 32-byte zero prefix is the
//!   domain separator between raw caller elements and internal node
//!   digests; without it a crafted element could impersonate a subtree.
//!
//! ### Hash modes
//! A root is built either **ordered** (children combined left-to-right
//! with `node_hash`) or **sorted-pair** (combined with `pair_hash`).
//! The mode is a property of the root: every proof against it must fold
//! with the same combiner, so verifiers take [`HashMode`] explicitly and
//! never guess. Bit-encoded multi proofs exist only for sorted-pair
//! roots (see `proof::multi`).
//!
//! ### Digest size
//! 32 bytes everywhere. Elements are caller-supplied 32-byte values;
//! larger payloads should be pre-hashed by the caller.

pub mod keccak;

pub use keccak::{keccak256, keccak256_pair};

/// A 256-bit digest used across the codebase.
pub type Digest32 = [u8; 32];

/// A caller-supplied 32-byte element committed into the vector.
pub type Element = [u8; 32];

/// The all-zero digest; doubles as the committed root of the empty tree.
pub const ZERO_DIGEST: Digest32 = [0u8; 32];

/// How sibling digests are combined into their parent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HashMode {
    /// `node_hash(left, right)` — position-sensitive.
    Ordered,
    /// `pair_hash(a, b)` — canonical order, position-free.
    SortedPair,
}

/// Hash two nodes into their parent, position-sensitive.
#[inline]
pub fn node_hash(a: &Digest32, b: &Digest32) -> Digest32 {
    keccak256_pair(a, b)
}

/// Hash two nodes into their parent with the smaller operand first.
///
/// `[u8; 32]` ordering is lexicographic, which is exactly big-endian
/// unsigned integer ordering.
#[inline]
pub fn pair_hash(a: &Digest32, b: &Digest32) -> Digest32 {
    if a <= b {
        keccak256_pair(a, b)
    } else {
        keccak256_pair(b, a)
    }
}

/// Hash a raw element into its leaf digest.
#[inline]
pub fn leaf_hash(element: &Element) -> Digest32 {
    keccak256_pair(&ZERO_DIGEST, element)
}

/// Combine two sibling digests under `mode`, `a` being the left child.
#[inline]
pub fn combine(mode: HashMode, a: &Digest32, b: &Digest32) -> Digest32 {
    match mode {
        HashMode::Ordered => node_hash(a, b),
        HashMode::SortedPair => pair_hash(a, b),
    }
}

/* ----------------------------------- Tests ----------------------------------- */
