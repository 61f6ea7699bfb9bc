//! compact_merkle — authenticated append-only vectors with compact proofs.
//!
//! A vector of 32-byte elements is committed as
//! `root = keccak256(be_u256(N) ‖ element_root)`, where the element root
//! is a Merkle tree over `leaf_i = keccak256(0^32 ‖ element_i)`. The tree
//! is *unbalanced*: a parent with no right child equals its left child,
//! so the shape for any `N` embeds in the next power of two and append
//! witnesses stay at `popcount(N)` words.
//!
//! One queue-and-flag replay procedure reconstructs roots from serialized
//! witnesses for every proof variant:
//! - **single** — membership (and rewrite) of one element,
//! - **multi** — membership (and rewrite) of many elements at once,
//! - **append** — extend the vector by one or many elements,
//! - **combined** — multi proof whose replay also yields the append
//!   witness, so rewrite + append share one proof.
//!
//! Layout:
//! - `hash`  — Keccak-256, leaf/node/sorted-pair hashing, [`HashMode`]
//! - `bits`  — 32-bit shape arithmetic and the flag/skip bitmap codec
//! - `error` — the four terminal failure kinds
//! - `proof` — the verifier engine (pure; the root of trust)
//! - `tree`  — builder: roots and witnesses from a full sequence
//!
//! The engine owns no state, performs no I/O and never panics on
//! untrusted input; callers can verify from any number of threads
//! without coordination. Scratch memory is bounded by the claimed
//! element count plus one queue per proof.

#![forbid(unsafe_op_in_unsafe_fn)]
#![deny(rust_2018_idioms, unused_must_use)]

pub mod bits;
pub mod error;
pub mod hash;
pub mod proof;
pub mod tree;

pub use error::{ProofError, ProofResult};
pub use hash::{leaf_hash, node_hash, pair_hash, Digest32, Element, HashMode, ZERO_DIGEST};
pub use proof::{
    append_many, append_one, committed_root, minimum_combined_index, multi_and_append,
    multi_update_and_append, update_multi, update_single, verify_multi, verify_single,
};
pub use tree::Tree;
