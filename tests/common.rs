//! Shared helpers for the integration tests.
//!
//! Elements are generated deterministically from a one-byte seed by a
//! Keccak chain: `e_0 = keccak256(seed ‖ 0^32)`, then
//! `e_i = keccak256(e_{i-1} ‖ e_{i-1})`. Distinct seeds give disjoint
//! element families, so update/append fixtures never collide with the
//! originals.

#![allow(dead_code)]

use compact_merkle::hash::keccak256_pair;
use compact_merkle::Element;

/// Seed for the base element sequences.
pub const SEED_BASE: u8 = 0xFF;
/// Seed for replacement elements in update scenarios.
pub const SEED_UPDATE: u8 = 0x11;
/// Seed for appended elements in append scenarios.
pub const SEED_APPEND: u8 = 0x22;

/// Deterministic pseudo-random elements from a one-byte seed.
pub fn generate_elements(count: usize, seed: u8) -> Vec<Element> {
    let mut out = Vec::with_capacity(count);
    let mut element = [0u8; 32];
    let mut chain: Vec<u8> = vec![seed];
    for _ in 0..count {
        element = keccak256_pair(&chain, &element);
        chain = element.to_vec();
        out.push(element);
    }
    out
}

/// Copy of `elements` with positions `indices[j]` replaced by `new[j]`.
pub fn replace_at(elements: &[Element], indices: &[u32], new: &[Element]) -> Vec<Element> {
    assert_eq!(indices.len(), new.len());
    let mut out = elements.to_vec();
    for (&i, e) in indices.iter().zip(new) {
        out[i as usize] = *e;
    }
    out
}

/// Elements of `elements` at `indices`, in the order given.
pub fn pick(elements: &[Element], indices: &[u32]) -> Vec<Element> {
    indices.iter().map(|&i| elements[i as usize]).collect()
}

/// Compact hex preview for assertion messages.
pub fn hex(bytes: &[u8]) -> String {
    use core::fmt::Write as _;
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(&mut s, "{b:02x}");
    }
    s
}
