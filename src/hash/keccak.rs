//! Keccak-256 backend.
//!
//! Thin wrappers around [`tiny_keccak`] computing **Keccak-256**
//! (Ethereum's `keccak256`, which differs from NIST SHA3-256 only in
//! padding). Every commitment in this crate is produced by one of these
//! two functions, so the whole tree format is bit-exact against any
//! other Keccak-256 implementation.

use super::Digest32;

/// One-shot Keccak-256 of a single buffer.
#[inline]
pub fn keccak256(data: &[u8]) -> Digest32 {
    use tiny_keccak::{Hasher, Keccak};
    let mut k = Keccak::v256();
    k.update(data);
    let mut out = [0u8; 32];
    k.finalize(&mut out);
    out
}

/// Keccak-256 over two parts, treated as if concatenated.
///
/// This is the hot path: every tree node is the hash of exactly two
/// 32-byte words, and streaming the parts avoids a 64-byte scratch copy.
#[inline]
pub fn keccak256_pair(a: &[u8], b: &[u8]) -> Digest32 {
    use tiny_keccak::{Hasher, Keccak};
    let mut k = Keccak::v256();
    k.update(a);
    k.update(b);
    let mut out = [0u8; 32];
    k.finalize(&mut out);
    out
}

/* ---------------------------------- Tests ----------------------------------- */
