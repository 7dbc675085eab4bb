//! Portable string hashing
//!
//! `std::collections::hash_map::DefaultHasher` is neither specified nor
//! stable across Rust releases, so anything that must reproduce across
//! processes (tie-breaks, personality seeds) goes through this instead.

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over the UTF-8 bytes of `s`.
pub fn stable_hash(s: &str) -> u64 {
    s.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}
