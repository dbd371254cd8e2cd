//! Name hashing
//!
//! States are addressed by a 32-bit FNV-1a hash of their name, so the
//! dispatcher never stores or compares strings. The function is pure and
//! deterministic: the same name always yields the same identity hash.

/// FNV-1a 32-bit offset basis.
pub const FNV_SEED: u32 = 0x811C_9DC5;

/// FNV-1a 32-bit prime.
pub const FNV_PRIME: u32 = 0x0100_0193;

/// Hash a name with FNV-1a (32-bit) over its UTF-8 bytes.
pub fn fnv1a(text: &str) -> u32 {
    fnv1a_with(text, FNV_SEED)
}

/// Continue an FNV-1a hash from an explicit seed.
///
/// `fnv1a_with(b, fnv1a(a))` equals `fnv1a(ab)`, which lets callers hash
/// composite names without allocating.
pub fn fnv1a_with(text: &str, seed: u32) -> u32 {
    text.bytes()
        .fold(seed, |hash, byte| (u32::from(byte) ^ hash).wrapping_mul(FNV_PRIME))
}
