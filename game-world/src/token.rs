// SPDX-License-Identifier: Apache-2.0
//! Opaque bearer tokens: 32 lowercase hex characters, assembled from two
//! independent 64-bit draws from a cryptographically seeded RNG. This
//! upgrades the original `std::mt19937_64` generator (noted in spec.md §9
//! as "fine for uniqueness but not for unforgeability") to `rand`'s OS-seeded
//! default, a drop-in replacement the spec explicitly invites.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A 32-hex-character bearer token identifying one player for the life of
/// the process.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Wraps an already-validated 32-char lowercase hex string. Used by
    /// the API layer when parsing an incoming `Authorization` header; use
    /// [`TokenGenerator::generate`] to mint new tokens.
    #[must_use]
    pub fn from_raw(raw: String) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if `s` is exactly 32 lowercase hex digits.
    #[must_use]
    pub fn is_well_formed(s: &str) -> bool {
        s.len() == 32 && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

/// Mints opaque tokens. Holds its own RNG state so token issuance can be
/// called repeatedly without re-seeding.
pub struct TokenGenerator {
    rng: StdRng,
}

impl TokenGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Concatenates two independent 64-bit draws as 16-hex-digit,
    /// zero-padded, lowercase halves.
    pub fn generate(&mut self) -> Token {
        let high: u64 = self.rng.gen();
        let low: u64 = self.rng.gen();
        Token(format!("{high:016x}{low:016x}"))
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
