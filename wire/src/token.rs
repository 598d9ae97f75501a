//! Opaque capability tokens.
//!
//! A token is never verified cryptographically — it's a capability tag
//! trusted at face value, carrying the issuer's IP as a recoverable prefix.
//! Format: `<ip>-<unix_nanos>-<md5hex(decimal(random_i63))>`. The random
//! suffix is drawn from the OS CSPRNG rather than a seeded PRNG, since
//! nothing downstream relies on it being reproducible.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::RngCore;

const SEPARATOR: char = '-';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(String);

impl Token {
    /// Mints a fresh token bound to `ip`.
    pub fn mint(ip: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is after the unix epoch")
            .as_nanos();
        let random_part = generate_random_part();
        Token(format!("{ip}{SEPARATOR}{nanos}{SEPARATOR}{random_part}"))
    }

    /// Recovers the IP address a token was minted for.
    pub fn ip(&self) -> &str {
        self.0
            .split(SEPARATOR)
            .next()
            .expect("split always yields at least one field")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Token(value)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anti-collision padding, not a security boundary: `md5hex` of a
/// non-negative 63-bit random integer drawn from a CSPRNG.
fn generate_random_part() -> String {
    let raw = OsRng.next_u64();
    let i63 = raw >> 1; // clear the top bit to mirror Go's non-negative rand.Int63()
    let digest = md5::compute(i63.to_string());
    format!("{digest:x}")
}
