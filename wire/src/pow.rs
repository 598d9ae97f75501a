//! The Hashcash-style proof-of-work contract.
//!
//! Bit-exact with the original `server/internal/hash/hash.go`: the hash
//! input is the raw token string concatenated with the base-10 ASCII
//! representation of the nonce — no separator, no length prefix — hashed
//! with SHA-256, and "leading zeros" counts leading ASCII `'0'` characters
//! in the lowercase hex encoding.

use sha2::{Digest, Sha256};

/// Computes `hex(sha256(token || decimal(nonce)))`.
pub fn hash(token: &str, nonce: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.update(nonce.to_string().as_bytes());
    let digest = hasher.finalize();
    hex_lower(&digest)
}

/// Number of leading ASCII `'0'` characters in a lowercase hex string.
pub fn leading_zeros(hex_hash: &str) -> usize {
    hex_hash.bytes().take_while(|&b| b == b'0').count()
}

/// Whether `hex(sha256(token || decimal(nonce)))` has at least `difficulty`
/// leading hex zeros.
pub fn meets_difficulty(token: &str, nonce: u64, difficulty: u8) -> bool {
    leading_zeros(&hash(token, nonce)) >= difficulty as usize
}

fn hex_lower(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}

/// Finds the smallest nonce, starting from 0, that satisfies `difficulty`.
/// Used by the client and by tests; not part of the server's hot path.
pub fn solve(token: &str, difficulty: u8) -> u64 {
    let mut nonce = 0u64;
    loop {
        if meets_difficulty(token, nonce, difficulty) {
            return nonce;
        }
        nonce += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_difficulty_accepts_any_nonce() {
        assert!(meets_difficulty("tok", 0, 0));
        assert!(meets_difficulty("tok", 12345, 0));
    }

    #[test]
    fn hash_matches_known_vector() {
        // sha256("abc0"), computed independently of this implementation.
        let expected = "56abfbd7d2ea606e667945422de5a368b8b0272b8f29081cb058b594dd7e3249";
        let got = hash("abc", 0);
        assert_eq!(hex::decode(&got).unwrap(), hex::decode(expected).unwrap());
    }

    #[test]
    fn solve_produces_a_verifiable_nonce() {
        let token = "127.0.0.1-1-deadbeef";
        for difficulty in 0..=2u8 {
            let nonce = solve(token, difficulty);
            assert!(meets_difficulty(token, nonce, difficulty));
        }
    }

    #[test]
    fn leading_zeros_counts_correctly() {
        assert_eq!(leading_zeros("0000ab"), 4);
        assert_eq!(leading_zeros("ab0000"), 0);
        assert_eq!(leading_zeros("000000"), 6);
    }
}
