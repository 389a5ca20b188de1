//! Short, URL-safe run identifiers.
//!
//! Each byte of OS entropy is masked to six bits and mapped into a 64-symbol
//! alphabet, so identifiers are uniformly distributed and collision-resistant
//! at the default length. Entropy failure propagates instead of degrading to
//! a weaker source.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::AppResult;

pub const ALPHABET: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz-";

pub const DEFAULT_SIZE: usize = 12;

pub fn generate(size: usize) -> AppResult<String> {
    let mut bytes = vec![0u8; size];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(bytes
        .iter()
        .map(|b| ALPHABET[(b & 63) as usize] as char)
        .collect())
}

/// Fresh identifier for a new run.
pub fn run_id() -> AppResult<String> {
    generate(DEFAULT_SIZE)
}

#[cfg(test)]
mod tests {
    use super::{generate, run_id, ALPHABET, DEFAULT_SIZE};
    use std::collections::HashSet;

    #[test]
    fn generates_requested_length() {
        assert_eq!(generate(0).expect("generate").len(), 0);
        assert_eq!(generate(21).expect("generate").len(), 21);
        assert_eq!(run_id().expect("run id").len(), DEFAULT_SIZE);
    }

    #[test]
    fn output_stays_within_the_declared_alphabet() {
        let id = generate(256).expect("generate");
        for c in id.bytes() {
            assert!(ALPHABET.contains(&c), "unexpected symbol {:?}", c as char);
        }
    }

    #[test]
    fn ten_thousand_ids_have_no_duplicates() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let id = run_id().expect("run id");
            assert_eq!(id.len(), DEFAULT_SIZE);
            assert!(seen.insert(id), "duplicate identifier generated");
        }
    }
}
