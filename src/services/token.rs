// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer token generation.

use ring::rand::{SecureRandom, SystemRandom};

const ALPHABET: &[u8; 52] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

// Largest multiple of the alphabet size that fits in a byte. Bytes at or
// above it are rejected so every letter is equally likely.
const ACCEPT_BELOW: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// Token generation errors
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("could not read from the system random source")]
    RandomSource,
}

/// Generate a token of exactly `length` ASCII letters (`A-Z`, `a-z`).
///
/// Bytes come from the operating system CSPRNG.
pub fn generate_token(length: usize) -> Result<String, TokenError> {
    let rng = SystemRandom::new();
    let mut token = String::with_capacity(length);
    let mut buf = [0u8; 64];

    while token.len() < length {
        rng.fill(&mut buf).map_err(|_| TokenError::RandomSource)?;

        for &byte in buf.iter().filter(|&&b| b < ACCEPT_BELOW) {
            if token.len() == length {
                break;
            }
            token.push(ALPHABET[usize::from(byte) % ALPHABET.len()] as char);
        }
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length_and_alphabet() {
        for length in [0, 1, 32, 63, 64, 65, 500] {
            let token = generate_token(length).unwrap();
            assert_eq!(token.len(), length);
            assert!(token.chars().all(|c| c.is_ascii_alphabetic()));
        }
    }

    #[test]
    fn test_tokens_differ() {
        let a = generate_token(32).unwrap();
        let b = generate_token(32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_uses_both_cases() {
        let token = generate_token(2048).unwrap();
        assert!(token.chars().any(|c| c.is_ascii_uppercase()));
        assert!(token.chars().any(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_acceptance_bound() {
        assert_eq!(ACCEPT_BELOW, 208);
    }
}
