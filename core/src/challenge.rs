//! Human-verification challenge: code generation, comparison, and the
//! per-session verification box state.
//!
//! The challenge is a display-only gate. It carries no cryptographic
//! strength and is never checked anywhere but in this session.

use serde::{Deserialize, Serialize};

use crate::{
    error::{FormError, FormResult},
    rng::FormRng,
};

pub const CHALLENGE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const MISMATCH_MESSAGE: &str = "Verification code does not match. Please try again.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Challenge {
    pub code: String,
}

pub struct ChallengeGenerator;

impl ChallengeGenerator {
    /// `len` characters, each drawn uniformly from A–Z0–9.
    pub fn generate(rng: &mut FormRng, len: usize) -> Challenge {
        let code = (0..len).map(|_| rng.pick(CHALLENGE_ALPHABET)).collect();
        Challenge { code }
    }
}

/// Uppercase the input and compare literally. Whitespace is not trimmed.
pub fn verify(user_input: &str, code: &str) -> bool {
    user_input.to_uppercase() == code
}

/// State behind the verification widget.
#[derive(Debug, Clone)]
pub struct ChallengeBox {
    challenge: Challenge,
    input:     String,
    verified:  bool,
    error:     Option<String>,
    length:    usize,
}

impl ChallengeBox {
    pub fn new(rng: &mut FormRng, length: usize) -> Self {
        Self {
            challenge: ChallengeGenerator::generate(rng, length),
            input:     String::new(),
            verified:  false,
            error:     None,
            length,
        }
    }

    pub fn challenge(&self) -> &Challenge { &self.challenge }
    pub fn input(&self) -> &str { &self.input }
    pub fn is_verified(&self) -> bool { self.verified }
    pub fn error(&self) -> Option<&str> { self.error.as_deref() }

    /// Typing does not touch the verified flag; only verify/refresh do.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// The verify affordance is disabled while the input is blank.
    pub fn can_verify(&self) -> bool {
        !self.input.trim().is_empty()
    }

    /// Compare the current input against the code.
    ///
    /// On mismatch the error message is stored and `verified` is false.
    pub fn verify(&mut self) -> FormResult<()> {
        if !self.can_verify() {
            return Err(FormError::EmptyChallengeInput);
        }
        if verify(&self.input, &self.challenge.code) {
            self.verified = true;
            self.error = None;
            Ok(())
        } else {
            self.verified = false;
            self.error = Some(MISMATCH_MESSAGE.to_string());
            Err(FormError::ChallengeMismatch)
        }
    }

    /// New code; verification, input and error are all reset.
    pub fn refresh(&mut self, rng: &mut FormRng) {
        self.challenge = ChallengeGenerator::generate(rng, self.length);
        self.input.clear();
        self.verified = false;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_have_fixed_length_and_alphabet() {
        let mut rng = FormRng::new(12345, 0);
        for _ in 0..500 {
            let c = ChallengeGenerator::generate(&mut rng, 5);
            assert_eq!(c.code.len(), 5);
            assert!(
                c.code.chars().all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit()),
                "bad code {}",
                c.code
            );
        }
    }

    #[test]
    fn every_symbol_eventually_appears() {
        let mut rng = FormRng::new(1, 0);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            seen.extend(ChallengeGenerator::generate(&mut rng, 5).code.chars());
        }
        assert_eq!(seen.len(), CHALLENGE_ALPHABET.len());
    }

    #[test]
    fn verify_ignores_case_but_not_whitespace() {
        assert!(verify("ab12c", "AB12C"));
        assert!(verify("Ab12C", "AB12C"));
        assert!(!verify(" AB12C", "AB12C"));
        assert!(!verify("AB12", "AB12C"));
    }
}
