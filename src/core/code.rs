use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::CODE_LENGTH;
use crate::error::GameError;

/// A secret or a guess: four pairwise-distinct decimal digits
///
/// Holding a `Code` means the string was already validated, so the
/// evaluator never has to re-check its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code([u8; CODE_LENGTH]);

impl Code {
    /// Parse and validate a code
    ///
    /// # Errors
    ///
    /// Returns a validation error if the input is not exactly 4 digits
    /// or contains a repeated digit
    pub fn parse(input: &str) -> Result<Self, GameError> {
        let input = input.trim();

        if input.chars().count() != CODE_LENGTH {
            return Err(GameError::Validation(format!(
                "Code must be a string of length {}",
                CODE_LENGTH
            )));
        }

        let mut digits = [0u8; CODE_LENGTH];
        for (slot, c) in digits.iter_mut().zip(input.chars()) {
            *slot = c
                .to_digit(10)
                .ok_or_else(|| GameError::Validation("Code must contain only digits".to_string()))?
                as u8;
        }

        Self::from_digits(digits)
    }

    /// Build a code from raw digit values
    ///
    /// # Errors
    ///
    /// Returns a validation error if a digit is above 9 or repeated
    pub fn from_digits(digits: [u8; CODE_LENGTH]) -> Result<Self, GameError> {
        if digits.iter().any(|&d| d > 9) {
            return Err(GameError::Validation(
                "Code must contain only digits".to_string(),
            ));
        }

        for (i, d) in digits.iter().enumerate() {
            if digits[i + 1..].contains(d) {
                return Err(GameError::Validation(format!(
                    "Code must contain {} unique digits",
                    CODE_LENGTH
                )));
            }
        }

        Ok(Self(digits))
    }

    /// Sample 4 distinct digits from 0-9 uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut digits = [0u8; CODE_LENGTH];
        let sampled = rand::seq::index::sample(rng, 10, CODE_LENGTH);
        for (slot, d) in digits.iter_mut().zip(sampled.iter()) {
            *slot = d as u8;
        }
        Self(digits)
    }

    /// Every valid code, in ascending numeric order
    pub fn all() -> impl Iterator<Item = Code> {
        (0..10_000u32).filter_map(|n| {
            let digits = [
                (n / 1000) as u8,
                (n / 100 % 10) as u8,
                (n / 10 % 10) as u8,
                (n % 10) as u8,
            ];
            Code::from_digits(digits).ok()
        })
    }

    pub fn digits(&self) -> &[u8; CODE_LENGTH] {
        &self.0
    }

    /// Whether `digit` occurs anywhere in this code
    pub fn contains(&self, digit: u8) -> bool {
        self.0.contains(&digit)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.0 {
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Code {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.to_string()
    }
}
