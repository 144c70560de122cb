//! Candidate-elimination guesser.

use super::{Guesser, GuesserError};
use crate::core::{Code, Feedback};

/// Guesses the first code still consistent with every feedback received
///
/// Works with both evaluation modes: each feedback carries its mode, and a
/// candidate survives only if it would have produced the same feedback.
#[derive(Debug, Clone)]
pub struct EliminationGuesser {
    /// Codes that could still be the secret, in ascending order
    candidates: Vec<Code>,
    last_guess: Option<Code>,
}

impl EliminationGuesser {
    pub fn new() -> Self {
        Self {
            candidates: Code::all().collect(),
            last_guess: None,
        }
    }

    /// Number of codes still possible
    pub fn remaining(&self) -> usize {
        self.candidates.len()
    }
}

impl Default for EliminationGuesser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Guesser for EliminationGuesser {
    async fn next_guess(&mut self) -> Result<Option<Code>, GuesserError> {
        let guess = *self.candidates.first().ok_or(GuesserError::NoCandidates)?;
        self.last_guess = Some(guess);
        Ok(Some(guess))
    }

    async fn accept_feedback(&mut self, feedback: Feedback) {
        let Some(guess) = self.last_guess.take() else {
            tracing::warn!("Elimination guesser got feedback before guessing");
            return;
        };

        // The game continued, so the guess itself was wrong even when the
        // simplified feedback reports 4 shared digits
        let mode = feedback.mode();
        self.candidates
            .retain(|candidate| *candidate != guess && mode.evaluate(&guess, candidate) == feedback);

        tracing::debug!(
            "Elimination guesser: {} -> {}, {} candidates left",
            guess,
            feedback,
            self.candidates.len()
        );
    }

    fn name(&self) -> &str {
        "elimination"
    }
}
