//! Random guesser - tries random codes, ignoring feedback.

use rand::{rngs::StdRng, SeedableRng};
use std::collections::HashSet;

use super::{Guesser, GuesserError};
use crate::core::{Code, Feedback, CODE_SPACE_SIZE};

/// Guesser that samples codes uniformly at random without repeating itself
///
/// Baseline opponent; pass a seed for reproducible games.
#[derive(Debug)]
pub struct RandomGuesser {
    rng: StdRng,
    tried: HashSet<Code>,
}

impl RandomGuesser {
    /// Create a random guesser
    ///
    /// # Arguments
    ///
    /// * `seed` - Optional seed for deterministic behavior
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            tried: HashSet::new(),
        }
    }
}

#[async_trait::async_trait]
impl Guesser for RandomGuesser {
    async fn next_guess(&mut self) -> Result<Option<Code>, GuesserError> {
        if self.tried.len() >= CODE_SPACE_SIZE {
            return Ok(None);
        }

        loop {
            let code = Code::random(&mut self.rng);
            if self.tried.insert(code) {
                return Ok(Some(code));
            }
        }
    }

    async fn accept_feedback(&mut self, _feedback: Feedback) {}

    fn name(&self) -> &str {
        "random"
    }
}
