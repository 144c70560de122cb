//! Scripted guesser - replays a fixed list of codes.

use std::collections::VecDeque;

use super::{Guesser, GuesserError};
use crate::core::{Code, Feedback};

/// Guesser that plays a predetermined sequence, then gives up
#[derive(Debug, Clone, Default)]
pub struct ScriptedGuesser {
    script: VecDeque<Code>,
    /// Feedback received so far, in order
    feedback: Vec<Feedback>,
}

impl ScriptedGuesser {
    pub fn new(script: impl IntoIterator<Item = Code>) -> Self {
        Self {
            script: script.into_iter().collect(),
            feedback: Vec::new(),
        }
    }

    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }
}

#[async_trait::async_trait]
impl Guesser for ScriptedGuesser {
    async fn next_guess(&mut self) -> Result<Option<Code>, GuesserError> {
        Ok(self.script.pop_front())
    }

    async fn accept_feedback(&mut self, feedback: Feedback) {
        self.feedback.push(feedback);
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
