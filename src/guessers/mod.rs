//! Automated players.
//!
//! The engine never depends on a concrete strategy: anything implementing
//! [`Guesser`] can be driven through a game by [`run_guesser`].

mod elimination;
mod random;
mod runner;
mod scripted;

pub use elimination::EliminationGuesser;
pub use random::RandomGuesser;
pub use runner::{run_guesser, spawn_guesser, GuesserOutcome, StopReason};
pub use scripted::ScriptedGuesser;

use crate::core::{Code, Feedback};

/// Errors that can occur while a guesser decides
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuesserError {
    /// No code is consistent with the feedback received so far
    #[error("no candidate code is consistent with the feedback")]
    NoCandidates,

    /// The strategy's backend failed
    #[error("guesser backend error: {0}")]
    Backend(String),
}

/// Capability of an automated player
#[async_trait::async_trait]
pub trait Guesser: Send {
    /// Produce the next code to try
    ///
    /// Returns `Ok(None)` when the guesser gives up.
    async fn next_guess(&mut self) -> Result<Option<Code>, GuesserError>;

    /// Receive the feedback for the most recent guess
    async fn accept_feedback(&mut self, feedback: Feedback);

    /// Display name for logs
    fn name(&self) -> &str;
}

/// Guesser variants selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GuesserStrategy {
    #[default]
    Elimination,
    Random,
}

impl GuesserStrategy {
    /// Build a fresh guesser of this kind
    pub fn build(self) -> Box<dyn Guesser> {
        match self {
            GuesserStrategy::Elimination => Box::new(EliminationGuesser::new()),
            GuesserStrategy::Random => Box::new(RandomGuesser::new(None)),
        }
    }
}

impl std::str::FromStr for GuesserStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "elimination" => Ok(GuesserStrategy::Elimination),
            "random" => Ok(GuesserStrategy::Random),
            other => Err(format!("unknown guesser strategy: {}", other)),
        }
    }
}
