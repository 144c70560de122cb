pub mod broadcast;
pub mod code;
pub mod constants;
pub mod feedback;
pub mod game_state;
pub mod game_store;

pub use broadcast::{BroadcastHub, Subscription};
pub use code::Code;
pub use constants::*;
pub use feedback::{evaluate, evaluate_simplified, EvaluationMode, Feedback};
pub use game_state::{
    GameId, GameSnapshot, GameState, GameStatus, Guess, PendingCounts, PendingGuess, Player,
};
pub use game_store::{GameHandle, GameStats, GameStore};
