pub mod lifecycle;
pub mod turn_sequencer;

pub use lifecycle::LifecycleManager;
pub use turn_sequencer::{Submission, TurnSequencer};
