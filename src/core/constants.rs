/// Number of digits in every secret and guess
pub const CODE_LENGTH: usize = 4;

/// Number of distinct 4-digit codes with pairwise-distinct digits (10 * 9 * 8 * 7)
pub const CODE_SPACE_SIZE: usize = 5040;

/// Games older than this are removed by the sweeper (1 hour)
pub const GAME_TTL_SECONDS: u64 = 3600;

/// Largest accepted game TTL (30 days)
pub const MAX_GAME_TTL_SECONDS: u64 = 30 * 24 * 3600;

/// How often the sweeper runs
pub const CLEANUP_INTERVAL_SECONDS: u64 = 60;

/// Upper bound on guesses an automated player submits in one game
///
/// Above the worst case of the elimination guesser in simplified mode.
pub const GUESSER_MAX_ATTEMPTS: usize = 40;

/// Guesser errors tolerated before an automated player gives up
pub const GUESSER_MAX_ERRORS: usize = 3;

/// Maximum length of a free-form guess comment
pub const MAX_COMMENT_LENGTH: usize = 500;
