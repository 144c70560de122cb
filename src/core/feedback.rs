use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Code, CODE_LENGTH};

/// Result of scoring a guess against a secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Feedback {
    /// Exact-position matches and present-elsewhere matches
    Full { exact: u8, misplaced: u8 },
    /// Digits of the guess present anywhere in the secret
    Simplified(u8),
}

impl Feedback {
    /// Total number of guess digits present in the secret
    pub fn matches(&self) -> u8 {
        match *self {
            Feedback::Full { exact, misplaced } => exact + misplaced,
            Feedback::Simplified(matches) => matches,
        }
    }

    /// Mode that produced this feedback
    pub fn mode(&self) -> EvaluationMode {
        match self {
            Feedback::Full { .. } => EvaluationMode::Full,
            Feedback::Simplified(_) => EvaluationMode::Simplified,
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Full { exact, misplaced } => write!(f, "({}, {})", exact, misplaced),
            Feedback::Simplified(matches) => write!(f, "{}", matches),
        }
    }
}

/// Which scoring rule a game uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    /// Exact and misplaced counts reported separately
    Full,
    /// Only the number of shared digits is reported
    #[default]
    Simplified,
}

impl EvaluationMode {
    /// Score `guess` against `secret` under this mode
    pub fn evaluate(self, guess: &Code, secret: &Code) -> Feedback {
        let (exact, misplaced) = evaluate(guess, secret);
        match self {
            EvaluationMode::Full => Feedback::Full { exact, misplaced },
            EvaluationMode::Simplified => Feedback::Simplified(exact + misplaced),
        }
    }
}

impl std::str::FromStr for EvaluationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(EvaluationMode::Full),
            "simplified" => Ok(EvaluationMode::Simplified),
            other => Err(format!("unknown evaluation mode: {}", other)),
        }
    }
}

/// Count exact-position matches and present-elsewhere matches
///
/// # Returns
///
/// Tuple of (exact, misplaced)
pub fn evaluate(guess: &Code, secret: &Code) -> (u8, u8) {
    let mut exact = 0;
    let mut misplaced = 0;

    for i in 0..CODE_LENGTH {
        let digit = guess.digits()[i];
        if digit == secret.digits()[i] {
            exact += 1;
        } else if secret.contains(digit) {
            misplaced += 1;
        }
    }

    (exact, misplaced)
}

/// Count digits of `guess` present anywhere in `secret`
pub fn evaluate_simplified(guess: &Code, secret: &Code) -> u8 {
    let (exact, misplaced) = evaluate(guess, secret);
    exact + misplaced
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> Code {
        Code::parse(s).unwrap()
    }

    #[test]
    fn test_evaluate_known_cases() {
        assert_eq!(evaluate(&code("1234"), &code("1234")), (4, 0));
        assert_eq!(evaluate(&code("1234"), &code("5678")), (0, 0));
        assert_eq!(evaluate(&code("1234"), &code("1235")), (3, 0));
        assert_eq!(evaluate(&code("1234"), &code("1243")), (2, 2));
        assert_eq!(evaluate(&code("1234"), &code("4321")), (0, 4));
    }

    #[test]
    fn test_evaluate_self_is_all_exact() {
        for c in Code::all().step_by(37) {
            assert_eq!(evaluate(&c, &c), (4, 0));
        }
    }

    #[test]
    fn test_evaluate_never_exceeds_code_length() {
        let secret = code("4821");
        for guess in Code::all() {
            let (exact, misplaced) = evaluate(&guess, &secret);
            assert!(exact as usize + misplaced as usize <= CODE_LENGTH);
        }
    }

    #[test]
    fn test_simplified_is_sum_of_full() {
        let secret = code("8135");
        assert_eq!(evaluate_simplified(&code("1234"), &secret), 2);
        assert_eq!(evaluate_simplified(&code("5678"), &secret), 2);
        assert_eq!(evaluate_simplified(&code("1235"), &secret), 3);
        assert_eq!(evaluate_simplified(&code("1243"), &secret), 2);
        assert_eq!(evaluate_simplified(&code("8135"), &secret), 4);
        assert_eq!(evaluate_simplified(&code("5318"), &secret), 4);
    }

    #[test]
    fn test_mode_evaluate() {
        let guess = code("1243");
        let secret = code("1234");

        assert_eq!(
            EvaluationMode::Full.evaluate(&guess, &secret),
            Feedback::Full {
                exact: 2,
                misplaced: 2
            }
        );
        assert_eq!(
            EvaluationMode::Simplified.evaluate(&guess, &secret),
            Feedback::Simplified(4)
        );
    }

    #[test]
    fn test_feedback_matches_and_mode() {
        let full = Feedback::Full {
            exact: 1,
            misplaced: 2,
        };
        assert_eq!(full.matches(), 3);
        assert_eq!(full.mode(), EvaluationMode::Full);
        assert_eq!(Feedback::Simplified(2).mode(), EvaluationMode::Simplified);
    }

    #[test]
    fn test_feedback_serialization() {
        let full = Feedback::Full {
            exact: 1,
            misplaced: 1,
        };
        assert_eq!(
            serde_json::to_value(full).unwrap(),
            serde_json::json!({"exact": 1, "misplaced": 1})
        );
        assert_eq!(
            serde_json::to_value(Feedback::Simplified(3)).unwrap(),
            serde_json::json!(3)
        );
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("full".parse::<EvaluationMode>(), Ok(EvaluationMode::Full));
        assert_eq!(
            " Simplified ".parse::<EvaluationMode>(),
            Ok(EvaluationMode::Simplified)
        );
        assert!("fuzzy".parse::<EvaluationMode>().is_err());
    }
}
