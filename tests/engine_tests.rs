//! Engine-level tests for turn sequencing and update delivery
//!
//! These tests drive `GameEngine` directly (no HTTP) and verify:
//! - Feedback and winner of a full scripted game
//! - Strict alternation under concurrent submissions
//! - Buffering of out-of-turn guesses
//! - Identical update sequences for every subscriber

use codebreaker::{
    core::{evaluate, Code, Feedback, GameSnapshot, GameStatus, Player},
    engine::GameEngine,
    error::GameError,
    guessers::{run_guesser, EliminationGuesser, StopReason},
};
use std::sync::Arc;

fn code(s: &str) -> Code {
    Code::parse(s).unwrap()
}

async fn new_game(engine: &GameEngine) -> String {
    engine
        .create_game(Some(code("4821")), Some(code("8135")))
        .await
        .game_id
}

async fn collect(mut subscription: codebreaker::core::Subscription) -> Vec<GameSnapshot> {
    let mut seen = Vec::new();
    while let Some(snapshot) = subscription.next().await {
        seen.push(snapshot);
    }
    seen
}

mod scenario_tests {
    use super::*;

    #[tokio::test]
    async fn test_player_one_wins_on_fifth_guess() {
        let engine = GameEngine::default();
        let game_id = new_game(&engine).await;

        let p1 = ["1234", "5678", "1235", "1243", "8135"];
        let p2 = ["0967", "0967", "0967", "0967"];

        for (i, guess) in p1.iter().enumerate() {
            engine
                .submit_guess(&game_id, code(guess), Player::PlayerOne, None)
                .await
                .unwrap();
            if let Some(reply) = p2.get(i) {
                engine
                    .submit_guess(&game_id, code(reply), Player::PlayerTwo, None)
                    .await
                    .unwrap();
            }
        }

        let state = engine.snapshot(&game_id).await.unwrap();
        assert_eq!(state.status, GameStatus::Completed);
        assert_eq!(state.winner, Some(Player::PlayerOne));
        assert_eq!(state.history.len(), 9);

        let feedback: Vec<Feedback> = state
            .history
            .iter()
            .filter(|g| g.player == Player::PlayerOne)
            .map(|g| g.feedback)
            .collect();
        assert_eq!(
            feedback,
            [2, 2, 3, 2, 4].map(Feedback::Simplified).to_vec()
        );
    }

    #[tokio::test]
    async fn test_nothing_recorded_after_completion() {
        let engine = GameEngine::default();
        let game_id = new_game(&engine).await;

        engine
            .submit_guess(&game_id, code("8135"), Player::PlayerOne, None)
            .await
            .unwrap();

        let result = engine
            .submit_guess(&game_id, code("4821"), Player::PlayerTwo, None)
            .await;
        assert!(matches!(result, Err(GameError::InvalidState { .. })));

        let state = engine.snapshot(&game_id).await.unwrap();
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.winner, Some(Player::PlayerOne));
    }

    #[tokio::test]
    async fn test_guess_for_unknown_game() {
        let engine = GameEngine::default();
        let result = engine
            .submit_guess("missing", code("1234"), Player::PlayerOne, None)
            .await;
        assert!(matches!(result, Err(GameError::NotFound { .. })));
    }
}

mod sequencing_tests {
    use super::*;

    #[tokio::test]
    async fn test_out_of_turn_guesses_wait_in_order() {
        let engine = GameEngine::default();
        let game_id = new_game(&engine).await;

        engine
            .submit_guess(&game_id, code("0123"), Player::PlayerTwo, None)
            .await
            .unwrap();
        engine
            .submit_guess(&game_id, code("0456"), Player::PlayerTwo, None)
            .await
            .unwrap();

        let state = engine.snapshot(&game_id).await.unwrap();
        assert!(state.history.is_empty());
        assert_eq!(state.pending.player_2, 2);

        let submission = engine
            .submit_guess(&game_id, code("1234"), Player::PlayerOne, None)
            .await
            .unwrap();
        assert_eq!(submission.recorded, 2);

        let state = engine.snapshot(&game_id).await.unwrap();
        assert_eq!(submission.snapshot, state);
        let codes: Vec<String> = state.history.iter().map(|g| g.code.to_string()).collect();
        assert_eq!(codes, ["1234", "0123"]);
        assert_eq!(state.pending.player_2, 1);
        assert_eq!(state.waiting_for_player, Some(Player::PlayerOne));

        engine
            .submit_guess(&game_id, code("5678"), Player::PlayerOne, None)
            .await
            .unwrap();

        let state = engine.snapshot(&game_id).await.unwrap();
        let codes: Vec<String> = state.history.iter().map(|g| g.code.to_string()).collect();
        assert_eq!(codes, ["1234", "0123", "5678", "0456"]);
        assert_eq!(state.pending.player_2, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_alternate() {
        let engine = Arc::new(GameEngine::default());
        let game_id = new_game(&engine).await;
        const ROUNDS: usize = 25;

        let mut tasks = Vec::new();
        for (player, guess) in [(Player::PlayerOne, "5678"), (Player::PlayerTwo, "0967")] {
            let engine = engine.clone();
            let game_id = game_id.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..ROUNDS {
                    engine
                        .submit_guess(&game_id, code(guess), player, None)
                        .await
                        .unwrap();
                    tokio::task::yield_now().await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let state = engine.snapshot(&game_id).await.unwrap();
        assert_eq!(state.history.len(), ROUNDS * 2);
        assert_eq!(state.history[0].player, Player::PlayerOne);
        for pair in state.history.windows(2) {
            assert_ne!(pair[0].player, pair[1].player);
        }
        for guess in &state.history {
            let secret = if guess.player == Player::PlayerOne {
                code("8135")
            } else {
                code("4821")
            };
            let (exact, misplaced) = evaluate(&guess.code, &secret);
            assert_eq!(guess.feedback, Feedback::Simplified(exact + misplaced));
        }
    }

    #[tokio::test]
    async fn test_cancel_rejects_further_guesses() {
        let engine = GameEngine::default();
        let game_id = new_game(&engine).await;

        engine.cancel_game(&game_id).await.unwrap();

        let result = engine
            .submit_guess(&game_id, code("1234"), Player::PlayerOne, None)
            .await;
        assert!(matches!(result, Err(GameError::InvalidState { .. })));
        assert!(matches!(
            engine.cancel_game(&game_id).await,
            Err(GameError::InvalidState { .. })
        ));
    }
}

mod subscription_tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_see_identical_sequences() {
        let engine = GameEngine::default();
        let game_id = new_game(&engine).await;

        let first = engine.subscribe(&game_id).await.unwrap();
        let second = engine.subscribe(&game_id).await.unwrap();

        for (p1, p2) in [("1234", "0967"), ("5678", "0967")] {
            engine
                .submit_guess(&game_id, code(p1), Player::PlayerOne, None)
                .await
                .unwrap();
            engine
                .submit_guess(&game_id, code(p2), Player::PlayerTwo, None)
                .await
                .unwrap();
        }
        engine
            .submit_guess(&game_id, code("8135"), Player::PlayerOne, None)
            .await
            .unwrap();

        let first = collect(first).await;
        let second = collect(second).await;

        assert_eq!(first, second);
        // Initial state plus one snapshot per recorded guess
        assert_eq!(first.len(), 6);
        assert!(first[0].history.is_empty());
        for (i, snapshot) in first.iter().enumerate() {
            assert_eq!(snapshot.history.len(), i);
        }
        assert_eq!(first[5].status, GameStatus::Completed);
    }

    #[tokio::test]
    async fn test_detached_subscriber_does_not_affect_others() {
        let engine = GameEngine::default();
        let game_id = new_game(&engine).await;

        let leaving = engine.subscribe(&game_id).await.unwrap();
        let staying = engine.subscribe(&game_id).await.unwrap();
        leaving.detach();

        engine
            .submit_guess(&game_id, code("8135"), Player::PlayerOne, None)
            .await
            .unwrap();

        let seen = collect(staying).await;
        assert_eq!(seen.len(), 2);
        assert_eq!(engine.subscriber_count(&game_id).await, 0);
    }

    #[tokio::test]
    async fn test_subscribe_to_finished_game_yields_final_state() {
        let engine = GameEngine::default();
        let game_id = new_game(&engine).await;
        engine
            .submit_guess(&game_id, code("8135"), Player::PlayerOne, None)
            .await
            .unwrap();

        let seen = collect(engine.subscribe(&game_id).await.unwrap()).await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].winner, Some(Player::PlayerOne));
    }
}

mod guesser_tests {
    use super::*;

    #[tokio::test]
    async fn test_guesser_finds_human_secret() {
        let engine = Arc::new(GameEngine::default());
        let game_id = new_game(&engine).await;

        let ai = {
            let engine = engine.clone();
            let game_id = game_id.clone();
            tokio::spawn(async move {
                let mut guesser = EliminationGuesser::new();
                run_guesser(&engine, &game_id, Player::PlayerTwo, &mut guesser, 64).await
            })
        };

        // The human never finds 8135, so the guesser must eventually win
        let mut subscription = engine.subscribe(&game_id).await.unwrap();
        while let Some(snapshot) = subscription.next().await {
            if snapshot.status.is_terminal() {
                break;
            }
            if snapshot.waiting_for_player == Some(Player::PlayerOne) {
                engine
                    .submit_guess(&game_id, code("0967"), Player::PlayerOne, None)
                    .await
                    .unwrap();
            }
        }

        let outcome = ai.await.unwrap().unwrap();
        assert_eq!(outcome.reason, StopReason::GameFinished);
        assert_eq!(outcome.winner, Some(Player::PlayerTwo));

        let state = engine.snapshot(&game_id).await.unwrap();
        let last = state.history.last().unwrap();
        assert_eq!(last.code, code("4821"));
        assert_eq!(last.player, Player::PlayerTwo);
        assert_eq!(last.comment.as_deref(), Some("elimination"));
    }
}
