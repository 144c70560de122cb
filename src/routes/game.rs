use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    core::Player,
    error::GameResult,
    guessers::spawn_guesser,
    models::{
        CreateGameRequest, EvaluateRequest, EvaluateResponse, GameCreatedResponse,
        GuessAcceptedResponse, GuessRequest, StatsResponse, VsAiRequest,
    },
    state::AppState,
};

/// Create a player-vs-player game
///
/// # Returns
///
/// 201 with the new game's id; secrets are never echoed back
pub async fn create_game(
    State(state): State<AppState>,
    Json(request): Json<CreateGameRequest>,
) -> GameResult<impl IntoResponse> {
    let (secret_1, secret_2) = request.secrets()?;
    let snapshot = state.engine.create_game(secret_1, secret_2).await;

    tracing::info!("Created game {}", snapshot.game_id);

    Ok((
        StatusCode::CREATED,
        Json(GameCreatedResponse::from_snapshot(&snapshot, None)),
    ))
}

/// Create a game against the automated guesser
///
/// The caller is player 1 and moves first. The guesser plays player 2 in a
/// background task and tries to find the caller's secret.
pub async fn create_vs_ai_game(
    State(state): State<AppState>,
    Json(request): Json<VsAiRequest>,
) -> GameResult<impl IntoResponse> {
    let secret = request.secret()?;
    let snapshot = state.engine.create_game(secret, None).await;

    let guesser = state.config.guesser_strategy.build();
    let opponent = guesser.name().to_string();

    spawn_guesser(
        state.engine.clone(),
        snapshot.game_id.clone(),
        Player::PlayerTwo,
        guesser,
        state.config.guesser_max_attempts,
    );

    tracing::info!(
        "Created game {} against the {} guesser",
        snapshot.game_id,
        opponent
    );

    Ok((
        StatusCode::CREATED,
        Json(GameCreatedResponse::from_snapshot(&snapshot, Some(opponent))),
    ))
}

/// Current state of a game, secrets hidden until it is over
pub async fn get_game(
    Path(game_id): Path<String>,
    State(state): State<AppState>,
) -> GameResult<impl IntoResponse> {
    let snapshot = state.engine.snapshot(&game_id).await?;
    Ok(Json(snapshot.public_view()))
}

/// Submit a guess
///
/// Guesses made out of turn are buffered and recorded once the opponent
/// has moved.
pub async fn submit_guess(
    Path(game_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<GuessRequest>,
) -> GameResult<impl IntoResponse> {
    let code = request.code()?;
    let comment = GuessRequest::validate_comment(request.comment.as_deref())?;

    let submission = state
        .engine
        .submit_guess(&game_id, code, request.player, comment)
        .await?;

    Ok(Json(GuessAcceptedResponse {
        game_id,
        recorded: submission.recorded,
        state: submission.snapshot.public_view(),
    }))
}

/// Cancel a running game
pub async fn cancel_game(
    Path(game_id): Path<String>,
    State(state): State<AppState>,
) -> GameResult<impl IntoResponse> {
    state.engine.cancel_game(&game_id).await?;
    let snapshot = state.engine.snapshot(&game_id).await?;
    Ok(Json(snapshot.public_view()))
}

/// Score a guess against a secret without a game
pub async fn evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> GameResult<impl IntoResponse> {
    let (guess, secret) = request.codes()?;
    let mode = request.mode.unwrap_or_else(|| state.engine.mode());

    Ok(Json(EvaluateResponse::new(guess, secret, mode)))
}

/// Game counts
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatsResponse {
        games: state.engine.stats().await,
        evaluation_mode: state.engine.mode(),
    })
}
