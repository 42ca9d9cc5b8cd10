use std::collections::HashMap;
use std::sync::Arc;

use tracing::error;
use uuid::Uuid;
use warp::Filter;
use warp::http::StatusCode;

use game_core::{CancelError, GameSession, draw_ai_move, stats};
use game_persistence::repositories::{GameRepository, UserRepository};
use game_types::{
    ApiError, CreateUserRequest, GameResponse, HistoryResponse, MakeMoveRequest, NewGameRequest,
    RankEntry, ScoreEntry, User, UserProfile,
};

pub mod config;
pub mod reminders;

const NEW_GAME_MSG: &str = "Guard, get a boost and attack!!";
const GET_GAME_MSG: &str = "Time to make a move!";
const CANCELLED_MSG: &str = "Game Cancelled!";

pub fn create_routes(
    user_repository: Arc<UserRepository>,
    game_repository: Arc<GameRepository>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // Clone for filters
    let user_repository_filter = warp::any().map({
        let user_repository = user_repository.clone();
        move || user_repository.clone()
    });

    let game_repository_filter = warp::any().map({
        let game_repository = game_repository.clone();
        move || game_repository.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    // User creation
    let create_user = warp::path!("user")
        .and(warp::post())
        .and(warp::body::json())
        .and(user_repository_filter.clone())
        .and_then(handle_create_user);

    // Single user lookup
    let get_user = warp::path!("user" / String)
        .and(warp::get())
        .and(user_repository_filter.clone())
        .and_then(handle_get_user);

    // All users, ordered by username
    let get_users = warp::path!("users")
        .and(warp::get())
        .and(user_repository_filter.clone())
        .and_then(handle_get_users);

    // New game
    let new_game = warp::path!("game")
        .and(warp::post())
        .and(warp::body::json())
        .and(user_repository_filter.clone())
        .and(game_repository_filter.clone())
        .and_then(handle_new_game);

    // Current game state
    let get_game = warp::path!("game" / Uuid)
        .and(warp::get())
        .and(user_repository_filter.clone())
        .and(game_repository_filter.clone())
        .and_then(handle_get_game);

    // Move submission
    let make_move = warp::path!("game" / Uuid)
        .and(warp::put())
        .and(warp::body::json())
        .and(user_repository_filter.clone())
        .and(game_repository_filter.clone())
        .and_then(handle_make_move);

    // Explicit quit
    let quit_game = warp::path!("game" / Uuid / "quit")
        .and(warp::put())
        .and(user_repository_filter.clone())
        .and(game_repository_filter.clone())
        .and_then(handle_quit_game);

    // Move log
    let get_history = warp::path!("game" / Uuid / "history")
        .and(warp::get())
        .and(game_repository_filter.clone())
        .and_then(handle_get_history);

    // All games, most recent first
    let get_games = warp::path!("games")
        .and(warp::get())
        .and(user_repository_filter.clone())
        .and(game_repository_filter.clone())
        .and_then(handle_get_games);

    // A user's open games
    let get_user_games = warp::path!("user" / String / "games")
        .and(warp::get())
        .and(user_repository_filter.clone())
        .and(game_repository_filter.clone())
        .and_then(handle_get_user_games);

    // Win-streak listing (recompute sweep)
    let get_scores = warp::path!("scores")
        .and(warp::get())
        .and(user_repository_filter.clone())
        .and(game_repository_filter.clone())
        .and_then(handle_get_scores);

    // Win-ratio listing (recompute sweep)
    let get_rankings = warp::path!("rankings")
        .and(warp::get())
        .and(user_repository_filter.clone())
        .and(game_repository_filter.clone())
        .and_then(handle_get_rankings);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "PUT"]);

    health
        .or(create_user)
        .or(get_users)
        .or(get_user_games)
        .or(get_user)
        .or(new_game)
        .or(quit_game)
        .or(get_history)
        .or(get_game)
        .or(make_move)
        .or(get_games)
        .or(get_scores)
        .or(get_rankings)
        .with(cors)
        .with(warp::log("guard_boost_hit"))
}

fn reply_ok<T: serde::Serialize>(value: &T) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(value), StatusCode::OK)
}

fn reply_error(status: StatusCode, error: &ApiError) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": error,
            "message": error.message(),
        })),
        status,
    )
}

fn reply_internal(err: &anyhow::Error) -> warp::reply::WithStatus<warp::reply::Json> {
    reply_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        &ApiError::Internal {
            message: err.to_string(),
        },
    )
}

/// Resolve a game's owning username for response projections.
///
/// A dangling owner id renders as a placeholder so stale games stay
/// readable; a repository failure is the caller's error to surface.
async fn owner_username(user_repository: &UserRepository, user_id: Uuid) -> anyhow::Result<String> {
    Ok(match user_repository.find_by_id(user_id).await? {
        Some(user) => user.username,
        None => "unknown".to_string(),
    })
}

async fn handle_create_user(
    request: CreateUserRequest,
    user_repository: Arc<UserRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match user_repository.find_by_username(&request.username).await {
        Ok(Some(_)) => {
            return Ok(reply_error(
                StatusCode::CONFLICT,
                &ApiError::UsernameTaken {
                    username: request.username,
                },
            ));
        }
        Ok(None) => {}
        Err(err) => {
            error!("Failed to check username: {}", err);
            return Ok(reply_internal(&err));
        }
    }

    let user = User::new(
        Uuid::new_v4(),
        request.username,
        request.email,
        chrono::Utc::now().to_rfc3339(),
    );

    match user_repository.create_user(user).await {
        Ok(created) => Ok(reply_ok(&UserProfile::from(&created))),
        Err(err) => {
            error!("Failed to create user: {}", err);
            Ok(reply_internal(&err))
        }
    }
}

async fn handle_get_user(
    username: String,
    user_repository: Arc<UserRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match user_repository.find_by_username(&username).await {
        Ok(Some(user)) => Ok(reply_ok(&UserProfile::from(&user))),
        Ok(None) => Ok(reply_error(
            StatusCode::NOT_FOUND,
            &ApiError::UserNotFound { username },
        )),
        Err(err) => {
            error!("Failed to fetch user: {}", err);
            Ok(reply_internal(&err))
        }
    }
}

async fn handle_get_users(
    user_repository: Arc<UserRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match user_repository.list_by_username().await {
        Ok(users) => {
            let profiles: Vec<UserProfile> = users.iter().map(UserProfile::from).collect();
            Ok(reply_ok(&profiles))
        }
        Err(err) => {
            error!("Failed to list users: {}", err);
            Ok(reply_internal(&err))
        }
    }
}

async fn handle_new_game(
    request: NewGameRequest,
    user_repository: Arc<UserRepository>,
    game_repository: Arc<GameRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = match user_repository.find_by_username(&request.username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(reply_error(
                StatusCode::NOT_FOUND,
                &ApiError::UserNotFound {
                    username: request.username,
                },
            ));
        }
        Err(err) => {
            error!("Failed to fetch user: {}", err);
            return Ok(reply_internal(&err));
        }
    };

    let session = GameSession::new(user.id);
    match game_repository.create_game(session.into_state()).await {
        Ok(game) => Ok(reply_ok(&GameResponse::from_game(
            &game,
            user.username,
            NEW_GAME_MSG,
        ))),
        Err(err) => {
            error!("Failed to create game: {}", err);
            Ok(reply_internal(&err))
        }
    }
}

async fn handle_get_game(
    game_id: Uuid,
    user_repository: Arc<UserRepository>,
    game_repository: Arc<GameRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match game_repository.find_by_id(game_id).await {
        Ok(Some(game)) => {
            let username = match owner_username(&user_repository, game.user_id).await {
                Ok(username) => username,
                Err(err) => {
                    error!("Failed to resolve game owner: {}", err);
                    return Ok(reply_internal(&err));
                }
            };
            Ok(reply_ok(&GameResponse::from_game(
                &game,
                username,
                GET_GAME_MSG,
            )))
        }
        Ok(None) => Ok(reply_error(
            StatusCode::NOT_FOUND,
            &ApiError::GameNotFound {
                game_id: game_id.to_string(),
            },
        )),
        Err(err) => {
            error!("Failed to fetch game: {}", err);
            Ok(reply_internal(&err))
        }
    }
}

async fn handle_make_move(
    game_id: Uuid,
    request: MakeMoveRequest,
    user_repository: Arc<UserRepository>,
    game_repository: Arc<GameRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let game = match game_repository.find_by_id(game_id).await {
        Ok(Some(game)) => game,
        Ok(None) => {
            return Ok(reply_error(
                StatusCode::NOT_FOUND,
                &ApiError::GameNotFound {
                    game_id: game_id.to_string(),
                },
            ));
        }
        Err(err) => {
            error!("Failed to fetch game: {}", err);
            return Ok(reply_internal(&err));
        }
    };

    let mut session = GameSession::from_state(game);
    // The opponent is an independent uniform draw, never seeded
    let ai_move = draw_ai_move();
    let result = session.submit_move(&request.play, ai_move);
    let message = result.message().to_string();

    // Write-through on every submission, including the recoverable
    // invalid-move case where the record is unchanged. The already-over
    // no-op skips the write.
    if !matches!(result, game_core::PlayResult::AlreadyOver { .. }) {
        if let Err(err) = game_repository.save(&session.state).await {
            error!("Failed to save game: {}", err);
            return Ok(reply_internal(&err));
        }
    }

    let username = match owner_username(&user_repository, session.state.user_id).await {
        Ok(username) => username,
        Err(err) => {
            error!("Failed to resolve game owner: {}", err);
            return Ok(reply_internal(&err));
        }
    };
    Ok(reply_ok(&GameResponse::from_game(
        &session.state,
        username,
        &message,
    )))
}

async fn handle_quit_game(
    game_id: Uuid,
    user_repository: Arc<UserRepository>,
    game_repository: Arc<GameRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let game = match game_repository.find_by_id(game_id).await {
        Ok(Some(game)) => game,
        Ok(None) => {
            return Ok(reply_error(
                StatusCode::NOT_FOUND,
                &ApiError::GameNotFound {
                    game_id: game_id.to_string(),
                },
            ));
        }
        Err(err) => {
            error!("Failed to fetch game: {}", err);
            return Ok(reply_internal(&err));
        }
    };

    let mut session = GameSession::from_state(game);
    match session.cancel() {
        Ok(()) => {}
        Err(CancelError::AlreadyCancelled) => {
            return Ok(reply_error(
                StatusCode::CONFLICT,
                &ApiError::GameAlreadyCancelled,
            ));
        }
        Err(CancelError::AlreadyOver) => {
            return Ok(reply_error(StatusCode::CONFLICT, &ApiError::GameAlreadyOver));
        }
    }

    if let Err(err) = game_repository.save(&session.state).await {
        error!("Failed to save cancelled game: {}", err);
        return Ok(reply_internal(&err));
    }

    let username = match owner_username(&user_repository, session.state.user_id).await {
        Ok(username) => username,
        Err(err) => {
            error!("Failed to resolve game owner: {}", err);
            return Ok(reply_internal(&err));
        }
    };
    Ok(reply_ok(&GameResponse::from_game(
        &session.state,
        username,
        CANCELLED_MSG,
    )))
}

async fn handle_get_history(
    game_id: Uuid,
    game_repository: Arc<GameRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match game_repository.find_by_id(game_id).await {
        Ok(Some(game)) => {
            let session = GameSession::from_state(game);
            Ok(reply_ok(&HistoryResponse {
                message: session.history(),
            }))
        }
        Ok(None) => Ok(reply_error(
            StatusCode::NOT_FOUND,
            &ApiError::GameNotFound {
                game_id: game_id.to_string(),
            },
        )),
        Err(err) => {
            error!("Failed to fetch game history: {}", err);
            Ok(reply_internal(&err))
        }
    }
}

async fn handle_get_games(
    user_repository: Arc<UserRepository>,
    game_repository: Arc<GameRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let games = match game_repository.list_by_date_desc().await {
        Ok(games) => games,
        Err(err) => {
            error!("Failed to list games: {}", err);
            return Ok(reply_internal(&err));
        }
    };

    let usernames: HashMap<Uuid, String> = match user_repository.list_by_username().await {
        Ok(users) => users.into_iter().map(|u| (u.id, u.username)).collect(),
        Err(err) => {
            error!("Failed to list users: {}", err);
            return Ok(reply_internal(&err));
        }
    };

    let responses: Vec<GameResponse> = games
        .iter()
        .map(|game| {
            let username = usernames
                .get(&game.user_id)
                .cloned()
                .unwrap_or_else(|| "unknown".to_string());
            GameResponse::from_game(game, username, "")
        })
        .collect();

    Ok(reply_ok(&responses))
}

async fn handle_get_user_games(
    username: String,
    user_repository: Arc<UserRepository>,
    game_repository: Arc<GameRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = match user_repository.find_by_username(&username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(reply_error(
                StatusCode::NOT_FOUND,
                &ApiError::UserNotFound { username },
            ));
        }
        Err(err) => {
            error!("Failed to fetch user: {}", err);
            return Ok(reply_internal(&err));
        }
    };

    match game_repository.list_open_for_user(user.id).await {
        Ok(games) => {
            let responses: Vec<GameResponse> = games
                .iter()
                .map(|game| GameResponse::from_game(game, user.username.clone(), ""))
                .collect();
            Ok(reply_ok(&responses))
        }
        Err(err) => {
            error!("Failed to list user games: {}", err);
            Ok(reply_internal(&err))
        }
    }
}

/// Full recompute sweep behind `/scores`: every user's streak is
/// rederived from their completed non-cancelled games and written back,
/// then the fresh listing is returned. O(users x games) by design.
async fn recompute_scores(
    user_repository: &UserRepository,
    game_repository: &GameRepository,
) -> anyhow::Result<Vec<ScoreEntry>> {
    let users = user_repository.list_by_username().await?;

    for user in &users {
        let games = game_repository.list_completed_for_user(user.id).await?;
        let streak = stats::win_streak(&games);
        user_repository.save_streak(user.id, streak).await?;
    }

    let ordered = user_repository.list_by_win_streak_desc().await?;
    Ok(ordered
        .iter()
        .map(|user| ScoreEntry {
            username: user.username.clone(),
            win_streak: user.win_streak,
        })
        .collect())
}

async fn handle_get_scores(
    user_repository: Arc<UserRepository>,
    game_repository: Arc<GameRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match recompute_scores(&user_repository, &game_repository).await {
        Ok(scores) => Ok(reply_ok(&scores)),
        Err(err) => {
            error!("Failed to recompute scores: {}", err);
            Ok(reply_internal(&err))
        }
    }
}

/// Same sweep shape as `/scores`, for the win-ratio ranking.
async fn recompute_rankings(
    user_repository: &UserRepository,
    game_repository: &GameRepository,
) -> anyhow::Result<Vec<RankEntry>> {
    let users = user_repository.list_by_username().await?;

    for user in &users {
        let games = game_repository.list_completed_for_user(user.id).await?;
        let totals = stats::ranking(&games);
        user_repository
            .save_ranking(user.id, totals.total_games, totals.wins, totals.win_ratio)
            .await?;
    }

    let ordered = user_repository.list_by_win_ratio_desc().await?;
    Ok(ordered.iter().map(RankEntry::from_user).collect())
}

async fn handle_get_rankings(
    user_repository: Arc<UserRepository>,
    game_repository: Arc<GameRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match recompute_rankings(&user_repository, &game_repository).await {
        Ok(rankings) => Ok(reply_ok(&rankings)),
        Err(err) => {
            error!("Failed to recompute rankings: {}", err);
            Ok(reply_internal(&err))
        }
    }
}
