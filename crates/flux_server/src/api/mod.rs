//! JSON HTTP surface over the profile, referral and game services.

mod error;
mod handlers;

pub use error::ApiError;

use axum::Router;
use axum::routing::{get, post};
use tracing::{info, instrument};

use crate::{GameRepository, GameService, ProfileService, ReferralService, ServerConfig};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    profiles: ProfileService,
    referrals: ReferralService,
    games: GameService,
}

impl AppState {
    /// Wires the services over one repository.
    #[instrument(skip_all)]
    pub fn new(repository: GameRepository, config: &ServerConfig) -> Self {
        Self {
            profiles: ProfileService::new(repository.clone(), config.referrals().clone()),
            referrals: ReferralService::new(repository.clone(), config.referrals().clone()),
            games: GameService::new(repository, config.rules().clone()),
        }
    }
}

/// Builds the application router.
#[instrument(skip_all)]
pub fn router(state: AppState) -> Router {
    info!("Building router");
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/user",
            get(handlers::get_user).post(handlers::upsert_user),
        )
        .route(
            "/api/game-state",
            get(handlers::current_game).post(handlers::start_game),
        )
        .route("/api/game-state/swap", post(handlers::swap))
        .route("/api/game-state/reset", post(handlers::reset_game))
        .route(
            "/api/referrals",
            get(handlers::list_referrals).post(handlers::create_referral),
        )
        .with_state(state)
}
