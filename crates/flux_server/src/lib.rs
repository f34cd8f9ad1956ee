//! Flux Match server library.
//!
//! Persists Telegram users, referrals and match-3 game states in SQLite and
//! serves them over a JSON HTTP API. Every swap is resolved here with the
//! [`flux_board`] engine; clients never submit scores.
//!
//! # Architecture
//!
//! - **db**: diesel models, embedded migrations and [`GameRepository`]
//! - **Services**: [`ProfileService`], [`ReferralService`], [`GameService`]
//! - **api**: axum [`router`] over the services
//!
//! # Example
//!
//! ```no_run
//! use flux_server::{AppState, GameRepository, ServerConfig, router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repository = GameRepository::new("flux.db".to_string())?;
//! repository.run_migrations()?;
//! let app = router(AppState::new(repository, &ServerConfig::default()));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod api;
mod config;
mod db;
mod error;
mod game_service;
mod profile_service;
mod referral_service;

// Crate-level exports - Configuration
pub use config::{ConfigError, ReferralRewards, ServerConfig};

// Crate-level exports - Database
pub use db::{
    DbError, GameRepository, GameStateRecord, MIGRATIONS, NewGameStateRecord, NewReferral,
    NewUser, ReferralRecord, ReferredUser, User, UserProfileUpdate,
};

// Crate-level exports - Services
pub use error::ServiceError;
pub use game_service::{GameService, GameStateView, SwapResult};
pub use profile_service::{ProfileService, TelegramProfile, UpsertedUser, random_referral_code};
pub use referral_service::{CreatedReferral, ReferralService, ReferralSummary, ReferralView};

// Crate-level exports - HTTP
pub use api::{ApiError, AppState, router};
