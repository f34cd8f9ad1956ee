//! Database persistence layer for users, referrals and game states.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::{
    GameStateRecord, NewGameStateRecord, NewReferral, NewUser, ReferralRecord, ReferredUser,
    User, UserProfileUpdate,
};
pub use repository::{GameRepository, MIGRATIONS};
