//! Database models and domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use flux_board::Tile;
use serde::Serialize;
use tracing::instrument;

use crate::db::{DbError, schema};

/// User profile database model, keyed by Telegram identity.
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Getters, Serialize)]
#[diesel(table_name = schema::users)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: i32,
    telegram_id: i64,
    username: String,
    first_name: String,
    last_name: String,
    referral_code: String,
    points: i64,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl User {
    /// True if the stored Telegram profile fields differ from the given ones.
    pub fn profile_differs(&self, username: &str, first_name: &str, last_name: &str) -> bool {
        self.username != username || self.first_name != first_name || self.last_name != last_name
    }
}

/// Insertable user model for creating new users.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    telegram_id: i64,
    username: String,
    first_name: String,
    last_name: String,
    referral_code: String,
}

/// Changeset refreshing the Telegram profile fields of a user.
#[derive(Debug, Clone, AsChangeset, new)]
#[diesel(table_name = schema::users)]
pub struct UserProfileUpdate {
    username: String,
    first_name: String,
    last_name: String,
    updated_at: NaiveDateTime,
}

/// Referral database model: `referrer_id` brought `referred_user_id` in.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::referrals)]
pub struct ReferralRecord {
    id: i32,
    referrer_id: i32,
    referred_user_id: i32,
    earnings: f64,
    created_at: NaiveDateTime,
}

/// Insertable referral model.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::referrals)]
pub struct NewReferral {
    referrer_id: i32,
    referred_user_id: i32,
    earnings: f64,
}

/// A referred user as listed to their referrer.
#[derive(Debug, Clone, PartialEq, Queryable, Getters, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferredUser {
    telegram_id: i64,
    username: String,
    #[serde(skip)]
    earnings: f64,
}

/// Persisted game state: score, moves remaining and the board as JSON.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::game_states)]
#[diesel(belongs_to(User))]
pub struct GameStateRecord {
    id: i32,
    user_id: i32,
    score: i64,
    moves: i32,
    tiles: String,
    last_played: NaiveDateTime,
}

impl GameStateRecord {
    /// Parses the stored tiles (a JSON array of color names).
    ///
    /// An empty column decodes to no tiles.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the column is not a JSON array of known colors.
    #[instrument(skip(self), fields(id = self.id))]
    pub fn parse_tiles(&self) -> Result<Vec<Tile>, DbError> {
        if self.tiles.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&self.tiles)?)
    }
}

/// Insertable or update-able game state.
#[derive(Debug, Clone, Insertable, AsChangeset, Getters)]
#[diesel(table_name = schema::game_states)]
pub struct NewGameStateRecord {
    user_id: i32,
    score: i64,
    moves: i32,
    tiles: String,
    last_played: NaiveDateTime,
}

impl NewGameStateRecord {
    /// Builds a record, encoding the tiles as a JSON array of color names.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if encoding fails.
    #[instrument(skip(tiles), fields(tiles = tiles.len()))]
    pub fn new(
        user_id: i32,
        score: i64,
        moves: i32,
        tiles: &[Tile],
        last_played: NaiveDateTime,
    ) -> Result<Self, DbError> {
        Ok(Self {
            user_id,
            score,
            moves,
            tiles: serde_json::to_string(tiles)?,
            last_played,
        })
    }
}
