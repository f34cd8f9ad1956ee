//! Database repository for users, referrals and game states.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{
    DbError, GameStateRecord, NewGameStateRecord, NewReferral, NewUser, ReferralRecord,
    ReferredUser, User, UserProfileUpdate, schema,
};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for user, referral and game state operations.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository for the SQLite database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path is empty"));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;
        diesel::sql_query("PRAGMA busy_timeout = 5000").execute(&mut conn)?;
        Ok(conn)
    }

    /// Applies any pending schema migrations. Returns how many ran.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(applied.len())
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the Telegram id or referral code is taken.
    #[instrument(skip(self, new_user))]
    pub fn create_user(&self, new_user: NewUser) -> Result<User, DbError> {
        let mut conn = self.connection()?;
        let user = insert_user(&mut conn, &new_user)?;
        info!(user_id = user.id(), telegram_id = user.telegram_id(), "User created");
        Ok(user)
    }

    /// Creates a new user and, in the same transaction, records the referral
    /// that brought them in and credits the referrer.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any step fails; nothing is written in that case.
    #[instrument(skip(self, new_user))]
    pub fn create_referred_user(
        &self,
        new_user: NewUser,
        referrer_id: i32,
        earnings: f64,
        bonus_points: i64,
    ) -> Result<User, DbError> {
        let mut conn = self.connection()?;
        let user = conn.transaction::<_, DbError, _>(|conn| {
            let user = insert_user(conn, &new_user)?;
            let referral = NewReferral::new(referrer_id, *user.id(), earnings);
            diesel::insert_into(schema::referrals::table)
                .values(&referral)
                .execute(conn)?;
            add_points(conn, referrer_id, bonus_points)?;
            Ok(user)
        })?;
        info!(user_id = user.id(), referrer_id, bonus_points, "Referred user created");
        Ok(user)
    }

    /// Gets a user by Telegram id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>, DbError> {
        let mut conn = self.connection()?;
        let user = schema::users::table
            .filter(schema::users::telegram_id.eq(telegram_id))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?;
        debug!(found = user.is_some(), "User lookup by Telegram id");
        Ok(user)
    }

    /// Gets a user by their referral code. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user_by_referral_code(&self, code: &str) -> Result<Option<User>, DbError> {
        let mut conn = self.connection()?;
        let user = schema::users::table
            .filter(schema::users::referral_code.eq(code))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?;
        debug!(found = user.is_some(), "User lookup by referral code");
        Ok(user)
    }

    /// Refreshes the Telegram profile fields of a user.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the user does not exist or a database error occurs.
    #[instrument(skip(self, update))]
    pub fn update_user_profile(
        &self,
        user_id: i32,
        update: UserProfileUpdate,
    ) -> Result<User, DbError> {
        let mut conn = self.connection()?;
        let user = diesel::update(schema::users::table.find(user_id))
            .set(&update)
            .returning(User::as_returning())
            .get_result(&mut conn)?;
        info!(user_id, "User profile updated");
        Ok(user)
    }

    /// Adds `delta` points to a user's balance.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the user does not exist or a database error occurs.
    #[instrument(skip(self))]
    pub fn add_points(&self, user_id: i32, delta: i64) -> Result<User, DbError> {
        let mut conn = self.connection()?;
        add_points(&mut conn, user_id, delta)
    }

    /// Records a referral and credits the referrer in one transaction.
    /// Returns the new referral and the updated referrer.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the referral already exists or a database error occurs.
    #[instrument(skip(self, referral), fields(referrer_id = referral.referrer_id(), referred_user_id = referral.referred_user_id()))]
    pub fn create_referral(
        &self,
        referral: NewReferral,
        bonus_points: i64,
    ) -> Result<(ReferralRecord, User), DbError> {
        let mut conn = self.connection()?;
        let (record, referrer) = conn.transaction::<_, DbError, _>(|conn| {
            let record = diesel::insert_into(schema::referrals::table)
                .values(&referral)
                .returning(ReferralRecord::as_returning())
                .get_result(conn)?;
            let referrer = add_points(conn, *referral.referrer_id(), bonus_points)?;
            Ok((record, referrer))
        })?;
        info!(referral_id = record.id(), points = referrer.points(), "Referral recorded");
        Ok((record, referrer))
    }

    /// Finds the referral between two users, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_referral(
        &self,
        referrer_id: i32,
        referred_user_id: i32,
    ) -> Result<Option<ReferralRecord>, DbError> {
        let mut conn = self.connection()?;
        let referral = schema::referrals::table
            .filter(schema::referrals::referrer_id.eq(referrer_id))
            .filter(schema::referrals::referred_user_id.eq(referred_user_id))
            .select(ReferralRecord::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(referral)
    }

    /// Lists the users referred by `referrer_id`, oldest referral first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_referred_users(&self, referrer_id: i32) -> Result<Vec<ReferredUser>, DbError> {
        let mut conn = self.connection()?;
        let referred = schema::referrals::table
            .inner_join(
                schema::users::table
                    .on(schema::referrals::referred_user_id.eq(schema::users::id)),
            )
            .filter(schema::referrals::referrer_id.eq(referrer_id))
            .order(schema::referrals::id.asc())
            .select((
                schema::users::telegram_id,
                schema::users::username,
                schema::referrals::earnings,
            ))
            .load::<ReferredUser>(&mut conn)?;
        info!(referrer_id, count = referred.len(), "Referred users loaded");
        Ok(referred)
    }

    /// Counts the referrals made by `referrer_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn count_referrals(&self, referrer_id: i32) -> Result<i64, DbError> {
        let mut conn = self.connection()?;
        let count = schema::referrals::table
            .filter(schema::referrals::referrer_id.eq(referrer_id))
            .count()
            .get_result(&mut conn)?;
        Ok(count)
    }

    /// Inserts a new game state.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, state), fields(user_id = state.user_id()))]
    pub fn create_game_state(&self, state: NewGameStateRecord) -> Result<GameStateRecord, DbError> {
        let mut conn = self.connection()?;
        let record = diesel::insert_into(schema::game_states::table)
            .values(&state)
            .returning(GameStateRecord::as_returning())
            .get_result(&mut conn)?;
        info!(state_id = record.id(), "Game state created");
        Ok(record)
    }

    /// Gets the most recently played game state of a user.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn latest_game_state(&self, user_id: i32) -> Result<Option<GameStateRecord>, DbError> {
        let mut conn = self.connection()?;
        let record = schema::game_states::table
            .filter(schema::game_states::user_id.eq(user_id))
            .order((
                schema::game_states::last_played.desc(),
                schema::game_states::id.desc(),
            ))
            .select(GameStateRecord::as_select())
            .first(&mut conn)
            .optional()?;
        debug!(found = record.is_some(), "Latest game state lookup");
        Ok(record)
    }

    /// Overwrites a stored game state.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the state does not exist or a database error occurs.
    #[instrument(skip(self, state))]
    pub fn update_game_state(
        &self,
        state_id: i32,
        state: NewGameStateRecord,
    ) -> Result<GameStateRecord, DbError> {
        let mut conn = self.connection()?;
        let record = update_state(&mut conn, state_id, &state)?;
        debug!(state_id, score = record.score(), moves = record.moves(), "Game state updated");
        Ok(record)
    }

    /// Saves a played turn: overwrites the game state and credits the earned
    /// points to the user in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any step fails; nothing is written in that case.
    #[instrument(skip(self, state), fields(user_id = state.user_id()))]
    pub fn save_turn(
        &self,
        state_id: i32,
        state: NewGameStateRecord,
        points_earned: i64,
    ) -> Result<(GameStateRecord, User), DbError> {
        let mut conn = self.connection()?;
        let saved = conn.transaction::<_, DbError, _>(|conn| {
            let record = update_state(conn, state_id, &state)?;
            let user = add_points(conn, *state.user_id(), points_earned)?;
            Ok((record, user))
        })?;
        info!(state_id, points_earned, "Turn saved");
        Ok(saved)
    }
}

fn insert_user(conn: &mut SqliteConnection, new_user: &NewUser) -> Result<User, DbError> {
    let user = diesel::insert_into(schema::users::table)
        .values(new_user)
        .returning(User::as_returning())
        .get_result(conn)?;
    Ok(user)
}

fn add_points(conn: &mut SqliteConnection, user_id: i32, delta: i64) -> Result<User, DbError> {
    let now = chrono::Utc::now().naive_utc();
    let user = diesel::update(schema::users::table.find(user_id))
        .set((
            schema::users::points.eq(schema::users::points + delta),
            schema::users::updated_at.eq(now),
        ))
        .returning(User::as_returning())
        .get_result(conn)?;
    debug!(user_id, delta, points = user.points(), "Points added");
    Ok(user)
}

fn update_state(
    conn: &mut SqliteConnection,
    state_id: i32,
    state: &NewGameStateRecord,
) -> Result<GameStateRecord, DbError> {
    let record = diesel::update(schema::game_states::table.find(state_id))
        .set(state)
        .returning(GameStateRecord::as_returning())
        .get_result(conn)?;
    Ok(record)
}
