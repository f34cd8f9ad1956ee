//! Server-side game sessions.
//!
//! The server owns the board: clients only name the two cells to swap, and
//! scores are computed here and credited to the user's point balance.

use chrono::{NaiveDateTime, Utc};
use flux_board::{Board, GameSession, Rules, Tile, Turn};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, instrument, warn};

use crate::{GameRepository, GameStateRecord, NewGameStateRecord, ServiceError, User};

/// A stored game state as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    /// Row id.
    pub id: i32,
    /// Owning user id.
    pub user_id: i32,
    /// Session score.
    pub score: i64,
    /// Moves remaining.
    pub moves: i32,
    /// Grid rows.
    pub rows: usize,
    /// Grid columns.
    pub cols: usize,
    /// Board tiles in row-major order.
    pub tiles: Vec<Tile>,
    /// Last time the state was written.
    pub last_played: NaiveDateTime,
}

impl GameStateView {
    fn new(record: &GameStateRecord, board: &Board) -> Self {
        Self {
            id: *record.id(),
            user_id: *record.user_id(),
            score: *record.score(),
            moves: *record.moves(),
            rows: board.rows(),
            cols: board.cols(),
            tiles: board.tiles().to_vec(),
            last_played: *record.last_played(),
        }
    }
}

/// Result of [`GameService::swap`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResult {
    /// True if the swap produced a match.
    pub accepted: bool,
    /// Points scored by the swap.
    pub score_delta: u64,
    /// Cascade passes run.
    pub passes: usize,
    /// State after the swap.
    pub state: GameStateView,
}

/// Service layer for playing the board game.
///
/// Swaps, starts and resets for one user are serialised by a per-user lock
/// held across the whole load, play and save.
#[derive(Debug, Clone)]
pub struct GameService {
    repository: GameRepository,
    rules: Rules,
    locks: Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl GameService {
    /// Creates a new game service playing by `rules`.
    #[instrument(skip(repository, rules), fields(rows = rules.rows(), cols = rules.cols()))]
    pub fn new(repository: GameRepository, rules: Rules) -> Self {
        info!("Creating GameService");
        Self {
            repository,
            rules,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Rules this service plays by.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Returns the user's latest game state.
    ///
    /// A stored board that no longer fits the grid is replaced and saved, so
    /// repeated reads show the board the next swap plays on.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the user or their state is unknown.
    #[instrument(skip(self))]
    pub fn current(&self, telegram_id: i64) -> Result<GameStateView, ServiceError> {
        self.with_user_lock(telegram_id, || {
            let user = self.user(telegram_id)?;
            let record = self.latest(&user)?;
            let (record, session) = self.restore(record)?;
            Ok(GameStateView::new(&record, session.board()))
        })
    }

    /// Starts a fresh session for the user and stores it as their latest
    /// state.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown user, or an engine or
    /// database error.
    #[instrument(skip(self))]
    pub fn start(&self, telegram_id: i64) -> Result<GameStateView, ServiceError> {
        self.with_user_lock(telegram_id, || {
            let user = self.user(telegram_id)?;
            let session = GameSession::new(&self.rules, &mut rand::rng())?;
            let record = self
                .repository
                .create_game_state(encode(*user.id(), &session)?)?;
            info!(state_id = record.id(), "Game started");
            Ok(GameStateView::new(&record, session.board()))
        })
    }

    /// Swaps the tiles at `from` and `to` in the user's latest session.
    ///
    /// Accepted and ineffective swaps spend a move and are persisted; the
    /// score delta is added to the user's points.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the user or their state is unknown
    /// - [`ServiceError::InvalidRequest`] for non-adjacent cells
    /// - [`ServiceError::Conflict`] when no moves remain
    #[instrument(skip(self))]
    pub fn swap(
        &self,
        telegram_id: i64,
        from: usize,
        to: usize,
    ) -> Result<SwapResult, ServiceError> {
        self.with_user_lock(telegram_id, || {
            let user = self.user(telegram_id)?;
            let record = self.latest(&user)?;
            let (record, mut session) = self.restore(record)?;

            let Turn {
                accepted,
                score_delta,
                passes,
            } = session.play(from, to, &self.rules, &mut rand::rng())?;
            if !accepted {
                warn!(from, to, "Ineffective swap");
            }

            let points = i64::try_from(score_delta)
                .map_err(|_| ServiceError::InvalidRequest("Score overflow".to_string()))?;
            let (saved, user) =
                self.repository
                    .save_turn(*record.id(), encode(*user.id(), &session)?, points)?;
            debug!(points = user.points(), "User points after turn");

            Ok(SwapResult {
                accepted,
                score_delta,
                passes,
                state: GameStateView::new(&saved, session.board()),
            })
        })
    }

    /// Replaces the user's latest session with a fresh one, creating it if
    /// the user has none.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown user, or an engine or
    /// database error.
    #[instrument(skip(self))]
    pub fn reset(&self, telegram_id: i64) -> Result<GameStateView, ServiceError> {
        self.with_user_lock(telegram_id, || {
            let user = self.user(telegram_id)?;
            let session = GameSession::new(&self.rules, &mut rand::rng())?;
            let state = encode(*user.id(), &session)?;
            let record = match self.repository.latest_game_state(*user.id())? {
                Some(existing) => self.repository.update_game_state(*existing.id(), state)?,
                None => self.repository.create_game_state(state)?,
            };
            info!(state_id = record.id(), "Game reset");
            Ok(GameStateView::new(&record, session.board()))
        })
    }

    /// Runs `task` while holding the user's lock.
    ///
    /// The lock entry is dropped from the map once no other caller holds or
    /// waits on it.
    fn with_user_lock<T>(
        &self,
        telegram_id: i64,
        task: impl FnOnce() -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(telegram_id).or_default())
        };
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            task()
        };

        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the map and this call hold the entry.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&telegram_id);
        }
        result
    }

    fn user(&self, telegram_id: i64) -> Result<User, ServiceError> {
        self.repository
            .get_user_by_telegram_id(telegram_id)?
            .ok_or_else(|| ServiceError::NotFound("User".to_string()))
    }

    fn latest(&self, user: &User) -> Result<GameStateRecord, ServiceError> {
        self.repository
            .latest_game_state(*user.id())?
            .ok_or_else(|| ServiceError::NotFound("Game state".to_string()))
    }

    /// Rebuilds a session from a stored record.
    ///
    /// A board that no longer fits the configured grid is regenerated and
    /// written back, keeping score and moves.
    #[instrument(skip(self, record), fields(state_id = record.id()))]
    fn restore(
        &self,
        record: GameStateRecord,
    ) -> Result<(GameStateRecord, GameSession), ServiceError> {
        let tiles = record.parse_tiles()?;
        let score = u64::try_from(*record.score()).unwrap_or_default();
        let moves = u32::try_from(*record.moves()).unwrap_or_default();

        if tiles.len() == self.rules.cell_count() {
            let board = Board::from_tiles(*self.rules.rows(), *self.rules.cols(), tiles)?;
            return Ok((record, GameSession::from_parts(board, score, moves)));
        }

        warn!(
            stored = tiles.len(),
            expected = self.rules.cell_count(),
            "Stored board does not match the grid, regenerating"
        );
        let board = GameSession::new(&self.rules, &mut rand::rng())?
            .board()
            .clone();
        let session = GameSession::from_parts(board, score, moves);
        let record = self
            .repository
            .update_game_state(*record.id(), encode(*record.user_id(), &session)?)?;
        Ok((record, session))
    }
}

fn encode(user_id: i32, session: &GameSession) -> Result<NewGameStateRecord, ServiceError> {
    let score = i64::try_from(session.score())
        .map_err(|_| ServiceError::InvalidRequest("Score overflow".to_string()))?;
    let moves = i32::try_from(session.moves_remaining())
        .map_err(|_| ServiceError::InvalidRequest("Move count overflow".to_string()))?;
    Ok(NewGameStateRecord::new(
        user_id,
        score,
        moves,
        session.board().tiles(),
        Utc::now().naive_utc(),
    )?)
}
