//! Route handlers.
//!
//! Services are synchronous (diesel), so every call runs on the blocking pool.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{ApiError, AppState};
use crate::{
    CreatedReferral, GameStateView, ReferralSummary, ServiceError, SwapResult, TelegramProfile,
    User,
};

/// `?telegramId=` query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramQuery {
    telegram_id: i64,
}

/// Telegram WebApp user plus an optional referral code.
#[derive(Debug, Deserialize)]
pub struct UpsertUserRequest {
    #[serde(flatten)]
    user: TelegramProfile,
    #[serde(default, rename = "referralCode")]
    referral_code: Option<String>,
}

/// Body naming a user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramBody {
    telegram_id: i64,
}

/// Swap request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    telegram_id: i64,
    from: usize,
    to: usize,
}

/// Referral creation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReferralRequest {
    referrer_telegram_id: i64,
    referred_telegram_id: i64,
}

async fn blocking<T, F>(task: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(task).await??)
}

pub(super) async fn health() -> &'static str {
    "ok"
}

#[instrument(skip_all)]
pub(super) async fn upsert_user(
    State(state): State<AppState>,
    body: Result<Json<UpsertUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(request) = body?;
    debug!(telegram_id = request.user.id, "Upserting user");
    let profiles = state.profiles.clone();
    let upserted = blocking(move || {
        profiles.upsert_user(&request.user, request.referral_code.as_deref())
    })
    .await?;
    let status = if upserted.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(upserted.user)))
}

#[instrument(skip_all)]
pub(super) async fn get_user(
    State(state): State<AppState>,
    query: Result<Query<TelegramQuery>, QueryRejection>,
) -> Result<Json<User>, ApiError> {
    let Query(TelegramQuery { telegram_id }) = query?;
    let profiles = state.profiles.clone();
    let user = blocking(move || profiles.get_user(telegram_id)).await?;
    Ok(Json(user))
}

#[instrument(skip_all)]
pub(super) async fn current_game(
    State(state): State<AppState>,
    query: Result<Query<TelegramQuery>, QueryRejection>,
) -> Result<Json<GameStateView>, ApiError> {
    let Query(TelegramQuery { telegram_id }) = query?;
    let games = state.games.clone();
    let view = blocking(move || games.current(telegram_id)).await?;
    Ok(Json(view))
}

#[instrument(skip_all)]
pub(super) async fn start_game(
    State(state): State<AppState>,
    body: Result<Json<TelegramBody>, JsonRejection>,
) -> Result<(StatusCode, Json<GameStateView>), ApiError> {
    let Json(TelegramBody { telegram_id }) = body?;
    let games = state.games.clone();
    let view = blocking(move || games.start(telegram_id)).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[instrument(skip_all)]
pub(super) async fn swap(
    State(state): State<AppState>,
    body: Result<Json<SwapRequest>, JsonRejection>,
) -> Result<Json<SwapResult>, ApiError> {
    let Json(SwapRequest {
        telegram_id,
        from,
        to,
    }) = body?;
    let games = state.games.clone();
    let result = blocking(move || games.swap(telegram_id, from, to)).await?;
    Ok(Json(result))
}

#[instrument(skip_all)]
pub(super) async fn reset_game(
    State(state): State<AppState>,
    body: Result<Json<TelegramBody>, JsonRejection>,
) -> Result<Json<GameStateView>, ApiError> {
    let Json(TelegramBody { telegram_id }) = body?;
    let games = state.games.clone();
    let view = blocking(move || games.reset(telegram_id)).await?;
    Ok(Json(view))
}

#[instrument(skip_all)]
pub(super) async fn list_referrals(
    State(state): State<AppState>,
    query: Result<Query<TelegramQuery>, QueryRejection>,
) -> Result<Json<ReferralSummary>, ApiError> {
    let Query(TelegramQuery { telegram_id }) = query?;
    let referrals = state.referrals.clone();
    let summary = blocking(move || referrals.list(telegram_id)).await?;
    Ok(Json(summary))
}

#[instrument(skip_all)]
pub(super) async fn create_referral(
    State(state): State<AppState>,
    body: Result<Json<CreateReferralRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedReferral>), ApiError> {
    let Json(CreateReferralRequest {
        referrer_telegram_id,
        referred_telegram_id,
    }) = body?;
    let referrals = state.referrals.clone();
    let created =
        blocking(move || referrals.create(referrer_telegram_id, referred_telegram_id)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
