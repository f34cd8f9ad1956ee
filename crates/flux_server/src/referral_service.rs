//! Referral listing and creation.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    GameRepository, NewReferral, ReferralRecord, ReferralRewards, ReferredUser, ServiceError,
};

/// Referrals made by a user, with their value in points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralSummary {
    /// Users referred, oldest first.
    pub referrals: Vec<ReferredUser>,
    /// Summed referral earnings converted to points.
    pub referral_points: i64,
}

/// A stored referral as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralView {
    /// Row id.
    pub id: i32,
    /// Referrer's user id.
    pub referrer_id: i32,
    /// Referred user's id.
    pub referred_user_id: i32,
    /// FLX earnings credited for this referral.
    pub earnings: f64,
    /// Creation time.
    pub created_at: NaiveDateTime,
}

impl From<ReferralRecord> for ReferralView {
    fn from(record: ReferralRecord) -> Self {
        Self {
            id: *record.id(),
            referrer_id: *record.referrer_id(),
            referred_user_id: *record.referred_user_id(),
            earnings: *record.earnings(),
            created_at: *record.created_at(),
        }
    }
}

/// Result of [`ReferralService::create`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReferral {
    /// The new referral.
    pub referral: ReferralView,
    /// Points credited for this referral.
    pub referral_points: i64,
    /// Points credited across all of the referrer's referrals.
    pub total_referral_points: i64,
    /// Referrer's point balance after the credit.
    pub user_points: i64,
}

/// Service layer for referrals between users.
#[derive(Debug, Clone)]
pub struct ReferralService {
    repository: GameRepository,
    rewards: ReferralRewards,
}

impl ReferralService {
    /// Creates a new referral service.
    #[instrument(skip(repository, rewards))]
    pub fn new(repository: GameRepository, rewards: ReferralRewards) -> Self {
        info!("Creating ReferralService");
        Self {
            repository,
            rewards,
        }
    }

    /// Lists the users referred by `telegram_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown user.
    #[instrument(skip(self))]
    pub fn list(&self, telegram_id: i64) -> Result<ReferralSummary, ServiceError> {
        let user = self
            .repository
            .get_user_by_telegram_id(telegram_id)?
            .ok_or_else(|| ServiceError::NotFound("User".to_string()))?;
        let referrals = self.repository.list_referred_users(*user.id())?;
        let earned: f64 = referrals.iter().map(|r| *r.earnings()).sum();
        let referral_points = (earned * self.rewards.points_per_flx()).round() as i64;
        Ok(ReferralSummary {
            referrals,
            referral_points,
        })
    }

    /// Records that `referrer_telegram_id` referred `referred_telegram_id`
    /// and credits the referrer.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidRequest`] on self-referral
    /// - [`ServiceError::NotFound`] if either user is unknown
    /// - [`ServiceError::Conflict`] if the referral already exists
    #[instrument(skip(self))]
    pub fn create(
        &self,
        referrer_telegram_id: i64,
        referred_telegram_id: i64,
    ) -> Result<CreatedReferral, ServiceError> {
        if referrer_telegram_id == referred_telegram_id {
            warn!("Self-referral rejected");
            return Err(ServiceError::InvalidRequest(
                "Users cannot refer themselves".to_string(),
            ));
        }
        let referrer = self
            .repository
            .get_user_by_telegram_id(referrer_telegram_id)?
            .ok_or_else(|| ServiceError::NotFound("Referrer".to_string()))?;
        let referred = self
            .repository
            .get_user_by_telegram_id(referred_telegram_id)?
            .ok_or_else(|| ServiceError::NotFound("Referred user".to_string()))?;

        if self
            .repository
            .find_referral(*referrer.id(), *referred.id())?
            .is_some()
        {
            warn!("Duplicate referral rejected");
            return Err(ServiceError::Conflict(
                "Referral already exists".to_string(),
            ));
        }

        let bonus = *self.rewards.direct_bonus_points();
        let (record, referrer) = self.repository.create_referral(
            NewReferral::new(*referrer.id(), *referred.id(), *self.rewards.direct_earnings()),
            bonus,
        )?;
        let count = self.repository.count_referrals(*referrer.id())?;

        info!(referrer_id = referrer.id(), count, "Referral created");
        Ok(CreatedReferral {
            referral: record.into(),
            referral_points: bonus,
            total_referral_points: count * bonus,
            user_points: *referrer.points(),
        })
    }
}
