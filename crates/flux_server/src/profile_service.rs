//! Profile management business logic layer.

use rand::Rng;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::{DbError, GameRepository, NewUser, ReferralRewards, ServiceError, User, UserProfileUpdate};

const REFERRAL_CODE_LEN: usize = 8;
const REFERRAL_CODE_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const REFERRAL_CODE_ATTEMPTS: usize = 16;

/// Telegram WebApp user as sent by the mini-app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TelegramProfile {
    /// Telegram user id.
    pub id: i64,
    /// Telegram username, if set.
    #[serde(default)]
    pub username: Option<String>,
    /// First name, if set.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name, if set.
    #[serde(default)]
    pub last_name: Option<String>,
}

impl TelegramProfile {
    fn fields(&self) -> (String, String, String) {
        (
            self.username.clone().unwrap_or_default(),
            self.first_name.clone().unwrap_or_default(),
            self.last_name.clone().unwrap_or_default(),
        )
    }
}

/// Result of [`ProfileService::upsert_user`].
#[derive(Debug, Clone)]
pub struct UpsertedUser {
    /// The stored user.
    pub user: User,
    /// True if the user was created by this call.
    pub created: bool,
}

/// Service layer for user profile operations.
///
/// Wraps [`GameRepository`] with get-or-create semantics, profile refresh and
/// signup referrals.
#[derive(Debug, Clone)]
pub struct ProfileService {
    repository: GameRepository,
    rewards: ReferralRewards,
}

impl ProfileService {
    /// Creates a new profile service backed by the given repository.
    #[instrument(skip(repository, rewards))]
    pub fn new(repository: GameRepository, rewards: ReferralRewards) -> Self {
        info!("Creating ProfileService");
        Self {
            repository,
            rewards,
        }
    }

    /// Returns the user with the given Telegram id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no such user exists.
    #[instrument(skip(self))]
    pub fn get_user(&self, telegram_id: i64) -> Result<User, ServiceError> {
        self.repository
            .get_user_by_telegram_id(telegram_id)?
            .ok_or_else(|| ServiceError::NotFound("User".to_string()))
    }

    /// Returns the stored user for a Telegram profile, creating it if needed.
    ///
    /// Existing users get their profile fields refreshed when they changed.
    /// New users receive a unique referral code; if `referral_code` names an
    /// existing user, that user is credited with the signup bonus. Unknown
    /// codes are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidRequest`] for a zero Telegram id, or a
    /// database error.
    #[instrument(skip(self, profile), fields(telegram_id = profile.id))]
    pub fn upsert_user(
        &self,
        profile: &TelegramProfile,
        referral_code: Option<&str>,
    ) -> Result<UpsertedUser, ServiceError> {
        if profile.id == 0 {
            return Err(ServiceError::InvalidRequest(
                "Missing required user ID".to_string(),
            ));
        }
        let (username, first_name, last_name) = profile.fields();

        if let Some(user) = self.repository.get_user_by_telegram_id(profile.id)? {
            if !user.profile_differs(&username, &first_name, &last_name) {
                debug!(user_id = user.id(), "Existing user unchanged");
                return Ok(UpsertedUser {
                    user,
                    created: false,
                });
            }
            let update = UserProfileUpdate::new(
                username,
                first_name,
                last_name,
                chrono::Utc::now().naive_utc(),
            );
            let user = self.repository.update_user_profile(*user.id(), update)?;
            info!(user_id = user.id(), "Existing user refreshed");
            return Ok(UpsertedUser {
                user,
                created: false,
            });
        }

        let referrer = match referral_code.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => {
                let referrer = self.repository.get_user_by_referral_code(code)?;
                if referrer.is_none() {
                    warn!(code, "Unknown referral code ignored");
                }
                referrer
            }
            None => None,
        };

        let new_user = NewUser::new(
            profile.id,
            username,
            first_name,
            last_name,
            self.unique_referral_code()?,
        );

        let user = match referrer {
            Some(referrer) => self.repository.create_referred_user(
                new_user,
                *referrer.id(),
                *self.rewards.signup_earnings(),
                *self.rewards.signup_bonus_points(),
            )?,
            None => self.repository.create_user(new_user)?,
        };
        info!(user_id = user.id(), code = %user.referral_code(), "New user registered");
        Ok(UpsertedUser {
            user,
            created: true,
        })
    }

    #[instrument(skip(self))]
    fn unique_referral_code(&self) -> Result<String, DbError> {
        let mut rng = rand::rng();
        for _ in 0..REFERRAL_CODE_ATTEMPTS {
            let code = random_referral_code(&mut rng);
            if self.repository.get_user_by_referral_code(&code)?.is_none() {
                return Ok(code);
            }
            debug!(code = %code, "Referral code collision, retrying");
        }
        Err(DbError::new("Could not allocate a unique referral code"))
    }
}

/// Draws an 8-character uppercase alphanumeric referral code.
pub fn random_referral_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..REFERRAL_CODE_LEN)
        .map(|_| REFERRAL_CODE_CHARSET[rng.random_range(0..REFERRAL_CODE_CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_referral_code_shape() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..50 {
            let code = random_referral_code(&mut rng);
            assert_eq!(code.len(), 8);
            assert!(code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_missing_profile_fields_default_to_empty() {
        let profile = TelegramProfile {
            id: 7,
            username: Some("neo".to_string()),
            ..Default::default()
        };
        assert_eq!(
            profile.fields(),
            ("neo".to_string(), String::new(), String::new())
        );
    }
}
