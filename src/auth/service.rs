use crate::auth::password;
use crate::auth::session::{AuthClaims, SessionStore};
use crate::config::AuthConfig;
use crate::error::{AppError, Result};
use crate::models::{Role, User};
use crate::notifications::OtpMailer;
use crate::state::{KeyValueCache, UserStore};
use chrono::{Duration, Utc};
use std::sync::Arc;

/// Registration, login, and OTP verification over injected collaborators
pub struct AuthService {
    users: Arc<dyn UserStore>,
    cache: Arc<dyn KeyValueCache>,
    mailer: Option<Arc<OtpMailer>>,
    sessions: SessionStore,
    otp_ttl_secs: u64,
}

/// Outcome of registration or login: the user to verify plus whether the OTP
/// email actually went out (the flow continues either way)
#[derive(Debug)]
pub struct OtpChallenge {
    pub user_id: String,
    pub email_sent: bool,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        cache: Arc<dyn KeyValueCache>,
        mailer: Option<Arc<OtpMailer>>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            users,
            cache,
            mailer,
            sessions: SessionStore::new(config.session_ttl_hours),
            otp_ttl_secs: config.otp_ttl_secs,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Register a new user and issue an OTP challenge
    pub async fn register(&self, email: &str, password: &str, role: Role) -> Result<OtpChallenge> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let mut user = User::new(email.to_string(), String::new(), role);
        user.password_hash = password::hash(password, &user.user_id);

        let otp = self.issue_otp(&mut user).await;
        self.users.save_user(&user).await?;

        let email_sent = self.deliver_otp(&user.email, &otp).await;
        tracing::info!(user_id = %user.user_id, email_sent, "User registered");

        Ok(OtpChallenge {
            user_id: user.user_id,
            email_sent,
        })
    }

    /// Verify credentials and issue a fresh OTP challenge
    pub async fn login(&self, email: &str, password: &str) -> Result<OtpChallenge> {
        let mut user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

        if !password::verify(password, &user.user_id, &user.password_hash) {
            return Err(AppError::Authentication("Invalid credentials".to_string()));
        }

        let otp = self.issue_otp(&mut user).await;
        self.users.update_user(&user).await?;

        let email_sent = self.deliver_otp(&user.email, &otp).await;
        tracing::info!(user_id = %user.user_id, email_sent, "Login challenge issued");

        Ok(OtpChallenge {
            user_id: user.user_id,
            email_sent,
        })
    }

    /// Verify an OTP and exchange it for a session token
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<String> {
        let mut user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("User not found".to_string()))?;

        let stored = self.stored_otp(&user).await;
        match stored {
            Some(expected) if expected == otp => {}
            Some(_) => return Err(AppError::Authentication("Invalid OTP".to_string())),
            None => {
                return Err(AppError::Authentication(
                    "OTP expired or not found".to_string(),
                ))
            }
        }

        // Clean up both storage locations after successful verification
        if let Err(e) = self.cache.delete(&Self::otp_key(&user.user_id)).await {
            tracing::warn!(user_id = %user.user_id, error = %e, "Failed to clear OTP from cache");
        }
        user.otp = None;
        user.otp_expires = None;
        user.last_login = Some(Utc::now());
        self.users.update_user(&user).await?;

        let token = self.sessions.issue(AuthClaims {
            user_id: user.user_id.clone(),
            email: user.email.clone(),
            role: user.role,
        });

        tracing::info!(user_id = %user.user_id, "OTP verified, session issued");
        Ok(token)
    }

    fn otp_key(user_id: &str) -> String {
        format!("otp:{}", user_id)
    }

    /// Generate an OTP, park it in the cache best-effort, and record it on
    /// the user as fallback
    async fn issue_otp(&self, user: &mut User) -> String {
        let otp = crate::auth::generate_otp();

        if let Err(e) = self
            .cache
            .set_with_expiry(&Self::otp_key(&user.user_id), &otp, self.otp_ttl_secs)
            .await
        {
            tracing::warn!(user_id = %user.user_id, error = %e, "Failed to store OTP in cache, using user record only");
        }

        user.otp = Some(otp.clone());
        user.otp_expires = Some(Utc::now() + Duration::seconds(self.otp_ttl_secs as i64));

        otp
    }

    /// Fetch the pending OTP: cache first, user record as fallback
    async fn stored_otp(&self, user: &User) -> Option<String> {
        match self.cache.get(&Self::otp_key(&user.user_id)).await {
            Ok(Some(otp)) => return Some(otp),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(user_id = %user.user_id, error = %e, "OTP cache lookup failed, falling back to user record");
            }
        }

        match (&user.otp, &user.otp_expires) {
            (Some(otp), Some(expires)) if *expires > Utc::now() => Some(otp.clone()),
            _ => None,
        }
    }

    /// Send the OTP email best-effort; a delivery failure never fails the flow
    async fn deliver_otp(&self, email: &str, otp: &str) -> bool {
        let Some(ref mailer) = self.mailer else {
            tracing::warn!("OTP mailer not configured, skipping delivery");
            return false;
        };

        match mailer.send_otp(email, otp).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to send OTP email");
                false
            }
        }
    }
}
