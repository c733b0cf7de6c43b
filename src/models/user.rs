use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A registered user.
///
/// `password_hash` and the OTP fields never leave the backend; the profile
/// endpoints serve [`UserProfile`] projections instead.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct User {
    /// Unique identifier (UUID string, referenced by reviews)
    pub user_id: String,

    /// Email, unique and lowercased
    #[validate(email)]
    pub email: String,

    /// Opaque password digest
    pub password_hash: String,

    /// Role
    #[serde(default)]
    pub role: Role,

    /// Pending one-time passcode, if any
    #[serde(default)]
    pub otp: Option<String>,

    /// Expiry of the pending passcode
    #[serde(default)]
    pub otp_expires: Option<DateTime<Utc>>,

    /// Avatar URL
    #[serde(default)]
    pub avatar: Option<String>,

    /// Social profile links
    #[serde(default)]
    pub social_links: SocialLinks,

    /// Whether the user disclosed a disability
    #[serde(default)]
    pub has_disability: bool,

    /// Optional disability details
    #[serde(default)]
    pub disability_details: Option<DisabilityDetails>,

    /// Profession, free text
    #[serde(default)]
    pub profession: Option<String>,

    /// Last successful login
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh UUID identity
    pub fn new(email: String, password_hash: String, role: Role) -> Self {
        Self {
            user_id: Uuid::new_v4().to_string(),
            email: email.to_lowercase(),
            password_hash,
            role,
            otp: None,
            otp_expires: None,
            avatar: None,
            social_links: SocialLinks::default(),
            has_disability: false,
            disability_details: None,
            profession: None,
            last_login: None,
            created_at: Utc::now(),
        }
    }

    /// Build the public profile projection
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            role: self.role,
            avatar: self.avatar.clone(),
            social_links: self.social_links.clone(),
            has_disability: self.has_disability,
            disability_details: self.disability_details.clone(),
            profession: self.profession.clone(),
            last_login: self.last_login,
            created_at: self.created_at,
        }
    }
}

/// User role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Social profile links
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
}

/// Disclosed disability details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisabilityDetails {
    /// Disability type
    #[serde(rename = "type")]
    pub kind: DisabilityKind,

    /// Requested accommodations
    #[serde(default)]
    pub accommodations: Vec<String>,

    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisabilityKind {
    Visual,
    Auditory,
    Motor,
    Cognitive,
    Other,
}

/// Public profile projection: everything except credentials and OTP state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub avatar: Option<String>,
    pub social_links: SocialLinks,
    pub has_disability: bool,
    pub disability_details: Option<DisabilityDetails>,
    pub profession: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_lowercases_email() {
        let user = User::new("Alice@Example.COM".to_string(), "digest".to_string(), Role::User);
        assert_eq!(user.email, "alice@example.com");
        assert!(user.otp.is_none());
    }

    #[test]
    fn test_profile_excludes_credentials() {
        let user = User::new("a@b.com".to_string(), "digest".to_string(), Role::Admin);
        let profile = user.profile();

        assert_eq!(profile.user_id, user.user_id);
        assert_eq!(profile.role, Role::Admin);
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("digest"));
        assert!(!json.contains("otp"));
    }
}
