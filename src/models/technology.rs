use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// An assistive technology in the catalog.
///
/// Name and description are always present; everything else is optional
/// metadata filled in by catalog curators. Derived rating fields are never
/// stored here; the search engine recomputes them per query.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Technology {
    /// Unique identifier
    pub id: Uuid,

    /// Technology name
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Detailed description
    #[validate(length(min = 1))]
    pub description: String,

    /// Numeric quality ratings maintained by curators
    #[serde(default)]
    pub core_vitals: CoreVitals,

    /// Boolean capability flags
    #[serde(default)]
    pub feature_comparison: FeatureComparison,

    /// Supported input methods, free text
    #[serde(default)]
    pub inputs: String,

    /// Developer / vendor
    #[serde(default)]
    pub developer: String,

    /// Supported platforms, free text
    #[serde(default)]
    pub platform: String,

    /// Current version
    #[serde(default)]
    pub version: String,

    /// Evaluation notes, free text
    #[serde(default)]
    pub evaluation: String,

    /// Cost tier ("free", "freemium", "paid", ...)
    #[serde(default)]
    pub cost: String,

    /// Category ("visual", "auditory", ...)
    #[serde(default)]
    pub category: String,

    /// System requirements, free text
    #[serde(default)]
    pub system_requirements: String,

    /// Key features, free text
    #[serde(default)]
    pub key_features: String,

    /// Product image URL
    #[serde(default)]
    pub image_url: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Technology {
    /// Create a new technology with required fields only
    pub fn new(name: String, description: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            name,
            description,
            core_vitals: CoreVitals::default(),
            feature_comparison: FeatureComparison::default(),
            inputs: String::new(),
            developer: String::new(),
            platform: String::new(),
            version: String::new(),
            evaluation: String::new(),
            cost: String::new(),
            category: String::new(),
            system_requirements: String::new(),
            key_features: String::new(),
            image_url: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the record as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Curator-maintained quality ratings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoreVitals {
    pub customer_support: f64,
    pub value_for_money: f64,
    pub features_rating: f64,
    pub ease_of_use: f64,
}

/// Capability flags used by the browse filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureComparison {
    pub community: bool,
    pub webhooks: bool,
    pub api: bool,
    pub user_management: bool,
    pub support: bool,
    pub integration: bool,
    pub security: bool,
}

impl FeatureComparison {
    /// Check a capability flag by its lowercase name
    pub fn has_feature(&self, name: &str) -> bool {
        match name {
            "community" => self.community,
            "webhooks" => self.webhooks,
            "api" => self.api,
            "usermanagement" | "user_management" => self.user_management,
            "support" => self.support,
            "integration" => self.integration,
            "security" => self.security,
            _ => false,
        }
    }
}
