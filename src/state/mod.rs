pub mod cache;
pub mod memory;

pub use cache::{KeyValueCache, MemoryCache, NoopCache, RedisCache};
pub use memory::{InMemoryAuditSink, InMemoryCatalogStore, InMemoryReviewStore, InMemoryUserStore};

use crate::error::Result;
use crate::models::{Review, SearchLogEntry, Technology, User};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// Trait for catalog (technology) storage operations
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Save a technology
    async fn save_technology(&self, technology: &Technology) -> Result<()>;

    /// Get a technology by ID
    async fn get_technology(&self, id: &Uuid) -> Result<Option<Technology>>;

    /// Update a technology
    async fn update_technology(&self, technology: &Technology) -> Result<()>;

    /// Delete a technology
    async fn delete_technology(&self, id: &Uuid) -> Result<()>;

    /// List technologies with browse filtering
    async fn list_technologies(&self, filter: &BrowseFilter) -> Result<Vec<Technology>>;

    /// Find search candidates: text match over the searchable fields, or
    /// membership in the explicitly included id set
    async fn find_candidates(&self, query: &CandidateQuery) -> Result<Vec<Technology>>;
}

/// Trait for review storage operations
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Save a review
    async fn save_review(&self, review: &Review) -> Result<()>;

    /// Get a review by ID
    async fn get_review(&self, id: &Uuid) -> Result<Option<Review>>;

    /// Update a review
    async fn update_review(&self, review: &Review) -> Result<()>;

    /// Delete a review
    async fn delete_review(&self, id: &Uuid) -> Result<()>;

    /// List all reviews
    async fn list_reviews(&self) -> Result<Vec<Review>>;

    /// Find reviews with a tag containing the pattern (case-insensitive)
    async fn find_by_tag(&self, pattern: &str) -> Result<Vec<Review>>;

    /// Collect reviews grouped by technology, for the given technology ids
    async fn reviews_for_technologies(
        &self,
        technology_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Review>>>;
}

/// Trait for user storage operations
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Save a user
    async fn save_user(&self, user: &User) -> Result<()>;

    /// Get a user by their UUID string identity
    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Find a user by email (lowercased lookup)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Update a user
    async fn update_user(&self, user: &User) -> Result<()>;
}

/// Append-only audit sink for search query logging.
///
/// Entries are write-once and never read back by the engine; `entries` on the
/// in-memory implementation exists for tests and analytics tooling only.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append a log entry
    async fn append(&self, entry: &SearchLogEntry) -> Result<()>;
}

/// Independent browse predicates for `GET /v1/technologies`.
///
/// Unlike the search engine's single-dimension selector, these combine
/// freely.
#[derive(Debug, Clone, Default)]
pub struct BrowseFilter {
    /// Exact category match (lowercased)
    pub category: Option<String>,

    /// Exact cost tier match (lowercased)
    pub cost: Option<String>,

    /// Minimum curator features rating
    pub min_features_rating: Option<f64>,

    /// Required capability flags (lowercased names)
    pub features: Vec<String>,
}

impl BrowseFilter {
    /// Check whether a technology passes every supplied predicate
    pub fn matches(&self, technology: &Technology) -> bool {
        if let Some(ref category) = self.category {
            if !technology.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }

        if let Some(ref cost) = self.cost {
            if !technology.cost.eq_ignore_ascii_case(cost) {
                return false;
            }
        }

        if let Some(min) = self.min_features_rating {
            if technology.core_vitals.features_rating < min {
                return false;
            }
        }

        self.features
            .iter()
            .all(|f| technology.feature_comparison.has_feature(f))
    }
}

/// Candidate predicate for the search engine's match builder:
/// case-insensitive substring match over the searchable text fields, OR
/// membership in an id set gathered from tag-matching reviews.
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    /// Free-text query, already trimmed and non-empty
    pub text: String,

    /// Technology ids that qualify regardless of text match
    pub include_ids: Vec<Uuid>,
}

impl CandidateQuery {
    /// Check whether a technology is a candidate
    pub fn matches(&self, technology: &Technology) -> bool {
        if self.include_ids.contains(&technology.id) {
            return true;
        }

        let needle = self.text.to_lowercase();

        technology.name.to_lowercase().contains(&needle)
            || technology.description.to_lowercase().contains(&needle)
            || technology.key_features.to_lowercase().contains(&needle)
            || technology.category.to_lowercase().contains(&needle)
    }
}
