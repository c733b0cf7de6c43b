use crate::error::{AppError, Result};
use crate::models::{Review, SearchLogEntry, Technology, User};
use crate::state::{AuditSink, BrowseFilter, CandidateQuery, CatalogStore, ReviewStore, UserStore};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory catalog store (reference collaborator for tests and local runs)
#[derive(Clone, Default)]
pub struct InMemoryCatalogStore {
    technologies: Arc<DashMap<Uuid, Technology>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn save_technology(&self, technology: &Technology) -> Result<()> {
        self.technologies.insert(technology.id, technology.clone());
        tracing::debug!(technology_id = %technology.id, "Technology saved");
        Ok(())
    }

    async fn get_technology(&self, id: &Uuid) -> Result<Option<Technology>> {
        Ok(self.technologies.get(id).map(|entry| entry.clone()))
    }

    async fn update_technology(&self, technology: &Technology) -> Result<()> {
        if self.technologies.contains_key(&technology.id) {
            self.technologies.insert(technology.id, technology.clone());
            tracing::debug!(technology_id = %technology.id, "Technology updated");
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "Technology {} not found",
                technology.id
            )))
        }
    }

    async fn delete_technology(&self, id: &Uuid) -> Result<()> {
        if self.technologies.remove(id).is_some() {
            tracing::debug!(technology_id = %id, "Technology deleted");
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Technology {} not found", id)))
        }
    }

    async fn list_technologies(&self, filter: &BrowseFilter) -> Result<Vec<Technology>> {
        let mut technologies: Vec<Technology> = self
            .technologies
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|t| filter.matches(t))
            .collect();

        // Newest first, same as list endpoints elsewhere
        technologies.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(technologies)
    }

    async fn find_candidates(&self, query: &CandidateQuery) -> Result<Vec<Technology>> {
        Ok(self
            .technologies
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|t| query.matches(t))
            .collect())
    }
}

/// In-memory review store
#[derive(Clone, Default)]
pub struct InMemoryReviewStore {
    reviews: Arc<DashMap<Uuid, Review>>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn save_review(&self, review: &Review) -> Result<()> {
        self.reviews.insert(review.id, review.clone());
        tracing::debug!(review_id = %review.id, technology_id = %review.technology_id, "Review saved");
        Ok(())
    }

    async fn get_review(&self, id: &Uuid) -> Result<Option<Review>> {
        Ok(self.reviews.get(id).map(|entry| entry.clone()))
    }

    async fn update_review(&self, review: &Review) -> Result<()> {
        if self.reviews.contains_key(&review.id) {
            self.reviews.insert(review.id, review.clone());
            tracing::debug!(review_id = %review.id, "Review updated");
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Review {} not found", review.id)))
        }
    }

    async fn delete_review(&self, id: &Uuid) -> Result<()> {
        if self.reviews.remove(id).is_some() {
            tracing::debug!(review_id = %id, "Review deleted");
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Review {} not found", id)))
        }
    }

    async fn list_reviews(&self) -> Result<Vec<Review>> {
        let mut reviews: Vec<Review> = self.reviews.iter().map(|entry| entry.value().clone()).collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    async fn find_by_tag(&self, pattern: &str) -> Result<Vec<Review>> {
        let needle = pattern.to_lowercase();

        Ok(self
            .reviews
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|review| {
                review
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&needle))
            })
            .collect())
    }

    async fn reviews_for_technologies(
        &self,
        technology_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Review>>> {
        let mut grouped: HashMap<Uuid, Vec<Review>> = HashMap::new();

        for entry in self.reviews.iter() {
            let review = entry.value();
            if technology_ids.contains(&review.technology_id) {
                grouped
                    .entry(review.technology_id)
                    .or_default()
                    .push(review.clone());
            }
        }

        Ok(grouped)
    }
}

/// In-memory user store
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<DashMap<String, User>>,
    email_index: Arc<DashMap<String, String>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn save_user(&self, user: &User) -> Result<()> {
        self.users.insert(user.user_id.clone(), user.clone());
        self.email_index
            .insert(user.email.to_lowercase(), user.user_id.clone());
        tracing::debug!(user_id = %user.user_id, "User saved");
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.users.get(user_id).map(|entry| entry.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user_id = match self.email_index.get(&email.to_lowercase()) {
            Some(entry) => entry.clone(),
            None => return Ok(None),
        };
        self.get_user(&user_id).await
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let previous = self
            .users
            .get(&user.user_id)
            .map(|entry| entry.email.clone())
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

        if previous != user.email {
            self.email_index.remove(&previous);
            self.email_index
                .insert(user.email.to_lowercase(), user.user_id.clone());
        }

        self.users.insert(user.user_id.clone(), user.clone());
        tracing::debug!(user_id = %user.user_id, "User updated");
        Ok(())
    }
}

/// In-memory audit sink; `entries()` exists for tests only
#[derive(Clone, Default)]
pub struct InMemoryAuditSink {
    entries: Arc<DashMap<Uuid, SearchLogEntry>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of appended entries, newest last
    pub fn entries(&self) -> Vec<SearchLogEntry> {
        let mut entries: Vec<SearchLogEntry> =
            self.entries.iter().map(|entry| entry.value().clone()).collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        entries
    }

    /// Number of appended entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn append(&self, entry: &SearchLogEntry) -> Result<()> {
        self.entries.insert(entry.search_id, entry.clone());
        tracing::debug!(search_id = %entry.search_id, query = %entry.query, "Search logged");
        Ok(())
    }
}
