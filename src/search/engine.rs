use crate::error::{AppError, Result};
use crate::models::{Review, SearchLogEntry, Technology};
use crate::search::filter::{FilterSelector, SearchParams};
use crate::state::{AuditSink, CandidateQuery, CatalogStore, KeyValueCache, ReviewStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Hard cap on the result list, applied after sorting. Not a page size.
pub const RESULT_CAP: usize = 20;

/// Result cache TTL
const CACHE_TTL_SECS: u64 = 3600;

/// A ranked search result: the search projection of a technology plus the
/// review-derived signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub key_features: String,
    pub category: String,
    pub cost: String,

    /// Arithmetic mean of review ratings; 0.0 when the technology has no
    /// reviews (never null, never excluded)
    pub avg_rating: f64,

    /// Number of reviews
    pub reviews_count: u64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SearchHit {
    fn from_technology(technology: &Technology, reviews: &[Review]) -> Self {
        let reviews_count = reviews.len() as u64;
        let avg_rating = if reviews.is_empty() {
            0.0
        } else {
            reviews.iter().map(|r| r.rating as f64).sum::<f64>() / reviews.len() as f64
        };

        Self {
            id: technology.id,
            name: technology.name.clone(),
            description: technology.description.clone(),
            key_features: technology.key_features.clone(),
            category: technology.category.clone(),
            cost: technology.cost.clone(),
            avg_rating,
            reviews_count,
            created_at: technology.created_at,
            updated_at: technology.updated_at,
        }
    }
}

/// The search engine: match building, rank/aggregate, cache gate, and the
/// audit side effect, over injected long-lived collaborators.
///
/// Stateless per request. Concurrent searches for the same key race on cache
/// population with last-write-wins semantics; duplicate computation is
/// tolerated and never prevented by a lock.
pub struct SearchEngine {
    catalog: Arc<dyn CatalogStore>,
    reviews: Arc<dyn ReviewStore>,
    cache: Arc<dyn KeyValueCache>,
    audit: Arc<dyn AuditSink>,
}

impl SearchEngine {
    /// Create a new search engine over the given collaborators
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        reviews: Arc<dyn ReviewStore>,
        cache: Arc<dyn KeyValueCache>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            catalog,
            reviews,
            cache,
            audit,
        }
    }

    /// Resolve a search request to a ranked, capped result list.
    ///
    /// Rejects empty queries before any cache or store access. Cache hits
    /// return the stored list verbatim and skip the audit log; cache failures
    /// degrade to a miss. Store failures surface to the caller. An audit
    /// append failure is logged and swallowed.
    pub async fn resolve(
        &self,
        params: &SearchParams,
        caller_id: Option<&str>,
    ) -> Result<Vec<SearchHit>> {
        let query = params.query.trim();
        if query.is_empty() {
            return Err(AppError::Validation("Search query is required".to_string()));
        }

        let cache_key = Self::cache_key(params)?;

        // Cache gate
        match self.cache.get(&cache_key).await {
            Ok(Some(cached)) => match serde_json::from_str::<Vec<SearchHit>>(&cached) {
                Ok(hits) => {
                    tracing::debug!(query = %query, "Search cache hit");
                    return Ok(hits);
                }
                Err(e) => {
                    tracing::warn!(query = %query, error = %e, "Discarding undecodable cache entry");
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Cache lookup failed, treating as miss");
            }
        }

        let selector = FilterSelector::from_params(params);
        let hits = self.execute(query, &selector).await?;

        // Write-through cache, non-blocking for correctness: a failed write
        // degrades to "cache disabled"
        match serde_json::to_string(&hits) {
            Ok(serialized) => {
                if let Err(e) = self
                    .cache
                    .set_with_expiry(&cache_key, &serialized, CACHE_TTL_SECS)
                    .await
                {
                    tracing::warn!(query = %query, error = %e, "Failed to cache search results");
                }
            }
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Failed to serialize search results for cache");
            }
        }

        // Fire-and-forget audit log: one entry per cache-miss search
        let entry = SearchLogEntry::new(
            params.query.clone(),
            caller_id.map(|id| id.to_string()),
            selector.as_log_fields(),
        );
        if let Err(e) = self.audit.append(&entry).await {
            tracing::error!(query = %query, error = %e, "Failed to append search audit entry");
        }

        Ok(hits)
    }

    /// Deterministic cache key over the query and the full parameter set
    fn cache_key(params: &SearchParams) -> Result<String> {
        Ok(format!(
            "search:{}:{}",
            params.query,
            serde_json::to_string(params)?
        ))
    }

    /// Build the candidate set, aggregate review signals, filter, sort, cap
    async fn execute(&self, query: &str, selector: &FilterSelector) -> Result<Vec<SearchHit>> {
        // Tag rule: technologies referenced by at least one review whose tag
        // set matches the query
        let tag_reviews = self.reviews.find_by_tag(query).await?;
        let mut include_ids: Vec<Uuid> =
            tag_reviews.iter().map(|r| r.technology_id).collect();
        include_ids.sort_unstable();
        include_ids.dedup();

        // Text rule union, de-duplicated by identity inside the store
        let candidates = self
            .catalog
            .find_candidates(&CandidateQuery {
                text: query.to_string(),
                include_ids,
            })
            .await?;

        let candidate_ids: Vec<Uuid> = candidates.iter().map(|t| t.id).collect();
        let reviews_by_tech = self.reviews.reviews_for_technologies(&candidate_ids).await?;

        let mut hits: Vec<SearchHit> = candidates
            .iter()
            .map(|technology| {
                let reviews = reviews_by_tech
                    .get(&technology.id)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                SearchHit::from_technology(technology, reviews)
            })
            .filter(|hit| Self::passes(hit, selector))
            .collect();

        Self::sort(&mut hits, selector);
        hits.truncate(RESULT_CAP);

        tracing::debug!(
            query = %query,
            selector = ?selector,
            results = hits.len(),
            "Search executed"
        );

        Ok(hits)
    }

    /// Apply the active dimension as a predicate, when it is one
    fn passes(hit: &SearchHit, selector: &FilterSelector) -> bool {
        if let Some(threshold) = selector.rating_threshold() {
            return hit.avg_rating >= threshold;
        }

        match selector {
            FilterSelector::Cost(cost) => hit.cost == *cost,
            FilterSelector::Category(category) => hit
                .category
                .to_lowercase()
                .contains(&category.to_lowercase()),
            _ => true,
        }
    }

    /// Apply the active dimension as a sort override, or the default order
    fn sort(hits: &mut [SearchHit], selector: &FilterSelector) {
        match selector {
            FilterSelector::Popularity => {
                hits.sort_by(|a, b| {
                    b.reviews_count
                        .cmp(&a.reviews_count)
                        .then(b.avg_rating.total_cmp(&a.avg_rating))
                });
            }
            FilterSelector::Recency => {
                // Stable sort keeps exact-timestamp ties in input order
                hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
            _ => {
                hits.sort_by(|a, b| {
                    b.avg_rating
                        .total_cmp(&a.avg_rating)
                        .then(b.reviews_count.cmp(&a.reviews_count))
                });
            }
        }
    }
}
