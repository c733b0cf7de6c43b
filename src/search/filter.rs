use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw search query parameters as supplied by the caller.
///
/// Field names mirror the public query string (camelCase where the API uses
/// it). The full struct participates in cache key derivation, so every field
/// that can affect results is here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    /// Free-text query (required; emptiness is rejected before any store or
    /// cache access)
    #[serde(default)]
    pub query: String,

    /// Minimum average-rating threshold
    pub rating: Option<f64>,

    /// Sort by review count instead of average rating
    pub popularity: Option<bool>,

    /// Sort by creation time instead of average rating
    pub recency: Option<bool>,

    /// Restrict to technologies with average rating >= 4.0
    #[serde(rename = "highestRatings")]
    pub highest_ratings: Option<bool>,

    /// Exact cost tier match
    pub cost: Option<String>,

    /// Case-insensitive category substring match
    pub category: Option<String>,
}

/// The single active filter dimension.
///
/// At most one dimension is honored per request, selected in fixed priority
/// order with first-present-wins. This is a documented contract, not an
/// oversight; broadening it requires a stakeholder decision.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSelector {
    /// Keep candidates with avg_rating >= threshold
    Rating(f64),

    /// Sort by reviews_count desc, ties by avg_rating desc
    Popularity,

    /// Sort by created_at desc
    Recency,

    /// Keep candidates with avg_rating >= 4.0
    HighestRatings,

    /// Keep candidates with exactly this cost tier
    Cost(String),

    /// Keep candidates whose category contains this, case-insensitively
    Category(String),

    /// No modifier: default ranking applies
    None,
}

/// Fixed threshold for the highestRatings dimension
const HIGHEST_RATINGS_THRESHOLD: f64 = 4.0;

impl FilterSelector {
    /// Select the active dimension from the supplied parameters.
    ///
    /// Priority: rating > popularity > recency > highestRatings > cost >
    /// category. Boolean flags must be explicitly true to count as present.
    pub fn from_params(params: &SearchParams) -> Self {
        if let Some(threshold) = params.rating {
            FilterSelector::Rating(threshold)
        } else if params.popularity == Some(true) {
            FilterSelector::Popularity
        } else if params.recency == Some(true) {
            FilterSelector::Recency
        } else if params.highest_ratings == Some(true) {
            FilterSelector::HighestRatings
        } else if let Some(ref cost) = params.cost {
            FilterSelector::Cost(cost.clone())
        } else if let Some(ref category) = params.category {
            FilterSelector::Category(category.clone())
        } else {
            FilterSelector::None
        }
    }

    /// Minimum average rating imposed by this dimension, if any
    pub fn rating_threshold(&self) -> Option<f64> {
        match self {
            FilterSelector::Rating(threshold) => Some(*threshold),
            FilterSelector::HighestRatings => Some(HIGHEST_RATINGS_THRESHOLD),
            _ => None,
        }
    }

    /// Key -> value representation for the audit log
    pub fn as_log_fields(&self) -> HashMap<String, String> {
        let mut fields = HashMap::new();
        match self {
            FilterSelector::Rating(threshold) => {
                fields.insert("rating".to_string(), threshold.to_string());
            }
            FilterSelector::Popularity => {
                fields.insert("popularity".to_string(), "true".to_string());
            }
            FilterSelector::Recency => {
                fields.insert("recency".to_string(), "true".to_string());
            }
            FilterSelector::HighestRatings => {
                fields.insert("highestRatings".to_string(), "true".to_string());
            }
            FilterSelector::Cost(cost) => {
                fields.insert("cost".to_string(), cost.clone());
            }
            FilterSelector::Category(category) => {
                fields.insert("category".to_string(), category.clone());
            }
            FilterSelector::None => {}
        }
        fields
    }
}
