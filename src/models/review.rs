use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A user review of a technology.
///
/// Many reviews reference one technology; the search engine derives
/// `avg_rating` and `reviews_count` from this relationship per query.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Review {
    /// Unique identifier
    pub id: Uuid,

    /// Reviewed technology (required foreign key)
    pub technology_id: Uuid,

    /// Reviewer (user id string)
    #[validate(length(min = 1))]
    pub user_id: String,

    /// Star rating, always within 1..=5
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,

    /// Review body
    #[validate(length(min = 1))]
    pub comment: String,

    /// Free-form tags attached by the reviewer
    #[serde(default)]
    pub tags: Vec<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Create a new review
    pub fn new(technology_id: Uuid, user_id: String, rating: i32, comment: String, tags: Vec<String>) -> Self {
        debug_assert!((1..=5).contains(&rating));

        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            technology_id,
            user_id,
            rating,
            comment,
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the record as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_review() {
        let tech_id = Uuid::new_v4();
        let review = Review::new(
            tech_id,
            "user-1".to_string(),
            4,
            "Works well with NVDA".to_string(),
            vec!["accessible".to_string()],
        );

        assert_eq!(review.technology_id, tech_id);
        assert_eq!(review.rating, 4);
        assert_eq!(review.tags.len(), 1);
        assert!(review.validate().is_ok());
    }

    #[test]
    fn test_rating_bounds_validation() {
        let mut review = Review::new(
            Uuid::new_v4(),
            "user-1".to_string(),
            3,
            "ok".to_string(),
            vec![],
        );
        review.rating = 6;
        assert!(review.validate().is_err());
    }
}
