use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Audit record for a single cache-miss search.
///
/// Write-once: appended to the audit sink and never read back by the
/// search engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchLogEntry {
    /// Unique identifier
    pub search_id: Uuid,

    /// Raw query string as supplied by the caller
    pub query: String,

    /// Caller identity, None for anonymous searches
    pub user_id: Option<String>,

    /// The single active filter dimension, as key -> value
    pub filters: HashMap<String, String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl SearchLogEntry {
    /// Create a new log entry
    pub fn new(query: String, user_id: Option<String>, filters: HashMap<String, String>) -> Self {
        Self {
            search_id: Uuid::new_v4(),
            query,
            user_id,
            filters,
            created_at: Utc::now(),
        }
    }
}
