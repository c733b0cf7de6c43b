use crate::api::AppState;
use crate::auth::MaybeUser;
use crate::error::Result;
use crate::search::{SearchHit, SearchParams};
use axum::{
    extract::{Query, State},
    Json,
};

/// Search the catalog.
///
/// Anonymous callers are allowed; an authenticated caller's identity is
/// recorded in the audit log on cache misses.
pub async fn search(
    State(state): State<AppState>,
    MaybeUser(claims): MaybeUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>> {
    let caller_id = claims.as_ref().map(|c| c.user_id.as_str());
    let hits = state.search.resolve(&params, caller_id).await?;
    Ok(Json(hits))
}
