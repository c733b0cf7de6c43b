use crate::api::AppState;
use crate::auth::CurrentUser;
use crate::error::{AppError, Result};
use crate::models::{Review, SocialLinks};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create a review (authenticated)
pub async fn create_review(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(request): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>)> {
    request.validate()?;

    if request.comment.trim().is_empty() {
        return Err(AppError::Validation(
            "Comment is required and must be a non-empty string".to_string(),
        ));
    }

    let technology = state
        .catalog
        .get_technology(&request.technology_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Technology not found".to_string()))?;

    let review = Review::new(
        request.technology_id,
        claims.user_id.clone(),
        request.rating,
        request.comment,
        request.tags.unwrap_or_default(),
    );

    state.reviews.save_review(&review).await?;

    let response = build_response(&state, review, Some((technology.name, technology.description))).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[serde(rename = "technologyId")]
    pub technology_id: Uuid,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(min = 1))]
    pub comment: String,
    pub tags: Option<Vec<String>>,
}

/// List all reviews
pub async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<ReviewResponse>>> {
    let reviews = state.reviews.list_reviews().await?;

    let mut responses = Vec::with_capacity(reviews.len());
    for review in reviews {
        responses.push(build_response(&state, review, None).await?);
    }

    Ok(Json(responses))
}

/// Get a review by ID
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewResponse>> {
    let review = state
        .reviews
        .get_review(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;

    Ok(Json(build_response(&state, review, None).await?))
}

/// Update a review (authenticated, owner-only)
pub async fn update_review(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>> {
    request.validate()?;

    let mut review = state
        .reviews
        .get_review(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;

    if review.user_id != claims.user_id {
        return Err(AppError::Authorization("Access denied".to_string()));
    }

    if let Some(rating) = request.rating {
        review.rating = rating;
    }
    if let Some(comment) = request.comment {
        if comment.trim().is_empty() {
            return Err(AppError::Validation(
                "Comment must be a non-empty string".to_string(),
            ));
        }
        review.comment = comment;
    }
    if let Some(tags) = request.tags {
        review.tags = tags;
    }
    review.touch();

    state.reviews.update_review(&review).await?;

    Ok(Json(build_response(&state, review, None).await?))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Delete a review (authenticated, owner-only)
pub async fn delete_review(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let review = state
        .reviews
        .get_review(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;

    if review.user_id != claims.user_id {
        return Err(AppError::Authorization("Access denied".to_string()));
    }

    state.reviews.delete_review(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Review response with embedded technology and reviewer summaries
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub technology: Option<TechnologySummary>,
    pub user: Option<ReviewerSummary>,
    pub rating: i32,
    pub comment: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TechnologySummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewerSummary {
    pub user_id: String,
    pub email: String,
    pub social_links: SocialLinks,
}

async fn build_response(
    state: &AppState,
    review: Review,
    technology: Option<(String, String)>,
) -> Result<ReviewResponse> {
    let technology = match technology {
        Some((name, description)) => Some(TechnologySummary {
            id: review.technology_id,
            name,
            description,
        }),
        None => state
            .catalog
            .get_technology(&review.technology_id)
            .await?
            .map(|t| TechnologySummary {
                id: t.id,
                name: t.name,
                description: t.description,
            }),
    };

    let user = state
        .users
        .get_user(&review.user_id)
        .await?
        .map(|u| ReviewerSummary {
            user_id: u.user_id,
            email: u.email,
            social_links: u.social_links,
        });

    Ok(ReviewResponse {
        id: review.id,
        technology,
        user,
        rating: review.rating,
        comment: review.comment,
        tags: review.tags,
        created_at: review.created_at,
        updated_at: review.updated_at,
    })
}
