use crate::api::AppState;
use crate::auth::CurrentUser;
use crate::error::{AppError, Result};
use crate::models::{CoreVitals, FeatureComparison, Technology};
use crate::state::BrowseFilter;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create a technology (authenticated)
pub async fn create_technology(
    State(state): State<AppState>,
    CurrentUser(_claims): CurrentUser,
    Json(request): Json<CreateTechnologyRequest>,
) -> Result<(StatusCode, Json<Technology>)> {
    request.validate()?;

    let mut technology = Technology::new(request.name, request.description);
    apply_optional_fields(&mut technology, request.fields);

    state.catalog.save_technology(&technology).await?;

    Ok((StatusCode::CREATED, Json(technology)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTechnologyRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(flatten)]
    pub fields: TechnologyFields,
}

/// Optional technology metadata shared by create and update
#[derive(Debug, Default, Deserialize)]
pub struct TechnologyFields {
    pub core_vitals: Option<CoreVitals>,
    pub feature_comparison: Option<FeatureComparison>,
    pub inputs: Option<String>,
    pub developer: Option<String>,
    pub platform: Option<String>,
    pub version: Option<String>,
    pub evaluation: Option<String>,
    pub cost: Option<String>,
    pub category: Option<String>,
    pub system_requirements: Option<String>,
    pub key_features: Option<String>,
    pub image_url: Option<String>,
}

fn apply_optional_fields(technology: &mut Technology, fields: TechnologyFields) {
    if let Some(core_vitals) = fields.core_vitals {
        technology.core_vitals = core_vitals;
    }
    if let Some(feature_comparison) = fields.feature_comparison {
        technology.feature_comparison = feature_comparison;
    }
    if let Some(inputs) = fields.inputs {
        technology.inputs = inputs;
    }
    if let Some(developer) = fields.developer {
        technology.developer = developer;
    }
    if let Some(platform) = fields.platform {
        technology.platform = platform;
    }
    if let Some(version) = fields.version {
        technology.version = version;
    }
    if let Some(evaluation) = fields.evaluation {
        technology.evaluation = evaluation;
    }
    if let Some(cost) = fields.cost {
        technology.cost = cost;
    }
    if let Some(category) = fields.category {
        technology.category = category;
    }
    if let Some(system_requirements) = fields.system_requirements {
        technology.system_requirements = system_requirements;
    }
    if let Some(key_features) = fields.key_features {
        technology.key_features = key_features;
    }
    if let Some(image_url) = fields.image_url {
        technology.image_url = image_url;
    }
}

/// List technologies with independent browse filters
pub async fn list_technologies(
    State(state): State<AppState>,
    Query(params): Query<ListTechnologiesQuery>,
) -> Result<Json<Vec<Technology>>> {
    let filter = BrowseFilter {
        category: params.category,
        cost: params.cost,
        min_features_rating: params.rating_min,
        features: params
            .features
            .map(|csv| {
                csv.split(',')
                    .map(|f| f.trim().to_lowercase())
                    .filter(|f| !f.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
    };

    let technologies = state.catalog.list_technologies(&filter).await?;
    Ok(Json(technologies))
}

#[derive(Debug, Deserialize)]
pub struct ListTechnologiesQuery {
    pub category: Option<String>,
    pub cost: Option<String>,
    #[serde(rename = "ratingMin")]
    pub rating_min: Option<f64>,
    /// Comma-separated capability flag names
    pub features: Option<String>,
}

/// Get a technology by ID
pub async fn get_technology(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Technology>> {
    let technology = state
        .catalog
        .get_technology(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Technology not found".to_string()))?;

    Ok(Json(technology))
}

/// Update a technology (authenticated, partial)
pub async fn update_technology(
    State(state): State<AppState>,
    CurrentUser(_claims): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTechnologyRequest>,
) -> Result<Json<Technology>> {
    let mut technology = state
        .catalog
        .get_technology(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Technology not found".to_string()))?;

    if let Some(name) = request.name {
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }
        technology.name = name;
    }
    if let Some(description) = request.description {
        if description.is_empty() {
            return Err(AppError::Validation("Description is required".to_string()));
        }
        technology.description = description;
    }
    apply_optional_fields(&mut technology, request.fields);
    technology.touch();

    state.catalog.update_technology(&technology).await?;

    Ok(Json(technology))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTechnologyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(flatten)]
    pub fields: TechnologyFields,
}

/// Delete a technology (authenticated)
pub async fn delete_technology(
    State(state): State<AppState>,
    CurrentUser(_claims): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.catalog.delete_technology(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
