use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::api::format::CategoryResponse;
use crate::api::request::CategoryRequest;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, CurrentTenant};
use crate::services::ServiceError;

/// POST /api/categorias
pub async fn create(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    body: Result<Json<CategoryRequest>, JsonRejection>,
) -> ApiResult<CategoryResponse> {
    let Json(request) = body?;
    let input = request.validate().map_err(ServiceError::from)?;
    let created = state.categories.create(&tenant, input).await?;
    Ok(ApiResponse::created(created))
}

/// GET /api/categorias
pub async fn list(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
) -> ApiResult<Vec<CategoryResponse>> {
    Ok(ApiResponse::success(state.categories.list(&tenant).await?))
}

/// GET /api/categorias/:id
pub async fn get(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    Path(id): Path<String>,
) -> ApiResult<CategoryResponse> {
    Ok(ApiResponse::success(state.categories.get(&tenant, &id).await?))
}

/// PUT /api/categorias/:id
pub async fn update(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    Path(id): Path<String>,
    body: Result<Json<CategoryRequest>, JsonRejection>,
) -> ApiResult<CategoryResponse> {
    let Json(request) = body?;
    let input = request.validate().map_err(ServiceError::from)?;
    let updated = state.categories.update(&tenant, &id, input).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/categorias/:id
pub async fn delete(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.categories.delete(&tenant, &id).await?;
    Ok(ApiResponse::no_content())
}
