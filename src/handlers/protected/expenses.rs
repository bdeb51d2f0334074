use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::api::format::ExpenseResponse;
use crate::api::request::ExpenseRequest;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, CurrentTenant};
use crate::services::ServiceError;

/// POST /api/gastos
pub async fn create(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    body: Result<Json<ExpenseRequest>, JsonRejection>,
) -> ApiResult<ExpenseResponse> {
    let Json(request) = body?;
    let input = request.validate().map_err(ServiceError::from)?;
    Ok(ApiResponse::created(state.expenses.create(&tenant, input).await?))
}

/// GET /api/gastos
pub async fn list(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
) -> ApiResult<Vec<ExpenseResponse>> {
    Ok(ApiResponse::success(state.expenses.list(&tenant).await?))
}

/// GET /api/gastos/categoria/:categoria_id - newest first
pub async fn list_by_category(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    Path(category_id): Path<String>,
) -> ApiResult<Vec<ExpenseResponse>> {
    let expenses = state.expenses.list_by_category(&tenant, &category_id).await?;
    Ok(ApiResponse::success(expenses))
}

/// GET /api/gastos/:id
pub async fn get(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    Path(id): Path<String>,
) -> ApiResult<ExpenseResponse> {
    Ok(ApiResponse::success(state.expenses.get(&tenant, &id).await?))
}

/// PUT /api/gastos/:id
pub async fn update(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    Path(id): Path<String>,
    body: Result<Json<ExpenseRequest>, JsonRejection>,
) -> ApiResult<ExpenseResponse> {
    let Json(request) = body?;
    let input = request.validate().map_err(ServiceError::from)?;
    Ok(ApiResponse::success(state.expenses.update(&tenant, &id, input).await?))
}

/// DELETE /api/gastos/:id
pub async fn delete(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.expenses.delete(&tenant, &id).await?;
    Ok(ApiResponse::no_content())
}
