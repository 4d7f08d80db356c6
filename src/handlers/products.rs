use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{ProductView, ProductViewRequest, ProductViewService};

/// POST /api/products/view - match against the catalog, then filter, sort and group
pub async fn products_view_post(
    State(state): State<AppState>,
    body: Result<Json<ProductViewRequest>, JsonRejection>,
) -> ApiResult<ProductView> {
    let Json(request) = body?;

    let view = ProductViewService::new(&state.config.products).render(request)?;
    Ok(ApiResponse::success(view))
}
