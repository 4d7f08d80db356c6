use axum::{http::Uri, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "ScopeGrid",
            "version": version,
            "description": "Product matching views and signup token service",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "signup_token": "/api/signup-token (issue), /api/signup-token/verify (verify)",
                "products": "/api/products/view (match, filter, sort, group)",
            }
        }
    }))
}

/// GET /health - liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }
    }))
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}
