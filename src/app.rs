use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers;
use crate::services::SignupService;

/// Shared by every handler; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub signup: SignupService,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let signup = SignupService::new(&config.signup);
        Self { config: Arc::new(config), signup }
    }
}

pub fn router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    let mut app = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(signup_routes())
        .merge(products_routes())
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if config.security.enable_cors {
        app = app.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }
    app
}

fn signup_routes() -> Router<AppState> {
    Router::new()
        .route("/api/signup-token", post(handlers::signup_token_post))
        .route("/api/signup-token/verify", post(handlers::signup_token_verify))
}

fn products_routes() -> Router<AppState> {
    Router::new().route("/api/products/view", post(handlers::products_view_post))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Serve on an already-bound listener until the process stops
pub async fn serve_on(listener: TcpListener, config: AppConfig) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("ScopeGrid listening on http://{} ({:?})", addr, config.environment);
    axum::serve(listener, router(AppState::new(config))).await?;
    Ok(())
}

pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;
    serve_on(listener, config).await
}
