use scopegrid::config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SIGNUP_TOKEN_SECRET, APP_ENV, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    tracing::info!("Starting ScopeGrid in {:?} mode", config.environment);

    if config.signup.token_secret.is_empty() {
        if scopegrid::is_production!() {
            tracing::error!("SIGNUP_TOKEN_SECRET is not set; signup tokens cannot be issued or verified");
        } else {
            tracing::warn!("SIGNUP_TOKEN_SECRET is not set; signup token endpoints will reject requests");
        }
    } else if !scopegrid::is_development!() && config.signup.token_max_age_secs.is_none() {
        tracing::warn!("Signup tokens are accepted regardless of age");
    }

    scopegrid::app::serve(config.clone()).await
}
