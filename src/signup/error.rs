use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignupTokenError {
    #[error("Signup token secret is not configured")]
    MissingSecret,

    #[error("Failed to encode signup payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to sign signup token: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
}
