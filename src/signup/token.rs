use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use jsonwebtoken::{crypto, Algorithm, DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};

use super::error::SignupTokenError;

const SEPARATOR: char = '.';

/// What a signup token carries through the billing checkout round trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub plan_id: String,
    /// Issue time, milliseconds since the Unix epoch
    pub iat: i64,
}

impl SignupPayload {
    pub fn new(plan_id: impl Into<String>, iat: i64) -> Self {
        Self { plan_id: plan_id.into(), iat }
    }

    pub fn now(plan_id: impl Into<String>) -> Self {
        Self::new(plan_id, Utc::now().timestamp_millis())
    }
}

/// Issues and checks `base64url(json).base64url(hmac-sha256)` tokens.
#[derive(Clone)]
pub struct SignupTokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    has_secret: bool,
}

impl SignupTokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            has_secret: !secret.is_empty(),
        }
    }

    pub fn sign(&self, payload: &SignupPayload) -> Result<String, SignupTokenError> {
        if !self.has_secret {
            return Err(SignupTokenError::MissingSecret);
        }
        let json = serde_json::to_vec(payload)?;
        let encoded = URL_SAFE_NO_PAD.encode(json);
        let signature = crypto::sign(encoded.as_bytes(), &self.encoding, Algorithm::HS256)?;
        Ok(format!("{}{}{}", encoded, SEPARATOR, signature))
    }

    /// Returns the payload only when the signature recomputes to the same
    /// value (constant-time comparison) and the payload decodes.
    /// Every failure collapses to `None`.
    pub fn verify(&self, token: &str) -> Option<SignupPayload> {
        if !self.has_secret {
            tracing::warn!("signup token verification attempted without a configured secret");
            return None;
        }
        let (encoded, signature) = token.split_once(SEPARATOR)?;
        if encoded.is_empty() || signature.is_empty() || signature.contains(SEPARATOR) {
            return None;
        }
        match crypto::verify(signature, encoded.as_bytes(), &self.decoding, Algorithm::HS256) {
            Ok(true) => {}
            Ok(false) | Err(_) => return None,
        }
        let json = URL_SAFE_NO_PAD.decode(encoded).ok()?;
        serde_json::from_slice(&json).ok()
    }

    /// `verify`, plus rejection of tokens issued more than `max_age` before
    /// `now_ms` or more than `max_age` after it.
    pub fn verify_fresh(&self, token: &str, max_age: Duration, now_ms: i64) -> Option<SignupPayload> {
        let payload = self.verify(token)?;
        let age = now_ms.saturating_sub(payload.iat);
        if age.saturating_abs() > max_age.num_milliseconds() {
            tracing::debug!(plan_id = %payload.plan_id, age_ms = age, "signup token outside freshness window");
            return None;
        }
        Some(payload)
    }
}

impl std::fmt::Debug for SignupTokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupTokenSigner").field("has_secret", &self.has_secret).finish_non_exhaustive()
    }
}
