use chrono::{Duration, Utc};

use crate::config::SignupConfig;
use crate::signup::{SignupPayload, SignupTokenError, SignupTokenSigner};

/// Issues checkout reference tokens and checks the ones billing hands back
#[derive(Debug, Clone)]
pub struct SignupService {
    signer: SignupTokenSigner,
    max_age: Option<Duration>,
}

impl SignupService {
    pub fn new(config: &SignupConfig) -> Self {
        Self {
            signer: SignupTokenSigner::new(&config.token_secret),
            max_age: config.token_max_age_secs.and_then(freshness_window),
        }
    }

    pub fn issue(&self, plan_id: &str) -> Result<(String, SignupPayload), SignupTokenError> {
        let payload = SignupPayload::now(plan_id);
        let token = self.signer.sign(&payload)?;
        tracing::info!(plan_id, "issued signup token");
        Ok((token, payload))
    }

    pub fn verify(&self, token: &str) -> Option<SignupPayload> {
        let verified = match self.max_age {
            Some(max_age) => self.signer.verify_fresh(token, max_age, Utc::now().timestamp_millis()),
            None => self.signer.verify(token),
        };
        if verified.is_none() {
            tracing::warn!(token_len = token.len(), "rejected signup token");
        }
        verified
    }
}

/// Seconds that do not fit a `Duration` disable the window rather than abort startup
fn freshness_window(secs: u64) -> Option<Duration> {
    let window = i64::try_from(secs).ok().and_then(Duration::try_seconds);
    if window.is_none() {
        tracing::warn!(secs, "signup token max age out of range; token age will not be checked");
    }
    window
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_age: Option<u64>) -> SignupConfig {
        SignupConfig { token_secret: "svc-secret".into(), token_max_age_secs: max_age }
    }

    #[test]
    fn issue_then_verify() {
        let service = SignupService::new(&config(Some(3600)));
        let (token, payload) = service.issue("price_team").unwrap();
        assert_eq!(service.verify(&token), Some(payload));
    }

    #[test]
    fn stale_token_rejected_when_window_configured() {
        let service = SignupService::new(&config(Some(60)));
        let old = SignupPayload::new("price_team", Utc::now().timestamp_millis() - 10 * 60 * 1000);
        let token = SignupTokenSigner::new("svc-secret").sign(&old).unwrap();
        assert_eq!(service.verify(&token), None);

        let lenient = SignupService::new(&config(None));
        assert_eq!(lenient.verify(&token), Some(old));
    }

    #[test]
    fn out_of_range_max_age_disables_window() {
        let service = SignupService::new(&config(Some(10_000_000_000_000_000)));
        assert!(service.max_age.is_none());

        let old = SignupPayload::new("price_team", 1);
        let token = SignupTokenSigner::new("svc-secret").sign(&old).unwrap();
        assert_eq!(service.verify(&token), Some(old));

        let service = SignupService::new(&config(Some(u64::MAX)));
        assert!(service.max_age.is_none());
    }
}
