mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn issue(server: &common::TestServer, plan_id: &str) -> Result<String> {
    let res = server
        .client
        .post(server.url("/api/signup-token"))
        .json(&json!({ "planId": plan_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED, "unexpected status: {}", res.status());
    let body = res.json::<Value>().await?;
    Ok(body["data"]["token"].as_str().unwrap_or_default().to_string())
}

async fn verify(server: &common::TestServer, token: &str) -> Result<(StatusCode, Value)> {
    let res = server
        .client
        .post(server.url("/api/signup-token/verify"))
        .json(&json!({ "token": token }))
        .send()
        .await?;
    let status = res.status();
    Ok((status, res.json::<Value>().await?))
}

#[tokio::test]
async fn issued_token_verifies() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = issue(&server, "price_msp_pro").await?;
    assert_eq!(token.matches('.').count(), 1, "token: {}", token);

    let (status, body) = verify(&server, &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["planId"], "price_msp_pro");
    assert!(body["data"]["iat"].as_i64().unwrap_or_default() > 0);
    Ok(())
}

#[tokio::test]
async fn tampered_token_is_invalid() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = issue(&server, "price_msp_pro").await?;

    let mut chars: Vec<char> = token.chars().collect();
    let last = chars.len() - 1;
    chars[last] = if chars[last] == 'A' { 'B' } else { 'A' };
    let tampered: String = chars.into_iter().collect();

    let (status, body) = verify(&server, &tampered).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_TOKEN");
    Ok(())
}

#[tokio::test]
async fn malformed_token_is_invalid() -> Result<()> {
    let server = common::ensure_server().await?;
    for token in ["", "no-separator", "a.b.c"] {
        let (status, body) = verify(&server, token).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "token {:?}", token);
        assert_eq!(body["code"], "INVALID_TOKEN");
    }
    Ok(())
}

#[tokio::test]
async fn blank_plan_id_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = server
        .client
        .post(server.url("/api/signup-token"))
        .json(&json!({ "planId": "   " }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["planId"].is_string());
    Ok(())
}

#[tokio::test]
async fn missing_secret_cannot_issue() -> Result<()> {
    let mut config = common::test_config();
    config.signup.token_secret.clear();
    let server = common::start_server(config).await?;

    let res = server
        .client
        .post(server.url("/api/signup-token"))
        .json(&json!({ "planId": "price_msp_pro" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}

#[tokio::test]
async fn token_from_other_secret_is_invalid() -> Result<()> {
    let mut config = common::test_config();
    config.signup.token_secret = "another-secret".into();
    let other = common::start_server(config).await?;
    let token = issue(&other, "price_msp_pro").await?;

    let server = common::ensure_server().await?;
    let (status, _) = verify(&server, &token).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}
