mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn keys(body: &Value) -> Vec<String> {
    body["data"]["items"]
        .as_array()
        .map(|items| items.iter().map(|i| i["id"].to_string().trim_matches('"').to_string()).collect())
        .unwrap_or_default()
}

async fn view(server: &common::TestServer, request: Value) -> Result<(StatusCode, Value)> {
    let res = server.client.post(server.url("/api/products/view")).json(&request).send().await?;
    let status = res.status();
    Ok((status, res.json::<Value>().await?))
}

#[tokio::test]
async fn sorts_descending_with_missing_names_last() -> Result<()> {
    let server = common::ensure_server().await?;

    let (status, body) = view(
        &server,
        json!({
            "products": [
                { "id": 1, "name": "b" },
                { "id": 2, "name": null },
                { "id": 3, "name": "a" }
            ],
            "sort": "name desc"
        }),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(keys(&body), vec!["1", "3", "2"]);
    assert_eq!(body["data"]["sort"]["key"], "name");
    assert_eq!(body["data"]["sort"]["direction"], "desc");
    Ok(())
}

#[tokio::test]
async fn default_sort_is_name_ascending() -> Result<()> {
    let server = common::ensure_server().await?;

    let (status, body) = view(
        &server,
        json!({
            "products": [
                { "id": 1, "name": "Zyxel" },
                { "id": 2, "name": "Auvik" }
            ]
        }),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(keys(&body), vec!["2", "1"]);
    assert_eq!(body["data"]["sort"]["direction"], "asc");
    Ok(())
}

#[tokio::test]
async fn applies_overrides_exclusions_search_and_groups() -> Result<()> {
    let server = common::ensure_server().await?;

    let (status, body) = view(
        &server,
        json!({
            "products": [
                { "id": 1, "name": "Meraki MX68", "vendor": "Cisco" },
                { "id": 2, "name": "Datto SIRIS", "vendor": "Datto" },
                { "id": 3, "name": "Meraki MR36", "vendor": "Cisco" },
                { "id": 4, "name": "Auvik", "vendor": "Auvik" }
            ],
            "catalog": [
                { "id": 100, "slug": "meraki-mx68", "name": "Meraki MX68" },
                { "id": 101, "slug": "meraki-mr", "name": "Meraki MR" }
            ],
            "overrides": { "3": "meraki-mr" },
            "exclusions": ["4"],
            "search": "meraki",
            "sort": { "key": "name", "direction": "asc" },
            "groupBy": "match"
        }),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(keys(&body), vec!["3", "1"]);
    assert_eq!(body["data"]["total"], 2);

    let items = &body["data"]["items"];
    assert_eq!(items[0]["match"]["source"], "override");
    assert_eq!(items[0]["match"]["catalog"]["slug"], "meraki-mr");
    assert_eq!(items[1]["match"]["source"], "automatic");

    assert_eq!(body["data"]["groups"]["override"], json!(["3"]));
    assert_eq!(body["data"]["groups"]["automatic"], json!(["1"]));
    Ok(())
}

#[tokio::test]
async fn invalid_sort_direction_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;

    let (status, body) = view(
        &server,
        json!({
            "products": [{ "id": 1, "name": "a" }],
            "sort": "name sideways"
        }),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["sort"].is_string());
    Ok(())
}

#[tokio::test]
async fn oversized_product_list_is_rejected() -> Result<()> {
    let mut config = common::test_config();
    config.products.max_items = 2;
    let server = common::start_server(config).await?;

    let (status, body) = view(
        &server,
        json!({
            "products": [
                { "id": 1, "name": "a" },
                { "id": 2, "name": "b" },
                { "id": 3, "name": "c" }
            ]
        }),
    )
    .await?;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], true);
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_bad_request() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = server
        .client
        .post(server.url("/api/products/view"))
        .header("content-type", "application/json")
        .body("{\"products\": 12}")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
