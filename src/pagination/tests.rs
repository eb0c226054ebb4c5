//! Tests for the pagination module

use super::*;
use crate::config::FetchConfig;
use crate::error::Error;
use crate::http::HttpClient;
use serde_json::json;
use std::collections::HashMap;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn no_params() -> HashMap<String, String> {
    HashMap::new()
}

async fn plan_against(
    server: &MockServer,
    config: &FetchConfig,
    params: &HashMap<String, String>,
) -> crate::error::Result<Plan> {
    let client = HttpClient::from_config(config).unwrap();
    Planner::new(config, &client)
        .plan(&format!("{}/api/items", server.uri()), params)
        .await
}

#[test]
fn test_plan_is_paged() {
    let paged = Plan::Paged {
        total_pages: 3,
        per_page: 10,
        total_count: 25,
    };
    assert!(paged.is_paged());
    assert!(!Plan::Unpaged(json!({})).is_paged());
}

#[tokio::test]
async fn test_plan_computes_page_count_ceiling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 10, "per_page": 3, "data": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = FetchConfig::default();
    let plan = plan_against(&mock_server, &config, &no_params())
        .await
        .unwrap();

    assert!(matches!(
        plan,
        Plan::Paged {
            total_pages: 4,
            per_page: 3,
            total_count: 10
        }
    ));
}

#[tokio::test]
async fn test_plan_exact_division() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 10, "per_page": 5
        })))
        .mount(&mock_server)
        .await;

    let config = FetchConfig::default();
    let plan = plan_against(&mock_server, &config, &no_params())
        .await
        .unwrap();

    assert!(matches!(plan, Plan::Paged { total_pages: 2, .. }));
}

#[tokio::test]
async fn test_plan_per_page_falls_back_to_config() {
    let mock_server = MockServer::start().await;

    // Body has a total but no per-page field
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 12
        })))
        .mount(&mock_server)
        .await;

    let config = FetchConfig::builder().per_page(5).build().unwrap();
    let plan = plan_against(&mock_server, &config, &no_params())
        .await
        .unwrap();

    assert!(matches!(
        plan,
        Plan::Paged {
            total_pages: 3,
            per_page: 5,
            ..
        }
    ));
}

#[tokio::test]
async fn test_plan_caller_param_overrides_per_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .and(query_param("per_page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 10, "per_page": 5
        })))
        .mount(&mock_server)
        .await;

    let config = FetchConfig::default();
    let mut params = HashMap::new();
    params.insert("per_page".to_string(), "2".to_string());

    let plan = plan_against(&mock_server, &config, &params).await.unwrap();

    assert!(matches!(
        plan,
        Plan::Paged {
            total_pages: 5,
            per_page: 2,
            ..
        }
    ));
}

#[tokio::test]
async fn test_plan_missing_total_returns_unpaged() {
    let mock_server = MockServer::start().await;

    let body = json!({"per_page": 5, "data": [{"id": 1}]});
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = FetchConfig::default();
    let plan = plan_against(&mock_server, &config, &no_params())
        .await
        .unwrap();

    match plan {
        Plan::Unpaged(raw) => assert_eq!(raw, body),
        Plan::Paged { .. } => panic!("expected Unpaged"),
    }
}

#[tokio::test]
async fn test_plan_unresolvable_per_page_returns_unpaged() {
    let mock_server = MockServer::start().await;

    // Total present, but per-page absent everywhere (body, params, config)
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 10
        })))
        .mount(&mock_server)
        .await;

    let config = FetchConfig::default();
    let plan = plan_against(&mock_server, &config, &no_params())
        .await
        .unwrap();

    assert!(!plan.is_paged());
}

#[tokio::test]
async fn test_plan_non_200_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = FetchConfig::default();
    let err = plan_against(&mock_server, &config, &no_params())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DataFetchFailed { status: 500, .. }));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_plan_one_page_only_clamps_to_single_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 100, "per_page": 5
        })))
        .mount(&mock_server)
        .await;

    let config = FetchConfig::builder()
        .download_one_page_only(true)
        .build()
        .unwrap();
    let plan = plan_against(&mock_server, &config, &no_params())
        .await
        .unwrap();

    assert!(matches!(plan, Plan::Paged { total_pages: 1, .. }));
}

#[tokio::test]
async fn test_plan_zero_per_page_fails_fast() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 10, "per_page": 0
        })))
        .mount(&mock_server)
        .await;

    let config = FetchConfig::default();
    let err = plan_against(&mock_server, &config, &no_params())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidConfigValue { .. }));
}

#[tokio::test]
async fn test_plan_negative_per_page_fails_fast() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 10, "per_page": -5
        })))
        .mount(&mock_server)
        .await;

    let config = FetchConfig::default();
    let err = plan_against(&mock_server, &config, &no_params())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidConfigValue { .. }));
}
