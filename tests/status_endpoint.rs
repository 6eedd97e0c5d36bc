//! End-to-end tests for `GET /countryinfo/v1/status`.

use std::time::{Duration, Instant};

use httpmock::prelude::*;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_both_providers_reachable() {
    let countries = MockServer::start_async().await;
    let cities = MockServer::start_async().await;

    let get_probe = countries
        .mock_async(|when, then| {
            when.method(GET).path("/v3.1/alpha/no");
            then.status(200).json_body(common::norway());
        })
        .await;
    let post_probe = cities
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v0.1/countries/cities")
                .header("content-type", "application/json")
                .json_body(json!({"country": "Norway"}));
            then.status(200).json_body(json!({"data": ["Oslo"]}));
        })
        .await;

    let service = common::start_service(common::config_for(&countries, &cities)).await;
    let res = service.get("/countryinfo/v1/status").await;

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["restcountriesapi"], "opp");
    assert_eq!(body["countriesnowapi"], "opp");
    assert_eq!(body["version"], "v1");
    assert!(body["uptime"].as_u64().is_some());

    get_probe.assert_async().await;
    post_probe.assert_async().await;
}

#[tokio::test]
async fn test_service_unavailable_is_unreachable() {
    let countries = MockServer::start_async().await;
    let cities = MockServer::start_async().await;

    countries
        .mock_async(|when, then| {
            when.method(GET).path("/v3.1/alpha/no");
            then.status(200).json_body(common::norway());
        })
        .await;
    cities
        .mock_async(|when, then| {
            when.method(POST).path("/api/v0.1/countries/cities");
            then.status(503);
        })
        .await;

    let service = common::start_service(common::config_for(&countries, &cities)).await;
    let body: Value = service.get("/countryinfo/v1/status/").await.json().await.unwrap();

    assert_eq!(body["restcountriesapi"], "opp");
    assert_eq!(body["countriesnowapi"], "ned");
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let countries = MockServer::start_async().await;
    let cities = MockServer::start_async().await;
    cities
        .mock_async(|when, then| {
            when.method(POST).path("/api/v0.1/countries/cities");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;

    let silent = common::start_silent_backend().await;
    let mut config = common::config_for(&countries, &cities);
    config.upstreams.countries_base_url = format!("http://{}", silent);
    config.health.timeout_secs = 1;

    let service = common::start_service(config).await;
    let start = Instant::now();
    let body: Value = service.get("/countryinfo/v1/status").await.json().await.unwrap();

    assert_eq!(body["restcountriesapi"], "ned");
    assert_eq!(body["countriesnowapi"], "opp");
    assert!(start.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_request_counter_increments() {
    let countries = MockServer::start_async().await;
    let cities = MockServer::start_async().await;
    let service = common::start_service(common::config_for(&countries, &cities)).await;

    let mut counts = Vec::new();
    for _ in 0..3 {
        let body: Value = service.get("/countryinfo/v1/status").await.json().await.unwrap();
        // Unmocked paths answer 404, which is still a classification.
        assert_eq!(body["restcountriesapi"], "ned");
        counts.push(body["request_count"].as_u64().unwrap());
    }

    assert_eq!(counts, vec![1, 2, 3]);
}
