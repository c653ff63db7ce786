//! Upstream client tests against a local wiremock server

use std::time::{Duration, Instant};

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use geoproxy::credentials::ApiKey;
use geoproxy::errors::GeoProxyError;
use geoproxy::upstream::{GeoUpstream, IpGeolocationProvider};

const TEST_KEY: &str = "test-api-key";

fn provider_for(server: &MockServer) -> IpGeolocationProvider {
    IpGeolocationProvider::new(
        &format!("{}/ipgeo", server.uri()),
        ApiKey::new(TEST_KEY),
        Duration::from_secs(5),
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_success_decodes_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ipgeo"))
        .and(query_param("apiKey", TEST_KEY))
        .and(query_param("ip", "1.2.3.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ip": "1.2.3.4",
            "continent_name": "Europe",
            "country_name": "Germany",
            "city": "Berlin",
            "latitude": "52.52437",
            "longitude": "13.41053",
            "isp": "Deutsche Telekom AG",
            "organization": "Deutsche Telekom AG",
            "country_code2": "DE",
            "time_zone": { "name": "Europe/Berlin" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = provider_for(&server).fetch("1.2.3.4").await.unwrap();

    assert_eq!(record.ip, "1.2.3.4");
    assert_eq!(record.continent, "Europe");
    assert_eq!(record.country, "Germany");
    assert_eq!(record.city, "Berlin");
    assert_eq!(record.latitude, "52.52437");
    assert_eq!(record.longitude, "13.41053");
    assert_eq!(record.isp, "Deutsche Telekom AG");
    assert_eq!(record.organization, "Deutsche Telekom AG");
    // 上游不返回来源字段
    assert!(record.api_server.is_empty());
    assert!(!record.cached);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_missing_fields_default_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ipgeo"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ip": "9.9.9.9" })),
        )
        .mount(&server)
        .await;

    let record = provider_for(&server).fetch("9.9.9.9").await.unwrap();
    assert_eq!(record.ip, "9.9.9.9");
    assert!(record.city.is_empty());
    assert!(record.country.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_non_success_status_carries_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ipgeo"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string("{\"message\":\"Provided API key is not valid.\"}"),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server).fetch("1.2.3.4").await.unwrap_err();

    match &err {
        GeoProxyError::Upstream { status, body } => {
            assert_eq!(*status, Some(401));
            assert!(body.contains("Provided API key is not valid."));
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
    assert!(err.message().contains("401"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_malformed_json_is_deserialization_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ipgeo"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = provider_for(&server).fetch("1.2.3.4").await.unwrap_err();
    assert!(matches!(err, GeoProxyError::Deserialization(_)));
    assert!(err.message().contains("error unmarshaling API response"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_connection_refused_is_transport_error() {
    // 端口 1 上没有服务
    let provider = IpGeolocationProvider::new(
        "http://127.0.0.1:1/ipgeo",
        ApiKey::new(TEST_KEY),
        Duration::from_secs(2),
    );

    let err = provider.fetch("1.2.3.4").await.unwrap_err();
    assert!(matches!(err, GeoProxyError::Upstream { status: None, .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_null_fields_decode_as_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ipgeo"))
        .and(query_param("ip", "1.2.3.4"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"ip":"1.2.3.4","city":"Berlin","organization":null,"isp":null}"#,
        ))
        .mount(&server)
        .await;

    let record = provider_for(&server).fetch("1.2.3.4").await.unwrap();

    assert_eq!(record.ip, "1.2.3.4");
    assert_eq!(record.city, "Berlin");
    assert!(record.organization.is_empty());
    assert!(record.isp.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_non_200_success_status_is_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ipgeo"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let err = provider_for(&server).fetch("1.2.3.4").await.unwrap_err();
    assert!(matches!(
        err,
        GeoProxyError::Upstream {
            status: Some(204),
            ..
        }
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_slow_upstream_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ipgeo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "ip": "1.2.3.4" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let provider = IpGeolocationProvider::new(
        &format!("{}/ipgeo", server.uri()),
        ApiKey::new(TEST_KEY),
        Duration::from_millis(300),
    );

    let start = Instant::now();
    let err = provider.fetch("1.2.3.4").await.unwrap_err();

    assert!(matches!(err, GeoProxyError::Upstream { status: None, .. }));
    assert!(start.elapsed() < Duration::from_secs(2));
}
