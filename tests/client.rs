//! `ViSearch` end to end: search endpoint and tracking endpoint on two mock
//! servers.

use std::io::Write;
use visearch::prelude::*;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_BODY: &str = r#"{
    "status": "OK",
    "method": "search",
    "page": 1,
    "limit": 10,
    "total": 2,
    "result": [
        {"im_name": "shoe-2", "score": 0.91, "value_map": {"brand": "acme"}},
        {"im_name": "shoe-3", "score": 0.85}
    ],
    "reqid": "r1"
}"#;

fn config(endpoint: &str, tracking: &str) -> ClientConfig {
    ClientConfig {
        endpoint: endpoint.to_string(),
        tracking_endpoint: tracking.to_string(),
        ..ClientConfig::default()
    }
}

fn visearch(endpoint: &str, tracking: &str) -> ViSearch {
    ViSearch::new(Credentials::new("K", "S"), config(endpoint, tracking)).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_tracks_request_id() {
    let api = MockServer::start().await;
    let track = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("im_name", "shoe-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_BODY))
        .expect(1)
        .mount(&api)
        .await;
    Mock::given(method("GET"))
        .and(path("/__aq.gif"))
        .and(query_param("action", "search"))
        .and(query_param("reqid", "r1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&track)
        .await;

    let (api_uri, track_uri) = (api.uri(), track.uri());
    let result = tokio::task::spawn_blocking(move || {
        visearch(&api_uri, &track_uri).search(&SearchParams::new("shoe-1"))
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(result.total, Some(2));
    assert_eq!(result.result[0].im_name, "shoe-2");
    assert_eq!(
        result.result[0].metadata.get("brand"),
        Some(&serde_json::json!("acme"))
    );
    assert_eq!(track.received_requests().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_tracking_does_not_fail_search() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_BODY))
        .mount(&api)
        .await;

    let api_uri = api.uri();
    let result = tokio::task::spawn_blocking(move || {
        visearch(&api_uri, "http://127.0.0.1:9").search(&SearchParams::new("shoe-1"))
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(result.result.len(), 2);
    assert_eq!(result.req_id.as_deref(), Some("r1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_service_failure_is_error_and_not_tracked() {
    let api = MockServer::start().await;
    let track = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"status":"fail","method":"search","error":["Image not found with im_name."]}"#,
        ))
        .mount(&api)
        .await;

    let (api_uri, track_uri) = (api.uri(), track.uri());
    let err = tokio::task::spawn_blocking(move || {
        visearch(&api_uri, &track_uri).search(&SearchParams::new("missing"))
    })
    .await
    .unwrap()
    .unwrap_err();

    assert!(err.to_string().contains("Image not found"));
    assert!(track.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upload_search_with_file() {
    let api = MockServer::start().await;
    let track = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uploadsearch"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_BODY))
        .expect(1)
        .mount(&api)
        .await;
    Mock::given(method("GET"))
        .and(path("/__aq.gif"))
        .and(query_param("action", "uploadsearch"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&track)
        .await;

    let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
    file.write_all(b"jpeg-bytes").unwrap();
    let image_path = file.path().to_path_buf();

    let (api_uri, track_uri) = (api.uri(), track.uri());
    tokio::task::spawn_blocking(move || {
        let mut params = UploadSearchParams::from_file(image_path);
        params.bounding_box = Some(BoundingBox::new(0, 0, 50, 50));
        visearch(&api_uri, &track_uri).upload_search(&params)
    })
    .await
    .unwrap()
    .unwrap();

    let requests = api.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert_eq!(body.matches("name=\"image\"").count(), 1);
    assert!(body.contains("0,0,50,50"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_insert_and_status() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/insert"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"status":"OK","method":"insert","trans_id":123,"total":1}"#),
        )
        .mount(&api)
        .await;
    Mock::given(method("GET"))
        .and(path("/insert/status/123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"status":"OK","result":[{"trans_id":123,"processed_percent":100,"total":1,"success_count":1,"fail_count":0,"start_time":"2015-05-19T03:39:19.000+0000"}]}"#,
        ))
        .mount(&api)
        .await;

    let api_uri = api.uri();
    let (trans, status) = tokio::task::spawn_blocking(move || {
        let client = visearch(&api_uri, "http://127.0.0.1:9");
        let trans = client.insert(&[Image::new("shoe-1", "http://img.test/shoe-1.jpg")])?;
        let status = client.insert_status(trans.trans_id.as_deref().unwrap_or_default())?;
        Ok::<_, ViSearchError>((trans, status))
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(trans.trans_id.as_deref(), Some("123"));
    assert!(status.is_complete());
    assert!(status.start_time.is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_non_json_body_is_mapping_error() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/colorsearch"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&api)
        .await;

    let api_uri = api.uri();
    let err = tokio::task::spawn_blocking(move || {
        visearch(&api_uri, "http://127.0.0.1:9").color_search(&ColorSearchParams::new("ff0000"))
    })
    .await
    .unwrap()
    .unwrap_err();

    assert!(matches!(err, ViSearchError::Mapping(_)));
}
