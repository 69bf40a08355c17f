// ABOUTME: Tests for the HTTP control-plane client against a mock server.
// ABOUTME: Verifies wire format, auth header, and status-to-bool mapping.

use cutover::platform::{ControlPlane, PlatformClient, PlatformError, ScaleDirection};
use cutover::types::AppName;
use nonempty::NonEmpty;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app() -> AppName {
    AppName::new("xpto").unwrap()
}

fn cnames() -> NonEmpty<String> {
    NonEmpty::from_vec(vec!["cname1".to_string(), "cname2".to_string()]).unwrap()
}

#[tokio::test]
async fn get_cnames_returns_a_list_when_present() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apps/xpto"))
        .and(header("authorization", "bearer token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"cname": ["cname1", "cname2"]})),
        )
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    let result = client.get_cnames(&app()).await.unwrap();

    let cnames: Vec<String> = result.unwrap().into_iter().collect();
    assert_eq!(cnames, vec!["cname1", "cname2"]);
}

#[tokio::test]
async fn get_cnames_returns_none_when_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apps/xpto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cname": []})))
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    assert!(client.get_cnames(&app()).await.unwrap().is_none());
}

#[tokio::test]
async fn get_cnames_surfaces_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apps/xpto"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    let err = client.get_cnames(&app()).await.unwrap_err();
    assert!(matches!(err, PlatformError::Status { status: 500, .. }));
}

#[tokio::test]
async fn remove_cnames_returns_true_when_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/apps/xpto/cname"))
        .and(body_json(json!({"cname": ["cname1", "cname2"]})))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    assert!(client.remove_cnames(&app(), &cnames()).await.unwrap());
}

#[tokio::test]
async fn remove_cnames_returns_false_when_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/apps/xpto/cname"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    assert!(!client.remove_cnames(&app(), &cnames()).await.unwrap());
}

#[tokio::test]
async fn set_cnames_returns_true_when_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/apps/xpto/cname"))
        .and(body_json(json!({"cname": ["cname1", "cname2"]})))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    assert!(client.set_cnames(&app(), &cnames()).await.unwrap());
}

#[tokio::test]
async fn set_cnames_returns_false_when_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/apps/xpto/cname"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    assert!(!client.set_cnames(&app(), &cnames()).await.unwrap());
}

#[tokio::test]
async fn set_env_posts_the_variable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/apps/xpto/env"))
        .and(body_json(json!({"TAG": "tag_value"})))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    assert!(client.set_env(&app(), "TAG", "tag_value").await.unwrap());
}

#[tokio::test]
async fn set_env_returns_false_when_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/apps/xpto/env"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    assert!(!client.set_env(&app(), "TAG", "tag_value").await.unwrap());
}

#[tokio::test]
async fn get_env_returns_a_value_when_present() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apps/xpto/env"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "TAG", "public": true, "value": "1.0"}
        ])))
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    assert_eq!(
        client.get_env(&app(), "TAG").await.unwrap(),
        Some("1.0".to_string())
    );
}

#[tokio::test]
async fn get_env_returns_none_when_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apps/xpto/env"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    assert_eq!(client.get_env(&app(), "TAG").await.unwrap(), None);
}

#[tokio::test]
async fn get_env_returns_none_when_variable_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apps/xpto/env"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    assert_eq!(client.get_env(&app(), "TAG").await.unwrap(), None);
}

#[tokio::test]
async fn get_env_returns_none_when_value_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apps/xpto/env"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "TAG", "public": true, "value": null}
        ])))
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    assert_eq!(client.get_env(&app(), "TAG").await.unwrap(), None);
}

#[tokio::test]
async fn unit_topology_is_empty_without_units() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apps/xpto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"units": []})))
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    assert!(client.unit_topology(&app()).await.unwrap().is_empty());
}

#[tokio::test]
async fn unit_topology_groups_units_per_process_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apps/xpto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"units": [
            {"ProcessName": "web"},
            {"ProcessName": "resque"},
            {"ProcessName": "web"}
        ]})))
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    let topology = client.unit_topology(&app()).await.unwrap();

    assert_eq!(topology.get("web"), Some(&2));
    assert_eq!(topology.get("resque"), Some(&1));
    assert_eq!(topology.len(), 2);
}

#[tokio::test]
async fn scale_units_remove_targets_one_process() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/apps/xpto/units"))
        .and(query_param("units", "2"))
        .and(query_param("process", "web"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    let ok = client
        .scale_units(&app(), Some("web"), 2, ScaleDirection::Remove)
        .await
        .unwrap();
    assert!(ok);
}

#[tokio::test]
async fn scale_units_add_is_app_level() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/apps/xpto/units"))
        .and(query_param("units", "1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    let ok = client
        .scale_units(&app(), None, 1, ScaleDirection::Add)
        .await
        .unwrap();
    assert!(ok);
}

#[tokio::test]
async fn scale_units_reports_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/apps/xpto/units"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ControlPlane::new(&server.uri(), "token");
    let ok = client
        .scale_units(&app(), Some("web"), 2, ScaleDirection::Remove)
        .await
        .unwrap();
    assert!(!ok);
}
