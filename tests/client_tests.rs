//! CheckrrClient against a mock backend: request shapes and error mapping.

mod support;

use serde_json::json;

use checkrr_dash::api::{ApiError, BaseUrl, CheckrrClient};
use support::{MockCheckrr, bad_file};

#[test]
fn current_stats_keeps_backend_order() {
    let mock = MockCheckrr::start();
    mock.state().current = json!({
        "running": false, "timeDiff": 0, "filesChecked": 10, "hashMatches": 8, "hashMismatches": 2
    });

    let stats = mock.client().current_stats().unwrap();
    let keys: Vec<&str> = stats.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["running", "timeDiff", "filesChecked", "hashMatches", "hashMismatches"]
    );
}

#[test]
fn null_collections_read_as_empty() {
    let mock = MockCheckrr::start();
    let client = mock.client();
    assert!(client.bad_files().unwrap().is_empty());
    assert!(client.historical_stats().unwrap().is_empty());
    assert!(client.schedule().unwrap().is_null());
}

#[test]
fn non_2xx_is_a_request_error_with_body() {
    let mock = MockCheckrr::start();
    mock.fail("/api/files/bad", 503, "database locked");

    let err = mock.client().bad_files().unwrap_err();
    assert!(err.is_request_failure());
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "HTTP error! status: 503, database locked");
}

#[test]
fn malformed_json_is_a_decode_error() {
    let mock = MockCheckrr::start();
    mock.fail("/api/stats/historical", 200, "{not json");

    let err = mock.client().historical_stats().unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
    assert!(!err.is_request_failure());
}

#[test]
fn unreachable_backend_is_a_transport_error() {
    // Port 9 (discard) is almost never listening locally.
    let client = CheckrrClient::new(BaseUrl::parse("http://127.0.0.1:9/").unwrap());
    let err = client.current_stats().unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }));
    assert!(err.is_request_failure());
    assert_eq!(err.status(), None);
}

#[test]
fn trigger_run_posts_empty_json_object() {
    let mock = MockCheckrr::start();
    mock.client().trigger_run().unwrap();

    let requests = mock.requests();
    let run = requests.iter().find(|r| r.path == "/api/run").unwrap();
    assert_eq!(run.method, "POST");
    assert_eq!(run.body, "{}");
    assert!(
        run.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"))
    );
}

#[test]
fn delete_posts_id_array() {
    let mock = MockCheckrr::start();
    mock.state().bad_files = json!([
        bad_file("/a.mkv", ".mkv", "sonarr"),
        bad_file("/b.mkv", ".mkv", "radarr"),
    ]);

    mock.client().delete_bad_files(&[2]).unwrap();

    let requests = mock.requests();
    let delete = requests
        .iter()
        .find(|r| r.method == "POST" && r.path == "/api/files/bad")
        .unwrap();
    assert_eq!(delete.body, "[2]");
    let remaining = mock.client().bad_files().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].path, "/a.mkv");
}

#[test]
fn base_url_prefix_is_kept() {
    let mock = MockCheckrr::start();
    let client = CheckrrClient::new(BaseUrl::parse(&format!("{}checkrr", mock.url)).unwrap());

    // The mock only serves /api/..., so a prefixed path 404s.
    let err = client.bad_files().unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(mock.requests()[0].path, "/checkrr/api/files/bad");
}
