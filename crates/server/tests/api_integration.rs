//! API integration tests against the in-process router.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{fixtures, TestConfig, TestFixture};
use depot_core::testing::ScriptedRun;

// ============================================================================
// Health and config
// ============================================================================

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/health").await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "status", json!("ok"));
}

#[tokio::test]
async fn test_config_hides_accounts() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/config").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["accounts"]["configured"], 1);
    assert_eq!(response.body["product"]["app_id"], "431960");

    let text = response.body.to_string();
    assert!(!text.contains("user1"));
    assert!(!text.contains("entries"));
}

// ============================================================================
// Environment
// ============================================================================

#[tokio::test]
async fn test_info() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/info").await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "success", json!(true));
    assert_json_path!(response.body, "depot_exists", json!(true));
    assert_eq!(
        response.body["download_dir"],
        json!(fixture.content_dir.to_string_lossy())
    );
}

#[tokio::test]
async fn test_info_not_installed() {
    let fixture = TestFixture::with_config(TestConfig::not_installed()).await;

    let response = fixture.get("/api/info").await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "success", json!(false));
    assert_json_path!(response.body, "download_dir", Value::Null);
}

// ============================================================================
// Downloads
// ============================================================================

#[tokio::test]
async fn test_download_and_list() {
    let fixture = TestFixture::new().await;
    fixture
        .catalog
        .add_item(fixtures::catalog_item("123", "Aurora"))
        .await;

    let response = fixture
        .post("/api/download", json!({"workshop_id": "123"}))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "success", json!(true));
    assert_json_path!(response.body, "message", json!("Download complete"));

    let response = fixture.get("/api/downloads").await;
    assert_status!(response, StatusCode::OK);
    let items = response.body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "123");
    assert_eq!(items[0]["title"], "Aurora");
    assert!(items[0]["pathShort"].as_str().unwrap().ends_with("123"));
}

#[tokio::test]
async fn test_download_accepts_id_alias() {
    let fixture = TestFixture::new().await;

    let response = fixture.post("/api/download", json!({"id": 77})).await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "success", json!(true));

    let invocations = fixture.tool.invocations().await;
    assert_eq!(invocations[0].item_id, "77");
}

#[tokio::test]
async fn test_download_missing_id() {
    let fixture = TestFixture::new().await;

    let response = fixture.post("/api/download", json!({})).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_json_path!(response.body, "success", json!(false));
    assert_json_path!(response.body, "message", json!("Missing workshop_id"));

    let response = fixture.post_raw("/api/download", "{oops").await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_download_without_tool() {
    let fixture = TestFixture::with_config(TestConfig::without_tool()).await;

    let response = fixture
        .post("/api/download", json!({"workshop_id": "999"}))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "success", json!(false));
    assert_json_path!(
        response.body,
        "message",
        json!("DepotDownloaderMod.exe not found")
    );
    assert!(!fixture.content_dir.join("999").exists());
}

#[tokio::test]
async fn test_download_all_accounts_fail() {
    let fixture = TestFixture::with_config(TestConfig {
        accounts: 2,
        ..Default::default()
    })
    .await;
    fixture.tool.push(ScriptedRun::Timeout).await;
    fixture
        .tool
        .push(ScriptedRun::exit(1, "", "Login failure"))
        .await;

    let response = fixture
        .post("/api/download", json!({"workshop_id": "5"}))
        .await;
    assert_json_path!(response.body, "success", json!(false));
    assert_json_path!(response.body, "message", json!("Login failure"));
    assert_eq!(fixture.tool.invocations().await.len(), 2);
}

#[tokio::test]
async fn test_delete_download() {
    let fixture = TestFixture::new().await;
    let dir = fixture.add_local_item("111", Some(json!({"id": "111", "title": "Rain"})));

    let response = fixture.delete("/api/download/111").await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "success", json!(true));
    assert!(!dir.exists());

    let response = fixture.delete("/api/download/111").await;
    assert_json_path!(response.body, "success", json!(false));
}

#[tokio::test]
async fn test_delete_refuses_encoded_traversal() {
    let fixture = TestFixture::new().await;
    fixture.add_local_item("111", None);
    let outside = fixture.install_dir.join("keep");
    std::fs::create_dir_all(&outside).unwrap();

    let response = fixture.delete("/api/download/..%2F..%2Fkeep").await;
    assert_json_path!(response.body, "success", json!(false));
    assert!(outside.exists());
}

#[tokio::test]
async fn test_open_folder() {
    let fixture = TestFixture::new().await;
    fixture.add_local_item("111", None);

    let response = fixture
        .post("/api/open-folder", json!({"workshop_id": "111"}))
        .await;
    assert_json_path!(response.body, "success", json!(true));
    assert_eq!(fixture.opener.opened().len(), 1);

    let response = fixture
        .post("/api/open-folder", json!({"workshop_id": "404"}))
        .await;
    assert_json_path!(response.body, "message", json!("Folder not found"));

    let response = fixture.post("/api/open-folder", json!({})).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Remote catalog
// ============================================================================

#[tokio::test]
async fn test_search() {
    let fixture = TestFixture::new().await;
    fixture
        .catalog
        .set_search_results(vec![fixtures::catalog_item("1", "Sea")])
        .await;

    let response = fixture
        .get("/api/search?searchtext=sea%20waves&page=2&sortmethod=mostrecent&timeperiod=7")
        .await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "success", json!(true));
    assert_eq!(response.body["items"][0]["title"], "Sea");
    assert_eq!(response.body["items"][0]["img"], "https://images.test/1.jpg");

    let queries = fixture.catalog.recorded_queries().await;
    assert_eq!(queries[0].text, "sea waves");
    assert_eq!(queries[0].page, 2);
    assert_eq!(queries[0].time_period_days, 7);
}

#[tokio::test]
async fn test_search_failure_is_soft() {
    let fixture = TestFixture::new().await;
    fixture.catalog.set_fail(true).await;

    let response = fixture.get("/api/search").await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "success", json!(false));
    assert_eq!(response.body["items"], json!([]));
}

#[tokio::test]
async fn test_get_item() {
    let fixture = TestFixture::new().await;
    fixture
        .catalog
        .add_item(fixtures::catalog_item("42", "Dunes"))
        .await;

    let response = fixture.get("/api/item/42").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["item"]["title"], "Dunes");
    assert_eq!(response.body["item"]["rating"], "★★★★");
}

// ============================================================================
// Static UI
// ============================================================================

#[tokio::test]
async fn test_static_fallback() {
    let ui = tempfile::tempdir().unwrap();
    std::fs::write(ui.path().join("index.html"), "<html>ui</html>").unwrap();

    let fixture = TestFixture::with_config(TestConfig {
        static_dir: Some(ui.path().to_path_buf()),
        ..Default::default()
    })
    .await;

    let response = fixture.get("/some/client/route").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body, json!("<html>ui</html>"));
}

#[tokio::test]
async fn test_unknown_path_without_ui() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/nothing-here").await;
    assert_status!(response, StatusCode::NOT_FOUND);
}
