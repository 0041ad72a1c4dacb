//! Integration tests for version history and rollback.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_version_queries_after_updates() {
    let app = TestApp::new().await;
    let id = app.upload("Operating systems").await;
    app.replace_file(&id, "os-v2.pdf", b"second").await;
    app.replace_file(&id, "os-v3.docx", b"third!").await;

    let versions = app
        .request(
            "GET",
            &format!("/api/v1/document-versions/document/{id}"),
            None,
        )
        .await;
    assert_eq!(versions.status, StatusCode::OK);
    let numbers: Vec<_> = versions
        .data()
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .map(|v| v["version_number"].clone())
        .collect();
    assert_eq!(numbers, vec![json!(3), json!(2), json!(1)]);

    let latest = app
        .request(
            "GET",
            &format!("/api/v1/document-versions/document/{id}/latest"),
            None,
        )
        .await;
    assert_eq!(latest.data()["version_number"], 3);
    assert_eq!(latest.data()["file_size"], 6);

    let count = app
        .request(
            "GET",
            &format!("/api/v1/document-versions/document/{id}/count"),
            None,
        )
        .await;
    assert_eq!(count.data()["count"], 3);
    assert_eq!(count.data()["document_id"], id.as_str());

    let version_id = latest.data()["id"].as_str().unwrap_or_default().to_string();
    let single = app
        .request(
            "GET",
            &format!("/api/v1/document-versions/{version_id}"),
            None,
        )
        .await;
    assert_eq!(single.status, StatusCode::OK);
    assert_eq!(single.data()["document_id"], id.as_str());
    assert_eq!(single.data()["version_number"], 3);
}

#[tokio::test]
async fn test_rollback_restores_earlier_content() {
    let app = TestApp::new().await;
    let id = app.upload("Databases").await;
    let first_url = app
        .request("GET", &format!("/api/v1/documents/{id}"), None)
        .await
        .data()["file_url"]
        .clone();

    app.replace_file(&id, "databases.docx", b"rewritten").await;
    let admin = app.admin.id;
    app.request(
        "PUT",
        &format!("/api/v1/documents/{id}/approve?approverId={admin}"),
        None,
    )
    .await;

    let rolled_back = app
        .request(
            "POST",
            &format!("/api/v1/documents/{id}/rollback"),
            Some(json!({ "version_number": 1, "user_id": app.admin.id })),
        )
        .await;
    assert_eq!(rolled_back.status, StatusCode::OK, "{}", rolled_back.body);
    assert_eq!(rolled_back.body["message"], "Document rolled back to version 1");

    let document = &rolled_back.data()["document"];
    assert_eq!(document["file_url"], first_url);
    assert_eq!(document["file_type"], "PDF");
    assert_eq!(document["file_size"], 9);
    assert_eq!(document["is_approved"], false);

    let version = &rolled_back.data()["version"];
    assert_eq!(version["version_number"], 3);
    assert_eq!(version["file_url"], first_url);
    assert_eq!(version["change_description"], "Rolled back to version 1");
    assert_eq!(version["edited_by"], app.admin.id.to_string());

    // rollback never deletes stored content
    assert_eq!(app.blobs.len(), 2);
}

#[tokio::test]
async fn test_rollback_validation() {
    let app = TestApp::new().await;
    let id = app.upload("Networks").await;
    let user = app.student.id;

    app.request(
        "POST",
        &format!("/api/v1/documents/{id}/rollback"),
        Some(json!({ "versionNumber": 0, "userId": user })),
    )
    .await
    .assert_error(StatusCode::BAD_REQUEST);

    app.request(
        "POST",
        &format!("/api/v1/documents/{id}/rollback"),
        Some(json!({ "version_number": 7, "user_id": user })),
    )
    .await
    .assert_error(StatusCode::NOT_FOUND);

    let unknown = app.notes.id;
    app.request(
        "POST",
        &format!("/api/v1/documents/{unknown}/rollback"),
        Some(json!({ "version_number": 1, "user_id": user })),
    )
    .await
    .assert_error(StatusCode::NOT_FOUND);

    let count = app
        .request(
            "GET",
            &format!("/api/v1/document-versions/document/{id}/count"),
            None,
        )
        .await;
    assert_eq!(count.data()["count"], 1);
}

#[tokio::test]
async fn test_unknown_versions() {
    let app = TestApp::new().await;
    let unknown = app.exams.id;

    app.request(
        "GET",
        &format!("/api/v1/document-versions/{unknown}"),
        None,
    )
    .await
    .assert_error(StatusCode::NOT_FOUND);

    app.request(
        "GET",
        &format!("/api/v1/document-versions/document/{unknown}/latest"),
        None,
    )
    .await
    .assert_error(StatusCode::NOT_FOUND);

    let list = app
        .request(
            "GET",
            &format!("/api/v1/document-versions/document/{unknown}"),
            None,
        )
        .await;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.data(), &json!([]));

    let count = app
        .request(
            "GET",
            &format!("/api/v1/document-versions/document/{unknown}/count"),
            None,
        )
        .await;
    assert_eq!(count.data()["count"], 0);

    app.request("GET", "/api/v1/document-versions/42", None)
        .await
        .assert_error(StatusCode::BAD_REQUEST);
}
