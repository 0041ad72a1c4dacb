//! Integration tests for the document endpoints.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use docshare_database::store::DocumentCatalog;
use helpers::{Part, TestApp};

#[tokio::test]
async fn test_upload_creates_document_and_first_version() {
    let app = TestApp::new().await;
    let student = app.student.id.to_string();
    let notes = app.notes.id.to_string();
    let course = app.course.id.to_string();

    let response = app
        .multipart(
            "POST",
            "/api/v1/documents",
            &[
                Part::Text("title", "Lecture 1"),
                Part::Text("description", "Intro slides"),
                Part::Text("userId", &student),
                Part::Text("categoryIds", &notes),
                Part::Text("courseId", &course),
                Part::File {
                    name: "file",
                    file_name: "lecture1.pptx",
                    data: b"slides",
                },
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["message"], "Document uploaded successfully");

    let document = &response.data()["document"];
    assert_eq!(document["title"], "Lecture 1");
    assert_eq!(document["file_type"], "POWERPOINT");
    assert_eq!(document["file_size"], 6);
    assert_eq!(document["is_approved"], false);
    assert!(document["approved_by"].is_null());
    assert_eq!(document["course_id"], course.as_str());
    assert_eq!(document["category_ids"], json!([notes]));

    let version = &response.data()["version"];
    assert_eq!(version["version_number"], 1);
    assert_eq!(version["change_description"], "Initial upload");
    assert_eq!(version["file_url"], document["file_url"]);
    assert_eq!(app.blobs.len(), 1);
}

#[tokio::test]
async fn test_upload_requires_file() {
    let app = TestApp::new().await;
    let student = app.student.id.to_string();

    let response = app
        .multipart(
            "POST",
            "/api/v1/documents",
            &[
                Part::Text("title", "No file"),
                Part::Text("user_id", &student),
            ],
        )
        .await;

    response.assert_error(StatusCode::BAD_REQUEST);
    assert!(app.blobs.is_empty());
}

#[tokio::test]
async fn test_upload_requires_user() {
    let app = TestApp::new().await;

    let response = app
        .multipart(
            "POST",
            "/api/v1/documents",
            &[
                Part::Text("title", "Anonymous"),
                Part::File {
                    name: "file",
                    file_name: "a.pdf",
                    data: b"x",
                },
            ],
        )
        .await;

    response.assert_error(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_with_unknown_category_is_not_found() {
    let app = TestApp::new().await;
    let student = app.student.id.to_string();
    let unknown = app.course.id.to_string();

    let response = app
        .multipart(
            "POST",
            "/api/v1/documents",
            &[
                Part::Text("title", "Bad category"),
                Part::Text("user_id", &student),
                Part::Text("category_ids", &unknown),
                Part::File {
                    name: "file",
                    file_name: "a.pdf",
                    data: b"x",
                },
            ],
        )
        .await;

    response.assert_error(StatusCode::NOT_FOUND);
    let all = app.request("GET", "/api/v1/documents", None).await;
    assert_eq!(all.data(), &json!([]));
}

#[tokio::test]
async fn test_upload_rejects_blank_title() {
    let app = TestApp::new().await;
    let student = app.student.id.to_string();

    let response = app
        .multipart(
            "POST",
            "/api/v1/documents",
            &[
                Part::Text("title", "   "),
                Part::Text("user_id", &student),
                Part::File {
                    name: "file",
                    file_name: "a.pdf",
                    data: b"x",
                },
            ],
        )
        .await;

    response.assert_error(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_document_lifecycle() {
    let app = TestApp::new().await;
    let id = app.upload("Algorithms").await;
    let admin = app.admin.id;

    // approve
    let approved = app
        .request(
            "PUT",
            &format!("/api/v1/documents/{id}/approve?approver_id={admin}"),
            None,
        )
        .await;
    assert_eq!(approved.status, StatusCode::OK, "{}", approved.body);
    assert_eq!(approved.data()["is_approved"], true);
    assert_eq!(approved.data()["approved_by"], admin.to_string());

    let listed = app.request("GET", "/api/v1/documents/approved", None).await;
    assert_eq!(listed.data().as_array().map(Vec::len), Some(1));

    // content update resets approval and appends version 2
    let updated = app.replace_file(&id, "algorithms.docx", b"v2 bytes").await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.body);
    assert_eq!(updated.body["message"], "Document file updated successfully");
    let document = &updated.data()["document"];
    assert_eq!(document["is_approved"], false);
    assert!(document["approved_by"].is_null());
    assert_eq!(document["file_type"], "WORD");
    assert_eq!(updated.data()["version"]["version_number"], 2);
    assert_eq!(
        updated.data()["version"]["change_description"],
        "Document file updated"
    );

    let pending = app.request("GET", "/api/v1/documents/pending", None).await;
    assert_eq!(pending.data().as_array().map(Vec::len), Some(1));

    // history is newest first
    let history = app
        .request("GET", &format!("/api/v1/documents/{id}/history"), None)
        .await;
    assert_eq!(history.status, StatusCode::OK);
    assert_eq!(history.data()["version_count"], 2);
    assert_eq!(history.data()["versions"][0]["version_number"], 2);
    assert_eq!(history.data()["versions"][1]["version_number"], 1);

    // full delete removes versions and blobs
    let deleted = app
        .request(
            "DELETE",
            &format!("/api/v1/documents/{id}?delete_all_versions=true"),
            None,
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK, "{}", deleted.body);
    assert_eq!(deleted.data()["versions_removed"], 2);
    assert_eq!(deleted.data()["blobs_deleted"], 2);
    assert_eq!(deleted.data()["blobs_failed"], 0);
    assert!(app.blobs.is_empty());

    app.request("GET", &format!("/api/v1/documents/{id}"), None)
        .await
        .assert_error(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_multipart_metadata_update() {
    let app = TestApp::new().await;
    let id = app.upload("Draft").await;
    let course = app.course.id.to_string();
    let exams = app.exams.id.to_string();
    let student = app.student.id.to_string();

    let set = app
        .multipart(
            "PUT",
            &format!("/api/v1/documents/{id}"),
            &[
                Part::Text("title", "Final"),
                Part::Text("course_id", &course),
                Part::Text("category_ids[]", &exams),
                Part::Text("user_id", &student),
            ],
        )
        .await;
    assert_eq!(set.status, StatusCode::OK, "{}", set.body);
    assert_eq!(set.body["message"], "Document metadata updated successfully");
    assert_eq!(set.data()["document"]["title"], "Final");
    assert_eq!(set.data()["document"]["course_id"], course.as_str());
    assert_eq!(set.data()["document"]["category_ids"], json!([exams]));
    assert_eq!(set.data()["version"]["version_number"], 2);
    assert_eq!(set.data()["version"]["edited_by"], student.as_str());

    // an empty course part clears the course and leaves other fields alone
    let cleared = app
        .multipart(
            "PUT",
            &format!("/api/v1/documents/{id}"),
            &[Part::Text("course_id", "")],
        )
        .await;
    assert_eq!(cleared.status, StatusCode::OK, "{}", cleared.body);
    assert!(cleared.data()["document"]["course_id"].is_null());
    assert_eq!(cleared.data()["document"]["title"], "Final");
    assert_eq!(cleared.data()["document"]["category_ids"], json!([exams]));
}

#[tokio::test]
async fn test_json_metadata_patch() {
    let app = TestApp::new().await;
    let id = app.upload("Draft").await;
    let course = app.course.id.to_string();

    let set = app
        .request(
            "PATCH",
            &format!("/api/v1/documents/{id}"),
            Some(json!({ "courseId": course, "description": "Week 1" })),
        )
        .await;
    assert_eq!(set.status, StatusCode::OK, "{}", set.body);
    assert_eq!(set.data()["document"]["course_id"], course.as_str());
    assert_eq!(set.data()["document"]["description"], "Week 1");

    let cleared = app
        .request(
            "PATCH",
            &format!("/api/v1/documents/{id}"),
            Some(json!({ "course_id": null })),
        )
        .await;
    assert_eq!(cleared.status, StatusCode::OK, "{}", cleared.body);
    assert!(cleared.data()["document"]["course_id"].is_null());
    assert_eq!(cleared.data()["document"]["description"], "Week 1");

    // audit versions point at the unchanged blob
    let versions = app
        .request(
            "GET",
            &format!("/api/v1/document-versions/document/{id}"),
            None,
        )
        .await;
    let versions = versions.data().as_array().cloned().unwrap_or_default();
    assert_eq!(versions.len(), 3);
    assert_eq!(versions[0]["file_url"], versions[2]["file_url"]);
    assert_eq!(app.blobs.len(), 1);
}

#[tokio::test]
async fn test_json_patch_rejects_long_title() {
    let app = TestApp::new().await;
    let id = app.upload("Draft").await;

    app.request(
        "PATCH",
        &format!("/api/v1/documents/{id}"),
        Some(json!({ "title": "x".repeat(256) })),
    )
    .await
    .assert_error(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_and_unknown_ids() {
    let app = TestApp::new().await;

    app.request("GET", "/api/v1/documents/not-a-uuid", None)
        .await
        .assert_error(StatusCode::BAD_REQUEST);

    let unknown = app.notes.id;
    app.request("GET", &format!("/api/v1/documents/{unknown}"), None)
        .await
        .assert_error(StatusCode::NOT_FOUND);

    app.request(
        "PUT",
        &format!("/api/v1/documents/{unknown}/reject"),
        None,
    )
    .await
    .assert_error(StatusCode::NOT_FOUND);

    app.request(
        "DELETE",
        &format!("/api/v1/documents/{unknown}"),
        None,
    )
    .await
    .assert_error(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_content_update_on_unknown_document_stores_nothing() {
    let app = TestApp::new().await;
    let unknown = app.exams.id.to_string();

    app.replace_file(&unknown, "x.pdf", b"bytes")
        .await
        .assert_error(StatusCode::NOT_FOUND);
    assert!(app.blobs.is_empty());
}

#[tokio::test]
async fn test_paginated_listing() {
    let app = TestApp::new().await;
    for title in ["Charlie", "Alpha", "Bravo"] {
        app.upload(title).await;
    }

    let page = app
        .request(
            "GET",
            "/api/v1/documents/paginated?page=1&size=2&sort_by=title&direction=asc",
            None,
        )
        .await;
    assert_eq!(page.status, StatusCode::OK, "{}", page.body);
    let data = page.data();
    assert_eq!(data["total_items"], 3);
    assert_eq!(data["total_pages"], 2);
    assert_eq!(data["has_next"], true);
    assert_eq!(data["items"][0]["title"], "Alpha");
    assert_eq!(data["items"][1]["title"], "Bravo");

    let second = app
        .request(
            "GET",
            "/api/v1/documents/paginated?page=2&pageSize=2&sortBy=title&direction=asc",
            None,
        )
        .await;
    assert_eq!(second.data()["items"][0]["title"], "Charlie");
    assert_eq!(second.data()["has_previous"], true);

    app.request("GET", "/api/v1/documents/paginated?sort_by=owner", None)
        .await
        .assert_error(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_paginated_listing_with_huge_page_number() {
    let app = TestApp::new().await;
    app.upload("Compilers").await;

    let page = app
        .request(
            "GET",
            "/api/v1/documents/paginated?page=18446744073709551615&size=100",
            None,
        )
        .await;
    assert_eq!(page.status, StatusCode::OK, "{}", page.body);
    let data = page.data();
    assert_eq!(data["items"], json!([]));
    assert_eq!(data["total_items"], 1);
    assert_eq!(data["has_next"], false);
    assert_eq!(data["has_previous"], true);
}

#[tokio::test]
async fn test_filtered_listings() {
    let app = TestApp::new().await;
    let first = app.upload("Graph theory notes").await;
    app.upload("Calculus").await;

    let student = app.student.id;
    let by_user = app
        .request("GET", &format!("/api/v1/documents/user/{student}"), None)
        .await;
    assert_eq!(by_user.data().as_array().map(Vec::len), Some(2));

    let unknown_user = app.notes.id;
    app.request(
        "GET",
        &format!("/api/v1/documents/user/{unknown_user}"),
        None,
    )
    .await
    .assert_error(StatusCode::NOT_FOUND);

    let notes = app.notes.id;
    let by_category = app
        .request("GET", &format!("/api/v1/documents/category/{notes}"), None)
        .await;
    assert_eq!(by_category.data().as_array().map(Vec::len), Some(2));

    let course = app.course.id;
    let by_course = app
        .request("GET", &format!("/api/v1/documents/course/{course}"), None)
        .await;
    assert_eq!(by_course.data(), &json!([]));

    let found = app
        .request("GET", "/api/v1/documents/search?keyword=Graph", None)
        .await;
    let found = found.data().as_array().cloned().unwrap_or_default();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], first.as_str());

    let recent = app
        .request("GET", "/api/v1/documents/recent?limit=1", None)
        .await;
    assert_eq!(recent.data().as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_partial_delete_keeps_versions() {
    let app = TestApp::new().await;
    let id = app.upload("Keep history").await;
    app.replace_file(&id, "second.pdf", b"second").await;

    let deleted = app
        .request("DELETE", &format!("/api/v1/documents/{id}"), None)
        .await;
    assert_eq!(deleted.status, StatusCode::OK, "{}", deleted.body);
    assert_eq!(deleted.data()["versions_removed"], 0);
    assert_eq!(deleted.data()["blobs_deleted"], 1);
    assert_eq!(app.blobs.len(), 1);

    let count = app
        .request(
            "GET",
            &format!("/api/v1/document-versions/document/{id}/count"),
            None,
        )
        .await;
    assert_eq!(count.data()["count"], 2);
}

#[tokio::test]
async fn test_download_url_follows_current_content() {
    let app = TestApp::new().await;
    let id = app.upload("Download").await;

    let before = app
        .request("GET", &format!("/api/v1/documents/{id}/download-url"), None)
        .await;
    assert_eq!(before.status, StatusCode::OK);
    let first_url = before.data()["url"].clone();
    assert!(first_url.as_str().is_some_and(|u| u.starts_with("memory://")));

    app.replace_file(&id, "next.pdf", b"next").await;
    let after = app
        .request("GET", &format!("/api/v1/documents/{id}/download-url"), None)
        .await;
    assert_ne!(after.data()["url"], first_url);

    let document_id = id.parse().expect("document id");
    let stored = app.store.get(document_id).await.expect("stored document");
    assert_eq!(after.data()["url"], stored.file_ref.as_str());
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/v1/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["database"]["provider"], "memory");
    assert_eq!(response.data()["blob_store"]["provider"], "memory");
}
