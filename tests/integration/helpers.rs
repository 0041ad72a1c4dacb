//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use docshare_core::config::AppConfig;
use docshare_database::MemoryDocumentStore;
use docshare_database::store::Directory;
use docshare_entity::directory::{Category, Course, UserRef};
use docshare_storage::providers::MemoryBlobStore;

const BOUNDARY: &str = "docshare-test-boundary";

/// Test application context backed by in-memory stores.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Document store, for direct assertions
    pub store: Arc<MemoryDocumentStore>,
    /// Blob store, for direct assertions
    pub blobs: Arc<MemoryBlobStore>,
    pub student: UserRef,
    pub admin: UserRef,
    pub notes: Category,
    pub exams: Category,
    pub course: Course,
}

/// One part of a multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        data: &'a [u8],
    },
}

impl TestApp {
    /// Create a new test application with a seeded directory.
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.provider = "memory".to_string();
        config.storage.provider = "memory".to_string();

        let store = Arc::new(MemoryDocumentStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());

        let student = store
            .ensure_user("student_one", Some("Student One"))
            .await
            .expect("seed user");
        let admin = store
            .ensure_user("admin_user", Some("Admin"))
            .await
            .expect("seed user");
        let notes = store
            .ensure_category("Lecture notes", None)
            .await
            .expect("seed category");
        let exams = store
            .ensure_category("Past exams", None)
            .await
            .expect("seed category");
        let course = store
            .ensure_course("CS101", "Intro to CS", None)
            .await
            .expect("seed course");

        let state = docshare_api::AppState::new(config, store.clone(), blobs.clone());
        let router = docshare_api::build_app(state);

        Self {
            router,
            store,
            blobs,
            student,
            admin,
            notes,
            exams,
            course,
        }
    }

    /// Send a request with an optional JSON body.
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        let body = match body {
            Some(json) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).expect("Failed to serialize body"))
            }
            None => Body::empty(),
        };
        self.send(req.body(body).expect("Failed to build request"))
            .await
    }

    /// Send a multipart/form-data request.
    pub async fn multipart(&self, method: &str, path: &str, parts: &[Part<'_>]) -> TestResponse {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    file_name,
                    data,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Upload a PDF as the student and return the document ID.
    pub async fn upload(&self, title: &str) -> String {
        let student = self.student.id.to_string();
        let notes = self.notes.id.to_string();
        let response = self
            .multipart(
                "POST",
                "/api/v1/documents",
                &[
                    Part::Text("title", title),
                    Part::Text("user_id", &student),
                    Part::Text("category_ids", &notes),
                    Part::File {
                        name: "file",
                        file_name: "notes.pdf",
                        data: b"pdf bytes",
                    },
                ],
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.data()["document"]["id"]
            .as_str()
            .expect("document id")
            .to_string()
    }

    /// Replace a document's content as the student.
    pub async fn replace_file(&self, id: &str, file_name: &str, data: &[u8]) -> TestResponse {
        let student = self.student.id.to_string();
        self.multipart(
            "PUT",
            &format!("/api/v1/documents/{id}"),
            &[
                Part::Text("userId", &student),
                Part::File {
                    name: "file",
                    file_name,
                    data,
                },
            ],
        )
        .await
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of the envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// Assert a failure envelope with the given status.
    pub fn assert_error(&self, status: StatusCode) {
        assert_eq!(self.status, status, "{}", self.body);
        assert_eq!(self.body["success"], false);
        assert!(self.body["data"].is_null());
        assert!(self.body["message"].is_string());
    }
}
