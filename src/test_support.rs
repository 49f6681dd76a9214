//! Fakes shared by unit tests: local stand-ins for the OAuth and FCM
//! endpoints plus in-memory `Directory` / `Notifier` implementations.

use crate::config::Config;
use crate::db::Directory;
use crate::error::DispatchError;
use crate::models::{Parent, PushNotification, Student};
use crate::services::google_auth::MESSAGING_SCOPE;
use crate::services::notification::Notifier;
use crate::state::AppState;
use async_trait::async_trait;
use axum::extract::{Form, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use base64::Engine;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_CLIENT_EMAIL: &str = "notifier@asistencia-inicial.iam.gserviceaccount.com";
const TEST_PRIVATE_KEY: &str = include_str!("services/testdata/service_account_key.pem");
const TEST_PUBLIC_KEY: &str = include_str!("services/testdata/service_account_pub.pem");

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_fake(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn service_account_blob(token_uri: &str) -> String {
    let doc = json!({
        "type": "service_account",
        "project_id": "asistencia-inicial",
        "private_key_id": "test-key-1",
        "private_key": TEST_PRIVATE_KEY,
        "client_email": TEST_CLIENT_EMAIL,
        "token_uri": token_uri,
    });
    base64::engine::general_purpose::STANDARD.encode(doc.to_string())
}

/// `POST /token` verifies the signed assertion and issues `ya29.test-token`;
/// `POST /token-denied` always answers `invalid_grant`.
pub fn fake_token_endpoint() -> (Router, Arc<AtomicUsize>) {
    async fn token(
        State(hits): State<Arc<AtomicUsize>>,
        Form(form): Form<HashMap<String, String>>,
    ) -> (StatusCode, Json<Value>) {
        hits.fetch_add(1, Ordering::SeqCst);

        let valid = form.get("grant_type").map(String::as_str)
            == Some("urn:ietf:params:oauth:grant-type:jwt-bearer")
            && form
                .get("assertion")
                .is_some_and(|assertion| assertion_is_valid(assertion));

        if !valid {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_grant" })));
        }
        (
            StatusCode::OK,
            Json(json!({
                "access_token": "ya29.test-token",
                "expires_in": 3599,
                "token_type": "Bearer"
            })),
        )
    }

    async fn denied() -> (StatusCode, Json<Value>) {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant", "error_description": "Invalid JWT Signature." })),
        )
    }

    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/token", post(token))
        .route("/token-denied", post(denied))
        .with_state(hits.clone());
    (router, hits)
}

fn assertion_is_valid(assertion: &str) -> bool {
    let Ok(key) = jsonwebtoken::DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY.as_bytes()) else {
        return false;
    };
    let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::RS256);
    validation.validate_aud = false;

    match jsonwebtoken::decode::<Value>(assertion, &key, &validation) {
        Ok(data) => {
            data.header.kid.as_deref() == Some("test-key-1")
                && data.claims["iss"] == TEST_CLIENT_EMAIL
                && data.claims["scope"] == MESSAGING_SCOPE
                && data.claims["aud"].as_str().is_some_and(|aud| aud.ends_with("/token"))
        }
        Err(_) => false,
    }
}

/// `(project, authorization header, body)` per accepted send.
pub type FcmInbox = Arc<Mutex<Vec<(String, String, Value)>>>;

/// FCM v1 stand-in. The token `unregistered-token` is rejected the way FCM
/// rejects stale registrations.
pub fn fake_fcm() -> (Router, FcmInbox) {
    async fn send(
        State(inbox): State<FcmInbox>,
        Path(project): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if body["message"]["token"] == "unregistered-token" {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": {
                        "code": 404,
                        "message": "Requested entity was not found.",
                        "status": "NOT_FOUND",
                        "details": [{
                            "@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError",
                            "errorCode": "UNREGISTERED"
                        }]
                    }
                })),
            );
        }

        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let mut received = inbox.lock().unwrap();
        received.push((project.clone(), authorization, body));
        let name = format!("projects/{}/messages/{}", project, received.len());
        (StatusCode::OK, Json(json!({ "name": name })))
    }

    let inbox: FcmInbox = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/v1/projects/{project}/messages:send", post(send))
        .with_state(inbox.clone());
    (router, inbox)
}

#[derive(Default)]
pub struct MockDirectory {
    students: HashMap<String, Student>,
    parents: HashMap<String, Parent>,
    broken: bool,
    pub student_lookups: AtomicUsize,
    pub parent_lookups: AtomicUsize,
}

impl MockDirectory {
    pub fn with_student(mut self, id: &str, full_name: Option<&str>, parent_id: Option<&str>) -> Self {
        self.students.insert(
            id.into(),
            Student {
                full_name: full_name.map(Into::into),
                parent_id: parent_id.map(Into::into),
            },
        );
        self
    }

    pub fn with_parent(mut self, id: &str, fcm_token: Option<&str>) -> Self {
        self.parents.insert(
            id.into(),
            Parent {
                fcm_token: fcm_token.map(Into::into),
            },
        );
        self
    }

    /// Every lookup fails as if the database were unreachable.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> usize {
        self.student_lookups.load(Ordering::SeqCst) + self.parent_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Directory for MockDirectory {
    async fn find_student(&self, student_id: &str) -> anyhow::Result<Option<Student>> {
        self.student_lookups.fetch_add(1, Ordering::SeqCst);
        if self.broken {
            anyhow::bail!("connection refused");
        }
        Ok(self.students.get(student_id).cloned())
    }

    async fn find_parent(&self, parent_id: &str) -> anyhow::Result<Option<Parent>> {
        self.parent_lookups.fetch_add(1, Ordering::SeqCst);
        if self.broken {
            anyhow::bail!("connection refused");
        }
        Ok(self.parents.get(parent_id).cloned())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<PushNotification>>,
    pub attempts: AtomicUsize,
    failure: Option<fn() -> DispatchError>,
}

impl RecordingNotifier {
    pub fn failing(failure: fn() -> DispatchError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<PushNotification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &PushNotification) -> Result<String, DispatchError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.failure {
            return Err(failure());
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(notification.clone());
        Ok(format!("projects/test/messages/{}", sent.len()))
    }
}

pub fn test_state(directory: Arc<MockDirectory>, notifier: Arc<RecordingNotifier>) -> AppState {
    let config = Config::from_lookup(|key| match key {
        "SUPABASE_URL" => Some("http://supabase.invalid".into()),
        "SUPABASE_SERVICE_ROLE_KEY" => Some("service-key".into()),
        _ => None,
    })
    .unwrap();
    AppState::new(config, directory, notifier)
}
