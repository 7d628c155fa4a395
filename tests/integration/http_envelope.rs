//! The HTTP client against small stub backends.
//!
//! Each test binds its own axum router on an ephemeral port and checks how
//! [`HttpClient`] unwraps the `{code, data, message}` envelope, reports
//! errors through the [`Notifier`], and handles 401.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use parking_lot::Mutex;
use serde_json::{Value, json};

use dida::api::{HttpClient, HttpError};
use dida::message::Notifier;
use dida::token::TokenStore;

#[derive(Default)]
struct RecordingNotifier {
    errors: Mutex<Vec<String>>,
    redirects: Mutex<usize>,
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }

    fn redirect_to_sign_in(&self) {
        *self.redirects.lock() += 1;
    }
}

async fn serve(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str, token: TokenStore) -> (HttpClient, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let client = HttpClient::new(
        base_url,
        Duration::from_secs(5),
        token,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
    )
    .unwrap();
    (client, notifier)
}

#[tokio::test]
async fn code_zero_resolves_with_data() {
    let app = axum::Router::new().route(
        "/ping",
        get(|| async { Json(json!({"code": 0, "data": {"pong": true}, "message": ""})) }),
    );
    let base = serve(app).await;
    let (client, notifier) = client(&base, TokenStore::new());

    let data: Value = client.get("ping").await.unwrap();
    assert_eq!(data, json!({"pong": true}));
    assert!(notifier.errors.lock().is_empty());
}

#[tokio::test]
async fn non_zero_code_rejects_and_notifies() {
    let app = axum::Router::new().route(
        "/fail",
        get(|| async { Json(json!({"code": -1, "data": null, "message": "出错了"})) }),
    );
    let base = serve(app).await;
    let (client, notifier) = client(&base, TokenStore::new());

    let err = client.get::<Value>("/fail").await.unwrap_err();
    assert!(matches!(err, HttpError::Api { code: -1, ref message } if message == "出错了"));
    assert_eq!(*notifier.errors.lock(), vec!["出错了".to_string()]);
}

#[tokio::test]
async fn unauthorized_redirects_to_sign_in() {
    let app = axum::Router::new().route(
        "/secret",
        get(|| async { StatusCode::UNAUTHORIZED.into_response() }),
    );
    let base = serve(app).await;
    let (client, notifier) = client(&base, TokenStore::new());

    let err = client.get::<Value>("secret").await.unwrap_err();
    assert!(matches!(err, HttpError::Unauthorized));
    assert_eq!(*notifier.redirects.lock(), 1);
    assert!(notifier.errors.lock().is_empty());
}

#[tokio::test]
async fn bearer_token_is_attached() {
    let app = axum::Router::new().route(
        "/whoami",
        get(|headers: HeaderMap| async move {
            let auth = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            Json(json!({"code": 0, "data": auth, "message": ""}))
        }),
    );
    let base = serve(app).await;
    let token = TokenStore::new();
    let (client, _) = client(&base, token.clone());

    let anonymous: String = client.get("whoami").await.unwrap();
    assert_eq!(anonymous, "");

    token.set_token("abc");
    let authed: String = client.get("whoami").await.unwrap();
    assert_eq!(authed, "Bearer abc");
}

#[tokio::test]
async fn non_envelope_error_status_is_reported() {
    let app = axum::Router::new().route(
        "/boom",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response() }),
    );
    let base = serve(app).await;
    let (client, _) = client(&base, TokenStore::new());

    let err = client.get::<Value>("boom").await.unwrap_err();
    assert!(matches!(err, HttpError::Status(500)));
}

#[tokio::test]
async fn base_url_path_is_kept() {
    let app = axum::Router::new().route(
        "/api/ping",
        get(|| async { Json(json!({"code": 0, "data": 1, "message": ""})) }),
    );
    let base = serve(app).await;
    let (client, _) = client(&format!("{base}/api"), TokenStore::new());

    let data: i32 = client.get("ping").await.unwrap();
    assert_eq!(data, 1);
}

#[tokio::test]
async fn delete_and_query_requests_reach_the_backend() {
    let app = axum::Router::new().route(
        "/items/{id}",
        delete(|Path(id): Path<String>| async move {
            Json(json!({"code": 0, "data": id, "message": ""}))
        })
        .get(|Query(q): Query<HashMap<String, String>>| async move {
            Json(json!({"code": 0, "data": q.get("status").cloned(), "message": ""}))
        }),
    );
    let base = serve(app).await;
    let (client, _) = client(&base, TokenStore::new());

    let removed: String = client.delete("items/42").await.unwrap();
    assert_eq!(removed, "42");

    let status: Option<String> = client
        .get_with_query("items/1", &[("status", "completed")])
        .await
        .unwrap();
    assert_eq!(status.as_deref(), Some("completed"));
}
