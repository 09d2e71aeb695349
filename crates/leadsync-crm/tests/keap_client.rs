//! Integration tests for [`KeapClient`] against a fake Keap API.
//!
//! The fake is a small axum app bound to an ephemeral port. It records every
//! request it receives (method, path with query, authorization header, JSON
//! body) and answers the way the real contact endpoints do.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use leadsync_crm::model::EmailAddress;
use leadsync_crm::{
    ApiVersion, ContactDraft, ContactId, CrmBackend, CrmError, CustomField, KeapClient,
    KeapConfig,
};

const TOKEN: &str = "test-token";

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    authorization: Option<String>,
    body: Option<Value>,
}

type Journal = Arc<Mutex<Vec<Recorded>>>;

async fn fake_keap(
    State(journal): State<Journal>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_owned(), |pq| pq.as_str().to_owned());
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let parsed = serde_json::from_str::<Value>(&body).ok();

    journal.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        authorization: authorization.clone(),
        body: parsed,
    });

    let expected = format!("Bearer {TOKEN}");
    if authorization.as_deref() != Some(expected.as_str()) {
        return (StatusCode::UNAUTHORIZED, r#"{"message":"Invalid Access Token"}"#).into_response();
    }

    let rest = uri.path().trim_start_matches("/crm/rest/v2");
    if method == Method::GET && rest == "/contacts" {
        if uri.query().is_some_and(|q| q.contains("existing%40x.com")) {
            return axum::Json(json!({ "contacts": [{ "id": 101, "given_name": "Old" }] }))
                .into_response();
        }
        return axum::Json(json!({ "contacts": [] })).into_response();
    }
    if method == Method::POST && rest == "/contacts" {
        return axum::Json(json!({ "id": 202, "given_name": "Jane" })).into_response();
    }
    if method == Method::POST && rest.ends_with("/tags") {
        return StatusCode::NO_CONTENT.into_response();
    }
    if method == Method::PATCH && rest.starts_with("/contacts/") {
        return StatusCode::OK.into_response();
    }
    (StatusCode::NOT_FOUND, "no route").into_response()
}

async fn spawn_fake() -> (String, Journal) {
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .fallback(fake_keap)
        .with_state(Arc::clone(&journal));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), journal)
}

fn client(base_url: &str, token: &str) -> KeapClient {
    let mut cfg = KeapConfig::new(token);
    cfg.base_url = base_url.to_owned();
    cfg.api_version = ApiVersion::V2;
    KeapClient::new(cfg).unwrap()
}

fn jane() -> ContactDraft {
    ContactDraft {
        given_name: "Jane".to_owned(),
        family_name: "Doe".to_owned(),
        email_addresses: vec![EmailAddress::primary("jane@x.com")],
        custom_fields: vec![CustomField {
            id: 42,
            content: "Manager".to_owned(),
        }],
        ..ContactDraft::default()
    }
}

#[tokio::test]
async fn search_encodes_email_and_sends_bearer_token() {
    let (base, journal) = spawn_fake().await;
    let keap = client(&base, TOKEN);

    let found = keap.find_by_email("existing@x.com").await.unwrap();
    assert_eq!(found, Some(ContactId::new("101")));

    let calls = journal.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::GET);
    assert_eq!(calls[0].path, "/crm/rest/v2/contacts?email=existing%40x.com");
    assert_eq!(calls[0].authorization.as_deref(), Some("Bearer test-token"));
}

#[tokio::test]
async fn search_without_match_returns_none() {
    let (base, _journal) = spawn_fake().await;
    let keap = client(&base, TOKEN);
    assert_eq!(keap.find_by_email("nobody@x.com").await.unwrap(), None);
}

#[tokio::test]
async fn create_posts_draft_and_returns_numeric_id_as_string() {
    let (base, journal) = spawn_fake().await;
    let keap = client(&base, TOKEN);

    let id = keap.create_contact(&jane()).await.unwrap();
    assert_eq!(id.as_str(), "202");

    let calls = journal.lock().unwrap().clone();
    let body = calls[0].body.clone().unwrap();
    assert_eq!(calls[0].method, Method::POST);
    assert_eq!(calls[0].path, "/crm/rest/v2/contacts");
    assert_eq!(body["given_name"], "Jane");
    assert_eq!(body["family_name"], "Doe");
    assert_eq!(body["email_addresses"][0]["email"], "jane@x.com");
    assert_eq!(body["custom_fields"][0], json!({ "id": 42, "content": "Manager" }));
}

#[tokio::test]
async fn update_patches_contact_path_and_tolerates_empty_body() {
    let (base, journal) = spawn_fake().await;
    let keap = client(&base, TOKEN);

    keap.update_contact(&ContactId::new("101"), &jane())
        .await
        .unwrap();

    let calls = journal.lock().unwrap().clone();
    assert_eq!(calls[0].method, Method::PATCH);
    assert_eq!(calls[0].path, "/crm/rest/v2/contacts/101");
}

#[tokio::test]
async fn apply_tags_posts_tag_ids() {
    let (base, journal) = spawn_fake().await;
    let keap = client(&base, TOKEN);

    keap.apply_tags(&ContactId::new("202"), &[7]).await.unwrap();

    let calls = journal.lock().unwrap().clone();
    assert_eq!(calls[0].path, "/crm/rest/v2/contacts/202/tags");
    assert_eq!(calls[0].body, Some(json!({ "tagIds": [7] })));
}

#[tokio::test]
async fn apply_no_tags_makes_no_call() {
    let (base, journal) = spawn_fake().await;
    let keap = client(&base, TOKEN);

    keap.apply_tags(&ContactId::new("202"), &[]).await.unwrap();
    assert!(journal.lock().unwrap().is_empty());
}

#[tokio::test]
async fn non_success_status_surfaces_status_and_body() {
    let (base, _journal) = spawn_fake().await;
    let keap = client(&base, "wrong-token");

    let err = keap.find_by_email("jane@x.com").await.unwrap_err();
    match err {
        CrmError::Api { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid Access Token"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let keap = client("http://127.0.0.1:1", TOKEN);
    let err = keap.find_by_email("jane@x.com").await.unwrap_err();
    assert!(matches!(err, CrmError::Network(_)));
}
