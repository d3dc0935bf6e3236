//! End-to-end API tests against the router, no socket involved.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chatmate_config::{Config, RunMode};
use chatmate_core::{CredentialState, Personality};
use chatmate_gemini::{fallback_reply, ReplyEngine, ReplyError, ReplyProvider, ReplyRequest};
use chatmate_web::{create_router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const KEY: &str = "AIzaSyA1234567890abcdefghijklmnopqrstu";

/// Answers with the number of messages it was shown.
struct Counting;

#[async_trait]
impl ReplyProvider for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    async fn generate(&self, request: &ReplyRequest) -> chatmate_gemini::Result<String> {
        Ok(format!("{} says: seen {}", request.contact_name, request.history.len()))
    }
}

struct Broken;

#[async_trait]
impl ReplyProvider for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    async fn generate(&self, _request: &ReplyRequest) -> chatmate_gemini::Result<String> {
        Err(ReplyError::Provider {
            status: 503,
            message: "overloaded".into(),
        })
    }
}

async fn app_with(config: Config, engine: ReplyEngine) -> Router {
    let state = AppState::with_engine(config, engine).await.unwrap();
    create_router(Arc::new(state))
}

/// App with no key: every reply is the canned one for its personality.
async fn fallback_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default().with_data_dir(dir.path().join("data"));
    let app = app_with(config, ReplyEngine::fallback_only(CredentialState::missing())).await;
    (app, dir)
}

async fn provider_app(provider: Arc<dyn ReplyProvider>) -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default().with_data_dir(dir.path().join("data"));
    let credential = CredentialState::from_key(Some(KEY.to_string()));
    let app = app_with(config, ReplyEngine::new(credential, provider)).await;
    (app, dir)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

async fn get_raw(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn create_contact(app: &Router, name: &str, personality: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/contacts",
        Some(json!({ "name": name, "personality": personality })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_without_key() {
    let (app, _dir) = fallback_app().await;
    let (status, body) = call(&app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "API is running");
    assert_eq!(body["hasGeminiKey"], false);
    assert_eq!(body["apiKeyLength"], 0);
    assert_eq!(body["encryptionStatus"], "disabled");
    assert_eq!(body["keyFormat"], "invalid");
}

#[tokio::test]
async fn test_health_with_valid_key() {
    let (app, _dir) = provider_app(Arc::new(Counting)).await;
    let (_, body) = call(&app, Method::GET, "/api/health", None).await;

    assert_eq!(body["hasGeminiKey"], true);
    assert_eq!(body["apiKeyLength"], KEY.len());
    assert_eq!(body["keyFormat"], "valid");
    assert!(!body.to_string().contains(KEY));
}

#[tokio::test]
async fn test_first_conversation_with_fallback() {
    let (app, _dir) = fallback_app().await;
    let alex = create_contact(&app, "Alex", "friendly").await;

    let (status, chat) = call(&app, Method::POST, "/api/chats", Some(json!({ "contactId": alex }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let chat_id = chat["id"].as_str().unwrap();
    assert_eq!(chat["contactId"], alex.as_str());

    let uri = format!("/api/chats/{chat_id}/messages");
    let (status, turn) = call(&app, Method::POST, &uri, Some(json!({ "text": "Hi" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(turn["source"], "fallback");
    assert_eq!(turn["chatId"], chat_id);
    let reply = turn["reply"].as_str().unwrap();
    assert_eq!(reply, fallback_reply(&Personality::Friendly));

    let (_, messages) = call(&app, Method::GET, &uri, None).await;
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "Hi");
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["content"], reply);
}

#[tokio::test]
async fn test_fallback_reply_depends_only_on_personality() {
    let (app, _dir) = fallback_app().await;
    let alex = create_contact(&app, "Alex", "friendly").await;
    let uri = format!("/api/chats/{alex}/messages");

    let mut replies = Vec::new();
    for text in ["hi", "Hi", "how are you?"] {
        let (status, body) = call(&app, Method::POST, &uri, Some(json!({ "text": text }))).await;
        assert_eq!(status, StatusCode::OK);
        replies.push(body["reply"].as_str().unwrap().to_string());
    }
    assert!(replies.iter().all(|r| r == fallback_reply(&Personality::Friendly)));

    let jo = create_contact(&app, "Jo", "Friendly").await;
    let (_, body) = call(&app, Method::POST, &format!("/api/chats/{jo}/messages"), Some(json!({ "text": "yo" }))).await;
    assert_eq!(body["reply"], replies[0].as_str());
}

#[tokio::test]
async fn test_turns_use_provider_history() {
    let (app, _dir) = provider_app(Arc::new(Counting)).await;
    let sam = create_contact(&app, "Sam", "wise").await;
    let (_, chat) = call(&app, Method::POST, "/api/chats", Some(json!({ "contactId": sam }))).await;
    let uri = format!("/api/chats/{}/messages", chat["id"].as_str().unwrap());

    for turn in 0..3 {
        let (status, body) = call(&app, Method::POST, &uri, Some(json!({ "text": format!("turn {turn}") }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "gemini");
        // the provider sees every prior message plus the new user message
        assert_eq!(body["reply"], format!("Sam says: seen {}", turn * 2 + 1));
    }

    let (_, messages) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(messages.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_provider_failure_falls_back() {
    let (app, _dir) = provider_app(Arc::new(Broken)).await;
    let id = create_contact(&app, "Jo", "sarcastic").await;
    let (_, chat) = call(&app, Method::POST, "/api/chats", Some(json!({ "contactId": id }))).await;
    let uri = format!("/api/chats/{}/messages", chat["id"].as_str().unwrap());

    let (status, body) = call(&app, Method::POST, &uri, Some(json!({ "text": "hello?" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
    let reply = body["reply"].as_str().unwrap();
    assert_eq!(reply, fallback_reply(&Personality::Sarcastic));
}

#[tokio::test]
async fn test_send_to_contact_id_opens_chat() {
    let (app, _dir) = fallback_app().await;
    let id = create_contact(&app, "Mia", "supportive").await;

    let uri = format!("/api/chats/{id}/messages");
    let (status, first) = call(&app, Method::POST, &uri, Some(json!({ "text": "one" }))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = call(&app, Method::POST, &uri, Some(json!({ "text": "two" }))).await;
    assert_eq!(first["chatId"], second["chatId"]);

    let (_, chats) = call(&app, Method::GET, &format!("/api/contacts/{id}/chats"), None).await;
    let chats = chats.as_array().unwrap();
    assert_eq!(chats.len(), 1);
    assert_eq!(chats[0]["messageCount"], 4);
}

#[tokio::test]
async fn test_contact_crud() {
    let (app, _dir) = fallback_app().await;
    let id = create_contact(&app, "Alex", "friendly").await;

    let (status, list) = call(&app, Method::GET, "/api/contacts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let uri = format!("/api/contacts/{id}");
    let (status, updated) = call(&app, Method::PUT, &uri, Some(json!({ "personality": "funny" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["personality"], "funny");
    assert_eq!(updated["name"], "Alex");

    let (status, fetched) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["personality"], "funny");
}

#[tokio::test]
async fn test_validation_errors() {
    let (app, _dir) = fallback_app().await;

    let (status, body) = call(&app, Method::POST, "/api/contacts", Some(json!({ "personality": "wise" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name"));

    let (status, _) = call(&app, Method::POST, "/api/chats", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let id = create_contact(&app, "Alex", "friendly").await;
    let (_, chat) = call(&app, Method::POST, "/api/chats", Some(json!({ "contactId": id }))).await;
    let uri = format!("/api/chats/{}/messages", chat["id"].as_str().unwrap());
    let (status, body) = call(&app, Method::POST, &uri, Some(json!({ "text": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "text is required");

    // nothing was stored for the rejected turn
    let (_, messages) = call(&app, Method::GET, &uri, None).await;
    assert!(messages.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_not_found() {
    let (app, _dir) = fallback_app().await;

    let (status, body) = call(&app, Method::GET, "/api/contacts/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = call(&app, Method::GET, "/api/chats/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::POST, "/api/chats", Some(json!({ "contactId": "nope" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::POST, "/api/chats/nope/messages", Some(json!({ "text": "hi" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::GET, "/api/chats?contactId=nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_contact_cascades() {
    let (app, _dir) = fallback_app().await;
    let id = create_contact(&app, "Alex", "friendly").await;
    let (_, a) = call(&app, Method::POST, "/api/chats", Some(json!({ "contactId": id }))).await;
    let (_, _b) = call(&app, Method::POST, "/api/chats", Some(json!({ "contactId": id, "title": "Second" }))).await;

    let (status, body) = call(&app, Method::DELETE, &format!("/api/contacts/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);
    assert_eq!(body["chatsDeleted"], 2);

    let (status, _) = call(&app, Method::GET, &format!("/api/chats/{}", a["id"].as_str().unwrap()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, all) = call(&app, Method::GET, "/api/chats", None).await;
    assert!(all.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_chat() {
    let (app, _dir) = fallback_app().await;
    let id = create_contact(&app, "Alex", "friendly").await;
    let (_, chat) = call(&app, Method::POST, "/api/chats", Some(json!({ "contactId": id }))).await;
    let uri = format!("/api/chats/{}", chat["id"].as_str().unwrap());

    let (status, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // the contact survives
    let (status, _) = call(&app, Method::GET, &format!("/api/contacts/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_legacy_one_shot_stores_nothing() {
    let (app, _dir) = fallback_app().await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/chat",
        Some(json!({
            "message": "tell me a joke",
            "personality": "funny",
            "history": [{ "role": "user", "content": "hey" }, { "role": "assistant", "content": "yo" }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["reply"], fallback_reply(&Personality::Funny));

    let (_, chats) = call(&app, Method::GET, "/api/chats", None).await;
    assert!(chats.as_array().unwrap().is_empty());

    let (status, _) = call(&app, Method::POST, "/api/chat", Some(json!({ "message": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_uploads_are_served() {
    let (app, dir) = fallback_app().await;
    std::fs::write(dir.path().join("data/uploads/avatar.txt"), b"not really a png").unwrap();

    let (status, body) = get_raw(&app, "/uploads/avatar.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"not really a png");

    let (status, _) = get_raw(&app, "/uploads/missing.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_production_serves_client_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let dist = dir.path().join("dist");
    std::fs::create_dir_all(&dist).unwrap();
    std::fs::write(dist.join("index.html"), "<html>chatmate</html>").unwrap();
    std::fs::write(dist.join("app.js"), "console.log(1)").unwrap();

    let mut config = Config::default().with_data_dir(dir.path().join("data"));
    config.mode = RunMode::Production;
    config.client_dist = dist;
    let app = app_with(config, ReplyEngine::fallback_only(CredentialState::missing())).await;

    let (status, body) = get_raw(&app, "/app.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"console.log(1)");

    // client-side route falls back to the shell page
    let (status, body) = get_raw(&app, "/chats/some-contact").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<html>chatmate</html>");

    let (status, _) = call(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);

    // unknown api paths never get the shell page
    let (status, body) = call(&app, Method::GET, "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "no endpoint at /api/nope");
    let (status, body) = call(&app, Method::POST, "/api/contacts/x/y/z", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_development_has_no_client_bundle() {
    let (app, _dir) = fallback_app().await;
    let (status, _) = get_raw(&app, "/contacts").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_api_path_is_json_404() {
    let (app, _dir) = fallback_app().await;
    let (status, body) = call(&app, Method::GET, "/api/contact", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "no endpoint at /api/contact" }));
}
