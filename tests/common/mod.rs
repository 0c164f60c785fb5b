#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as JsonValue;
use study_vault::config::{parse_base_url, Config};
use study_vault::models::question::{Question, Quiz};
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "Admin@Vault.edu";

pub fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        gemini_api_key: "test-key".to_string(),
        gemini_model: "test-model".to_string(),
        gemini_base_url: parse_base_url("http://127.0.0.1:9").expect("base url"),
        admin_email: ADMIN_EMAIL.to_string(),
        storage_path: None,
        generation_timeout_secs: 5,
        quiz_rps: 100,
    }
}

pub fn quiz_with_answers(title: &str, correct: &[usize]) -> Quiz {
    Quiz {
        title: title.to_string(),
        questions: correct
            .iter()
            .enumerate()
            .map(|(i, &c)| Question {
                question: format!("Question {}", i + 1),
                options: vec!["LIFO".into(), "FIFO".into(), "Random".into(), "Sorted".into()],
                correct_answer: c,
            })
            .collect(),
    }
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, body)
}
