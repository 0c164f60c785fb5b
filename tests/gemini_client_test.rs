use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde_json::{json, Value as JsonValue};
use study_vault::config::parse_base_url;
use study_vault::error::GenerationError;
use study_vault::services::ai_service::{AIService, QuizGenerator};
use tokio::net::TcpListener;
use url::Url;

#[derive(Clone)]
enum Reply {
    Text(&'static str),
    Status(StatusCode, String),
    RawBody(&'static str),
    Slow,
}

#[derive(Clone)]
struct Stub {
    reply: Reply,
    seen: Arc<Mutex<Vec<(String, Option<String>, JsonValue)>>>,
}

async fn generate_content(
    State(stub): State<Stub>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<JsonValue>,
) -> Response {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    stub.seen.lock().unwrap().push((call, key, body));

    match stub.reply {
        Reply::RawBody(raw) => (StatusCode::OK, raw).into_response(),
        Reply::Text(text) => Json(json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": text }] } }
            ]
        }))
        .into_response(),
        Reply::Status(status, body) => (status, body).into_response(),
        Reply::Slow => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({})).into_response()
        }
    }
}

async fn serve(reply: Reply) -> (Url, Stub) {
    let stub = Stub {
        reply,
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/v1beta/models/:call", post(generate_content))
        .with_state(stub.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (parse_base_url(&format!("http://{}", addr)).unwrap(), stub)
}

fn client(base: &Url, timeout: Duration) -> AIService {
    AIService::new(
        "test-key".to_string(),
        reqwest::Client::new(),
        "test-model".to_string(),
        base,
        timeout,
    )
    .unwrap()
}

const TWO_QUESTIONS: &str = r#"{
  "questions": [
    {"question": "Which is LIFO?", "options": ["Queue", "Stack", "List", "Map"], "correctAnswer": 1},
    {"question": "Which is FIFO?", "options": ["Stack", "Queue", "Heap", "Set"], "correctAnswer": 1}
  ]
}"#;

#[tokio::test]
async fn sends_schema_request_and_parses_quiz() {
    let (base, stub) = serve(Reply::Text(TWO_QUESTIONS)).await;
    let service = client(&base, Duration::from_secs(5));

    let quiz = service
        .generate("Stacks are LIFO; Queues are FIFO", "Data Structures 101")
        .await
        .unwrap();
    assert_eq!(quiz.title, "Quiz: Data Structures 101");
    assert_eq!(quiz.questions.len(), 2);
    assert!(quiz.questions.iter().all(|q| q.correct_answer == 1));

    let seen = stub.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (call, key, body) = &seen[0];
    assert_eq!(call, "test-model:generateContent");
    assert_eq!(key.as_deref(), Some("test-key"));
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(
        body["generationConfig"]["responseSchema"]["properties"]["questions"]["items"]["properties"]
            ["correctAnswer"]["type"],
        "INTEGER"
    );
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Stacks are LIFO; Queues are FIFO"));
}

#[tokio::test]
async fn works_through_the_generator_seam() {
    let (base, _stub) = serve(Reply::Text(TWO_QUESTIONS)).await;
    let generator: Arc<dyn QuizGenerator> = Arc::new(client(&base, Duration::from_secs(5)));
    let quiz = generator
        .generate_quiz("Stacks are LIFO".to_string(), "DS".to_string())
        .await
        .unwrap();
    assert_eq!(quiz.len(), 2);
}

#[tokio::test]
async fn upstream_status_is_a_generation_error() {
    let (base, _stub) = serve(Reply::Status(
        StatusCode::SERVICE_UNAVAILABLE,
        "upstream unavailable".to_string(),
    ))
    .await;
    let err = client(&base, Duration::from_secs(5))
        .generate("content", "title")
        .await
        .unwrap_err();
    match err {
        GenerationError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "upstream unavailable");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn long_error_body_is_shortened() {
    let (base, _stub) = serve(Reply::Status(StatusCode::INTERNAL_SERVER_ERROR, "x".repeat(5_000))).await;
    let err = client(&base, Duration::from_secs(5))
        .generate("content", "title")
        .await
        .unwrap_err();
    match err {
        GenerationError::Status { status, body } => {
            assert_eq!(status, 500);
            assert!(body.len() < 300);
            assert!(body.ends_with("..."));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let (base, _stub) = serve(Reply::RawBody("<html>gateway says hi</html>")).await;
    let err = client(&base, Duration::from_secs(5))
        .generate("content", "title")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Malformed(_)), "got {:?}", err);
}

#[tokio::test]
async fn prose_reply_is_malformed() {
    let (base, _stub) = serve(Reply::Text("Here are five great questions!")).await;
    let err = client(&base, Duration::from_secs(5))
        .generate("content", "title")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Malformed(_)));
}

#[tokio::test]
async fn empty_question_list_is_rejected() {
    let (base, _stub) = serve(Reply::Text(r#"{"title": "Nothing", "questions": []}"#)).await;
    let err = client(&base, Duration::from_secs(5))
        .generate("content", "title")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::NoQuestions));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let (base, _stub) = serve(Reply::Slow).await;
    let err = client(&base, Duration::from_millis(200))
        .generate("content", "title")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Generation timed out after 200ms");
    assert!(matches!(err, GenerationError::Timeout(after) if after == Duration::from_millis(200)));
}

#[tokio::test]
async fn unreachable_upstream_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = parse_base_url(&format!("http://{}", addr)).unwrap();
    let err = client(&base, Duration::from_secs(2))
        .generate("content", "title")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Transport(_)));
}
