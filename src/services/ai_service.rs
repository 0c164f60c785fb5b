use crate::config::Config;
use crate::error::{Error, GenerationError, Result};
use crate::models::question::{Question, Quiz, OPTIONS_PER_QUESTION, QUESTIONS_PER_QUIZ};
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use url::Url;

pub type GenerationResult = std::result::Result<Quiz, GenerationError>;

pub type GenerationFuture = Pin<Box<dyn Future<Output = GenerationResult> + Send + 'static>>;

/// Turns note text into a quiz. Injected into whatever owns the session so
/// tests can swap the remote model for a double.
pub trait QuizGenerator: Send + Sync {
    fn generate_quiz(&self, note_content: String, note_title: String) -> GenerationFuture;
}

#[derive(Clone)]
pub struct AIService {
    client: Client,
    api_key: String,
    model: String,
    endpoint: Url,
    timeout: Duration,
}

impl AIService {
    pub fn new(
        api_key: String,
        client: Client,
        model: String,
        base_url: &Url,
        timeout: Duration,
    ) -> Result<Self> {
        let endpoint = base_url
            .join(&format!("v1beta/models/{}:generateContent", model))
            .map_err(|e| Error::Config(format!("Cannot build generation endpoint: {}", e)))?;
        Ok(Self {
            client,
            api_key,
            model,
            endpoint,
            timeout,
        })
    }

    pub fn from_config(config: &Config, client: Client) -> Result<Self> {
        Self::new(
            config.gemini_api_key.clone(),
            client,
            config.gemini_model.clone(),
            &config.gemini_base_url,
            config.generation_timeout(),
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn generate(&self, note_content: &str, note_title: &str) -> GenerationResult {
        if note_content.trim().is_empty() {
            return Err(GenerationError::EmptyContent);
        }

        let payload = serde_json::json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": build_prompt(note_content) }]
                }
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        });

        tracing::info!(model = %self.model, title = %note_title, "Requesting quiz generation");
        let text = self.generate_content(payload).await?;
        let quiz = parse_quiz(&text, note_title)?;
        tracing::info!(title = %quiz.title, questions = quiz.len(), "Quiz generated");
        Ok(quiz)
    }

    async fn generate_content(&self, payload: JsonValue) -> std::result::Result<String, GenerationError> {
        let res = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            tracing::error!("Gemini API Error {}: {}", status, body);
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        let body: JsonValue = res.json().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(e)
            } else {
                GenerationError::Malformed(format!("response body is not JSON: {}", e))
            }
        })?;

        let parts = body
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or_else(|| GenerationError::Malformed("response has no candidates".to_string()))?;

        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect();

        if text.trim().is_empty() {
            return Err(GenerationError::Malformed("candidate has no text".to_string()));
        }
        Ok(text)
    }

    fn transport_error(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout(self.timeout)
        } else {
            err.into()
        }
    }
}

impl QuizGenerator for AIService {
    fn generate_quiz(&self, note_content: String, note_title: String) -> GenerationFuture {
        let service = self.clone();
        Box::pin(async move { service.generate(&note_content, &note_title).await })
    }
}

/// Upstream error bodies end up in the failed-session message, so only the
/// start of them is kept.
const ERROR_EXCERPT_CHARS: usize = 200;

fn excerpt(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(ERROR_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

fn build_prompt(note_content: &str) -> String {
    format!(
        "Generate a {}-question multiple choice quiz based on the following academic notes for a student.\n\
         The content is: \"{}\".\n\
         Each question must have {} options and one correct answer (index 0-{}).",
        QUESTIONS_PER_QUIZ,
        note_content,
        OPTIONS_PER_QUESTION,
        OPTIONS_PER_QUESTION - 1
    )
}

fn response_schema() -> JsonValue {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "questions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "options": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" }
                        },
                        "correctAnswer": { "type": "INTEGER" }
                    },
                    "required": ["question", "options", "correctAnswer"]
                }
            }
        },
        "required": ["title", "questions"]
    })
}

/// Maps the model's JSON text onto a quiz, filling the title from the note
/// when the model leaves it out.
pub fn parse_quiz(text: &str, note_title: &str) -> GenerationResult {
    let raw: JsonValue = serde_json::from_str(text.trim())
        .map_err(|e| GenerationError::Malformed(format!("response is not JSON: {}", e)))?;
    if !raw.is_object() {
        return Err(GenerationError::Malformed("response is not a JSON object".to_string()));
    }

    let title = raw
        .get("title")
        .and_then(|t| t.as_str())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Quiz: {}", note_title));

    let questions = sanitize_questions(&raw);
    if questions.is_empty() {
        return Err(GenerationError::NoQuestions);
    }

    Ok(Quiz { title, questions })
}

pub fn sanitize_questions(raw: &JsonValue) -> Vec<Question> {
    let items = match raw.get("questions").and_then(|a| a.as_array()) {
        Some(items) => items,
        None => return Vec::new(),
    };

    let mut questions: Vec<Question> = items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            let coerced = coerce_question(item);
            if coerced.is_none() {
                tracing::warn!("Dropping malformed generated question at position {}", idx);
            }
            coerced
        })
        .collect();

    questions.truncate(QUESTIONS_PER_QUIZ);
    questions
}

fn coerce_question(v: &JsonValue) -> Option<Question> {
    let question = v.get("question")?.as_str()?.trim();
    if question.is_empty() {
        return None;
    }

    let options: Vec<String> = v
        .get("options")?
        .as_array()?
        .iter()
        .map(|o| o.as_str().map(|s| s.trim().to_string()))
        .collect::<Option<Vec<_>>>()?;
    if options.len() != OPTIONS_PER_QUESTION || options.iter().any(|o| o.is_empty()) {
        return None;
    }

    let correct = v
        .get("correctAnswer")
        .or_else(|| v.get("correct_answer"))
        .and_then(|c| c.as_u64())? as usize;
    if correct >= options.len() {
        return None;
    }

    Some(Question {
        question: question.to_string(),
        options,
        correct_answer: correct,
    })
}
