use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tokio::time::Instant;

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    refilled_at: Instant,
}

/// Token bucket holding up to `burst` quiz requests, refilled at `burst`
/// tokens per second.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    burst: f64,
    bucket: Arc<Mutex<Bucket>>,
}

impl RateLimiter {
    pub fn per_second(limit: u32) -> Self {
        let burst = f64::from(limit.max(1));
        Self {
            burst,
            bucket: Arc::new(Mutex::new(Bucket {
                tokens: burst,
                refilled_at: Instant::now(),
            })),
        }
    }

    /// Takes one token, or reports how long until the next one is due.
    fn acquire(&self) -> Result<(), Duration> {
        let mut bucket = self.bucket.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.refilled_at).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.burst).min(self.burst);
        bucket.refilled_at = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            Err(Duration::from_secs_f64((1.0 - bucket.tokens) / self.burst))
        }
    }
}

pub async fn throttle(State(limiter): State<RateLimiter>, req: Request<Body>, next: Next) -> Response {
    if let Err(wait) = limiter.acquire() {
        let retry_after = wait.as_secs_f64().ceil().max(1.0) as u64;
        tracing::warn!(path = %req.uri().path(), retry_after, "Quiz generation throttled");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, retry_after.to_string())],
            Json(json!({ "error": "Too many quiz requests, try again shortly" })),
        )
            .into_response();
    }
    next.run(req).await
}
