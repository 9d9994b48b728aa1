use std::sync::Arc;

use rocket::serde::json::Json;
use rocket::{get, post, State};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::prompt::build_review_prompt;
use crate::types::{GenerateRequest, GenerateResponse, HealthResponse};

#[get("/health")]
pub async fn health(state: &State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.model_name.clone(),
    })
}

/// Review a code snippet: wrap it in the review prompt, run one blocking
/// generation, hand back the raw completion. Malformed bodies never reach
/// the engine; Rocket's Json guard rejects them with a 422.
#[post("/generate", data = "<req>")]
pub async fn generate(
    state: &State<Arc<AppState>>,
    req: Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let prompt = build_review_prompt(&req.prompt);
    let text = state.engine.generate(&prompt, req.max_tokens).await?;
    Ok(Json(GenerateResponse { text }))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use anyhow::Result;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use rocket::http::{ContentType, Status};
    use rocket::local::blocking::Client;

    use crate::app_state::AppState;
    use crate::build_rocket;
    use crate::engine::InferenceEngine;
    use crate::types::HealthResponse;

    /// Deterministic stand-in for the model: answers every prompt with a
    /// fixed completion and records what it was asked.
    struct StubEngine {
        completion: String,
        calls: AtomicUsize,
        last_prompt: Mutex<String>,
        last_budget: AtomicUsize,
    }

    impl StubEngine {
        fn new(completion: &str) -> Arc<Self> {
            Arc::new(Self {
                completion: completion.to_string(),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(String::new()),
                last_budget: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl InferenceEngine for StubEngine {
        async fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock() = prompt.to_string();
            self.last_budget.store(max_tokens, Ordering::SeqCst);
            Ok(self.completion.clone())
        }
    }

    fn client_with(engine: Arc<StubEngine>) -> Client {
        let state = AppState::new("stub-model", engine);
        Client::tracked(build_rocket(state)).expect("valid rocket instance")
    }

    #[test]
    fn health_reports_model_name() {
        let client = client_with(StubEngine::new("unused"));
        let resp = client.get("/health").dispatch();
        assert_eq!(resp.status(), Status::Ok);
        let body: HealthResponse = resp.into_json().expect("json body");
        assert_eq!(body.status, "ok");
        assert_eq!(body.model, "stub-model");
    }

    #[test]
    fn completion_passes_through_verbatim() {
        let engine = StubEngine::new("{\"refactored_code\": \"pass\"}");
        let client = client_with(engine.clone());
        let resp = client
            .post("/generate")
            .header(ContentType::JSON)
            .body(r#"{"prompt": "def f(): pass"}"#)
            .dispatch();
        assert_eq!(resp.status(), Status::Ok);
        let body = resp.into_string().expect("body");
        let expected = serde_json::json!({ "text": "{\"refactored_code\": \"pass\"}" });
        assert_eq!(body, expected.to_string());
    }

    #[test]
    fn max_tokens_defaults_to_128() {
        let engine = StubEngine::new("ok");
        let client = client_with(engine.clone());
        client
            .post("/generate")
            .header(ContentType::JSON)
            .body(r#"{"prompt": "def f(): pass"}"#)
            .dispatch();
        assert_eq!(engine.last_budget.load(Ordering::SeqCst), 128);
    }

    #[test]
    fn explicit_max_tokens_is_forwarded() {
        let engine = StubEngine::new("ok");
        let client = client_with(engine.clone());
        client
            .post("/generate")
            .header(ContentType::JSON)
            .body(r#"{"prompt": "x=1", "max_tokens": 10}"#)
            .dispatch();
        assert_eq!(engine.last_budget.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn engine_sees_the_review_prompt_not_the_raw_code() {
        let engine = StubEngine::new("ok");
        let client = client_with(engine.clone());
        client
            .post("/generate")
            .header(ContentType::JSON)
            .body(r#"{"prompt": "x=1"}"#)
            .dispatch();
        let prompt = engine.last_prompt.lock().clone();
        assert!(prompt.starts_with("You are an expert software engineer"));
        assert!(prompt.ends_with("x=1"));
    }

    #[test]
    fn missing_prompt_is_rejected_before_the_engine() {
        let engine = StubEngine::new("never");
        let client = client_with(engine.clone());
        let resp = client
            .post("/generate")
            .header(ContentType::JSON)
            .body(r#"{"max_tokens": 5}"#)
            .dispatch();
        assert_eq!(resp.status(), Status::UnprocessableEntity);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn identical_requests_get_identical_responses() {
        let engine = StubEngine::new("same every time");
        let client = client_with(engine.clone());
        let body = r#"{"prompt": "def f(): pass", "max_tokens": 32}"#;
        let first = client
            .post("/generate")
            .header(ContentType::JSON)
            .body(body)
            .dispatch()
            .into_string();
        let second = client
            .post("/generate")
            .header(ContentType::JSON)
            .body(body)
            .dispatch()
            .into_string();
        assert_eq!(first, second);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
    }
}
