use serde::{Deserialize, Serialize};

fn default_max_tokens() -> usize {
    128
}

/// Body of `POST /generate`. `prompt` carries the source code to review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

/// The first completion returned by the model, passed through verbatim.
/// The service never checks that it is valid JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
}
