use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "models/tinyllama-1.1b-chat-v1.0.Q4_K_M.gguf";
pub const DEFAULT_TOKENIZER_REPO: &str = "TinyLlama/TinyLlama-1.1B-Chat-v1.0";
pub const DEFAULT_MODEL_NAME: &str = "tinyllama-1.1b-chat";

/// Runtime configuration, resolved once at startup from the environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Path to the GGUF weights on disk.
    pub model_path: PathBuf,
    /// Hugging Face repo the tokenizer.json is fetched from.
    pub tokenizer_repo: String,
    /// Model name reported by /health.
    pub model_name: String,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self {
            model_path: env::var("REVIEWER_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH)),
            tokenizer_repo: env::var("REVIEWER_TOKENIZER_REPO")
                .unwrap_or_else(|_| DEFAULT_TOKENIZER_REPO.to_string()),
            model_name: env::var("REVIEWER_MODEL_NAME")
                .unwrap_or_else(|_| DEFAULT_MODEL_NAME.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_environment_overrides() {
        env::remove_var("REVIEWER_MODEL_PATH");
        env::remove_var("REVIEWER_TOKENIZER_REPO");
        env::remove_var("REVIEWER_MODEL_NAME");

        let config = ServiceConfig::from_env();
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(config.tokenizer_repo, DEFAULT_TOKENIZER_REPO);
        assert_eq!(config.model_name, DEFAULT_MODEL_NAME);
    }
}
