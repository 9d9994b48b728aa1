use std::sync::Arc;

use crate::engine::InferenceEngine;

/// Process-wide state handed to Rocket at startup. The engine is the
/// single loaded model, injected here so handlers never construct it.
pub struct AppState {
    pub model_name: String,
    pub engine: Arc<dyn InferenceEngine>,
}

impl AppState {
    pub fn new(model_name: &str, engine: Arc<dyn InferenceEngine>) -> Arc<Self> {
        Arc::new(Self {
            model_name: model_name.to_string(),
            engine,
        })
    }
}
