use std::fs::File;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;

use candle_core::quantized::gguf_file;
use candle_core::{Device, Tensor};
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::quantized_llama as qllama;
use hf_hub::api::sync::Api;
use tokenizers::Tokenizer;

use crate::config::ServiceConfig;

const TEMPERATURE: f64 = 0.8;
const SEED: u64 = 42;
const EOS_TOKEN: &str = "</s>";

/// Seam between the HTTP layer and the model. Handlers only see this
/// trait, so tests can substitute a stub engine.
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Generate one completion for `prompt`, up to `max_tokens` tokens.
    async fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String>;
}

/// Quantized llama inference on CPU via Candle. The weights carry mutable
/// KV-cache state, so every generation holds the mutex for its full
/// duration and concurrent requests serialize here.
pub struct CandleEngine {
    device: Device,
    model: Mutex<qllama::ModelWeights>,
    tokenizer: Tokenizer,
}

impl CandleEngine {
    pub fn new(config: &ServiceConfig) -> Result<Arc<Self>> {
        let device = Device::Cpu;

        let mut file = File::open(&config.model_path).map_err(|e| {
            anyhow!("cannot open model file {}: {e}", config.model_path.display())
        })?;
        let start = Instant::now();

        let content = gguf_file::Content::read(&mut file)?;
        let mut total_size_in_bytes = 0usize;
        for (_, tensor) in content.tensor_infos.iter() {
            let elem_count = tensor.shape.elem_count();
            total_size_in_bytes +=
                elem_count * tensor.ggml_dtype.type_size() / tensor.ggml_dtype.block_size();
        }
        println!(
            "[engine] loaded {} tensors ({}) in {:.2}s",
            content.tensor_infos.len(),
            format_size(total_size_in_bytes),
            start.elapsed().as_secs_f32(),
        );

        let model = qllama::ModelWeights::from_gguf(content, &mut file, &device)?;

        let api = Api::new()?;
        let repo = api.model(config.tokenizer_repo.clone());
        let tokenizer_path = repo.get("tokenizer.json")?;
        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow!("error loading tokenizer: {e}"))?;
        println!("[engine] model ready ({})", config.model_name);

        Ok(Arc::new(Self {
            device,
            model: Mutex::new(model),
            tokenizer,
        }))
    }

    fn generate_inner(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        let tokens = self
            .tokenizer
            .encode(prompt, true)
            .map_err(|e| anyhow!("error encoding prompt: {e}"))?;
        let to_sample = max_tokens.saturating_sub(1);
        let prompt_tokens = clamp_prompt(tokens.get_ids().to_vec(), to_sample);

        let mut all_tokens = vec![];
        let mut logits_processor = LogitsProcessor::new(SEED, Some(TEMPERATURE), None);

        let mut model = self.model.lock();

        let input = Tensor::new(prompt_tokens.as_slice(), &self.device)?.unsqueeze(0)?;
        let logits = model.forward(&input, 0)?.squeeze(0)?;
        let mut next_token = logits_processor.sample(&logits)?;
        all_tokens.push(next_token);

        let eos_token = *self.tokenizer.get_vocab(true).get(EOS_TOKEN).unwrap_or(&0);

        for index in 0..to_sample {
            let input = Tensor::new(&[next_token], &self.device)?.unsqueeze(0)?;
            let logits = model
                .forward(&input, prompt_tokens.len() + index)?
                .squeeze(0)?;
            next_token = logits_processor.sample(&logits)?;
            if next_token == eos_token {
                break;
            }
            all_tokens.push(next_token);
        }

        // Only the completion goes back to the caller, not the prompt.
        let decoded = self
            .tokenizer
            .decode(&all_tokens, true)
            .map_err(|e| anyhow!("error decoding completion: {e}"))?;

        Ok(decoded)
    }
}

#[async_trait]
impl InferenceEngine for CandleEngine {
    async fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        self.generate_inner(prompt, max_tokens)
    }
}

/// Drops tokens from the front of the prompt so that prompt plus sampling
/// budget fits the context window, keeping the tail (the most recent code).
fn clamp_prompt(mut tokens: Vec<u32>, to_sample: usize) -> Vec<u32> {
    let budget = qllama::MAX_SEQ_LEN - 10;
    if tokens.len() + to_sample > budget {
        let to_remove = tokens.len() + to_sample - budget;
        tokens = tokens[to_remove.min(tokens.len())..].to_vec();
    }
    tokens
}

fn format_size(size: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let size_f = size as f64;
    if size_f > GB {
        format!("{:.2} GiB", size_f / GB)
    } else if size_f > MB {
        format!("{:.2} MiB", size_f / MB)
    } else if size_f > KB {
        format!("{:.2} KiB", size_f / KB)
    } else {
        format!("{size} B")
    }
}
