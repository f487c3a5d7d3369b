use anyhow::{anyhow, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_API_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_MODEL: &str = "deepseek-ai/deepseek-coder-33b-instruct";

/// Endpoint settings carried along with each engine command.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_url: String,
    pub model: String,
    pub api_key: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            model: DEFAULT_MODEL.into(),
            api_key: String::new(),
        }
    }
}

/// Seam between the engine and the hosted model, so the state machine can
/// be driven by a scripted generator in tests.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
    do_sample: bool,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: 250,
            temperature: 0.7,
            top_p: 0.9,
            do_sample: true,
        }
    }
}

/// Blocking client for a Hugging Face style text-generation endpoint.
pub struct HostedModelClient {
    client: Client,
    config: LlmConfig,
}

impl HostedModelClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

impl TextGenerator for HostedModelClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/{}", self.config.api_url, self.config.model);
        let req = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters::default(),
        };

        let resp: Value = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&req)
            .send()?
            .json()?;

        extract_completion(&resp)
    }
}

/// The endpoint answers in several shapes; accept the known ones and turn
/// anything else into an error instead of panicking.
fn extract_completion(resp: &Value) -> Result<String> {
    if let Some(err) = resp.get("error").and_then(Value::as_str) {
        return Err(anyhow!("endpoint error: {err}"));
    }

    // [{ "generated_text": ... }, ...]
    if let Some(text) = resp
        .get(0)
        .and_then(|item| item.get("generated_text"))
        .and_then(Value::as_str)
    {
        return Ok(text.to_string());
    }

    // { "generated_text": ... }
    if let Some(text) = resp.get("generated_text").and_then(Value::as_str) {
        return Ok(text.to_string());
    }

    // [ "completion", ... ]
    if let Some(text) = resp.get(0).and_then(Value::as_str) {
        return Ok(text.to_string());
    }

    Err(anyhow!("unexpected response format: {resp}"))
}
