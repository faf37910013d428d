use anyhow::Result;
use std::env;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo-instruct";

pub const SEPARATOR: &str = "\n";
pub const CHUNK_SIZE: usize = 1000;
pub const CHUNK_OVERLAP: usize = 200;
pub const TOP_K: usize = 4;

/// Process-wide settings, read once at startup and handed to the services.
#[derive(Debug, Clone)]
pub struct RagConfig {
    pub api_key: String,
    pub api_base: String,
    pub embedding_model: String,
    pub completion_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub separator: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl RagConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 256,
            separator: SEPARATOR.to_string(),
            chunk_size: CHUNK_SIZE,
            chunk_overlap: CHUNK_OVERLAP,
            top_k: TOP_K,
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;

        let mut config = Self::new(api_key);
        if let Ok(api_base) = env::var("OPENAI_API_BASE") {
            config.api_base = api_base;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!("API key must not be empty");
        }
        if self.chunk_overlap > self.chunk_size {
            anyhow::bail!(
                "chunk_overlap ({}) must not exceed chunk_size ({})",
                self.chunk_overlap,
                self.chunk_size
            );
        }
        if self.top_k == 0 {
            anyhow::bail!("top_k must be greater than zero");
        }
        Ok(())
    }

    /// Endpoint URL under the configured base, tolerating a trailing slash.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path)
    }
}
