// Atelier Configuration
//
// Everything is environment-driven (.env friendly). Settings are read once
// at startup and passed by reference; nothing here is re-read at runtime.

use std::env;
use std::path::PathBuf;

pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com/v1";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub openai_key: Option<String>,
    pub deepseek_key: Option<String>,
    pub anthropic_key: Option<String>,
    /// Provider used when a request doesn't name one.
    pub default_provider: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub llm: LlmSettings,
    /// Base URL of an SD-WebUI-compatible diffusion server, if any.
    pub diffusion_url: Option<String>,
    /// Whisper GGML model name, e.g. "base" or "small".
    pub whisper_model: String,
    /// Root directory for generated artifacts.
    pub output_root: PathBuf,
    /// Override for the model cache directory.
    pub cache_dir: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            llm: LlmSettings {
                openai_key: non_empty(env::var("OPENAI_API_KEY").ok()),
                deepseek_key: non_empty(env::var("DEEPSEEK_API_KEY").ok()),
                anthropic_key: non_empty(env::var("ANTHROPIC_API_KEY").ok()),
                default_provider: env::var("ATELIER_LLM_PROVIDER")
                    .unwrap_or_else(|_| "deepseek".to_string()),
            },
            diffusion_url: non_empty(env::var("ATELIER_DIFFUSION_URL").ok()),
            whisper_model: env::var("ATELIER_WHISPER_MODEL")
                .unwrap_or_else(|_| "base".to_string()),
            output_root: env::var("ATELIER_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("outputs")),
            cache_dir: env::var("ATELIER_CACHE_DIR").ok().map(PathBuf::from),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keys_count_as_missing() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some("sk-x".to_string())), Some("sk-x".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
