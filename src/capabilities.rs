// Atelier Capability Registry
//
// Optional features (image generation, video assembly, ...) depend on
// external services and tools. Instead of module-level availability flags,
// the registry is probed once at startup and passed by reference to
// whatever layer needs to branch on it.

use std::collections::BTreeMap;
use std::process::Stdio;

use anyhow::{bail, Result};

use crate::config::Settings;

pub const TEXT_GENERATION: &str = "text-generation";
pub const IMAGE_GENERATION: &str = "image-generation";
pub const SPEECH_TO_TEXT: &str = "speech-to-text";
pub const VIDEO_ASSEMBLY: &str = "video-assembly";

#[derive(Debug, Clone)]
pub struct Capability {
    pub available: bool,
    pub reason: String,
}

impl Capability {
    fn ok() -> Self {
        Self {
            available: true,
            reason: "ready".to_string(),
        }
    }

    fn missing(reason: &str) -> Self {
        Self {
            available: false,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    map: BTreeMap<&'static str, Capability>,
}

impl CapabilityRegistry {
    /// Probe the environment once. Cheap checks only: key presence, URL
    /// presence, and whether ffmpeg answers on PATH.
    pub fn probe(settings: &Settings) -> Self {
        let mut map = BTreeMap::new();

        let llm = &settings.llm;
        let has_llm_key =
            llm.openai_key.is_some() || llm.deepseek_key.is_some() || llm.anthropic_key.is_some();
        map.insert(
            TEXT_GENERATION,
            if has_llm_key {
                Capability::ok()
            } else {
                Capability::missing(
                    "no LLM API key configured (OPENAI_API_KEY / DEEPSEEK_API_KEY / ANTHROPIC_API_KEY)",
                )
            },
        );

        map.insert(
            IMAGE_GENERATION,
            if settings.diffusion_url.is_some() {
                Capability::ok()
            } else {
                Capability::missing("ATELIER_DIFFUSION_URL not set")
            },
        );

        // Whisper models are fetched on demand; the capability is always on.
        map.insert(SPEECH_TO_TEXT, Capability::ok());

        map.insert(
            VIDEO_ASSEMBLY,
            if ffmpeg_present() {
                Capability::ok()
            } else {
                Capability::missing("ffmpeg not found on PATH")
            },
        );

        Self { map }
    }

    pub fn get(&self, feature: &str) -> Option<&Capability> {
        self.map.get(feature)
    }

    /// Fail early with the probe's reason when a feature is unavailable.
    pub fn require(&self, feature: &str) -> Result<()> {
        match self.map.get(feature) {
            Some(cap) if cap.available => Ok(()),
            Some(cap) => bail!("feature '{}' unavailable: {}", feature, cap.reason),
            None => bail!("feature '{}' is not registered", feature),
        }
    }

    pub fn summary(&self) -> String {
        let mut out = String::from("Capabilities:\n");
        for (name, cap) in &self.map {
            out.push_str(&format!(
                "  {:<16} {}  ({})\n",
                name,
                if cap.available { "available" } else { "unavailable" },
                cap.reason,
            ));
        }
        out
    }
}

fn ffmpeg_present() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmSettings;
    use std::path::PathBuf;

    fn bare_settings() -> Settings {
        Settings {
            llm: LlmSettings {
                openai_key: None,
                deepseek_key: None,
                anthropic_key: None,
                default_provider: "deepseek".to_string(),
            },
            diffusion_url: None,
            whisper_model: "base".to_string(),
            output_root: PathBuf::from("outputs"),
            cache_dir: None,
        }
    }

    #[test]
    fn missing_keys_disable_text_generation() {
        let registry = CapabilityRegistry::probe(&bare_settings());
        let cap = registry.get(TEXT_GENERATION).unwrap();
        assert!(!cap.available);
        assert!(registry.require(TEXT_GENERATION).is_err());
    }

    #[test]
    fn diffusion_url_enables_image_generation() {
        let mut settings = bare_settings();
        settings.diffusion_url = Some("http://localhost:7860".to_string());
        let registry = CapabilityRegistry::probe(&settings);
        assert!(registry.require(IMAGE_GENERATION).is_ok());
    }
}
