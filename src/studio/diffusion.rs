// Atelier Diffusion Bridge
//
// Talks to an SD-WebUI-compatible HTTP server for text-to-image and
// image-edit rendering. Images travel as base64 inside JSON. The server is
// treated as a black box: render(prompt, image?) -> image bytes.

use std::borrow::Cow;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::Rng;
use serde_json::json;
use tracing::{info, warn};

pub const DEFAULT_NEGATIVE_PROMPT: &str =
    "blurry, low quality, distorted, deformed, watermark, text";

/// An input image: either a path on disk or bytes already in memory
/// (e.g. a synthesized avatar canvas).
#[derive(Debug, Clone)]
pub enum ImageSource {
    FilePath(PathBuf),
    InMemory(Vec<u8>),
}

impl ImageSource {
    pub fn bytes(&self) -> Result<Cow<'_, [u8]>> {
        match self {
            ImageSource::FilePath(path) => {
                let data = std::fs::read(path)
                    .with_context(|| format!("reading input image {:?}", path))?;
                Ok(Cow::Owned(data))
            }
            ImageSource::InMemory(data) => Ok(Cow::Borrowed(data)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ImageSource::FilePath(path) => format!("{:?}", path),
            ImageSource::InMemory(data) => format!("in-memory image ({} bytes)", data.len()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub guidance: f32,
    pub count: u32,
    pub seed: Option<u64>,
    pub negative_prompt: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            steps: 20,
            guidance: 7.5,
            count: 1,
            seed: None,
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
        }
    }
}

/// One rendered image plus the seed it was produced with.
#[derive(Debug)]
pub struct Rendered {
    pub images: Vec<Vec<u8>>,
    pub seed: u64,
}

pub struct DiffusionClient {
    client: reqwest::Client,
    base_url: String,
}

impl DiffusionClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Text-to-image rendering.
    pub async fn render(&self, prompt: &str, options: &RenderOptions) -> Result<Rendered> {
        let seed = options.seed.unwrap_or_else(random_seed);
        info!("[CANVAS] Rendering {} image(s), seed {}", options.count, seed);

        let payload = json!({
            "prompt": prompt,
            "negative_prompt": options.negative_prompt,
            "width": options.width,
            "height": options.height,
            "steps": options.steps,
            "cfg_scale": options.guidance,
            "batch_size": options.count,
            "seed": seed,
        });

        let images = self.post_render("/sdapi/v1/txt2img", payload).await?;
        Ok(Rendered { images, seed })
    }

    /// Image editing: hand the backend an instruction plus a source image.
    pub async fn render_edit(
        &self,
        instruction: &str,
        source: &ImageSource,
        options: &RenderOptions,
    ) -> Result<Rendered> {
        let seed = options.seed.unwrap_or_else(random_seed);
        info!(
            "[CANVAS] Editing {} with seed {}",
            source.describe(),
            seed
        );

        let encoded = BASE64.encode(source.bytes()?.as_ref());
        let payload = json!({
            "prompt": instruction,
            "negative_prompt": options.negative_prompt,
            "init_images": [encoded],
            "steps": options.steps,
            "cfg_scale": options.guidance,
            "batch_size": options.count,
            "seed": seed,
        });

        let images = self.post_render("/sdapi/v1/img2img", payload).await?;
        Ok(Rendered { images, seed })
    }

    async fn post_render(&self, path: &str, payload: serde_json::Value) -> Result<Vec<Vec<u8>>> {
        let endpoint = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(&endpoint)
            .json(&payload)
            .send()
            .await
            .context("Diffusion request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            warn!("[CANVAS] Backend returned {}", status);
            bail!("diffusion backend error: {}", status);
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .context("Decoding diffusion response")?;
        let encoded = body["images"]
            .as_array()
            .ok_or_else(|| anyhow!("diffusion response had no images array"))?;

        let mut images = Vec::with_capacity(encoded.len());
        for item in encoded {
            let b64 = item
                .as_str()
                .ok_or_else(|| anyhow!("non-string image entry in diffusion response"))?;
            images.push(BASE64.decode(b64).context("Decoding image payload")?);
        }

        if images.is_empty() {
            bail!("diffusion backend returned zero images");
        }
        Ok(images)
    }
}

fn random_seed() -> u64 {
    rand::thread_rng().gen_range(0..u32::MAX as u64)
}
