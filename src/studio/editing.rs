// Atelier Image Studio
//
// Feature wrappers over the diffusion bridge: text-to-image generation with
// style presets, template-driven image edits, and avatar synthesis on a
// blank canvas. Instructions come from the Template Dispatcher; optional
// LLM prompt polishing falls back to the raw instruction on failure.

use std::collections::HashMap;
use std::io::Cursor;

use anyhow::{bail, Context, Result};
use image::{ImageOutputFormat, Rgb, RgbImage};
use tracing::{info, warn};

use crate::studio::diffusion::{DiffusionClient, ImageSource, RenderOptions, Rendered};
use crate::studio::llm::{CompletionOptions, LlmClient};
use crate::studio::templates::{Category, Dispatcher};

/// Art-style presets appended to generation prompts.
pub fn style_preset(style: &str) -> Option<&'static str> {
    match style {
        "写实" | "realistic" => {
            Some("photorealistic, highly detailed, professional photography")
        }
        "动漫" | "anime" => Some("anime style, manga, cel shading, vibrant colors"),
        "油画" | "oil-painting" => Some("oil painting, classical art style, brush strokes"),
        "水彩" | "watercolor" => Some("watercolor painting, soft colors, artistic"),
        "素描" | "sketch" => Some("pencil sketch, black and white, detailed drawing"),
        "卡通" | "cartoon" => Some("cartoon style, colorful, simple shapes"),
        "科幻" | "sci-fi" => Some("sci-fi, futuristic, cyberpunk, neon lights"),
        "梦幻" | "dreamy" => Some("dreamy, surreal, ethereal, magical"),
        _ => None,
    }
}

/// One image-edit request: category + operation key drive the template
/// table; a missing source image is only valid for avatar synthesis.
#[derive(Debug)]
pub struct EditRequest {
    pub category: Category,
    pub operation: String,
    pub parameters: HashMap<String, String>,
    pub source: Option<ImageSource>,
}

#[derive(Debug)]
pub struct StudioOutput {
    pub rendered: Rendered,
    /// The instruction actually sent to the backend.
    pub instruction: String,
}

pub struct ImageStudio<'a> {
    dispatcher: &'a Dispatcher,
    diffusion: &'a DiffusionClient,
    llm: &'a LlmClient,
}

impl<'a> ImageStudio<'a> {
    pub fn new(
        dispatcher: &'a Dispatcher,
        diffusion: &'a DiffusionClient,
        llm: &'a LlmClient,
    ) -> Self {
        Self {
            dispatcher,
            diffusion,
            llm,
        }
    }

    /// Text-to-image generation with an optional style preset and optional
    /// LLM prompt polishing.
    pub async fn generate(
        &self,
        prompt: &str,
        style: &str,
        options: &RenderOptions,
        polish: bool,
    ) -> Result<StudioOutput> {
        let mut prompt = if polish {
            self.polish_generation_prompt(prompt).await
        } else {
            prompt.to_string()
        };

        if let Some(preset) = style_preset(style) {
            prompt = format!("{prompt}, {preset}");
        }

        info!("[CANVAS] Generation prompt: {}", prompt);
        let rendered = self.diffusion.render(&prompt, options).await?;
        Ok(StudioOutput {
            rendered,
            instruction: prompt,
        })
    }

    /// Template-driven image editing. Avatar requests without a source image
    /// start from a blank white canvas, as avatar generation has nothing to
    /// edit yet.
    pub async fn edit(
        &self,
        request: EditRequest,
        options: &RenderOptions,
        polish: bool,
    ) -> Result<StudioOutput> {
        let mut instruction =
            self.dispatcher
                .resolve_in(request.category, &request.operation, &request.parameters)?;

        if polish {
            instruction = self.polish_edit_instruction(&instruction).await;
        }

        let source = match request.source {
            Some(source) => source,
            None if request.category == Category::Avatar => {
                ImageSource::InMemory(blank_canvas(512, 512)?)
            }
            None => bail!(
                "operation '{}' ({}) needs an input image",
                request.operation,
                request.category
            ),
        };

        info!(
            "[CANVAS] Edit instruction for {}: {}",
            source.describe(),
            instruction
        );
        let rendered = self.diffusion.render_edit(&instruction, &source, options).await?;
        Ok(StudioOutput {
            rendered,
            instruction,
        })
    }

    /// Rewrite a user prompt into a detailed generation prompt. A failed
    /// polish is not fatal; the original prompt is used as-is.
    async fn polish_generation_prompt(&self, prompt: &str) -> String {
        let meta_prompt = format!(
            "Optimize the following prompt for AI image generation:\n\n\
             User prompt: {prompt}\n\n\
             Requirements:\n\
             1. Make it more detailed and specific\n\
             2. Add visual elements (colors, lighting, composition)\n\
             3. Include quality keywords (high quality, detailed, 8k, etc.)\n\
             4. Use comma-separated keywords\n\
             5. Keep the original meaning\n\n\
             Return only the optimized prompt:"
        );
        let options = CompletionOptions::default().with_max_tokens(200);
        match self.llm.complete(&meta_prompt, None, &options).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("[CANVAS] Prompt polish failed, using original: {}", e);
                prompt.to_string()
            }
        }
    }

    async fn polish_edit_instruction(&self, instruction: &str) -> String {
        let meta_prompt = format!(
            "Optimize the following prompt for AI image editing:\n\n\
             User prompt: {instruction}\n\n\
             Requirements:\n\
             1. Make it clear and specific for image editing\n\
             2. Use precise action words (change, convert, transform, add, remove, etc.)\n\
             3. Include specific visual descriptions\n\
             4. Keep the editing intent clear\n\
             5. Avoid vague or abstract descriptions\n\n\
             Return only the optimized editing prompt:"
        );
        let options = CompletionOptions::default()
            .with_max_tokens(150)
            .with_temperature(0.3);
        match self.llm.complete(&meta_prompt, None, &options).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("[CANVAS] Instruction polish failed, using original: {}", e);
                instruction.to_string()
            }
        }
    }
}

/// A white RGB canvas encoded as PNG, the seed for avatar synthesis.
fn blank_canvas(width: u32, height: u32) -> Result<Vec<u8>> {
    let canvas = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    let mut bytes = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .context("Encoding avatar canvas")?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_cover_both_label_sets() {
        assert_eq!(style_preset("写实"), style_preset("realistic"));
        assert!(style_preset("动漫").unwrap().contains("anime"));
        assert_eq!(style_preset("unknown"), None);
    }

    #[test]
    fn blank_canvas_is_a_decodable_png() {
        let bytes = blank_canvas(8, 8).unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!(img.width(), 8);
        assert_eq!(img.height(), 8);
    }
}
