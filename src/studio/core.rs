// Atelier Studio Core
//
// The central routing layer behind the CLI: owns the settings, capability
// registry, template dispatcher, backend clients, and artifact store, and
// exposes one method per user-facing operation. Failures are reported once;
// nothing here retries.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde_json::json;
use tracing::info;

use crate::capabilities::{self, CapabilityRegistry};
use crate::config::Settings;
use crate::studio::artifacts::{ArtifactKind, ArtifactStore};
use crate::studio::content::ContentGenerator;
use crate::studio::diffusion::{DiffusionClient, ImageSource, RenderOptions};
use crate::studio::editing::{EditRequest, ImageStudio};
use crate::studio::llm::{LlmClient, Provider};
use crate::studio::prompt_lab::PromptLab;
use crate::studio::slideshow::{self, SlideshowSpec};
use crate::studio::speech::{SpeechProcessor, SummaryKind};
use crate::studio::templates::{Category, Dispatcher};
use crate::studio::transcription::TranscriptionEngine;

pub struct StudioCore {
    settings: Settings,
    registry: CapabilityRegistry,
    dispatcher: Dispatcher,
    llm: LlmClient,
    diffusion: Option<DiffusionClient>,
    store: ArtifactStore,
}

impl StudioCore {
    pub fn new(settings: Settings, registry: CapabilityRegistry) -> Result<Self> {
        let llm = LlmClient::new(&settings.llm);
        let diffusion = settings.diffusion_url.as_deref().map(DiffusionClient::new);
        let store = ArtifactStore::new(&settings.output_root)?;

        Ok(Self {
            settings,
            registry,
            dispatcher: Dispatcher::new(),
            llm,
            diffusion,
            store,
        })
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    // --- Text features ---

    pub async fn run_article(
        &self,
        topic: &str,
        style: &str,
        length: &str,
        provider: Option<&str>,
    ) -> Result<PathBuf> {
        self.registry.require(capabilities::TEXT_GENERATION)?;
        let provider = parse_provider(provider)?;

        let generator = ContentGenerator::new(&self.llm);
        let generated = generator
            .generate_article(topic, style, length, provider)
            .await?;
        let path = self.store.save_markdown(
            ArtifactKind::Article,
            &generated.title,
            &generated.content,
            &generated.metadata,
        )?;
        info!("[CORE] Article saved to {:?}", path);
        Ok(path)
    }

    pub async fn run_chapter(
        &self,
        plot: &str,
        characters: &str,
        setting: &str,
        number: u32,
        provider: Option<&str>,
    ) -> Result<PathBuf> {
        self.registry.require(capabilities::TEXT_GENERATION)?;
        let provider = parse_provider(provider)?;

        let generator = ContentGenerator::new(&self.llm);
        let generated = generator
            .generate_novel_chapter(plot, characters, setting, number, provider)
            .await?;
        let path = self.store.save_markdown(
            ArtifactKind::Article,
            &generated.title,
            &generated.content,
            &generated.metadata,
        )?;
        info!("[CORE] Chapter saved to {:?}", path);
        Ok(path)
    }

    pub async fn run_outline(
        &self,
        theme: &str,
        genre: &str,
        length: &str,
        provider: Option<&str>,
    ) -> Result<PathBuf> {
        self.registry.require(capabilities::TEXT_GENERATION)?;
        let provider = parse_provider(provider)?;

        let generator = ContentGenerator::new(&self.llm);
        let generated = generator
            .generate_story_outline(theme, genre, length, provider)
            .await?;
        let path = self.store.save_markdown(
            ArtifactKind::Article,
            &generated.title,
            &generated.content,
            &generated.metadata,
        )?;
        info!("[CORE] Outline saved to {:?}", path);
        Ok(path)
    }

    pub async fn run_video_script(
        &self,
        topic: &str,
        style: &str,
        duration: u32,
        provider: Option<&str>,
    ) -> Result<PathBuf> {
        self.registry.require(capabilities::TEXT_GENERATION)?;
        let provider = parse_provider(provider)?;

        let generator = ContentGenerator::new(&self.llm);
        let generated = generator
            .generate_video_script(topic, style, duration, provider)
            .await?;
        let path = self.store.save_markdown(
            ArtifactKind::Video,
            &generated.title,
            &generated.content,
            &generated.metadata,
        )?;
        info!("[CORE] Video script saved to {:?}", path);
        Ok(path)
    }

    // --- Speech ---

    pub async fn run_transcription(
        &self,
        audio: &Path,
        language: &str,
        summary: &str,
    ) -> Result<PathBuf> {
        self.registry.require(capabilities::SPEECH_TO_TEXT)?;
        if !audio.exists() {
            return Err(anyhow!("audio file not found: {:?}", audio));
        }

        let engine =
            TranscriptionEngine::new(&self.settings.whisper_model, self.settings.cache_dir.clone())
                .await?;
        let processor = SpeechProcessor::new(&engine, &self.llm);
        let report = processor
            .transcribe_and_summarize(audio, language, SummaryKind::parse(summary))
            .await?;

        let stem = format!(
            "{}_transcript",
            audio
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "audio".to_string())
        );
        let path = self
            .store
            .save_document(ArtifactKind::Audio, &stem, &report.markdown)?;

        info!(
            "[CORE] Transcription saved to {:?} ({:.1}s of audio, language {})",
            path, report.transcript.duration, report.transcript.language
        );
        Ok(path)
    }

    // --- Images ---

    #[allow(clippy::too_many_arguments)]
    pub async fn run_image(
        &self,
        prompt: &str,
        style: &str,
        width: u32,
        height: u32,
        count: u32,
        seed: Option<u64>,
        polish: bool,
    ) -> Result<Vec<PathBuf>> {
        self.registry.require(capabilities::IMAGE_GENERATION)?;
        let diffusion = self.diffusion()?;
        let studio = ImageStudio::new(&self.dispatcher, diffusion, &self.llm);

        let options = RenderOptions {
            width,
            height,
            count,
            seed,
            ..Default::default()
        };
        let output = studio.generate(prompt, style, &options, polish).await?;

        let mut paths = Vec::new();
        for (i, bytes) in output.rendered.images.iter().enumerate() {
            let metadata = json!({
                "kind": "generated-image",
                "prompt": output.instruction,
                "style": style,
                "width": width,
                "height": height,
                "seed": output.rendered.seed,
                "index": i,
            });
            let stem = format!("img_{}_seed_{}", i + 1, output.rendered.seed);
            paths.push(self.store.save_binary(
                ArtifactKind::Image,
                &stem,
                "png",
                bytes,
                &metadata,
            )?);
        }
        info!("[CORE] Generated {} image(s)", paths.len());
        Ok(paths)
    }

    pub async fn run_edit(
        &self,
        category: &str,
        operation: &str,
        input: Option<PathBuf>,
        value: Option<String>,
        params: Vec<(String, String)>,
        polish: bool,
    ) -> Result<Vec<PathBuf>> {
        self.registry.require(capabilities::IMAGE_GENERATION)?;
        let diffusion = self.diffusion()?;
        let studio = ImageStudio::new(&self.dispatcher, diffusion, &self.llm);

        let category: Category = category.parse()?;
        let mut parameters: HashMap<String, String> = params.into_iter().collect();
        if let Some(value) = value {
            parameters.insert("value".to_string(), value);
        }

        let request = EditRequest {
            category,
            operation: operation.to_string(),
            parameters,
            source: input.map(ImageSource::FilePath),
        };

        let source_label = request
            .source
            .as_ref()
            .map(|s| s.describe())
            .unwrap_or_else(|| "blank canvas".to_string());
        let output = studio.edit(request, &RenderOptions::default(), polish).await?;

        let mut paths = Vec::new();
        for (i, bytes) in output.rendered.images.iter().enumerate() {
            let metadata = json!({
                "kind": "edited-image",
                "category": category.label(),
                "operation": operation,
                "instruction": output.instruction,
                "source": source_label,
                "seed": output.rendered.seed,
                "index": i,
            });
            let stem = format!("edited_{}_seed_{}", i + 1, output.rendered.seed);
            paths.push(self.store.save_binary(
                ArtifactKind::EditedImage,
                &stem,
                "png",
                bytes,
                &metadata,
            )?);
        }
        info!("[CORE] Edit complete: {} image(s)", paths.len());
        Ok(paths)
    }

    // --- Video ---

    pub async fn run_slideshow(
        &self,
        images: Vec<PathBuf>,
        dir: Option<PathBuf>,
        seconds_per_image: f64,
        output: Option<PathBuf>,
    ) -> Result<PathBuf> {
        self.registry.require(capabilities::VIDEO_ASSEMBLY)?;

        let mut images = images;
        if let Some(dir) = dir {
            images.extend(slideshow::collect_images(&dir));
        }
        if images.is_empty() {
            return Err(anyhow!("no input images for the slideshow"));
        }

        let spec = SlideshowSpec {
            images,
            seconds_per_image,
            ..Default::default()
        };

        let output = output.unwrap_or_else(|| {
            self.store
                .dir(ArtifactKind::Video)
                .join(format!("slideshow_{}.mp4", chrono::Local::now().format("%Y%m%d_%H%M%S")))
        });
        let result = slideshow::assemble(&spec, &output).await?;

        let metadata = json!({
            "kind": "slideshow",
            "image_count": spec.images.len(),
            "seconds_per_image": spec.seconds_per_image,
            "total_duration": result.total_duration,
            "size_mb": result.size_mb,
        });
        let meta_path = result.video_path.with_extension("json");
        std::fs::write(&meta_path, serde_json::to_string_pretty(&metadata)?)
            .with_context(|| format!("writing {:?}", meta_path))?;

        info!(
            "[CORE] Slideshow saved to {:?} ({:.1}s, {:.2} MB)",
            result.video_path, result.total_duration, result.size_mb
        );
        Ok(result.video_path)
    }

    // --- Prompt lab ---

    pub async fn run_optimize(
        &self,
        prompt: &str,
        goal: &str,
        domain: &str,
        variations: Option<u32>,
    ) -> Result<()> {
        self.registry.require(capabilities::TEXT_GENERATION)?;
        let lab = PromptLab::new(&self.llm);

        let analysis = lab.analyze(prompt).await?;
        println!("=== Analysis ===\n{}\n", analysis.analysis);
        if !analysis.scores.is_empty() {
            let total: u32 = analysis.scores.values().sum();
            let avg = total as f64 / analysis.scores.len() as f64;
            println!("Average score: {:.1}/10\n", avg);
        }

        let optimization = lab.optimize(prompt, goal, domain).await?;
        println!("=== Optimization ===\n{}\n", optimization.result);

        if let Some(count) = variations {
            let result = lab.variations(prompt, count).await?;
            println!("=== Variations ===\n{}\n", result);
        }
        Ok(())
    }

    // --- Introspection ---

    /// Print the known operations, optionally restricted to one category.
    pub fn print_operations(&self, category: Option<&str>) -> Result<()> {
        let categories: Vec<Category> = match category {
            Some(label) => vec![label.parse()?],
            None => self.dispatcher.categories().collect(),
        };
        for category in categories {
            println!("{}:", category);
            for key in self.dispatcher.list_operations(category) {
                println!("  {}", key);
            }
        }
        Ok(())
    }

    fn diffusion(&self) -> Result<&DiffusionClient> {
        self.diffusion
            .as_ref()
            .ok_or_else(|| anyhow!("diffusion backend not configured (ATELIER_DIFFUSION_URL)"))
    }
}

fn parse_provider(provider: Option<&str>) -> Result<Option<Provider>> {
    provider.map(str::parse).transpose()
}
