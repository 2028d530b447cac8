// Atelier Main Entry Point

use atelier_core::capabilities::CapabilityRegistry;
use atelier_core::config::Settings;
use atelier_core::studio::core::StudioCore;
use atelier_core::studio::prompt_lab::structured_prompt;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "atelier")]
#[command(about = "AI content-creation studio", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an article on a topic
    Article {
        /// Article topic
        #[arg(short, long)]
        topic: String,

        /// Style: informative, narrative, persuasive, technical, casual
        #[arg(short, long, default_value = "informative")]
        style: String,

        /// Length: short, medium, long
        #[arg(short, long, default_value = "medium")]
        length: String,

        /// LLM provider: openai, deepseek, anthropic
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Generate a novel chapter
    Chapter {
        /// Plot summary for the chapter
        #[arg(long)]
        plot: String,

        /// Main characters
        #[arg(long, default_value = "")]
        characters: String,

        /// Background setting
        #[arg(long, default_value = "")]
        setting: String,

        /// Chapter number
        #[arg(short, long, default_value_t = 1)]
        number: u32,

        /// LLM provider: openai, deepseek, anthropic
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Generate a story outline
    Outline {
        /// Story theme
        #[arg(short, long)]
        theme: String,

        /// Genre
        #[arg(short, long, default_value = "modern")]
        genre: String,

        /// Target length
        #[arg(short, long, default_value = "novella")]
        length: String,

        /// LLM provider: openai, deepseek, anthropic
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Generate a structured video script
    Script {
        /// Video topic
        #[arg(short, long)]
        topic: String,

        /// Style: education, marketing, story, explainer, social
        #[arg(short, long, default_value = "education")]
        style: String,

        /// Target duration in seconds
        #[arg(short, long, default_value_t = 30)]
        duration: u32,

        /// LLM provider: openai, deepseek, anthropic
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Transcribe audio and summarize it
    Transcribe {
        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,

        /// Language hint: zh, en
        #[arg(short, long, default_value = "zh")]
        language: String,

        /// Summary kind: brief, detailed, bullet-points, meeting-minutes
        #[arg(short, long, default_value = "detailed")]
        summary: String,
    },

    /// Generate images from a text prompt
    Image {
        /// Image description
        #[arg(short, long)]
        prompt: String,

        /// Art style preset (e.g. realistic, anime, watercolor)
        #[arg(short, long, default_value = "realistic")]
        style: String,

        /// Image width in pixels
        #[arg(long, default_value_t = 512)]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value_t = 512)]
        height: u32,

        /// Number of images to generate
        #[arg(short, long, default_value_t = 1)]
        count: u32,

        /// Fixed seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Skip LLM prompt polishing
        #[arg(long)]
        raw: bool,
    },

    /// Apply a template-driven edit to an image
    Edit {
        /// Operation category, e.g. perspective, style, object-attribute
        #[arg(short, long)]
        category: String,

        /// Operation key within the category (see `atelier ops`)
        #[arg(short, long)]
        operation: String,

        /// Input image (optional for avatar generation)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Free-text value for the operation's placeholder
        #[arg(short, long)]
        value: Option<String>,

        /// Extra named parameter as key=value (repeatable)
        #[arg(long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// Skip LLM instruction polishing
        #[arg(long)]
        raw: bool,
    },

    /// Assemble images into a slideshow video
    Slideshow {
        /// Image file (repeatable)
        #[arg(short, long)]
        image: Vec<PathBuf>,

        /// Directory to collect images from
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Seconds each image is shown
        #[arg(short, long, default_value_t = 3.0)]
        seconds: f64,

        /// Output video path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Analyze and optimize a prompt
    Optimize {
        /// The prompt to work on
        #[arg(short, long)]
        prompt: String,

        /// Goal: full, clarity, specificity, structure, actionability
        #[arg(short, long, default_value = "full")]
        goal: String,

        /// Domain: general, writing, analysis, creative, technical, education, marketing
        #[arg(short, long, default_value = "general")]
        domain: String,

        /// Also generate this many prompt variations
        #[arg(long)]
        variations: Option<u32>,
    },

    /// Assemble a structured prompt locally (no backend call)
    Structure {
        /// What the prompt should accomplish
        #[arg(short, long)]
        task: String,

        /// Required output format
        #[arg(short, long, default_value = "free text")]
        format: String,

        /// Role context, e.g. "You are a reviewer"
        #[arg(short, long, default_value = "")]
        role: String,

        /// Constraint line (repeatable)
        #[arg(long = "constraint")]
        constraints: Vec<String>,

        /// Worked example (repeatable)
        #[arg(long = "example")]
        examples: Vec<String>,
    },

    /// List known editing operations
    Ops {
        /// Restrict to one category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show which features are available in this environment
    Capabilities,
}

fn parse_key_value(raw: &str) -> Result<(String, String)> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| anyhow!("expected key=value, got '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,hyper=warn,reqwest=warn");
    }
    tracing_subscriber::fmt::init();

    let settings = Settings::from_env();
    let registry = CapabilityRegistry::probe(&settings);
    let core = StudioCore::new(settings, registry)?;

    let args = Cli::parse();

    match args.command {
        Commands::Article {
            topic,
            style,
            length,
            provider,
        } => {
            let path = core
                .run_article(&topic, &style, &length, provider.as_deref())
                .await?;
            println!("Article saved to {}", path.display());
        }
        Commands::Chapter {
            plot,
            characters,
            setting,
            number,
            provider,
        } => {
            let path = core
                .run_chapter(&plot, &characters, &setting, number, provider.as_deref())
                .await?;
            println!("Chapter saved to {}", path.display());
        }
        Commands::Outline {
            theme,
            genre,
            length,
            provider,
        } => {
            let path = core
                .run_outline(&theme, &genre, &length, provider.as_deref())
                .await?;
            println!("Outline saved to {}", path.display());
        }
        Commands::Script {
            topic,
            style,
            duration,
            provider,
        } => {
            let path = core
                .run_video_script(&topic, &style, duration, provider.as_deref())
                .await?;
            println!("Video script saved to {}", path.display());
        }
        Commands::Transcribe {
            input,
            language,
            summary,
        } => {
            let path = core.run_transcription(&input, &language, &summary).await?;
            println!("Transcript saved to {}", path.display());
        }
        Commands::Image {
            prompt,
            style,
            width,
            height,
            count,
            seed,
            raw,
        } => {
            let paths = core
                .run_image(&prompt, &style, width, height, count, seed, !raw)
                .await?;
            for path in paths {
                println!("Image saved to {}", path.display());
            }
        }
        Commands::Edit {
            category,
            operation,
            input,
            value,
            params,
            raw,
        } => {
            let paths = core
                .run_edit(&category, &operation, input, value, params, !raw)
                .await?;
            for path in paths {
                println!("Edited image saved to {}", path.display());
            }
        }
        Commands::Slideshow {
            image,
            dir,
            seconds,
            output,
        } => {
            let path = core.run_slideshow(image, dir, seconds, output).await?;
            println!("Slideshow saved to {}", path.display());
        }
        Commands::Optimize {
            prompt,
            goal,
            domain,
            variations,
        } => {
            core.run_optimize(&prompt, &goal, &domain, variations).await?;
        }
        Commands::Structure {
            task,
            format,
            role,
            constraints,
            examples,
        } => {
            println!(
                "{}",
                structured_prompt(&task, &format, &role, &constraints, &examples)
            );
        }
        Commands::Ops { category } => {
            core.print_operations(category.as_deref())?;
        }
        Commands::Capabilities => {
            print!("{}", core.registry().summary());
        }
    }

    info!("[CORE] Done.");
    Ok(())
}
