// Atelier Slideshow Assembly
//
// Turns an image sequence into an H.264 video via ffmpeg's concat demuxer.
// The per-image duration is fixed across the slideshow; frames are scaled
// and padded to a uniform size so mixed-resolution inputs concatenate.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tracing::info;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

#[derive(Debug, Clone)]
pub struct SlideshowSpec {
    pub images: Vec<PathBuf>,
    pub seconds_per_image: f64,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for SlideshowSpec {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            seconds_per_image: 3.0,
            width: 1280,
            height: 720,
            fps: 30,
        }
    }
}

impl SlideshowSpec {
    pub fn total_duration(&self) -> f64 {
        self.images.len() as f64 * self.seconds_per_image
    }
}

#[derive(Debug)]
pub struct SlideshowResult {
    pub video_path: PathBuf,
    pub total_duration: f64,
    pub size_mb: f64,
}

/// Collect image files from a directory, sorted by path for a stable order.
pub fn collect_images(dir: &Path) -> Vec<PathBuf> {
    let mut images: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    images.sort();
    images
}

/// The concat-demuxer input list. Each entry carries its display duration;
/// ffmpeg wants the last file repeated without one.
pub fn concat_manifest(spec: &SlideshowSpec) -> String {
    let mut out = String::new();
    for image in &spec.images {
        out.push_str(&format!(
            "file '{}'\nduration {}\n",
            image.display(),
            spec.seconds_per_image
        ));
    }
    if let Some(last) = spec.images.last() {
        out.push_str(&format!("file '{}'\n", last.display()));
    }
    out
}

pub async fn assemble(spec: &SlideshowSpec, output: &Path) -> Result<SlideshowResult> {
    if spec.images.is_empty() {
        bail!("slideshow needs at least one image");
    }
    for image in &spec.images {
        if !image.exists() {
            bail!("image not found: {:?}", image);
        }
    }

    info!(
        "[REEL] Assembling slideshow: {} images, {:.1}s each",
        spec.images.len(),
        spec.seconds_per_image
    );

    let manifest_path = output.with_extension("concat.txt");
    std::fs::write(&manifest_path, concat_manifest(spec))
        .context("Writing concat manifest")?;

    // scale to fit, pad to exact size, force even dimensions for yuv420p
    let filter = format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:color=black,format=yuv420p",
        w = spec.width,
        h = spec.height
    );

    let status = Command::new("ffmpeg")
        .args([
            "-y",
            "-f",
            "concat",
            "-safe",
            "0",
            "-i",
        ])
        .arg(&manifest_path)
        .args(["-vf", &filter, "-r", &spec.fps.to_string(), "-c:v", "libx264", "-pix_fmt", "yuv420p"])
        .arg(output)
        .status()
        .await
        .context("Spawning ffmpeg")?;

    let _ = std::fs::remove_file(&manifest_path);

    if !status.success() {
        bail!("ffmpeg slideshow assembly failed");
    }

    let metadata = std::fs::metadata(output)?;
    let size_mb = metadata.len() as f64 / 1_048_576.0;
    info!("[REEL] Slideshow complete: {:?} ({:.2} MB)", output, size_mb);

    Ok(SlideshowResult {
        video_path: output.to_path_buf(),
        total_duration: spec.total_duration(),
        size_mb,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_repeats_last_frame_without_duration() {
        let spec = SlideshowSpec {
            images: vec![PathBuf::from("a.png"), PathBuf::from("b.png")],
            seconds_per_image: 2.5,
            ..Default::default()
        };
        let manifest = concat_manifest(&spec);
        assert_eq!(
            manifest,
            "file 'a.png'\nduration 2.5\nfile 'b.png'\nduration 2.5\nfile 'b.png'\n"
        );
        assert_eq!(spec.total_duration(), 5.0);
    }

    #[test]
    fn collect_images_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["one.png", "two.JPG", "notes.txt", "three.webp"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let images = collect_images(dir.path());
        assert_eq!(images.len(), 3);
        assert!(images.iter().all(|p| p.extension().is_some()));
    }
}
