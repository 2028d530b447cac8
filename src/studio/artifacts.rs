// Atelier Artifact Store
//
// Everything generated lands under one output root, one subdirectory per
// artifact kind. Text artifacts are markdown with an appended metadata
// block; binary artifacts get a sibling .json metadata record.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Article,
    Audio,
    Image,
    EditedImage,
    Video,
}

impl ArtifactKind {
    fn subdir(&self) -> &'static str {
        match self {
            ArtifactKind::Article => "articles",
            ArtifactKind::Audio => "audio",
            ArtifactKind::Image => "images",
            ArtifactKind::EditedImage => "images/edited",
            ArtifactKind::Video => "videos",
        }
    }
}

pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: &Path) -> Result<Self> {
        let store = Self {
            root: root.to_path_buf(),
        };
        for kind in [
            ArtifactKind::Article,
            ArtifactKind::Audio,
            ArtifactKind::Image,
            ArtifactKind::EditedImage,
            ArtifactKind::Video,
        ] {
            std::fs::create_dir_all(store.dir(kind))
                .with_context(|| format!("creating output directory for {:?}", kind))?;
        }
        Ok(store)
    }

    pub fn dir(&self, kind: ArtifactKind) -> PathBuf {
        self.root.join(kind.subdir())
    }

    /// Save markdown with an appended key-value metadata block.
    pub fn save_markdown(
        &self,
        kind: ArtifactKind,
        title: &str,
        body: &str,
        metadata: &serde_json::Value,
    ) -> Result<PathBuf> {
        let filename = format!("{}_{}.md", timestamp(), sanitize_stem(title));
        let path = self.dir(kind).join(filename);

        let mut doc = format!("# {title}\n\n{body}\n\n---\n\n## Metadata\n");
        if let Some(map) = metadata.as_object() {
            for (key, value) in map {
                let rendered = match value.as_str() {
                    Some(s) => s.to_string(),
                    None => value.to_string(),
                };
                doc.push_str(&format!("- **{key}**: {rendered}\n"));
            }
        }
        doc.push_str(&format!("- **saved_at**: {}\n", Local::now().to_rfc3339()));

        std::fs::write(&path, doc).with_context(|| format!("writing {:?}", path))?;
        info!("[STORE] Saved {:?}", path);
        Ok(path)
    }

    /// Save a raw markdown document as-is (already fully formatted).
    pub fn save_document(&self, kind: ArtifactKind, stem: &str, body: &str) -> Result<PathBuf> {
        let filename = format!("{}_{}.md", timestamp(), sanitize_stem(stem));
        let path = self.dir(kind).join(filename);
        std::fs::write(&path, body).with_context(|| format!("writing {:?}", path))?;
        info!("[STORE] Saved {:?}", path);
        Ok(path)
    }

    /// Save binary bytes plus a sibling .json metadata record.
    pub fn save_binary(
        &self,
        kind: ArtifactKind,
        stem: &str,
        extension: &str,
        bytes: &[u8],
        metadata: &serde_json::Value,
    ) -> Result<PathBuf> {
        let base = format!("{}_{}", timestamp(), sanitize_stem(stem));
        let path = self.dir(kind).join(format!("{base}.{extension}"));
        std::fs::write(&path, bytes).with_context(|| format!("writing {:?}", path))?;

        let meta_path = self.dir(kind).join(format!("{base}.json"));
        let record = serde_json::to_string_pretty(metadata)?;
        std::fs::write(&meta_path, record).with_context(|| format!("writing {:?}", meta_path))?;

        info!("[STORE] Saved {:?} (+ metadata record)", path);
        Ok(path)
    }
}

fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Filesystem-safe stem, truncated the way the source truncated titles.
fn sanitize_stem(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.chars().take(20).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn markdown_gets_metadata_block() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();
        let path = store
            .save_markdown(
                ArtifactKind::Article,
                "Test Article",
                "Body text.",
                &json!({ "topic": "testing", "word_count": 2 }),
            )
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Test Article"));
        assert!(content.contains("Body text."));
        assert!(content.contains("## Metadata"));
        assert!(content.contains("- **topic**: testing"));
        assert!(content.contains("- **word_count**: 2"));
    }

    #[test]
    fn binary_artifact_gets_sibling_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();
        let path = store
            .save_binary(
                ArtifactKind::Image,
                "seed_42",
                "png",
                &[0x89, 0x50],
                &json!({ "seed": 42 }),
            )
            .unwrap();

        assert_eq!(path.extension().unwrap(), "png");
        let meta_path = path.with_extension("json");
        let record: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(meta_path).unwrap()).unwrap();
        assert_eq!(record["seed"], 42);
    }

    #[test]
    fn stems_are_sanitized_and_truncated() {
        assert_eq!(sanitize_stem("a b/c"), "a_b_c");
        assert_eq!(sanitize_stem(&"x".repeat(40)).len(), 20);
    }
}
