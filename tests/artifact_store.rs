// Artifact store integration tests against a temporary output root.

use atelier_core::studio::artifacts::{ArtifactKind, ArtifactStore};
use serde_json::json;

#[test]
fn store_creates_all_output_directories() {
    let dir = tempfile::tempdir().unwrap();
    let _store = ArtifactStore::new(dir.path()).unwrap();

    for sub in ["articles", "audio", "images", "images/edited", "videos"] {
        assert!(dir.path().join(sub).is_dir(), "missing {sub}");
    }
}

#[test]
fn markdown_artifact_has_title_body_and_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path()).unwrap();

    let path = store
        .save_markdown(
            ArtifactKind::Article,
            "Night Markets of Taipei",
            "Body paragraph.",
            &json!({ "kind": "article", "topic": "markets" }),
        )
        .unwrap();

    assert!(path.starts_with(dir.path().join("articles")));
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# Night Markets of Taipei"));
    assert!(content.contains("Body paragraph."));
    assert!(content.contains("## Metadata"));
    assert!(content.contains("- **topic**: markets"));
    assert!(content.contains("- **saved_at**: "));
}

#[test]
fn document_artifact_is_written_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path()).unwrap();

    let body = "# Report\n\nAlready formatted.\n";
    let path = store
        .save_document(ArtifactKind::Audio, "clip_transcript", body)
        .unwrap();

    assert!(path.starts_with(dir.path().join("audio")));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), body);
}

#[test]
fn binary_artifact_carries_sibling_metadata_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path()).unwrap();

    let bytes = [0x89u8, 0x50, 0x4e, 0x47];
    let path = store
        .save_binary(
            ArtifactKind::EditedImage,
            "edited_1_seed_99",
            "png",
            &bytes,
            &json!({ "seed": 99, "operation": "改变颜色" }),
        )
        .unwrap();

    assert!(path.starts_with(dir.path().join("images/edited")));
    assert_eq!(std::fs::read(&path).unwrap(), bytes);

    let record: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path.with_extension("json")).unwrap())
            .unwrap();
    assert_eq!(record["seed"], 99);
    assert_eq!(record["operation"], "改变颜色");
}

#[test]
fn awkward_titles_become_safe_filenames() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path()).unwrap();

    let path = store
        .save_markdown(
            ArtifactKind::Article,
            "a/b: c? a very very long title indeed",
            "x",
            &json!({}),
        )
        .unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(!name.contains('/') && !name.contains(':') && !name.contains('?'));
    assert!(name.ends_with(".md"));
}
