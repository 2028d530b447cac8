// Prompt construction tests across the content, speech, and prompt-lab
// builders. These are pure functions; no backend is touched.

use atelier_core::studio::content::{
    build_article_prompt, build_chapter_prompt, build_outline_prompt,
};
use atelier_core::studio::prompt_lab::{extract_scores, structured_prompt};
use atelier_core::studio::speech::{build_summary_prompt, SummaryKind};

#[test]
fn article_prompt_maps_style_and_length() {
    let prompt = build_article_prompt("urban beekeeping", "casual", "long");
    assert!(prompt.contains("Topic: urban beekeeping"));
    assert!(prompt.contains("relaxed and conversational"));
    assert!(prompt.contains("2000-3000 words"));
}

#[test]
fn chapter_prompt_includes_optional_fields_only_when_given() {
    let bare = build_chapter_prompt("the bridge collapses", "", "", 7);
    assert!(bare.contains("Chapter number: 7"));
    assert!(bare.contains("Plot summary: the bridge collapses"));
    assert!(!bare.contains("Main characters:"));
    assert!(!bare.contains("Background setting:"));

    let full = build_chapter_prompt("the bridge collapses", "Ana, Theo", "1920s Lisbon", 7);
    assert!(full.contains("Main characters: Ana, Theo"));
    assert!(full.contains("Background setting: 1920s Lisbon"));
}

#[test]
fn outline_prompt_carries_all_three_inputs() {
    let prompt = build_outline_prompt("redemption", "noir", "novella");
    assert!(prompt.contains("Theme: redemption"));
    assert!(prompt.contains("Genre: noir"));
    assert!(prompt.contains("Length: novella"));
    assert!(prompt.contains("Chapter outline"));
}

#[test]
fn summary_kind_accepts_both_label_sets() {
    assert_eq!(SummaryKind::parse("brief"), SummaryKind::Brief);
    assert_eq!(SummaryKind::parse("简要"), SummaryKind::Brief);
    assert_eq!(SummaryKind::parse("bullet-points"), SummaryKind::BulletPoints);
    assert_eq!(SummaryKind::parse("要点"), SummaryKind::BulletPoints);
    assert_eq!(SummaryKind::parse("meeting-minutes"), SummaryKind::MeetingMinutes);
    // Unknown labels fall back to the detailed summary.
    assert_eq!(SummaryKind::parse("whatever"), SummaryKind::Detailed);
}

#[test]
fn summary_prompt_switches_language() {
    let zh = build_summary_prompt("原始文本", SummaryKind::Brief, "zh");
    assert!(zh.contains("原始文本"));
    assert!(zh.contains("总结"));

    let en = build_summary_prompt("raw transcript text", SummaryKind::Brief, "en");
    assert!(en.contains("raw transcript text"));
    assert!(en.to_lowercase().contains("summar"));
}

#[test]
fn summary_prompt_varies_by_kind() {
    let brief = build_summary_prompt("text", SummaryKind::Brief, "en");
    let minutes = build_summary_prompt("text", SummaryKind::MeetingMinutes, "en");
    assert_ne!(brief, minutes);
}

#[test]
fn score_extraction_tolerates_formatting_noise() {
    let analysis = "1. Clarity: 9/10, very direct\n\
                    2. Specificity — around 4 out of 10\n\
                    Overall assessment: 7";
    let scores = extract_scores(analysis);
    assert_eq!(scores.get("clarity"), Some(&9));
    assert_eq!(scores.get("specificity"), Some(&4));
    assert_eq!(scores.get("overall"), Some(&7));
}

#[test]
fn structured_prompt_orders_sections() {
    let out = structured_prompt(
        "Translate the text",
        "plain text",
        "You are a translator",
        &["Preserve names".to_string(), "No commentary".to_string()],
        &[],
    );

    let task = out.find("# Task Description").unwrap();
    let role = out.find("# Role").unwrap();
    let constraints = out.find("# Constraints").unwrap();
    let format = out.find("# Output Format").unwrap();
    let execution = out.find("# Execution").unwrap();
    assert!(task < role && role < constraints && constraints < format && format < execution);
    assert!(out.contains("2. No commentary"));
}
