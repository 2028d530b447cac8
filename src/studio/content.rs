// Atelier Content Generation
//
// Article, novel chapter, story outline, and video script generation. Each
// function is prompt construction plus one LLM call; persistence lives in
// artifacts.rs.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::studio::llm::{CompletionOptions, LlmClient, Provider};

#[derive(Debug, Clone)]
pub struct Generated {
    pub title: String,
    pub content: String,
    pub metadata: serde_json::Value,
}

pub fn article_style_hint(style: &str) -> &str {
    match style {
        "informative" => "informative and educational",
        "narrative" => "narrative and story-driven",
        "persuasive" => "persuasive and opinionated",
        "technical" => "technical and professional",
        "casual" => "relaxed and conversational",
        other => other,
    }
}

pub fn article_length_hint(length: &str) -> &str {
    match length {
        "short" => "500-800 words",
        "medium" => "1000-1500 words",
        "long" => "2000-3000 words",
        other => other,
    }
}

pub fn build_article_prompt(topic: &str, style: &str, length: &str) -> String {
    format!(
        "Please write an article following these requirements:\n\n\
         Topic: {topic}\n\
         Style: {style}\n\
         Length: {length}\n\n\
         Requirements:\n\
         1. Clear structure with an introduction, body, and conclusion\n\
         2. Original content with a well-defined point of view\n\
         3. Fluent language and coherent logic\n\
         4. Use headings and paragraph breaks where appropriate\n\
         5. Keep the content accurate and valuable\n\n\
         Output the article directly:",
        topic = topic,
        style = article_style_hint(style),
        length = article_length_hint(length),
    )
}

pub fn build_chapter_prompt(
    plot: &str,
    characters: &str,
    setting: &str,
    chapter_number: u32,
) -> String {
    let mut prompt = format!(
        "Please write a novel chapter based on this setup:\n\n\
         Chapter number: {chapter_number}\n\
         Plot summary: {plot}\n"
    );
    if !characters.is_empty() {
        prompt.push_str(&format!("Main characters: {characters}\n"));
    }
    if !setting.is_empty() {
        prompt.push_str(&format!("Background setting: {setting}\n"));
    }
    prompt.push_str(
        "\nRequirements:\n\
         1. Around 2000-3000 words\n\
         2. A plot that develops naturally with rises and falls\n\
         3. Distinct characters and natural dialogue\n\
         4. Vivid, visual description\n\
         5. Keep the story coherent and engaging\n\
         6. End the chapter on a hook or a twist\n\n\
         Output the chapter directly:",
    );
    prompt
}

pub fn build_outline_prompt(theme: &str, genre: &str, length: &str) -> String {
    format!(
        "Please create a detailed outline for a novel:\n\n\
         Theme: {theme}\n\
         Genre: {genre}\n\
         Length: {length}\n\n\
         Include the following:\n\
         1. Story overview (about 200 words)\n\
         2. Main character profiles (3-5 protagonists with name, personality, background)\n\
         3. Setting (time, place, social background)\n\
         4. Chapter outline (8-12 chapters with a brief plot each)\n\
         5. Main conflicts and turning points\n\
         6. The ending\n\n\
         Output in a structured format:"
    )
}

/// One scene of a video script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptScene {
    pub start_time: f64,
    pub end_time: f64,
    pub visual_description: String,
    pub narration: String,
    pub transition: String,
}

/// A structured video script as requested from the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoScript {
    pub title: String,
    pub duration: u32,
    pub scenes: Vec<ScriptScene>,
    pub full_narration: String,
    pub music_style: String,
    pub visual_style: String,
}

pub fn video_style_hint(style: &str) -> &str {
    match style {
        "education" | "教育" => "educational and informative, suited to learning and teaching",
        "marketing" | "营销" => "engaging marketing video highlighting a product or service",
        "story" | "故事" => "narrative video with a complete story arc",
        "explainer" | "解说" => "explainer video suited to walkthroughs and demonstrations",
        "social" | "社交" => "short social-media video, light and fun",
        other => other,
    }
}

pub fn build_video_script_prompt(topic: &str, style: &str, duration: u32) -> String {
    format!(
        "Please create a detailed script for a {duration}-second video:\n\n\
         Topic: {topic}\n\
         Video style: {style}\n\
         Duration: {duration} seconds\n\n\
         Provide:\n\
         1. An attention-grabbing title\n\
         2. Opening introduction (3-5 seconds)\n\
         3. Main content segments (5-10 seconds each, with a visual description\n\
            and narration for each)\n\
         4. Closing summary (3-5 seconds)\n\
         5. A suggested background music style and transition effects\n\n\
         Return JSON with the fields: title, duration, scenes (each scene with\n\
         start_time, end_time, visual_description, narration, transition),\n\
         full_narration, music_style, visual_style. Return only the JSON.",
        topic = topic,
        style = video_style_hint(style),
        duration = duration,
    )
}

/// Parse the LLM reply into a script. A reply that isn't valid JSON (with or
/// without a code fence) degrades to a single full-length scene carrying the
/// raw text as narration.
pub fn parse_video_script(reply: &str, topic: &str, duration: u32) -> VideoScript {
    let body = reply
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    if let Ok(script) = serde_json::from_str::<VideoScript>(body) {
        return script;
    }

    let narration: String = if reply.chars().count() > 500 {
        let head: String = reply.chars().take(500).collect();
        format!("{head}...")
    } else {
        reply.to_string()
    };

    VideoScript {
        title: format!("{topic} - video"),
        duration,
        scenes: vec![ScriptScene {
            start_time: 0.0,
            end_time: duration as f64,
            visual_description: "Visuals derived from the topic".to_string(),
            narration,
            transition: "fade".to_string(),
        }],
        full_narration: reply.to_string(),
        music_style: "background".to_string(),
        visual_style: "clean and modern".to_string(),
    }
}

pub fn render_script_markdown(script: &VideoScript) -> String {
    let mut md = String::from("## Scenes\n\n");
    for scene in &script.scenes {
        md.push_str(&format!(
            "### {:.0}s - {:.0}s\n\
             - **Visual**: {}\n\
             - **Narration**: {}\n\
             - **Transition**: {}\n\n",
            scene.start_time,
            scene.end_time,
            scene.visual_description,
            scene.narration,
            scene.transition,
        ));
    }
    md.push_str(&format!(
        "## Full Narration\n\n{}\n\n\
         - **Music**: {}\n\
         - **Visual style**: {}\n",
        script.full_narration, script.music_style, script.visual_style,
    ));
    md
}

pub struct ContentGenerator<'a> {
    llm: &'a LlmClient,
}

impl<'a> ContentGenerator<'a> {
    pub fn new(llm: &'a LlmClient) -> Self {
        Self { llm }
    }

    pub async fn generate_article(
        &self,
        topic: &str,
        style: &str,
        length: &str,
        provider: Option<Provider>,
    ) -> Result<Generated> {
        info!("[WRITER] Generating article on '{}'", topic);
        let prompt = build_article_prompt(topic, style, length);
        let options = CompletionOptions::default().with_max_tokens(3000);
        let content = self.llm.complete(&prompt, provider, &options).await?;

        Ok(Generated {
            title: format!("Article on {topic}"),
            metadata: json!({
                "kind": "article",
                "topic": topic,
                "style": style,
                "length": length,
                "word_count": content.chars().count(),
            }),
            content,
        })
    }

    pub async fn generate_novel_chapter(
        &self,
        plot: &str,
        characters: &str,
        setting: &str,
        chapter_number: u32,
        provider: Option<Provider>,
    ) -> Result<Generated> {
        info!("[WRITER] Generating chapter {}", chapter_number);
        let prompt = build_chapter_prompt(plot, characters, setting, chapter_number);
        let options = CompletionOptions::default()
            .with_max_tokens(4000)
            .with_temperature(0.8);
        let content = self.llm.complete(&prompt, provider, &options).await?;

        Ok(Generated {
            title: format!("Chapter {chapter_number}"),
            metadata: json!({
                "kind": "novel-chapter",
                "chapter_number": chapter_number,
                "plot": plot,
                "characters": characters,
                "setting": setting,
                "word_count": content.chars().count(),
            }),
            content,
        })
    }

    pub async fn generate_story_outline(
        &self,
        theme: &str,
        genre: &str,
        length: &str,
        provider: Option<Provider>,
    ) -> Result<Generated> {
        info!("[WRITER] Generating story outline for '{}'", theme);
        let prompt = build_outline_prompt(theme, genre, length);
        let options = CompletionOptions::default().with_max_tokens(3000);
        let content = self.llm.complete(&prompt, provider, &options).await?;

        Ok(Generated {
            title: format!("{theme} story outline"),
            metadata: json!({
                "kind": "story-outline",
                "theme": theme,
                "genre": genre,
                "length": length,
            }),
            content,
        })
    }

    pub async fn generate_video_script(
        &self,
        topic: &str,
        style: &str,
        duration: u32,
        provider: Option<Provider>,
    ) -> Result<Generated> {
        info!("[WRITER] Generating {}s video script for '{}'", duration, topic);
        let prompt = build_video_script_prompt(topic, style, duration);
        let options = CompletionOptions::default().with_max_tokens(3000);
        let reply = self.llm.complete(&prompt, provider, &options).await?;
        let script = parse_video_script(&reply, topic, duration);

        Ok(Generated {
            title: script.title.clone(),
            content: render_script_markdown(&script),
            metadata: json!({
                "kind": "video-script",
                "topic": topic,
                "style": style,
                "duration": script.duration,
                "scene_count": script.scenes.len(),
                "music_style": script.music_style,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_prompt_carries_topic_and_mappings() {
        let prompt = build_article_prompt("rust async", "technical", "short");
        assert!(prompt.contains("rust async"));
        assert!(prompt.contains("technical and professional"));
        assert!(prompt.contains("500-800 words"));
    }

    #[test]
    fn chapter_prompt_skips_empty_optional_fields() {
        let prompt = build_chapter_prompt("a heist goes wrong", "", "", 3);
        assert!(prompt.contains("Chapter number: 3"));
        assert!(!prompt.contains("Main characters:"));
        assert!(!prompt.contains("Background setting:"));

        let prompt = build_chapter_prompt("a heist goes wrong", "Mara, Vex", "", 3);
        assert!(prompt.contains("Main characters: Mara, Vex"));
    }

    #[test]
    fn unknown_style_passes_through() {
        assert_eq!(article_style_hint("noir"), "noir");
        assert_eq!(article_length_hint("epic"), "epic");
    }

    #[test]
    fn video_script_prompt_carries_topic_style_and_duration() {
        let prompt = build_video_script_prompt("coffee brewing", "explainer", 45);
        assert!(prompt.contains("45-second video"));
        assert!(prompt.contains("Topic: coffee brewing"));
        assert!(prompt.contains("walkthroughs and demonstrations"));
        assert!(prompt.contains("full_narration"));
    }

    #[test]
    fn valid_script_json_parses_even_inside_a_code_fence() {
        let reply = r#"```json
        {
            "title": "Brew Better Coffee",
            "duration": 30,
            "scenes": [
                {
                    "start_time": 0,
                    "end_time": 5,
                    "visual_description": "beans pouring",
                    "narration": "It starts with the beans.",
                    "transition": "fade in"
                }
            ],
            "full_narration": "It starts with the beans.",
            "music_style": "lo-fi",
            "visual_style": "warm tones"
        }
        ```"#;
        let script = parse_video_script(reply, "coffee", 30);
        assert_eq!(script.title, "Brew Better Coffee");
        assert_eq!(script.scenes.len(), 1);
        assert_eq!(script.scenes[0].transition, "fade in");
    }

    #[test]
    fn prose_reply_degrades_to_a_single_scene() {
        let script = parse_video_script("Here is an outline instead of JSON.", "coffee", 30);
        assert_eq!(script.duration, 30);
        assert_eq!(script.scenes.len(), 1);
        assert_eq!(script.scenes[0].end_time, 30.0);
        assert!(script.full_narration.contains("outline instead of JSON"));

        let md = render_script_markdown(&script);
        assert!(md.contains("## Scenes"));
        assert!(md.contains("## Full Narration"));
    }
}
