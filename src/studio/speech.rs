// Atelier Speech Processing
//
// Transcribe audio with the local Whisper engine, summarize the transcript
// with an LLM, and assemble a markdown report. Summary failure degrades to
// a note in the report rather than discarding the transcription.

use std::path::Path;

use anyhow::Result;
use chrono::Local;
use tracing::{info, warn};

use crate::studio::llm::{CompletionOptions, LlmClient};
use crate::studio::transcription::{format_timestamp, Transcript, TranscriptionEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Brief,
    Detailed,
    BulletPoints,
    MeetingMinutes,
}

impl SummaryKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "brief" | "简要" => SummaryKind::Brief,
            "bullet-points" | "要点" => SummaryKind::BulletPoints,
            "meeting-minutes" | "会议纪要" => SummaryKind::MeetingMinutes,
            _ => SummaryKind::Detailed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SummaryKind::Brief => "brief",
            SummaryKind::Detailed => "detailed",
            SummaryKind::BulletPoints => "bullet-points",
            SummaryKind::MeetingMinutes => "meeting-minutes",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpeechReport {
    pub transcript: Transcript,
    pub summary: String,
    pub markdown: String,
    pub audio_file: String,
}

pub fn build_summary_prompt(text: &str, kind: SummaryKind, language: &str) -> String {
    if language == "zh" {
        match kind {
            SummaryKind::Brief => {
                format!("请对以下文本进行简要总结（100-200字）：\n\n{text}")
            }
            SummaryKind::Detailed => format!(
                "请对以下文本进行详细分析和总结：\n\n文本内容：\n{text}\n\n\
                 请提供：\n1. 主要内容概述（200-300字）\n2. 关键要点列表（3-5个要点）\n\
                 3. 重要信息提取\n4. 总结建议或行动项（如适用）\n\n请以结构化的方式呈现："
            ),
            SummaryKind::BulletPoints => {
                format!("请提取以下文本的关键要点，以列表形式呈现：\n\n{text}")
            }
            SummaryKind::MeetingMinutes => format!(
                "请将以下会议录音转录内容整理为正式的会议纪要：\n\n录音内容：\n{text}\n\n\
                 请包含：\n1. 会议主题和时间\n2. 参会人员（如能识别）\n3. 讨论要点\n\
                 4. 决议事项\n5. 待办事项\n6. 下次会议安排（如有）\n\n请以专业的会议纪要格式呈现："
            ),
        }
    } else {
        match kind {
            SummaryKind::Brief => format!(
                "Please provide a brief summary (100-200 words) of the following text:\n\n{text}"
            ),
            SummaryKind::Detailed => format!(
                "Please provide a detailed analysis and summary of the following text:\n\n\
                 Content:\n{text}\n\n\
                 Please include:\n1. Main content overview (200-300 words)\n\
                 2. Key points list (3-5 points)\n3. Important information extraction\n\
                 4. Summary recommendations or action items (if applicable)\n\n\
                 Please present in a structured format:"
            ),
            SummaryKind::BulletPoints => format!(
                "Please extract the key points from the following text in list format:\n\n{text}"
            ),
            SummaryKind::MeetingMinutes => format!(
                "Please organize the following meeting transcription into formal meeting minutes:\n\n\
                 Transcription content:\n{text}\n\n\
                 Please include:\n1. Meeting topic and time\n2. Participants (if identifiable)\n\
                 3. Discussion points\n4. Decisions made\n5. Action items\n\
                 6. Next meeting arrangements (if any)\n\n\
                 Please present in professional meeting minutes format:"
            ),
        }
    }
}

pub fn format_report(transcript: &Transcript, summary: &str, audio_file: &str) -> String {
    let mut md = format!(
        "# Audio Transcription Report\n\n\
         ## Basics\n\
         - **Audio file**: {audio_file}\n\
         - **Language**: {language}\n\
         - **Duration**: {duration:.2} s\n\
         - **Processed**: {processed}\n\n\
         ## Summary\n\n{summary}\n\n\
         ## Full Transcript\n\n{text}\n\n\
         ## Timestamped Segments\n\n",
        audio_file = audio_file,
        language = transcript.language,
        duration = transcript.duration,
        processed = Local::now().format("%Y-%m-%d %H:%M:%S"),
        summary = summary,
        text = transcript.text,
    );

    for segment in &transcript.segments {
        md.push_str(&format!(
            "**{} - {}**\n{}\n\n",
            format_timestamp(segment.start),
            format_timestamp(segment.end),
            segment.text,
        ));
    }

    md.push_str("---\n\n*Generated automatically; refer to the original audio when in doubt.*\n");
    md
}

pub struct SpeechProcessor<'a> {
    engine: &'a TranscriptionEngine,
    llm: &'a LlmClient,
}

impl<'a> SpeechProcessor<'a> {
    pub fn new(engine: &'a TranscriptionEngine, llm: &'a LlmClient) -> Self {
        Self { engine, llm }
    }

    pub async fn transcribe_and_summarize(
        &self,
        audio: &Path,
        language: &str,
        kind: SummaryKind,
    ) -> Result<SpeechReport> {
        let transcript = self.engine.transcribe(audio, Some(language)).await?;

        info!("[EAR] Summarizing transcript ({})", kind.label());
        let prompt = build_summary_prompt(&transcript.text, kind, language);
        let options = CompletionOptions::default().with_max_tokens(2000);

        // The transcript is the valuable part; a failed summary shouldn't sink it.
        let summary = match self.llm.complete(&prompt, None, &options).await {
            Ok(text) => text,
            Err(e) => {
                warn!("[EAR] Summary generation failed: {}", e);
                format!("Summary unavailable: {e}")
            }
        };

        let audio_file = audio
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| audio.display().to_string());
        let markdown = format_report(&transcript, &summary, &audio_file);

        Ok(SpeechReport {
            transcript,
            summary,
            markdown,
            audio_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::studio::transcription::Segment;

    fn sample_transcript() -> Transcript {
        Transcript {
            text: "hello world this is a test".to_string(),
            segments: vec![
                Segment {
                    start: 0.0,
                    end: 2.5,
                    text: "hello world".to_string(),
                },
                Segment {
                    start: 2.5,
                    end: 5.0,
                    text: "this is a test".to_string(),
                },
            ],
            language: "en".to_string(),
            duration: 5.0,
        }
    }

    #[test]
    fn report_contains_summary_and_timestamps() {
        let md = format_report(&sample_transcript(), "A short test.", "clip.wav");
        assert!(md.contains("**Audio file**: clip.wav"));
        assert!(md.contains("A short test."));
        assert!(md.contains("**00:00:00.000 - 00:00:02.500**"));
        assert!(md.contains("this is a test"));
    }

    #[test]
    fn summary_prompt_follows_language_and_kind() {
        let zh = build_summary_prompt("正文", SummaryKind::MeetingMinutes, "zh");
        assert!(zh.contains("会议纪要"));
        let en = build_summary_prompt("body", SummaryKind::Brief, "en");
        assert!(en.contains("brief summary"));
        assert!(en.contains("body"));
    }

    #[test]
    fn summary_kind_parses_both_labels() {
        assert_eq!(SummaryKind::parse("要点"), SummaryKind::BulletPoints);
        assert_eq!(SummaryKind::parse("brief"), SummaryKind::Brief);
        assert_eq!(SummaryKind::parse("anything"), SummaryKind::Detailed);
    }
}
