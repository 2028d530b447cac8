// Atelier Speech-to-Text
//
// Local Whisper transcription via whisper-rs. GGML models are fetched once
// from ggerganov/whisper.cpp through hf-hub and cached on disk. Audio comes
// in as WAV; 16kHz mono gets a fast path, everything else is downmixed and
// resampled in memory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use hf_hub::api::sync::Api;
use serde::{Deserialize, Serialize};
use tracing::info;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// The full result handed back to the feature layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub segments: Vec<Segment>,
    pub language: String,
    /// Audio duration in seconds, derived from the decoded samples.
    pub duration: f64,
}

pub struct TranscriptionEngine {
    model_path: PathBuf,
}

impl TranscriptionEngine {
    pub async fn new(model_name: &str, cache_dir: Option<PathBuf>) -> Result<Self> {
        let model_name = model_name.to_string();
        let model_path =
            tokio::task::spawn_blocking(move || ensure_model(&model_name, cache_dir)).await??;
        Ok(Self { model_path })
    }

    /// Transcribe a WAV file. `language` is a two-letter hint ("zh", "en");
    /// `None` lets Whisper auto-detect.
    pub async fn transcribe(&self, audio: &Path, language: Option<&str>) -> Result<Transcript> {
        info!("[EAR] Transcribing {:?}", audio);

        let audio = audio.to_path_buf();
        let model_path = self.model_path.clone();
        let language = language.map(str::to_string);

        let transcript = tokio::task::spawn_blocking(move || {
            transcribe_blocking(&model_path, &audio, language.as_deref())
        })
        .await??;

        info!(
            "[EAR] Transcription complete: {} segments, {:.1}s of audio",
            transcript.segments.len(),
            transcript.duration
        );
        Ok(transcript)
    }
}

/// Locate or download the GGML model.
fn ensure_model(model_name: &str, cache_dir: Option<PathBuf>) -> Result<PathBuf> {
    let base_dir = cache_dir
        .or_else(|| dirs::cache_dir().map(|d| d.join("atelier")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("models");
    fs::create_dir_all(&base_dir)?;

    let filename = format!("ggml-{}.bin", model_name);
    let model_path = base_dir.join(&filename);

    if model_path.exists() {
        info!("[EAR] Found cached Whisper model: {:?}", model_path);
        return Ok(model_path);
    }

    info!("[EAR] Downloading Whisper model: {}...", filename);
    let api = Api::new()?;
    let repo = api.model("ggerganov/whisper.cpp".to_string());
    let downloaded = repo.get(&filename)?;
    fs::copy(&downloaded, &model_path)?;

    info!("[EAR] Model cached at {:?}", model_path);
    Ok(model_path)
}

fn transcribe_blocking(
    model_path: &Path,
    audio_path: &Path,
    language: Option<&str>,
) -> Result<Transcript> {
    let pcm_data = load_wav_as_16k_mono(audio_path)?;
    let duration = pcm_data.len() as f64 / 16_000.0;

    let ctx = WhisperContext::new_with_params(
        model_path
            .to_str()
            .ok_or_else(|| anyhow!("non-UTF8 model path: {:?}", model_path))?,
        WhisperContextParameters::default(),
    )
    .map_err(|e| anyhow!("Failed to load Whisper model: {:?}", e))?;

    let mut state = ctx.create_state().context("Create Whisper state")?;

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
    params.set_print_special(false);
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);
    if let Some(lang) = language {
        params.set_language(Some(lang));
    }

    let num_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4) as i32;
    params.set_n_threads(num_threads);

    state.full(params, &pcm_data).context("Running inference")?;

    let num_segments = state.full_n_segments().context("Segment count")?;
    let mut segments = Vec::new();
    let mut text = String::new();

    for i in 0..num_segments {
        // Whisper reports centiseconds.
        let start = state.full_get_segment_t0(i).unwrap_or(0) as f64 / 100.0;
        let end = state.full_get_segment_t1(i).unwrap_or(0) as f64 / 100.0;
        let seg_text = state.full_get_segment_text(i).unwrap_or_default();

        text.push_str(&seg_text);
        segments.push(Segment {
            start,
            end,
            text: seg_text.trim().to_string(),
        });
    }

    Ok(Transcript {
        text: text.trim().to_string(),
        segments,
        language: language.unwrap_or("auto").to_string(),
        duration,
    })
}

fn load_wav_as_16k_mono(audio_path: &Path) -> Result<Vec<f32>> {
    let mut reader = hound::WavReader::open(audio_path)
        .with_context(|| format!("opening WAV file {:?}", audio_path))?;
    let spec = reader.spec();

    // Decode to normalized f32 regardless of on-disk format. A decode error
    // aborts instead of producing a shortened or silent sample buffer.
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .context("Decoding float WAV samples")?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()
                .context("Decoding integer WAV samples")?
        }
    };

    let channels = spec.channels as usize;
    if channels == 0 {
        anyhow::bail!("WAV file reports zero channels: {:?}", audio_path);
    }

    let mono: Vec<f32> = if channels == 1 {
        samples
    } else {
        samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    if spec.sample_rate == 16_000 {
        return Ok(mono);
    }

    info!(
        "[EAR] Resampling {} Hz ({} ch) to 16 kHz mono",
        spec.sample_rate, spec.channels
    );

    // Linear interpolation between neighboring source samples.
    let step = spec.sample_rate as f64 / 16_000.0;
    let out_len = (mono.len() as f64 / step) as usize;
    let mut pcm = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let pos = i as f64 * step;
        let idx = pos as usize;
        let frac = (pos - idx as f64) as f32;
        let a = mono[idx];
        let b = *mono.get(idx + 1).unwrap_or(&a);
        pcm.push(a + (b - a) * frac);
    }
    Ok(pcm)
}

/// Render seconds as `HH:MM:SS.mmm` for transcript reports. Rounds to whole
/// milliseconds first so e.g. 59.9996s carries into the minute instead of
/// printing as `00:00:60.000`.
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) as f64 / 1000.0;
    format!("{:02}:{:02}:{:06.3}", hours, minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_formatting() {
        assert_eq!(format_timestamp(0.0), "00:00:00.000");
        assert_eq!(format_timestamp(61.5), "00:01:01.500");
        assert_eq!(format_timestamp(3661.25), "01:01:01.250");
    }

    #[test]
    fn timestamps_near_a_minute_boundary_carry_over() {
        assert_eq!(format_timestamp(59.9996), "00:01:00.000");
        assert_eq!(format_timestamp(3599.9999), "01:00:00.000");
        assert_eq!(format_timestamp(-0.0001), "00:00:00.000");
    }

    fn int_spec(channels: u16, sample_rate: u32) -> hound::WavSpec {
        hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        }
    }

    #[test]
    fn float_wavs_decode_with_real_amplitudes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f32.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..100 {
            writer.write_sample(0.5f32).unwrap();
        }
        writer.finalize().unwrap();

        let pcm = load_wav_as_16k_mono(&path).unwrap();
        assert_eq!(pcm.len(), 100);
        assert!(pcm.iter().all(|&s| (s - 0.5).abs() < 1e-6));
    }

    #[test]
    fn stereo_int_wavs_downmix_to_the_channel_average() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let mut writer = hound::WavWriter::create(&path, int_spec(2, 16_000)).unwrap();
        for _ in 0..50 {
            writer.write_sample(16384i16).unwrap();
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        let pcm = load_wav_as_16k_mono(&path).unwrap();
        assert_eq!(pcm.len(), 50);
        assert!(pcm.iter().all(|&s| (s - 0.25).abs() < 1e-4));
    }

    #[test]
    fn off_rate_audio_resamples_to_16k() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("8k.wav");
        let mut writer = hound::WavWriter::create(&path, int_spec(1, 8_000)).unwrap();
        for i in 0..80i16 {
            writer.write_sample(i * 100).unwrap();
        }
        writer.finalize().unwrap();

        let pcm = load_wav_as_16k_mono(&path).unwrap();
        assert_eq!(pcm.len(), 160);
        // Interpolated midpoints sit between their neighbors.
        assert!(pcm.windows(2).all(|w| w[0] <= w[1]));
    }
}
