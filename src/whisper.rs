use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use tempfile::NamedTempFile;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::config::WhisperModel;
use crate::transcript::{Transcript, TranscriptSegment};

/// The consumed transcription contract: decoded audio in, a transcript with
/// word-level timing out. The pipeline depends only on this shape.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript>;
}

/// Production transcriber backed by faster-whisper via Python
pub struct FasterWhisper {
    model: WhisperModel,
}

impl FasterWhisper {
    pub fn new(model: WhisperModel) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Transcriber for FasterWhisper {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        info!(
            "Transcribing with faster-whisper model: {}",
            self.model.as_str()
        );

        let script = create_whisper_script()?;
        let output = run_whisper_transcription(&script, audio_path, self.model.as_str()).await?;

        let segments: Vec<TranscriptSegment> = serde_json::from_str(&output)
            .context("Failed to parse whisper transcription output")?;

        info!("Transcription produced {} segments", segments.len());
        Ok(Transcript { segments })
    }
}

/// Write the faster-whisper driver script to a temp file.
///
/// Failures exit non-zero with the reason on stderr; an unreadable file or
/// model must abort the run, never come back as an empty transcript.
fn create_whisper_script() -> Result<NamedTempFile> {
    let script_content = r#"
import sys
import json
import os
from faster_whisper import WhisperModel

def transcribe_audio(model_size, audio_path):
    if not os.path.exists(audio_path):
        raise FileNotFoundError(f"Audio file not found: {audio_path}")

    print(f"Loading model: {model_size}", file=sys.stderr)
    model = WhisperModel(model_size, device="cpu", compute_type="int8")

    print(f"Transcribing: {audio_path}", file=sys.stderr)
    segments, info = model.transcribe(
        audio_path,
        word_timestamps=True,
        language="en"
    )

    result = []
    for segment in segments:
        segment_data = {
            "start": segment.start,
            "end": segment.end,
            "text": segment.text,
            "words": []
        }

        if segment.words:
            for word in segment.words:
                segment_data["words"].append({
                    "word": word.word,
                    "start": word.start,
                    "end": word.end,
                    "probability": word.probability
                })

        result.append(segment_data)

    print(f"Transcription complete: {len(result)} segments", file=sys.stderr)
    return result

if __name__ == "__main__":
    if len(sys.argv) != 3:
        print("Usage: python script.py <model_size> <audio_path>", file=sys.stderr)
        sys.exit(1)

    try:
        result = transcribe_audio(sys.argv[1], sys.argv[2])
    except Exception as e:
        print(f"Transcription failed: {e}", file=sys.stderr)
        sys.exit(1)

    print(json.dumps(result))
"#;

    let mut temp_file = NamedTempFile::new()
        .context("Failed to create temporary Python script")?;

    temp_file.write_all(script_content.as_bytes())
        .context("Failed to write Python script")?;

    temp_file.flush().context("Failed to flush Python script")?;

    Ok(temp_file)
}

/// Run the whisper transcription using Python
async fn run_whisper_transcription(
    script_path: &NamedTempFile,
    audio_path: &Path,
    model_size: &str,
) -> Result<String> {
    if !audio_path.exists() {
        anyhow::bail!("Audio file does not exist: {:?}", audio_path);
    }

    debug!(
        "Running whisper transcription: script={:?}, audio={:?}, model={}",
        script_path.path(),
        audio_path,
        model_size
    );

    let mut child = Command::new("python3")
        .args([
            script_path.path().to_str().context("Invalid script path")?,
            model_size,
            audio_path.to_str().context("Invalid audio path")?,
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context("Failed to spawn Python process. Make sure Python 3 and faster-whisper are installed.")?;

    let stdout = child.stdout.take().context("Failed to get stdout")?;
    let stderr = child.stderr.take().context("Failed to get stderr")?;

    let mut stdout_reader = BufReader::new(stdout);
    let mut output = String::new();
    let mut line = String::new();

    while stdout_reader.read_line(&mut line).await? > 0 {
        output.push_str(&line);
        line.clear();
    }

    let mut stderr_reader = BufReader::new(stderr);
    let mut error_output = String::new();
    line.clear();

    while stderr_reader.read_line(&mut line).await? > 0 {
        error_output.push_str(&line);
        line.clear();
    }

    let status = child.wait().await.context("Failed to wait for Python process")?;

    if !status.success() {
        anyhow::bail!("Whisper transcription failed: {}", error_output);
    }

    if !error_output.is_empty() {
        warn!("Whisper stderr output: {}", error_output);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_is_written_to_disk() {
        let script = create_whisper_script().unwrap();
        let contents = std::fs::read_to_string(script.path()).unwrap();
        assert!(contents.contains("from faster_whisper import WhisperModel"));
        assert!(contents.contains("word_timestamps=True"));
        assert!(contents.contains("sys.exit(1)"));
    }

    #[tokio::test]
    async fn test_missing_audio_file_is_rejected() {
        let script = create_whisper_script().unwrap();
        let result =
            run_whisper_transcription(&script, Path::new("/nonexistent/audio.wav"), "base").await;
        assert!(result.is_err());
    }
}
