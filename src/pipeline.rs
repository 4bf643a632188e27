use log::{debug, info};
use std::path::PathBuf;

use crate::audio::AudioTrack;
use crate::config::Config;
use crate::error::{config_error, fs_error, media_error, transcription_error, Result};
use crate::progress::ProgressOperation;
use crate::resources::TempFile;
use crate::transcript::{self, WordInterval};
use crate::video::MediaEngine;
use crate::whisper::Transcriber;

/// Pipeline stages, in execution order. Used to tag which transition a
/// failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AudioExtraction,
    Transcription,
    IntervalMatching,
    Censoring,
    Remux,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::AudioExtraction => "audio extraction",
            Stage::Transcription => "transcription",
            Stage::IntervalMatching => "interval matching",
            Stage::Censoring => "censoring",
            Stage::Remux => "remux",
        }
    }
}

/// Result of a `find` run: matched intervals, no media artifact
#[derive(Debug)]
pub struct FindOutcome {
    pub transcript_text: String,
    pub matched: Vec<WordInterval>,
}

/// Result of a `censor` run: matched intervals plus the censored video
#[derive(Debug)]
pub struct CensorOutcome {
    pub matched: Vec<WordInterval>,
    pub output_file: PathBuf,
}

/// Sequences extraction, transcription, matching, censoring and remux.
///
/// Owns its collaborators for the duration of one run; every stage blocks
/// until its collaborator completes, and the first failed transition aborts
/// the run tagged with the failing stage.
pub struct Pipeline {
    config: Config,
    transcriber: Box<dyn Transcriber>,
    media: Box<dyn MediaEngine>,
    progress: ProgressOperation,
}

impl Pipeline {
    pub fn new(
        config: Config,
        transcriber: Box<dyn Transcriber>,
        media: Box<dyn MediaEngine>,
        progress: ProgressOperation,
    ) -> Self {
        Self {
            config,
            transcriber,
            media,
            progress,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run extraction, transcription and matching, reporting matched
    /// intervals without producing a media artifact.
    pub async fn find(&self) -> Result<FindOutcome> {
        let (_audio, outcome) = self.match_intervals().await?;
        Ok(outcome)
    }

    /// Run the full pipeline and produce the censored video. The video
    /// stream of the output is a copy of the input's; only the audio track
    /// differs, and only inside the matched intervals.
    pub async fn censor(&self) -> Result<CensorOutcome> {
        let output_file = self
            .config
            .output_file
            .clone()
            .ok_or_else(|| config_error("output_file", "Output file is required for censoring"))?;

        let (extracted, found) = self.match_intervals().await?;

        if found.matched.is_empty() {
            info!("No target words detected, creating clean copy");
            tokio::fs::copy(&self.config.input_file, &output_file)
                .await
                .map_err(|e| fs_error(e, self.config.input_file.clone()))?;
            return Ok(CensorOutcome {
                matched: found.matched,
                output_file,
            });
        }

        let pb = self.progress.spinner("Splicing tone bursts over matches");
        let track = AudioTrack::load(extracted.path())?;
        let censored = track.censor(&found.matched, self.config.tone_frequency);
        debug!(
            "Track duration {}ms before and {}ms after censoring",
            track.duration_ms(),
            censored.duration_ms()
        );

        let censored_wav = tempfile::Builder::new()
            .prefix("bleep_censored_")
            .suffix(".wav")
            .tempfile()
            .map_err(|e| fs_error(e, std::env::temp_dir()))?;
        censored.save(censored_wav.path())?;
        self.progress
            .finish_spinner(pb, "Splicing tone bursts over matches");

        let pb = self.progress.spinner("Remuxing censored audio with video");
        self.media
            .remux(&self.config.input_file, censored_wav.path(), &output_file)
            .await
            .map_err(|e| {
                media_error(
                    format!("{} stage failed: {:#}", Stage::Remux.as_str(), e),
                    None,
                )
            })?;
        self.progress
            .finish_spinner(pb, "Remuxing censored audio with video");

        info!(
            "Censored {} intervals into {:?}",
            found.matched.len(),
            output_file
        );

        Ok(CensorOutcome {
            matched: found.matched,
            output_file,
        })
    }

    /// The shared front half of both operations: extract the audio track,
    /// transcribe it, and match intervals against the target list. Returns
    /// the extracted track so `censor` can splice into it.
    async fn match_intervals(&self) -> Result<(TempFile, FindOutcome)> {
        let pb = self.progress.spinner("Extracting audio from video");
        let extracted = self
            .media
            .extract_audio(&self.config.input_file)
            .await
            .map_err(|e| {
                media_error(
                    format!("{} stage failed: {:#}", Stage::AudioExtraction.as_str(), e),
                    None,
                )
            })?;
        self.progress
            .finish_spinner(pb, "Extracting audio from video");

        let pb = self.progress.spinner("Transcribing audio");
        let transcript = self
            .transcriber
            .transcribe(extracted.path())
            .await
            .map_err(|e| {
                transcription_error(
                    format!("{} stage failed: {:#}", Stage::Transcription.as_str(), e),
                    None,
                )
            })?;
        self.progress.finish_spinner(pb, "Transcribing audio");

        let intervals = transcript::flatten_intervals(&transcript);
        let matched = transcript::find_targets(
            &intervals,
            &self.config.target_words,
            self.config.match_threshold,
        );
        info!(
            "Matched {} of {} transcribed words",
            matched.len(),
            intervals.len()
        );

        Ok((
            extracted,
            FindOutcome {
                transcript_text: transcript.text(),
                matched,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioTrack;
    use crate::transcript::{Transcript, TranscriptSegment, TranscriptWord};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::fs::File;
    use std::path::Path;
    use tempfile::TempDir;

    struct FakeTranscriber {
        result: std::result::Result<Transcript, String>,
    }

    #[async_trait]
    impl Transcriber for FakeTranscriber {
        async fn transcribe(&self, _audio_path: &Path) -> anyhow::Result<Transcript> {
            match &self.result {
                Ok(t) => Ok(t.clone()),
                Err(msg) => Err(anyhow!("{}", msg)),
            }
        }
    }

    /// Media engine that extracts a constant-valued 16kHz mono track and
    /// remuxes by copying the audio file to the output path.
    struct FakeMedia {
        dir: TempDir,
        track_ms: u64,
    }

    impl FakeMedia {
        fn new(track_ms: u64) -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
                track_ms,
            }
        }
    }

    #[async_trait]
    impl MediaEngine for FakeMedia {
        async fn extract_audio(&self, _video_path: &Path) -> anyhow::Result<TempFile> {
            let path = self.dir.path().join("extracted.wav");
            let frames = (self.track_ms * 16) as usize;
            AudioTrack::new(vec![1000; frames], 16000, 1)
                .save(&path)
                .map_err(|e| anyhow!("{}", e))?;
            Ok(TempFile::new(path))
        }

        async fn remux(
            &self,
            _video_path: &Path,
            audio_path: &Path,
            output_path: &Path,
        ) -> anyhow::Result<()> {
            std::fs::copy(audio_path, output_path)?;
            Ok(())
        }
    }

    fn word(text: &str, start: f64, end: f64) -> TranscriptWord {
        TranscriptWord {
            word: text.to_string(),
            start,
            end,
        }
    }

    fn transcript(words: Vec<TranscriptWord>) -> Transcript {
        Transcript {
            segments: vec![TranscriptSegment {
                start: words.first().map(|w| w.start).unwrap_or(0.0),
                end: words.last().map(|w| w.end).unwrap_or(0.0),
                text: words
                    .iter()
                    .map(|w| w.word.clone())
                    .collect::<Vec<_>>()
                    .join(" "),
                words,
            }],
        }
    }

    fn test_config(dir: &TempDir) -> Config {
        let input = dir.path().join("input.mp4");
        File::create(&input).unwrap();
        Config::builder()
            .input_file(input)
            .output_file(dir.path().join("output.wav"))
            .target_words(vec!["damn".to_string()])
            .unwrap()
            .build()
            .unwrap()
    }

    fn pipeline(config: Config, transcriber: FakeTranscriber, media: FakeMedia) -> Pipeline {
        Pipeline::new(
            config,
            Box::new(transcriber),
            Box::new(media),
            ProgressOperation::new(false),
        )
    }

    #[tokio::test]
    async fn test_find_reports_matched_intervals_only() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let transcriber = FakeTranscriber {
            result: Ok(transcript(vec![
                word(" well", 0.2, 0.5),
                word(" Damn!", 1.2, 1.7),
                word(" that", 2.0, 2.3),
            ])),
        };

        let pipeline = pipeline(config, transcriber, FakeMedia::new(3000));
        let outcome = pipeline.find().await.unwrap();

        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].text, "Damn!");
        assert_eq!(outcome.matched[0].start, 1.2);
        assert!(outcome.transcript_text.contains("Damn!"));
    }

    #[tokio::test]
    async fn test_find_with_empty_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let transcriber = FakeTranscriber {
            result: Ok(Transcript::default()),
        };

        let pipeline = pipeline(config, transcriber, FakeMedia::new(1000));
        let outcome = pipeline.find().await.unwrap();
        assert!(outcome.matched.is_empty());
    }

    #[tokio::test]
    async fn test_censor_splices_exact_offsets() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let transcriber = FakeTranscriber {
            result: Ok(transcript(vec![
                word(" well", 0.2, 0.5),
                word(" Damn!", 1.2, 1.7),
            ])),
        };

        let pipeline = pipeline(config, transcriber, FakeMedia::new(3000));
        let outcome = pipeline.censor().await.unwrap();

        // the fake remux copies the censored WAV straight to the output
        let censored = AudioTrack::load(&outcome.output_file).unwrap();
        assert_eq!(censored.duration_ms(), 3000);
        // [1.2s, 1.7s) is samples [19200, 27200) at 16kHz; "well" is not
        // a target so [0.2s, 0.5s) must be untouched
        assert_eq!(censored.samples()[3300], 1000);
        assert_eq!(censored.samples()[19199], 1000);
        assert_ne!(censored.samples()[19201], 1000);
        assert_eq!(censored.samples()[27200], 1000);
    }

    #[tokio::test]
    async fn test_censor_without_matches_copies_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        std::fs::write(&config.input_file, b"fake video bytes").unwrap();
        let transcriber = FakeTranscriber {
            result: Ok(transcript(vec![word(" hello", 0.1, 0.4)])),
        };

        let pipeline = pipeline(config, transcriber, FakeMedia::new(1000));
        let outcome = pipeline.censor().await.unwrap();

        assert!(outcome.matched.is_empty());
        assert_eq!(
            std::fs::read(&outcome.output_file).unwrap(),
            b"fake video bytes"
        );
    }

    #[tokio::test]
    async fn test_transcription_failure_names_the_stage() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let transcriber = FakeTranscriber {
            result: Err("model exploded".to_string()),
        };

        let pipeline = pipeline(config, transcriber, FakeMedia::new(1000));
        let err = pipeline.find().await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("transcription stage failed"));
        assert!(message.contains("model exploded"));
    }
}
