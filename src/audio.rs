use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, info};
use std::f32::consts::TAU;
use std::path::Path;

use crate::error::{audio_error, Result};
use crate::transcript::WordInterval;

/// Default tone frequency in Hz for censoring bursts
pub const DEFAULT_TONE_FREQUENCY: f32 = 1000.0;

/// Tone amplitude as a fraction of i16 full scale
const TONE_AMPLITUDE: f32 = 0.3;

/// Audio format the extraction step produces for whisper processing
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub format: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000, // Whisper prefers 16kHz
            channels: 1,        // Mono audio
            format: "wav".to_string(),
        }
    }
}

/// An audio track as interleaved 16-bit PCM samples, addressable by
/// millisecond offset
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTrack {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

impl AudioTrack {
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// Read a 16-bit PCM WAV file into memory
    pub fn load(path: &Path) -> Result<Self> {
        let reader = WavReader::open(path)
            .map_err(|e| audio_error(format!("Failed to open WAV file {:?}: {}", path, e)))?;
        let spec = reader.spec();

        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(audio_error(format!(
                "Expected 16-bit PCM WAV, got {}-bit {:?} from {:?}",
                spec.bits_per_sample, spec.sample_format, path
            )));
        }

        let samples = reader
            .into_samples::<i16>()
            .collect::<std::result::Result<Vec<i16>, hound::Error>>()
            .map_err(|e| audio_error(format!("Failed to read samples from {:?}: {}", path, e)))?;

        debug!(
            "Loaded {} samples ({} Hz, {} ch) from {:?}",
            samples.len(),
            spec.sample_rate,
            spec.channels,
            path
        );

        Ok(Self::new(samples, spec.sample_rate, spec.channels))
    }

    /// Write the track back out as a 16-bit PCM WAV file
    pub fn save(&self, path: &Path) -> Result<()> {
        let spec = WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut writer = WavWriter::create(path, spec)
            .map_err(|e| audio_error(format!("Failed to create WAV file {:?}: {}", path, e)))?;
        for &sample in &self.samples {
            writer
                .write_sample(sample)
                .map_err(|e| audio_error(format!("Failed to write sample to {:?}: {}", path, e)))?;
        }
        writer
            .finalize()
            .map_err(|e| audio_error(format!("Failed to finalize WAV file {:?}: {}", path, e)))?;

        Ok(())
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    pub fn duration_ms(&self) -> u64 {
        self.frames() as u64 * 1000 / self.sample_rate as u64
    }

    /// Interleaved sample index for a millisecond offset, clamped to the
    /// track length
    fn sample_index_at_ms(&self, ms: u64) -> usize {
        let frame = ms * self.sample_rate as u64 / 1000;
        let index = frame as usize * self.channels as usize;
        index.min(self.samples.len())
    }

    /// Produce a copy of the track with a tone burst spliced over each
    /// matched interval.
    ///
    /// Second offsets are truncated to milliseconds and resolved against
    /// this (original) track, and every burst contains exactly as many
    /// samples as the span it replaces, so the track length never changes
    /// and later offsets stay valid no matter how many splices ran before
    /// them. Intervals that truncate to zero width are no-ops; ends past
    /// the track clamp to it. All untouched samples are bit-identical to
    /// the source.
    pub fn censor(&self, intervals: &[WordInterval], tone_frequency: f32) -> AudioTrack {
        let mut samples = self.samples.clone();

        for interval in intervals {
            let start_ms = (interval.start * 1000.0) as u64;
            let end_ms = (interval.end * 1000.0) as u64;

            let channels = self.channels.max(1) as usize;
            let start = self.sample_index_at_ms(start_ms);
            let frames = self.sample_index_at_ms(end_ms).saturating_sub(start) / channels;
            if frames == 0 {
                debug!(
                    "Skipping zero-length splice for '{}' at {}ms",
                    interval.text, start_ms
                );
                continue;
            }

            // recompute the end from whole frames so the splice stays
            // frame-aligned even when clamping lands mid-frame
            let end = start + frames * channels;
            let burst = tone_burst(tone_frequency, frames, self.sample_rate, self.channels);
            samples[start..end].copy_from_slice(&burst);

            debug!(
                "Spliced {}ms tone over '{}' at [{}ms, {}ms)",
                end_ms.saturating_sub(start_ms),
                interval.text,
                start_ms,
                end_ms
            );
        }

        info!(
            "Censored {} intervals ({} samples, duration unchanged)",
            intervals.len(),
            samples.len()
        );

        AudioTrack::new(samples, self.sample_rate, self.channels)
    }
}

/// Generate a monophonic sine burst, interleaved across `channels`.
///
/// Sized in frames rather than seconds so the caller controls the exact
/// sample count. Deterministic for a given frequency and length.
pub fn tone_burst(frequency: f32, frames: usize, sample_rate: u32, channels: u16) -> Vec<i16> {
    let mut samples = Vec::with_capacity(frames * channels.max(1) as usize);
    let amplitude = TONE_AMPLITUDE * i16::MAX as f32;

    for frame in 0..frames {
        let t = frame as f32 / sample_rate as f32;
        let value = (amplitude * (TAU * frequency * t).sin()) as i16;
        for _ in 0..channels.max(1) {
            samples.push(value);
        }
    }

    samples
}
