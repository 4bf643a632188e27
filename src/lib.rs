// Core modules
pub mod audio;
pub mod config;
pub mod config_file;
pub mod dependencies;
pub mod error;
pub mod matcher;
pub mod pipeline;
pub mod progress;
pub mod resources;
pub mod transcript;
pub mod video;
pub mod whisper;

// Re-export commonly used types
pub use audio::{tone_burst, AudioConfig, AudioTrack};
pub use config::{Config, ConfigBuilder, WhisperModel};
pub use config_file::{ConfigFile, ProfileConfig};
pub use error::{BleepError, Result};
pub use pipeline::{CensorOutcome, FindOutcome, Pipeline, Stage};
pub use progress::{ProgressOperation, ProgressTracker};
pub use resources::TempFile;
pub use transcript::{Transcript, WordInterval};
pub use video::{FfmpegMedia, MediaEngine, VideoMetadata};
pub use whisper::{FasterWhisper, Transcriber};
