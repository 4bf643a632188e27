use std::path::PathBuf;

use crate::audio::DEFAULT_TONE_FREQUENCY;
use crate::error::{config_error, BleepError, Result};
use crate::matcher::{self, DEFAULT_MATCH_THRESHOLD};

/// Whisper model variants
#[derive(Debug, Clone, PartialEq)]
pub enum WhisperModel {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl WhisperModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            WhisperModel::Tiny => "tiny",
            WhisperModel::Base => "base",
            WhisperModel::Small => "small",
            WhisperModel::Medium => "medium",
            WhisperModel::Large => "large",
        }
    }
}

impl std::str::FromStr for WhisperModel {
    type Err = BleepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tiny" => Ok(WhisperModel::Tiny),
            "base" => Ok(WhisperModel::Base),
            "small" => Ok(WhisperModel::Small),
            "medium" => Ok(WhisperModel::Medium),
            "large" => Ok(WhisperModel::Large),
            _ => Err(config_error(
                "whisper_model",
                format!("Invalid model '{}'. Valid options: tiny, base, small, medium, large", s)
            )),
        }
    }
}

/// Configuration for one pipeline run.
///
/// All policy knobs live here; nothing is read from process-global state.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_file: PathBuf,
    pub output_file: Option<PathBuf>,
    pub whisper_model: WhisperModel,
    /// Normalized target word list, immutable for the run
    pub target_words: Vec<String>,
    /// Fuzzy similarity threshold on the 0-100 scale
    pub match_threshold: f64,
    /// Tone burst frequency in Hz
    pub tone_frequency: f32,
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.input_file.exists() {
            return Err(config_error(
                "input_file",
                format!("Input file does not exist: {}", self.input_file.display())
            ));
        }

        if !self.input_file.is_file() {
            return Err(config_error(
                "input_file",
                format!("Input path is not a file: {}", self.input_file.display())
            ));
        }

        if !(0.0..=100.0).contains(&self.match_threshold) {
            return Err(config_error(
                "match_threshold",
                format!("Threshold must be between 0 and 100, got {}", self.match_threshold)
            ));
        }

        if !(100.0..=10000.0).contains(&self.tone_frequency) {
            return Err(config_error(
                "tone_frequency",
                format!("Tone frequency must be between 100 and 10000 Hz, got {}", self.tone_frequency)
            ));
        }

        // An empty list would silently match nothing; reject the run instead
        if self.target_words.is_empty() {
            return Err(config_error(
                "target_words",
                "Target word list cannot be empty"
            ));
        }

        Ok(())
    }

    /// Generate output filename if not provided
    pub fn ensure_output_file(&mut self) -> Result<()> {
        if self.output_file.is_none() {
            let input_stem = self.input_file
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| config_error("input_file", "Invalid filename"))?;

            let input_ext = self.input_file
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or("mp4");

            let mut output_path = self.input_file.clone();
            output_path.set_file_name(format!("{}_censored.{}", input_stem, input_ext));
            self.output_file = Some(output_path);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_file: PathBuf::new(),
            output_file: None,
            whisper_model: WhisperModel::Base,
            target_words: vec![
                "fuck".to_string(),
                "shit".to_string(),
                "damn".to_string(),
                "hell".to_string(),
                "ass".to_string(),
                "bitch".to_string(),
                "bastard".to_string(),
            ],
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            tone_frequency: DEFAULT_TONE_FREQUENCY,
        }
    }
}

/// Builder pattern for Config
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    whisper_model: Option<WhisperModel>,
    target_words: Option<Vec<String>>,
    match_threshold: Option<f64>,
    tone_frequency: Option<f32>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_file(mut self, path: PathBuf) -> Self {
        self.input_file = Some(path);
        self
    }

    pub fn output_file(mut self, path: PathBuf) -> Self {
        self.output_file = Some(path);
        self
    }

    pub fn whisper_model(mut self, model: WhisperModel) -> Self {
        self.whisper_model = Some(model);
        self
    }

    pub fn match_threshold(mut self, threshold: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&threshold) {
            return Err(config_error(
                "match_threshold",
                format!("Threshold must be between 0 and 100, got {}", threshold)
            ));
        }
        self.match_threshold = Some(threshold);
        Ok(self)
    }

    pub fn tone_frequency(mut self, frequency: f32) -> Result<Self> {
        if !(100.0..=10000.0).contains(&frequency) {
            return Err(config_error(
                "tone_frequency",
                format!("Tone frequency must be between 100 and 10000 Hz, got {}", frequency)
            ));
        }
        self.tone_frequency = Some(frequency);
        Ok(self)
    }

    /// Set the target word list. Entries are normalized the same way
    /// transcribed tokens are, so matching compares like with like.
    pub fn target_words(mut self, words: Vec<String>) -> Result<Self> {
        if words.is_empty() {
            return Err(config_error("target_words", "Target word list cannot be empty"));
        }

        let mut normalized = Vec::new();
        for word in &words {
            let cleaned = matcher::normalize_word(word.trim());
            if !cleaned.is_empty() && !normalized.contains(&cleaned) {
                normalized.push(cleaned);
            }
        }

        if normalized.is_empty() {
            return Err(config_error("target_words", "No usable words provided"));
        }

        self.target_words = Some(normalized);
        Ok(self)
    }

    pub fn build(self) -> Result<Config> {
        let input_file = self.input_file
            .ok_or_else(|| config_error("input_file", "Input file is required"))?;

        let mut config = Config {
            input_file,
            output_file: self.output_file,
            whisper_model: self.whisper_model.unwrap_or(WhisperModel::Base),
            target_words: self.target_words.unwrap_or_else(|| Config::default().target_words),
            match_threshold: self.match_threshold.unwrap_or(DEFAULT_MATCH_THRESHOLD),
            tone_frequency: self.tone_frequency.unwrap_or(DEFAULT_TONE_FREQUENCY),
        };

        config.validate()?;
        config.ensure_output_file()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_whisper_model_parsing() {
        assert_eq!("tiny".parse::<WhisperModel>().unwrap(), WhisperModel::Tiny);
        assert_eq!("BASE".parse::<WhisperModel>().unwrap(), WhisperModel::Base);
        assert!("invalid".parse::<WhisperModel>().is_err());
    }

    #[test]
    fn test_config_builder() {
        let temp_dir = tempdir().unwrap();
        let input_path = temp_dir.path().join("test.mp4");
        File::create(&input_path).unwrap();

        let config = Config::builder()
            .input_file(input_path)
            .match_threshold(90.0).unwrap()
            .tone_frequency(440.0).unwrap()
            .target_words(vec!["Damn!".to_string(), "hell".to_string()]).unwrap()
            .build()
            .unwrap();

        assert_eq!(config.match_threshold, 90.0);
        assert_eq!(config.tone_frequency, 440.0);
        assert_eq!(config.target_words, vec!["damn", "hell"]);
    }

    #[test]
    fn test_target_words_are_normalized_and_deduplicated() {
        let builder = ConfigBuilder::new()
            .target_words(vec![
                " Damn ".to_string(),
                "damn".to_string(),
                "HELL!".to_string(),
            ])
            .unwrap();

        let temp_dir = tempdir().unwrap();
        let input_path = temp_dir.path().join("test.mp4");
        File::create(&input_path).unwrap();

        let config = builder.input_file(input_path).build().unwrap();
        assert_eq!(config.target_words, vec!["damn", "hell"]);
    }

    #[test]
    fn test_empty_target_words_rejected() {
        assert!(ConfigBuilder::new().target_words(vec![]).is_err());
        // entries that normalize away leave nothing usable
        assert!(ConfigBuilder::new()
            .target_words(vec!["123".to_string(), "!!!".to_string()])
            .is_err());
    }

    #[test]
    fn test_threshold_and_frequency_ranges() {
        assert!(ConfigBuilder::new().match_threshold(101.0).is_err());
        assert!(ConfigBuilder::new().match_threshold(-1.0).is_err());
        assert!(ConfigBuilder::new().tone_frequency(50.0).is_err());
        assert!(ConfigBuilder::new().tone_frequency(20000.0).is_err());
    }

    #[test]
    fn test_config_validation_rejects_missing_input() {
        let config = Config {
            input_file: PathBuf::from("/nonexistent/file.mp4"),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_file_derivation() {
        let temp_dir = tempdir().unwrap();
        let input_path = temp_dir.path().join("clip.mp4");
        File::create(&input_path).unwrap();

        let config = Config::builder().input_file(input_path).build().unwrap();
        let output = config.output_file.unwrap();
        assert_eq!(output.file_name().unwrap(), "clip_censored.mp4");
    }
}
