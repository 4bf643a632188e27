use std::fmt;

/// Custom error types for the bleep pipeline
#[derive(Debug)]
pub enum BleepError {
    /// File system related errors
    FileSystem { source: std::io::Error, path: std::path::PathBuf },

    /// Transcription engine failure (faster-whisper)
    Transcription { message: String, stderr: Option<String> },

    /// Media extraction/remux failure (ffmpeg/ffprobe)
    MediaIo { message: String, stderr: Option<String> },

    /// Configuration validation errors (includes an empty target word list)
    Config { field: String, message: String },

    /// Audio decode/encode or splice errors
    AudioProcessing { message: String },

    /// Unsupported file format
    UnsupportedFormat { extension: String, supported: Vec<String> },

    /// Missing external dependency
    MissingDependency { name: String, suggestion: String },

    /// General processing error
    Processing { message: String },
}

impl fmt::Display for BleepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BleepError::FileSystem { source, path } => {
                write!(f, "File system error for '{}': {}", path.display(), source)
            }
            BleepError::Transcription { message, stderr } => {
                write!(f, "Transcription error: {}", message)?;
                if let Some(stderr) = stderr {
                    write!(f, "\nStderr: {}", stderr)?;
                }
                Ok(())
            }
            BleepError::MediaIo { message, stderr } => {
                write!(f, "Media I/O error: {}", message)?;
                if let Some(stderr) = stderr {
                    write!(f, "\nStderr: {}", stderr)?;
                }
                Ok(())
            }
            BleepError::Config { field, message } => {
                write!(f, "Configuration error in '{}': {}", field, message)
            }
            BleepError::AudioProcessing { message } => {
                write!(f, "Audio processing error: {}", message)
            }
            BleepError::UnsupportedFormat { extension, supported } => {
                write!(
                    f,
                    "Unsupported file format '{}'. Supported formats: {}",
                    extension,
                    supported.join(", ")
                )
            }
            BleepError::MissingDependency { name, suggestion } => {
                write!(f, "Missing dependency '{}': {}", name, suggestion)
            }
            BleepError::Processing { message } => {
                write!(f, "Processing error: {}", message)
            }
        }
    }
}

impl std::error::Error for BleepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BleepError::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias for bleep operations
pub type Result<T> = std::result::Result<T, BleepError>;

/// Helper function to create media I/O errors
pub fn media_error(message: impl Into<String>, stderr: Option<String>) -> BleepError {
    BleepError::MediaIo {
        message: message.into(),
        stderr,
    }
}

/// Helper function to create transcription errors
pub fn transcription_error(message: impl Into<String>, stderr: Option<String>) -> BleepError {
    BleepError::Transcription {
        message: message.into(),
        stderr,
    }
}

/// Helper function to create configuration errors
pub fn config_error(field: impl Into<String>, message: impl Into<String>) -> BleepError {
    BleepError::Config {
        field: field.into(),
        message: message.into(),
    }
}

/// Helper function to create audio processing errors
pub fn audio_error(message: impl Into<String>) -> BleepError {
    BleepError::AudioProcessing {
        message: message.into(),
    }
}

/// Helper function to create file system errors
pub fn fs_error(source: std::io::Error, path: std::path::PathBuf) -> BleepError {
    BleepError::FileSystem { source, path }
}

// Conversion from anyhow::Error for the collaborator modules that use
// anyhow contexts internally
impl From<anyhow::Error> for BleepError {
    fn from(err: anyhow::Error) -> Self {
        BleepError::Processing {
            message: err.to_string(),
        }
    }
}
