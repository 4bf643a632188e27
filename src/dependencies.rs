use crate::error::{BleepError, Result};
use log::{info, warn};
use tokio::process::Command;

/// Check that the external collaborators exist before starting a run
pub async fn validate_dependencies() -> Result<()> {
    info!("Validating system dependencies...");

    check_ffmpeg().await?;
    check_ffprobe().await?;
    check_python_and_whisper().await?;

    info!("All dependencies validated successfully");
    Ok(())
}

async fn check_ffmpeg() -> Result<()> {
    let output = Command::new("ffmpeg")
        .args(["-version"])
        .output()
        .await
        .map_err(|_| BleepError::MissingDependency {
            name: "FFmpeg".to_string(),
            suggestion: "Install FFmpeg: https://ffmpeg.org/download.html".to_string(),
        })?;

    if !output.status.success() {
        return Err(BleepError::MissingDependency {
            name: "FFmpeg".to_string(),
            suggestion: "FFmpeg is installed but not working properly".to_string(),
        });
    }

    let version_info = String::from_utf8_lossy(&output.stdout);
    if let Some(version_line) = version_info.lines().next() {
        info!("FFmpeg found: {}", version_line);
    }

    Ok(())
}

async fn check_ffprobe() -> Result<()> {
    let output = Command::new("ffprobe")
        .args(["-version"])
        .output()
        .await
        .map_err(|_| BleepError::MissingDependency {
            name: "ffprobe".to_string(),
            suggestion: "ffprobe ships with FFmpeg: https://ffmpeg.org/download.html".to_string(),
        })?;

    if !output.status.success() {
        return Err(BleepError::MissingDependency {
            name: "ffprobe".to_string(),
            suggestion: "ffprobe is installed but not working properly".to_string(),
        });
    }

    Ok(())
}

async fn check_python_and_whisper() -> Result<()> {
    let python_output = Command::new("python3")
        .args(["-c", "import sys; print(f'Python {sys.version.split()[0]}')"])
        .output()
        .await
        .map_err(|_| BleepError::MissingDependency {
            name: "Python".to_string(),
            suggestion: "Install Python 3.8+ from https://python.org".to_string(),
        })?;

    if !python_output.status.success() {
        return Err(BleepError::MissingDependency {
            name: "Python".to_string(),
            suggestion: "Python is installed but not working properly".to_string(),
        });
    }

    let python_version = String::from_utf8_lossy(&python_output.stdout);
    info!("Python found: {}", python_version.trim());

    let whisper_output = Command::new("python3")
        .args(["-c", "import faster_whisper; print(f'faster-whisper {faster_whisper.__version__}')"])
        .output()
        .await
        .map_err(|_| BleepError::MissingDependency {
            name: "faster-whisper".to_string(),
            suggestion: "Install faster-whisper: pip install faster-whisper".to_string(),
        })?;

    if !whisper_output.status.success() {
        let stderr = String::from_utf8_lossy(&whisper_output.stderr);
        if stderr.contains("No module named 'faster_whisper'") {
            return Err(BleepError::MissingDependency {
                name: "faster-whisper".to_string(),
                suggestion: "Install faster-whisper: pip install faster-whisper".to_string(),
            });
        } else {
            warn!("faster-whisper check failed, but may still work: {}", stderr);
            return Ok(());
        }
    }

    let whisper_version = String::from_utf8_lossy(&whisper_output.stdout);
    info!("faster-whisper found: {}", whisper_version.trim());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dependency_validation() {
        // Environments without ffmpeg/python should report, not panic
        match validate_dependencies().await {
            Ok(()) => println!("Dependencies available"),
            Err(e) => println!("Dependencies not available: {}", e),
        }
    }
}
