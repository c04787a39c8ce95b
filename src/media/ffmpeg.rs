//! Модуль для работы с FFmpeg
//!
//! Длительность измеряется через `ffprobe`, перекодирование WAV в MP3
//! выполняется через `ffmpeg`.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::MediaTools;
use crate::config::MP3_BITRATE;
use crate::error::{NarrationError, Result};

/// Внешние утилиты FFmpeg
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    bitrate: String,
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            bitrate: MP3_BITRATE.to_string(),
        }
    }
}

impl Ffmpeg {
    pub fn new() -> Self {
        Self::default()
    }

    /// Использовать конкретные бинарники вместо поиска в PATH
    pub fn with_binaries(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl MediaTools for Ffmpeg {
    async fn probe_duration(&self, path: &Path) -> f64 {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v", "quiet",
                "-show_entries", "format=duration",
                "-of", "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .await;

        match output {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                log::debug!("ffprobe {} -> {:?}", path.display(), stdout.trim());
                parse_duration(&stdout)
            }
            Err(e) => {
                log::warn!("Failed to run {}: {}", self.ffprobe.display(), e);
                0.0
            }
        }
    }

    async fn transcode_to_mp3(&self, input: &Path, output: &Path) -> Result<()> {
        log::info!("Transcoding {} -> {}", input.display(), output.display());
        let result = Command::new(&self.ffmpeg)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-codec:a", "libmp3lame", "-b:a", self.bitrate.as_str()])
            .arg(output)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                NarrationError::AudioProcessing(format!(
                    "failed to run {}: {}",
                    self.ffmpeg.display(),
                    e
                ))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(NarrationError::AudioProcessing(failure_message(
                result.status.code(),
                &stderr,
            )));
        }

        Ok(())
    }
}

/// Код выхода ffmpeg и последняя непустая строка stderr
fn failure_message(code: Option<i32>, stderr: &str) -> String {
    let mut message = match code {
        Some(code) => format!("FFmpeg command failed with status {}", code),
        None => "FFmpeg command was terminated by a signal".to_string(),
    };
    if let Some(line) = stderr.lines().map(str::trim).filter(|line| !line.is_empty()).last() {
        message.push_str(": ");
        message.push_str(line);
    }
    message
}

/// Разбор вывода ffprobe; всё, что не является конечным неотрицательным
/// числом, считается нулевой длительностью
pub fn parse_duration(stdout: &str) -> f64 {
    match stdout.trim().parse::<f64>() {
        Ok(duration) if duration.is_finite() && duration >= 0.0 => duration,
        _ => 0.0,
    }
}

/// Вернуть имена утилит, которых нет в PATH
pub fn missing_tools() -> Vec<&'static str> {
    ["ffprobe", "ffmpeg"]
        .into_iter()
        .filter(|tool| which::which(tool).is_err())
        .collect()
}
