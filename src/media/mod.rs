//! Модуль для работы с медиафайлами
//!
//! Этот модуль содержит обёртки над внешними утилитами обработки аудио.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

pub mod ffmpeg;

pub use ffmpeg::Ffmpeg;

/// Операции над аудиофайлами, нужные конвейеру
#[async_trait]
pub trait MediaTools: Send + Sync {
    /// Длительность файла в секундах; 0.0, если её не удалось определить
    async fn probe_duration(&self, path: &Path) -> f64;

    /// Перекодировать несжатый файл в MP3
    async fn transcode_to_mp3(&self, input: &Path, output: &Path) -> Result<()>;
}
