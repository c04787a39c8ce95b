//! Основной файл библиотеки scene-tts
//!
//! Библиотека озвучивает список сцен через OpenAI-совместимый сервер TTS
//! (vLLM-Omni), измеряет длительность аудио через ffprobe и генерирует
//! `audioConfig.ts` для проекта Remotion. Повторный запуск продолжает
//! работу с места остановки: сцены с готовым аудио не синтезируются заново.

pub mod config;
pub mod error;
pub mod media;
pub mod pipeline;
pub mod progress;
pub mod remotion;
pub mod scene;
pub mod tts;
pub mod utils;

pub use config::{ProjectLayout, SpeechConfig};
pub use error::{NarrationError, Result};
pub use pipeline::{NarrationPipeline, RunSummary, SynthesisResult};
pub use scene::Scene;

/// Озвучить сцены с настройками из окружения и выводом прогресса в консоль
pub async fn generate_narration(layout: ProjectLayout, scenes: &[Scene]) -> Result<RunSummary> {
    let pipeline = NarrationPipeline::new(SpeechConfig::from_env(), layout)?;
    pipeline.run(scenes).await
}
