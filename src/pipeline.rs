//! Конвейер генерации озвучки
//!
//! Сцены обрабатываются по одной в порядке объявления: существующий
//! непустой `{id}.mp3` переиспользуется, иначе сцена синтезируется.
//! Первая неустранимая ошибка прерывает запуск, уже готовые файлы
//! остаются на диске, а `audioConfig.ts` не перезаписывается.

use std::path::Path;
use std::sync::Arc;

use crate::config::{FPS, ProjectLayout, SpeechConfig};
use crate::error::{NarrationError, Result};
use crate::media::{Ffmpeg, MediaTools};
use crate::progress::{ConsoleProgressObserver, ProgressEvent, ProgressObserver};
use crate::remotion;
use crate::scene::{Scene, validate_scenes};
use crate::tts::AudioSynthesizer;

/// Результат обработки одной сцены
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    pub id: String,
    pub title: String,
    /// Имя файла относительно каталога аудио
    pub file: String,
    /// Длительность в секундах
    pub duration: f64,
    /// Длительность в кадрах при `FPS`
    pub frames: u32,
}

impl SynthesisResult {
    pub fn new(scene: &Scene, duration: f64) -> Self {
        Self {
            id: scene.id.clone(),
            title: scene.title.clone(),
            file: ProjectLayout::audio_file_name(&scene.id),
            duration,
            frames: frames_for_duration(duration),
        }
    }
}

/// Перевести секунды в кадры.
///
/// Половина кадра округляется к чётному, отрицательные и нечисловые
/// значения дают 0.
pub fn frames_for_duration(duration: f64) -> u32 {
    let frames = (duration * f64::from(FPS)).round_ties_even();
    if frames.is_finite() && frames > 0.0 {
        frames as u32
    } else {
        0
    }
}

/// Итог успешного запуска
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Результаты в порядке сцен
    pub results: Vec<SynthesisResult>,
    /// Сцены, озвученные в этом запуске
    pub generated: usize,
    /// Сцены, для которых аудио уже было
    pub skipped: usize,
}

impl RunSummary {
    pub fn scene_start(&self, index: usize) -> u64 {
        remotion::scene_start(&self.results, index)
    }

    pub fn total_frames(&self) -> u64 {
        remotion::total_frames(&self.results)
    }
}

/// Файл уже сгенерирован, если он существует и не пустой
pub async fn has_existing_audio(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata.is_file() && metadata.len() > 0,
        Err(_) => false,
    }
}

pub struct NarrationPipeline {
    layout: ProjectLayout,
    synthesizer: AudioSynthesizer,
    media: Arc<dyn MediaTools>,
    observer: Box<dyn ProgressObserver>,
}

impl NarrationPipeline {
    /// Конвейер с HTTP клиентами, ffmpeg и выводом в консоль
    pub fn new(speech: SpeechConfig, layout: ProjectLayout) -> Result<Self> {
        let media: Arc<dyn MediaTools> = Arc::new(Ffmpeg::new());
        let synthesizer = AudioSynthesizer::new(speech, media.clone())?;
        Ok(Self::with_components(
            layout,
            synthesizer,
            media,
            Box::new(ConsoleProgressObserver::new()),
        ))
    }

    pub fn with_components(
        layout: ProjectLayout,
        synthesizer: AudioSynthesizer,
        media: Arc<dyn MediaTools>,
        observer: Box<dyn ProgressObserver>,
    ) -> Self {
        Self {
            layout,
            synthesizer,
            media,
            observer,
        }
    }

    /// Обработать все сцены и записать `audioConfig.ts`
    pub async fn run(&self, scenes: &[Scene]) -> Result<RunSummary> {
        validate_scenes(scenes)?;
        tokio::fs::create_dir_all(&self.layout.output_dir).await?;

        let speech = self.synthesizer.config();
        let total = scenes.len();
        self.observer.on_event(&ProgressEvent::RunStarted {
            model: speech.model.clone(),
            base_url: speech.base_url.clone(),
            voice: speech.voice.clone(),
            output_dir: self.layout.output_dir.clone(),
            total,
        });
        log::info!("Processing {} scenes into {}", total, self.layout.output_dir.display());

        let mut results = Vec::with_capacity(total);
        let mut generated = 0;
        let mut skipped = 0;

        for (i, scene) in scenes.iter().enumerate() {
            let index = i + 1;
            let output_path = self.layout.audio_path(&scene.id);

            if has_existing_audio(&output_path).await {
                let result = SynthesisResult::new(scene, self.media.probe_duration(&output_path).await);
                log::info!("Scene {} already has audio, skipping synthesis", scene.id);
                self.observer.on_event(&ProgressEvent::SceneSkipped {
                    index,
                    total,
                    id: scene.id.clone(),
                    duration: result.duration,
                });
                results.push(result);
                skipped += 1;
                continue;
            }

            self.observer.on_event(&ProgressEvent::SceneStarted {
                index,
                total,
                id: scene.id.clone(),
            });

            match self
                .synthesizer
                .synthesize(scene, &output_path, &*self.observer)
                .await
            {
                Ok(transport) => {
                    log::info!("Scene {} synthesized via {:?} transport", scene.id, transport);
                }
                Err(e) => {
                    log::debug!("Failed to generate audio for scene {}: {:?}", scene.id, e);
                    self.observer.on_event(&ProgressEvent::SceneFailed {
                        index,
                        total,
                        id: scene.id.clone(),
                        error: e.to_string(),
                    });
                    self.observer.on_event(&ProgressEvent::RunAborted);
                    return Err(NarrationError::Aborted {
                        scene: scene.id.clone(),
                        source: Box::new(e),
                    });
                }
            }

            let result = SynthesisResult::new(scene, self.media.probe_duration(&output_path).await);
            self.observer.on_event(&ProgressEvent::SceneGenerated {
                index,
                total,
                id: scene.id.clone(),
                duration: result.duration,
                frames: result.frames,
            });
            results.push(result);
            generated += 1;
        }

        self.observer
            .on_event(&ProgressEvent::RunFinished { generated, skipped });

        remotion::write_config(&self.layout.config_file, &results).await?;
        self.observer.on_event(&ProgressEvent::ConfigWritten {
            path: self.layout.config_file.clone(),
        });

        Ok(RunSummary {
            results,
            generated,
            skipped,
        })
    }
}
