//! Синтез аудио одной сцены с переключением на резервный транспорт

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use super::{OpenAiSpeechClient, RestSpeechClient, SpeechAudio, SpeechBackend, SpeechRequest};
use crate::config::SpeechConfig;
use crate::error::Result;
use crate::media::MediaTools;
use crate::progress::{ProgressEvent, ProgressObserver};
use crate::scene::Scene;

/// Какой транспорт в итоге выдал аудио
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Primary,
    Fallback,
}

pub struct AudioSynthesizer {
    config: SpeechConfig,
    primary: Box<dyn SpeechBackend>,
    fallback: Box<dyn SpeechBackend>,
    media: Arc<dyn MediaTools>,
}

impl AudioSynthesizer {
    /// Синтезатор с реальными HTTP клиентами
    pub fn new(config: SpeechConfig, media: Arc<dyn MediaTools>) -> Result<Self> {
        let primary = OpenAiSpeechClient::new(&config);
        let fallback = RestSpeechClient::new(&config)?;
        log::debug!("Primary TTS endpoint: {}", primary.url());
        log::debug!("Fallback TTS endpoint: {}", fallback.url());

        Ok(Self::with_backends(
            config,
            Box::new(primary),
            Box::new(fallback),
            media,
        ))
    }

    pub fn with_backends(
        config: SpeechConfig,
        primary: Box<dyn SpeechBackend>,
        fallback: Box<dyn SpeechBackend>,
        media: Arc<dyn MediaTools>,
    ) -> Self {
        Self {
            config,
            primary,
            fallback,
            media,
        }
    }

    pub fn config(&self) -> &SpeechConfig {
        &self.config
    }

    /// Озвучить сцену и записать результат в `output_path`.
    ///
    /// Ошибка основного транспорта не фатальна; ошибка резервного
    /// прерывает синтез сцены.
    pub async fn synthesize(
        &self,
        scene: &Scene,
        output_path: &Path,
        observer: &dyn ProgressObserver,
    ) -> Result<Transport> {
        let request = SpeechRequest::mp3(&self.config.model, &self.config.voice, &scene.text);

        match self.primary.synthesize(&request).await {
            Ok(audio) => {
                tokio::fs::write(output_path, &audio.bytes).await?;
                log::info!(
                    "Saved {} audio for scene {} to {}",
                    self.primary.name(),
                    scene.id,
                    output_path.display()
                );
                Ok(Transport::Primary)
            }
            Err(e) => {
                log::warn!(
                    "{} TTS request failed for scene {}, trying {}: {}",
                    self.primary.name(),
                    scene.id,
                    self.fallback.name(),
                    e
                );
                observer.on_event(&ProgressEvent::PrimaryFailed {
                    id: scene.id.clone(),
                    error: e.to_string(),
                });

                let audio = self.fallback.synthesize(&request).await?;
                self.store_fallback_audio(scene, &audio, output_path).await?;
                Ok(Transport::Fallback)
            }
        }
    }

    async fn store_fallback_audio(
        &self,
        scene: &Scene,
        audio: &SpeechAudio,
        output_path: &Path,
    ) -> Result<()> {
        if !audio.is_wav() {
            tokio::fs::write(output_path, &audio.bytes).await?;
            log::info!("Saved REST audio for scene {} to {}", scene.id, output_path.display());
            return Ok(());
        }

        // WAV складывается рядом с итоговым файлом и удаляется после перекодирования
        let dir = output_path.parent().unwrap_or_else(|| Path::new("."));
        let mut wav = tempfile::Builder::new()
            .prefix(&format!("{}-", scene.id))
            .suffix(".wav")
            .tempfile_in(dir)?;
        wav.as_file_mut().write_all(&audio.bytes)?;
        wav.as_file_mut().flush()?;
        log::info!(
            "Received WAV for scene {}, converting to MP3 via {}",
            scene.id,
            wav.path().display()
        );

        if let Err(e) = self.media.transcode_to_mp3(wav.path(), output_path).await {
            // Недописанный MP3 не должен остаться на диске
            remove_partial_output(output_path).await;
            return Err(e);
        }
        wav.close()?;
        Ok(())
    }
}

async fn remove_partial_output(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => log::warn!("Removed partial audio file {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Failed to remove partial audio file {}: {}", path.display(), e),
    }
}
