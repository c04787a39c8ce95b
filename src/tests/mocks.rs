//! Моки транспорта TTS и утилит FFmpeg для тестов конвейера

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{NarrationError, Result};
use crate::media::MediaTools;
use crate::tts::{SpeechAudio, SpeechBackend, SpeechRequest};

/// Что мок-сервер отвечает на запрос
#[derive(Debug, Clone)]
pub enum MockReply {
    Audio {
        body: &'static [u8],
        content_type: Option<&'static str>,
    },
    Status(u16, &'static str),
    Unreachable,
}

impl MockReply {
    pub fn mp3(body: &'static [u8]) -> Self {
        Self::Audio {
            body,
            content_type: Some("audio/mpeg"),
        }
    }

    pub fn wav(body: &'static [u8]) -> Self {
        Self::Audio {
            body,
            content_type: Some("audio/wav"),
        }
    }
}

type ReplyFn = dyn Fn(&str) -> MockReply + Send + Sync;

/// Транспорт, отвечающий по тексту запроса и запоминающий входы
#[derive(Clone)]
pub struct MockBackend {
    name: &'static str,
    reply: Arc<ReplyFn>,
    inputs: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn new<F>(name: &'static str, reply: F) -> Self
    where
        F: Fn(&str) -> MockReply + Send + Sync + 'static,
    {
        Self {
            name,
            reply: Arc::new(reply),
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn always(name: &'static str, reply: MockReply) -> Self {
        Self::new(name, move |_| reply.clone())
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.inputs.lock().unwrap().len()
    }
}

#[async_trait]
impl SpeechBackend for MockBackend {
    fn name(&self) -> &str {
        self.name
    }

    async fn synthesize(&self, request: &SpeechRequest<'_>) -> Result<SpeechAudio> {
        assert_eq!(request.response_format, "mp3");
        self.inputs.lock().unwrap().push(request.input.to_string());

        match (self.reply)(request.input) {
            MockReply::Audio { body, content_type } => Ok(SpeechAudio {
                bytes: Bytes::from_static(body),
                content_type: content_type.map(str::to_string),
            }),
            MockReply::Status(status, body) => Err(NarrationError::SpeechApi {
                status,
                body: body.to_string(),
            }),
            MockReply::Unreachable => Err(NarrationError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
        }
    }
}

/// Вызов перекодирования, увиденный моком
#[derive(Debug, Clone)]
pub struct TranscodeCall {
    pub input: PathBuf,
    pub input_bytes: Vec<u8>,
    pub output: PathBuf,
}

/// FFmpeg без FFmpeg: длительности задаются по имени файла
#[derive(Clone, Default)]
pub struct MockMedia {
    durations: Arc<HashMap<String, f64>>,
    fail_transcode: bool,
    probes: Arc<Mutex<Vec<PathBuf>>>,
    transcodes: Arc<Mutex<Vec<TranscodeCall>>>,
}

impl MockMedia {
    pub fn with_durations(durations: &[(&str, f64)]) -> Self {
        Self {
            durations: Arc::new(
                durations
                    .iter()
                    .map(|(name, duration)| (name.to_string(), *duration))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn failing_transcode(mut self) -> Self {
        self.fail_transcode = true;
        self
    }

    pub fn probes(&self) -> Vec<PathBuf> {
        self.probes.lock().unwrap().clone()
    }

    pub fn transcodes(&self) -> Vec<TranscodeCall> {
        self.transcodes.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaTools for MockMedia {
    async fn probe_duration(&self, path: &Path) -> f64 {
        self.probes.lock().unwrap().push(path.to_path_buf());
        if !path.exists() {
            return 0.0;
        }
        path.file_name()
            .and_then(|name| self.durations.get(name.to_string_lossy().as_ref()))
            .copied()
            .unwrap_or(0.0)
    }

    async fn transcode_to_mp3(&self, input: &Path, output: &Path) -> Result<()> {
        let input_bytes = std::fs::read(input)?;
        self.transcodes.lock().unwrap().push(TranscodeCall {
            input: input.to_path_buf(),
            input_bytes,
            output: output.to_path_buf(),
        });

        if self.fail_transcode {
            // Настоящий ffmpeg успевает создать выходной файл до ошибки
            std::fs::write(output, b"partial")?;
            return Err(NarrationError::AudioProcessing(
                "FFmpeg command failed with status 1".to_string(),
            ));
        }
        std::fs::write(output, b"mp3-from-wav")?;
        Ok(())
    }
}
