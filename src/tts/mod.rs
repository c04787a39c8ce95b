//! Модуль для работы с TTS
//!
//! Запрос к серверу синтеза речи выполняется через основной
//! OpenAI-совместимый клиент, а при любой его ошибке — через резервный
//! REST запрос.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;

use crate::error::{NarrationError, Result};

pub mod openai;
pub mod rest;
pub mod synthesizer;

pub use openai::OpenAiSpeechClient;
pub use rest::RestSpeechClient;
pub use synthesizer::{AudioSynthesizer, Transport};

/// Тело запроса `audio/speech`
#[derive(Debug, Clone, Serialize)]
pub struct SpeechRequest<'a> {
    pub model: &'a str,
    pub voice: &'a str,
    pub input: &'a str,
    pub response_format: &'a str,
}

impl<'a> SpeechRequest<'a> {
    pub fn mp3(model: &'a str, voice: &'a str, input: &'a str) -> Self {
        Self {
            model,
            voice,
            input,
            response_format: "mp3",
        }
    }
}

/// Ответ сервера синтеза
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    /// Тело ответа
    pub bytes: Bytes,
    /// Значение заголовка Content-Type, если он был
    pub content_type: Option<String>,
}

impl SpeechAudio {
    /// vLLM-Omni может вернуть WAV даже при запросе MP3
    pub fn is_wav(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|content_type| content_type.contains("audio/wav"))
    }
}

/// Транспорт до сервера синтеза речи
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Имя для логов
    fn name(&self) -> &str;

    async fn synthesize(&self, request: &SpeechRequest<'_>) -> Result<SpeechAudio>;
}

/// POST запроса синтеза; неуспешный статус превращается в `SpeechApi`
pub(crate) async fn post_speech(
    client: &Client,
    url: &str,
    api_key: &str,
    request: &SpeechRequest<'_>,
) -> Result<SpeechAudio> {
    log::info!(
        "Sending TTS request to {} (model {}, voice {}, {} chars)",
        url,
        request.model,
        request.voice,
        request.input.chars().count()
    );

    let response = client
        .post(url)
        .bearer_auth(api_key)
        .json(request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => format!("Failed to read error response: {}", e),
        };
        log::error!("TTS API error (status {}): {}", status, body);
        return Err(NarrationError::SpeechApi {
            status: status.as_u16(),
            body,
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = response.bytes().await?;
    log::info!(
        "Received {} bytes of audio ({})",
        bytes.len(),
        content_type.as_deref().unwrap_or("no content type")
    );

    Ok(SpeechAudio {
        bytes,
        content_type,
    })
}
