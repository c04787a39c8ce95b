//! Основной транспорт: OpenAI-совместимый эндпоинт `{base_url}/audio/speech`

use async_trait::async_trait;
use reqwest::Client;

use super::{SpeechAudio, SpeechBackend, SpeechRequest, post_speech};
use crate::config::SpeechConfig;
use crate::error::Result;

/// Клиент в духе `client.audio.speech.create`: без явного таймаута,
/// любой неуспешный статус является ошибкой
pub struct OpenAiSpeechClient {
    client: Client,
    url: String,
    api_key: String,
}

impl OpenAiSpeechClient {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            client: Client::new(),
            url: config.primary_speech_url(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SpeechBackend for OpenAiSpeechClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn synthesize(&self, request: &SpeechRequest<'_>) -> Result<SpeechAudio> {
        post_speech(&self.client, &self.url, &self.api_key, request).await
    }
}
