//! Резервный транспорт: прямой REST запрос с фиксированным таймаутом

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{SpeechAudio, SpeechBackend, SpeechRequest, post_speech};
use crate::config::{FALLBACK_TIMEOUT_SECS, SpeechConfig};
use crate::error::Result;

pub struct RestSpeechClient {
    client: Client,
    url: String,
    api_key: String,
}

impl RestSpeechClient {
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(FALLBACK_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            url: config.fallback_speech_url(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SpeechBackend for RestSpeechClient {
    fn name(&self) -> &str {
        "rest"
    }

    async fn synthesize(&self, request: &SpeechRequest<'_>) -> Result<SpeechAudio> {
        post_speech(&self.client, &self.url, &self.api_key, request).await
    }
}
