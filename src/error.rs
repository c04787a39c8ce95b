//! Модуль обработки ошибок библиотеки scene-tts
//!
//! Этот модуль содержит типы ошибок, которые могут возникнуть при генерации
//! озвучки сцен и записи конфигурации.

use thiserror::Error;

/// Ошибки библиотеки scene-tts
#[derive(Debug, Error)]
pub enum NarrationError {
    /// Ошибка HTTP запроса
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Ошибка ввода-вывода
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка сериализации/десериализации JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Сервер синтеза речи вернул неуспешный статус
    #[error("REST API error: {status} - {body}")]
    SpeechApi {
        status: u16,
        body: String,
    },

    /// Ошибка обработки аудио (ffmpeg)
    #[error("Audio processing error: {0}")]
    AudioProcessing(String),

    /// Некорректное описание сцены
    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    /// Запуск прерван ошибкой синтеза сцены; о ней уже сообщено наблюдателю
    #[error("Generation aborted at scene {scene}: {source}")]
    Aborted {
        scene: String,
        source: Box<NarrationError>,
    },
}

/// Тип Result для библиотеки scene-tts
pub type Result<T> = std::result::Result<T, NarrationError>;
