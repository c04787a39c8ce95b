//! Модуль конфигурации библиотеки scene-tts
//!
//! Параметры сервера синтеза речи читаются из переменных окружения,
//! пути к выходным файлам задаются относительно корня проекта Remotion.

use std::path::{Path, PathBuf};

/// Частота кадров проекта Remotion
pub const FPS: u32 = 30;

/// Буфер в кадрах, добавляемый к общей длительности (заставка и концовка)
pub const FRAME_PADDING: u32 = 60;

/// Битрейт MP3 при перекодировании WAV
pub const MP3_BITRATE: &str = "128k";

/// Таймаут запроса к REST API в секундах
pub const FALLBACK_TIMEOUT_SECS: u64 = 120;

pub const ENV_BASE_URL: &str = "VLLM_BASE_URL";
pub const ENV_MODEL_NAME: &str = "VLLM_MODEL_NAME";
pub const ENV_VOICE: &str = "VLLM_VOICE";
pub const ENV_API_KEY: &str = "VLLM_API_KEY";

const DEFAULT_BASE_URL: &str = "http://localhost:8000/v1";
const DEFAULT_MODEL_NAME: &str = "Qwen/Qwen3-TTS-12Hz-0.6B-CustomVoice";
const DEFAULT_VOICE: &str = "Vivian";
const DEFAULT_API_KEY: &str = "EMPTY";

/// Настройки сервера синтеза речи (vLLM-Omni или любой OpenAI-совместимый)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechConfig {
    /// Базовый URL API, обычно заканчивается на `/v1`
    pub base_url: String,
    /// Имя модели TTS
    pub model: String,
    /// Предустановленный голос
    pub voice: String,
    /// Ключ API (локальный сервер принимает любой)
    pub api_key: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL_NAME.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
        }
    }
}

impl SpeechConfig {
    /// Прочитать настройки из переменных окружения процесса
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Собрать настройки через произвольный источник переменных.
    ///
    /// Пустые значения считаются неустановленными.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |key: &str, default: String| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(default)
        };

        Self {
            base_url: read(ENV_BASE_URL, defaults.base_url),
            model: read(ENV_MODEL_NAME, defaults.model),
            voice: read(ENV_VOICE, defaults.voice),
            api_key: read(ENV_API_KEY, defaults.api_key),
        }
    }

    /// URL основного (OpenAI-совместимого) запроса
    pub fn primary_speech_url(&self) -> String {
        format!("{}/audio/speech", self.base_url.trim_end_matches('/'))
    }

    /// URL резервного REST запроса
    pub fn fallback_speech_url(&self) -> String {
        let trimmed = fallback_base_url(&self.base_url);
        let literal = literal_v1_trim(&self.base_url);
        if trimmed != literal {
            log::warn!(
                "Fallback base URL '{}' was trimmed to '{}' (a plain '/v1' strip gives '{}')",
                self.base_url,
                trimmed,
                literal
            );
        }
        format!("{}/v1/audio/speech", trimmed)
    }
}

/// Удаляет с конца все символы `/`, `v` и `1`.
///
/// Это посимвольная обрезка, а не удаление суффикса `/v1`: для
/// `http://host/dev1` результатом будет `http://host/de`.
pub fn fallback_base_url(base_url: &str) -> &str {
    base_url.trim_end_matches(['/', 'v', '1'])
}

fn literal_v1_trim(base_url: &str) -> &str {
    let base = base_url.trim_end_matches('/');
    base.strip_suffix("/v1").unwrap_or(base)
}

/// Расположение выходных файлов внутри проекта Remotion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// Каталог для `{id}.mp3`
    pub output_dir: PathBuf,
    /// Генерируемый `audioConfig.ts`
    pub config_file: PathBuf,
}

impl ProjectLayout {
    /// Стандартная раскладка: `public/audio` и `src/audioConfig.ts`
    pub fn for_project(project_dir: impl AsRef<Path>) -> Self {
        let root = project_dir.as_ref();
        Self {
            output_dir: root.join("public").join("audio"),
            config_file: root.join("src").join("audioConfig.ts"),
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_config_file(mut self, config_file: impl Into<PathBuf>) -> Self {
        self.config_file = config_file.into();
        self
    }

    /// Имя аудиофайла сцены
    pub fn audio_file_name(scene_id: &str) -> String {
        format!("{}.mp3", scene_id)
    }

    /// Полный путь к аудиофайлу сцены
    pub fn audio_path(&self, scene_id: &str) -> PathBuf {
        self.output_dir.join(Self::audio_file_name(scene_id))
    }
}
