//! Модуль для отслеживания прогресса генерации
//!
//! Конвейер сообщает о каждом шаге через `ProgressObserver`. Консольный
//! наблюдатель печатает строки прогресса в stdout, наблюдатель в памяти
//! используется в тестах.

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Событие конвейера
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Начало запуска
    RunStarted {
        model: String,
        base_url: String,
        voice: String,
        output_dir: PathBuf,
        total: usize,
    },
    /// Аудио уже есть, синтез пропущен
    SceneSkipped {
        index: usize,
        total: usize,
        id: String,
        duration: f64,
    },
    /// Начат синтез сцены
    SceneStarted {
        index: usize,
        total: usize,
        id: String,
    },
    /// Основной запрос не удался, используется REST API
    PrimaryFailed { id: String, error: String },
    /// Сцена озвучена
    SceneGenerated {
        index: usize,
        total: usize,
        id: String,
        duration: f64,
        frames: u32,
    },
    /// Синтез сцены не удался
    SceneFailed {
        index: usize,
        total: usize,
        id: String,
        error: String,
    },
    /// Запуск прерван, готовые файлы сохранены
    RunAborted,
    /// Все сцены обработаны
    RunFinished { generated: usize, skipped: usize },
    /// Конфигурация записана
    ConfigWritten { path: PathBuf },
}

/// Наблюдатель, получающий события прогресса
pub trait ProgressObserver: Send + Sync {
    fn on_event(&self, event: &ProgressEvent);
}

const SEPARATOR_WIDTH: usize = 60;

/// Наблюдатель, выводящий прогресс в консоль
#[derive(Debug, Default)]
pub struct ConsoleProgressObserver;

impl ConsoleProgressObserver {
    pub fn new() -> Self {
        Self
    }

    fn prefix(index: usize, total: usize, id: &str) -> String {
        format!("[{}/{}] {}", index, total, id)
    }
}

impl ProgressObserver for ConsoleProgressObserver {
    fn on_event(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::RunStarted {
                model,
                base_url,
                voice,
                output_dir,
                ..
            } => {
                println!("vLLM-Omni Qwen3-TTS (Model: {})", model);
                println!("Server: {}", base_url);
                println!("Voice: {}", voice);
                println!("Output directory: {}", output_dir.display());
                println!("{}", "=".repeat(SEPARATOR_WIDTH));
            }
            ProgressEvent::SceneSkipped {
                index,
                total,
                id,
                duration,
            } => {
                println!(
                    "{}: already exists, skipped ({:.2}s)",
                    Self::prefix(*index, *total, id),
                    duration
                );
            }
            ProgressEvent::SceneStarted { index, total, id } => {
                print!("{}: generating... ", Self::prefix(*index, *total, id));
                let _ = std::io::stdout().flush();
            }
            ProgressEvent::PrimaryFailed { error, .. } => {
                println!("note: OpenAI client call failed, trying REST API: {}", error);
            }
            ProgressEvent::SceneGenerated {
                duration, frames, ..
            } => {
                println!("ok {:.2}s ({} frames)", duration, frames);
            }
            ProgressEvent::SceneFailed { error, .. } => {
                println!("failed: {}", error);
            }
            ProgressEvent::RunAborted => {
                println!();
                println!("Generation interrupted; completed audio is kept, re-run to resume.");
            }
            ProgressEvent::RunFinished { generated, skipped } => {
                println!("{}", "=".repeat(SEPARATOR_WIDTH));
                println!("Done: {} generated, {} skipped", generated, skipped);
            }
            ProgressEvent::ConfigWritten { path } => {
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                println!("{} updated", name);
            }
        }
    }
}

/// Наблюдатель, сохраняющий события в памяти
#[derive(Debug, Default, Clone)]
pub struct MemoryProgressObserver {
    history: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MemoryProgressObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Копия всех полученных событий
    pub fn history(&self) -> Vec<ProgressEvent> {
        match self.history.lock() {
            Ok(history) => history.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ProgressObserver for MemoryProgressObserver {
    fn on_event(&self, event: &ProgressEvent) {
        let mut history = match self.history.lock() {
            Ok(history) => history,
            Err(poisoned) => poisoned.into_inner(),
        };
        history.push(event.clone());
    }
}
