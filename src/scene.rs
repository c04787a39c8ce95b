//! Реестр сцен озвучки
//!
//! Сцены обрабатываются строго в порядке объявления, и этот же порядок
//! сохраняется в сгенерированном `audioConfig.ts`.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::{NarrationError, Result};

/// Одна сцена с текстом для озвучивания
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Scene {
    /// Идентификатор, он же имя аудиофайла без расширения
    pub id: String,
    /// Заголовок для видеопроекта
    pub title: String,
    /// Текст диктора
    pub text: String,
}

impl Scene {
    pub fn new(id: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Встроенный список сцен
pub fn default_scenes() -> Vec<Scene> {
    vec![
        Scene::new("01-intro", "Intro", "Welcome to this video..."),
        Scene::new("02-concept", "Core Concepts", "Today we're going to talk about..."),
        Scene::new("03-demo", "Demo", "Let's look at an example..."),
        Scene::new("04-summary", "Summary", "Thanks for watching, see you next time!"),
    ]
}

/// Загрузить сцены из JSON-файла (массив объектов `{id, title, text}`)
pub async fn load_scenes(path: &Path) -> Result<Vec<Scene>> {
    let content = tokio::fs::read_to_string(path).await?;
    let scenes: Vec<Scene> = serde_json::from_str(&content)?;
    log::info!("Loaded {} scenes from {}", scenes.len(), path.display());
    validate_scenes(&scenes)?;
    Ok(scenes)
}

/// Проверить, что идентификаторы уникальны и пригодны как имена файлов
pub fn validate_scenes(scenes: &[Scene]) -> Result<()> {
    let mut seen = HashSet::new();
    for scene in scenes {
        validate_scene_id(&scene.id)?;
        if !seen.insert(scene.id.as_str()) {
            return Err(NarrationError::InvalidScene(format!(
                "duplicate scene id '{}'",
                scene.id
            )));
        }
    }
    Ok(())
}

fn validate_scene_id(id: &str) -> Result<()> {
    let invalid = |reason: &str| -> Result<()> {
        Err(NarrationError::InvalidScene(format!("scene id '{}' {}", id, reason)))
    };

    if id.trim().is_empty() {
        return invalid("is empty");
    }
    if id.starts_with('.') {
        return invalid("must not start with '.'");
    }
    if id.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
        return invalid("contains a path separator or control character");
    }
    Ok(())
}
