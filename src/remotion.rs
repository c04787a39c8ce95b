//! Генерация `audioConfig.ts` для проекта Remotion
//!
//! Файл всегда перезаписывается целиком. Помимо массива сцен в нём есть
//! `getSceneStart` и `TOTAL_FRAMES`; функции `scene_start` и `total_frames`
//! ниже считают то же самое на стороне Rust.

use std::fmt::Write as _;
use std::path::Path;

use crate::config::{FPS, FRAME_PADDING};
use crate::error::Result;
use crate::pipeline::SynthesisResult;

const HEADER: &str = "\
// Scene configuration (generated by vLLM-Omni Qwen3-TTS)
// Auto-generated, do not edit by hand

export interface SceneConfig {
  id: string;
  title: string;
  durationInFrames: number;
  audioFile: string;
}
";

/// Первый кадр сцены `index`: сумма кадров всех предыдущих сцен
pub fn scene_start(results: &[SynthesisResult], index: usize) -> u64 {
    results
        .iter()
        .take(index)
        .map(|result| u64::from(result.frames))
        .sum()
}

/// Общее число кадров с буфером на заставку и концовку
pub fn total_frames(results: &[SynthesisResult]) -> u64 {
    scene_start(results, results.len()) + u64::from(FRAME_PADDING)
}

/// Строковый литерал TypeScript
fn ts_string(value: &str) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Отрисовать содержимое `audioConfig.ts`
pub fn render_config(results: &[SynthesisResult]) -> Result<String> {
    let mut blocks = Vec::with_capacity(results.len());
    for result in results {
        blocks.push(format!(
            "  {{\n    id: {},\n    title: {},\n    durationInFrames: {},\n    audioFile: {},\n  }}",
            ts_string(&result.id)?,
            ts_string(&result.title)?,
            result.frames,
            ts_string(&result.file)?,
        ));
    }

    let mut content = String::from(HEADER);
    content.push('\n');
    content.push_str("export const SCENES: SceneConfig[] = [\n");
    if !blocks.is_empty() {
        content.push_str(&blocks.join(",\n"));
        content.push_str(",\n");
    }
    content.push_str("];\n\n");

    content.push_str("// Start frame of a scene\n");
    content.push_str("export function getSceneStart(sceneIndex: number): number {\n");
    content.push_str(
        "  return SCENES.slice(0, sceneIndex).reduce((sum, s) => sum + s.durationInFrames, 0);\n",
    );
    content.push_str("}\n\n");

    content.push_str("// Total frames (plus intro/outro padding)\n");
    let _ = writeln!(
        content,
        "export const TOTAL_FRAMES = SCENES.reduce((sum, s) => sum + s.durationInFrames, 0) + {};",
        FRAME_PADDING
    );
    content.push('\n');

    content.push_str("// Frame rate\n");
    let _ = writeln!(content, "export const FPS = {};", FPS);

    Ok(content)
}

/// Записать конфигурацию, создав родительский каталог при необходимости
pub async fn write_config(path: &Path, results: &[SynthesisResult]) -> Result<()> {
    let content = render_config(results)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, content).await?;
    log::info!(
        "Wrote {} scenes ({} frames) to {}",
        results.len(),
        total_frames(results),
        path.display()
    );
    Ok(())
}
