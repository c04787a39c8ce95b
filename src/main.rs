use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use scene_tts::media::ffmpeg::missing_tools;
use scene_tts::scene::{default_scenes, load_scenes};
use scene_tts::utils::logger::init_logger;
use scene_tts::{NarrationError, ProjectLayout, generate_narration};

/// Generate narration audio for Remotion scenes and update audioConfig.ts.
///
/// Server settings come from VLLM_BASE_URL, VLLM_MODEL_NAME, VLLM_VOICE
/// and VLLM_API_KEY. Re-running resumes: scenes with existing audio are skipped.
#[derive(Parser, Debug)]
#[command(name = "scene-tts", version, about, long_about)]
struct Cli {
    /// Remotion project root (audio goes to public/audio, config to src/audioConfig.ts)
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Override the audio output directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Override the generated config file path
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// JSON file with an array of {id, title, text} scenes
    #[arg(long)]
    scenes: Option<PathBuf>,
}

impl Cli {
    fn layout(&self) -> ProjectLayout {
        let mut layout = ProjectLayout::for_project(&self.project_dir);
        if let Some(dir) = &self.output_dir {
            layout = layout.with_output_dir(dir);
        }
        if let Some(file) = &self.config_file {
            layout = layout.with_config_file(file);
        }
        layout
    }
}

async fn run(cli: Cli) -> Result<()> {
    for tool in missing_tools() {
        log::warn!("{} not found in PATH", tool);
    }

    let scenes = match &cli.scenes {
        Some(path) => load_scenes(path)
            .await
            .with_context(|| format!("Failed to load scenes from {}", path.display()))?,
        None => default_scenes(),
    };

    let summary = generate_narration(cli.layout(), &scenes).await?;

    log::info!(
        "Timeline: {} scenes, {} frames total",
        summary.results.len(),
        summary.total_frames()
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    init_logger();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        if reported_by_progress(&e) {
            log::debug!("{:#}", e);
        } else {
            log::error!("{:#}", e);
        }
        std::process::exit(1);
    }
}

/// Сбой сцены уже выведен в консоль наблюдателем прогресса
fn reported_by_progress(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<NarrationError>(),
        Some(NarrationError::Aborted { .. })
    )
}
