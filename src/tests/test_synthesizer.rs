use std::path::Path;
use std::sync::Arc;

use super::mocks::{MockBackend, MockMedia, MockReply};
use crate::config::SpeechConfig;
use crate::error::NarrationError;
use crate::progress::{MemoryProgressObserver, ProgressEvent};
use crate::scene::Scene;
use crate::tts::{AudioSynthesizer, Transport};

fn synthesizer(primary: &MockBackend, fallback: &MockBackend, media: &MockMedia) -> AudioSynthesizer {
    AudioSynthesizer::with_backends(
        SpeechConfig::default(),
        Box::new(primary.clone()),
        Box::new(fallback.clone()),
        Arc::new(media.clone()),
    )
}

fn wav_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".wav"))
        .collect()
}

#[tokio::test]
async fn test_primary_success_writes_body() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("01-intro.mp3");
    let primary = MockBackend::always("openai", MockReply::mp3(b"ID3-primary"));
    let fallback = MockBackend::always("rest", MockReply::mp3(b"ID3-rest"));
    let media = MockMedia::default();
    let observer = MemoryProgressObserver::new();

    let scene = Scene::new("01-intro", "Intro", "Hello there");
    let transport = synthesizer(&primary, &fallback, &media)
        .synthesize(&scene, &output, &observer)
        .await
        .unwrap();

    assert_eq!(transport, Transport::Primary);
    assert_eq!(std::fs::read(&output).unwrap(), b"ID3-primary");
    assert_eq!(primary.inputs(), vec!["Hello there".to_string()]);
    assert_eq!(fallback.calls(), 0);
    assert!(observer.history().is_empty());
}

#[tokio::test]
async fn test_primary_ignores_content_type() {
    // Основной путь пишет тело как есть, даже если это WAV
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("a.mp3");
    let primary = MockBackend::always("openai", MockReply::wav(b"RIFF"));
    let fallback = MockBackend::always("rest", MockReply::mp3(b"unused"));
    let media = MockMedia::default();

    synthesizer(&primary, &fallback, &media)
        .synthesize(&Scene::new("a", "A", "x"), &output, &MemoryProgressObserver::new())
        .await
        .unwrap();

    assert_eq!(std::fs::read(&output).unwrap(), b"RIFF");
    assert!(media.transcodes().is_empty());
}

#[tokio::test]
async fn test_primary_failure_falls_back_to_rest() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("02-concept.mp3");
    let primary = MockBackend::always("openai", MockReply::Unreachable);
    let fallback = MockBackend::always("rest", MockReply::mp3(b"ID3-rest"));
    let media = MockMedia::default();
    let observer = MemoryProgressObserver::new();

    let scene = Scene::new("02-concept", "Core", "Concept text");
    let transport = synthesizer(&primary, &fallback, &media)
        .synthesize(&scene, &output, &observer)
        .await
        .unwrap();

    assert_eq!(transport, Transport::Fallback);
    assert_eq!(std::fs::read(&output).unwrap(), b"ID3-rest");
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.inputs(), vec!["Concept text".to_string()]);

    let history = observer.history();
    assert_eq!(history.len(), 1);
    assert!(matches!(
        &history[0],
        ProgressEvent::PrimaryFailed { id, error } if id == "02-concept" && error.contains("connection refused")
    ));
}

#[tokio::test]
async fn test_primary_error_status_also_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("a.mp3");
    let primary = MockBackend::always("openai", MockReply::Status(404, "not found"));
    let fallback = MockBackend::always("rest", MockReply::mp3(b"ok"));
    let media = MockMedia::default();

    let transport = synthesizer(&primary, &fallback, &media)
        .synthesize(&Scene::new("a", "A", "x"), &output, &MemoryProgressObserver::new())
        .await
        .unwrap();

    assert_eq!(transport, Transport::Fallback);
    assert_eq!(std::fs::read(&output).unwrap(), b"ok");
}

#[tokio::test]
async fn test_fallback_wav_is_transcoded_and_removed() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("03-demo.mp3");
    let primary = MockBackend::always("openai", MockReply::Unreachable);
    let fallback = MockBackend::always("rest", MockReply::wav(b"RIFF....WAVEfmt "));
    let media = MockMedia::default();

    synthesizer(&primary, &fallback, &media)
        .synthesize(&Scene::new("03-demo", "Demo", "x"), &output, &MemoryProgressObserver::new())
        .await
        .unwrap();

    let transcodes = media.transcodes();
    assert_eq!(transcodes.len(), 1);
    assert_eq!(transcodes[0].input_bytes, b"RIFF....WAVEfmt ");
    assert_eq!(transcodes[0].output, output);
    assert_eq!(transcodes[0].input.parent(), Some(dir.path()));
    assert_eq!(std::fs::read(&output).unwrap(), b"mp3-from-wav");
    assert!(wav_files(dir.path()).is_empty());
}

#[tokio::test]
async fn test_fallback_error_status_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("a.mp3");
    let primary = MockBackend::always("openai", MockReply::Unreachable);
    let fallback = MockBackend::always("rest", MockReply::Status(500, "model crashed"));
    let media = MockMedia::default();

    let err = synthesizer(&primary, &fallback, &media)
        .synthesize(&Scene::new("a", "A", "x"), &output, &MemoryProgressObserver::new())
        .await
        .unwrap_err();

    assert!(matches!(err, NarrationError::SpeechApi { status: 500, .. }));
    assert_eq!(err.to_string(), "REST API error: 500 - model crashed");
    assert!(!output.exists());
}

#[tokio::test]
async fn test_transcode_failure_is_fatal_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("a.mp3");
    let primary = MockBackend::always("openai", MockReply::Unreachable);
    let fallback = MockBackend::always("rest", MockReply::wav(b"RIFF"));
    let media = MockMedia::default().failing_transcode();

    let err = synthesizer(&primary, &fallback, &media)
        .synthesize(&Scene::new("a", "A", "x"), &output, &MemoryProgressObserver::new())
        .await
        .unwrap_err();

    assert!(matches!(err, NarrationError::AudioProcessing(_)));
    assert_eq!(media.transcodes().len(), 1);
    // Частичный вывод ffmpeg удалён
    assert!(!output.exists());
    assert!(wav_files(dir.path()).is_empty());
}
