//! End-to-end pipeline tests: compose, sing, mix.
//!
//! ```bash
//! cargo test -p songsmith-tests --test e2e_pipeline
//! ```

use std::process::ExitCode;

use songsmith_backend_audio::wav::read_wav;
use songsmith_backend_audio::{
    mix_files, resynthesize_vocal, resynthesize_vocal_with, AudioError, AudioResult, MonoAudio,
    RenderedVocal, VocalBackend, VocalOutcome,
};
use songsmith_backend_music::compose_to_dir;
use songsmith_cli::commands;
use songsmith_spec::{read_note_artifact, NoteSequence, Scale, VocalConfig};
use songsmith_tests::fixtures::FIXTURE_SAMPLE_RATE;
use songsmith_tests::{render_sine_instrumental, SongFixture};

const SR: usize = FIXTURE_SAMPLE_RATE as usize;

struct Unavailable;

impl VocalBackend for Unavailable {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn render(&self, _: &MonoAudio, _: &NoteSequence, _: &VocalConfig) -> AudioResult<RenderedVocal> {
        Err(AudioError::unavailable("vocoder", "library not loaded"))
    }
}

#[test]
fn test_calm_evening_scenario() {
    let fixture = SongFixture::new();
    let song = compose_to_dir("a calm evening", "calm", "classical", fixture.path()).unwrap();

    assert_eq!(song.composition.emotion, "calm");
    assert_eq!(song.composition.genre, "classical");
    assert_eq!(song.composition.scale, Scale::Major);

    let seq = read_note_artifact(&song.notes_path).unwrap();
    assert_eq!(seq.instrument, 40);
    assert!((70..=100).contains(&seq.tempo));
    assert!(seq.notes.iter().all(|n| n.end > n.start));
    assert!(song.duration_seconds >= 60.0);
}

#[test]
fn test_full_pipeline_compose_sing_mix() {
    let fixture = SongFixture::new();
    let speech = fixture.add_speech(1.0);
    let song = compose_to_dir("lanterns over water", "happy", "lofi", fixture.path()).unwrap();

    let vocal_path = fixture.join("vocal.wav");
    let report = resynthesize_vocal(&speech, &song.notes_path, &vocal_path, &VocalConfig::default()).unwrap();
    assert!(
        matches!(report.outcome, VocalOutcome::Resynthesized { .. }),
        "unexpected outcome {:?}",
        report.outcome
    );

    let vocal = read_wav(&vocal_path).unwrap();
    // Stretched by 1 / 0.88.
    assert!(vocal.samples.len() > SR);

    let inst_path = fixture.write_wav(
        "instrumental.wav",
        render_sine_instrumental(&song.composition.sequence, 3.0),
    );
    let mix_path = fixture.join("song.wav");
    mix_files(&inst_path, &vocal_path, &mix_path).unwrap();

    let mixed = read_wav(&mix_path).unwrap();
    assert_eq!(mixed.samples.len(), 3 * SR);
    assert!(mixed.samples.iter().all(|s| s.abs() <= 1.0));
}

#[test]
fn test_fallback_scenario_has_two_echoes() {
    let fixture = SongFixture::new();
    let song = compose_to_dir("quiet room", "sad", "default", fixture.path()).unwrap();

    let mut impulse = vec![0.0; SR / 2];
    impulse[200] = 0.6;
    let speech = fixture.write_wav("speech.wav", impulse);
    let vocal_path = fixture.join("vocal.wav");

    let report =
        resynthesize_vocal_with(&Unavailable, &speech, &song.notes_path, &vocal_path, &VocalConfig::default())
            .unwrap();
    match &report.outcome {
        VocalOutcome::FallbackPolished { reason } => assert!(reason.contains("library not loaded")),
        other => panic!("expected fallback, got {:?}", other),
    }

    let vocal = read_wav(&vocal_path).unwrap();
    let quantum = 1.5 / 32767.0;
    assert!((vocal.samples[200] - 0.6).abs() < quantum);
    assert!((vocal.samples[200 + 1040] - 0.6 * 0.22).abs() < quantum);
    assert!((vocal.samples[200 + 2080] - 0.6 * 0.12).abs() < quantum);
}

#[test]
fn test_cli_commands_chain() {
    let fixture = SongFixture::new();
    let out_dir = fixture.join("out");
    let code = commands::compose::run("paper boats", "calm", "pop", out_dir.to_str().unwrap(), true).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let notes = std::fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .find(|p| p.to_string_lossy().ends_with(".notes.json"))
        .unwrap();

    let speech = fixture.add_speech(0.6);
    let vocal = fixture.join("vocal.wav");
    let code = commands::sing::run(
        speech.to_str().unwrap(),
        notes.to_str().unwrap(),
        vocal.to_str().unwrap(),
        None,
        Some(0.7),
        true,
    )
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let inst = fixture.write_wav("instrumental.wav", vec![0.05; SR]);
    let mix = fixture.join("song.wav");
    let code = commands::mix::run(
        inst.to_str().unwrap(),
        vocal.to_str().unwrap(),
        mix.to_str().unwrap(),
        true,
    )
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
    assert!(mix.exists());
}

#[test]
fn test_sing_with_missing_notes_exits_one() {
    let fixture = SongFixture::new();
    let speech = fixture.add_speech(0.3);
    let code = commands::sing::run(
        speech.to_str().unwrap(),
        fixture.join("absent.notes.json").to_str().unwrap(),
        fixture.join("vocal.wav").to_str().unwrap(),
        None,
        None,
        true,
    )
    .unwrap();
    assert_eq!(code, ExitCode::from(commands::EXIT_INPUT_ERROR));
}
