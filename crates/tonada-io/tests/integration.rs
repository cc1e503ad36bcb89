//! Integration tests for the engine, sinks, and WAV I/O.

use tempfile::NamedTempFile;
use tonada_config::Profile;
use tonada_io::{AudioEngine, BufferedPcm, MemorySink, SampleSink, read_wav, write_wav};
use tonada_synth::{Note, pitches};

// ---------------------------------------------------------------------------
// Offline rendering to WAV
// ---------------------------------------------------------------------------

#[test]
fn render_melody_to_wav_roundtrip() {
    let (mut engine, _controller) = AudioEngine::new(22050);
    let melody = [
        Note::new(pitches::C4, 250, 127),
        Note::new(pitches::E4, 250, 127),
        Note::new(pitches::G4, 250, 127),
    ];
    let rendered = engine.render_melody(&melody);
    assert!(rendered.iter().any(|&s| s != 0));

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &rendered, 22050).unwrap();

    let (loaded, rate) = read_wav(file.path()).unwrap();
    assert_eq!(rate, 22050);
    assert_eq!(loaded, rendered);
}

// ---------------------------------------------------------------------------
// Profile wiring
// ---------------------------------------------------------------------------

#[test]
fn profile_configures_engine() {
    let mut profile = Profile::new("integration");
    profile.volume = 255;
    profile.voices = 2;
    profile.delay.enabled = true;
    profile.delay.time_ms = 100;
    profile.reverb.enabled = true;

    let (mut engine, controller) = AudioEngine::from_profile(&profile);
    assert!(engine.chain().reverb().is_some());
    let echo = engine.chain().echo().unwrap();
    assert_eq!(echo.time_ms(), 100);

    controller.note_on(pitches::A4, 127);
    let mut block = [0i16; 4096];
    engine.render_block(&mut block);
    assert!(block.iter().any(|&s| s != 0));
}

// ---------------------------------------------------------------------------
// Sample sinks and external PCM
// ---------------------------------------------------------------------------

#[test]
fn memory_sink_collects_rendered_blocks() {
    let (mut engine, controller) = AudioEngine::new(22050);
    controller.note_on(pitches::A4, 127);

    let mut sink = MemorySink::new();
    let mut block = [0i16; 256];
    for _ in 0..8 {
        engine.render_block(&mut block);
        sink.push(&block).unwrap();
    }

    assert_eq!(sink.samples().len(), 8 * 256);
    assert!(sink.samples().iter().any(|&s| s != 0));
}

#[test]
fn pcm_file_playback_reaches_output() {
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &[8_000i16; 500], 22050).unwrap();
    let (samples, _) = read_wav(file.path()).unwrap();

    let (mut engine, controller) = AudioEngine::new(22050);
    controller.set_volume(255);
    controller.play_pcm(BufferedPcm::new(samples));

    let mut block = [0i16; 1000];
    engine.render_block(&mut block);
    assert!(block[..500].iter().all(|&s| s == 8_000));
    assert!(block[500..].iter().all(|&s| s == 0));
}

// ---------------------------------------------------------------------------
// End-to-end: render, write, reload, replay
// ---------------------------------------------------------------------------

#[test]
fn end_to_end_render_write_reload_replay() {
    let (mut engine, _controller) = AudioEngine::new(22050);
    let rendered = engine.render_melody(&[Note::new(pitches::C4, 200, 127)]);

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &rendered, 22050).unwrap();
    let (loaded, rate) = read_wav(file.path()).unwrap();
    assert_eq!(rate, 22050);

    // Replay the take through a fresh engine at full volume; with no
    // voices sounding the output is exactly the file content.
    let (mut replay, controller) = AudioEngine::new(22050);
    controller.set_volume(255);
    controller.play_pcm(BufferedPcm::new(loaded.clone()));
    let mut block = vec![0i16; loaded.len()];
    replay.render_block(&mut block);
    assert_eq!(block, loaded);
}
