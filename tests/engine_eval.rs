//! End-to-end engine scenarios: literal inputs, literal pixels.

use std::sync::Arc;

use cutline::{ColorSource, Engine, MediaSource, TrackKind};

fn color(r: u8, g: u8, b: u8, a: u8) -> Arc<MediaSource> {
    Arc::new(MediaSource::Color(ColorSource::new(r, g, b, a)))
}

fn assert_solid(frame: &cutline::Frame, rgba: [u8; 4]) {
    assert_eq!(
        frame.data().len(),
        frame.width() as usize * frame.height() as usize * 4
    );
    for (i, px) in frame.data().chunks_exact(4).enumerate() {
        assert_eq!(px, rgba, "pixel {i}");
    }
}

#[test]
fn empty_engine_renders_opaque_black() {
    let engine = Engine::new();
    engine.set_resolution(1280, 720);
    engine.set_fps(30.0);

    let frame = engine.evaluate(0.0);
    assert_eq!((frame.width(), frame.height()), (1280, 720));
    assert_solid(&frame, [0, 0, 0, 255]);
}

#[test]
fn single_color_clip_fills_the_canvas() {
    let engine = Engine::new();
    engine.set_resolution(320, 180);
    engine.set_fps(30.0);
    engine.add_track(TrackKind::Video);
    engine
        .add_clip(0, "red", 0, 30, 0.0, color(255, 0, 0, 255))
        .unwrap();

    let frame = engine.evaluate(0.5);
    assert_solid(&frame, [255, 0, 0, 255]);
}

#[test]
fn linear_fade_in_blends_toward_black() {
    let engine = Engine::new();
    engine.set_resolution(64, 36);
    engine.set_fps(30.0);
    engine.add_track(TrackKind::Video);
    let id = engine
        .add_clip(0, "red", 0, 30, 0.0, color(255, 0, 0, 255))
        .unwrap();
    engine.update_clip(id, |c| c.fade_in_frames = 10).unwrap();

    // Frame 5 of a 10-frame linear ramp: alpha 0.5 over opaque black.
    let frame = engine.evaluate(5.0 / 30.0);
    let px = &frame.data()[..4];
    assert!(
        (125..=128).contains(&px[0]),
        "expected half red, got {}",
        px[0]
    );
    assert_eq!(px[1], 0);
    assert_eq!(px[2], 0);
    assert_eq!(px[3], 255);
}

#[test]
fn higher_track_index_paints_on_top() {
    let engine = Engine::new();
    engine.set_resolution(64, 36);
    engine.set_fps(30.0);
    engine.add_track(TrackKind::Video); // track 0: background
    engine.add_track(TrackKind::Video); // track 1: foreground
    engine
        .add_clip(0, "red", 0, 60, 0.0, color(255, 0, 0, 255))
        .unwrap();
    engine
        .add_clip(1, "blue", 0, 60, 0.0, color(0, 0, 255, 255))
        .unwrap();

    let frame = engine.evaluate(1.0);
    assert_solid(&frame, [0, 0, 255, 255]);
}

#[test]
fn painter_order_is_independent_of_insertion_order() {
    let engine = Engine::new();
    engine.set_resolution(32, 32);
    engine.set_fps(30.0);
    engine.add_track(TrackKind::Video);
    engine.add_track(TrackKind::Video);
    // Insert the foreground clip first; sorting by track index must
    // still put it on top.
    engine
        .add_clip(1, "blue", 0, 60, 0.0, color(0, 0, 255, 255))
        .unwrap();
    engine
        .add_clip(0, "red", 0, 60, 0.0, color(255, 0, 0, 255))
        .unwrap();

    let frame = engine.evaluate(0.0);
    assert_solid(&frame, [0, 0, 255, 255]);
}

#[test]
fn clip_outside_its_interval_does_not_render() {
    let engine = Engine::new();
    engine.set_resolution(32, 32);
    engine.set_fps(30.0);
    engine.add_track(TrackKind::Video);
    engine
        .add_clip(0, "late", 60, 30, 0.0, color(0, 255, 0, 255))
        .unwrap();

    // Before the clip begins.
    assert_solid(&engine.evaluate(0.5), [0, 0, 0, 255]);
    // Inside it.
    assert_solid(&engine.evaluate(2.5), [0, 255, 0, 255]);
    // After its exclusive end.
    assert_solid(&engine.evaluate(3.0), [0, 0, 0, 255]);
}

#[test]
fn evaluate_is_deterministic() {
    let engine = Engine::new();
    engine.set_resolution(160, 90);
    engine.set_fps(30.0);
    engine.add_track(TrackKind::Video);
    engine.add_track(TrackKind::Video);
    let id = engine
        .add_clip(0, "red", 0, 90, 0.0, color(200, 10, 10, 255))
        .unwrap();
    engine
        .update_clip(id, |c| {
            c.fade_in_frames = 20;
            c.transform.rotation = 30.0;
            c.transform.scale_x = 0.8;
            c.transform.scale_y = 0.8;
        })
        .unwrap();
    engine
        .add_clip(1, "veil", 0, 90, 0.0, color(0, 0, 255, 120))
        .unwrap();

    let a = engine.evaluate(0.4);
    let b = engine.evaluate(0.4);
    assert_eq!(a, b);
}

#[test]
fn built_clips_compose_like_directly_added_ones() {
    use cutline::{ClipBuilder, FadeType};

    let engine = Engine::new();
    engine.set_resolution(64, 36);
    engine.set_fps(30.0);
    engine.add_track(TrackKind::Video);

    let clip = ClipBuilder::new("green", color(0, 255, 0, 255))
        .track(0)
        .start_frame(0)
        .duration_frames(60)
        .fade_in(10, FadeType::Linear)
        .build()
        .unwrap();
    engine.insert_clip(clip).unwrap();

    // Past the fade the clip is fully opaque.
    let frame = engine.evaluate(1.0);
    assert_solid(&frame, [0, 255, 0, 255]);
}

#[test]
fn audio_window_with_no_clips_is_silent_and_sized() {
    let engine = Engine::new();
    engine.set_fps(30.0);

    let samples = engine.render_audio(0.0, 0.1);
    assert_eq!(samples.len(), 8820);
    assert!(samples.iter().all(|&s| s == 0.0));
}

#[test]
fn audio_window_length_floors_fractional_sample_counts() {
    let engine = Engine::new();
    // 0.0123 s * 44100 = 542.43 samples -> 542 frames * 2 channels.
    let samples = engine.render_audio(0.0, 0.0123);
    assert_eq!(samples.len(), 542 * 2);
}

#[test]
fn color_sources_contribute_no_audio() {
    let engine = Engine::new();
    engine.set_fps(30.0);
    engine.add_track(TrackKind::Audio);
    engine
        .add_clip(0, "silent", 0, 300, 0.0, color(255, 0, 0, 255))
        .unwrap();

    let samples = engine.render_audio(0.0, 0.25);
    assert_eq!(samples.len(), (0.25f64 * 44100.0) as usize * 2);
    assert!(samples.iter().all(|&s| s == 0.0));
}
