//! The engine: timeline state, per-frame compositing, audio mixing.
//!
//! All state lives behind one mutex. `evaluate` and `render_audio`
//! snapshot what they need under the lock, release it, and do the heavy
//! work outside, so host mutations stay atomic with respect to both and
//! a long decode never blocks `add_clip`.

use std::sync::Arc;

use parking_lot::Mutex;
use rayon::prelude::*;

use crate::audio::mix;
use crate::compose::blend_layer_over;
use crate::foundation::core::{Frame, TrackKind};
use crate::foundation::error::{CutlineError, CutlineResult};
use crate::sources::{AUDIO_SAMPLE_RATE, MediaSource};
use crate::timeline::clip::Clip;
use crate::timeline::interval::IntervalIndex;

/// Handle to a clip in the engine's arena, returned from
/// [`Engine::add_clip`]. Mutation through [`Engine::update_clip`] is
/// visible everywhere the clip is referenced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClipId(usize);

pub struct Engine {
    state: Mutex<EngineState>,
}

struct EngineState {
    width: u32,
    height: u32,
    fps: f64,
    master_gain: f64,
    tracks: Vec<TrackKind>,
    clips: Vec<Clip>,
    index: IntervalIndex<ClipId>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(EngineState {
                width: 1280,
                height: 720,
                fps: 30.0,
                master_gain: 1.0,
                tracks: Vec::new(),
                clips: Vec::new(),
                index: IntervalIndex::new(),
            }),
        }
    }

    pub fn set_resolution(&self, width: u32, height: u32) {
        let mut state = self.state.lock();
        state.width = width;
        state.height = height;
    }

    pub fn resolution(&self) -> (u32, u32) {
        let state = self.state.lock();
        (state.width, state.height)
    }

    pub fn set_fps(&self, fps: f64) {
        self.state.lock().fps = fps;
    }

    pub fn fps(&self) -> f64 {
        self.state.lock().fps
    }

    pub fn set_master_gain(&self, gain: f64) {
        self.state.lock().master_gain = gain;
    }

    pub fn master_gain(&self) -> f64 {
        self.state.lock().master_gain
    }

    /// Append a track; its index is the `track_index` clips refer to.
    pub fn add_track(&self, kind: TrackKind) -> usize {
        let mut state = self.state.lock();
        state.tracks.push(kind);
        state.tracks.len() - 1
    }

    /// Append a track from the raw host-facing kind value (1 = video,
    /// 2 = audio).
    pub fn add_track_raw(&self, kind: i32) -> CutlineResult<usize> {
        let kind = TrackKind::from_raw(kind)
            .ok_or_else(|| CutlineError::invalid_argument(format!("unknown track kind {kind}")))?;
        Ok(self.add_track(kind))
    }

    pub fn track_count(&self) -> usize {
        self.state.lock().tracks.len()
    }

    /// Place a clip on the timeline and index it over
    /// `[start_frame, start_frame + duration_frames)`.
    pub fn add_clip(
        &self,
        track_index: usize,
        name: impl Into<String>,
        start_frame: i64,
        duration_frames: i64,
        source_offset: f64,
        source: Arc<MediaSource>,
    ) -> CutlineResult<ClipId> {
        if start_frame < 0 {
            return Err(CutlineError::invalid_argument(format!(
                "start_frame must be >= 0, got {start_frame}"
            )));
        }
        if duration_frames < 0 {
            return Err(CutlineError::invalid_argument(format!(
                "duration_frames must be >= 0, got {duration_frames}"
            )));
        }

        let clip = Clip::new(
            name,
            start_frame,
            duration_frames,
            source_offset,
            source,
            track_index,
        );
        let mut state = self.state.lock();
        let id = ClipId(state.clips.len());
        state.clips.push(clip);
        state
            .index
            .insert(start_frame, start_frame + duration_frames, id);
        Ok(id)
    }

    /// Place an already-built clip (see
    /// [`ClipBuilder`](crate::ClipBuilder)) on the timeline.
    pub fn insert_clip(&self, clip: Clip) -> CutlineResult<ClipId> {
        if clip.start_frame < 0 || clip.duration_frames < 0 {
            return Err(CutlineError::invalid_argument(
                "clip placement must be non-negative",
            ));
        }
        let mut state = self.state.lock();
        let id = ClipId(state.clips.len());
        let (start, end) = (clip.start_frame, clip.end_frame());
        state.clips.push(clip);
        state.index.insert(start, end, id);
        Ok(id)
    }

    /// Snapshot of a clip's current state.
    pub fn clip(&self, id: ClipId) -> Option<Clip> {
        self.state.lock().clips.get(id.0).cloned()
    }

    /// Mutate a clip in place. Placement fields keep their original
    /// interval in the index; opacity, fades, transform and effects take
    /// effect on the next evaluation.
    pub fn update_clip(&self, id: ClipId, f: impl FnOnce(&mut Clip)) -> CutlineResult<()> {
        let mut state = self.state.lock();
        let clip = state
            .clips
            .get_mut(id.0)
            .ok_or_else(|| CutlineError::invalid_argument(format!("unknown clip id {:?}", id)))?;
        f(clip);
        Ok(())
    }

    pub fn clip_count(&self) -> usize {
        self.state.lock().clips.len()
    }

    /// Drop all tracks and clips. Resolution, fps and master gain are
    /// preserved.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.index.clear();
        state.tracks.clear();
        state.clips.clear();
    }

    /// Composite the video frame at `time` seconds.
    ///
    /// Clips active at the target frame on video tracks render
    /// concurrently (one task per clip), then blend bottom-up: lower
    /// track index is the background, higher indices paint on top.
    pub fn evaluate(&self, time: f64) -> Frame {
        let (width, height, fps, mut clips) = {
            let state = self.state.lock();
            let target_frame = (time * state.fps + 1e-3).floor() as i64;
            let clips: Vec<Clip> = state
                .index
                .query_point(target_frame)
                .into_iter()
                .filter_map(|id| state.clips.get(id.0))
                .filter(|clip| {
                    matches!(state.tracks.get(clip.track_index), Some(TrackKind::Video))
                })
                .cloned()
                .collect();
            (state.width, state.height, state.fps, clips)
        };

        let target_frame = (time * fps + 1e-3).floor() as i64;
        // Stable: ties keep index visitation order.
        clips.sort_by_key(|clip| clip.track_index);

        let mut canvas = Frame::new(width, height);
        canvas.fill([0, 0, 0, 255]);

        let layers: Vec<Frame> = clips
            .par_iter()
            .map(|clip| clip.render(width, height, fps, target_frame))
            .collect();

        for layer in &layers {
            if layer.is_empty() {
                continue;
            }
            if let Err(err) = blend_layer_over(&mut canvas, layer) {
                log::error!("layer blend skipped: {err}");
            }
        }
        canvas
    }

    /// Mix the audio window `[start_time, start_time + duration)` to
    /// interleaved stereo f32 at 44.1 kHz. The result is always exactly
    /// `floor(duration * 44100) * 2` samples.
    pub fn render_audio(&self, start_time: f64, duration: f64) -> Vec<f32> {
        let (fps, master_gain, clips) = {
            let state = self.state.lock();
            let start_frame = (start_time * state.fps) as i64;
            let end_frame = ((start_time + duration) * state.fps) as i64;
            let clips: Vec<Clip> = state
                .index
                .query_range(start_frame, end_frame)
                .into_iter()
                .filter_map(|id| state.clips.get(id.0))
                .filter(|clip| {
                    matches!(state.tracks.get(clip.track_index), Some(TrackKind::Audio))
                })
                .cloned()
                .collect();
            (state.fps, state.master_gain, clips)
        };

        let total = (duration.max(0.0) * f64::from(AUDIO_SAMPLE_RATE)).floor() as usize * 2;
        let mut out = vec![0.0f32; total];

        for clip in &clips {
            let local_start =
                (start_time - clip.start_frame as f64 / fps) + clip.source_offset;
            let samples = clip.source.audio_samples(local_start, duration);
            mix::accumulate(&mut out, &samples, clip.opacity);
        }

        mix::apply_master_gain(&mut out, master_gain as f32);
        mix::soft_limit(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::ColorSource;

    fn color(r: u8, g: u8, b: u8, a: u8) -> Arc<MediaSource> {
        Arc::new(MediaSource::Color(ColorSource::new(r, g, b, a)))
    }

    #[test]
    fn defaults_match_an_empty_project() {
        let engine = Engine::new();
        assert_eq!(engine.resolution(), (1280, 720));
        assert_eq!(engine.fps(), 30.0);
        assert_eq!(engine.master_gain(), 1.0);
        assert_eq!(engine.track_count(), 0);
    }

    #[test]
    fn add_clip_rejects_negative_placement() {
        let engine = Engine::new();
        engine.add_track(TrackKind::Video);
        assert!(
            engine
                .add_clip(0, "bad", -1, 30, 0.0, color(0, 0, 0, 255))
                .is_err()
        );
        assert!(
            engine
                .add_clip(0, "bad", 0, -30, 0.0, color(0, 0, 0, 255))
                .is_err()
        );
    }

    #[test]
    fn add_track_raw_validates_kind() {
        let engine = Engine::new();
        assert!(engine.add_track_raw(1).is_ok());
        assert!(engine.add_track_raw(2).is_ok());
        assert!(engine.add_track_raw(0).is_err());
        assert!(engine.add_track_raw(7).is_err());
    }

    #[test]
    fn update_clip_is_visible_on_next_snapshot() {
        let engine = Engine::new();
        engine.add_track(TrackKind::Video);
        let id = engine
            .add_clip(0, "c", 0, 30, 0.0, color(255, 0, 0, 255))
            .unwrap();
        engine.update_clip(id, |c| c.opacity = 0.25).unwrap();
        let snapshot = engine.clip(id).unwrap();
        assert_eq!(snapshot.opacity, 0.25);
    }

    #[test]
    fn clear_preserves_settings() {
        let engine = Engine::new();
        engine.set_resolution(640, 360);
        engine.set_fps(24.0);
        engine.set_master_gain(0.5);
        engine.add_track(TrackKind::Video);
        engine
            .add_clip(0, "c", 0, 30, 0.0, color(1, 2, 3, 255))
            .unwrap();

        engine.clear();
        assert_eq!(engine.track_count(), 0);
        assert_eq!(engine.clip_count(), 0);
        assert_eq!(engine.resolution(), (640, 360));
        assert_eq!(engine.fps(), 24.0);
        assert_eq!(engine.master_gain(), 0.5);
    }

    #[test]
    fn clips_on_audio_tracks_do_not_render_video() {
        let engine = Engine::new();
        engine.add_track(TrackKind::Audio);
        engine
            .add_clip(0, "a", 0, 30, 0.0, color(255, 255, 255, 255))
            .unwrap();
        let frame = engine.evaluate(0.0);
        assert_eq!(&frame.data()[..4], [0, 0, 0, 255]);
    }

    #[test]
    fn out_of_range_track_index_renders_nothing() {
        let engine = Engine::new();
        engine.add_track(TrackKind::Video);
        engine
            .add_clip(5, "stray", 0, 30, 0.0, color(255, 255, 255, 255))
            .unwrap();
        let frame = engine.evaluate(0.0);
        assert_eq!(&frame.data()[..4], [0, 0, 0, 255]);
    }
}
