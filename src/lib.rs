//! Cutline is the native core of a non-linear video editor.
//!
//! Given a declarative timeline of clips arranged on tracks, the engine
//! evaluates any project time to a fully composited RGBA frame and any
//! time window to a mixed stereo PCM buffer.
//!
//! # Pipeline overview
//!
//! 1. **Index**: clips live in an interval index keyed by their
//!    `[start_frame, end_frame)` placement.
//! 2. **Render**: each active clip decodes and places its layer
//!    (time mapping, fade envelope, affine transform, effects) in its
//!    own task.
//! 3. **Composite**: layers blend bottom-up with Porter-Duff
//!    source-over; lower track index is the background.
//! 4. **Mix**: audio windows resample, sum with per-clip gain, then
//!    pass through master gain and a tanh soft limiter.
//!
//! Media decoding goes through the system codec backend (demux, decode,
//! bilinear scaling, resampling). Image effects load from shared
//! libraries over a fixed C ABI hosted by [`ofx`].
//!
//! The render contract is best-effort per layer: a broken source
//! renders transparent and a broken audio stream contributes silence;
//! no clip failure aborts an evaluation.

mod audio;
mod compose;
mod engine;
mod foundation;
mod sources;
mod timeline;

/// Image-effect plugin hosting over the C plugin ABI.
pub mod ofx;

pub use audio::mix::{accumulate, apply_master_gain, soft_limit};
pub use audio::resample::resample_linear;
pub use compose::blend_layer_over;
pub use engine::{ClipId, Engine};
pub use foundation::core::{FRAME_CHANNELS, Frame, TrackKind};
pub use foundation::error::{CutlineError, CutlineResult};
pub use foundation::timecode::format_timecode;
pub use ofx::host::{load_plugin as load_ofx_plugin, shutdown as shutdown_ofx_host};
pub use sources::{
    AUDIO_CHANNELS, AUDIO_SAMPLE_RATE, ColorSource, ImageSource, MediaSource, VideoSource,
};
pub use timeline::builder::ClipBuilder;
pub use timeline::clip::{Clip, Effect, FadeType, Transform, fade_value};
pub use timeline::interval::IntervalIndex;
