use std::sync::Arc;

use crate::foundation::error::{CutlineError, CutlineResult};
use crate::sources::MediaSource;
use crate::timeline::clip::{Clip, Effect, FadeType, Transform};

/// Fluent construction of a [`Clip`] for hosts that configure placement,
/// fades, transform and effects in one expression before handing the
/// clip to the engine.
///
/// ```
/// use std::sync::Arc;
/// use cutline::{ClipBuilder, ColorSource, FadeType, MediaSource};
///
/// let source = Arc::new(MediaSource::Color(ColorSource::new(255, 0, 0, 255)));
/// let clip = ClipBuilder::new("lower third", source)
///     .track(1)
///     .start_frame(30)
///     .duration_frames(120)
///     .fade_in(12, FadeType::Smooth)
///     .position(0.0, 240.0)
///     .scale(0.5, 0.5)
///     .build()
///     .unwrap();
/// assert_eq!(clip.end_frame(), 150);
/// ```
pub struct ClipBuilder {
    clip: Clip,
}

impl ClipBuilder {
    pub fn new(name: impl Into<String>, source: Arc<MediaSource>) -> Self {
        Self {
            clip: Clip::new(name, 0, 0, 0.0, source, 0),
        }
    }

    pub fn track(mut self, track_index: usize) -> Self {
        self.clip.track_index = track_index;
        self
    }

    pub fn start_frame(mut self, start_frame: i64) -> Self {
        self.clip.start_frame = start_frame;
        self
    }

    pub fn duration_frames(mut self, duration_frames: i64) -> Self {
        self.clip.duration_frames = duration_frames;
        self
    }

    pub fn source_offset(mut self, seconds: f64) -> Self {
        self.clip.source_offset = seconds;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.clip.opacity = opacity;
        self
    }

    pub fn fade_in(mut self, frames: i64, kind: FadeType) -> Self {
        self.clip.fade_in_frames = frames;
        self.clip.fade_in_kind = kind;
        self
    }

    pub fn fade_out(mut self, frames: i64, kind: FadeType) -> Self {
        self.clip.fade_out_frames = frames;
        self.clip.fade_out_kind = kind;
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.clip.transform = transform;
        self
    }

    /// Offset of the source center from the canvas center, in pixels.
    pub fn position(mut self, x: f64, y: f64) -> Self {
        self.clip.transform.x = x;
        self.clip.transform.y = y;
        self
    }

    pub fn scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.clip.transform.scale_x = scale_x;
        self.clip.transform.scale_y = scale_y;
        self
    }

    /// Rotation in degrees clockwise.
    pub fn rotation(mut self, degrees: f64) -> Self {
        self.clip.transform.rotation = degrees;
        self
    }

    pub fn effect(mut self, name: impl Into<String>, plugin_path: impl Into<String>) -> Self {
        self.clip.effects.push(Effect {
            name: name.into(),
            plugin_path: plugin_path.into(),
            enabled: true,
        });
        self
    }

    pub fn build(self) -> CutlineResult<Clip> {
        if self.clip.start_frame < 0 {
            return Err(CutlineError::invalid_argument(format!(
                "start_frame must be >= 0, got {}",
                self.clip.start_frame
            )));
        }
        if self.clip.duration_frames < 0 {
            return Err(CutlineError::invalid_argument(format!(
                "duration_frames must be >= 0, got {}",
                self.clip.duration_frames
            )));
        }
        if !(0.0..=1.0).contains(&self.clip.opacity) {
            return Err(CutlineError::invalid_argument(format!(
                "opacity must be within [0, 1], got {}",
                self.clip.opacity
            )));
        }
        Ok(self.clip)
    }
}
