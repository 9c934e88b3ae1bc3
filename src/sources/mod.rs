//! Media sources: where pixels and samples come from.
//!
//! The source set is closed — solid colors, still images, and demuxed
//! video — so `MediaSource` is a tagged enum rather than a trait object.
//! Every variant answers `frame(local_time, w, h)` with an RGBA8 frame
//! already letterboxed to the requested size; only video answers audio
//! and waveform queries.

mod color;
mod image;
mod video;

pub use color::ColorSource;
pub use image::ImageSource;
pub use video::{AUDIO_CHANNELS, AUDIO_SAMPLE_RATE, VideoSource};

use parking_lot::Mutex;

use crate::foundation::core::Frame;

pub enum MediaSource {
    Color(ColorSource),
    Image(ImageSource),
    Video(VideoSource),
}

impl MediaSource {
    /// An RGBA8 frame for `local_time`, sized `w x h`. Broken sources
    /// yield zero-filled frames, never errors — evaluation is
    /// best-effort per layer.
    pub fn frame(&self, local_time: f64, w: u32, h: u32) -> Frame {
        match self {
            Self::Color(s) => s.frame(w, h),
            Self::Image(s) => s.frame(w, h),
            Self::Video(s) => s.frame(local_time, w, h),
        }
    }

    /// Source duration in seconds; negative means infinite/static.
    pub fn duration(&self) -> f64 {
        match self {
            Self::Color(_) | Self::Image(_) => -1.0,
            Self::Video(s) => s.duration(),
        }
    }

    /// Interleaved stereo f32 samples at 44.1 kHz. Empty unless the
    /// source is video-backed with an audio stream.
    pub fn audio_samples(&self, start_time: f64, duration: f64) -> Vec<f32> {
        match self {
            Self::Color(_) | Self::Image(_) => Vec::new(),
            Self::Video(s) => s.audio_samples(start_time, duration),
        }
    }

    /// `[peak, -peak]` pairs for waveform drawing; empty for non-video.
    pub fn waveform(&self, points: usize) -> Vec<f32> {
        match self {
            Self::Color(_) | Self::Image(_) => Vec::new(),
            Self::Video(s) => s.waveform(points),
        }
    }

    pub fn as_video(&self) -> Option<&VideoSource> {
        match self {
            Self::Video(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Debug for MediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Color(c) => f.debug_tuple("Color").field(c).finish(),
            Self::Image(i) => f.debug_struct("Image").field("path", &i.path()).finish(),
            Self::Video(v) => f.debug_struct("Video").field("path", &v.path()).finish(),
        }
    }
}

/// The codec backend is not reentrant around container open/close and
/// codec open; every such call in the crate runs under this gate. It is
/// never held across packet reading or decoding, so per-clip decode
/// parallelism survives.
pub(crate) fn codec_gate() -> &'static Mutex<()> {
    static GATE: Mutex<()> = Mutex::new(());
    &GATE
}

/// Letterbox fit: uniform scale-to-fit of `src` into `dst`, centered.
/// Returns `(out_w, out_h, out_x, out_y)`.
pub(crate) fn fit_rect(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> (u32, u32, u32, u32) {
    if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
        return (dst_w.max(1), dst_h.max(1), 0, 0);
    }
    let src_aspect = f64::from(src_w) / f64::from(src_h);
    let dst_aspect = f64::from(dst_w) / f64::from(dst_h);

    let (out_w, out_h, out_x, out_y) = if src_aspect > dst_aspect {
        let out_h = (f64::from(dst_w) / src_aspect) as u32;
        (dst_w, out_h, 0, (dst_h - out_h.min(dst_h)) / 2)
    } else {
        let out_w = (f64::from(dst_h) * src_aspect) as u32;
        (out_w, dst_h, (dst_w - out_w.min(dst_w)) / 2, 0)
    };
    (out_w.max(1), out_h.max(1), out_x, out_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_rect_wide_source_letterboxes_vertically() {
        // 2:1 source into a square: full width, half height, centered.
        let (w, h, x, y) = fit_rect(200, 100, 100, 100);
        assert_eq!((w, h, x, y), (100, 50, 0, 25));
    }

    #[test]
    fn fit_rect_tall_source_pillarboxes_horizontally() {
        let (w, h, x, y) = fit_rect(100, 200, 100, 100);
        assert_eq!((w, h, x, y), (50, 100, 25, 0));
    }

    #[test]
    fn fit_rect_matching_aspect_fills() {
        let (w, h, x, y) = fit_rect(1920, 1080, 1280, 720);
        assert_eq!((w, h, x, y), (1280, 720, 0, 0));
    }

    #[test]
    fn fit_rect_survives_degenerate_input() {
        let (w, h, _, _) = fit_rect(0, 0, 64, 64);
        assert!(w >= 1 && h >= 1);
    }

    #[test]
    fn enum_dispatch_for_static_sources() {
        let src = MediaSource::Color(ColorSource::new(1, 2, 3, 4));
        assert!(src.duration() < 0.0);
        assert!(src.audio_samples(0.0, 0.1).is_empty());
        assert!(src.waveform(16).is_empty());
        assert!(src.as_video().is_none());
    }
}
