use std::sync::Arc;

use crate::foundation::core::Frame;
use crate::ofx;
use crate::sources::MediaSource;

/// Smallest usable scale factor; zero-ish scales clamp here instead of
/// collapsing the inverse mapping.
const MIN_SCALE: f64 = 1e-3;

/// Placement of a source on the canvas.
///
/// `(x, y)` is the offset in canvas pixels of the source center from the
/// canvas center; rotation is degrees clockwise about the source center;
/// Y grows downward. The anchor is carried for hosts but does not enter
/// the rotation math.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
    pub anchor_x: f64,
    pub anchor_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            anchor_x: 0.5,
            anchor_y: 0.5,
        }
    }
}

impl Transform {
    pub fn is_identity(&self) -> bool {
        self.x == 0.0
            && self.y == 0.0
            && self.scale_x == 1.0
            && self.scale_y == 1.0
            && self.rotation == 0.0
    }
}

fn safe_scale(v: f64) -> f64 {
    if v.abs() < MIN_SCALE { MIN_SCALE } else { v }
}

/// Opacity-envelope transfer curves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FadeType {
    #[default]
    Linear,
    Fast,
    Slow,
    Smooth,
    Sharp,
}

/// Evaluate a fade curve at `t` (clamped to `[0,1]`). Returns the curve
/// value for a fade-in, its complement for a fade-out.
pub fn fade_value(kind: FadeType, t: f64, fade_in: bool) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let v = match kind {
        FadeType::Linear => t,
        FadeType::Fast => t.powf(0.25),
        FadeType::Slow => t.powi(4),
        FadeType::Smooth => t * t * (3.0 - 2.0 * t),
        FadeType::Sharp => 0.5 * ((std::f64::consts::PI * (t - 0.5)).sin() + 1.0),
    };
    (if fade_in { v } else { 1.0 - v }) as f32
}

/// A named, enabled/disabled effect applied to a clip's rendered layer.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Effect {
    pub name: String,
    pub plugin_path: String,
    pub enabled: bool,
}

/// One clip on the timeline: placement, source binding, opacity
/// envelope, transform, and effect chain.
///
/// Clips are shared between the engine's interval index and external
/// handles; all fields are plain data so a snapshot is a cheap clone
/// (the source is behind an `Arc`).
#[derive(Clone, Debug)]
pub struct Clip {
    pub name: String,
    pub start_frame: i64,
    pub duration_frames: i64,
    /// Seconds into the source at which playback begins.
    pub source_offset: f64,
    pub source: Arc<MediaSource>,
    pub track_index: usize,
    pub opacity: f32,
    pub fade_in_frames: i64,
    pub fade_out_frames: i64,
    pub fade_in_kind: FadeType,
    pub fade_out_kind: FadeType,
    pub transform: Transform,
    pub effects: Vec<Effect>,
}

impl Clip {
    pub fn new(
        name: impl Into<String>,
        start_frame: i64,
        duration_frames: i64,
        source_offset: f64,
        source: Arc<MediaSource>,
        track_index: usize,
    ) -> Self {
        Self {
            name: name.into(),
            start_frame,
            duration_frames,
            source_offset,
            source,
            track_index,
            opacity: 1.0,
            fade_in_frames: 0,
            fade_out_frames: 0,
            fade_in_kind: FadeType::Linear,
            fade_out_kind: FadeType::Linear,
            transform: Transform::default(),
            effects: Vec::new(),
        }
    }

    pub fn end_frame(&self) -> i64 {
        self.start_frame + self.duration_frames
    }

    /// The opacity envelope at an absolute frame: base opacity shaped by
    /// the fade-in and fade-out ramps, clamped to `[0, 1]`.
    pub fn opacity_at(&self, absolute_frame: i64) -> f32 {
        let local_frame = absolute_frame - self.start_frame;
        let mut alpha = self.opacity;

        if self.fade_in_frames > 0 && local_frame < self.fade_in_frames {
            let t = local_frame as f64 / self.fade_in_frames as f64;
            alpha *= fade_value(self.fade_in_kind, t, true);
        } else if self.fade_out_frames > 0
            && local_frame > self.duration_frames - self.fade_out_frames
        {
            let fade_out_start = self.duration_frames - self.fade_out_frames;
            let t = (local_frame - fade_out_start) as f64 / self.fade_out_frames as f64;
            alpha *= fade_value(self.fade_out_kind, t, false);
        }

        alpha.clamp(0.0, 1.0)
    }

    /// Render this clip's layer for one absolute frame onto a `w x h`
    /// canvas: local-time mapping, source fetch, opacity envelope,
    /// affine placement, then the enabled effects chain.
    pub fn render(&self, w: u32, h: u32, fps: f64, absolute_frame: i64) -> Frame {
        let raw_time = (absolute_frame - self.start_frame) as f64 / fps + self.source_offset;
        let local_time = wrap_local_time(raw_time, self.source.duration());

        let mut layer = self.source.frame(local_time, w, h);
        if layer.is_empty() {
            return layer;
        }

        let alpha = self.opacity_at(absolute_frame);
        if alpha < 1.0 {
            for px in layer.data_mut().chunks_exact_mut(4) {
                px[3] = (f32::from(px[3]) * alpha) as u8;
            }
        }

        let mut layer = if self.transform.is_identity() && layer.width() == w && layer.height() == h
        {
            layer
        } else {
            place_transformed(&layer, w, h, &self.transform)
        };

        for effect in &self.effects {
            if effect.enabled {
                ofx::host::render_in_place(&effect.plugin_path, layer.data_mut(), w, h);
            }
        }

        layer
    }
}

/// Map a raw clip-local time into a finite source's `[0, duration)`
/// range so finite sources loop; static sources (`duration <= 0`) pass
/// through unchanged.
fn wrap_local_time(local_time: f64, source_duration: f64) -> f64 {
    if source_duration > 0.0 {
        ((local_time % source_duration) + source_duration) % source_duration
    } else {
        local_time
    }
}

/// Place `src` onto a transparent `w x h` canvas under the clip
/// transform, sampling nearest-neighbor through the inverse mapping.
fn place_transformed(src: &Frame, w: u32, h: u32, transform: &Transform) -> Frame {
    let mut out = Frame::new(w, h);
    if src.is_empty() {
        return out;
    }

    let theta = transform.rotation.to_radians();
    let (sin_t, cos_t) = theta.sin_cos();
    let sx = safe_scale(transform.scale_x);
    let sy = safe_scale(transform.scale_y);

    let src_w = src.width() as i64;
    let src_h = src.height() as i64;
    let src_cx = src.width() as f64 * 0.5;
    let src_cy = src.height() as f64 * 0.5;
    let dst_cx = w as f64 * 0.5 + transform.x;
    let dst_cy = h as f64 * 0.5 + transform.y;

    // Bounding box of the scaled, rotated source quad in canvas space.
    let hw = src_cx * sx;
    let hh = src_cy * sy;
    let corners_x = [-hw, hw, hw, -hw];
    let corners_y = [-hh, -hh, hh, hh];
    let (mut min_x, mut max_x) = (f64::from(w), 0.0f64);
    let (mut min_y, mut max_y) = (f64::from(h), 0.0f64);
    for i in 0..4 {
        let rx = corners_x[i] * cos_t - corners_y[i] * sin_t + dst_cx;
        let ry = corners_x[i] * sin_t + corners_y[i] * cos_t + dst_cy;
        min_x = min_x.min(rx);
        max_x = max_x.max(rx);
        min_y = min_y.min(ry);
        max_y = max_y.max(ry);
    }

    let start_x = (min_x.floor() as i64).max(0);
    let end_x = ((max_x.ceil() as i64) + 1).min(i64::from(w));
    let start_y = (min_y.floor() as i64).max(0);
    let end_y = ((max_y.ceil() as i64) + 1).min(i64::from(h));

    let inv_sx = 1.0 / sx;
    let inv_sy = 1.0 / sy;
    let src_data = src.data();
    let src_row = src.row_bytes();
    let dst_row = out.row_bytes();
    let dst_data = out.data_mut();

    for y in start_y..end_y {
        let by = y as f64 - dst_cy;
        let rx_base = by * sin_t;
        let ry_base = by * cos_t;
        for x in start_x..end_x {
            let bx = x as f64 - dst_cx;
            // Inverse rotation, then inverse scale, into source space.
            let u = (bx * cos_t + rx_base) * inv_sx + src_cx;
            let v = (-bx * sin_t + ry_base) * inv_sy + src_cy;
            let iu = u.floor() as i64;
            let iv = v.floor() as i64;
            if iu >= 0 && iu < src_w && iv >= 0 && iv < src_h {
                let si = iv as usize * src_row + iu as usize * 4;
                let di = y as usize * dst_row + x as usize * 4;
                dst_data[di..di + 4].copy_from_slice(&src_data[si..si + 4]);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::ColorSource;

    fn color_clip(track: usize) -> Clip {
        let source = Arc::new(MediaSource::Color(ColorSource::new(255, 0, 0, 255)));
        Clip::new("red", 0, 30, 0.0, source, track)
    }

    #[test]
    fn fade_endpoints_and_symmetry() {
        for kind in [
            FadeType::Linear,
            FadeType::Fast,
            FadeType::Slow,
            FadeType::Smooth,
            FadeType::Sharp,
        ] {
            assert!((fade_value(kind, 0.0, true)).abs() < 1e-6, "{kind:?} in(0)");
            assert!(
                (fade_value(kind, 1.0, true) - 1.0).abs() < 1e-6,
                "{kind:?} in(1)"
            );
            for i in 0..=10 {
                let t = f64::from(i) / 10.0;
                let sum = fade_value(kind, t, true) + fade_value(kind, t, false);
                assert!((sum - 1.0).abs() < 1e-6, "{kind:?} symmetry at {t}");
            }
        }
    }

    #[test]
    fn fade_curves_are_monotone() {
        for kind in [
            FadeType::Linear,
            FadeType::Fast,
            FadeType::Slow,
            FadeType::Smooth,
            FadeType::Sharp,
        ] {
            let mut prev = fade_value(kind, 0.0, true);
            for i in 1..=100 {
                let t = f64::from(i) / 100.0;
                let v = fade_value(kind, t, true);
                assert!(v >= prev - 1e-6, "{kind:?} not monotone at {t}");
                prev = v;
            }
        }
    }

    #[test]
    fn fade_clamps_t_out_of_range() {
        assert_eq!(fade_value(FadeType::Linear, -0.5, true), 0.0);
        assert_eq!(fade_value(FadeType::Linear, 1.5, true), 1.0);
    }

    #[test]
    fn opacity_envelope_ramps_in_and_out() {
        let mut clip = color_clip(0);
        clip.fade_in_frames = 10;
        clip.fade_out_frames = 10;

        assert_eq!(clip.opacity_at(0), 0.0);
        assert!((clip.opacity_at(5) - 0.5).abs() < 1e-6);
        assert_eq!(clip.opacity_at(15), 1.0);
        assert!((clip.opacity_at(25) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn opacity_scales_with_base_opacity() {
        let mut clip = color_clip(0);
        clip.opacity = 0.5;
        clip.fade_in_frames = 10;
        assert!((clip.opacity_at(5) - 0.25).abs() < 1e-6);
        assert!((clip.opacity_at(20) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn render_full_opacity_is_source_verbatim() {
        let clip = color_clip(0);
        let frame = clip.render(8, 8, 30.0, 1);
        for px in frame.data().chunks_exact(4) {
            assert_eq!(px, [255, 0, 0, 255]);
        }
    }

    #[test]
    fn render_applies_alpha_envelope() {
        let mut clip = color_clip(0);
        clip.fade_in_frames = 10;
        let frame = clip.render(8, 8, 30.0, 5);
        for px in frame.data().chunks_exact(4) {
            assert_eq!(px, [255, 0, 0, 127]);
        }
    }

    #[test]
    fn translation_moves_the_layer() {
        let mut clip = color_clip(0);
        // Push the source fully off to the right by half the canvas; the
        // left half of the canvas becomes transparent.
        clip.transform.x = 4.0;
        let frame = clip.render(8, 8, 30.0, 1);
        let data = frame.data();
        // Leftmost pixel of row 0 is transparent, rightmost is red.
        assert_eq!(&data[0..4], [0, 0, 0, 0]);
        let right = (8 - 1) * 4;
        assert_eq!(&data[right..right + 4], [255, 0, 0, 255]);
    }

    #[test]
    fn rotation_180_keeps_the_interior_filled() {
        let mut clip = color_clip(0);
        clip.transform.rotation = 180.0;
        let frame = clip.render(8, 8, 30.0, 1);
        let data = frame.data();
        // The half-open source grid loses one row/column at the leading
        // edge under a 180-degree flip; the interior maps 1:1.
        for y in 1..8usize {
            for x in 1..8usize {
                let i = (y * 8 + x) * 4;
                assert_eq!(&data[i..i + 4], [255, 0, 0, 255], "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn downscale_leaves_transparent_margins() {
        let mut clip = color_clip(0);
        clip.transform.scale_x = 0.5;
        clip.transform.scale_y = 0.5;
        let frame = clip.render(8, 8, 30.0, 1);
        let data = frame.data();
        // Corner is outside the scaled quad.
        assert_eq!(&data[0..4], [0, 0, 0, 0]);
        // Center is inside.
        let center = (4 * 8 + 4) * 4;
        assert_eq!(&data[center..center + 4], [255, 0, 0, 255]);
    }

    #[test]
    fn local_time_wraps_finite_sources() {
        let d = 2.5;
        // One whole source period later maps to the same local time.
        assert!((wrap_local_time(0.4, d) - 0.4).abs() < 1e-9);
        assert!((wrap_local_time(0.4 + d, d) - 0.4).abs() < 1e-9);
        assert!((wrap_local_time(0.4 + 3.0 * d, d) - 0.4).abs() < 1e-9);
        // Negative times wrap forward into range.
        assert!((wrap_local_time(-0.5, d) - 2.0).abs() < 1e-9);
        // Static sources pass through, including negative times.
        assert_eq!(wrap_local_time(7.25, -1.0), 7.25);
        assert_eq!(wrap_local_time(-3.0, 0.0), -3.0);
    }

    #[test]
    fn tiny_scale_clamps_instead_of_dividing_by_zero() {
        let mut clip = color_clip(0);
        clip.transform.scale_x = 0.0;
        clip.transform.scale_y = 0.0;
        // Must not panic; nearly everything is transparent.
        let frame = clip.render(8, 8, 30.0, 1);
        assert_eq!(frame.width(), 8);
    }
}
