use std::path::{Path, PathBuf};

use ffmpeg_the_third as ffmpeg;

use ffmpeg::codec;
use ffmpeg::decoder;
use ffmpeg::format::sample::Type as SampleType;
use ffmpeg::format::{self, Pixel, Sample};
use ffmpeg::media::Type as MediaType;
use ffmpeg::software::resampling;
use ffmpeg::software::scaling::{Context as ScaleCtx, Flags as ScaleFlags};
use ffmpeg::util::channel_layout::ChannelLayout;
use ffmpeg::util::frame::audio::Audio as AudioFrame;
use ffmpeg::util::frame::video::Video as VideoFrame;
use parking_lot::Mutex;

use crate::foundation::core::Frame;
use crate::foundation::error::{CutlineError, CutlineResult};
use crate::sources::{codec_gate, fit_rect};

/// Output sample rate for all audio delivered by sources.
pub const AUDIO_SAMPLE_RATE: u32 = 44_100;
/// Delivered audio is always interleaved stereo.
pub const AUDIO_CHANNELS: usize = 2;

/// Returning the same frame for requests within this window skips a
/// decode round trip while scrubbing.
const FRAME_CACHE_EPSILON: f64 = 1e-3;

/// A demuxed media file: mandatory video stream, optional audio stream.
///
/// All decoder state sits behind a per-source mutex — decoders are not
/// reentrant, so two concurrent requests against the same source run
/// sequentially. Container open/close additionally serializes on the
/// process-wide codec gate.
pub struct VideoSource {
    path: PathBuf,
    duration: f64,
    native_width: u32,
    native_height: u32,
    rotation: i32,
    has_audio: bool,
    // `None` only during teardown; the demuxer and codecs must be
    // released under the codec gate, which a plain field drop cannot do.
    inner: Mutex<Option<Inner>>,
}

struct Inner {
    input: format::context::Input,
    video_stream: usize,
    audio_stream: Option<usize>,
    video_decoder: decoder::Video,
    audio_decoder: Option<decoder::Audio>,
    video_time_base: f64,
    audio_time_base: f64,
    scaler: Option<CachedScaler>,
    resampler: Option<resampling::Context>,
    cache: Option<CachedFrame>,
    last_time: f64,
    last_audio_time: f64,
}

// The ffmpeg contexts inside `Inner` are only ever touched by the thread
// holding the instance mutex.
unsafe impl Send for VideoSource {}
unsafe impl Sync for VideoSource {}

struct CachedScaler {
    src_format: Pixel,
    src_w: u32,
    src_h: u32,
    dst_w: u32,
    dst_h: u32,
    ctx: ScaleCtx,
}

struct CachedFrame {
    time: f64,
    width: u32,
    height: u32,
    frame: Frame,
}

impl VideoSource {
    /// Open a container and prepare its decoders. Fails with
    /// `OpenFailure` when the file cannot be demuxed and `InvalidSource`
    /// when it carries no video stream; a missing or broken audio stream
    /// is tolerated and simply yields silence.
    pub fn open(path: impl Into<PathBuf>) -> CutlineResult<Self> {
        let path = path.into();
        let gate = codec_gate().lock();

        let input = format::input(&path)
            .map_err(|e| CutlineError::open_failure(format!("{}: {e}", path.display())))?;

        let video_stream = input
            .streams()
            .best(MediaType::Video)
            .ok_or_else(|| {
                CutlineError::invalid_source(format!("no video stream in '{}'", path.display()))
            })?
            .index();
        let audio_stream = input.streams().best(MediaType::Audio).map(|s| s.index());

        let (video_time_base, rotation, param_w, param_h, video_parameters) = {
            let stream = input.stream(video_stream).ok_or_else(|| {
                CutlineError::invalid_source("selected video stream vanished after probe")
            })?;
            let params = stream.parameters();
            (
                f64::from(stream.time_base()),
                stream_rotation(&stream),
                params.width() as u32,
                params.height() as u32,
                params,
            )
        };

        let mut video_ctx = codec::context::Context::from_parameters(video_parameters)
            .map_err(|e| CutlineError::open_failure(format!("video decoder context: {e}")))?;
        let mut threading = ffmpeg::codec::threading::Config::default();
        threading.kind = ffmpeg::codec::threading::Type::Frame;
        threading.count = 0; // auto
        video_ctx.set_threading(threading);
        let video_decoder = video_ctx
            .decoder()
            .video()
            .map_err(|e| CutlineError::open_failure(format!("open video decoder: {e}")))?;

        let mut audio_decoder = None;
        let mut audio_time_base = 0.0;
        if let Some(index) = audio_stream
            && let Some(stream) = input.stream(index)
        {
            audio_time_base = f64::from(stream.time_base());
            // A corrupt audio stream must not take the video down with it.
            match codec::context::Context::from_parameters(stream.parameters()) {
                Ok(mut ctx) => {
                    let mut threading = ffmpeg::codec::threading::Config::default();
                    threading.kind = ffmpeg::codec::threading::Type::Frame;
                    threading.count = 0;
                    ctx.set_threading(threading);
                    match ctx.decoder().audio() {
                        Ok(dec) => audio_decoder = Some(dec),
                        Err(e) => {
                            log::warn!("audio decoder open failed for '{}': {e}", path.display());
                        }
                    }
                }
                Err(e) => {
                    log::warn!("audio decoder params failed for '{}': {e}", path.display());
                }
            }
        }

        let raw_duration = input.duration();
        let duration = if raw_duration > 0 {
            raw_duration as f64 / f64::from(ffmpeg::ffi::AV_TIME_BASE)
        } else {
            0.0
        };

        let (native_width, native_height) = if param_w > 0 && param_h > 0 {
            (param_w, param_h)
        } else {
            (video_decoder.width(), video_decoder.height())
        };

        drop(gate);

        let has_audio = audio_decoder.is_some();
        Ok(Self {
            path,
            duration,
            native_width,
            native_height,
            rotation,
            has_audio,
            inner: Mutex::new(Some(Inner {
                input,
                video_stream,
                audio_stream,
                video_decoder,
                audio_decoder,
                video_time_base,
                audio_time_base,
                scaler: None,
                resampler: None,
                cache: None,
                last_time: -1.0,
                last_audio_time: -1.0,
            })),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Container duration in seconds (0 when the container does not
    /// report one).
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn has_audio(&self) -> bool {
        self.has_audio
    }

    /// Display rotation in degrees clockwise: 0, 90, 180 or 270.
    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    /// Width as displayed (rotation applied).
    pub fn width(&self) -> u32 {
        if self.rotation == 90 || self.rotation == 270 {
            self.native_height
        } else {
            self.native_width
        }
    }

    /// Height as displayed (rotation applied).
    pub fn height(&self) -> u32 {
        if self.rotation == 90 || self.rotation == 270 {
            self.native_width
        } else {
            self.native_height
        }
    }

    /// Coded width before display rotation.
    pub fn native_width(&self) -> u32 {
        self.native_width
    }

    /// Coded height before display rotation.
    pub fn native_height(&self) -> u32 {
        self.native_height
    }

    /// Decode (or serve from cache) the frame covering `local_time`,
    /// letterboxed into `w x h`. End of stream or a decode error returns
    /// the last cached frame if any, else a zero frame.
    pub(crate) fn frame(&self, local_time: f64, w: u32, h: u32) -> Frame {
        let mut guard = self.inner.lock();
        let Some(inner) = guard.as_mut() else {
            return Frame::new(w, h);
        };

        if let Some(cached) = &inner.cache
            && (cached.time - local_time).abs() < FRAME_CACHE_EPSILON
            && cached.width == w
            && cached.height == h
        {
            return cached.frame.clone();
        }

        match self.decode_frame_at(inner, local_time, w, h) {
            Ok(Some(frame)) => {
                inner.cache = Some(CachedFrame {
                    time: local_time,
                    width: w,
                    height: h,
                    frame: frame.clone(),
                });
                inner.last_time = local_time;
                frame
            }
            Ok(None) => match &inner.cache {
                Some(cached) => cached.frame.clone(),
                None => Frame::new(w, h),
            },
            Err(err) => {
                log::warn!("video decode failed for '{}': {err}", self.path.display());
                match &inner.cache {
                    Some(cached) => cached.frame.clone(),
                    None => Frame::new(w, h),
                }
            }
        }
    }

    fn decode_frame_at(
        &self,
        inner: &mut Inner,
        local_time: f64,
        w: u32,
        h: u32,
    ) -> CutlineResult<Option<Frame>> {
        if inner.video_time_base <= 0.0 {
            return Err(CutlineError::invalid_source("video stream has no time base"));
        }
        let target_pts = (local_time / inner.video_time_base + 0.001) as i64;

        // Seek only when scrubbing backwards or jumping far ahead;
        // otherwise keep reading forward.
        if local_time < inner.last_time || local_time > inner.last_time + 1.0 {
            inner.video_decoder.flush();
            let ts = (local_time.max(0.0) * f64::from(ffmpeg::ffi::AV_TIME_BASE)) as i64;
            if let Err(e) = inner.input.seek(ts, ..ts) {
                log::debug!("video seek to {local_time:.3}s failed: {e}");
            }
        }

        let Inner {
            input,
            video_stream,
            video_decoder,
            scaler,
            ..
        } = inner;

        let mut decoded = VideoFrame::empty();
        for result in input.packets() {
            let Ok((stream, packet)) = result else {
                break; // read errors end the stream like EOF
            };
            if stream.index() != *video_stream {
                continue;
            }
            if video_decoder.send_packet(&packet).is_err() {
                continue; // recoverable per-packet decode error
            }
            while video_decoder.receive_frame(&mut decoded).is_ok() {
                let pts = decoded.pts().unwrap_or(i64::MIN);
                if pts < target_pts {
                    continue;
                }
                let frame = scale_into_canvas(scaler, &decoded, w, h, self.rotation)?;
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// Decode `duration` seconds of audio starting at `start_time`,
    /// resampled to interleaved stereo f32 at 44.1 kHz. The buffer is
    /// always exactly `floor(duration * 44100) * 2` samples; shortfalls
    /// stay zero. Sources without an audio stream return an empty
    /// buffer.
    pub(crate) fn audio_samples(&self, start_time: f64, duration: f64) -> Vec<f32> {
        if !self.has_audio {
            return Vec::new();
        }
        let total = (duration.max(0.0) * f64::from(AUDIO_SAMPLE_RATE)) as usize * AUDIO_CHANNELS;
        let mut out = vec![0.0f32; total];
        if total == 0 {
            return out;
        }

        let mut guard = self.inner.lock();
        let Some(inner) = guard.as_mut() else {
            return out;
        };
        if let Err(err) = self.decode_audio_window(inner, start_time, duration, &mut out) {
            log::warn!("audio decode failed for '{}': {err}", self.path.display());
        }
        out
    }

    fn decode_audio_window(
        &self,
        inner: &mut Inner,
        start_time: f64,
        duration: f64,
        out: &mut [f32],
    ) -> CutlineResult<()> {
        let Some(audio_stream) = inner.audio_stream else {
            return Ok(());
        };
        if inner.audio_time_base <= 0.0 {
            return Err(CutlineError::invalid_source("audio stream has no time base"));
        }
        let time_base = inner.audio_time_base;
        let end_time = start_time + duration;

        if (start_time - inner.last_audio_time).abs() > 0.5 {
            if let Some(dec) = inner.audio_decoder.as_mut() {
                dec.flush();
            }
            // Land slightly early so codec priming frames fall before the
            // window instead of inside it.
            let seek_secs = (start_time - 0.2).max(0.0);
            let ts = (seek_secs * f64::from(ffmpeg::ffi::AV_TIME_BASE)) as i64;
            if let Err(e) = inner.input.seek(ts, ..ts) {
                log::debug!("audio seek to {seek_secs:.3}s failed: {e}");
            }
            inner.last_audio_time = -1.0;
        }

        let Inner {
            input,
            audio_decoder,
            resampler,
            last_audio_time,
            ..
        } = inner;
        let Some(audio_decoder) = audio_decoder.as_mut() else {
            return Ok(());
        };

        let mut raw = AudioFrame::empty();
        'packets: for result in input.packets() {
            let Ok((stream, packet)) = result else {
                break;
            };
            if stream.index() != audio_stream {
                continue;
            }
            if audio_decoder.send_packet(&packet).is_err() {
                continue;
            }
            while audio_decoder.receive_frame(&mut raw).is_ok() {
                let rate = raw.rate();
                if rate == 0 || raw.samples() == 0 {
                    continue;
                }
                let frame_start = raw
                    .pts()
                    .map(|pts| pts as f64 * time_base)
                    .unwrap_or(*last_audio_time);
                let frame_end = frame_start + raw.samples() as f64 / f64::from(rate);

                if frame_end > start_time {
                    if resampler.is_none() {
                        *resampler = Some(build_resampler(&raw)?);
                    }
                    let Some(resampler) = resampler.as_mut() else {
                        return Ok(());
                    };

                    let mut converted = AudioFrame::empty();
                    if resampler.run(&raw, &mut converted).is_ok() && converted.samples() > 0 {
                        copy_window_slice(out, &converted, frame_start, start_time);
                    }
                }

                *last_audio_time = frame_end;
                if frame_start > end_time {
                    break 'packets;
                }
            }
        }
        Ok(())
    }

    /// Peak-magnitude waveform: `points` uniform buckets over the full
    /// duration, each emitted as a `[peak, -peak]` pair for symmetric
    /// drawing. Runs on a dedicated demuxer so it never disturbs
    /// playback decoding state.
    pub fn waveform(&self, points: usize) -> Vec<f32> {
        if points == 0 || !self.has_audio || self.duration <= 0.0 {
            return Vec::new();
        }
        match self.scan_waveform(points) {
            Ok(peaks) => peaks,
            Err(err) => {
                log::warn!("waveform scan failed for '{}': {err}", self.path.display());
                Vec::new()
            }
        }
    }

    fn scan_waveform(&self, points: usize) -> CutlineResult<Vec<f32>> {
        let gate = codec_gate().lock();
        let mut input = format::input(&self.path)
            .map_err(|e| CutlineError::open_failure(format!("{}: {e}", self.path.display())))?;
        let audio_stream = input
            .streams()
            .best(MediaType::Audio)
            .ok_or_else(|| CutlineError::invalid_source("no audio stream for waveform"))?
            .index();
        let parameters = input
            .stream(audio_stream)
            .ok_or_else(|| CutlineError::invalid_source("audio stream vanished after probe"))?
            .parameters();
        let mut decoder = codec::context::Context::from_parameters(parameters)
            .map_err(|e| CutlineError::decode(format!("waveform decoder context: {e}")))?
            .decoder()
            .audio()
            .map_err(|e| CutlineError::decode(format!("open waveform decoder: {e}")))?;
        drop(gate);

        let total_frames = (self.duration * f64::from(AUDIO_SAMPLE_RATE)) as u64;
        let frames_per_bucket = (total_frames / points as u64).max(1);

        let mut out = Vec::with_capacity(points * 2);
        let mut resampler: Option<resampling::Context> = None;
        let mut bucket_peak = 0.0f32;
        let mut bucket_frames = 0u64;
        let mut raw = AudioFrame::empty();

        'packets: for result in input.packets() {
            let Ok((stream, packet)) = result else { break };
            if stream.index() != audio_stream {
                continue;
            }
            if decoder.send_packet(&packet).is_err() {
                continue;
            }
            while decoder.receive_frame(&mut raw).is_ok() {
                if raw.samples() == 0 || raw.rate() == 0 {
                    continue;
                }
                if resampler.is_none() {
                    resampler = Some(build_resampler(&raw)?);
                }
                let Some(resampler) = resampler.as_mut() else {
                    break 'packets;
                };
                let mut converted = AudioFrame::empty();
                if resampler.run(&raw, &mut converted).is_err() || converted.samples() == 0 {
                    continue;
                }
                for pair in interleaved_samples(&converted).chunks_exact(AUDIO_CHANNELS) {
                    bucket_peak = bucket_peak.max(pair[0].abs()).max(pair[1].abs());
                    bucket_frames += 1;
                    if bucket_frames >= frames_per_bucket {
                        if out.len() < points * 2 {
                            let peak = bucket_peak.min(1.0);
                            out.push(peak);
                            out.push(-peak);
                        }
                        bucket_peak = 0.0;
                        bucket_frames = 0;
                        if out.len() >= points * 2 {
                            break 'packets;
                        }
                    }
                }
            }
        }

        out.resize(points * 2, 0.0);

        let _gate = codec_gate().lock();
        drop(decoder);
        drop(input);
        Ok(out)
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        // Container/codec close is part of the non-reentrant backend
        // region; tear the inner state down under the gate.
        let _gate = codec_gate().lock();
        *self.inner.lock() = None;
    }
}

/// Build the per-source resampler: whatever the stream carries in, to
/// packed stereo f32 at 44.1 kHz.
fn build_resampler(reference: &AudioFrame) -> CutlineResult<resampling::Context> {
    // Mono sources must be declared as mono or the layout is misread.
    let src_layout = if reference.ch_layout().channels() >= 2 {
        reference.ch_layout()
    } else {
        ChannelLayout::MONO
    };
    resampling::Context::get2(
        reference.format(),
        src_layout,
        reference.rate(),
        Sample::F32(SampleType::Packed),
        ChannelLayout::STEREO,
        AUDIO_SAMPLE_RATE,
    )
    .map_err(|e| CutlineError::resample(format!("create audio resampler: {e}")))
}

/// The interleaved f32 payload of a packed stereo frame.
fn interleaved_samples(frame: &AudioFrame) -> Vec<f32> {
    let count = frame.samples() * AUDIO_CHANNELS;
    let bytes = frame.data(0);
    bytes
        .chunks_exact(4)
        .take(count)
        .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// Copy the part of `converted` that intersects the output window,
/// landing each sample at its correct offset.
fn copy_window_slice(out: &mut [f32], converted: &AudioFrame, frame_start: f64, window_start: f64) {
    let samples = interleaved_samples(converted);
    let rel = frame_start - window_start;

    let (mut src_index, mut dst_index) = if rel >= 0.0 {
        let dst_frames = (rel * f64::from(AUDIO_SAMPLE_RATE)).round() as usize;
        (0usize, dst_frames * AUDIO_CHANNELS)
    } else {
        let skip_frames = ((-rel) * f64::from(AUDIO_SAMPLE_RATE)).round() as usize;
        (skip_frames * AUDIO_CHANNELS, 0usize)
    };

    while src_index < samples.len() && dst_index < out.len() {
        out[dst_index] = samples[src_index];
        src_index += 1;
        dst_index += 1;
    }
}

/// Resolve the display rotation of a stream from its display-matrix side
/// data, falling back to the legacy `rotate` metadata tag.
fn stream_rotation(stream: &format::stream::Stream) -> i32 {
    for side_data in stream.side_data() {
        if side_data.kind() == ffmpeg::packet::side_data::Type::DisplayMatrix
            && let Some(angle) = display_matrix_rotation(side_data.data())
        {
            return angle;
        }
    }
    if let Some(tag) = stream.metadata().get("rotate")
        && let Ok(angle) = tag.trim().parse::<i32>()
    {
        return normalize_rotation(angle as f64);
    }
    0
}

/// Decode a 3x3 16.16 fixed-point display matrix into a clockwise
/// rotation snapped to a right angle.
fn display_matrix_rotation(data: &[u8]) -> Option<i32> {
    if data.len() < 36 {
        return None;
    }
    let mut m = [0.0f64; 9];
    for (i, value) in m.iter_mut().enumerate() {
        let bytes: [u8; 4] = data[i * 4..i * 4 + 4].try_into().ok()?;
        *value = f64::from(i32::from_ne_bytes(bytes)) / 65536.0;
    }
    let scale0 = (m[0] * m[0] + m[3] * m[3]).sqrt();
    let scale1 = (m[1] * m[1] + m[4] * m[4]).sqrt();
    if scale0 == 0.0 || scale1 == 0.0 {
        return None;
    }
    // Counter-clockwise matrix angle; display rotation is its negation.
    let ccw_degrees = (m[1] / scale1).atan2(m[0] / scale0).to_degrees();
    Some(normalize_rotation(-ccw_degrees))
}

fn normalize_rotation(degrees: f64) -> i32 {
    let wrapped = ((degrees.round() as i32) % 360 + 360) % 360;
    // Snap to the nearest right angle.
    match wrapped {
        45..135 => 90,
        135..225 => 180,
        225..315 => 270,
        _ => 0,
    }
}

/// Bilinear-scale a decoded frame into a letterboxed `w x h` canvas,
/// rotating during the copy when the stream carries a display rotation.
///
/// The letterbox fit is computed against the rotation-adjusted aspect;
/// scaling happens in pre-rotation space so the scaler sees the frame
/// the decoder produced.
fn scale_into_canvas(
    scaler_slot: &mut Option<CachedScaler>,
    decoded: &VideoFrame,
    w: u32,
    h: u32,
    rotation: i32,
) -> CutlineResult<Frame> {
    let src_w = decoded.width();
    let src_h = decoded.height();
    if src_w == 0 || src_h == 0 {
        return Err(CutlineError::decode("decoded frame has zero dimensions"));
    }

    let quarter_turn = rotation == 90 || rotation == 270;
    let (display_w, display_h) = if quarter_turn {
        (src_h, src_w)
    } else {
        (src_w, src_h)
    };
    let (fit_w, fit_h, fit_x, fit_y) = fit_rect(display_w, display_h, w, h);
    let (pre_w, pre_h) = if quarter_turn { (fit_h, fit_w) } else { (fit_w, fit_h) };

    let needs_rebuild = match scaler_slot {
        Some(cached) => {
            cached.src_format != decoded.format()
                || cached.src_w != src_w
                || cached.src_h != src_h
                || cached.dst_w != pre_w
                || cached.dst_h != pre_h
        }
        None => true,
    };
    if needs_rebuild {
        let ctx = ScaleCtx::get(
            decoded.format(),
            src_w,
            src_h,
            Pixel::RGBA,
            pre_w,
            pre_h,
            ScaleFlags::BILINEAR,
        )
        .map_err(|e| CutlineError::decode(format!("create video scaler: {e}")))?;
        *scaler_slot = Some(CachedScaler {
            src_format: decoded.format(),
            src_w,
            src_h,
            dst_w: pre_w,
            dst_h: pre_h,
            ctx,
        });
    }
    let Some(cached) = scaler_slot.as_mut() else {
        return Err(CutlineError::decode("video scaler unavailable"));
    };

    let mut rgba = VideoFrame::empty();
    cached
        .ctx
        .run(decoded, &mut rgba)
        .map_err(|e| CutlineError::decode(format!("scale video frame: {e}")))?;

    let mut out = Frame::new(w, h);
    copy_rotated(
        &mut out,
        rgba.data(0),
        rgba.stride(0),
        pre_w,
        pre_h,
        fit_x,
        fit_y,
        fit_w,
        fit_h,
        rotation,
    );
    Ok(out)
}

/// Copy scaled pixels into the letterbox rect, applying the display
/// rotation. 0 degrees is a straight row-wise copy; quarter and half
/// turns remap per pixel.
#[allow(clippy::too_many_arguments)]
fn copy_rotated(
    out: &mut Frame,
    src: &[u8],
    src_stride: usize,
    pre_w: u32,
    pre_h: u32,
    fit_x: u32,
    fit_y: u32,
    fit_w: u32,
    fit_h: u32,
    rotation: i32,
) {
    let dst_stride = out.row_bytes();
    let dst = out.data_mut();

    if rotation == 0 {
        let row_len = fit_w as usize * 4;
        for row in 0..fit_h as usize {
            let src_off = row * src_stride;
            let dst_off = (fit_y as usize + row) * dst_stride + fit_x as usize * 4;
            if src_off + row_len > src.len() || dst_off + row_len > dst.len() {
                break;
            }
            dst[dst_off..dst_off + row_len].copy_from_slice(&src[src_off..src_off + row_len]);
        }
        return;
    }

    let (pre_w, pre_h) = (pre_w as usize, pre_h as usize);
    for y in 0..fit_h as usize {
        for x in 0..fit_w as usize {
            let (sx, sy) = match rotation {
                90 => (y, pre_h - 1 - x),
                180 => (pre_w - 1 - x, pre_h - 1 - y),
                270 => (pre_w - 1 - y, x),
                _ => (x, y),
            };
            if sx >= pre_w || sy >= pre_h {
                continue;
            }
            let src_off = sy * src_stride + sx * 4;
            let dst_off = (fit_y as usize + y) * dst_stride + (fit_x as usize + x) * 4;
            if src_off + 4 > src.len() || dst_off + 4 > dst.len() {
                continue;
            }
            dst[dst_off..dst_off + 4].copy_from_slice(&src[src_off..src_off + 4]);
        }
    }
}
