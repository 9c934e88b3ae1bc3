use std::path::{Path, PathBuf};

use ffmpeg_the_third as ffmpeg;

use ffmpeg::codec;
use ffmpeg::format::{self, Pixel};
use ffmpeg::media::Type as MediaType;
use ffmpeg::software::scaling::{Context as ScaleCtx, Flags as ScaleFlags};
use ffmpeg::util::frame::video::Video as VideoFrame;
use parking_lot::Mutex;

use crate::foundation::core::Frame;
use crate::foundation::error::{CutlineError, CutlineResult};
use crate::sources::{codec_gate, fit_rect};

/// A still-image source decoded through the codec backend.
///
/// The file is decoded lazily on the first `frame` call (or when the
/// requested size changes) and the letterboxed result is cached. A file
/// that fails to open or decode marks the source invalid; an invalid
/// source serves zero-filled frames from then on.
pub struct ImageSource {
    path: PathBuf,
    state: Mutex<ImageState>,
}

#[derive(Default)]
struct ImageState {
    cached: Option<CachedImage>,
    failed: bool,
}

struct CachedImage {
    width: u32,
    height: u32,
    frame: Frame,
}

impl ImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(ImageState::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_valid(&self) -> bool {
        !self.state.lock().failed
    }

    pub(crate) fn frame(&self, w: u32, h: u32) -> Frame {
        let mut state = self.state.lock();
        if state.failed {
            return Frame::new(w, h);
        }
        if let Some(cached) = &state.cached
            && cached.width == w
            && cached.height == h
        {
            return cached.frame.clone();
        }

        match decode_letterboxed(&self.path, w, h) {
            Ok(frame) => {
                state.cached = Some(CachedImage {
                    width: w,
                    height: h,
                    frame: frame.clone(),
                });
                frame
            }
            Err(err) => {
                log::warn!("image decode failed for '{}': {err}", self.path.display());
                state.failed = true;
                Frame::new(w, h)
            }
        }
    }
}

/// Decode the first frame of `path` and letterbox it into a transparent
/// `w x h` canvas.
fn decode_letterboxed(path: &Path, w: u32, h: u32) -> CutlineResult<Frame> {
    let path_buf = path.to_path_buf();
    let mut input = {
        let _gate = codec_gate().lock();
        format::input(&path_buf)
            .map_err(|e| CutlineError::open_failure(format!("{}: {e}", path.display())))?
    };

    let stream_index = input
        .streams()
        .best(MediaType::Video)
        .ok_or_else(|| {
            CutlineError::invalid_source(format!("no image stream in '{}'", path.display()))
        })?
        .index();

    let parameters = input
        .stream(stream_index)
        .ok_or_else(|| CutlineError::invalid_source("image stream vanished after probe"))?
        .parameters();
    let mut decoder = {
        let _gate = codec_gate().lock();
        codec::context::Context::from_parameters(parameters)
            .map_err(|e| CutlineError::decode(format!("decoder context: {e}")))?
            .decoder()
            .video()
            .map_err(|e| CutlineError::decode(format!("open image decoder: {e}")))?
    };

    let mut decoded = VideoFrame::empty();
    let mut got_frame = false;
    for result in input.packets() {
        let Ok((stream, packet)) = result else { break };
        if stream.index() != stream_index {
            continue;
        }
        if decoder.send_packet(&packet).is_err() {
            continue;
        }
        if decoder.receive_frame(&mut decoded).is_ok() {
            got_frame = true;
            break;
        }
    }
    if !got_frame {
        // Single-image codecs may only hand the frame back at EOF.
        let _ = decoder.send_eof();
        got_frame = decoder.receive_frame(&mut decoded).is_ok();
    }
    if !got_frame {
        return Err(CutlineError::decode(format!(
            "no decodable frame in '{}'",
            path.display()
        )));
    }

    let (fit_w, fit_h, fit_x, fit_y) = fit_rect(decoded.width(), decoded.height(), w, h);
    let mut scaler = ScaleCtx::get(
        decoded.format(),
        decoded.width(),
        decoded.height(),
        Pixel::RGBA,
        fit_w,
        fit_h,
        ScaleFlags::BILINEAR,
    )
    .map_err(|e| CutlineError::decode(format!("create image scaler: {e}")))?;
    let mut rgba = VideoFrame::empty();
    scaler
        .run(&decoded, &mut rgba)
        .map_err(|e| CutlineError::decode(format!("scale image: {e}")))?;

    let mut out = Frame::new(w, h);
    blit_rgba(&mut out, &rgba, fit_w, fit_h, fit_x, fit_y);

    {
        let _gate = codec_gate().lock();
        drop(decoder);
        drop(input);
    }
    Ok(out)
}

/// Copy a decoded RGBA frame (with its own stride) into `out` at the
/// letterbox offset.
fn blit_rgba(out: &mut Frame, rgba: &VideoFrame, fit_w: u32, fit_h: u32, fit_x: u32, fit_y: u32) {
    let src = rgba.data(0);
    let src_stride = rgba.stride(0);
    let dst_stride = out.row_bytes();
    let dst = out.data_mut();
    let row_len = fit_w as usize * 4;

    for row in 0..fit_h as usize {
        let src_off = row * src_stride;
        let dst_off = (fit_y as usize + row) * dst_stride + fit_x as usize * 4;
        if src_off + row_len > src.len() || dst_off + row_len > dst.len() {
            break;
        }
        dst[dst_off..dst_off + row_len].copy_from_slice(&src[src_off..src_off + row_len]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_degrades_to_zero_frames() {
        let source = ImageSource::new("/definitely/not/here.png");
        let frame = source.frame(16, 9);
        assert_eq!((frame.width(), frame.height()), (16, 9));
        assert!(frame.data().iter().all(|&b| b == 0));
        assert!(!source.is_valid());

        // Still zero-filled (and still the right size) on later calls.
        let frame = source.frame(4, 4);
        assert_eq!(frame.data().len(), 4 * 4 * 4);
        assert!(frame.data().iter().all(|&b| b == 0));
    }
}
