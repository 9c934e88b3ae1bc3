use crate::foundation::error::{CutlineError, CutlineResult};

/// Bytes per pixel. Every buffer in the crate is 8-bit RGBA, row-major,
/// top-left origin, stride = `width * 4`.
pub const FRAME_CHANNELS: usize = 4;

/// An owned RGBA8 pixel buffer.
///
/// Invariant: `data.len() == width * height * 4`. The zero-sized frame
/// (`Frame::empty()`) is the "no data" marker used throughout the render
/// path; a broken layer is an empty frame, never a panic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// A transparent (all-zero) frame of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * FRAME_CHANNELS],
        }
    }

    /// The 0x0 "no data" frame.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    /// Wrap an existing RGBA8 buffer, checking the size invariant.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> CutlineResult<Self> {
        let expected = width as usize * height as usize * FRAME_CHANNELS;
        if data.len() != expected {
            return Err(CutlineError::invalid_argument(format!(
                "rgba8 buffer is {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row_bytes(&self) -> usize {
        self.width as usize * FRAME_CHANNELS
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Fill every pixel with the given straight-alpha RGBA value.
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.data.chunks_exact_mut(FRAME_CHANNELS) {
            px.copy_from_slice(&rgba);
        }
    }
}

/// Track kinds, stored as a parallel sequence indexed by a clip's
/// `track_index`. The raw values are part of the host-facing contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TrackKind {
    Video = 1,
    Audio = 2,
}

impl TrackKind {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(Self::Video),
            2 => Some(Self::Audio),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_frame_holds_size_invariant() {
        let f = Frame::new(16, 9);
        assert_eq!(f.data().len(), 16 * 9 * 4);
        assert_eq!(f.row_bytes(), 64);
        assert!(!f.is_empty());
        assert!(f.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn empty_frame_is_the_no_data_marker() {
        let f = Frame::empty();
        assert!(f.is_empty());
        assert_eq!((f.width(), f.height()), (0, 0));
    }

    #[test]
    fn from_rgba8_rejects_bad_lengths() {
        assert!(Frame::from_rgba8(2, 2, vec![0; 16]).is_ok());
        assert!(Frame::from_rgba8(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn fill_writes_every_pixel() {
        let mut f = Frame::new(3, 2);
        f.fill([255, 0, 0, 255]);
        for px in f.data().chunks_exact(4) {
            assert_eq!(px, [255, 0, 0, 255]);
        }
    }

    #[test]
    fn track_kind_raw_roundtrip() {
        assert_eq!(TrackKind::from_raw(1), Some(TrackKind::Video));
        assert_eq!(TrackKind::from_raw(2), Some(TrackKind::Audio));
        assert_eq!(TrackKind::from_raw(0), None);
        assert_eq!(TrackKind::from_raw(3), None);
        assert_eq!(TrackKind::Audio.as_raw(), 2);
    }
}
