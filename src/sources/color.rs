use crate::foundation::core::Frame;

/// A solid-color source. Infinite duration, no audio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ColorSource {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorSource {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub(crate) fn frame(&self, w: u32, h: u32) -> Frame {
        let mut frame = Frame::new(w, h);
        frame.fill([self.r, self.g, self.b, self.a]);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_pixel_with_the_quadruple() {
        let frame = ColorSource::new(10, 20, 30, 40).frame(3, 2);
        assert_eq!(frame.data().len(), 3 * 2 * 4);
        for px in frame.data().chunks_exact(4) {
            assert_eq!(px, [10, 20, 30, 40]);
        }
    }
}
