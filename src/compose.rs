use crate::foundation::core::Frame;
use crate::foundation::error::{CutlineError, CutlineResult};

/// Porter-Duff "source over" of a straight-alpha layer onto an opaque
/// canvas, in place.
///
/// Integer fixed-point per channel: `out = (src * a + dst * (255 - a)) >> 8`,
/// with fast paths for fully transparent (skip) and fully opaque (word
/// copy) pixels. The canvas alpha is pinned to 255.
pub fn blend_layer_over(canvas: &mut Frame, layer: &Frame) -> CutlineResult<()> {
    if canvas.width() != layer.width() || canvas.height() != layer.height() {
        return Err(CutlineError::invalid_argument(format!(
            "layer {}x{} does not match canvas {}x{}",
            layer.width(),
            layer.height(),
            canvas.width(),
            canvas.height()
        )));
    }

    for (dst, src) in canvas
        .data_mut()
        .chunks_exact_mut(4)
        .zip(layer.data().chunks_exact(4))
    {
        let alpha = u32::from(src[3]);
        if alpha == 0 {
            continue;
        }
        if alpha == 255 {
            dst.copy_from_slice(src);
            continue;
        }
        let inv = 255 - alpha;
        dst[0] = ((u32::from(src[0]) * alpha + u32::from(dst[0]) * inv) >> 8) as u8;
        dst[1] = ((u32::from(src[1]) * alpha + u32::from(dst[1]) * inv) >> 8) as u8;
        dst[2] = ((u32::from(src[2]) * alpha + u32::from(dst[2]) * inv) >> 8) as u8;
        dst[3] = 255;
    }
    Ok(())
}
