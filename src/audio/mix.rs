//! Sample-buffer helpers shared by the engine's audio mixing pass.

/// Accumulate `samples * gain` into `out`, stopping at the shorter of the
/// two buffers.
pub fn accumulate(out: &mut [f32], samples: &[f32], gain: f32) {
    let n = out.len().min(samples.len());
    for (dst, src) in out[..n].iter_mut().zip(&samples[..n]) {
        *dst += src * gain;
    }
}

pub fn apply_master_gain(samples: &mut [f32], gain: f32) {
    for s in samples {
        *s *= gain;
    }
}

/// Soft limiter: NaN samples become silence, anything beyond full scale
/// is pushed through `tanh`. Samples already inside `[-1, 1]` pass
/// untouched, which makes the limiter idempotent.
pub fn soft_limit(samples: &mut [f32]) {
    for s in samples {
        if s.is_nan() {
            *s = 0.0;
        } else if *s > 1.0 || *s < -1.0 {
            *s = s.tanh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_respects_shorter_buffer() {
        let mut out = vec![0.0f32; 4];
        accumulate(&mut out, &[1.0, 1.0], 0.5);
        assert_eq!(out, vec![0.5, 0.5, 0.0, 0.0]);

        let mut short = vec![0.0f32; 2];
        accumulate(&mut short, &[1.0, 1.0, 1.0, 1.0], 1.0);
        assert_eq!(short, vec![1.0, 1.0]);
    }

    #[test]
    fn limiter_zeroes_nan_and_squashes_overs() {
        let mut buf = vec![f32::NAN, 0.5, 2.0, -3.0];
        soft_limit(&mut buf);
        assert_eq!(buf[0], 0.0);
        assert_eq!(buf[1], 0.5);
        assert!((buf[2] - 2.0f32.tanh()).abs() < 1e-6);
        assert!((buf[3] - (-3.0f32).tanh()).abs() < 1e-6);
    }

    #[test]
    fn limiter_is_idempotent() {
        let mut once = vec![0.0, 0.9, -0.9, 1.5, -2.5, 10.0];
        soft_limit(&mut once);
        let mut twice = once.clone();
        soft_limit(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn master_gain_scales_everything() {
        let mut buf = vec![0.25, -0.5];
        apply_master_gain(&mut buf, 2.0);
        assert_eq!(buf, vec![0.5, -1.0]);
    }
}
