use crate::foundation::error::{UndulaError, UndulaResult};

/// Build a Q16 fixed-point Gaussian kernel of `2 * radius + 1` taps whose
/// weights sum to exactly `1 << 16`.
pub(crate) fn gaussian_kernel_q16(radius: u32, sigma: f32) -> UndulaResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(UndulaError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(UndulaError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = (((wf / sum) * 65536.0).round() as i64).clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Fold rounding residue into the center tap so the kernel is exact.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

/// Separable Gaussian blur over a premultiplied RGBA8 buffer.
///
/// Runs the same stride-parameterized pass twice, once per axis, with
/// `scratch` carrying the intermediate; all three buffers must be
/// `width * height * 4` bytes and are caller-owned so repeated frames
/// allocate nothing.
pub(crate) fn blur_premul_rgba8(
    src: &[u8],
    dst: &mut [u8],
    scratch: &mut [u8],
    width: u32,
    height: u32,
    kernel_q16: &[u32],
) {
    if kernel_q16.len() == 1 {
        dst.copy_from_slice(src);
        return;
    }
    directional_pass(src, scratch, width, height, kernel_q16, Axis::X);
    directional_pass(scratch, dst, width, height, kernel_q16, Axis::Y);
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// One 1D convolution sweep. The image is treated as `lines` independent
/// pixel runs of length `len`: rows for [`Axis::X`], columns for
/// [`Axis::Y`]; only the stride pair differs between the two.
fn directional_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32], axis: Axis) {
    let (w, h) = (width as usize, height as usize);
    let (lines, len, line_stride, px_stride) = match axis {
        Axis::X => (h, w, w * 4, 4),
        Axis::Y => (w, h, 4, w * 4),
    };
    let radius = (k.len() / 2) as i64;
    let last = len as i64 - 1;

    for line in 0..lines {
        let base = line * line_stride;
        for i in 0..len {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                // Edge taps clamp to the run boundary (extend, not wrap).
                let j = (i as i64 + ki as i64 - radius).clamp(0, last) as usize;
                let idx = base + j * px_stride;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out = base + i * px_stride;
            for c in 0..4 {
                dst[out + c] = ((acc[c] + 32768) >> 16).min(255) as u8;
            }
        }
    }
}
