//! Shared filtering primitives.
//!
//! Border handling, 1D kernels and separable convolution over float
//! channel planes. Every neighborhood filter in the pipeline samples
//! outside the image through [`reflect101`].

use crate::buffer::Rgb8Image;

/// Map an index that may fall outside `0..n` back inside by mirroring
/// about the edge pixels without repeating them.
///
/// ```text
/// n = 5:   -2 -1 | 0 1 2 3 4 | 5 6
///           2  1 | 0 1 2 3 4 | 3 2
/// ```
///
/// Works for any overshoot, including single-pixel extents.
#[inline]
pub(crate) fn reflect101(i: isize, n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let n = n as isize;
    let period = 2 * (n - 1);
    let i = i.rem_euclid(period);
    (if i >= n { period - i } else { i }) as usize
}

/// Gaussian kernel size for a given sigma on 8-bit data: `round(6σ + 1)`,
/// forced odd.
#[inline]
pub(crate) fn gaussian_size(sigma: f32) -> usize {
    ((sigma * 6.0 + 1.0).round() as usize) | 1
}

/// Normalized 1D Gaussian kernel of odd length `size`.
pub(crate) fn gaussian_kernel(sigma: f32, size: usize) -> Vec<f32> {
    let center = (size / 2) as f32;
    let scale = -0.5 / (sigma * sigma);
    let raw: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            f64::from(scale * d * d).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.iter().map(|&w| (w / sum) as f32).collect()
}

/// A single float channel, row-major.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Channel {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl Channel {
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    /// Sample with reflect-101 borders.
    #[inline]
    pub fn at_reflect(&self, x: isize, y: isize) -> f32 {
        self.at(reflect101(x, self.width), reflect101(y, self.height))
    }

    /// Convolve with a symmetric odd-length kernel along both axes.
    pub fn convolve_separable(&self, kernel: &[f32]) -> Channel {
        let radius = (kernel.len() / 2) as isize;
        let (w, h) = (self.width, self.height);

        let mut horizontal = vec![0.0f32; w * h];
        for y in 0..h {
            let row = &self.data[y * w..(y + 1) * w];
            for x in 0..w {
                let mut acc = 0.0;
                for (k, &weight) in kernel.iter().enumerate() {
                    let sx = reflect101(x as isize + k as isize - radius, w);
                    acc += weight * row[sx];
                }
                horizontal[y * w + x] = acc;
            }
        }

        let mut data = vec![0.0f32; w * h];
        for y in 0..h {
            for (k, &weight) in kernel.iter().enumerate() {
                let sy = reflect101(y as isize + k as isize - radius, h);
                let src = &horizontal[sy * w..(sy + 1) * w];
                let dst = &mut data[y * w..(y + 1) * w];
                for (d, &s) in dst.iter_mut().zip(src) {
                    *d += weight * s;
                }
            }
        }

        Channel {
            width: w,
            height: h,
            data,
        }
    }
}

/// Split an 8-bit RGB image into three float channels.
pub(crate) fn split_rgb(image: &Rgb8Image) -> [Channel; 3] {
    let (width, height) = image.dimensions();
    std::array::from_fn(|c| Channel {
        width,
        height,
        data: image.pixels().iter().map(|p| p[c] as f32).collect(),
    })
}

/// Round, clip and narrow a float to a byte.
#[inline]
pub(crate) fn saturate_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
