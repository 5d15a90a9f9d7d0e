//! Bilinear resampling on a float plane

use crate::format::ImageFormat;

/// Interleaved channels widened to `f64`
pub(crate) struct Plane {
    width: usize,
    height: usize,
    channels: usize,
    samples: Vec<f64>,
}

/// Two neighbouring source coordinates and the blend weight of the second
struct Tap {
    lo: usize,
    hi: usize,
    t: f64,
}

impl Plane {
    pub(crate) fn decode(format: ImageFormat, data: &[u8], width: u32, height: u32) -> Self {
        let samples = match format {
            ImageFormat::Rgba32F => data
                .chunks_exact(4)
                .map(|c| f64::from(f32::from_le_bytes([c[0], c[1], c[2], c[3]])))
                .collect(),
            _ => data.iter().copied().map(f64::from).collect(),
        };
        Self {
            width: width as usize,
            height: height as usize,
            channels: format.channels(),
            samples,
        }
    }

    #[inline]
    fn at(&self, x: usize, y: usize, channel: usize) -> f64 {
        self.samples[(y * self.width + x) * self.channels + channel]
    }

    pub(crate) fn bilinear(&self, width: u32, height: u32) -> Plane {
        let xs = taps(self.width, width as usize);
        let ys = taps(self.height, height as usize);
        let mut samples = Vec::with_capacity(xs.len() * ys.len() * self.channels);

        for y in &ys {
            for x in &xs {
                for c in 0..self.channels {
                    let top = lerp(self.at(x.lo, y.lo, c), self.at(x.hi, y.lo, c), x.t);
                    let bottom = lerp(self.at(x.lo, y.hi, c), self.at(x.hi, y.hi, c), x.t);
                    samples.push(lerp(top, bottom, y.t));
                }
            }
        }

        Plane {
            width: xs.len(),
            height: ys.len(),
            channels: self.channels,
            samples,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn encode(&self, format: ImageFormat, len: usize) -> Vec<u8> {
        debug_assert_eq!(self.samples.len(), self.width * self.height * self.channels);
        let mut out = Vec::with_capacity(len);
        match format {
            ImageFormat::Rgba32F => {
                for &v in &self.samples {
                    out.extend_from_slice(&(v as f32).to_le_bytes());
                }
            }
            _ => out.extend(self.samples.iter().map(|v| v.round().clamp(0.0, 255.0) as u8)),
        }
        out
    }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Sample positions along one axis, aligned on pixel centers
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn taps(src: usize, dst: usize) -> Vec<Tap> {
    let last = src - 1;
    let scale = src as f64 / dst as f64;
    (0..dst)
        .map(|i| {
            let pos = ((i as f64 + 0.5) * scale - 0.5).clamp(0.0, last as f64);
            let lo = pos.floor() as usize;
            Tap {
                lo,
                hi: (lo + 1).min(last),
                t: pos - lo as f64,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn upscale_interpolates() {
        let out = ImageFormat::R8.resize(&[0, 255], 2, 1, 4, 1).unwrap();
        assert_eq!(out, vec![0, 64, 191, 255]);
    }

    #[test]
    fn downscale_averages() {
        let out = ImageFormat::R8.resize(&[0, 100, 200, 100], 2, 2, 1, 1).unwrap();
        assert_eq!(out, vec![100]);
    }

    #[test]
    fn channels_are_independent() {
        let data = [10, 200, 30, 100, 0, 50];
        let out = ImageFormat::Rgb8.resize(&data, 2, 1, 1, 1).unwrap();
        assert_eq!(out, vec![55, 100, 40]);
    }

    #[test]
    fn float_pixels() {
        let data: Vec<u8> = [0.0f32, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let out = ImageFormat::Rgba32F.resize(&data, 2, 1, 1, 1).unwrap();
        let values: Vec<f32> = out
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(values, vec![0.5, 1.0, 1.5, 2.0]);
    }

    proptest! {
        #[test]
        fn prop_constant_image_stays_constant(
            value in any::<u8>(),
            src in (1u32..8, 1u32..8),
            dst in (1u32..8, 1u32..8),
        ) {
            let format = ImageFormat::Rg8;
            let data = vec![value; format.size(src.0, src.1).unwrap()];
            let out = format.resize(&data, src.0, src.1, dst.0, dst.1).unwrap();
            prop_assert_eq!(out.len(), format.size(dst.0, dst.1).unwrap());
            prop_assert!(out.iter().all(|&v| v == value));
        }
    }
}
