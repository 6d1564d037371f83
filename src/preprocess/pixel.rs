//! Pixel-level transform from a decoded photograph to a fixed-length feature
//! vector.
//!
//! The image is reduced to Rec. 601 luminance, resized with 2-tap bilinear
//! sampling into the interior rectangle and written row-major into a
//! `width * height` vector whose padding border holds `scale_min`.

use image::{DynamicImage, GrayImage, Luma};

use crate::error::PrepResult;
use crate::preprocess::params::NormalizeParams;

/// One flattened grayscale image, values in `[scale_min, scale_max]`.
pub type FeatureVector = Vec<f64>;

// Rec. 601 weights in 14-bit fixed point (R, G, B); they sum to 1 << 14.
const LUMA_SHIFT: u32 = 14;
const LUMA_WEIGHTS: [u32; 3] = [4899, 9617, 1868];

/// Validates `params` and converts `image` into a feature vector.
///
/// Returns a `Configuration` error when the padding leaves no interior or the
/// scale range is empty.
pub fn normalize(image: &DynamicImage, params: &NormalizeParams) -> PrepResult<FeatureVector> {
    params.validate()?;
    Ok(normalize_unchecked(image, params))
}

/// Same as [`normalize`] for params already validated once per batch.
pub(crate) fn normalize_unchecked(image: &DynamicImage, params: &NormalizeParams) -> FeatureVector {
    let gray = to_gray(image);
    let resized = resize_bilinear(&gray, params.interior_width(), params.interior_height());

    let width = params.width as usize;
    let (x_pad, y_pad) = (params.x_padding as usize, params.y_padding as usize);
    let range = params.scale_max - params.scale_min;

    let mut data = vec![params.scale_min; params.vector_len()];
    for (col, row, pixel) in resized.enumerate_pixels() {
        let (col, row) = (col as usize, row as usize);
        let value = f64::from(pixel.0[0]) / 255.0 * range + params.scale_min;
        // (max - min) + min can round one ulp past max.
        data[col + x_pad + width * (row + y_pad)] = value.min(params.scale_max);
    }
    data
}

/// Rec. 601 luminance, rounded half up. Alpha is dropped.
fn to_gray(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let sum = LUMA_WEIGHTS[0] * u32::from(r)
            + LUMA_WEIGHTS[1] * u32::from(g)
            + LUMA_WEIGHTS[2] * u32::from(b);
        Luma([((sum + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8])
    })
}

/// Source taps `(lo, hi, weight_of_hi)` for each destination coordinate.
///
/// Destination pixel centres map to `(d + 0.5) * scale - 0.5` in the source;
/// positions before the first or past the last source pixel clamp to it.
fn bilinear_taps(dst_len: u32, src_len: u32) -> Vec<(u32, u32, f64)> {
    let scale = f64::from(src_len) / f64::from(dst_len);
    (0..dst_len)
        .map(|d| {
            let pos = (f64::from(d) + 0.5) * scale - 0.5;
            if pos <= 0.0 {
                return (0, 0, 0.0);
            }
            let lo = pos.floor() as u32;
            if lo + 1 >= src_len {
                return (src_len - 1, src_len - 1, 0.0);
            }
            (lo, lo + 1, pos - pos.floor())
        })
        .collect()
}

/// Resizes with each output pixel interpolated from its 2x2 source neighbours,
/// whatever the scale factor.
fn resize_bilinear(src: &GrayImage, width: u32, height: u32) -> GrayImage {
    let xs = bilinear_taps(width, src.width());
    let ys = bilinear_taps(height, src.height());
    let at = |x: u32, y: u32| f64::from(src.get_pixel(x, y).0[0]);

    GrayImage::from_fn(width, height, |x, y| {
        let (x0, x1, fx) = xs[x as usize];
        let (y0, y1, fy) = ys[y as usize];
        let top = at(x0, y0) * (1.0 - fx) + at(x1, y0) * fx;
        let bottom = at(x0, y1) * (1.0 - fx) + at(x1, y1) * fx;
        let value = top * (1.0 - fy) + bottom * fy;
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrepError;
    use approx::assert_abs_diff_eq;
    use image::{Rgb, RgbImage};

    fn uniform(width: u32, height: u32, level: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([level, level, level])))
    }

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            let v = ((x * 255) / width.max(1)) as u8;
            Rgb([v, ((y * 255) / height.max(1)) as u8, 255 - v])
        }))
    }

    #[test]
    fn mid_gray_with_one_pixel_border() {
        let params = NormalizeParams::new(12, 12).with_padding(1, 1);
        let out = normalize(&uniform(10, 10, 128), &params).unwrap();

        assert_eq!(out.len(), 144);
        let (border, interior): (Vec<_>, Vec<_>) =
            (0..out.len()).partition(|&i| !params.is_interior(i));
        assert_eq!(border.len(), 44);
        assert_eq!(interior.len(), 100);
        for i in border {
            assert_eq!(out[i], 0.0);
        }
        for i in interior {
            assert_abs_diff_eq!(out[i], 128.0 / 255.0, epsilon = 1.5 / 255.0);
        }
    }

    #[test]
    fn border_is_scale_min_even_for_white_images() {
        let params = NormalizeParams::new(20, 16).with_padding(3, 2).with_scale(-1.0, 1.0);
        let out = normalize(&uniform(37, 5, 255), &params).unwrap();
        for (i, v) in out.iter().enumerate() {
            if params.is_interior(i) {
                assert_abs_diff_eq!(*v, 1.0, epsilon = 2.0 / 255.0);
            } else {
                assert_eq!(*v, -1.0);
            }
        }
    }

    #[test]
    fn values_stay_inside_scale_range() {
        for &(lo, hi) in &[(0.0, 1.0), (-1.0, 1.0), (0.1, 0.7), (-3.3, -0.2), (1e-3, 255.0)] {
            let params = NormalizeParams::new(16, 9).with_padding(2, 1).with_scale(lo, hi);
            let out = normalize(&gradient(50, 31), &params).unwrap();
            assert!(out.iter().all(|&v| v >= lo && v <= hi), "range [{}, {}]", lo, hi);
        }
    }

    #[test]
    fn black_maps_to_scale_min() {
        let params = NormalizeParams::new(6, 6).with_scale(-0.5, 0.5);
        let out = normalize(&uniform(4, 4, 0), &params).unwrap();
        assert!(out.iter().all(|&v| v == -0.5));
    }

    #[test]
    fn interior_is_row_major_with_offsets() {
        // Left half black, right half white; after padding the edge lands mid-interior.
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(8, 4, |x, _| {
            if x < 4 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        }));
        let params = NormalizeParams::new(10, 6).with_padding(1, 1);
        let out = normalize(&img, &params).unwrap();

        let at = |row: usize, col: usize| out[col + 10 * row];
        for row in 1..5 {
            assert_abs_diff_eq!(at(row, 1), 0.0, epsilon = 1.0 / 255.0);
            assert_abs_diff_eq!(at(row, 8), 1.0, epsilon = 1.0 / 255.0);
            assert_eq!(at(row, 0), 0.0);
            assert_eq!(at(row, 9), 0.0);
        }
    }

    #[test]
    fn primaries_use_rec601_weights() {
        let params = NormalizeParams::new(1, 1).with_scale(0.0, 255.0);
        for (rgb, expected) in [([255, 0, 0], 76.0), ([0, 255, 0], 150.0), ([0, 0, 255], 29.0)] {
            let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb(rgb)));
            let out = normalize(&img, &params).unwrap();
            assert_abs_diff_eq!(out[0], expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn gray_levels_survive_luminance_exactly() {
        for level in [0u8, 1, 77, 128, 254, 255] {
            let gray = to_gray(&uniform(2, 2, level));
            assert!(gray.pixels().all(|p| p.0[0] == level), "level {}", level);
        }
    }

    fn row_image(row: &[u8]) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_fn(row.len() as u32, 1, |x, _| Luma([row[x as usize]])))
    }

    fn assert_levels(out: &[f64], expected: &[f64]) {
        assert_eq!(out.len(), expected.len());
        for (v, e) in out.iter().zip(expected) {
            assert_abs_diff_eq!(*v, *e, epsilon = 1e-9);
        }
    }

    #[test]
    fn downscale_samples_two_neighbours_only() {
        let params = NormalizeParams::new(2, 1).with_scale(0.0, 255.0);

        // Output centres land on source x = 1.5 and x = 5.5, missing the bright pair.
        let out = normalize(&row_image(&[0, 0, 0, 255, 255, 0, 0, 0]), &params).unwrap();
        assert_levels(&out, &[0.0, 0.0]);

        let out = normalize(&row_image(&[0, 100, 200, 0, 0, 50, 150, 0]), &params).unwrap();
        assert_levels(&out, &[150.0, 100.0]);
    }

    #[test]
    fn upscale_clamps_at_edges() {
        let params = NormalizeParams::new(4, 1).with_scale(0.0, 255.0);
        // Source positions -0.25, 0.25, 0.75, 1.25.
        let out = normalize(&row_image(&[0, 200]), &params).unwrap();
        assert_levels(&out, &[0.0, 50.0, 150.0, 200.0]);
    }

    #[test]
    fn deterministic() {
        let params = NormalizeParams::new(14, 11).with_padding(2, 3).with_scale(-1.0, 1.0);
        let img = gradient(23, 17);
        assert_eq!(normalize(&img, &params).unwrap(), normalize(&img, &params).unwrap());
    }

    #[test]
    fn rejects_invalid_params_before_touching_pixels() {
        let img = uniform(4, 4, 10);
        for params in [
            NormalizeParams::new(8, 8).with_scale(0.5, 0.5),
            NormalizeParams::new(8, 8).with_padding(4, 0),
            NormalizeParams::new(8, 8).with_padding(0, 4),
        ] {
            assert!(matches!(normalize(&img, &params), Err(PrepError::Configuration { .. })));
        }
    }
}
