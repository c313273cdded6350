use image::{DynamicImage, RgbImage, imageops};

use crate::model::{ResizeFilter, TargetSize};

/// Size of a `width`x`height` image shrunk to fit inside `target`.
///
/// Aspect ratio is kept, nothing is ever enlarged, and neither side drops
/// below one pixel. Between the floor and ceiling candidates the one whose
/// ratio is closer to the original wins, floor on a tie.
pub fn fit_within(width: u32, height: u32, target: TargetSize) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    if target.width >= width && target.height >= height {
        return (width, height);
    }

    let aspect = width as f64 / height as f64;
    let tw = target.width as f64;
    let th = target.height as f64;

    if tw / th >= aspect {
        let w = round_aspect(th * aspect, |n| (aspect - n / th).abs());
        (w, target.height)
    } else {
        let h = round_aspect(tw / aspect, |n| {
            if n == 0.0 { 0.0 } else { (aspect - tw / n).abs() }
        });
        (target.width, h)
    }
}

fn round_aspect(value: f64, error: impl Fn(f64) -> f64) -> u32 {
    let (lo, hi) = (value.floor(), value.ceil());
    let pick = if error(hi) < error(lo) { hi } else { lo };
    (pick as u32).max(1)
}

/// Flatten a frame to RGB and shrink it to fit `target`.
pub fn downsample(frame: &DynamicImage, target: TargetSize, filter: ResizeFilter) -> RgbImage {
    let rgb = frame.to_rgb8();
    let (w, h) = fit_within(rgb.width(), rgb.height(), target);
    if (w, h) == rgb.dimensions() {
        return rgb;
    }
    imageops::resize(&rgb, w, h, filter.into())
}
