// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// RGB → HLS conversion in the 8-bit layout used by the colour model:
// hue is halved into [0, 180), lightness and saturation span [0, 255].

use folio_core::error::{FolioError, Result};
use folio_core::types::Stage;
use image::{DynamicImage, Rgb, RgbImage};

/// Convert one 8-bit RGB pixel to 8-bit `[hue, lightness, saturation]`.
pub fn rgb_to_hls(rgb: [u8; 3]) -> [u8; 3] {
    let r = rgb[0] as f32 / 255.0;
    let g = rgb[1] as f32 / 255.0;
    let b = rgb[2] as f32 / 255.0;

    let vmax = r.max(g).max(b);
    let vmin = r.min(g).min(b);
    let diff = vmax - vmin;
    let lightness = (vmax + vmin) * 0.5;

    let (hue, saturation) = if diff > f32::EPSILON {
        let saturation = if lightness < 0.5 {
            diff / (vmax + vmin)
        } else {
            diff / (2.0 - vmax - vmin)
        };
        let scale = 60.0 / diff;
        let mut hue = if vmax == r {
            (g - b) * scale
        } else if vmax == g {
            (b - r) * scale + 120.0
        } else {
            (r - g) * scale + 240.0
        };
        if hue < 0.0 {
            hue += 360.0;
        }
        (hue, saturation)
    } else {
        (0.0, 0.0)
    };

    [
        to_channel(hue * 0.5),
        to_channel(lightness * 255.0),
        to_channel(saturation * 255.0),
    ]
}

/// Convert a whole RGB image. The result reuses `RgbImage` as a plain
/// three-channel container holding H, L and S.
pub fn to_hls_image(image: &RgbImage) -> RgbImage {
    let mut out = RgbImage::new(image.width(), image.height());
    for (dst, src) in out.pixels_mut().zip(image.pixels()) {
        *dst = Rgb(rgb_to_hls(src.0));
    }
    out
}

/// Extract three 8-bit colour channels from a decoded image, rejecting
/// images that are empty or carry no colour information.
///
/// Alpha is dropped; 16-bit and float images are narrowed to 8 bits.
pub fn color_pixels(image: &DynamicImage, stage: Stage) -> Result<RgbImage> {
    if image.width() == 0 || image.height() == 0 {
        return Err(FolioError::input(
            stage,
            format!("image is {}x{}", image.width(), image.height()),
        ));
    }
    let color = image.color();
    if !color.has_color() {
        return Err(FolioError::input(
            stage,
            format!(
                "image has {} channel(s) without colour, three colour channels are required",
                color.channel_count()
            ),
        ));
    }
    Ok(image.to_rgb8())
}

fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
