// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Type conversion functions between C API types and upstream zune types.

use crate::error::{EncodeError, EncodeResult};
use crate::types::*;
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;

/// Highest pixel format id the C API recognizes.
pub(crate) const LAST_PIXEL_FORMAT: i32 = 3;

// ============================================================================
// Pixel Format
// ============================================================================

/// Maps a raw pixel format id onto the closed set of formats.
pub(crate) fn pixel_format_from_id(id: i32) -> EncodeResult<JxlEncPixelFormat> {
    match id {
        0 => Ok(JxlEncPixelFormat::Rgba),
        1 => Ok(JxlEncPixelFormat::Rgb),
        2 => Ok(JxlEncPixelFormat::GrayscaleAlpha),
        LAST_PIXEL_FORMAT => Ok(JxlEncPixelFormat::Grayscale),
        _ => Err(EncodeError::UnrecognizedPixelFormat(id)),
    }
}

/// Calculates samples per pixel for a pixel format.
pub(crate) fn samples_per_pixel(format: JxlEncPixelFormat) -> usize {
    match format {
        JxlEncPixelFormat::Grayscale => 1,
        JxlEncPixelFormat::GrayscaleAlpha => 2,
        JxlEncPixelFormat::Rgb => 3,
        JxlEncPixelFormat::Rgba => 4,
    }
}

// ============================================================================
// Buffer Size Calculations
// ============================================================================

/// Calculates bytes per sample from the committed bit depth.
pub(crate) fn bytes_per_sample(info: &JxlEncBasicInfo) -> usize {
    if info.BitsPerSample > 8 { 2 } else { 1 }
}

/// Calculates the bytes per row for the given image info and pixel format.
pub(crate) fn calculate_bytes_per_row(
    info: &JxlEncBasicInfo,
    format: JxlEncPixelFormat,
) -> EncodeResult<usize> {
    (info.Width as usize)
        .checked_mul(samples_per_pixel(format) * bytes_per_sample(info))
        .ok_or_else(|| EncodeError::basic_info("image dimensions overflow"))
}

/// Calculates the pixel buffer size needed for the given image info and format.
pub(crate) fn calculate_buffer_size(
    info: &JxlEncBasicInfo,
    format: JxlEncPixelFormat,
) -> EncodeResult<usize> {
    calculate_bytes_per_row(info, format)?
        .checked_mul(info.Height as usize)
        .ok_or_else(|| EncodeError::basic_info("image dimensions overflow"))
}

// ============================================================================
// Type Conversions
// ============================================================================

/// Maps a raw orientation value onto `JxlOrientation`.
pub(crate) fn orientation_from_id(id: u32) -> EncodeResult<JxlOrientation> {
    Ok(match id {
        1 => JxlOrientation::Identity,
        2 => JxlOrientation::FlipHorizontal,
        3 => JxlOrientation::Rotate180,
        4 => JxlOrientation::FlipVertical,
        5 => JxlOrientation::Transpose,
        6 => JxlOrientation::Rotate90Cw,
        7 => JxlOrientation::AntiTranspose,
        8 => JxlOrientation::Rotate90Ccw,
        _ => {
            return Err(EncodeError::basic_info(format!(
                "unrecognized orientation: {id}"
            )));
        }
    })
}

/// Upstream colorspace for a pixel format.
pub(crate) fn convert_to_colorspace(format: JxlEncPixelFormat) -> ColorSpace {
    match format {
        JxlEncPixelFormat::Rgba => ColorSpace::RGBA,
        JxlEncPixelFormat::Rgb => ColorSpace::RGB,
        JxlEncPixelFormat::GrayscaleAlpha => ColorSpace::LumaA,
        JxlEncPixelFormat::Grayscale => ColorSpace::Luma,
    }
}

/// Upstream bit depth for the committed basic info.
pub(crate) fn convert_to_bit_depth(info: &JxlEncBasicInfo) -> EncodeResult<BitDepth> {
    match info.BitsPerSample {
        8 => Ok(BitDepth::Eight),
        16 => Ok(BitDepth::Sixteen),
        bits => Err(EncodeError::basic_info(format!(
            "unsupported bits per sample: {bits}"
        ))),
    }
}

/// Clamps the C effort value into the range the engine accepts.
pub(crate) fn convert_effort(options: &JxlEncodeOptions) -> u8 {
    options.Effort.clamp(1, 9) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_format_ids_cover_exactly_zero_to_three() {
        assert_eq!(pixel_format_from_id(0), Ok(JxlEncPixelFormat::Rgba));
        assert_eq!(pixel_format_from_id(3), Ok(JxlEncPixelFormat::Grayscale));
        assert_eq!(
            pixel_format_from_id(4),
            Err(EncodeError::UnrecognizedPixelFormat(4))
        );
        assert_eq!(
            pixel_format_from_id(-1),
            Err(EncodeError::UnrecognizedPixelFormat(-1))
        );
    }

    #[test]
    fn buffer_size_accounts_for_sample_width() {
        let mut info = JxlEncBasicInfo {
            Width: 10,
            Height: 4,
            ..Default::default()
        };
        assert_eq!(calculate_buffer_size(&info, JxlEncPixelFormat::Rgb), Ok(120));
        info.BitsPerSample = 16;
        assert_eq!(calculate_buffer_size(&info, JxlEncPixelFormat::Rgba), Ok(320));
        assert_eq!(
            calculate_bytes_per_row(&info, JxlEncPixelFormat::Grayscale),
            Ok(20)
        );
    }

    #[test]
    fn buffer_size_overflow_is_an_error() {
        let info = JxlEncBasicInfo {
            Width: u32::MAX,
            Height: u32::MAX,
            BitsPerSample: 16,
            ..Default::default()
        };
        assert_eq!(
            calculate_buffer_size(&info, JxlEncPixelFormat::Rgba),
            Err(EncodeError::basic_info("image dimensions overflow"))
        );
    }

    #[test]
    fn orientation_ids_cover_one_to_eight() {
        assert_eq!(orientation_from_id(1), Ok(JxlOrientation::Identity));
        assert_eq!(orientation_from_id(8), Ok(JxlOrientation::Rotate90Ccw));
        assert!(orientation_from_id(0).is_err());
        assert!(orientation_from_id(9).is_err());
    }

    #[test]
    fn bit_depth_rejects_odd_widths() {
        let info = JxlEncBasicInfo {
            BitsPerSample: 12,
            ..Default::default()
        };
        assert!(matches!(
            convert_to_bit_depth(&info),
            Err(EncodeError::BasicInfo(_))
        ));
    }

    #[test]
    fn effort_is_clamped() {
        let mut options = JxlEncodeOptions::default();
        assert_eq!(convert_effort(&options), 7);
        options.Effort = 0;
        assert_eq!(convert_effort(&options), 1);
        options.Effort = 40;
        assert_eq!(convert_effort(&options), 9);
    }
}
