// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Color encoding resolution.
//!
//! The engine only writes built-in encodings. A caller-supplied ICC profile
//! is not embedded; at most it is inspected to check that it agrees with the
//! basic info.

use crate::error::{EncodeError, EncodeResult};
use crate::types::JxlEncBasicInfo;

/// Named built-in color encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColorEncoding {
    /// sRGB primaries, D65 white point, sRGB transfer.
    Srgb,
    /// Grayscale with the sRGB transfer curve.
    GraySrgb,
}

impl ColorEncoding {
    pub(crate) fn for_color_channels(num_color_channels: u32) -> Self {
        if num_color_channels == 1 {
            Self::GraySrgb
        } else {
            Self::Srgb
        }
    }

    pub(crate) fn is_gray(self) -> bool {
        self == Self::GraySrgb
    }
}

/// Picks the color encoding committed for an image.
///
/// An empty ICC buffer counts as no profile.
pub(crate) fn resolve_color_encoding(
    info: &JxlEncBasicInfo,
    icc: Option<&[u8]>,
) -> EncodeResult<ColorEncoding> {
    let encoding = ColorEncoding::for_color_channels(info.NumColorChannels);
    let Some(icc) = icc.filter(|icc| !icc.is_empty()) else {
        return Ok(encoding);
    };

    check_icc_profile(icc, info.NumColorChannels)?;
    tracing::warn!(
        icc_size = icc.len(),
        ?encoding,
        "ICC passthrough is not supported, committing built-in encoding"
    );
    Ok(encoding)
}

#[cfg(feature = "cms-lcms2")]
fn check_icc_profile(icc: &[u8], num_color_channels: u32) -> EncodeResult<()> {
    use lcms2::{ColorSpaceSignatureExt, Profile};

    let profile = Profile::new_icc(icc)
        .map_err(|e| EncodeError::color_encoding(format!("lcms2 failed to parse ICC: {e}")))?;
    let channels = profile.color_space().channels() as u32;
    if channels != num_color_channels {
        return Err(EncodeError::color_encoding(format!(
            "ICC profile has {channels} channels, basic info has {num_color_channels}"
        )));
    }
    Ok(())
}

#[cfg(not(feature = "cms-lcms2"))]
fn check_icc_profile(_icc: &[u8], _num_color_channels: u32) -> EncodeResult<()> {
    Ok(())
}
