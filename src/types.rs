// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! C-compatible type definitions.

/// Opaque encoder session handle.
#[repr(C)]
pub struct NativeEncoderHandle {
    _private: [u8; 0],
}

/// Outcome of an encode call.
///
/// `NeedMoreOutput` is not a failure: the output region filled up before the
/// stream was complete and the caller should supply more space.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JxlEncStatus {
    /// Fatal error. Call `jxl_get_last_error` for details.
    FatalError = -1,
    /// The stream is complete.
    Success = 0,
    /// The output region is full and more bytes remain.
    NeedMoreOutput = 1,
}

impl JxlEncStatus {
    /// Raw status code as written into caller context slots.
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// A caller-owned byte region.
///
/// The library only borrows the region for the duration of a call. A null
/// pointer to this struct means "no buffer"; a non-null struct whose `Data`
/// is null cannot be accessed and is rejected.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
#[allow(non_snake_case)]
pub struct JxlEncBuffer {
    /// Start of the region.
    pub Data: *mut u8,
    /// Capacity of the region in bytes.
    pub Capacity: usize,
}

/// Pixel layouts accepted by the encoder, by id.
///
/// Sample width follows `JxlEncBasicInfo::BitsPerSample`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JxlEncPixelFormat {
    /// Red, green, blue, alpha.
    Rgba = 0,
    /// Red, green, blue.
    Rgb = 1,
    /// Grayscale + alpha.
    GrayscaleAlpha = 2,
    /// Single grayscale channel.
    Grayscale = 3,
}

/// Image orientation (EXIF-style), carried as a raw `u32` in
/// `JxlEncBasicInfo::Orientation`.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JxlOrientation {
    /// Normal orientation.
    Identity = 1,
    /// Flipped horizontally.
    FlipHorizontal = 2,
    /// Rotated 180 degrees.
    Rotate180 = 3,
    /// Flipped vertically.
    FlipVertical = 4,
    /// Transposed (swap x/y) then flipped horizontally.
    Transpose = 5,
    /// Rotated 90 degrees clockwise.
    Rotate90Cw = 6,
    /// Transposed then flipped vertically.
    AntiTranspose = 7,
    /// Rotated 90 degrees counter-clockwise.
    Rotate90Ccw = 8,
}

/// Basic image information committed before any pixel data.
#[repr(C)]
#[derive(Debug, Clone)]
#[allow(non_snake_case)]
pub struct JxlEncBasicInfo {
    /// Image width in pixels.
    pub Width: u32,
    /// Image height in pixels.
    pub Height: u32,
    /// Bits per sample (8 or 16).
    pub BitsPerSample: u32,
    /// Number of color channels (1 for grayscale, 3 for RGB).
    pub NumColorChannels: u32,
    /// Bits of the alpha channel, 0 if the image has no alpha.
    pub AlphaBits: u32,
    /// Image orientation, a `JxlOrientation` value (1 to 8).
    pub Orientation: u32,
}

impl Default for JxlEncBasicInfo {
    fn default() -> Self {
        Self {
            Width: 0,
            Height: 0,
            BitsPerSample: 8,
            NumColorChannels: 3,
            AlphaBits: 0,
            Orientation: JxlOrientation::Identity as u32,
        }
    }
}

/// Encoder options.
/// Options are fixed when the encoder is created.
#[repr(C)]
#[derive(Debug, Clone)]
#[allow(non_snake_case)]
pub struct JxlEncodeOptions {
    /// Extra worker threads for the engine. 0 = everything on the calling thread.
    pub NumWorkerThreads: u32,
    /// Encoder effort, 1 (fastest) to 9 (slowest).
    pub Effort: u32,
}

impl Default for JxlEncodeOptions {
    fn default() -> Self {
        Self {
            NumWorkerThreads: 0,
            Effort: 7,
        }
    }
}
