// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Encoder engine seam and its zune-jpegxl implementation.

use crate::color::ColorEncoding;
use crate::conversions::{
    calculate_buffer_size, convert_effort, convert_to_bit_depth, convert_to_colorspace,
    orientation_from_id, samples_per_pixel,
};
use crate::error::{EncodeError, EncodeResult};
use crate::types::*;
use zune_core::options::EncoderOptions;
use zune_jpegxl::{JxlEncodeErrors, JxlSimpleEncoder};

/// Smallest width and height the engine can encode.
const MIN_DIMENSION: u32 = 2;

/// Result of one `process_output` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OutputProgress {
    /// Bytes written at the start of the region.
    pub written: usize,
    /// No more bytes are pending.
    pub finished: bool,
}

/// The calls a session makes into the codec, in the order it makes them.
pub(crate) trait EncoderEngine: Sized {
    /// Parallel work runner created alongside the engine.
    type Runner;

    /// Creates the engine together with its runner.
    fn create(options: &JxlEncodeOptions) -> EncodeResult<(Self, Self::Runner)>;

    fn set_parallel_runner(&mut self, runner: &Self::Runner) -> EncodeResult<()>;

    fn set_basic_info(&mut self, info: &JxlEncBasicInfo) -> EncodeResult<()>;

    fn set_color_encoding(&mut self, encoding: ColorEncoding) -> EncodeResult<()>;

    /// Hands the engine a borrowed pixel buffer. The engine must not keep the
    /// borrow past this call.
    fn add_image_frame(&mut self, format: JxlEncPixelFormat, pixels: &[u8]) -> EncodeResult<()>;

    /// Writes as many pending bytes as fit into `out`.
    fn process_output(&mut self, out: &mut [u8]) -> EncodeResult<OutputProgress>;
}

// ============================================================================
// Parallel Runner
// ============================================================================

/// Worker pool configuration handed to the engine.
#[derive(Debug)]
pub(crate) struct ThreadRunner {
    num_workers: u32,
}

impl ThreadRunner {
    pub(crate) fn new(num_workers: u32) -> Self {
        tracing::trace!(num_workers, "parallel runner created");
        Self { num_workers }
    }

    pub(crate) fn num_workers(&self) -> u32 {
        self.num_workers
    }
}

impl Drop for ThreadRunner {
    fn drop(&mut self) {
        tracing::trace!(num_workers = self.num_workers, "parallel runner destroyed");
    }
}

// ============================================================================
// zune-jpegxl Engine
// ============================================================================

/// Lossless engine backed by `zune_jpegxl::JxlSimpleEncoder`.
///
/// The codestream is produced in full when the frame is added; output calls
/// then drain it into caller regions.
#[derive(Debug)]
pub(crate) struct ZuneEngine {
    effort: u8,
    num_threads: Option<u8>,
    basic_info: Option<JxlEncBasicInfo>,
    color_encoding: Option<ColorEncoding>,
    stream: Option<Vec<u8>>,
    drained: usize,
}

impl EncoderEngine for ZuneEngine {
    type Runner = ThreadRunner;

    fn create(options: &JxlEncodeOptions) -> EncodeResult<(Self, ThreadRunner)> {
        let engine = Self {
            effort: convert_effort(options),
            num_threads: None,
            basic_info: None,
            color_encoding: None,
            stream: None,
            drained: 0,
        };
        Ok((engine, ThreadRunner::new(options.NumWorkerThreads)))
    }

    fn set_parallel_runner(&mut self, runner: &ThreadRunner) -> EncodeResult<()> {
        let workers = runner.num_workers();
        if workers > 0 && !cfg!(feature = "threads") {
            return Err(EncodeError::ParallelRunner(format!(
                "{workers} worker threads requested but threading is disabled"
            )));
        }
        let threads = u8::try_from(workers).map_err(|_| {
            EncodeError::ParallelRunner(format!("too many worker threads: {workers}"))
        })?;
        self.num_threads = Some(threads);
        Ok(())
    }

    fn set_basic_info(&mut self, info: &JxlEncBasicInfo) -> EncodeResult<()> {
        if self.basic_info.is_some() {
            return Err(EncodeError::basic_info("basic info already committed"));
        }
        if info.Width < MIN_DIMENSION || info.Height < MIN_DIMENSION {
            return Err(EncodeError::basic_info(format!(
                "invalid dimensions {}x{}, both must be at least {MIN_DIMENSION}",
                info.Width, info.Height
            )));
        }
        convert_to_bit_depth(info)?;
        if info.NumColorChannels != 1 && info.NumColorChannels != 3 {
            return Err(EncodeError::basic_info(format!(
                "unsupported number of color channels: {}",
                info.NumColorChannels
            )));
        }
        if info.AlphaBits != 0 && info.AlphaBits != info.BitsPerSample {
            return Err(EncodeError::basic_info(format!(
                "alpha bits ({}) must match bits per sample ({})",
                info.AlphaBits, info.BitsPerSample
            )));
        }
        let orientation = orientation_from_id(info.Orientation)?;
        if orientation != JxlOrientation::Identity {
            return Err(EncodeError::basic_info(format!(
                "orientation {orientation:?} cannot be signalled"
            )));
        }
        self.basic_info = Some(info.clone());
        Ok(())
    }

    fn set_color_encoding(&mut self, encoding: ColorEncoding) -> EncodeResult<()> {
        let Some(info) = &self.basic_info else {
            return Err(EncodeError::color_encoding("basic info must be set first"));
        };
        if encoding.is_gray() != (info.NumColorChannels == 1) {
            return Err(EncodeError::color_encoding(format!(
                "{encoding:?} does not fit {} color channels",
                info.NumColorChannels
            )));
        }
        self.color_encoding = Some(encoding);
        Ok(())
    }

    fn add_image_frame(&mut self, format: JxlEncPixelFormat, pixels: &[u8]) -> EncodeResult<()> {
        let (Some(info), Some(_)) = (&self.basic_info, self.color_encoding) else {
            return Err(EncodeError::image_frame(
                "basic info and color encoding must be set first",
            ));
        };
        if self.stream.is_some() {
            return Err(EncodeError::image_frame("only a single frame is supported"));
        }

        let alpha = usize::from(info.AlphaBits > 0);
        let expected_channels = info.NumColorChannels as usize + alpha;
        if samples_per_pixel(format) != expected_channels {
            return Err(EncodeError::image_frame(format!(
                "pixel format {format:?} does not match {} color channels with alpha bits {}",
                info.NumColorChannels, info.AlphaBits
            )));
        }

        let required = calculate_buffer_size(info, format)?;
        if pixels.len() < required {
            return Err(EncodeError::image_frame(format!(
                "pixel buffer too small: {} bytes provided, {} required",
                pixels.len(),
                required
            )));
        }

        let options = EncoderOptions::new(
            info.Width as usize,
            info.Height as usize,
            convert_to_colorspace(format),
            convert_to_bit_depth(info)?,
        )
        .set_effort(self.effort)
        .set_num_threads(self.num_threads.unwrap_or(0));

        let encoder = JxlSimpleEncoder::new(&pixels[..required], options);
        let stream = encoder
            .encode()
            .map_err(engine_error)?;

        tracing::debug!(
            width = info.Width,
            height = info.Height,
            ?format,
            stream_len = stream.len(),
            "image frame encoded"
        );
        self.stream = Some(stream);
        self.drained = 0;
        Ok(())
    }

    fn process_output(&mut self, out: &mut [u8]) -> EncodeResult<OutputProgress> {
        let Some(stream) = self.stream.as_deref() else {
            return Err(EncodeError::unexpected_state(
                "output requested before an image frame was added",
            ));
        };

        let remaining = &stream[self.drained..];
        let written = remaining.len().min(out.len());
        out[..written].copy_from_slice(&remaining[..written]);
        self.drained += written;

        Ok(OutputProgress {
            written,
            finished: self.drained == stream.len(),
        })
    }
}

/// zune formats its errors with a trailing newline.
fn engine_error(e: JxlEncodeErrors) -> EncodeError {
    EncodeError::Engine(format!("{e:?}").trim_end().to_string())
}
