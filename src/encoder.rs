// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Encoder implementation for the C API.

use crate::buffer::ByteRegion;
use crate::conversions::pixel_format_from_id;
use crate::engine::{EncoderEngine, ZuneEngine};
use crate::error::{EncodeError, EncodeResult, clear_last_error, report_error, set_last_error};
use crate::session::{EncodeInput, EncodeSession, encode_once};
use crate::types::*;

type EncoderInner = EncodeSession<ZuneEngine>;

// ============================================================================
// Encoder Pointer Validation Macros
// ============================================================================

/// Gets a mutable reference to the encoder, returning an error if null.
macro_rules! get_encoder_mut {
    ($encoder:expr, $error_return:expr) => {
        match unsafe { ($encoder as *mut EncoderInner).as_mut() } {
            Some(inner) => inner,
            None => {
                set_last_error("Null encoder pointer");
                return $error_return;
            }
        }
    };
}

/// Converts an internal result into the status returned to the caller.
fn finish(result: EncodeResult<JxlEncStatus>) -> JxlEncStatus {
    result.unwrap_or_else(|e| report_error(&e))
}

// ============================================================================
// One-shot Encoding
// ============================================================================

/// Checks the request and runs one throwaway session over it.
///
/// Checks run in order: output handle present, every handle accessible,
/// pixel format recognized, pixels present. No engine exists until all pass.
///
/// # Safety
/// See `jxl_enc_get_jxl_stream`.
pub(crate) unsafe fn get_jxl_stream_impl<E: EncoderEngine>(
    pixel_format_id: i32,
    info: *const JxlEncBasicInfo,
    pixels: *const JxlEncBuffer,
    output: *const JxlEncBuffer,
    icc: *const JxlEncBuffer,
) -> EncodeResult<JxlEncStatus> {
    if output.is_null() {
        return Err(EncodeError::MissingBuffer("output"));
    }

    let pixels = unsafe { ByteRegion::resolve(pixels, "pixels") }?;
    let output = unsafe { ByteRegion::resolve(output, "output") }?;
    let icc = unsafe { ByteRegion::resolve(icc, "ICC") }?;

    let format = pixel_format_from_id(pixel_format_id)?;
    let pixels = pixels.ok_or(EncodeError::MissingBuffer("pixels"))?;
    let mut output = output.ok_or(EncodeError::MissingBuffer("output"))?;

    let input = EncodeInput {
        info: unsafe { info.as_ref() },
        format,
        pixels: pixels.as_slice(),
        icc: icc.as_ref().map(ByteRegion::as_slice),
    };
    let capacity = output.capacity();
    let result = encode_once::<E>(&JxlEncodeOptions::default(), &input, output.as_mut_slice())?;

    tracing::debug!(
        status = ?result.status,
        written = result.written,
        capacity,
        "one-shot encode finished"
    );
    Ok(result.status)
}

/// Encodes an image into the output buffer in a single call.
///
/// `ctx[0]` carries the pixel format id in and the status out:
/// 0 = success, 1 = output buffer too small, -1 = fatal error
/// (call `jxl_get_last_error` for details).
///
/// Each call creates and destroys its own encoder, so a status of 1 cannot
/// be resumed here. Retry with a larger output buffer, or use the
/// `jxl_encoder_*` functions to drain the stream incrementally.
///
/// # Arguments
/// * `ctx` - One-element context: in pixel format id, out status.
/// * `info` - Basic image info. Null (defaults) is not supported.
/// * `pixels` - Pixel buffer handle.
/// * `output` - Output buffer handle. Required.
/// * `icc` - Optional ICC profile buffer handle.
///
/// # Safety
/// - `ctx` must be null or point to a writable `i32`.
/// - `info` must be null or point to a valid `JxlEncBasicInfo`.
/// - Each buffer handle must be null or point to a `JxlEncBuffer` whose
///   `Data` is valid for `Capacity` bytes. The regions must not overlap.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jxl_enc_get_jxl_stream(
    ctx: *mut i32,
    info: *const JxlEncBasicInfo,
    pixels: *const JxlEncBuffer,
    output: *const JxlEncBuffer,
    icc: *const JxlEncBuffer,
) {
    let Some(ctx) = (unsafe { ctx.as_mut() }) else {
        set_last_error("Null context pointer");
        return;
    };

    clear_last_error();

    let status = finish(unsafe {
        get_jxl_stream_impl::<ZuneEngine>(*ctx, info, pixels, output, icc)
    });
    *ctx = status.code();
}

/// Probes basic info from raw pixel data.
///
/// Not supported: returns without touching `ctx` and without doing any
/// encoder work. The reason is available from `jxl_get_last_error`.
///
/// # Arguments
/// * `ctx` - Six-element context {in pixel format / out status, width,
///   height, pixels size, ICC size, alpha bits}. Left unmodified.
/// * `pixels`, `data`, `icc` - Buffer handles. Not accessed.
#[unsafe(no_mangle)]
pub extern "C" fn jxl_enc_get_basic_info(
    _ctx: *mut i32,
    _pixels: *const JxlEncBuffer,
    _data: *const JxlEncBuffer,
    _icc: *const JxlEncBuffer,
) {
    tracing::debug!("basic info probe requested");
    set_last_error("Basic info probing is not supported");
}

// ============================================================================
// Encoder Lifecycle
// ============================================================================

/// Creates a new encoder instance with default options.
///
/// # Returns
/// A pointer to the encoder, or null on failure.
/// The encoder must be destroyed with `jxl_encoder_destroy`.
#[unsafe(no_mangle)]
pub extern "C" fn jxl_encoder_create() -> *mut NativeEncoderHandle {
    unsafe { jxl_encoder_create_with_options(std::ptr::null()) }
}

/// Creates a new encoder instance with the specified options.
///
/// The encoder and its parallel runner are created together; if the runner
/// cannot be registered, both are released and null is returned.
///
/// # Arguments
/// * `options` - Pointer to encoder options, or null to use defaults.
///
/// # Returns
/// A pointer to the encoder, or null on failure.
/// The encoder must be destroyed with `jxl_encoder_destroy`.
///
/// # Safety
/// If `options` is not null, it must point to a valid `JxlEncodeOptions` struct.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jxl_encoder_create_with_options(
    options: *const JxlEncodeOptions,
) -> *mut NativeEncoderHandle {
    clear_last_error();

    let options = unsafe { options.as_ref() }.cloned().unwrap_or_default();
    match EncoderInner::new(&options) {
        Ok(session) => Box::into_raw(Box::new(session)) as *mut NativeEncoderHandle,
        Err(e) => {
            report_error(&e);
            std::ptr::null_mut()
        }
    }
}

/// Destroys an encoder instance and frees its resources.
///
/// # Safety
/// The encoder pointer must have been created by `jxl_encoder_create`.
/// After calling this function, the encoder pointer is invalid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jxl_encoder_destroy(encoder: *mut NativeEncoderHandle) {
    if !encoder.is_null() {
        unsafe {
            drop(Box::from_raw(encoder as *mut EncoderInner));
        }
    }
}

// ============================================================================
// Input
// ============================================================================

/// Commits basic info, color encoding and pixels to the encoder.
///
/// The pixels are encoded during this call; the pixel buffer may be released
/// afterwards. May be called once per encoder. A failure leaves the encoder
/// unusable except for `jxl_encoder_destroy`.
///
/// # Safety
/// - `encoder` must be a valid encoder pointer.
/// - `info` must be null or point to a valid `JxlEncBasicInfo`.
/// - `pixels` and `icc` must be null or point to valid `JxlEncBuffer`s.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jxl_encoder_set_input(
    encoder: *mut NativeEncoderHandle,
    info: *const JxlEncBasicInfo,
    pixel_format_id: i32,
    pixels: *const JxlEncBuffer,
    icc: *const JxlEncBuffer,
) -> JxlEncStatus {
    let inner = get_encoder_mut!(encoder, JxlEncStatus::FatalError);

    clear_last_error();

    finish((|| -> EncodeResult<JxlEncStatus> {
        let pixels = unsafe { ByteRegion::resolve(pixels, "pixels") }?;
        let icc = unsafe { ByteRegion::resolve(icc, "ICC") }?;
        let format = pixel_format_from_id(pixel_format_id)?;
        let pixels = pixels.ok_or(EncodeError::MissingBuffer("pixels"))?;

        inner.set_input(&EncodeInput {
            info: unsafe { info.as_ref() },
            format,
            pixels: pixels.as_slice(),
            icc: icc.as_ref().map(ByteRegion::as_slice),
        })?;
        Ok(JxlEncStatus::Success)
    })())
}

// ============================================================================
// Output
// ============================================================================

/// Writes the next part of the codestream into the output buffer.
///
/// Returns `Success` once the whole stream has been written, `NeedMoreOutput`
/// when the buffer was filled and more bytes remain (call again with a fresh
/// buffer), or `FatalError`.
///
/// # Arguments
/// * `encoder` - The encoder instance.
/// * `output` - Output buffer handle. Required.
/// * `written` - Receives the number of bytes written, or null.
///
/// # Safety
/// - `encoder` must be a valid encoder pointer.
/// - `output` must be null or point to a valid `JxlEncBuffer`.
/// - `written` must be null or point to a writable `usize`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jxl_encoder_process_output(
    encoder: *mut NativeEncoderHandle,
    output: *const JxlEncBuffer,
    written: *mut usize,
) -> JxlEncStatus {
    let mut written = unsafe { written.as_mut() };
    if let Some(written) = written.as_deref_mut() {
        *written = 0;
    }
    let inner = get_encoder_mut!(encoder, JxlEncStatus::FatalError);

    clear_last_error();

    let mut total = 0;
    let status = finish((|| -> EncodeResult<JxlEncStatus> {
        let mut output = unsafe { ByteRegion::resolve(output, "output") }?
            .ok_or(EncodeError::MissingBuffer("output"))?;
        let result = inner.process_output(output.as_mut_slice())?;
        total = result.written;
        Ok(result.status)
    })());

    if let Some(written) = written {
        *written = total;
    }
    status
}

#[cfg(test)]
#[path = "encoder_tests.rs"]
mod tests;
