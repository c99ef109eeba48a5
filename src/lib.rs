// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! jxl-enc-ffi - C API for streaming JPEG XL encoding.
//!
//! This crate provides a C-compatible API for encoding images to JPEG XL,
//! designed for FFI bindings to languages like C# or Java.
//!
//! Encoding ends in one of three statuses: `Success` (0), `NeedMoreOutput`
//! (1, supply more output space) or `FatalError` (-1, see
//! `jxl_get_last_error`). Two entry points are provided:
//!
//! - `jxl_enc_get_jxl_stream` encodes in one call with a throwaway encoder.
//! - `jxl_encoder_create` / `jxl_encoder_set_input` /
//!   `jxl_encoder_process_output` / `jxl_encoder_destroy` keep the encoder
//!   alive so the stream can be drained across calls.

mod buffer;
mod color;
mod conversions;
mod encoder;
mod engine;
mod error;
mod session;
#[cfg(test)]
mod test_engine;
mod types;

pub use encoder::*;
pub use error::*;
pub use types::*;

/// Returns the library version as a packed integer.
/// Format: (major << 24) | (minor << 16) | (patch << 8)
#[unsafe(no_mangle)]
pub extern "C" fn jxl_enc_version() -> u32 {
    let major: u32 = env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0);
    let minor: u32 = env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0);
    let patch: u32 = env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0);
    (major << 24) | (minor << 16) | (patch << 8)
}
