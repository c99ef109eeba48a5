// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Error handling for the C API.

use crate::types::JxlEncStatus;
use std::cell::RefCell;
use std::ffi::c_char;

thread_local! {
    static LAST_ERROR: RefCell<String> = const { RefCell::new(String::new()) };
}

pub(crate) type EncodeResult<T> = Result<T, EncodeError>;

/// Everything that can make an encode call fail.
///
/// Every variant maps to `JxlEncStatus::FatalError` at the boundary; running
/// out of output space is reported as a status, never as an error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum EncodeError {
    #[error("No {0} buffer")]
    MissingBuffer(&'static str),

    #[error("Failed to access {0} buffer")]
    BufferAccess(&'static str),

    #[error("Unrecognized pixel format: {0}")]
    UnrecognizedPixelFormat(i32),

    #[error("Failed to set parallel runner: {0}")]
    ParallelRunner(String),

    #[error("Failed to set basic info: {0}")]
    BasicInfo(String),

    #[error("Failed to set color encoding: {0}")]
    ColorEncoding(String),

    #[error("Failed to add image frame: {0}")]
    ImageFrame(String),

    #[error("Encoder engine error: {0}")]
    Engine(String),

    #[error("Unexpected engine state: {0}")]
    UnexpectedState(String),

    #[error("Encoder is in an invalid state: {0}")]
    InvalidState(&'static str),
}

impl EncodeError {
    pub(crate) fn basic_info(msg: impl Into<String>) -> Self {
        Self::BasicInfo(msg.into())
    }

    pub(crate) fn color_encoding(msg: impl Into<String>) -> Self {
        Self::ColorEncoding(msg.into())
    }

    pub(crate) fn image_frame(msg: impl Into<String>) -> Self {
        Self::ImageFrame(msg.into())
    }

    pub(crate) fn unexpected_state(msg: impl Into<String>) -> Self {
        Self::UnexpectedState(msg.into())
    }
}

/// Records `err` as the last error and returns the fatal status.
pub(crate) fn report_error(err: &EncodeError) -> JxlEncStatus {
    tracing::warn!(error = %err, "encode call failed");
    set_last_error(err.to_string());
    JxlEncStatus::FatalError
}

/// Sets the last error message for the current thread.
pub(crate) fn set_last_error(msg: impl Into<String>) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = msg.into();
    });
}

/// Clears the last error message.
pub(crate) fn clear_last_error() {
    LAST_ERROR.with(|e| {
        e.borrow_mut().clear();
    });
}

/// Gets the last error message.
///
/// # Arguments
/// * `buffer` - Buffer to write the error message to.
/// * `buffer_size` - Size of the buffer in bytes.
///
/// # Returns
/// The length of the error message (excluding null terminator).
/// If the buffer is too small, the message is truncated.
/// Returns 0 if there is no error message.
///
/// # Safety
/// The buffer must be valid for writes of `buffer_size` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jxl_get_last_error(buffer: *mut c_char, buffer_size: usize) -> usize {
    if buffer.is_null() || buffer_size == 0 {
        return LAST_ERROR.with(|e| e.borrow().len());
    }

    LAST_ERROR.with(|e| {
        let error = e.borrow();
        let bytes = error.as_bytes();
        let copy_len = bytes.len().min(buffer_size - 1);

        if copy_len > 0 {
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), buffer as *mut u8, copy_len);
            }
        }

        // Null terminate
        unsafe {
            *buffer.add(copy_len) = 0;
        }

        error.len()
    })
}

/// Clears the last error message.
#[unsafe(no_mangle)]
pub extern "C" fn jxl_clear_last_error() {
    clear_last_error();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn last_error() -> String {
        let mut buffer = [0 as c_char; 128];
        let len = unsafe { jxl_get_last_error(buffer.as_mut_ptr(), buffer.len()) };
        let bytes: Vec<u8> = buffer[..len.min(127)].iter().map(|&c| c as u8).collect();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn report_error_sets_message_and_fatal_status() {
        let status = report_error(&EncodeError::BufferAccess("output"));
        assert_eq!(status, JxlEncStatus::FatalError);
        assert_eq!(last_error(), "Failed to access output buffer");

        jxl_clear_last_error();
        assert_eq!(unsafe { jxl_get_last_error(std::ptr::null_mut(), 0) }, 0);
    }

    #[test]
    fn long_message_is_truncated_and_terminated() {
        set_last_error("x".repeat(10));
        let mut buffer = [1 as c_char; 4];
        let len = unsafe { jxl_get_last_error(buffer.as_mut_ptr(), buffer.len()) };
        assert_eq!(len, 10);
        assert_eq!(buffer[3], 0);
        assert_eq!(buffer[0] as u8, b'x');
    }
}
