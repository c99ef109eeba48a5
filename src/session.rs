// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Streaming encode session.
//!
//! A session sequences the engine calls (runner, basic info, color encoding,
//! image frame) and then drains the codestream into caller regions. Each
//! drain call ends in exactly one of three outcomes:
//!
//! - `Success`: the stream is complete.
//! - `NeedMoreOutput`: the region filled up first; call again with more space.
//! - an `EncodeError`, reported as `FatalError` at the C boundary.

use crate::color::resolve_color_encoding;
use crate::engine::{EncoderEngine, ZuneEngine};
use crate::error::{EncodeError, EncodeResult};
use crate::types::*;

/// Engine and runner with a shared lifetime.
///
/// Fields drop in declaration order: the runner goes first, then the engine.
struct EnginePair<E: EncoderEngine> {
    runner: E::Runner,
    engine: E,
}

/// Pixels and metadata for one image.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EncodeInput<'a> {
    /// `None` asks for default basic info, which is not supported.
    pub info: Option<&'a JxlEncBasicInfo>,
    pub format: JxlEncPixelFormat,
    pub pixels: &'a [u8],
    pub icc: Option<&'a [u8]>,
}

/// Outcome of one drain call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DrainResult {
    pub status: JxlEncStatus,
    /// Bytes written at the start of the caller's region.
    pub written: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    AwaitingInput,
    Producing,
    Finished,
    Failed,
}

/// One encoder instance driven through configure, produce and finalize.
pub(crate) struct EncodeSession<E: EncoderEngine = ZuneEngine> {
    pair: EnginePair<E>,
    state: SessionState,
}

impl<E: EncoderEngine> EncodeSession<E> {
    /// Creates the engine and runner and registers the runner.
    ///
    /// If registration fails, both are dropped before the error is returned.
    #[tracing::instrument(level = "debug", skip_all, err)]
    pub(crate) fn new(options: &JxlEncodeOptions) -> EncodeResult<Self> {
        let (engine, runner) = E::create(options)?;
        let mut pair = EnginePair { runner, engine };

        pair.engine.set_parallel_runner(&pair.runner)?;

        Ok(Self {
            pair,
            state: SessionState::AwaitingInput,
        })
    }

    /// Commits basic info, color encoding and the image frame.
    ///
    /// Only one input per session. Any failure poisons the session.
    #[tracing::instrument(level = "debug", skip_all, fields(format = ?input.format), err)]
    pub(crate) fn set_input(&mut self, input: &EncodeInput<'_>) -> EncodeResult<()> {
        if self.state != SessionState::AwaitingInput {
            return Err(EncodeError::InvalidState("input already set"));
        }
        let result = self.configure(input);
        self.state = match result {
            Ok(()) => SessionState::Producing,
            Err(_) => SessionState::Failed,
        };
        result
    }

    fn configure(&mut self, input: &EncodeInput<'_>) -> EncodeResult<()> {
        let engine = &mut self.pair.engine;

        let info = input
            .info
            .ok_or_else(|| EncodeError::basic_info("default basic info is not supported"))?;
        engine.set_basic_info(info)?;

        let encoding = resolve_color_encoding(info, input.icc)?;
        engine.set_color_encoding(encoding)?;

        engine.add_image_frame(input.format, input.pixels)
    }

    /// Writes pending codestream bytes into `out`.
    ///
    /// After `Success`, further calls return `Success` with nothing written.
    #[tracing::instrument(level = "debug", skip_all, fields(capacity = out.len()), err)]
    pub(crate) fn process_output(&mut self, out: &mut [u8]) -> EncodeResult<DrainResult> {
        match self.state {
            SessionState::Producing => {}
            SessionState::Finished => {
                return Ok(DrainResult {
                    status: JxlEncStatus::Success,
                    written: 0,
                });
            }
            SessionState::AwaitingInput => {
                return Err(EncodeError::InvalidState("no input set"));
            }
            SessionState::Failed => {
                return Err(EncodeError::InvalidState("a previous call failed"));
            }
        }

        let result = drain(&mut self.pair.engine, out);
        match result {
            Ok(DrainResult {
                status: JxlEncStatus::Success,
                ..
            }) => self.state = SessionState::Finished,
            Ok(_) => {}
            Err(_) => self.state = SessionState::Failed,
        }
        result
    }
}

/// Fills `out` from the engine until the stream ends or the region is full.
fn drain<E: EncoderEngine>(engine: &mut E, out: &mut [u8]) -> EncodeResult<DrainResult> {
    let mut cursor = 0;
    loop {
        let available = out.len() - cursor;
        let progress = engine.process_output(&mut out[cursor..])?;
        if progress.written > available {
            return Err(EncodeError::unexpected_state(format!(
                "engine reported {} bytes written into {available} available",
                progress.written
            )));
        }
        cursor += progress.written;

        if progress.finished {
            return Ok(DrainResult {
                status: JxlEncStatus::Success,
                written: cursor,
            });
        }
        if cursor == out.len() {
            return Ok(DrainResult {
                status: JxlEncStatus::NeedMoreOutput,
                written: cursor,
            });
        }
        if progress.written == 0 {
            return Err(EncodeError::unexpected_state(format!(
                "engine wants more output but wrote nothing into {available} free bytes"
            )));
        }
    }
}

/// Runs a full session for one request and tears it down.
///
/// A `NeedMoreOutput` result here cannot be resumed: the engine is gone once
/// this returns.
pub(crate) fn encode_once<E: EncoderEngine>(
    options: &JxlEncodeOptions,
    input: &EncodeInput<'_>,
    out: &mut [u8],
) -> EncodeResult<DrainResult> {
    let mut session = EncodeSession::<E>::new(options)?;
    session.set_input(input)?;
    session.process_output(out)
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
