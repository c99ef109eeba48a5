// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Scripted engine for session tests: records lifecycle events and fails on request.

use crate::color::ColorEncoding;
use crate::engine::{EncoderEngine, OutputProgress};
use crate::error::{EncodeError, EncodeResult};
use crate::types::*;
use std::cell::{Cell, RefCell};

thread_local! {
    static EVENTS: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
    static FAULTS: Cell<Faults> = const { Cell::new(Faults::NONE) };
}

/// Failures the next mock engine created on this thread will produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Faults {
    pub fail_create: bool,
    pub fail_runner: bool,
    pub fail_basic_info: bool,
    pub fail_color_encoding: bool,
    pub fail_frame: bool,
    /// Report pending output without writing anything.
    pub stall: bool,
    /// Cap on bytes produced per `process_output` call.
    pub max_chunk: Option<usize>,
}

impl Faults {
    pub(crate) const NONE: Faults = Faults {
        fail_create: false,
        fail_runner: false,
        fail_basic_info: false,
        fail_color_encoding: false,
        fail_frame: false,
        stall: false,
        max_chunk: None,
    };
}

/// Installs faults for this thread and clears the event log.
pub(crate) fn inject(faults: Faults) {
    FAULTS.with(|f| f.set(faults));
    EVENTS.with(|e| e.borrow_mut().clear());
}

/// Drains the event log.
pub(crate) fn take_events() -> Vec<&'static str> {
    EVENTS.with(|e| std::mem::take(&mut *e.borrow_mut()))
}

fn record(event: &'static str) {
    EVENTS.with(|e| e.borrow_mut().push(event));
}

pub(crate) struct MockRunner;

impl Drop for MockRunner {
    fn drop(&mut self) {
        record("runner dropped");
    }
}

/// Emits `FF 0A` followed by the pixel bytes.
pub(crate) struct MockEngine {
    faults: Faults,
    stream: Vec<u8>,
    drained: usize,
}

impl Drop for MockEngine {
    fn drop(&mut self) {
        record("engine dropped");
    }
}

impl EncoderEngine for MockEngine {
    type Runner = MockRunner;

    fn create(_options: &JxlEncodeOptions) -> EncodeResult<(Self, MockRunner)> {
        let faults = FAULTS.with(Cell::get);
        if faults.fail_create {
            return Err(EncodeError::Engine("injected create failure".into()));
        }
        record("created");
        Ok((
            Self {
                faults,
                stream: Vec::new(),
                drained: 0,
            },
            MockRunner,
        ))
    }

    fn set_parallel_runner(&mut self, _runner: &MockRunner) -> EncodeResult<()> {
        if self.faults.fail_runner {
            return Err(EncodeError::ParallelRunner("injected".into()));
        }
        record("runner set");
        Ok(())
    }

    fn set_basic_info(&mut self, _info: &JxlEncBasicInfo) -> EncodeResult<()> {
        if self.faults.fail_basic_info {
            return Err(EncodeError::basic_info("injected"));
        }
        record("basic info set");
        Ok(())
    }

    fn set_color_encoding(&mut self, _encoding: ColorEncoding) -> EncodeResult<()> {
        if self.faults.fail_color_encoding {
            return Err(EncodeError::color_encoding("injected"));
        }
        record("color encoding set");
        Ok(())
    }

    fn add_image_frame(&mut self, _format: JxlEncPixelFormat, pixels: &[u8]) -> EncodeResult<()> {
        if self.faults.fail_frame {
            return Err(EncodeError::image_frame("injected"));
        }
        record("frame added");
        self.stream = [0xFF, 0x0A].into_iter().chain(pixels.iter().copied()).collect();
        Ok(())
    }

    fn process_output(&mut self, out: &mut [u8]) -> EncodeResult<OutputProgress> {
        if self.faults.stall {
            return Ok(OutputProgress {
                written: 0,
                finished: false,
            });
        }
        let remaining = &self.stream[self.drained..];
        let cap = self.faults.max_chunk.unwrap_or(usize::MAX);
        let written = remaining.len().min(out.len()).min(cap);
        out[..written].copy_from_slice(&remaining[..written]);
        self.drained += written;
        Ok(OutputProgress {
            written,
            finished: self.drained == self.stream.len(),
        })
    }
}
