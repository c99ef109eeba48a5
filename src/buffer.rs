// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Resolution of caller buffer handles into borrowed byte regions.
//!
//! A handle is only checked for a non-null address. Capacity is taken as
//! given and the bytes are never inspected or copied here.

use crate::error::{EncodeError, EncodeResult};
use crate::types::JxlEncBuffer;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::slice;

/// A borrowed view of a caller-owned byte region.
#[derive(Debug)]
pub(crate) struct ByteRegion<'a> {
    data: NonNull<u8>,
    capacity: usize,
    _borrow: PhantomData<&'a mut [u8]>,
}

impl<'a> ByteRegion<'a> {
    /// Resolves a handle. `Ok(None)` means the caller passed no buffer.
    ///
    /// `name` is used in the error message when the address is null.
    ///
    /// # Safety
    /// If `handle` is not null it must point to a valid `JxlEncBuffer` whose
    /// `Data` is valid for reads and writes of `Capacity` bytes for `'a`, and
    /// no one else may access the region during `'a`.
    pub(crate) unsafe fn resolve(
        handle: *const JxlEncBuffer,
        name: &'static str,
    ) -> EncodeResult<Option<Self>> {
        let Some(handle) = (unsafe { handle.as_ref() }) else {
            return Ok(None);
        };
        let data = NonNull::new(handle.Data).ok_or(EncodeError::BufferAccess(name))?;
        Ok(Some(Self {
            data,
            capacity: handle.Capacity,
            _borrow: PhantomData,
        }))
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        // SAFETY: guaranteed by the `resolve` contract.
        unsafe { slice::from_raw_parts(self.data.as_ptr(), self.capacity) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: guaranteed by the `resolve` contract.
        unsafe { slice::from_raw_parts_mut(self.data.as_ptr(), self.capacity) }
    }
}
