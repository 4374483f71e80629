// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Allocation accounting for the decode and release walks.
//!
//! Decoding asks an [`Allocator`] before every owned allocation it makes (a
//! boxed pointee, a sequence buffer including its terminator slot, a map
//! table), and [`Serializer::wire_release`](crate::serializer::Serializer::wire_release)
//! hands each one back exactly once. Memory itself comes from the global heap
//! through fallible reservation; the allocator decides whether a request may
//! proceed and keeps the books.

use std::alloc::Layout;
use std::mem;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::Error;

/// Grants and takes back decode-time allocations.
///
/// Implementations must be thread safe if shared between concurrent decodes.
pub trait Allocator: Sync {
    /// Requests permission to allocate `layout`. A refusal surfaces as
    /// [`Error::OutOfMemory`].
    fn acquire(&self, layout: Layout) -> Result<(), Error>;

    /// Returns a layout previously granted by [`Allocator::acquire`].
    fn release(&self, layout: Layout);
}

/// Unlimited allocator that keeps no books.
#[derive(Clone, Copy, Debug, Default)]
pub struct Global;

impl Allocator for Global {
    #[inline(always)]
    fn acquire(&self, _layout: Layout) -> Result<(), Error> {
        Ok(())
    }

    #[inline(always)]
    fn release(&self, _layout: Layout) {}
}

/// Allocator with a byte quota and live counters.
///
/// ```rust
/// use shapewire_core::alloc::{Allocator, Budget};
/// use std::alloc::Layout;
///
/// let budget = Budget::new(16);
/// budget.acquire(Layout::new::<u64>()).unwrap();
/// assert_eq!(budget.live_allocations(), 1);
/// assert!(budget.acquire(Layout::new::<[u64; 2]>()).is_err());
/// budget.release(Layout::new::<u64>());
/// assert_eq!(budget.bytes_in_use(), 0);
/// ```
#[derive(Debug)]
pub struct Budget {
    limit: usize,
    in_use: AtomicUsize,
    live: AtomicUsize,
    peak: AtomicUsize,
    total: AtomicUsize,
}

impl Budget {
    pub fn new(limit: usize) -> Self {
        Budget {
            limit,
            in_use: AtomicUsize::new(0),
            live: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
        }
    }

    /// A budget with no byte limit, useful for counting allocations.
    pub fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Allocations granted and not yet released.
    pub fn live_allocations(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    /// Allocations granted over the lifetime of this budget.
    pub fn total_allocations(&self) -> usize {
        self.total.load(Ordering::Acquire)
    }

    pub fn bytes_in_use(&self) -> usize {
        self.in_use.load(Ordering::Acquire)
    }

    /// Highest [`Budget::bytes_in_use`] observed.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Acquire)
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl Allocator for Budget {
    fn acquire(&self, layout: Layout) -> Result<(), Error> {
        let size = layout.size();
        let granted = self
            .in_use
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                used.checked_add(size).filter(|total| *total <= self.limit)
            });
        match granted {
            Ok(previous) => {
                self.live.fetch_add(1, Ordering::AcqRel);
                self.total.fetch_add(1, Ordering::AcqRel);
                self.peak.fetch_max(previous + size, Ordering::AcqRel);
                Ok(())
            }
            Err(used) => Err(Error::out_of_memory(format!(
                "{} bytes requested with {} of {} in use",
                size, used, self.limit
            ))),
        }
    }

    fn release(&self, layout: Layout) {
        self.in_use.fetch_sub(layout.size(), Ordering::AcqRel);
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Refuses every request. Backs decodes of shapes that never allocate.
pub(crate) struct NoAllocator;

impl Allocator for NoAllocator {
    fn acquire(&self, layout: Layout) -> Result<(), Error> {
        Err(Error::out_of_memory(format!(
            "no allocator supplied for {} bytes",
            layout.size()
        )))
    }

    fn release(&self, _layout: Layout) {}
}

/// A granted layout that goes back to its allocator when dropped, unless it is
/// committed to a decoded value first.
#[must_use]
pub struct Lease<'a> {
    allocator: &'a dyn Allocator,
    layout: Layout,
}

impl<'a> Lease<'a> {
    pub fn acquire(allocator: &'a dyn Allocator, layout: Layout) -> Result<Self, Error> {
        allocator.acquire(layout)?;
        Ok(Lease { allocator, layout })
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Ownership of the layout passes to the decoded value; its release walk
    /// returns it.
    pub fn commit(self) {
        mem::forget(self);
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        self.allocator.release(self.layout);
    }
}

/// Layout of a buffer of `len` elements of `T`.
pub fn array_layout<T>(len: usize) -> Result<Layout, Error> {
    Layout::array::<T>(len)
        .map_err(|_| Error::out_of_memory(format!("{} elements overflow the address space", len)))
}

/// Layout charged for a decoded sequence of `len` elements of `T`.
///
/// Zero-sized elements are charged one byte each, so the length header of a
/// sequence of `()` still draws on the allocator's quota.
pub fn seq_layout<T>(len: usize) -> Result<Layout, Error> {
    if mem::size_of::<T>() == 0 {
        array_layout::<u8>(len)
    } else {
        array_layout::<T>(len)
    }
}

/// Reserves room for exactly `len` more elements, reporting failure instead of
/// aborting.
pub fn try_reserve<T>(buf: &mut Vec<T>, len: usize) -> Result<(), Error> {
    buf.try_reserve_exact(len)
        .map_err(|e| Error::out_of_memory(e.to_string()))
}
