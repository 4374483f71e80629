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

//! Error type shared by every encode, decode and shape-resolution path.
//!
//! Error constructors sit on the cold side of every buffer read and write, so
//! they are marked `#[cold]` and `#[track_caller]` to keep the successful path
//! free of error-building code.

use std::borrow::Cow;
use std::io;

use thiserror::Error;

/// Set `SHAPEWIRE_PANIC_ON_ERROR=1` at compile time to panic where an error is
/// constructed, which gives a backtrace pointing at the failing read or write.
pub const PANIC_ON_ERROR: bool = option_env!("SHAPEWIRE_PANIC_ON_ERROR").is_some();

/// Check if `SHAPEWIRE_PANIC_ON_ERROR` was set at compile time.
#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for shapewire encoding, decoding and shape resolution.
///
/// # Always use the constructor functions
///
/// Build errors through [`Error::sink`], [`Error::source`],
/// [`Error::end_of_stream`], [`Error::unexpected_data`],
/// [`Error::out_of_memory`], [`Error::map_too_large`] and
/// [`Error::invalid_shape`] rather than the enum syntax. The constructors
/// classify I/O errors (an exhausted source becomes [`Error::EndOfStream`]) and
/// honour [`PANIC_ON_ERROR`].
///
/// ```rust
/// use shapewire_core::error::Error;
///
/// let err = Error::unexpected_data("error-set index 7 out of range");
/// assert!(err.is_unexpected_data());
/// ```
///
/// ## Debug mode
///
/// ```bash
/// RUST_BACKTRACE=1 SHAPEWIRE_PANIC_ON_ERROR=1 cargo test
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The byte sink rejected a write.
    ///
    /// Do not construct this variant directly; use [`Error::sink`] instead.
    #[error("sink error: {0}")]
    SinkError(#[source] io::Error),

    /// The byte source failed for a reason other than running out of input.
    ///
    /// Do not construct this variant directly; use [`Error::source`] instead.
    #[error("source error: {0}")]
    SourceError(#[source] io::Error),

    /// The source was exhausted in the middle of a value.
    ///
    /// Do not construct this variant directly; use [`Error::end_of_stream`] instead.
    #[error("unexpected end of stream")]
    EndOfStream,

    /// The stream is well formed byte-wise but does not describe a legal value:
    /// fingerprint mismatch, out-of-range error-set index, undeclared
    /// enumeration value, unmatched union tag, invalid UTF-8 and similar.
    ///
    /// Do not construct this variant directly; use [`Error::unexpected_data`] instead.
    #[error("unexpected data: {0}")]
    UnexpectedData(Cow<'static, str>),

    /// The allocator refused a request made while decoding.
    ///
    /// Do not construct this variant directly; use [`Error::out_of_memory`] instead.
    #[error("out of memory: {0}")]
    OutOfMemory(Cow<'static, str>),

    /// A map holds more entries than the 32-bit wire count can express.
    ///
    /// Do not construct this variant directly; use [`Error::map_too_large`] instead.
    #[error("map of {0} entries exceeds the 32-bit wire count")]
    MapTooLarge(usize),

    /// A shape description breaks one of the construction-time rules.
    ///
    /// Do not construct this variant directly; use [`Error::invalid_shape`] instead.
    #[error("invalid shape: {0}")]
    InvalidShape(Cow<'static, str>),
}

impl Error {
    /// Creates a new [`Error::SinkError`] from a failed write.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn sink(err: io::Error) -> Self {
        let err = Error::SinkError(err);
        if PANIC_ON_ERROR {
            panic!("SHAPEWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates an error from a failed read.
    ///
    /// `UnexpectedEof` is reported as [`Error::EndOfStream`]; anything else is
    /// an [`Error::SourceError`].
    ///
    /// ```rust
    /// use shapewire_core::error::Error;
    /// use std::io;
    ///
    /// let err = Error::source(io::Error::from(io::ErrorKind::UnexpectedEof));
    /// assert!(err.is_end_of_stream());
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn source(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            return Error::end_of_stream();
        }
        let err = Error::SourceError(err);
        if PANIC_ON_ERROR {
            panic!("SHAPEWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::EndOfStream`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn end_of_stream() -> Self {
        let err = Error::EndOfStream;
        if PANIC_ON_ERROR {
            panic!("SHAPEWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::UnexpectedData`] from a string or static message.
    ///
    /// ```rust
    /// use shapewire_core::error::Error;
    ///
    /// let err = Error::unexpected_data("bad tag");
    /// let err = Error::unexpected_data(format!("bad tag {}", 9));
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unexpected_data<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::UnexpectedData(s.into());
        if PANIC_ON_ERROR {
            panic!("SHAPEWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::OutOfMemory`] from a string or static message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn out_of_memory<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::OutOfMemory(s.into());
        if PANIC_ON_ERROR {
            panic!("SHAPEWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::MapTooLarge`] for a map of `len` entries.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn map_too_large(len: usize) -> Self {
        let err = Error::MapTooLarge(len);
        if PANIC_ON_ERROR {
            panic!("SHAPEWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::InvalidShape`] from a string or static message.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_shape<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::InvalidShape(s.into());
        if PANIC_ON_ERROR {
            panic!("SHAPEWIRE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Error::EndOfStream)
    }

    pub fn is_unexpected_data(&self) -> bool {
        matches!(self, Error::UnexpectedData(_))
    }

    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Error::OutOfMemory(_))
    }

    /// Appends the Rust type name to an [`Error::UnexpectedData`] or
    /// [`Error::InvalidShape`] message; other errors pass through unchanged.
    #[inline(never)]
    pub fn enhance_with_type<T: ?Sized + 'static>(err: Error) -> Error {
        match err {
            Error::UnexpectedData(s) => {
                Error::UnexpectedData(format!("{} (type: {})", s, std::any::type_name::<T>()).into())
            }
            Error::InvalidShape(s) => {
                Error::InvalidShape(format!("{} (type: {})", s, std::any::type_name::<T>()).into())
            }
            other => other,
        }
    }
}

/// Ensures a condition is true; otherwise returns the given [`enum@Error`].
///
/// # Examples
/// ```
/// use shapewire_core::ensure;
/// use shapewire_core::error::Error;
///
/// fn check_index(index: u16, count: usize) -> Result<(), Error> {
///     ensure!(
///         (index as usize) < count,
///         Error::unexpected_data(format!("index {} out of range", index))
///     );
///     Ok(())
/// }
/// assert!(check_index(3, 2).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}
