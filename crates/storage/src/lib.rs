// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! runboard-storage: the framed run-log format and its reader.
//!
//! A run log is a fixed 7-byte header followed by length-prefixed,
//! CRC-checked frames, each carrying one JSON-encoded record. The file is
//! append-only and may still be growing while it is read; the reader treats
//! a torn trailing frame as a soft EOF and re-attempts it once more bytes
//! arrive.

pub mod format;
pub mod reader;

#[cfg(any(test, feature = "test-support"))]
pub mod writer;

pub use reader::{FramedLogReader, ReadError, ReadOutcome};

#[cfg(any(test, feature = "test-support"))]
pub use writer::{write_log, FramedLogWriter};
