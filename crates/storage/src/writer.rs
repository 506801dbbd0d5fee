// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-support log writer.
//!
//! The dashboard only consumes run logs; this writer exists so tests can
//! author them, including torn trailing writes that simulate a tracker
//! flushing mid-frame.

use crate::format::{encode_frame, encode_header};
use runboard_core::Record;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Appends framed records to a run log.
pub struct FramedLogWriter {
    file: File,
    /// Unwritten tail of a torn frame, if any.
    pending: Option<Vec<u8>>,
}

impl FramedLogWriter {
    /// Create the log file and write the 7-byte header.
    pub fn create(path: &Path) -> io::Result<Self> {
        let mut writer = Self::create_headerless(path)?;
        writer.file.write_all(&encode_header())?;
        Ok(writer)
    }

    /// Create the log file without a header, for header-not-ready tests.
    pub fn create_headerless(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(path)?;
        Ok(Self {
            file,
            pending: None,
        })
    }

    /// Write the header bytes now (after a headerless create).
    pub fn write_header(&mut self) -> io::Result<()> {
        self.file.write_all(&encode_header())
    }

    /// Append one whole record frame.
    pub fn append(&mut self, record: &Record) -> io::Result<()> {
        debug_assert!(self.pending.is_none(), "complete the torn frame first");
        let body = serde_json::to_vec(record)?;
        self.file.write_all(&encode_frame(&body))
    }

    /// Append only the first `split` bytes of a record's frame, keeping the
    /// rest for [`complete_torn`](Self::complete_torn).
    pub fn append_torn(&mut self, record: &Record, split: usize) -> io::Result<()> {
        let body = serde_json::to_vec(record)?;
        let frame = encode_frame(&body);
        let split = split.min(frame.len());
        self.file.write_all(&frame[..split])?;
        self.pending = Some(frame[split..].to_vec());
        Ok(())
    }

    /// Write the remainder of the torn frame.
    pub fn complete_torn(&mut self) -> io::Result<()> {
        if let Some(rest) = self.pending.take() {
            self.file.write_all(&rest)?;
        }
        Ok(())
    }

    /// Append raw bytes verbatim, for corruption tests.
    pub fn append_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.write_all(bytes)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Write a complete run log containing `records`, in one call.
pub fn write_log(path: &Path, records: &[Record]) -> io::Result<()> {
    let mut writer = FramedLogWriter::create(path)?;
    for record in records {
        writer.append(record)?;
    }
    writer.flush()
}
