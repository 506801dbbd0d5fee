// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Framed log reader tolerant of partial trailing writes.
//!
//! [`FramedLogReader::read_next`] returns one whole record per call, or
//! [`ReadOutcome::Eof`] when no complete frame is on disk yet. The reader
//! never advances past the start of a partial frame, so a later call
//! re-attempts the same frame once the writer has flushed more bytes. An
//! unexpected EOF mid-frame is the same soft EOF, never an error.

use crate::format::{
    header_is_valid, FRAME_OVERHEAD, HEADER_LEN, MAX_BODY_LEN,
};
use parking_lot::Mutex;
use runboard_core::Record;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by the reader. Soft EOF is not an error; see
/// [`ReadOutcome::Eof`].
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("run log not found: {path}")]
    NotFound { path: PathBuf },
    #[error("invalid run log header: {path}")]
    HeaderInvalid { path: PathBuf },
    #[error("checksum mismatch in frame at offset {offset}")]
    Checksum { offset: u64 },
    #[error("frame at offset {offset} declares {len} body bytes, over the {max} limit")]
    Oversize { offset: u64, len: u32, max: u32 },
    #[error("undecodable record at offset {offset}")]
    Decode {
        offset: u64,
        #[source]
        source: serde_json::Error,
    },
    #[error("reader is closed")]
    Closed,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result of one successful `read_next` call.
#[derive(Debug)]
pub enum ReadOutcome {
    /// The next whole record in file order.
    Record(Record),
    /// No complete frame available right now; retry after the file grows.
    Eof,
}

struct Inner {
    file: Option<File>,
    /// Byte offset of the next unread frame (or of the header while it is
    /// still unverified).
    offset: u64,
    header_verified: bool,
}

/// Reader over one run log. All methods are mutually exclusive; one reader
/// is safe against any number of external writers appending to the file.
pub struct FramedLogReader {
    path: PathBuf,
    inner: Mutex<Inner>,
}

impl FramedLogReader {
    /// Open a run log for reading.
    ///
    /// Succeeds even when the header is not fully on disk yet; in that case
    /// the header is re-verified lazily on the first read. Fails with
    /// [`ReadError::NotFound`] if the path does not exist and with
    /// [`ReadError::HeaderInvalid`] if a fully-present header is malformed.
    pub fn open(path: &Path) -> Result<Self, ReadError> {
        let mut file = File::open(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => ReadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ReadError::Io(err),
        })?;

        let header_verified = Self::verify_header(&mut file, path)?;
        Ok(Self {
            path: path.to_path_buf(),
            inner: Mutex::new(Inner {
                file: Some(file),
                offset: if header_verified { HEADER_LEN as u64 } else { 0 },
                header_verified,
            }),
        })
    }

    /// Path this reader was opened on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the next whole record, or report a soft EOF.
    pub fn read_next(&self) -> Result<ReadOutcome, ReadError> {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;
        let Some(file) = inner.file.as_mut() else {
            return Err(ReadError::Closed);
        };

        if !inner.header_verified {
            if !Self::verify_header(file, &self.path)? {
                return Ok(ReadOutcome::Eof);
            }
            inner.header_verified = true;
            inner.offset = HEADER_LEN as u64;
        }

        let frame_start = inner.offset;
        file.seek(SeekFrom::Start(frame_start))?;

        let mut meta = [0u8; FRAME_OVERHEAD];
        if !read_full(file, &mut meta)? {
            return Ok(ReadOutcome::Eof);
        }
        let len = u32::from_le_bytes([meta[0], meta[1], meta[2], meta[3]]);
        let expected_crc = u32::from_le_bytes([meta[4], meta[5], meta[6], meta[7]]);

        if len > MAX_BODY_LEN {
            return Err(ReadError::Oversize {
                offset: frame_start,
                len,
                max: MAX_BODY_LEN,
            });
        }

        let mut body = vec![0u8; len as usize];
        if !read_full(file, &mut body)? {
            return Ok(ReadOutcome::Eof);
        }

        if crate::format::checksum(&body) != expected_crc {
            tracing::warn!(path = %self.path.display(), offset = frame_start, "frame checksum mismatch");
            return Err(ReadError::Checksum {
                offset: frame_start,
            });
        }

        let record: Record =
            serde_json::from_slice(&body).map_err(|source| ReadError::Decode {
                offset: frame_start,
                source,
            })?;

        inner.offset = frame_start + FRAME_OVERHEAD as u64 + u64::from(len);
        Ok(ReadOutcome::Record(record))
    }

    /// Release the underlying file. Idempotent; later reads return
    /// [`ReadError::Closed`].
    pub fn close(&self) {
        self.inner.lock().file = None;
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().file.is_none()
    }

    /// Verify the file header if it is fully present.
    ///
    /// Returns `Ok(false)` (not an error) when fewer than `HEADER_LEN`
    /// bytes are on disk yet.
    fn verify_header(file: &mut File, path: &Path) -> Result<bool, ReadError> {
        file.seek(SeekFrom::Start(0))?;
        let mut header = [0u8; HEADER_LEN];
        if !read_full(file, &mut header)? {
            return Ok(false);
        }
        if !header_is_valid(&header) {
            return Err(ReadError::HeaderInvalid {
                path: path.to_path_buf(),
            });
        }
        Ok(true)
    }
}

impl std::fmt::Debug for FramedLogReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramedLogReader")
            .field("path", &self.path)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Fill `buf` completely, or report that the file ended first.
///
/// Returns `Ok(false)` on a short read (torn trailing write), `Ok(true)`
/// when the buffer was filled.
fn read_full(file: &mut File, buf: &mut [u8]) -> Result<bool, io::Error> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => return Ok(false),
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(true)
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
