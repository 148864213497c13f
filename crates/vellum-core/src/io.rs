//! Bounded-memory chunked reads.

use std::io::{ErrorKind, Read};

use crate::error::{CoreError, Result};

/// Default read chunk: 2 MiB.
pub const CHUNK_SIZE: usize = 2 * 1024 * 1024;

/// Read exactly `length` bytes from `reader` using [`CHUNK_SIZE`] reads.
pub fn read_exact<R: Read>(reader: R, length: usize) -> Result<Vec<u8>> {
    read_exact_chunked(reader, length, CHUNK_SIZE)
}

/// Read exactly `length` bytes, never asking the reader for more than
/// `chunk_size` bytes per call.
///
/// Short reads are fine; the loop continues until `length` bytes have arrived
/// or the reader reports end-of-data, in which case this fails with
/// [`CoreError::IncompleteRead`]. Bytes past `length` are left unread.
pub fn read_exact_chunked<R: Read>(mut reader: R, length: usize, chunk_size: usize) -> Result<Vec<u8>> {
    let chunk_size = chunk_size.max(1);
    let mut buf = vec![0u8; length];
    let mut pos = 0;

    while pos < length {
        let end = pos + chunk_size.min(length - pos);
        match reader.read(&mut buf[pos..end]) {
            Ok(0) => {
                return Err(CoreError::IncompleteRead {
                    expected: length,
                    read: pos,
                })
            }
            Ok(n) => pos += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(CoreError::Io(e)),
        }
    }

    Ok(buf)
}
