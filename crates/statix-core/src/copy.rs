//! Buffered copy with a reusable buffer.
//!
//! One buffer is allocated per batch and reused for every member, instead of
//! letting `std::io::copy` allocate a fresh one per file.

use std::io;
use std::io::Read;
use std::io::Write;

/// Buffer size for member copies (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Heap-allocated buffer reused across member copies.
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a new zeroed copy buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies `reader` into `writer` through `buffer`, returning the byte count.
///
/// Interrupted reads are retried.
///
/// # Errors
///
/// Returns the first read or write error, or `InvalidData` if the byte count
/// would overflow `u64`.
pub fn copy_with_buffer<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> io::Result<u64> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        writer.write_all(&buffer.buf[..bytes_read])?;

        total = total
            .checked_add(bytes_read as u64)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "byte count overflow"))?;
    }

    Ok(total)
}
