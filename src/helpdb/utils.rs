//! Low-level byte reading utilities

use std::io::{self, BufRead, Read};

use crate::helpdb::types::error::{HelpError, Result};

/// Counts the bytes consumed from the wrapped reader.
///
/// Section offsets in a database are relative to its first byte, so the
/// reader is created fresh for every database in a file.
pub struct PositionedReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read> PositionedReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Discards `count` bytes, returning how many were actually available.
    pub fn skip(&mut self, count: u64) -> Result<u64> {
        let skipped = io::copy(&mut self.by_ref().take(count), &mut io::sink())?;
        Ok(skipped)
    }

    /// Reads up to `count` bytes, stopping early only at end of input.
    pub fn read_up_to(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(count.min(u16::MAX as usize));
        self.by_ref().take(count as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl<R: Read> Read for PositionedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}

impl<R: BufRead> BufRead for PositionedReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt);
        self.position += amt as u64;
    }
}

/// Reads one byte from a slice reader, naming the field on failure.
pub fn take_u8(reader: &mut &[u8], what: &'static str) -> Result<u8> {
    let (&b, rest) = reader.split_first().ok_or(HelpError::UnexpectedEof(what))?;
    *reader = rest;
    Ok(b)
}

/// Takes `len` bytes from a slice reader.
pub fn take_bytes<'a>(reader: &mut &'a [u8], len: usize, what: &'static str) -> Result<&'a [u8]> {
    if reader.len() < len {
        return Err(HelpError::UnexpectedEof(what));
    }
    let (head, rest) = reader.split_at(len);
    *reader = rest;
    Ok(head)
}

/// Takes bytes up to a NUL terminator, consuming the terminator.
pub fn take_cstr<'a>(reader: &mut &'a [u8], what: &'static str) -> Result<&'a [u8]> {
    let end = reader
        .iter()
        .position(|&b| b == 0)
        .ok_or(HelpError::UnexpectedEof(what))?;
    let s = &reader[..end];
    *reader = &reader[end + 1..];
    Ok(s)
}
