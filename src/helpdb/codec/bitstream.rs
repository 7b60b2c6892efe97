//! MSB-first bit reader.

use std::io::{ErrorKind, Read};

use crate::helpdb::types::error::Result;

/// Reads a byte source one bit at a time, most significant bit first.
///
/// A new byte is pulled from the source only when the current one is used
/// up, so a length-limited source reports its end exactly where the decoder
/// runs past it.
pub struct BitReader<R> {
    inner: R,
    byte: u8,
    remaining: u8,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            byte: 0,
            remaining: 0,
        }
    }

    /// Returns the next bit, or `None` at the end of the source.
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.remaining == 0 {
            let mut buf = [0u8; 1];
            loop {
                match self.inner.read(&mut buf) {
                    Ok(0) => return Ok(None),
                    Ok(_) => break,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            }
            self.byte = buf[0];
            self.remaining = 8;
        }
        self.remaining -= 1;
        Ok(Some((self.byte >> self.remaining) & 1 != 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_msb_first() {
        let data = [0b1010_0001u8, 0xFF];
        let mut reader = BitReader::new(&data[..]);
        let mut bits = Vec::new();
        while let Some(bit) = reader.read_bit().unwrap() {
            bits.push(bit as u8);
        }
        assert_eq!(bits, vec![1, 0, 1, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn does_not_prefetch() {
        let data = [0x80u8, 0x00];
        let mut source = &data[..];
        let mut reader = BitReader::new(&mut source);
        assert_eq!(reader.read_bit().unwrap(), Some(true));
        drop(reader);
        assert_eq!(source.len(), 1);
    }
}
