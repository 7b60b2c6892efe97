//! Codec layer for the compression used by help databases.
//!
//! Topic text is stored in two stacked layers. The outer layer is a Huffman
//! bit stream; the symbols it yields form a keyword stream where control
//! bytes stand for dictionary entries and runs of repeated bytes.
//!
//! # Submodules
//!
//! - [`bitstream`][]: MSB-first bit reader
//! - [`huffman`][]: Huffman tree deserialization and symbol decoding
//! - [`keyword`][]: Dictionary and run-length expansion
//! - [`graphic437`][]: Code page 437 text decoding

pub mod bitstream;
pub mod graphic437;
pub mod huffman;
pub mod keyword;

use crate::helpdb::types::error::Result;

/// A pull-based source of bytes.
pub trait ByteSource {
    /// Returns the next byte, or `None` at the end of the source.
    fn next_byte(&mut self) -> Result<Option<u8>>;
}

/// Payloads that are not Huffman-compressed feed the keyword layer directly.
impl ByteSource for &[u8] {
    fn next_byte(&mut self) -> Result<Option<u8>> {
        match self.split_first() {
            Some((&b, rest)) => {
                *self = rest;
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn next_byte(&mut self) -> Result<Option<u8>> {
        (**self).next_byte()
    }
}
