//! Dictionary and run-length expansion.
//!
//! # Control bytes
//! ```text
//! 0x10-0x17 LO      dictionary entry ((b & 3) << 8 | LO), plus a space if b & 4
//! 0x18 N            N spaces
//! 0x19 B N          byte B repeated N times
//! 0x1A B            byte B literally
//! ```
//! Every other byte stands for itself.

use log::trace;

use super::ByteSource;
use crate::helpdb::types::error::{HelpError, Result};
use crate::helpdb::types::models::Dictionary;

/// A fill stops once the buffer holds more than this many bytes. One control
/// token expands to at most 256 bytes, so the buffer never needs to grow
/// beyond twice this size.
const FILL_THRESHOLD: usize = 256;

/// Upper bound on tokens read by one fill. Tokens can expand to nothing
/// (empty dictionary entries, zero counts), and a singular Huffman tree never
/// runs out of symbols.
const MAX_TOKENS_PER_FILL: usize = 4096;

/// Expands keyword tokens pulled from an underlying [`ByteSource`].
///
/// The expander only pulls as many tokens as it needs for the bytes
/// requested, since the Huffman layer below has no end marker of its own.
pub struct KeywordExpander<'d, S> {
    source: S,
    dictionary: &'d Dictionary,
    buffer: Vec<u8>,
    start: usize,
}

impl<'d, S: ByteSource> KeywordExpander<'d, S> {
    pub fn new(source: S, dictionary: &'d Dictionary) -> Self {
        Self {
            source,
            dictionary,
            buffer: Vec::with_capacity(FILL_THRESHOLD * 2),
            start: 0,
        }
    }

    /// Reads up to `count` expanded bytes. Fewer bytes are returned only
    /// when the underlying source is exhausted.
    pub fn read_exact_count(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(count);
        while out.len() < count {
            if self.start >= self.buffer.len() {
                self.fill(count - out.len())?;
                if self.buffer.is_empty() {
                    break;
                }
            }
            let n = (count - out.len()).min(self.buffer.len() - self.start);
            out.extend_from_slice(&self.buffer[self.start..self.start + n]);
            self.start += n;
        }
        trace!("Keyword expansion produced {} of {} bytes", out.len(), count);
        Ok(out)
    }

    fn fill(&mut self, max_bytes: usize) -> Result<()> {
        self.buffer.clear();
        self.start = 0;

        let mut tokens = 0;
        while self.buffer.len() <= FILL_THRESHOLD
            && self.buffer.len() < max_bytes
            && tokens < MAX_TOKENS_PER_FILL
        {
            let Some(b) = self.source.next_byte()? else {
                break;
            };
            tokens += 1;

            match b {
                0x1A => {
                    let literal = self.argument()?;
                    self.buffer.push(literal);
                }
                0x19 => {
                    let byte = self.argument()?;
                    let count = self.argument()?;
                    self.buffer
                        .extend(std::iter::repeat_n(byte, count as usize));
                }
                0x18 => {
                    let count = self.argument()?;
                    self.buffer
                        .extend(std::iter::repeat_n(b' ', count as usize));
                }
                0x10..=0x17 => {
                    let low = self.argument()?;
                    let index = (((b & 3) as usize) << 8) | low as usize;
                    let entry = self.dictionary.get(index).ok_or(
                        HelpError::DictionaryIndexOutOfRange {
                            index,
                            len: self.dictionary.len(),
                        },
                    )?;
                    self.buffer.extend_from_slice(entry);
                    if b & 4 != 0 {
                        self.buffer.push(b' ');
                    }
                }
                _ => self.buffer.push(b),
            }
        }
        Ok(())
    }

    fn argument(&mut self) -> Result<u8> {
        self.source
            .next_byte()?
            .ok_or(HelpError::UnexpectedEof("control byte argument"))
    }
}
