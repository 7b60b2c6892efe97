//! # Topic Decoding
//!
//! Turns the compressed bytes of one topic into lines of styled text.
//!
//! ## Compressed topic
//! ```text
//! [2 bytes] Decompressed size (little-endian u16)
//! [N bytes] Huffman bit stream of keyword-compressed data
//! ```
//!
//! ## Line record
//! ```text
//! [1 byte]  L = text length + 1
//! [L-1]     Text (code page 437)
//! [1 byte]  A = attribute block length + 1
//! [A-1]     Attribute block:
//!             run length                    first run, default style
//!             (style byte, run length)*     style bits 0x01 bold, 0x02 italic, 0x04 underline
//!             0xFF                          start of hyperlinks (optional)
//!             (start, end, target)*         1-based inclusive columns; target is a
//!                                           NUL-terminated context string, or an empty
//!                                           string followed by a u16 topic number
//! ```

use byteorder::{ByteOrder, LittleEndian};
use log::{trace, warn};

use super::command;
use crate::helpdb::codec::graphic437;
use crate::helpdb::codec::huffman::{HuffmanDecoder, HuffmanTree};
use crate::helpdb::codec::keyword::KeywordExpander;
use crate::helpdb::types::error::{HelpError, Result};
use crate::helpdb::types::models::Dictionary;
use crate::helpdb::types::topic::{LineBuilder, TextStyle, Topic};
use crate::helpdb::types::uri::HelpUri;
use crate::helpdb::utils::{take_bytes, take_cstr, take_u8};

/// Marks the end of the style runs in an attribute block.
const LINK_MARKER: u8 = 0xFF;

/// Decodes topics of one database.
///
/// Holds the shared, read-only decode context: the Huffman tree and the
/// keyword dictionary.
pub struct TopicDecoder<'a> {
    tree: Option<&'a HuffmanTree>,
    dictionary: &'a Dictionary,
    control_character: char,
    process_commands: bool,
    keep_source: bool,
}

impl<'a> TopicDecoder<'a> {
    pub fn new(
        tree: Option<&'a HuffmanTree>,
        dictionary: &'a Dictionary,
        control_character: char,
    ) -> Self {
        Self {
            tree,
            dictionary,
            control_character,
            process_commands: true,
            keep_source: true,
        }
    }

    pub fn process_commands(mut self, process: bool) -> Self {
        self.process_commands = process;
        self
    }

    pub fn keep_source(mut self, keep: bool) -> Self {
        self.keep_source = keep;
        self
    }

    /// Decodes `input` into `topic`.
    ///
    /// Problems that do not stop decoding, such as a short decompressed
    /// stream, are appended to `problems`. An `Err` stops decoding this
    /// topic; lines decoded before it stay on the topic.
    pub fn decode(&self, input: &[u8], topic: &mut Topic, problems: &mut Vec<String>) -> Result<()> {
        let Some(data) = self.decompress(input, problems)? else {
            return Ok(());
        };
        let control = self.process_commands.then_some(self.control_character);
        let result = parse_lines(&data, topic, control);
        if self.keep_source {
            topic.source = Some(data);
        }
        result
    }

    /// Expands a compressed topic. Returns `None` if the size field is missing.
    pub fn decompress(&self, input: &[u8], problems: &mut Vec<String>) -> Result<Option<Vec<u8>>> {
        if input.len() < 2 {
            problems.push("Not enough bytes for the decompressed size field".to_string());
            return Ok(None);
        }
        let size = LittleEndian::read_u16(&input[..2]) as usize;
        let payload = &input[2..];

        let output = match self.tree {
            Some(tree) => {
                let symbols = HuffmanDecoder::new(tree, payload);
                KeywordExpander::new(symbols, self.dictionary).read_exact_count(size)?
            }
            None => KeywordExpander::new(payload, self.dictionary).read_exact_count(size)?,
        };

        if output.len() != size {
            problems.push(format!(
                "Decompressed topic size mismatch: expecting {} bytes, got {} bytes",
                size,
                output.len()
            ));
        }
        trace!("Topic expanded from {} to {} bytes", input.len(), output.len());
        Ok(Some(output))
    }
}

/// Parses decompressed topic data into lines.
///
/// Lines that are commands for `control_character` are applied to the
/// topic instead of being added to it; pass `None` to keep them as text.
/// If a line is malformed, whatever was decoded of it is still added before
/// the error is returned.
pub fn parse_lines(data: &[u8], topic: &mut Topic, control_character: Option<char>) -> Result<()> {
    let mut reader = data;
    while !reader.is_empty() {
        let mut partial = None;
        let result = read_line(&mut reader, &mut partial);
        let Some(line) = partial.map(LineBuilder::build) else {
            return result;
        };
        if let Err(e) = result {
            topic.lines.push(line);
            return Err(e);
        }

        let is_command = control_character
            .is_some_and(|c| command::process_command(line.text(), c, topic));
        if !is_command {
            topic.lines.push(line);
        }
    }
    Ok(())
}

/// Reads one line record. `line` is set as soon as the text is known.
fn read_line(reader: &mut &[u8], line: &mut Option<LineBuilder>) -> Result<()> {
    let text_len = take_u8(reader, "text length")?;
    if text_len == 0 {
        return Err(HelpError::InvalidFormat("Line text length byte is zero".to_string()));
    }
    let text = take_bytes(reader, text_len as usize - 1, "line text")?;
    let builder = line.insert(LineBuilder::new(graphic437::decode(text)));

    let attr_len = take_u8(reader, "attribute length")?;
    if attr_len == 0 {
        return Err(HelpError::InvalidFormat("Line attribute length byte is zero".to_string()));
    }
    let mut attrs = take_bytes(reader, attr_len as usize - 1, "line attributes")?;

    read_styles(&mut attrs, builder)?;
    while !attrs.is_empty() {
        read_link(&mut attrs, builder)?;
    }
    Ok(())
}

/// Applies style runs until the link marker or the end of the block.
fn read_styles(reader: &mut &[u8], line: &mut LineBuilder) -> Result<()> {
    let mut pos = 0;
    let mut first = true;
    while !reader.is_empty() {
        let style = if first {
            first = false;
            TextStyle::PLAIN
        } else {
            let bits = take_u8(reader, "text attribute")?;
            if bits == LINK_MARKER {
                break;
            }
            TextStyle::from_bits(bits)?
        };

        let count = take_u8(reader, "style run length")? as usize;
        let available = line.len() - pos;
        if count > available {
            warn!(
                "Style run of {} characters at column {} is past line end {}",
                count,
                pos + 1,
                line.len()
            );
        }
        let count = count.min(available);
        line.set_style(pos, pos + count, style);
        pos += count;
    }
    Ok(())
}

fn read_link(reader: &mut &[u8], line: &mut LineBuilder) -> Result<()> {
    let start = take_u8(reader, "link start column")?;
    let end = take_u8(reader, "link end column")?;
    if start == 0 || start > end {
        return Err(HelpError::InvalidLinkLocation { start, end });
    }
    let mut end = end as usize;
    if end > line.len() {
        warn!("Link end {} is past line end {}", end, line.len());
        end = line.len();
    }

    let context = take_cstr(reader, "link target")?;
    let uri = if context.is_empty() {
        let number = LittleEndian::read_u16(take_bytes(reader, 2, "link topic number")?);
        HelpUri::from_encoded_index(number)
    } else {
        HelpUri::new(graphic437::decode(context))
    };
    trace!("Link {}..={} -> {}", start, end, uri);
    line.set_link(start as usize - 1, end, uri);
    Ok(())
}
