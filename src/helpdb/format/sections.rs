//! Readers for the sections between the header and the topic text.
//!
//! Sections follow each other without gaps, in this order:
//!
//! ```text
//! ┌──────────────────┐
//! │ Header           │ 0x46 bytes
//! ├──────────────────┤
//! │ Topic index      │ (topic count + 1) × i32
//! ├──────────────────┤
//! │ Context strings  │ NUL-terminated strings
//! ├──────────────────┤
//! │ Context map      │ context count × u16
//! ├──────────────────┤
//! │ Dictionary       │ (length byte, bytes) entries
//! ├──────────────────┤
//! │ Huffman tree     │ i16 node values + zero terminator
//! ├──────────────────┤
//! │ Topic text       │ compressed topics
//! └──────────────────┘
//! ```
//!
//! Every section must start exactly where the header says it does.

use std::io::{BufRead, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, trace};

use crate::helpdb::codec::huffman::HuffmanTree;
use crate::helpdb::types::error::{HelpError, Result};
use crate::helpdb::types::models::{Dictionary, FileHeader, Section, MAX_DICTIONARY_ENTRIES};
use crate::helpdb::utils::PositionedReader;

/// Fails unless the reader is at the declared start of `section`.
pub fn expect_offset<R: Read>(
    reader: &PositionedReader<R>,
    header: &FileHeader,
    section: Section,
) -> Result<()> {
    let expected = header.offsets.start_of(section) as i64;
    let found = reader.position() as i64;
    if expected != found {
        return Err(HelpError::SectionOffsetMismatch {
            section,
            expected,
            found,
        });
    }
    Ok(())
}

/// Size of `section` as declared by the offset of the section after it.
pub fn declared_size(header: &FileHeader, section: Section, next: Section) -> Result<usize> {
    let size = header.offsets.start_of(next) as i64 - header.offsets.start_of(section) as i64;
    usize::try_from(size).map_err(|_| {
        HelpError::InvalidFormat(format!("{} has negative size {}", section, size))
    })
}

/// Reads `topic_count + 1` offsets into the topic text section.
pub fn read_topic_index<R: Read>(reader: &mut R, topic_count: u16) -> Result<Vec<i32>> {
    let mut offsets = Vec::with_capacity(topic_count as usize + 1);
    for _ in 0..=topic_count {
        offsets.push(reader.read_i32::<LittleEndian>()?);
    }
    trace!("Topic index: {:?}", offsets);
    Ok(offsets)
}

/// Reads `context_count` NUL-terminated strings.
///
/// The section has no other terminator, so the context map must start right
/// after the last string.
pub fn read_context_strings<R: BufRead>(reader: &mut R, context_count: u16) -> Result<Vec<String>> {
    let mut strings = Vec::with_capacity(context_count as usize);
    let mut buf = Vec::new();
    for _ in 0..context_count {
        buf.clear();
        reader.read_until(0, &mut buf)?;
        if buf.pop() != Some(0) {
            return Err(HelpError::CountMismatch {
                item_type: "context strings",
                expected: context_count as u64,
                found: strings.len() as u64,
            });
        }
        strings.push(String::from_utf8_lossy(&buf).into_owned());
    }
    debug!("Read {} context strings", strings.len());
    Ok(strings)
}

/// Reads the topic index of each context string.
pub fn read_context_map<R: Read>(reader: &mut R, context_count: u16) -> Result<Vec<u16>> {
    let mut map = vec![0u16; context_count as usize];
    reader.read_u16_into::<LittleEndian>(&mut map)?;
    Ok(map)
}

/// Reads length-prefixed dictionary entries filling the whole section.
///
/// An entry running past the end of the section means the Huffman tree
/// cannot start where the header says it does.
pub fn read_dictionary<R: Read>(reader: &mut R, header: &FileHeader) -> Result<Dictionary> {
    let size = declared_size(header, Section::Dictionary, Section::HuffmanTree)?;
    let mut data = Vec::with_capacity(size.min(u16::MAX as usize));
    reader.take(size as u64).read_to_end(&mut data)?;
    if data.len() != size {
        return Err(HelpError::SectionOffsetMismatch {
            section: Section::HuffmanTree,
            expected: header.offsets.huffman_tree as i64,
            found: header.offsets.dictionary as i64 + data.len() as i64,
        });
    }

    let mut entries = Vec::new();
    let mut rest = &data[..];
    while let Some((&len, tail)) = rest.split_first() {
        let len = len as usize;
        if tail.len() < len {
            return Err(HelpError::SectionOffsetMismatch {
                section: Section::HuffmanTree,
                expected: header.offsets.huffman_tree as i64,
                found: header.offsets.huffman_tree as i64 + (len - tail.len()) as i64,
            });
        }
        entries.push(tail[..len].to_vec());
        rest = &tail[len..];
    }

    if entries.len() > MAX_DICTIONARY_ENTRIES {
        return Err(HelpError::CountMismatch {
            item_type: "dictionary entries",
            expected: MAX_DICTIONARY_ENTRIES as u64,
            found: entries.len() as u64,
        });
    }
    debug!("Read {} dictionary entries ({} bytes)", entries.len(), size);
    Ok(Dictionary::new(entries))
}

/// Reads the Huffman tree up to its zero terminator.
///
/// A Huffman section of size zero means topics are not Huffman-compressed.
/// The caller checks that the topic text starts right after the terminator.
pub fn read_huffman_tree<R: Read>(
    reader: &mut R,
    header: &FileHeader,
) -> Result<Option<HuffmanTree>> {
    if header.offsets.huffman_tree == header.offsets.topic_text {
        debug!("No Huffman tree; topics use keyword compression only");
        return Ok(None);
    }
    let tree = HuffmanTree::deserialize(reader)?;
    debug!("Huffman tree with {} symbols", tree.symbol_count());
    Ok(Some(tree))
}
