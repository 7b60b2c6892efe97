//! Fixed database header parsing.

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, info};

use crate::helpdb::types::error::{HelpError, Result};
use crate::helpdb::types::models::{DatabaseAttributes, FileHeader, SectionOffsets, SIGNATURE};

/// Parses the 0x46-byte header at the start of a database.
///
/// # Header Structure
/// ```text
/// 0x00 [2 bytes]  Signature, "LN"
/// 0x02 [2 bytes]  Reserved
/// 0x04 [2 bytes]  Attributes (0x01 case-sensitive, 0x02 locked)
/// 0x06 [1 byte]   Control character
/// 0x07 [1 byte]   Reserved
/// 0x08 [2 bytes]  Topic count
/// 0x0A [2 bytes]  Context count
/// 0x0C [1 byte]   Display width
/// 0x0D [1 byte]   Reserved
/// 0x0E [2 bytes]  Reserved
/// 0x10 [14 bytes] Database name, NUL-padded
/// 0x1E [4 bytes]  Reserved
/// 0x22 [4 bytes]  Topic index offset
/// 0x26 [4 bytes]  Context strings offset
/// 0x2A [4 bytes]  Context map offset
/// 0x2E [4 bytes]  Dictionary offset
/// 0x32 [4 bytes]  Huffman tree offset
/// 0x36 [4 bytes]  Topic text offset
/// 0x3A [8 bytes]  Reserved
/// 0x42 [4 bytes]  Database size
/// ```
/// All integers are little-endian.
pub fn parse<R: Read>(reader: &mut R) -> Result<FileHeader> {
    // Step 1: Signature
    let signature = reader.read_u16::<LittleEndian>()?;
    if signature != SIGNATURE {
        return Err(HelpError::SignatureMismatch { found: signature });
    }
    let _reserved = reader.read_u16::<LittleEndian>()?;

    // Step 2: Attributes and counts
    let attributes = DatabaseAttributes::from(reader.read_u16::<LittleEndian>()?);
    let control_character = reader.read_u8()?;
    let _reserved = reader.read_u8()?;
    let topic_count = reader.read_u16::<LittleEndian>()?;
    let context_count = reader.read_u16::<LittleEndian>()?;
    let display_width = reader.read_u8()?;
    let _reserved = reader.read_u8()?;
    let _reserved = reader.read_u16::<LittleEndian>()?;

    // Step 3: Database name
    let mut name = [0u8; 14];
    reader.read_exact(&mut name)?;
    let name_len = name.iter().position(|&b| b == 0).unwrap_or(name.len());
    let database_name = String::from_utf8_lossy(&name[..name_len]).into_owned();

    // Step 4: Section offsets
    let _reserved = reader.read_i32::<LittleEndian>()?;
    let topic_index = reader.read_i32::<LittleEndian>()?;
    let context_strings = reader.read_i32::<LittleEndian>()?;
    let context_map = reader.read_i32::<LittleEndian>()?;
    let dictionary = reader.read_i32::<LittleEndian>()?;
    let huffman_tree = reader.read_i32::<LittleEndian>()?;
    let topic_text = reader.read_i32::<LittleEndian>()?;
    let _reserved = reader.read_i32::<LittleEndian>()?;
    let _reserved = reader.read_i32::<LittleEndian>()?;
    let database_size = reader.read_i32::<LittleEndian>()?;

    let offsets = SectionOffsets {
        topic_index,
        context_strings,
        context_map,
        dictionary,
        huffman_tree,
        topic_text,
        database_size,
    };
    debug!("Section offsets: {:?}", offsets);

    info!(
        "Header parsed: name='{}', topics={}, contexts={}, case_sensitive={}, locked={}",
        database_name, topic_count, context_count, attributes.case_sensitive, attributes.locked
    );

    Ok(FileHeader {
        attributes,
        control_character,
        topic_count,
        context_count,
        display_width,
        database_name,
        offsets,
    })
}
