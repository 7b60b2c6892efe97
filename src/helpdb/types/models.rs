//! Core data structures for the physical layout of a help database.
//!
//! This module defines the types shared by the format parsers:
//! - The fixed file header and its section offset table
//! - Section identifiers used in diagnostics
//! - The keyword dictionary
//! - Loader options and per-topic diagnostics

use std::fmt;

/// Magic value stored in the first two bytes of every database ("LN").
pub const SIGNATURE: u16 = 0x4E4C;

/// Size of the fixed header; the topic index always starts here.
pub const HEADER_SIZE: usize = 0x46;

/// Largest number of entries a keyword dictionary can address (10-bit index).
pub const MAX_DICTIONARY_ENTRIES: usize = 1024;

/// Identifies one region of a help database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    TopicIndex,
    ContextStrings,
    ContextMap,
    Dictionary,
    HuffmanTree,
    TopicText,
    DatabaseEnd,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::TopicIndex => "topic index",
            Section::ContextStrings => "context strings",
            Section::ContextMap => "context map",
            Section::Dictionary => "keyword dictionary",
            Section::HuffmanTree => "Huffman tree",
            Section::TopicText => "topic text",
            Section::DatabaseEnd => "end of database",
        };
        f.write_str(name)
    }
}

/// Attribute bits stored in the header.
///
/// - Bit 0x0001: context strings are case-sensitive
/// - Bit 0x0002: the database is locked against decompilation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatabaseAttributes {
    pub case_sensitive: bool,
    pub locked: bool,
}

impl From<u16> for DatabaseAttributes {
    fn from(bits: u16) -> Self {
        Self {
            case_sensitive: bits & 0x0001 != 0,
            locked: bits & 0x0002 != 0,
        }
    }
}

/// Byte offsets of every section, relative to the start of the database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionOffsets {
    pub topic_index: i32,
    pub context_strings: i32,
    pub context_map: i32,
    pub dictionary: i32,
    pub huffman_tree: i32,
    pub topic_text: i32,
    pub database_size: i32,
}

impl SectionOffsets {
    /// Returns the declared start of `section`.
    pub fn start_of(&self, section: Section) -> i32 {
        match section {
            Section::TopicIndex => self.topic_index,
            Section::ContextStrings => self.context_strings,
            Section::ContextMap => self.context_map,
            Section::Dictionary => self.dictionary,
            Section::HuffmanTree => self.huffman_tree,
            Section::TopicText => self.topic_text,
            Section::DatabaseEnd => self.database_size,
        }
    }
}

/// The fixed-size header at the start of each database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub attributes: DatabaseAttributes,
    /// Raw control character byte; zero means the default `:`.
    pub control_character: u8,
    pub topic_count: u16,
    pub context_count: u16,
    pub display_width: u8,
    /// Database name, truncated at the first NUL.
    pub database_name: String,
    pub offsets: SectionOffsets,
}

/// The keyword table used by the substitution layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: Vec<Vec<u8>>,
}

impl Dictionary {
    pub fn new(entries: Vec<Vec<u8>>) -> Self {
        Self { entries }
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.entries.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.iter().map(Vec::as_slice)
    }
}

/// A topic that failed to decode.
///
/// The topic itself stays in the database with whatever lines were
/// recovered before the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicError {
    pub topic_index: usize,
    /// The compressed bytes of the topic as stored in the file.
    pub input: Vec<u8>,
    pub message: String,
}

impl fmt::Display for TopicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "topic {}: {}", self.topic_index, self.message)
    }
}

/// Options that control how databases are loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub control_character: Option<char>,
    pub keep_source: bool,
    pub process_commands: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            control_character: None,
            keep_source: true,
            process_commands: true,
        }
    }
}

impl LoadOptions {
    /// Overrides the control character declared in the header.
    pub fn control_character(mut self, c: char) -> Self {
        self.control_character = Some(c);
        self
    }

    /// Whether to keep each topic's decompressed bytes.
    pub fn keep_source(mut self, keep: bool) -> Self {
        self.keep_source = keep;
        self
    }

    /// When disabled, command lines are kept as visible text.
    pub fn process_commands(mut self, process: bool) -> Self {
        self.process_commands = process;
        self
    }
}
