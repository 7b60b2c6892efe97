//! Custom error types for the quickhelp-reader crate.

use thiserror::Error;

use super::models::Section;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum HelpError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The first two bytes of a database are not the `LN` magic.
    #[error("File signature mismatch: expected 0x4e4c, found {found:#06x}")]
    SignatureMismatch { found: u16 },

    /// A section does not start where the header says it does.
    #[error("Offset mismatch for {section}: header declares {expected:#x}, but the section starts at {found:#x}")]
    SectionOffsetMismatch {
        section: Section,
        expected: i64,
        found: i64,
    },

    /// A declared count of items does not match the actual number of items found.
    #[error("Count mismatch for {item_type}: expected {expected}, but found {found}")]
    CountMismatch {
        item_type: &'static str,
        expected: u64,
        found: u64,
    },

    /// A buffer or data block has an unexpected size after an operation.
    #[error("Size mismatch for {context}: expected {expected} bytes, but found {found} bytes")]
    SizeMismatch {
        context: &'static str,
        expected: u64,
        found: u64,
    },

    /// The serialized Huffman tree is not a proper binary tree.
    #[error("Invalid Huffman tree: {0}")]
    InvalidHuffmanTree(String),

    /// A symbol was requested from a tree that encodes no symbols.
    #[error("Cannot decode a symbol with an empty Huffman tree")]
    EmptyHuffmanTree,

    /// A keyword token refers past the end of the dictionary.
    #[error("Dictionary index {index} is out of range ({len} entries)")]
    DictionaryIndexOutOfRange { index: usize, len: usize },

    /// A record ended before a required field could be read.
    #[error("Unexpected end of data while reading {0}")]
    UnexpectedEof(&'static str),

    /// A style byte has bits other than bold, italic and underline set.
    #[error("Invalid text attribute byte {0:#04x}")]
    InvalidTextAttribute(u8),

    /// A hyperlink column range is empty or starts at column zero.
    #[error("Invalid link location: columns {start}..={end}")]
    InvalidLinkLocation { start: u8, end: u8 },

    /// A database with the same name is already part of the help system.
    #[error("A database named '{0}' is already loaded")]
    DuplicateDatabase(String),

    /// The data is structurally invalid in some other way.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl HelpError {
    /// Returns `true` for errors that invalidate the whole database rather
    /// than a single topic.
    ///
    /// Structural errors come from the header and section reads and abort a
    /// load. Errors raised while decoding a topic never do; they are reported
    /// against that topic and loading continues.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            HelpError::Io(_)
                | HelpError::SignatureMismatch { .. }
                | HelpError::SectionOffsetMismatch { .. }
                | HelpError::CountMismatch { .. }
                | HelpError::InvalidHuffmanTree(_)
        )
    }
}

/// A convenience `Result` type alias using the crate's `HelpError` type.
pub type Result<T> = std::result::Result<T, HelpError>;
