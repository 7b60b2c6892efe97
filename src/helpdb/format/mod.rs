//! File format parsing layer for help databases.
//!
//! This module sits between raw I/O and the collaborator-facing
//! [`HelpReader`](crate::helpdb::reader::HelpReader).
//!
//! # Module Organization
//!
//! - [`header`]: The fixed 0x46-byte header and section offset table
//! - [`sections`]: Topic index, context strings, context map, dictionary
//!   and Huffman tree
//! - [`topic`]: Topic decompression and the line record parser
//! - [`command`]: Dot and colon commands embedded in topic text

pub mod command;
pub mod header;
pub mod sections;
pub mod topic;
