//! # quickhelp-reader
//!
//! A reader for QuickHelp (`.hlp`) help databases, the compressed help
//! format of the Microsoft DOS development tools.
//!
//! Topics are decoded into lines of styled text with embedded hyperlinks,
//! and links can be resolved across several loaded databases with a
//! [`HelpSystem`].
pub mod helpdb;

// Re-export the main types for convenience
pub use helpdb::{
    HelpDatabase, HelpError, HelpReader, HelpSystem, LoadedDatabase, Result, TopicRef,
    types::{
        models::{LoadOptions, TopicError},
        topic::{Line, LinkSpan, Snippet, TextAttribute, TextStyle, Topic},
        uri::{HelpUri, UriKind},
    },
};
