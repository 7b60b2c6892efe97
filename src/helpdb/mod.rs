//! Core QuickHelp database reader module

pub mod codec;
pub mod format;
pub mod reader;
pub mod types;
pub mod utils;

pub use reader::{HelpReader, LoadedDatabase};
pub use types::database::HelpDatabase;
pub use types::error::{HelpError, Result};
pub use types::system::{HelpSystem, TopicRef};
