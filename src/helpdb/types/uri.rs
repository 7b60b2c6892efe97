//! Hyperlink targets.
//!
//! A target string takes one of these forms, checked in this order:
//!
//! ```text
//! @Lxxxx          topic index (xxxx & 0x7FFF) in the local database
//! @context        context string resolved in the local database only
//! !command        application command
//! filename!       a whole file displayed as one topic
//! db!context      context string resolved in the named database only
//! context         context string, local database first, then all others
//! ```

use std::fmt;

use super::error::{HelpError, Result};

/// Classification of a [`HelpUri`] target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UriKind {
    None,
    Command,
    LocalTopic,
    LocalContext,
    GlobalContext,
    Context,
    File,
}

/// A location within a help system.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HelpUri {
    target: String,
}

impl HelpUri {
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into() }
    }

    /// Builds an `@Lxxxx` target for a topic in the local database.
    pub fn from_topic_index(topic_index: u16) -> Result<Self> {
        if topic_index >= 0x8000 {
            return Err(HelpError::InvalidFormat(format!(
                "Topic index {} does not fit in a local topic link",
                topic_index
            )));
        }
        Ok(Self::from_encoded_index(topic_index | 0x8000))
    }

    /// Builds a target from the raw 16-bit value stored in a hyperlink record.
    pub(crate) fn from_encoded_index(value: u16) -> Self {
        Self {
            target: format!("@L{:04X}", value),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn kind(&self) -> UriKind {
        let t = self.target.as_str();
        if t.is_empty() {
            UriKind::None
        } else if t.starts_with('@') {
            if self.topic_index().is_some() {
                UriKind::LocalTopic
            } else {
                UriKind::LocalContext
            }
        } else if t.starts_with('!') {
            UriKind::Command
        } else if t.ends_with('!') {
            UriKind::File
        } else if t.contains('!') {
            UriKind::GlobalContext
        } else {
            UriKind::Context
        }
    }

    /// The topic index of an `@Lxxxx` target with the high bit set.
    pub fn topic_index(&self) -> Option<usize> {
        let hex = self.target.strip_prefix("@L")?;
        if hex.len() != 4 {
            return None;
        }
        let value = u16::from_str_radix(hex, 16).ok()?;
        (value & 0x8000 != 0).then_some((value & 0x7FFF) as usize)
    }

    /// The text before the first `!`, if it is not empty.
    pub fn database_name(&self) -> Option<&str> {
        match self.target.find('!') {
            Some(k) if k > 0 => Some(&self.target[..k]),
            _ => None,
        }
    }

    /// The text after the first `!`, or the whole target without one.
    pub fn context_string(&self) -> &str {
        match self.target.find('!') {
            Some(k) => &self.target[k + 1..],
            None => &self.target,
        }
    }
}

impl fmt::Display for HelpUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.target)
    }
}

impl From<&str> for HelpUri {
    fn from(target: &str) -> Self {
        Self::new(target)
    }
}

impl From<String> for HelpUri {
    fn from(target: String) -> Self {
        Self::new(target)
    }
}
