//! Decoded topic content: lines of styled text with embedded hyperlinks.

use std::fmt;
use std::sync::Arc;

use super::error::{HelpError, Result};
use super::uri::HelpUri;

/// Character style bits of a text attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TextStyle {
    pub const PLAIN: TextStyle = TextStyle {
        bold: false,
        italic: false,
        underline: false,
    };

    /// Decodes a style byte. Only the low three bits may be set.
    pub fn from_bits(bits: u8) -> Result<Self> {
        if bits & 0xF8 != 0 {
            return Err(HelpError::InvalidTextAttribute(bits));
        }
        Ok(Self {
            bold: bits & 0x01 != 0,
            italic: bits & 0x02 != 0,
            underline: bits & 0x04 != 0,
        })
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::PLAIN
    }
}

/// Style and optional hyperlink of one character.
///
/// All characters of one hyperlink span share the same `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextAttribute {
    pub style: TextStyle,
    pub link: Option<Arc<HelpUri>>,
}

/// One line of a topic. Text and attributes always have the same length,
/// counted in characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    text: String,
    attributes: Vec<TextAttribute>,
}

impl Line {
    pub fn new(text: impl Into<String>, attributes: Vec<TextAttribute>) -> Result<Self> {
        let text = text.into();
        let len = text.chars().count();
        if len != attributes.len() {
            return Err(HelpError::SizeMismatch {
                context: "line attributes",
                expected: len as u64,
                found: attributes.len() as u64,
            });
        }
        Ok(Self { text, attributes })
    }

    /// A line with every character in the default style.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        let attributes = vec![TextAttribute::default(); text.chars().count()];
        Self { text, attributes }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attributes(&self) -> &[TextAttribute] {
        &self.attributes
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterates over the hyperlink spans of this line, once per span.
    pub fn links(&self) -> Links<'_> {
        Links {
            attributes: &self.attributes,
            pos: 0,
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A run of characters sharing one hyperlink; `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSpan<'a> {
    pub start: usize,
    pub end: usize,
    pub uri: &'a HelpUri,
}

/// Iterator returned by [`Line::links`].
pub struct Links<'a> {
    attributes: &'a [TextAttribute],
    pos: usize,
}

impl<'a> Iterator for Links<'a> {
    type Item = LinkSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let attributes = self.attributes;
        while self.pos < attributes.len() {
            let start = self.pos;
            self.pos += 1;
            let Some(link) = &attributes[start].link else {
                continue;
            };
            while self.pos < attributes.len()
                && attributes[self.pos]
                    .link
                    .as_ref()
                    .is_some_and(|l| Arc::ptr_eq(l, link))
            {
                self.pos += 1;
            }
            return Some(LinkSpan {
                start,
                end: self.pos,
                uri: link.as_ref(),
            });
        }
        None
    }
}

/// Assembles a [`Line`] while its attribute block is being parsed.
#[derive(Debug)]
pub struct LineBuilder {
    text: String,
    attributes: Vec<TextAttribute>,
}

impl LineBuilder {
    pub fn new(text: impl Into<String>) -> Self {
        let line = Line::plain(text);
        Self {
            text: line.text,
            attributes: line.attributes,
        }
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Applies `style` to characters `start..end`, clamped to the line.
    pub fn set_style(&mut self, start: usize, end: usize, style: TextStyle) {
        let end = end.min(self.attributes.len());
        for attr in self.attributes.iter_mut().take(end).skip(start) {
            attr.style = style;
        }
    }

    /// Links characters `start..end`, clamped to the line.
    pub fn set_link(&mut self, start: usize, end: usize, uri: HelpUri) {
        let end = end.min(self.attributes.len());
        let link = Arc::new(uri);
        for attr in self.attributes.iter_mut().take(end).skip(start) {
            attr.link = Some(Arc::clone(&link));
        }
    }

    pub fn build(self) -> Line {
        Line {
            text: self.text,
            attributes: self.attributes,
        }
    }
}

/// A named range of lines marked with `.paste` and `.end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// One navigable page of help.
///
/// A topic has no stored index; its index is its position in the owning
/// database's topic list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topic {
    pub title: Option<String>,
    pub lines: Vec<Line>,
    pub hidden: bool,
    pub popup: bool,
    pub raw: bool,
    pub list: bool,
    pub window_height: Option<i32>,
    pub freeze_height: Option<i32>,
    pub category: Option<String>,
    pub execute_command: Option<String>,
    pub predecessor: Option<HelpUri>,
    pub successor: Option<HelpUri>,
    /// Context strings listed by `.ref`.
    pub references: Vec<String>,
    pub snippets: Vec<Snippet>,
    /// Decompressed bytes the lines were parsed from.
    pub source: Option<Vec<u8>>,
}

impl Topic {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => f.write_str(title),
            None => f.write_str("(Untitled Topic)"),
        }
    }
}
