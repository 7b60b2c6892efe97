//! Test-only writer for synthetic `.hlp` images.
#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};

/// Field positions of the section offsets in the header.
pub const TOPIC_INDEX_FIELD: usize = 0x22;
pub const CONTEXT_STRINGS_FIELD: usize = 0x26;
pub const CONTEXT_MAP_FIELD: usize = 0x2A;
pub const DICTIONARY_FIELD: usize = 0x2E;
pub const HUFFMAN_TREE_FIELD: usize = 0x32;
pub const TOPIC_TEXT_FIELD: usize = 0x36;
pub const DATABASE_SIZE_FIELD: usize = 0x42;

/// Serialized Huffman tree plus the bit code of every symbol.
pub struct HuffmanCodes {
    pub values: Vec<i16>,
    pub codes: HashMap<u8, Vec<bool>>,
}

/// Builds a balanced tree over `symbols`. The one-bit subtree of each
/// internal node is stored right after it; the zero-bit subtree follows.
pub fn huffman_codes(symbols: &[u8]) -> HuffmanCodes {
    let mut out = HuffmanCodes {
        values: Vec::new(),
        codes: HashMap::new(),
    };
    if !symbols.is_empty() {
        emit(symbols, Vec::new(), &mut out);
    }
    out
}

fn emit(symbols: &[u8], prefix: Vec<bool>, out: &mut HuffmanCodes) {
    let index = out.values.len();
    out.values.push(0);
    if let [symbol] = symbols {
        out.values[index] = (0x8000u16 | *symbol as u16) as i16;
        out.codes.insert(*symbol, prefix);
        return;
    }
    let (zero, one) = symbols.split_at(symbols.len() / 2);
    let mut one_prefix = prefix.clone();
    one_prefix.push(true);
    emit(one, one_prefix, out);

    out.values[index] = (out.values.len() * 2) as i16;
    let mut zero_prefix = prefix;
    zero_prefix.push(false);
    emit(zero, zero_prefix, out);
}

impl HuffmanCodes {
    /// Serialized node values including the zero terminator.
    pub fn serialize(&self) -> Vec<u8> {
        self.values
            .iter()
            .chain(std::iter::once(&0))
            .flat_map(|v| v.to_le_bytes())
            .collect()
    }

    /// Packs the codes of `data` MSB-first, padding the last byte with zeros.
    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        let mut writer = BitWriter::default();
        for b in data {
            for &bit in &self.codes[b] {
                writer.push(bit);
            }
        }
        writer.finish()
    }
}

#[derive(Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    used: u8,
}

impl BitWriter {
    pub fn push(&mut self, bit: bool) {
        if self.used == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 0x80 >> self.used;
            }
        }
        self.used = (self.used + 1) % 8;
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// Prefixes keyword control bytes so they pass through literally.
pub fn escape(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for &b in data {
        if (0x10..=0x1A).contains(&b) {
            out.push(0x1A);
        }
        out.push(b);
    }
    out
}

/// Encodes one line record.
pub fn line(text: &[u8], attrs: &[u8]) -> Vec<u8> {
    let mut out = vec![text.len() as u8 + 1];
    out.extend_from_slice(text);
    out.push(attrs.len() as u8 + 1);
    out.extend_from_slice(attrs);
    out
}

/// An unstyled line without links.
pub fn plain_line(text: &[u8]) -> Vec<u8> {
    line(text, &[text.len() as u8])
}

/// One topic as it goes into the image.
#[derive(Clone)]
pub struct TopicSpec {
    /// Keyword-layer tokens.
    pub tokens: Vec<u8>,
    /// Declared decompressed size.
    pub size: u16,
}

impl TopicSpec {
    /// A topic whose decompressed text is exactly `records`.
    pub fn from_records(records: &[u8]) -> Self {
        Self {
            tokens: escape(records),
            size: records.len() as u16,
        }
    }
}

pub struct DatabaseImage {
    pub name: String,
    pub case_sensitive: bool,
    pub control_character: u8,
    pub contexts: Vec<(String, u16)>,
    pub dictionary: Vec<Vec<u8>>,
    pub huffman: bool,
    pub topics: Vec<TopicSpec>,
    /// Extra bytes after the last topic, included in the database size.
    pub padding: usize,
}

impl DatabaseImage {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            case_sensitive: false,
            control_character: b':',
            contexts: Vec::new(),
            dictionary: Vec::new(),
            huffman: true,
            topics: Vec::new(),
            padding: 0,
        }
    }

    pub fn topic(mut self, records: &[u8]) -> Self {
        self.topics.push(TopicSpec::from_records(records));
        self
    }

    pub fn context(mut self, context: &str, topic: u16) -> Self {
        self.contexts.push((context.to_string(), topic));
        self
    }

    /// Tree over every symbol used by the topics. At least two symbols are
    /// included so the tree is never singular.
    pub fn codes(&self) -> HuffmanCodes {
        let mut symbols: BTreeSet<u8> = self
            .topics
            .iter()
            .flat_map(|t| t.tokens.iter().copied())
            .collect();
        symbols.insert(0);
        symbols.insert(b' ');
        let symbols: Vec<u8> = symbols.into_iter().collect();
        huffman_codes(&symbols)
    }

    pub fn build(&self) -> Vec<u8> {
        let codes = self.huffman.then(|| self.codes());

        let topic_index_len = 4 * (self.topics.len() + 1);
        let mut context_strings = Vec::new();
        for (context, _) in &self.contexts {
            context_strings.extend_from_slice(context.as_bytes());
            context_strings.push(0);
        }
        let mut context_map = Vec::new();
        for (_, topic) in &self.contexts {
            context_map.extend_from_slice(&topic.to_le_bytes());
        }
        let mut dictionary = Vec::new();
        for entry in &self.dictionary {
            dictionary.push(entry.len() as u8);
            dictionary.extend_from_slice(entry);
        }
        let tree = codes.as_ref().map(HuffmanCodes::serialize).unwrap_or_default();

        let mut blobs = Vec::new();
        for topic in &self.topics {
            let mut blob = topic.size.to_le_bytes().to_vec();
            match &codes {
                Some(codes) => blob.extend(codes.encode(&topic.tokens)),
                None => blob.extend_from_slice(&topic.tokens),
            }
            blobs.push(blob);
        }

        let topic_index = 0x46;
        let strings_offset = topic_index + topic_index_len;
        let map_offset = strings_offset + context_strings.len();
        let dictionary_offset = map_offset + context_map.len();
        let huffman_offset = dictionary_offset + dictionary.len();
        let text_offset = huffman_offset + tree.len();
        let text_len: usize = blobs.iter().map(Vec::len).sum();
        let database_size = text_offset + text_len + self.padding;

        let mut out = Vec::with_capacity(database_size);
        out.extend_from_slice(b"LN");
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(&(self.case_sensitive as u16).to_le_bytes());
        out.push(self.control_character);
        out.push(0);
        out.extend_from_slice(&(self.topics.len() as u16).to_le_bytes());
        out.extend_from_slice(&(self.contexts.len() as u16).to_le_bytes());
        out.push(76);
        out.push(0);
        out.extend_from_slice(&[0, 0]);
        let mut name = [0u8; 14];
        name[..self.name.len()].copy_from_slice(self.name.as_bytes());
        out.extend_from_slice(&name);
        for v in [
            0,
            topic_index,
            strings_offset,
            map_offset,
            dictionary_offset,
            huffman_offset,
            text_offset,
            0,
            0,
            database_size,
        ] {
            out.extend_from_slice(&(v as i32).to_le_bytes());
        }
        assert_eq!(out.len(), 0x46);

        let mut offset = text_offset;
        for blob in &blobs {
            out.extend_from_slice(&(offset as i32).to_le_bytes());
            offset += blob.len();
        }
        out.extend_from_slice(&(offset as i32).to_le_bytes());
        out.extend(context_strings);
        out.extend(context_map);
        out.extend(dictionary);
        out.extend(tree);
        for blob in blobs {
            out.extend(blob);
        }
        out.resize(database_size, 0);
        out
    }
}

/// Byte range of topic `index`'s compressed blob within `image`.
pub fn topic_range(image: &[u8], index: usize) -> std::ops::Range<usize> {
    let entry = |i: usize| {
        let at = 0x46 + 4 * i;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&image[at..at + 4]);
        i32::from_le_bytes(raw) as usize
    };
    entry(index)..entry(index + 1)
}

/// Adds `delta` to the i32 header field at `field`.
pub fn patch_field(image: &mut [u8], field: usize, delta: i32) {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&image[field..field + 4]);
    let value = i32::from_le_bytes(raw) + delta;
    image[field..field + 4].copy_from_slice(&value.to_le_bytes());
}
