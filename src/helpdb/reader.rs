use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::{debug, info, trace, warn};

use super::codec::graphic437;
use super::format::topic::TopicDecoder;
use super::format::{header, sections};
use super::types::database::HelpDatabase;
use super::types::error::{HelpError, Result};
use super::types::models::{FileHeader, LoadOptions, Section, TopicError};
use super::utils::PositionedReader;

/// A database together with the topics that failed to decode.
#[derive(Debug)]
pub struct LoadedDatabase {
    pub database: HelpDatabase,
    pub errors: Vec<TopicError>,
}

/// Loads help databases from `.hlp` files or any byte stream.
///
/// Corruption of the header or of any section before the topic text is a
/// hard error for the whole database. Topics that fail to decode are kept
/// with whatever lines were recovered and reported in
/// [`LoadedDatabase::errors`].
#[derive(Debug, Default, Clone)]
pub struct HelpReader {
    options: LoadOptions,
}

impl HelpReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Loads every database in the file at `path`.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be opened or read
    /// - A database header or section is corrupted
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Vec<LoadedDatabase>> {
        let path = path.as_ref();
        info!("Opening help file: {}", path.display());
        let file = File::open(path)?;
        let mut databases = self.load_all(file)?;
        for loaded in &mut databases {
            loaded.database.file_name = Some(path.display().to_string());
        }
        Ok(databases)
    }

    /// Loads consecutive databases until the end of `reader`.
    pub fn load_all<R: Read>(&self, reader: R) -> Result<Vec<LoadedDatabase>> {
        let mut reader = BufReader::new(reader);
        let mut databases = Vec::new();
        while !reader.fill_buf()?.is_empty() {
            databases.push(self.load_next(&mut reader)?);
        }
        info!("Loaded {} database(s)", databases.len());
        Ok(databases)
    }

    /// Loads one database starting at the current position of `reader`.
    ///
    /// On success the reader is left at the first byte after the database,
    /// where the next database of a concatenated file begins.
    pub fn load_next<R: BufRead>(&self, reader: &mut R) -> Result<LoadedDatabase> {
        let mut reader = PositionedReader::new(reader);

        // Step 1: Header
        let header = header::parse(&mut reader)?;

        // Step 2: Sections, each checked against its declared offset
        sections::expect_offset(&reader, &header, Section::TopicIndex)?;
        let topic_offsets = sections::read_topic_index(&mut reader, header.topic_count)?;

        sections::expect_offset(&reader, &header, Section::ContextStrings)?;
        let context_strings = sections::read_context_strings(&mut reader, header.context_count)?;

        sections::expect_offset(&reader, &header, Section::ContextMap)?;
        let context_map = sections::read_context_map(&mut reader, header.context_count)?;

        sections::expect_offset(&reader, &header, Section::Dictionary)?;
        let dictionary = sections::read_dictionary(&mut reader, &header)?;

        sections::expect_offset(&reader, &header, Section::HuffmanTree)?;
        let tree = sections::read_huffman_tree(&mut reader, &header)?;

        sections::expect_offset(&reader, &header, Section::TopicText)?;

        // Step 3: Database structure
        let mut database = self.new_database(&header);
        for _ in 0..header.topic_count {
            database.new_topic();
        }
        for (context, &topic_index) in context_strings.iter().zip(&context_map) {
            if topic_index >= header.topic_count {
                warn!(
                    "Context '{}' refers to topic {} of {}",
                    context, topic_index, header.topic_count
                );
            }
            database.add_context(context.as_str(), topic_index as usize);
        }

        // Step 4: Topics
        let decoder = TopicDecoder::new(tree.as_ref(), &dictionary, database.control_character)
            .process_commands(self.options.process_commands)
            .keep_source(self.options.keep_source);
        let mut errors = Vec::new();
        let mut truncated = false;

        for (topic_index, bounds) in topic_offsets.windows(2).enumerate() {
            let length = bounds[1] - bounds[0];
            let length = usize::try_from(length).map_err(|_| {
                HelpError::InvalidFormat(format!("Topic {} has negative length {}", topic_index, length))
            })?;

            let mut problems = Vec::new();
            let input = reader.read_up_to(length)?;
            if input.len() != length {
                truncated = true;
                problems.push(format!(
                    "Compressed topic size mismatch: expecting {} bytes, got {} bytes",
                    length,
                    input.len()
                ));
            }

            let Some(topic) = database.topic_mut(topic_index) else {
                break;
            };
            if let Err(e) = decoder.decode(&input, topic, &mut problems) {
                problems.push(e.to_string());
            }
            trace!("Topic {}: {} lines", topic_index, topic.lines.len());

            if !problems.is_empty() {
                warn!("Topic {} failed to decode: {}", topic_index, problems.join("; "));
                errors.push(TopicError {
                    topic_index,
                    input,
                    message: problems.join("; "),
                });
            }
        }

        // Step 5: Move to the end of the database
        if !truncated {
            let end = header.offsets.database_size as i64;
            let position = reader.position() as i64;
            if position > end {
                return Err(HelpError::SectionOffsetMismatch {
                    section: Section::DatabaseEnd,
                    expected: end,
                    found: position,
                });
            }
            let padding = (end - position) as u64;
            let skipped = reader.skip(padding)?;
            if skipped != padding {
                return Err(HelpError::SectionOffsetMismatch {
                    section: Section::DatabaseEnd,
                    expected: end,
                    found: position + skipped as i64,
                });
            }
            if padding > 0 {
                debug!("Skipped {} bytes after the last topic", padding);
            }
        }

        info!(
            "Loaded database '{}': {} topics, {} contexts, {} topic errors",
            database.name(),
            database.topics().len(),
            database.context_count(),
            errors.len()
        );
        Ok(LoadedDatabase { database, errors })
    }

    fn new_database(&self, header: &FileHeader) -> HelpDatabase {
        let mut database =
            HelpDatabase::new(header.database_name.as_str(), header.attributes.case_sensitive);
        database.display_width = header.display_width;
        database.locked = header.attributes.locked;
        database.control_character = self.options.control_character.unwrap_or(
            match header.control_character {
                0 => ':',
                b => graphic437::to_char(b),
            },
        );
        database
    }
}
