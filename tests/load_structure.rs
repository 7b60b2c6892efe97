mod common;

use std::io::Write;

use common::*;
use quickhelp_reader::helpdb::types::models::Section;
use quickhelp_reader::{HelpError, HelpReader};

fn sample() -> DatabaseImage {
    let mut image = DatabaseImage::new("SAMPLE.HLP")
        .topic(&plain_line(b".topic First"))
        .topic(&plain_line(b"Second topic"))
        .context("first", 0)
        .context("second", 1);
    image.dictionary = vec![b"Hello".to_vec(), b"world".to_vec()];
    image
}

fn section_error(image: &[u8]) -> Section {
    match HelpReader::new().load_all(image) {
        Err(HelpError::SectionOffsetMismatch { section, .. }) => section,
        other => panic!("expected a section offset mismatch, got {:?}", other.map(|v| v.len())),
    }
}

#[test]
fn loads_header_fields_and_contexts() {
    let mut image = sample();
    image.case_sensitive = true;
    let loaded = HelpReader::new().load_all(&image.build()[..]).unwrap();
    let db = &loaded[0].database;

    assert_eq!(db.name(), "SAMPLE.HLP");
    assert!(db.is_case_sensitive());
    assert_eq!(db.display_width, 76);
    assert_eq!(db.topics().len(), 2);
    assert_eq!(db.context_count(), 2);
    assert_eq!(db.resolve_context_index("second"), Some(1));
    assert_eq!(db.resolve_context_index("SECOND"), None);
    assert_eq!(db.topic_context(0), vec!["first"]);
    assert_eq!(db.topics()[0].title.as_deref(), Some("First"));
}

#[test]
fn signature_mismatch() {
    let mut image = sample().build();
    image[0] = b'X';
    let err = HelpReader::new().load_all(&image[..]).unwrap_err();
    assert!(matches!(err, HelpError::SignatureMismatch { found: 0x4E58 }));
}

#[test]
fn each_corrupted_offset_names_its_section() {
    let cases = [
        (TOPIC_INDEX_FIELD, 2, Section::TopicIndex),
        (CONTEXT_STRINGS_FIELD, 2, Section::ContextStrings),
        (CONTEXT_MAP_FIELD, 2, Section::ContextMap),
        (CONTEXT_MAP_FIELD, -2, Section::ContextMap),
        (DICTIONARY_FIELD, 2, Section::Dictionary),
        (HUFFMAN_TREE_FIELD, 2, Section::HuffmanTree),
        (TOPIC_TEXT_FIELD, 2, Section::TopicText),
        (TOPIC_TEXT_FIELD, -2, Section::TopicText),
        (DATABASE_SIZE_FIELD, 2, Section::DatabaseEnd),
        (DATABASE_SIZE_FIELD, -2, Section::DatabaseEnd),
    ];
    let pristine = sample().build();
    for (field, delta, section) in cases {
        let mut image = pristine.clone();
        patch_field(&mut image, field, delta);
        assert_eq!(
            section_error(&image),
            section,
            "field {:#x} moved by {}",
            field,
            delta
        );
    }
}

#[test]
fn context_count_larger_than_strings() {
    let mut image = sample().build();
    // Claim a third context; the map then starts inside the dictionary.
    image[0x0A] = 3;
    assert!(HelpReader::new().load_all(&image[..]).is_err());
}

#[test]
fn concatenated_databases_load_in_order() {
    let mut first = sample();
    first.padding = 7;
    let second = DatabaseImage::new("OTHER.HLP").topic(&plain_line(b"other"));

    let mut file = first.build();
    file.extend(second.build());
    let loaded = HelpReader::new().load_all(&file[..]).unwrap();

    let names: Vec<_> = loaded.iter().map(|l| l.database.name()).collect();
    assert_eq!(names, vec!["SAMPLE.HLP", "OTHER.HLP"]);
    assert_eq!(loaded[1].database.topics()[0].lines[0].text(), "other");
    assert!(loaded.iter().all(|l| l.errors.is_empty()));
}

#[test]
fn load_next_stops_at_database_end() {
    let mut file = sample().build();
    let first_len = file.len();
    file.extend(DatabaseImage::new("NEXT.HLP").build());

    let mut reader = &file[..];
    let loaded = HelpReader::new().load_next(&mut reader).unwrap();
    assert_eq!(loaded.database.name(), "SAMPLE.HLP");
    assert_eq!(reader.len(), file.len() - first_len);

    let next = HelpReader::new().load_next(&mut reader).unwrap();
    assert_eq!(next.database.name(), "NEXT.HLP");
    assert!(next.database.topics().is_empty());
    assert!(reader.is_empty());
}

#[test]
fn truncated_topic_text_is_a_topic_error() {
    let mut image = DatabaseImage::new("CUT.HLP")
        .topic(&plain_line(b"complete"))
        .topic(&plain_line(b"this one is cut short"));
    image.huffman = false;
    let mut bytes = image.build();
    bytes.truncate(bytes.len() - 5);

    let loaded = HelpReader::new().load_all(&bytes[..]).unwrap();
    assert_eq!(loaded.len(), 1);
    let loaded = &loaded[0];
    assert_eq!(loaded.database.topics().len(), 2);
    assert_eq!(loaded.database.topics()[0].lines[0].text(), "complete");
    assert_eq!(loaded.errors.len(), 1);
    assert_eq!(loaded.errors[0].topic_index, 1);
    assert!(loaded.errors[0]
        .message
        .contains("Compressed topic size mismatch"));
}

#[test]
fn load_file_records_file_name() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&sample().build()).unwrap();
    file.flush().unwrap();

    let loaded = HelpReader::new().load_file(file.path()).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(
        loaded[0].database.file_name.as_deref(),
        Some(file.path().display().to_string().as_str())
    );
}

#[test]
fn load_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = HelpReader::new()
        .load_file(dir.path().join("missing.hlp"))
        .unwrap_err();
    assert!(matches!(err, HelpError::Io(_)));
}
