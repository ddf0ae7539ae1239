use std::fs;
use std::io::Write;
use tempfile::TempDir;

use ragdoc_core::chunker::{split, Chunker, ChunkingConfig};
use ragdoc_core::source::{InMemorySource, TextFileSource};
use ragdoc_core::tokenize::tokenize;
use ragdoc_core::traits::DocumentSource;
use ragdoc_core::types::{meta_keys, MetaValue};
use ragdoc_core::ErrorKind;

fn long_text() -> String {
    let mut text = String::new();
    for p in 0..6 {
        for s in 0..8 {
            text.push_str(&format!("Paragraph {p} sentence {s} talks about rivers and mountains. "));
        }
        text.push_str("\n\n");
    }
    text
}

fn start_of(chunk: &ragdoc_core::types::Chunk) -> usize {
    match chunk.metadata.get(meta_keys::START) {
        Some(MetaValue::Int(v)) => usize::try_from(*v).expect("non-negative start"),
        other => panic!("missing start metadata: {other:?}"),
    }
}

#[test]
fn short_text_becomes_single_chunk() {
    let chunks = split("Short text", 100, 10);
    assert_eq!(chunks.len(), 1, "one small paragraph becomes one chunk");
    assert_eq!(chunks[0].text, "Short text");
    assert_eq!(chunks[0].index(), Some(0));
}

#[test]
fn blank_text_yields_no_chunks() {
    assert!(split("   \n\n  \n", 100, 10).is_empty());
}

#[test]
fn cat_and_dog_split_on_sentence_boundary() {
    let chunks = split("The cat sat. The dog ran.", 20, 5);
    assert!(chunks.len() >= 2);
    for c in &chunks {
        assert!(c.text.chars().count() <= 20, "chunk too long: {:?}", c.text);
    }
    assert_eq!(chunks[0].text, "The cat sat");
    assert!(chunks[1].text.contains("The dog ran."));
}

#[test]
fn chunks_never_exceed_chunk_size() {
    let text = long_text();
    for (size, overlap) in [(100, 0), (150, 30), (400, 100)] {
        for c in split(&text, size, overlap) {
            assert!(c.text.chars().count() <= size, "size={size}: {:?}", c.text);
        }
    }
}

#[test]
fn chunks_cover_every_non_whitespace_character() {
    let text = long_text();
    let chunks = split(&text, 150, 30);
    let chars: Vec<char> = text.chars().collect();
    let mut covered = vec![false; chars.len()];
    let mut previous_start = None;
    for c in &chunks {
        let start = start_of(c);
        let len = c.text.chars().count();
        let located: String = chars[start..start + len].iter().collect();
        assert_eq!(located, c.text, "chunk is a verbatim slice of the source");
        if let Some(prev) = previous_start {
            assert!(start > prev, "chunks are in source order");
        }
        previous_start = Some(start);
        for flag in &mut covered[start..start + len] {
            *flag = true;
        }
    }
    for (i, ch) in chars.iter().enumerate() {
        if !ch.is_whitespace() {
            assert!(covered[i], "character {i} ({ch:?}) not covered by any chunk");
        }
    }
}

fn word_text(words: usize) -> String {
    (0..words).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ")
}

#[test]
fn adjacent_chunks_overlap_within_bound() {
    let text = word_text(300);
    let overlap = 30;
    let chunks = split(&text, 150, overlap);
    assert!(chunks.len() > 3);
    for pair in chunks.windows(2) {
        let (a, b) = (&pair[0].text, &pair[1].text);
        let shared = (1..=b.len().min(a.len()))
            .filter(|&k| b.is_char_boundary(k) && a.ends_with(&b[..k]))
            .max()
            .unwrap_or(0);
        let shared_chars = b[..shared].chars().count();
        assert!(shared_chars > 0, "no overlap between {a:?} and {b:?}");
        assert!(shared_chars <= overlap, "overlap {shared_chars} exceeds {overlap}");
    }
}

#[test]
fn zero_overlap_produces_disjoint_chunks() {
    let text = long_text();
    let chunks = split(&text, 120, 0);
    for pair in chunks.windows(2) {
        let end = start_of(&pair[0]) + pair[0].text.chars().count();
        assert!(start_of(&pair[1]) >= end);
    }
}

#[test]
fn text_without_separators_falls_back_to_characters() {
    let text = "x".repeat(1000);
    let chunks = split(&text, 100, 10);
    assert!(chunks.len() >= 10);
    assert!(chunks.iter().all(|c| c.text.len() <= 100));
}

#[test]
fn line_metadata_tracks_source_lines() {
    let text = "first line\nsecond line\nthird line";
    let chunks = split(text, 100, 0);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].metadata.get(meta_keys::LINES_FROM), Some(&MetaValue::Int(1)));
    assert_eq!(chunks[0].metadata.get(meta_keys::LINES_TO), Some(&MetaValue::Int(3)));
}

fn assert_starts_match_source(text: &str, chunks: &[ragdoc_core::types::Chunk]) {
    let chars: Vec<char> = text.chars().collect();
    let mut previous = None;
    for c in chunks {
        let start = start_of(c);
        let len = c.text.chars().count();
        let source: String = chars[start..start + len].iter().collect();
        assert_eq!(source, c.text, "chunk at {start} does not match the document");
        assert!(previous.map_or(true, |p| p < start), "starts must increase: {previous:?} then {start}");
        previous = Some(start);
    }
}

#[test]
fn trailing_chunk_repeating_earlier_text_gets_its_own_position() {
    let long = format!("{} end", "word ".repeat(19).trim_end());
    assert_eq!(long.chars().count(), 98);
    let text = format!("{long}\n\nend");

    let chunks = split(&text, 100, 0);
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[1].text, "end");
    assert_eq!(start_of(&chunks[1]), 100);
    assert_eq!(chunks[1].metadata.get(meta_keys::LINES_FROM), Some(&MetaValue::Int(3)));
    assert_starts_match_source(&text, &chunks);
}

#[test]
fn positions_count_characters_in_mixed_scripts() {
    let mut text = String::new();
    for i in 0..12 {
        text.push_str(&format!("Đà Lạt có hồ Xuân Hương và đồi thông số {i}. The lake is quiet at dawn.\n"));
        if i % 3 == 2 {
            text.push('\n');
        }
    }
    assert_starts_match_source(&text, &split(&text, 100, 0));
    for c in split(&text, 120, 40) {
        let start = start_of(&c);
        let source: String = text.chars().skip(start).take(c.text.chars().count()).collect();
        assert_eq!(source, c.text);
    }
}

#[test]
fn overlap_equal_to_chunk_size_is_rejected() {
    let err = ChunkingConfig::new(200, 200).validate().expect_err("must reject");
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn chunk_size_out_of_range_is_rejected() {
    assert!(ChunkingConfig::new(99, 0).validate().is_err());
    assert!(ChunkingConfig::new(5001, 0).validate().is_err());
    assert!(ChunkingConfig::new(100, 99).validate().is_ok());
    assert!(ChunkingConfig::default().validate().is_ok());
}

#[test]
fn chunker_is_deterministic() {
    let text = long_text();
    let chunker = Chunker::new(ChunkingConfig::new(200, 40));
    assert_eq!(chunker.split(&text), chunker.split(&text));
}

#[test]
fn tokenize_applies_same_rules_to_queries_and_chunks() {
    let chunk = "Rivers, MOUNTAINS & valleys!";
    assert_eq!(tokenize(chunk), tokenize("rivers mountains valleys"));
}

#[test]
fn metadata_serializes_as_plain_json() {
    let chunks = split("Short text", 100, 10);
    let json = serde_json::to_value(&chunks[0].metadata).expect("serialize");
    assert_eq!(json["chunk_index"], serde_json::json!(0));
    assert_eq!(json["start"], serde_json::json!(0));
}

#[test]
fn text_file_source_reads_content_and_name() {
    let tmp = TempDir::new().unwrap();
    let file_path = tmp.path().join("notes.txt");
    let mut f = fs::File::create(&file_path).unwrap();
    writeln!(f, "Short text").unwrap();

    let source = TextFileSource::new(&file_path);
    assert_eq!(source.name(), "notes.txt");
    assert_eq!(source.read_text().expect("read").trim(), "Short text");
}

#[test]
fn text_file_source_decodes_invalid_utf8_lossily() {
    let tmp = TempDir::new().unwrap();
    let file_path = tmp.path().join("broken.txt");
    fs::write(&file_path, [b'o', b'k', 0xFF, b'!']).unwrap();
    let text = TextFileSource::new(&file_path).read_text().expect("read");
    assert!(text.starts_with("ok"));
    assert!(text.ends_with('!'));
}

#[test]
fn missing_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let source = TextFileSource::new(tmp.path().join("absent.txt"));
    assert!(source.read_text().is_err());
}

#[test]
fn in_memory_source_returns_its_text() {
    let source = InMemorySource::new("memo", "alpha bravo");
    assert_eq!(source.name(), "memo");
    assert_eq!(source.read_text().unwrap(), "alpha bravo");
}
