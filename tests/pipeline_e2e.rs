//! End-to-end tests for the QA-SRL to Open IE pipeline.
//!
//! Drives the full conversion over a small multi-sentence corpus and
//! checks the file-level contracts: output line format, append-mode
//! sentence listing, registry accounting, and the pronoun filter.

use std::collections::BTreeSet;
use std::io::Write;

use qa2oie::{Qa2Oie, SlotMask};

/// Three sentences: one clean extraction, one with a pronoun answer
/// competing with a name, one reusing a question shape from sentence 1.
const CORPUS: &str = "\
sent_1
Bob ate the cake .
ate\t2
who\t_\t_\tate\t_\t_\t_\tBob
what\t_\t_\tate\t_\t_\t_\tthe cake###cake

sent_2
Mary saw Bob and it fell .
saw\t2
who\t_\t_\tsaw\t_\t_\t_\tMary
what\t_\t_\tsaw\t_\t_\t_\tBob###it
fell\t1
what\t_\t_\tfell\t_\t_\t_\tit

sent_3
Ann ate bread .
ate\t1
who\t_\t_\tate\t_\t_\t_\tAnn
";

fn convert(input: &str) -> Qa2Oie {
    Qa2Oie::from_annotations(input, &SlotMask::identity()).unwrap()
}

#[test]
fn corpus_conversion_retains_non_pronoun_extractions() {
    let pipeline = convert(CORPUS);
    let sentences = pipeline.sentences();
    assert_eq!(sentences.len(), 3);

    // Sentence 1: "cake" consolidated into "the cake", one extraction.
    assert_eq!(sentences[0].extractions.len(), 1);
    assert_eq!(sentences[0].extractions[0].to_string(), "ate\tBob\tthe cake");

    // Sentence 2: (Mary, Bob) survives; (Mary, it) and (it,) are
    // pronoun-filtered.
    assert_eq!(sentences[1].extractions.len(), 1);
    assert_eq!(sentences[1].extractions[0].to_string(), "saw\tMary\tBob");

    // Sentence 3: single-question predicate.
    assert_eq!(sentences[2].extractions.len(), 1);
    assert_eq!(sentences[2].extractions[0].to_string(), "ate\tAnn");
}

#[test]
fn ordinals_cover_every_enumerated_candidate() {
    let pipeline = convert(CORPUS);

    // 1 (ate) + 2 (saw) + 1 (fell) + 1 (ate) = 5 candidates, pronoun
    // drops included.
    let registry = pipeline.extraction_registry();
    assert_eq!(registry.total_extractions(), 5);

    // Assigned ordinals are exactly 0..5, no gaps or repeats.
    let mut assigned: Vec<usize> = registry
        .iter()
        .flat_map(|(_, entry)| entry.extraction_ids.iter().copied())
        .collect();
    assigned.sort_unstable();
    assert_eq!(assigned, vec![0, 1, 2, 3, 4]);

    // Both "saw" combinations share one signature.
    let saw_signature: BTreeSet<String> = ["who _ _ saw _ _ _", "what _ _ saw _ _ _"]
        .into_iter()
        .map(String::from)
        .collect();
    let entry = registry.get(&saw_signature).unwrap();
    assert_eq!(entry.count, 2);
    assert_eq!(entry.extraction_ids, vec![1, 2]);

    // ate-with-two-questions, saw, fell, ate-with-one-question.
    assert_eq!(registry.signature_count(), 4);
}

#[test]
fn question_identity_is_stable_across_sentences() {
    let pipeline = convert(CORPUS);
    let questions = pipeline.question_registry();

    // who-ate, what-ate, who-saw, what-saw, what-fell.
    assert_eq!(questions.len(), 5);

    // "who _ _ ate _ _ _" appears in sentences 1 and 3: same ordinal,
    // two occurrences.
    let entry = questions.get("who _ _ ate _ _ _").unwrap();
    assert_eq!(entry.ordinal, 0);
    assert_eq!(entry.occurrences, 2);
}

#[test]
fn write_oie_emits_one_line_per_retained_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("corpus.qa");
    let output_path = dir.path().join("corpus.oie");
    std::fs::write(&input_path, CORPUS).unwrap();

    let pipeline = Qa2Oie::from_file(&input_path, &SlotMask::identity()).unwrap();
    pipeline.write_oie(&output_path).unwrap();

    let output = std::fs::read_to_string(&output_path).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Bob ate the cake .\tate\tBob\tthe cake",
            "Mary saw Bob and it fell .\tsaw\tMary\tBob",
            "Ann ate bread .\tate\tAnn",
        ]
    );
}

#[test]
fn write_oie_input_appends_sentences() {
    let dir = tempfile::tempdir().unwrap();
    let listing_path = dir.path().join("sentences.txt");

    // Pre-existing content must survive: the listing is append-mode.
    let mut seed = std::fs::File::create(&listing_path).unwrap();
    writeln!(seed, "An earlier sentence .").unwrap();
    drop(seed);

    let pipeline = convert(CORPUS);
    pipeline.write_oie_input(&listing_path).unwrap();

    let listing = std::fs::read_to_string(&listing_path).unwrap();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(
        lines,
        vec![
            "An earlier sentence .",
            "Bob ate the cake .",
            "Mary saw Bob and it fell .",
            "Ann ate bread .",
        ]
    );
}

#[test]
fn write_oie_input_lists_each_sentence_once() {
    let dir = tempfile::tempdir().unwrap();
    let listing_path = dir.path().join("sentences.txt");

    // Two annotation blocks over identical sentence text: the listing
    // carries one line per distinct sentence.
    let input = "\
sent_1
Bob ate the cake .
ate\t1
who\t_\t_\tate\t_\t_\t_\tBob

sent_2
Bob ate the cake .
ate\t1
what\t_\t_\tate\t_\t_\t_\tthe cake
";
    let pipeline = Qa2Oie::from_annotations(input, &SlotMask::identity()).unwrap();
    pipeline.write_oie_input(&listing_path).unwrap();

    let listing = std::fs::read_to_string(&listing_path).unwrap();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines, vec!["Bob ate the cake ."]);
}

#[test]
fn staged_text_round_trips_through_the_facade() {
    let pipeline = convert(CORPUS);
    let staged = pipeline.staged_text();

    // One header per sentence, one blank separator each.
    let headers: Vec<&str> = staged
        .lines()
        .filter(|l| !l.is_empty() && !l.contains('\t'))
        .collect();
    assert_eq!(
        headers,
        vec![
            "Bob ate the cake .",
            "Mary saw Bob and it fell .",
            "Ann ate bread ."
        ]
    );

    // Every extraction row alternates question/answer after the
    // predicate, so the field count is odd.
    for row in staged.lines().filter(|l| l.contains('\t')) {
        assert_eq!(row.split('\t').count() % 2, 1, "bad row: {row:?}");
    }
}

#[test]
fn masked_conversion_collapses_question_identities() {
    let pipeline = Qa2Oie::from_annotations(CORPUS, &SlotMask::mask_all()).unwrap();

    // Every question encodes to the same masked shape.
    assert_eq!(pipeline.question_registry().len(), 1);
    let entry = pipeline.question_registry().get("_ _ _ _ _ _ _").unwrap();
    assert_eq!(entry.occurrences, 5);
}

#[test]
fn malformed_corpus_aborts_with_parse_error() {
    let truncated = "sent_1\nBob ate the cake .\nate\t3\nwho\t_\t_\tate\t_\t_\t_\tBob\n";
    let result = Qa2Oie::from_annotations(truncated, &SlotMask::identity());
    assert!(matches!(result, Err(qa2oie::Error::Parse(_))));
}
