//! Pipeline façade: annotation file in, Open IE records out.
//!
//! Conversion stages through an intermediate textual representation
//! (see [`crate::enumerate`]) and re-parses it into structured
//! [`Extraction`] records. The round-trip is deliberate: it keeps the
//! staged text byte-compatible with reference corpora and inspectable
//! when debugging, at the cost of one extra pass over in-memory text.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::enumerate::{stage_sentence, ExtractionRegistry};
use crate::extraction::{escape_special_chars, Extraction};
use crate::question::{QuestionRegistry, SlotMask};
use crate::reader::parse_annotations;
use crate::span::{all_indices, MatchCase};
use crate::Result;

/// Extractions retained for one sentence, in enumeration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceExtractions {
    /// Raw sentence text.
    pub sentence: String,
    /// Extractions that survived the pronoun filter.
    pub extractions: Vec<Extraction>,
}

/// QA-SRL to Open IE converter.
///
/// Owns the question registry, the extraction registry, and the
/// ordinal counter, so separate conversions in one process never share
/// state. Built once from an annotation file, then queried or written
/// out.
#[derive(Debug)]
pub struct Qa2Oie {
    questions: QuestionRegistry,
    extractions: ExtractionRegistry,
    staged: String,
    sentences: Vec<SentenceExtractions>,
}

impl Qa2Oie {
    /// Convert an annotation file.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Io`] when the file cannot be read,
    /// [`crate::Error::Parse`] for malformed annotation records.
    pub fn from_file(path: impl AsRef<Path>, mask: &SlotMask) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_annotations(&text, mask)
    }

    /// Convert annotation text already in memory.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Parse`] for malformed annotation records.
    pub fn from_annotations(input: &str, mask: &SlotMask) -> Result<Self> {
        let mut questions = QuestionRegistry::new();
        let mut extractions = ExtractionRegistry::new();

        let parsed = parse_annotations(input, mask, &mut questions)?;

        let mut staged = String::new();
        for annotated in &parsed {
            stage_sentence(
                &mut staged,
                &annotated.sentence,
                &annotated.predicates,
                &mut extractions,
            );
        }

        let sentences = load_staged(&staged);

        Ok(Self {
            questions,
            extractions,
            staged,
            sentences,
        })
    }

    /// Retained extractions, grouped per sentence in encounter order.
    #[must_use]
    pub fn sentences(&self) -> &[SentenceExtractions] {
        &self.sentences
    }

    /// The staged intermediate text produced by enumeration.
    #[must_use]
    pub fn staged_text(&self) -> &str {
        &self.staged
    }

    /// Question identity registry populated during parsing.
    #[must_use]
    pub fn question_registry(&self) -> &QuestionRegistry {
        &self.questions
    }

    /// Extraction signature registry populated during enumeration.
    #[must_use]
    pub fn extraction_registry(&self) -> &ExtractionRegistry {
        &self.extractions
    }

    /// Write the Open IE output: one `escaped_sentence\textraction`
    /// line per retained extraction.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Io`] when the file cannot be created or written.
    pub fn write_oie(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut out = fs::File::create(path)?;
        for group in &self.sentences {
            for extraction in &group.extractions {
                writeln!(
                    out,
                    "{}\t{}",
                    escape_special_chars(&group.sentence),
                    extraction
                )?;
            }
        }
        Ok(())
    }

    /// Append one line per distinct sentence, as bare-sentence input
    /// for a downstream Open IE tool.
    ///
    /// Sentence text repeated across annotation blocks is written only
    /// once, in first-encounter order.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Io`] when the file cannot be opened or written.
    pub fn write_oie_input(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut out = OpenOptions::new().create(true).append(true).open(path)?;
        let mut seen: HashSet<&str> = HashSet::new();
        for group in &self.sentences {
            if seen.insert(group.sentence.as_str()) {
                writeln!(out, "{}", group.sentence)?;
            }
        }
        Ok(())
    }
}

/// Rebuild structured extractions from the staged text.
///
/// Single tab field = sentence header; multiple fields = one extraction
/// row (`predicate`, then question/answer pairs). Predicate and
/// argument offsets are located case-insensitively. Per-question offset
/// sets are unioned across the sentence block and attached to every
/// extraction of the sentence once its block ends, the final sentence
/// included. Extractions with a bare-pronoun argument are dropped here;
/// their ordinals were already consumed during enumeration.
fn load_staged(staged: &str) -> Vec<SentenceExtractions> {
    let mut sentences: Vec<SentenceExtractions> = Vec::new();
    let mut inds_for_questions: HashMap<String, BTreeSet<usize>> = HashMap::new();

    for raw in staged.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();

        if fields.len() == 1 {
            attach_question_indices(sentences.last_mut(), &mut inds_for_questions);
            sentences.push(SentenceExtractions {
                sentence: line.to_string(),
                extractions: Vec::new(),
            });
            continue;
        }

        let Some(current) = sentences.last_mut() else {
            // Extraction row before any sentence header; staged text we
            // produce never does this.
            continue;
        };

        let predicate = fields[0];
        let mut extraction = Extraction::new(
            predicate,
            all_indices(&current.sentence, predicate, MatchCase::Insensitive),
            current.sentence.clone(),
            1.0,
        );

        for pair in fields[1..].chunks_exact(2) {
            let (question, answer) = (pair[0], pair[1]);
            let indices = all_indices(&current.sentence, answer, MatchCase::Insensitive);
            inds_for_questions
                .entry(question.to_string())
                .or_default()
                .extend(indices.iter().copied());
            extraction.add_arg(answer, indices, question);
        }

        if extraction.no_pronoun_args() {
            current.extractions.push(extraction);
        }
    }

    attach_question_indices(sentences.last_mut(), &mut inds_for_questions);
    sentences
}

/// Attach the accumulated per-question offsets to a finished sentence
/// block and reset the accumulator.
fn attach_question_indices(
    sentence: Option<&mut SentenceExtractions>,
    inds_for_questions: &mut HashMap<String, BTreeSet<usize>>,
) {
    if let Some(group) = sentence {
        for extraction in &mut group.extractions {
            extraction.inds_for_questions = inds_for_questions.clone();
        }
    }
    inds_for_questions.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "\
sent_1
Bob ate the cake .
ate\t2
who\t_\t_\tate\t_\t_\t_\tBob
what\t_\t_\tate\t_\t_\t_\tthe cake
";

    #[test]
    fn end_to_end_single_extraction() {
        let pipeline = Qa2Oie::from_annotations(INPUT, &SlotMask::identity()).unwrap();

        assert_eq!(pipeline.sentences().len(), 1);
        let group = &pipeline.sentences()[0];
        assert_eq!(group.sentence, "Bob ate the cake .");
        assert_eq!(group.extractions.len(), 1);

        let extraction = &group.extractions[0];
        assert_eq!(extraction.predicate, "ate");
        assert_eq!(extraction.args.len(), 2);
        assert_eq!(extraction.args[0].text, "Bob");
        assert_eq!(extraction.args[1].text, "the cake");
        assert!(extraction.no_pronoun_args());
        assert!((extraction.confidence - 1.0).abs() < f64::EPSILON);

        // "Bob ate the cake ." strips to "bobatethecake."
        assert_eq!(extraction.predicate_indices, vec![3]);
        assert_eq!(extraction.args[0].indices, vec![0]);
        assert_eq!(extraction.args[1].indices, vec![6]);
    }

    #[test]
    fn staged_text_has_header_rows_and_blank_separator() {
        let pipeline = Qa2Oie::from_annotations(INPUT, &SlotMask::identity()).unwrap();
        let staged = pipeline.staged_text();
        let lines: Vec<&str> = staged.split('\n').collect();

        assert_eq!(lines[0], "Bob ate the cake .");
        assert_eq!(
            lines[1],
            "ate\twho _ _ ate _ _ _\tBob\twhat _ _ ate _ _ _\tthe cake"
        );
        assert_eq!(lines[2], "");
    }

    #[test]
    fn pronoun_only_argument_is_dropped_but_counted() {
        let input = "\
sent_1
It ate the cake .
ate\t1
who\t_\t_\tate\t_\t_\t_\tit
";
        let pipeline = Qa2Oie::from_annotations(input, &SlotMask::identity()).unwrap();
        assert_eq!(pipeline.sentences()[0].extractions.len(), 0);
        // The ordinal was still assigned during enumeration.
        assert_eq!(pipeline.extraction_registry().total_extractions(), 1);
    }

    #[test]
    fn question_indices_attached_to_final_sentence() {
        let pipeline = Qa2Oie::from_annotations(INPUT, &SlotMask::identity()).unwrap();
        let extraction = &pipeline.sentences()[0].extractions[0];

        let bob: BTreeSet<usize> = extraction.inds_for_questions["who _ _ ate _ _ _"].clone();
        assert_eq!(bob, BTreeSet::from([0]));
        let cake: BTreeSet<usize> = extraction.inds_for_questions["what _ _ ate _ _ _"].clone();
        assert_eq!(cake, BTreeSet::from([6]));
    }

    #[test]
    fn unlocatable_answer_is_kept_with_empty_indices() {
        let input = "\
sent_1
Bob ate the cake .
ate\t1
who\t_\t_\tate\t_\t_\t_\tAlice
";
        let pipeline = Qa2Oie::from_annotations(input, &SlotMask::identity()).unwrap();
        let extraction = &pipeline.sentences()[0].extractions[0];
        assert_eq!(extraction.args[0].text, "Alice");
        assert!(extraction.args[0].indices.is_empty());
    }
}
