//! Record parser for the staged QA-SRL annotation format.
//!
//! The input is line-oriented and tab-separated:
//!
//! ```text
//! <anything>_<sentence_id>
//! <raw sentence text>
//! <predicate>\t<qa_pair_count>
//! <slot_1>\t...\t<slot_n>\t<answer1>###<answer2>###...
//! ... (qa_pair_count such lines)
//! <blank line>
//! ```
//!
//! A 3-mode cursor walks the stream: sentence-id header, sentence
//! text, then predicate headers each followed by exactly
//! `qa_pair_count` QA lines. A blank line closes the sentence. Any
//! structural mismatch is a fatal [`Error::Parse`]; there is no
//! recovery or partial result.

use serde::{Deserialize, Serialize};

use crate::consolidate::consolidate_answers;
use crate::question::{QuestionRegistry, SlotMask};
use crate::{Error, Result};

/// Delimiter between candidate answers on a QA line.
const ANSWER_DELIMITER: &str = "###";

/// One predicate and its questions for a single sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateGroup {
    /// Predicate surface text.
    pub predicate: String,
    /// `(canonical question, consolidated answers)` in annotation order.
    pub qas: Vec<(String, Vec<String>)>,
}

/// All predicate groups annotated for one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceAnnotations {
    /// Raw sentence text.
    pub sentence: String,
    /// Predicate groups in annotation order.
    pub predicates: Vec<PredicateGroup>,
}

enum Mode {
    SentenceId,
    SentenceText,
    Predicates,
}

/// Parse an annotation stream into per-sentence predicate groups.
///
/// Questions are canonicalized through `questions` (registering their
/// identity as a side effect) and each question's answers are
/// consolidated before being stored.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed headers, wrong field counts,
/// non-integer QA-pair counts, or a stream truncated mid-sentence.
pub fn parse_annotations(
    input: &str,
    mask: &SlotMask,
    questions: &mut QuestionRegistry,
) -> Result<Vec<SentenceAnnotations>> {
    let mut sentences = Vec::new();
    let mut mode = Mode::SentenceId;
    let mut sentence = String::new();
    let mut predicates: Vec<PredicateGroup> = Vec::new();
    let mut group: Option<PredicateGroup> = None;
    let mut remaining = 0usize;

    for (line_no, raw) in input.lines().enumerate() {
        let line = raw.trim();
        let err = |msg: String| Error::parse(format!("line {}: {msg}", line_no + 1));

        match mode {
            Mode::SentenceId => {
                let first = line.split('\t').next().unwrap_or("");
                let id = first
                    .rsplit('_')
                    .next()
                    .filter(|suffix| !suffix.is_empty() && first.contains('_'));
                match id.map(str::parse::<u64>) {
                    Some(Ok(_)) => mode = Mode::SentenceText,
                    _ => {
                        return Err(err(format!(
                            "expected sentence-id header `<anything>_<id>`, got {line:?}"
                        )))
                    }
                }
            }
            Mode::SentenceText => {
                sentence = line.to_string();
                mode = Mode::Predicates;
            }
            Mode::Predicates if remaining == 0 => {
                if line.is_empty() {
                    sentences.push(SentenceAnnotations {
                        sentence: std::mem::take(&mut sentence),
                        predicates: std::mem::take(&mut predicates),
                    });
                    mode = Mode::SentenceId;
                } else {
                    let fields: Vec<&str> = line.split('\t').collect();
                    if fields.len() != 2 {
                        return Err(err(format!(
                            "expected `predicate\\tcount` header with 2 fields, got {}",
                            fields.len()
                        )));
                    }
                    let count: usize = fields[1].trim().parse().map_err(|_| {
                        err(format!("QA pair count {:?} is not an integer", fields[1]))
                    })?;
                    let new_group = PredicateGroup {
                        predicate: fields[0].to_string(),
                        qas: Vec::new(),
                    };
                    // A zero-count predicate contributes nothing.
                    if count > 0 {
                        group = Some(new_group);
                        remaining = count;
                    }
                }
            }
            Mode::Predicates => {
                let fields: Vec<&str> = line.split('\t').collect();
                if fields.len() < 2 {
                    return Err(err(
                        "expected QA line with question slots and an answer field".to_string(),
                    ));
                }
                let (slots, answers_field) = fields.split_at(fields.len() - 1);
                let question = questions.encode(slots, mask).map_err(|e| match e {
                    Error::Parse(msg) => err(msg),
                    other => other,
                })?;
                let answers: Vec<&str> = answers_field[0].split(ANSWER_DELIMITER).collect();
                let consolidated = consolidate_answers(&answers);

                if let Some(g) = group.as_mut() {
                    g.qas.push((question, consolidated));
                }
                remaining -= 1;
                if remaining == 0 {
                    if let Some(g) = group.take() {
                        predicates.push(g);
                    }
                }
            }
        }
    }

    match mode {
        // Missing trailing blank line: flush the final sentence.
        Mode::Predicates if remaining == 0 => {
            sentences.push(SentenceAnnotations {
                sentence,
                predicates,
            });
            Ok(sentences)
        }
        Mode::SentenceId => Ok(sentences),
        _ => Err(Error::parse(
            "annotation stream truncated mid-sentence".to_string(),
        )),
    }
}
