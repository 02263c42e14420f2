//! Extraction enumeration and signature-based deduplication.
//!
//! Each predicate group expands into the Cartesian product of its
//! questions' consolidated answer lists: one candidate extraction per
//! combination. Every candidate is recorded in the
//! [`ExtractionRegistry`] under its signature, the order-independent
//! set of questions it instantiates, and assigned a globally unique
//! ordinal. The staged per-sentence text emitted here is re-read by the
//! pipeline façade and is kept byte-compatible with reference corpora:
//! sentence header, one `predicate\tq1\ta1\tq2\ta2...` line per
//! combination, blank line after the sentence.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::reader::PredicateGroup;

/// Accounting for one distinct question-set signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEntry {
    /// How many extractions shared this signature.
    pub count: usize,
    /// Ordinals of those extractions, in assignment order.
    pub extraction_ids: Vec<usize>,
}

/// Registry assigning extraction ordinals and tracking signatures.
///
/// Ordinals start at 0, strictly increase, and are never reset; every
/// enumerated candidate consumes one, whether or not its signature was
/// seen before. The signature itself is the key, a normalized set
/// rather than a stringified representation. Instance state, owned by
/// the pipeline.
#[derive(Debug, Clone, Default)]
pub struct ExtractionRegistry {
    signatures: HashMap<BTreeSet<String>, SignatureEntry>,
    next_ordinal: usize,
}

impl ExtractionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one candidate extraction and return its ordinal.
    ///
    /// The signature is the set of questions instantiated by the
    /// candidate; duplicates collapse.
    pub fn record<I, S>(&mut self, questions: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let signature: BTreeSet<String> = questions.into_iter().map(Into::into).collect();
        let entry = self.signatures.entry(signature).or_default();

        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        entry.extraction_ids.push(ordinal);
        entry.count += 1;
        ordinal
    }

    /// Total number of ordinals assigned so far.
    #[must_use]
    pub fn total_extractions(&self) -> usize {
        self.next_ordinal
    }

    /// Number of distinct signatures seen.
    #[must_use]
    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    /// Accounting entry for a signature, if seen.
    #[must_use]
    pub fn get(&self, signature: &BTreeSet<String>) -> Option<&SignatureEntry> {
        self.signatures.get(signature)
    }

    /// Iterate over `(signature, entry)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&BTreeSet<String>, &SignatureEntry)> {
        self.signatures.iter()
    }
}

/// Append one sentence's staged block: header line, one line per
/// enumerated extraction, trailing blank line.
///
/// Combinations follow the predicate group's question order, with the
/// last question's answers varying fastest. A question with zero
/// surviving answers makes its predicate contribute nothing.
pub fn stage_sentence(
    out: &mut String,
    sentence: &str,
    groups: &[PredicateGroup],
    registry: &mut ExtractionRegistry,
) {
    out.push_str(sentence);
    out.push('\n');

    for group in groups {
        for combo in cartesian_product(&group.qas) {
            registry.record(combo.iter().map(|(q, _)| (*q).to_string()));

            out.push_str(&group.predicate);
            for (question, answer) in combo {
                out.push('\t');
                out.push_str(question);
                out.push('\t');
                out.push_str(answer);
            }
            out.push('\n');
        }
    }

    out.push('\n');
}

/// All `(question, answer)` selections taking exactly one answer per
/// question. Rightmost question varies fastest. Empty when any answer
/// list is empty or there are no questions.
fn cartesian_product(qas: &[(String, Vec<String>)]) -> Vec<Vec<(&str, &str)>> {
    if qas.is_empty() || qas.iter().any(|(_, answers)| answers.is_empty()) {
        return Vec::new();
    }

    let mut combos: Vec<Vec<(&str, &str)>> = vec![Vec::new()];
    for (question, answers) in qas {
        let mut next = Vec::with_capacity(combos.len() * answers.len());
        for combo in &combos {
            for answer in answers {
                let mut extended = combo.clone();
                extended.push((question.as_str(), answer.as_str()));
                next.push(extended);
            }
        }
        combos = next;
    }
    combos
}
