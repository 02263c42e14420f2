//! The Open IE extraction record.
//!
//! One extraction is a predicate plus the arguments selected for it,
//! grounded in a single sentence. Spans carry the character offsets
//! located by [`crate::span::all_indices`], so they index into the
//! whitespace-stripped sentence. An offset list may be empty when the
//! text could not be located (tokenization drift); the argument is
//! kept regardless.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// Closed class of bare pronouns. An argument consisting of exactly one
/// of these words carries no extractable content.
static PRONOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "i", "me", "my", "mine", "myself", "you", "your", "yours", "yourself", "he", "him",
        "his", "himself", "she", "her", "hers", "herself", "it", "its", "itself", "we", "us",
        "our", "ours", "ourselves", "they", "them", "their", "theirs", "themselves", "this",
        "that", "these", "those", "who", "whom", "which", "what", "something", "someone",
    ]
    .into_iter()
    .collect()
});

/// One argument of an extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Argument surface text.
    pub text: String,
    /// Start offsets in the whitespace-stripped sentence; empty when
    /// the text could not be located.
    pub indices: Vec<usize>,
    /// Questions that elicited this argument, in encounter order.
    pub questions: Vec<String>,
}

/// An Open IE extraction: sentence, predicate span, arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// The sentence the extraction is grounded in.
    pub sentence: String,
    /// Predicate surface text.
    pub predicate: String,
    /// Predicate start offsets in the whitespace-stripped sentence.
    pub predicate_indices: Vec<usize>,
    /// Arguments in the order they were added.
    pub args: Vec<Argument>,
    /// Confidence score. This system performs no probabilistic scoring;
    /// every extraction is emitted with confidence 1.0.
    pub confidence: f64,
    /// Union of located offsets per question, across the whole
    /// sentence, attached once the sentence block is fully read.
    pub inds_for_questions: HashMap<String, BTreeSet<usize>>,
}

impl Extraction {
    /// Create an extraction with no arguments yet.
    #[must_use]
    pub fn new(
        predicate: impl Into<String>,
        predicate_indices: Vec<usize>,
        sentence: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            sentence: sentence.into(),
            predicate: predicate.into(),
            predicate_indices,
            args: Vec::new(),
            confidence,
            inds_for_questions: HashMap::new(),
        }
    }

    /// Add an argument elicited by `question`.
    ///
    /// When an argument with the same text and offsets already exists,
    /// the question is appended to it instead of duplicating the span.
    pub fn add_arg(
        &mut self,
        text: impl Into<String>,
        indices: Vec<usize>,
        question: impl Into<String>,
    ) {
        let text = text.into();
        let question = question.into();
        if let Some(existing) = self
            .args
            .iter_mut()
            .find(|a| a.text == text && a.indices == indices)
        {
            existing.questions.push(question);
        } else {
            self.args.push(Argument {
                text,
                indices,
                questions: vec![question],
            });
        }
    }

    /// Check that no argument is a bare pronoun.
    ///
    /// Extractions failing this check are dropped from the final record
    /// set (they still consumed an ordinal during enumeration).
    #[must_use]
    pub fn no_pronoun_args(&self) -> bool {
        !self
            .args
            .iter()
            .any(|a| PRONOUNS.contains(a.text.trim().to_lowercase().as_str()))
    }
}

impl fmt::Display for Extraction {
    /// Tab-joined rendering: predicate, then each argument's text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.predicate)?;
        for arg in &self.args {
            write!(f, "\t{}", arg.text)?;
        }
        Ok(())
    }
}

/// Escape characters that would break a tab-separated output line.
///
/// Backslash, tab, and newline are replaced with their two-character
/// escape sequences.
#[must_use]
pub fn escape_special_chars(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\t', "\\t")
        .replace('\n', "\\n")
}
