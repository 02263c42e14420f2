//! # qa2oie
//!
//! Convert QA-SRL annotations into Open IE extraction tuples.
//!
//! QA-SRL elicits a predicate's arguments as natural-language
//! question/answer pairs instead of fixed role labels. This crate turns
//! those annotations into (predicate, argument, argument, ...) tuples,
//! one deduplicated set per sentence.
//!
//! ## Pipeline
//!
//! ```text
//! annotation file
//!   → reader        (sentence / predicate / QA record structure)
//!   → consolidate   (drop ordered-subsequence-redundant answers)
//!   → enumerate     (Cartesian product per predicate; signature dedup
//!                    registry assigns strictly increasing ordinals)
//!   → staged text   (one tab-delimited row per candidate extraction)
//!   → pipeline      (re-parse rows, locate spans, pronoun filter)
//!   → Open IE output
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use qa2oie::{Qa2Oie, SlotMask};
//!
//! let annotations = "\
//! sent_1
//! Bob ate the cake .
//! ate\t2
//! who\t_\t_\tate\t_\t_\t_\tBob
//! what\t_\t_\tate\t_\t_\t_\tthe cake
//! ";
//!
//! let pipeline = Qa2Oie::from_annotations(annotations, &SlotMask::identity()).unwrap();
//! assert_eq!(pipeline.sentences().len(), 1);
//! assert_eq!(pipeline.sentences()[0].extractions[0].to_string(), "ate\tBob\tthe cake");
//! ```
//!
//! ## Design Notes
//!
//! - **Instance-scoped registries**: question identities and extraction
//!   ordinals live on the [`Qa2Oie`] value, never in process globals,
//!   so conversions can run back to back (or in tests) without leaking
//!   state into each other.
//! - **Staged textual round-trip**: enumeration writes a per-sentence
//!   tab-delimited staging format and the façade re-parses it. The
//!   round-trip keeps output byte-compatible with existing corpora and
//!   makes the intermediate inspectable via [`Qa2Oie::staged_text`].
//! - **Tolerated span misses**: answers that cannot be located in their
//!   sentence keep an empty offset list; that is expected tokenization
//!   drift, not an error.

#![warn(missing_docs)]

pub mod consolidate;
pub mod enumerate;
mod error;
pub mod extraction;
pub mod pipeline;
pub mod question;
pub mod reader;
pub mod span;

pub use consolidate::{consolidate_answers, is_token_subsequence};
pub use enumerate::{ExtractionRegistry, SignatureEntry};
pub use error::{Error, Result};
pub use extraction::{escape_special_chars, Argument, Extraction};
pub use pipeline::{Qa2Oie, SentenceExtractions};
pub use question::{
    QuestionEntry, QuestionRegistry, SlotMask, SlotTransform, MODALITY_SLOT, PREDICATE_SLOT,
    QUESTION_SLOTS,
};
pub use reader::{PredicateGroup, SentenceAnnotations};
pub use span::{all_indices, MatchCase};
