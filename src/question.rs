//! Question canonicalization and identity registry.
//!
//! A QA-SRL question is a fixed-arity tuple of slot values (wh-word,
//! modality, subject marker, predicate placeholder, object markers,
//! preposition, answer-role placeholder). Two questions are the same
//! question iff their masked, de-spaced encodings are equal. The
//! registry assigns each distinct encoding an ordinal on first sight,
//! in encounter order, and counts how often it recurs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{Error, Result};

/// Number of slots in a question tuple.
pub const QUESTION_SLOTS: usize = 8;

/// Slot index of the predicate placeholder within a question.
pub const PREDICATE_SLOT: usize = 3;

/// Slot index of the modality marker within a question.
pub const MODALITY_SLOT: usize = 1;

/// Per-slot normalization applied before encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotTransform {
    /// Keep the slot value as annotated.
    #[default]
    Identity,
    /// Replace the slot value with the `"_"` placeholder.
    Mask,
}

impl SlotTransform {
    fn apply(self, value: &str) -> &str {
        match self {
            SlotTransform::Identity => value,
            SlotTransform::Mask => "_",
        }
    }
}

/// Transform table covering all [`QUESTION_SLOTS`] slots of a question.
///
/// The default table keeps every slot as annotated; masking individual
/// slots anonymizes them (e.g. collapse all predicates into one
/// placeholder to compare question shapes across predicates).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotMask {
    slots: [SlotTransform; QUESTION_SLOTS],
}

impl SlotMask {
    /// Table that keeps every slot unchanged.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Table that masks every slot.
    #[must_use]
    pub fn mask_all() -> Self {
        Self {
            slots: [SlotTransform::Mask; QUESTION_SLOTS],
        }
    }

    /// Table that masks the given slot indices and keeps the rest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a slot index outside
    /// `0..QUESTION_SLOTS`.
    pub fn with_masked(masked: &[usize]) -> Result<Self> {
        let mut slots = [SlotTransform::Identity; QUESTION_SLOTS];
        for &slot in masked {
            if slot >= QUESTION_SLOTS {
                return Err(Error::invalid_input(format!(
                    "question slot index {slot} out of range (question has {QUESTION_SLOTS} slots)"
                )));
            }
            slots[slot] = SlotTransform::Mask;
        }
        Ok(Self { slots })
    }

    /// Transform for one slot.
    ///
    /// # Panics
    ///
    /// Panics when `slot >= QUESTION_SLOTS`.
    #[must_use]
    pub fn transform(&self, slot: usize) -> SlotTransform {
        self.slots[slot]
    }
}

/// Identity and occurrence count of one distinct question encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionEntry {
    /// Ordinal assigned on first sight, in encounter order. Never
    /// reused or reassigned.
    pub ordinal: usize,
    /// How many times this encoding has been seen.
    pub occurrences: usize,
}

/// Registry mapping each distinct canonical question to its identity.
///
/// Instance state, owned by the pipeline: repeated conversions in one
/// process each get their own registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionRegistry {
    entries: HashMap<String, QuestionEntry>,
}

impl QuestionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonicalize a question's raw slot values and register the encoding.
    ///
    /// Applies each slot's transform, replaces internal spaces with
    /// underscores, and joins the slots with a tab to form the registry
    /// key. Returns the space-joined transformed slots, the
    /// human-readable form used in the staged text (the two forms map
    /// 1:1 because slot values carry no spaces after de-spacing).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when more than [`QUESTION_SLOTS`] slot
    /// values are supplied. Fewer slots are tolerated; the trailing
    /// transforms go unused.
    pub fn encode(&mut self, slots: &[&str], mask: &SlotMask) -> Result<String> {
        if slots.len() > QUESTION_SLOTS {
            return Err(Error::parse(format!(
                "question has {} slots, expected at most {QUESTION_SLOTS}",
                slots.len()
            )));
        }

        let transformed: Vec<String> = slots
            .iter()
            .enumerate()
            .map(|(i, value)| mask.transform(i).apply(value).replace(' ', "_"))
            .collect();

        let key = transformed.join("\t");
        let next_ordinal = self.entries.len();
        let entry = self.entries.entry(key).or_insert(QuestionEntry {
            ordinal: next_ordinal,
            occurrences: 0,
        });
        entry.occurrences += 1;

        Ok(transformed.join(" "))
    }

    /// Look up a question by its display form (as returned by [`encode`]).
    ///
    /// [`encode`]: QuestionRegistry::encode
    #[must_use]
    pub fn get(&self, display: &str) -> Option<QuestionEntry> {
        self.entries.get(&display.replace(' ', "\t")).copied()
    }

    /// Number of distinct questions registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no question has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
