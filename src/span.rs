//! Substring location inside annotated sentences.
//!
//! QA-SRL answers are copied out of the sentence by annotators, but
//! tokenizers disagree about spacing ("can not" vs "cannot"). Matching
//! is therefore done on whitespace-stripped text: both the sentence and
//! the needle have all whitespace removed before searching, and the
//! returned offsets are positions in the stripped sentence.

use serde::{Deserialize, Serialize};

/// Case handling for span location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchCase {
    /// Match exact casing.
    Sensitive,
    /// Lowercase both strings before matching.
    Insensitive,
}

/// Find all start offsets of `needle` inside `sentence`.
///
/// Both strings are stripped of whitespace before matching, so the
/// returned offsets are character positions in the whitespace-stripped
/// sentence, not in the original. The needle is matched literally and
/// occurrences are non-overlapping (left-to-right scan).
///
/// Returns an empty vector when the needle cannot be located; this is
/// an expected condition (tokenization drift), never an error.
///
/// # Examples
///
/// ```
/// use qa2oie::span::{all_indices, MatchCase};
///
/// // "Bob ate the cake ." strips to "bobatethecake."
/// let hits = all_indices("Bob ate the cake .", "ate", MatchCase::Insensitive);
/// assert_eq!(hits, vec![3]);
///
/// assert!(all_indices("Bob ate the cake .", "pizza", MatchCase::Insensitive).is_empty());
/// ```
#[must_use]
pub fn all_indices(sentence: &str, needle: &str, case: MatchCase) -> Vec<usize> {
    let mut hay: String = sentence.chars().filter(|c| !c.is_whitespace()).collect();
    let mut pat: String = needle.chars().filter(|c| !c.is_whitespace()).collect();

    if case == MatchCase::Insensitive {
        hay = hay.to_lowercase();
        pat = pat.to_lowercase();
    }

    // An empty needle would match at every position; treat it as absent.
    if pat.is_empty() {
        return Vec::new();
    }

    hay.match_indices(&pat)
        .map(|(byte_pos, _)| hay[..byte_pos].chars().count())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_in_stripped_sentence() {
        // "the red car stopped" -> "theredcarstopped"
        let hits = all_indices("the red car stopped", "red car", MatchCase::Sensitive);
        assert_eq!(hits, vec![3]);
    }

    #[test]
    fn case_insensitive_matches_across_casing() {
        assert_eq!(
            all_indices("Bob ate the cake .", "BOB", MatchCase::Insensitive),
            vec![0]
        );
        assert!(all_indices("Bob ate the cake .", "BOB", MatchCase::Sensitive).is_empty());
    }

    #[test]
    fn absent_needle_yields_empty() {
        assert!(all_indices("Bob ate the cake .", "pizza", MatchCase::Insensitive).is_empty());
    }

    #[test]
    fn repeated_needle_yields_every_occurrence() {
        // "aba b ab" -> "abab ab" stripped: "ababab"; non-overlapping "ab" at 0, 2, 4
        assert_eq!(
            all_indices("ab ab ab", "ab", MatchCase::Sensitive),
            vec![0, 2, 4]
        );
    }

    #[test]
    fn metacharacters_match_literally() {
        assert_eq!(
            all_indices("cost (approx.) $5", "(approx.)", MatchCase::Sensitive),
            vec![4]
        );
    }

    #[test]
    fn empty_needle_is_absent() {
        assert!(all_indices("Bob ate the cake .", "", MatchCase::Sensitive).is_empty());
        assert!(all_indices("Bob ate the cake .", "   ", MatchCase::Sensitive).is_empty());
    }

    #[test]
    fn non_ascii_offsets_are_char_positions() {
        // "café au lait" strips to "caféaulait"; "au" starts at char 4
        assert_eq!(
            all_indices("café au lait", "au", MatchCase::Sensitive),
            vec![4]
        );
    }
}
