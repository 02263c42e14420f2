//! Answer consolidation for QA-SRL questions.
//!
//! Annotators frequently propose several spans for the same question
//! ("the red car", "the car"). A span whose tokens all reappear, in
//! order, inside another candidate adds no information to the
//! enumeration and is dropped. Containment is purely pairwise: an
//! answer is excluded as soon as any other answer strictly contains it,
//! with no tie-breaking (two identical answers exclude each other).

/// Check whether the tokens of `a` appear, in order, inside `b`.
///
/// Every whitespace-delimited token of `a` must map to a token of `b`
/// at strictly increasing positions; repeated tokens in `a` may reuse
/// different occurrences in `b`. This is an existence check over the
/// per-token candidate positions, exponential in the worst case, which
/// is acceptable because answers are short phrases.
///
/// # Examples
///
/// ```
/// use qa2oie::consolidate::is_token_subsequence;
///
/// assert!(is_token_subsequence("a c", "a b c"));
/// assert!(!is_token_subsequence("c a", "a b c")); // order violated
/// assert!(!is_token_subsequence("a d", "a b c")); // missing token
/// ```
#[must_use]
pub fn is_token_subsequence(a: &str, b: &str) -> bool {
    let b_tokens: Vec<&str> = b.split_whitespace().collect();

    let mut candidates: Vec<Vec<usize>> = Vec::new();
    for token in a.split_whitespace() {
        let positions: Vec<usize> = b_tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == token)
            .map(|(i, _)| i)
            .collect();
        if positions.is_empty() {
            return false;
        }
        candidates.push(positions);
    }

    increasing_combination_exists(&candidates, 0, None)
}

/// Depth-first search for one strictly increasing selection, taking one
/// position per token. Succeeds on the first hit.
fn increasing_combination_exists(
    candidates: &[Vec<usize>],
    depth: usize,
    last: Option<usize>,
) -> bool {
    if depth == candidates.len() {
        return true;
    }
    candidates[depth].iter().any(|&pos| {
        last.map_or(true, |prev| pos > prev)
            && increasing_combination_exists(candidates, depth + 1, Some(pos))
    })
}

/// Drop answer candidates that are token subsequences of another candidate.
///
/// For every ordered pair `(i, j)` with `i != j`, answer `j` is excluded
/// when its tokens form an ordered subsequence of answer `i`'s tokens.
/// Survivors keep their original order. Consolidating an already
/// consolidated list returns it unchanged.
///
/// # Examples
///
/// ```
/// use qa2oie::consolidate::consolidate_answers;
///
/// let answers = ["the red car", "the car", "a car"];
/// assert_eq!(consolidate_answers(&answers), vec!["the red car", "a car"]);
/// ```
#[must_use]
pub fn consolidate_answers<S: AsRef<str>>(answers: &[S]) -> Vec<String> {
    let mut kept = Vec::new();
    for (j, answer) in answers.iter().enumerate() {
        let redundant = answers.iter().enumerate().any(|(i, other)| {
            i != j && is_token_subsequence(answer.as_ref(), other.as_ref())
        });
        if !redundant {
            kept.push(answer.as_ref().to_string());
        }
    }
    kept
}
