//! Text canonicalization for case-, diacritic- and punctuation-insensitive
//! term matching. Output is only ever compared, never displayed.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::models::JobRecord;

/// Canonicalize `text` for comparison.
///
/// Lower-cases, decomposes accented characters and drops the combining
/// marks, then keeps only `a-z`, `0-9` and whitespace. Idempotent.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect()
}

/// Whether the normalized title or location contains the normalized term.
pub fn matches_term(job: &JobRecord, term: &str) -> bool {
    let needle = normalize(term);
    normalize(&job.title).contains(&needle)
        || job
            .location
            .as_deref()
            .is_some_and(|loc| normalize(loc).contains(&needle))
}
