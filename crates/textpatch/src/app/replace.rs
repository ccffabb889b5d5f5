//! Literal substring replacement.

use crate::domain::errors::PatchError;
use crate::domain::model::ReplaceMode;

/// Text produced by [`replace_literal`] and how many needles it rewrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    pub text: String,
    pub occurrences: usize,
}

/// Replace literal occurrences of `needle` in `text`.
///
/// Matching is byte-exact and non-overlapping, scanning left to right. No
/// pattern syntax is interpreted in either `needle` or `replacement`.
pub fn replace_literal(
    text: &str,
    needle: &str,
    replacement: &str,
    mode: ReplaceMode,
) -> Result<Replaced, PatchError> {
    if needle.is_empty() {
        return Err(PatchError::EmptyNeedle);
    }

    let limit = match mode {
        ReplaceMode::First => 1,
        ReplaceMode::All => usize::MAX,
    };

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut occurrences = 0;
    for (start, matched) in text.match_indices(needle).take(limit) {
        out.push_str(&text[last..start]);
        out.push_str(replacement);
        last = start + matched.len();
        occurrences += 1;
    }
    out.push_str(&text[last..]);

    Ok(Replaced {
        text: out,
        occurrences,
    })
}
