//! UTF-8 safe string preview helpers.
//!
//! Provides small helpers to take the first N Unicode scalar values (chars)
//! from a string without slicing by byte index which can panic on multibyte
//! characters.

/// Return the first `n` characters of `s` as a `String`.
///
/// Used for the bounded diagnostics previews: a string longer than `n`
/// characters comes back as exactly `n` characters, with no ellipsis, so
/// preview sizes are predictable for display and copy affordances.
pub fn preview(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}
