// ==============================================================================
// generators/list.rs - English List Joining
// ==============================================================================
// Description: Joins field pieces into "a, b and c" style phrases
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Rule:
//   0 pieces  → ""
//   1 piece   → "a"
//   2 pieces  → "a <conj> b"
//   3+ pieces → all but the last joined by the separator, then " <conj> last"
//               (no Oxford comma: "a,b and c" for separator ",")
// ==============================================================================

/// Join pieces with the English list rule
///
/// # Examples
/// ```
/// use line_template::generators::join_list;
///
/// assert_eq!(join_list::<&str>(&[], "and", ", "), "");
/// assert_eq!(join_list(&["x"], "and", ", "), "x");
/// assert_eq!(join_list(&["x", "y"], "and", ", "), "x and y");
/// assert_eq!(join_list(&["x", "y", "z"], "or", ", "), "x, y or z");
/// ```
pub fn join_list<S: AsRef<str>>(pieces: &[S], conjunction: &str, separator: &str) -> String {
    match pieces {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} {} {}", first.as_ref(), conjunction, second.as_ref()),
        [head @ .., last] => {
            let mut out = String::with_capacity(
                pieces.iter().map(|p| p.as_ref().len() + separator.len()).sum::<usize>()
                    + conjunction.len()
                    + 2,
            );
            for (i, piece) in head.iter().enumerate() {
                if i > 0 {
                    out.push_str(separator);
                }
                out.push_str(piece.as_ref());
            }
            out.push(' ');
            out.push_str(conjunction);
            out.push(' ');
            out.push_str(last.as_ref());
            out
        }
    }
}

/// Split a field value on a literal separator and join it as a list
///
/// The separator is matched as a whole string, so multi-character tokens
/// such as `" ## "` split exactly where they appear. Empty pieces left by a
/// leading, trailing or doubled separator are dropped, so an empty value or a
/// bare separator has no pieces.
pub fn split_and_join(value: &str, conjunction: &str, separator: &str) -> String {
    if separator.is_empty() {
        return value.to_string();
    }
    let pieces: Vec<&str> = value
        .split(separator)
        .filter(|piece| !piece.is_empty())
        .collect();
    join_list(&pieces, conjunction, separator)
}
