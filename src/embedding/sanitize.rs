//! Input normalization applied before tokenization.

use crate::constants::{MAX_INPUT_CHARS, TAB_WIDTH};

/// Canonicalizes raw source text.
///
/// Tabs become four spaces, `\r\n` and bare `\r` become `\n`, and the result is
/// cut to the first [`MAX_INPUT_CHARS`] characters. Truncation counts Unicode
/// scalar values and never splits a character; it does not look for token or
/// line boundaries.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len().min(MAX_INPUT_CHARS * 4));
    let mut count = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\t' => {
                for _ in 0..TAB_WIDTH {
                    if count == MAX_INPUT_CHARS {
                        return out;
                    }
                    out.push(' ');
                    count += 1;
                }
                continue;
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if count == MAX_INPUT_CHARS {
                    return out;
                }
                out.push('\n');
            }
            other => {
                if count == MAX_INPUT_CHARS {
                    return out;
                }
                out.push(other);
            }
        }
        count += 1;
    }

    out
}
