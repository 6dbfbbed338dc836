//! Tokenizer for IPPcode24 source text.

/// Tokenize a single line of source text.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `#` and extend to end of line. Literal whitespace
/// and `#` inside strings must be written as escapes, so splitting on
/// whitespace is exact.
pub(crate) fn tokenize_line(line: &str) -> Vec<&str> {
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    line.split_whitespace().collect()
}

/// True if `text` is `.IPPcode24`, in any letter case.
pub(crate) fn is_header(text: &str) -> bool {
    text.eq_ignore_ascii_case(".IPPcode24")
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || "_-$&%*!?".contains(c)
}

/// Label and variable names: a letter or one of `_-$&%*!?`, then the same
/// set plus digits.
pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => {
            chars.all(|c| is_identifier_start(c) || c.is_ascii_digit())
        }
        _ => false,
    }
}

/// Every backslash in a string literal starts a three-digit escape.
pub(crate) fn has_valid_escapes(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            let digits = bytes.get(i + 1..i + 4);
            if !digits.is_some_and(|d| d.iter().all(u8::is_ascii_digit)) {
                return false;
            }
            i += 4;
        } else {
            i += 1;
        }
    }
    true
}
