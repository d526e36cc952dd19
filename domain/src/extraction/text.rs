//! Low-level text helpers for pulling JSON out of chatty model output

/// Body of the first Markdown code fence, without the fence markers.
///
/// An optional language tag after the opening fence (`json`, `JSON`, ...)
/// is skipped. A fence that is never closed runs to the end of the text.
pub(crate) fn fenced_body(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after = &text[start + 3..];
    let tag_len = after
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after.len());
    let body = &after[tag_len..];
    let end = body.find("```").unwrap_or(body.len());
    Some(body[..end].trim())
}

/// Remove commas that directly precede `]` or `}` (ignoring whitespace),
/// leaving string literals untouched.
pub(crate) fn remove_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = text[i + 1..].trim_start().chars().next();
                if !matches!(next, Some(']') | Some('}')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Byte offset of the `]` that closes the `[` at `open`.
///
/// Depth counts both bracket kinds; brackets inside string literals are
/// ignored. Returns `None` when the text ends first or the nesting is broken.
pub(crate) fn matching_bracket(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[open..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return (c == ']').then_some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Opening brackets tried by [`bracketed_slices`]; each try may scan to the
/// end of the text.
pub(crate) const MAX_BRACKET_STARTS: usize = 64;

/// Balanced `[...]` slices, in order of their opening bracket, starting from
/// at most [`MAX_BRACKET_STARTS`] opening brackets.
pub(crate) fn bracketed_slices(text: &str) -> impl Iterator<Item = &str> {
    text.match_indices('[')
        .take(MAX_BRACKET_STARTS)
        .filter_map(move |(open, _)| matching_bracket(text, open).map(|close| &text[open..=close]))
}
