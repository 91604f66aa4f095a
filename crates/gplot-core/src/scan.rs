//! Paren-depth aware scanning.
//!
//! Both the range codec and the command grammar need to find separators that
//! sit outside any parenthesised sub-expression: `[sin(1,2);3]` splits on the
//! `;`, not on the `,` inside the call.

/// Byte offset of the first character at bracket depth zero matching `pred`.
///
/// `(` and `[` open a level, `)` and `]` close one. A stray closer does not
/// take the depth below zero.
pub fn find_top_level(text: &str, pred: impl Fn(char) -> bool) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 && pred(ch) => return Some(i),
            _ => {}
        }
    }
    None
}

/// Byte offset of the first occurrence of `needle` starting at depth zero.
pub fn find_top_level_str(text: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let mut depth = 0usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 && text[i..].starts_with(needle) => return Some(i),
            _ => {}
        }
    }
    None
}

/// Whether every bracket in `text` is closed by the matching kind, in order.
pub fn is_balanced(text: &str) -> bool {
    let mut open: Vec<char> = Vec::new();
    for ch in text.chars() {
        match ch {
            '(' | '[' => open.push(ch),
            ')' => {
                if open.pop() != Some('(') {
                    return false;
                }
            }
            ']' => {
                if open.pop() != Some('[') {
                    return false;
                }
            }
            _ => {}
        }
    }
    open.is_empty()
}

/// If `text` is entirely wrapped by one bracket pair, return what is inside.
///
/// `[1;2]` and `(1;2)` qualify; `(1)+(2)` does not because the first
/// bracket closes before the end. Mixed pairs such as `[1;2)` are accepted.
pub(crate) fn strip_enclosing(text: &str) -> Option<&str> {
    let first = text.chars().next()?;
    let last = text.chars().next_back()?;
    if !matches!(first, '(' | '[') || !matches!(last, ')' | ']') || text.len() < 2 {
        return None;
    }
    let inner = &text[1..text.len() - 1];
    let mut depth = 0i32;
    for ch in inner.chars() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            _ => {}
        }
    }
    (depth == 0).then_some(inner)
}
