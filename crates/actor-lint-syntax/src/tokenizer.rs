//! Token classification: one pass over the file marking the byte
//! ranges occupied by comments, doc comments, and string literals.
//!
//! Everything downstream leans on this map. The structural scanner
//! works over a masked copy where quiet bytes are blanked, and the
//! rule utilities use it to discard regex matches inside comments and
//! strings.

use actor_lint_core::{ExtractError, TokenKind, TokenMap, TokenSpan};

/// Classifies `content` into a token map.
///
/// Line comments run to the end of line; `///` is a doc comment.
/// Block comments nest, as they do in the linted language; `/**`
/// opens a doc block. String literals honor backslash escapes.
///
/// # Errors
///
/// Returns an error for an unterminated string or block comment.
pub fn classify(content: &str) -> Result<TokenMap, ExtractError> {
    let bytes = content.as_bytes();
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'"' => {
                let start = pos;
                pos += 1;
                loop {
                    match bytes.get(pos) {
                        Some(b'\\') => pos += 2,
                        Some(b'"') => {
                            pos += 1;
                            break;
                        }
                        Some(b'\n') | None => {
                            return Err(ExtractError::UnterminatedString { offset: start });
                        }
                        Some(_) => pos += 1,
                    }
                }
                spans.push(TokenSpan::new(start, pos - start, TokenKind::Str));
            }
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                let start = pos;
                let kind = if bytes.get(pos + 2) == Some(&b'/') {
                    TokenKind::DocComment
                } else {
                    TokenKind::Comment
                };
                while pos < bytes.len() && bytes[pos] != b'\n' {
                    pos += 1;
                }
                spans.push(TokenSpan::new(start, pos - start, kind));
            }
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                let start = pos;
                let kind = if bytes.get(pos + 2) == Some(&b'*') {
                    TokenKind::DocComment
                } else {
                    TokenKind::Comment
                };
                pos += 2;
                let mut depth = 1usize;
                while depth > 0 {
                    match (bytes.get(pos), bytes.get(pos + 1)) {
                        (Some(b'/'), Some(b'*')) => {
                            depth += 1;
                            pos += 2;
                        }
                        (Some(b'*'), Some(b'/')) => {
                            depth -= 1;
                            pos += 2;
                        }
                        (Some(_), _) => pos += 1,
                        (None, _) => {
                            return Err(ExtractError::UnterminatedComment { offset: start });
                        }
                    }
                }
                spans.push(TokenSpan::new(start, pos - start, kind));
            }
            _ => pos += 1,
        }
    }

    Ok(TokenMap::new(spans))
}

/// Copy of `content` with every quiet byte replaced by a space,
/// newlines preserved. Byte offsets into the mask line up with the
/// original exactly.
#[must_use]
pub fn mask(content: &str, tokens: &TokenMap) -> String {
    let mut bytes = content.as_bytes().to_vec();
    for span in tokens.spans() {
        if !span.kind.is_quiet() {
            continue;
        }
        let end = (span.offset + span.length).min(bytes.len());
        for byte in &mut bytes[span.offset..end] {
            if *byte != b'\n' {
                *byte = b' ';
            }
        }
    }
    String::from_utf8(bytes).unwrap_or_else(|_| {
        // Quiet spans are replaced wholesale, so the mask stays valid
        // UTF-8; code regions are untouched.
        unreachable!("masking preserves UTF-8")
    })
}
