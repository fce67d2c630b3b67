//! Comment Stripper stage (spec §4.1).
//!
//! Replaces every comment span with spaces, leaving every other byte alone
//! and preserving the input's length exactly, so that byte offsets computed
//! by later stages still point at the original source. Grounded on the
//! `Mode`-driven character scanner in the teacher's `jsx_scanner.rs`, but
//! simplified: this stage only needs to know "am I in a comment / string /
//! JSX element" rather than the full token stream.

use crate::scan::{is_element_start, starts_with_at};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Line,
    Block,
    /// Inside a `{/* ... */}` JSX comment; the enclosing braces are blanked
    /// along with the comment body.
    JsxComment,
    Str(u8),
}

/// Strips `//`, `/* */` and `{/* */}` comments per §4.1. Never fails.
pub fn strip(input: &str) -> String {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut out = bytes.to_vec();

    let mut mode = Mode::Normal;
    let mut element_depth: i32 = 0;
    let mut js_depth: i32 = 0;
    let mut i = 0usize;

    while i < len {
        let b = bytes[i];
        match mode {
            Mode::Normal => {
                if b == b'\'' || b == b'"' || b == b'`' {
                    mode = Mode::Str(b);
                    i += 1;
                } else if b == b'{' && element_depth > 0 {
                    if starts_with_at(bytes, i, b"{/*") {
                        out[i] = b' ';
                        mode = Mode::JsxComment;
                        i += 1;
                    } else {
                        js_depth += 1;
                        i += 1;
                    }
                } else if b == b'}' && element_depth > 0 && js_depth > 0 {
                    js_depth -= 1;
                    i += 1;
                } else if b == b'/'
                    && starts_with_at(bytes, i, b"//")
                    && (element_depth == 0 || js_depth > 0)
                {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    mode = Mode::Line;
                    i += 2;
                } else if b == b'/'
                    && starts_with_at(bytes, i, b"/*")
                    && (element_depth == 0 || js_depth > 0)
                {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    mode = Mode::Block;
                    i += 2;
                } else if b == b'<' && starts_with_at(bytes, i, b"</") {
                    element_depth -= 1;
                    i += 2;
                } else if b == b'<' && is_element_start(bytes, i) {
                    element_depth += 1;
                    i += 1;
                } else if b == b'/' && starts_with_at(bytes, i, b"/>") {
                    if element_depth > 0 {
                        element_depth -= 1;
                    }
                    i += 2;
                } else {
                    i += 1;
                }
            }
            Mode::Line => {
                if b == b'\n' {
                    mode = Mode::Normal;
                    i += 1;
                } else {
                    out[i] = b' ';
                    i += 1;
                }
            }
            Mode::Block => {
                if starts_with_at(bytes, i, b"*/") {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    i += 2;
                    mode = Mode::Normal;
                } else if b == b'\n' {
                    i += 1;
                } else {
                    out[i] = b' ';
                    i += 1;
                }
            }
            Mode::JsxComment => {
                if starts_with_at(bytes, i, b"*/}") {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    out[i + 2] = b' ';
                    i += 3;
                    mode = Mode::Normal;
                } else if b == b'\n' {
                    i += 1;
                } else {
                    out[i] = b' ';
                    i += 1;
                }
            }
            Mode::Str(quote) => {
                if b == b'\\' && i + 1 < len {
                    i += 2;
                } else if b == quote {
                    mode = Mode::Normal;
                    i += 1;
                } else {
                    i += 1;
                }
            }
        }
    }

    // Bytes we touched were all ASCII (quotes, slashes, braces, newlines);
    // ASCII-transparent edits on a valid UTF-8 buffer stay valid UTF-8.
    String::from_utf8(out).expect("comment stripping only rewrites ASCII bytes")
}
