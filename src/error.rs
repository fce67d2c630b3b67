//! Error taxonomy for the compiler pipeline.
//!
//! The distilled spec describes errors as *kinds, not types*: every stage can
//! fail, but callers only ever see one [`CompileError`] whose `Display` impl
//! renders the exact `<reason> at Line #: L, Column #: C, Line: <text>` shape
//! (or, for the one error that has no reliable offset, just `<reason>`).

use std::fmt;

/// Which stage raised the error, kept around for callers that want to
/// `match` on it instead of parsing the rendered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorKind {
    /// Endless-loop or recursion-limit tripwire in the lexer.
    LexerRuntime,
    /// Unrecognized character sequence inside an opening tag, or a stray `/`
    /// not followed by `>`.
    LexerSyntax,
    /// A closing tag's name does not match the opening tag's name.
    ParserMismatch,
    /// `E_START` and `E_END` counts disagree at end of input.
    ParserUnbalanced,
    /// The parser's `walk` encountered a token kind it did not expect.
    ParserOrder,
    /// The code generator encountered an AST node or child kind it does not
    /// know how to emit.
    CodegenUnhandled,
}

impl fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LexerRuntime => "lexer runtime error",
            Self::LexerSyntax => "lexer syntax error",
            Self::ParserMismatch => "mismatched tags",
            Self::ParserUnbalanced => "unbalanced elements",
            Self::ParserOrder => "unexpected token",
            Self::CodegenUnhandled => "unhandled node",
        };
        f.write_str(s)
    }
}

/// The one error type `compile` can return.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CompileError {
    pub kind: CompileErrorKind,
    message: String,
    /// Byte offset the error was raised at, when one is known.
    pub position: Option<usize>,
}

impl CompileError {
    /// Build an error positioned at a byte offset into `source`, formatting
    /// the message as `<reason> at Line #: L, Column #: C, Line: <text>`.
    pub fn at(source: &str, pos: usize, kind: CompileErrorKind, reason: impl fmt::Display) -> Self {
        let (line, column, line_text) = locate(source, pos);
        let message = format!(
            "{reason} at Line #: {line}, Column #: {column}, Line: {line_text}"
        );
        log::debug!("compile error at byte {pos} ({line}:{column}): {reason}");
        Self {
            kind,
            message,
            position: Some(pos),
        }
    }

    /// Build an error with no reliable byte offset (only `ParserUnbalanced`
    /// uses this today).
    pub fn without_position(kind: CompileErrorKind, reason: impl fmt::Display) -> Self {
        log::debug!("compile error without position: {reason}");
        Self {
            kind,
            message: reason.to_string(),
            position: None,
        }
    }
}

/// Computes the 1-based line, 1-based column, and trimmed line text for a
/// byte offset into `source`.
fn locate(source: &str, pos: usize) -> (usize, usize, String) {
    let pos = pos.min(source.len());
    let before = &source[..pos];
    let line = before.bytes().filter(|&b| b == b'\n').count() + 1;

    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = pos - line_start + 1;

    let after = &source[pos..];
    let line_end = after.find('\n').map(|i| pos + i).unwrap_or(source.len());
    let line_text = source[line_start..line_end].trim().to_string();

    (line, column, line_text)
}

pub type CompileResult<T> = Result<T, CompileError>;
