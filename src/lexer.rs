//! Lexer stage (spec §4.2): turns comment-stripped source into a flat token
//! stream. Per-element scanning state lives on the call stack via recursion
//! (`tokenize_element` calls itself for nested elements), the way §9's
//! re-architecting note describes replacing the source project's shared
//! mutable per-tag object with an explicit stack of frames — here the frames
//! are just Rust stack frames.

use crate::error::{CompileError, CompileErrorKind, CompileResult};
use crate::scan::{is_element_start, is_tag_name_char, starts_with_at};
use crate::token::{Token, TokenKind};

/// Scans `input` (already comment-stripped) into an ordered token stream.
/// `max_recursive_calls` bounds nested-element recursion depth; a generous
/// iteration budget derived from `input`'s length guards against the
/// scanner's cursor getting stuck.
pub fn tokenize(input: &str, max_recursive_calls: usize) -> CompileResult<Vec<Token>> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut lexer = Lexer {
        input,
        bytes,
        max_recursive_calls,
        recursion_calls: 0,
        iter_count: 0,
        iter_limit: (len + 64) * 8,
    };
    let mut tokens = Vec::new();
    let mut current = 0usize;

    loop {
        lexer.tick(current)?;
        match next_element_pos(bytes, current) {
            Some(pos) => {
                if pos > current {
                    tokens.push(Token::new(TokenKind::Js, &input[current..pos], pos));
                }
                current = lexer.tokenize_element(&mut tokens, pos)?;
            }
            None => {
                if current < len {
                    tokens.push(Token::new(TokenKind::Js, &input[current..], len));
                }
                break;
            }
        }
    }

    log::trace!(
        "tokenize: {} tokens, {} nested element(s)",
        tokens.len(),
        lexer.recursion_calls
    );
    Ok(tokens)
}

/// Finds the next byte offset at which a JSX element begins, honoring
/// string state so that `<` inside a string literal is never mistaken for
/// one (per §4.1's element-detection rule, reused here verbatim).
fn next_element_pos(bytes: &[u8], from: usize) -> Option<usize> {
    let len = bytes.len();
    let mut i = from;
    let mut in_str: Option<u8> = None;

    while i < len {
        if let Some(quote) = in_str {
            if bytes[i] == b'\\' && i + 1 < len {
                i += 2;
                continue;
            }
            if bytes[i] == quote {
                in_str = None;
            }
            i += 1;
            continue;
        }
        match bytes[i] {
            b'\'' | b'"' | b'`' => {
                in_str = Some(bytes[i]);
                i += 1;
            }
            b'<' if is_element_start(bytes, i) => return Some(i),
            _ => i += 1,
        }
    }
    None
}

struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    max_recursive_calls: usize,
    recursion_calls: usize,
    iter_count: usize,
    iter_limit: usize,
}

impl<'a> Lexer<'a> {
    fn tick(&mut self, pos: usize) -> CompileResult<()> {
        self.iter_count += 1;
        if self.iter_count > self.iter_limit {
            return Err(self.runtime_err(pos, "iteration limit exceeded"));
        }
        Ok(())
    }

    fn enter_recursion(&mut self, pos: usize) -> CompileResult<()> {
        self.recursion_calls += 1;
        if self.recursion_calls > self.max_recursive_calls {
            return Err(self.runtime_err(pos, "recursion limit exceeded"));
        }
        Ok(())
    }

    fn runtime_err(&self, pos: usize, reason: &str) -> CompileError {
        CompileError::at(self.input, pos.min(self.input.len()), CompileErrorKind::LexerRuntime, reason)
    }

    fn syntax_err(&self, pos: usize, reason: &str) -> CompileError {
        CompileError::at(self.input, pos.min(self.input.len()), CompileErrorKind::LexerSyntax, reason)
    }

    /// Scans one element starting at `pos` (the index of its `<`), pushing
    /// tokens for it (and, recursively, any element nested inside an
    /// attribute value or child expression) into `tokens`. Returns the byte
    /// offset just past the element's close.
    fn tokenize_element(&mut self, tokens: &mut Vec<Token>, pos: usize) -> CompileResult<usize> {
        self.enter_recursion(pos)?;
        let bytes = self.bytes;
        let input = self.input;
        let len = bytes.len();

        let mut i = pos + 1;
        while i < len && is_tag_name_char(bytes[i]) {
            i += 1;
        }
        tokens.push(Token::new(TokenKind::EStart, &input[pos..i], i));
        let cursor = i;

        match self.attribute_loop(tokens, cursor)? {
            AttrLoopEnd::SelfClosed(end) => Ok(end),
            AttrLoopEnd::OpeningTagDone(end) => self.children_loop(tokens, end),
        }
    }

    /// Scans the opening tag's attributes. Returns `OpeningTagDone` once the
    /// `>` is consumed (children follow), or `SelfClosed` if a `/>` ended
    /// the element before any children loop would run.
    fn attribute_loop(&mut self, tokens: &mut Vec<Token>, mut cursor: usize) -> CompileResult<AttrLoopEnd> {
        let bytes = self.bytes;
        let input = self.input;
        let len = bytes.len();

        loop {
            self.tick(cursor)?;
            while cursor < len && bytes[cursor].is_ascii_whitespace() {
                cursor += 1;
            }
            if cursor >= len {
                return Err(self.syntax_err(cursor, "unterminated opening tag"));
            }

            match bytes[cursor] {
                b'/' => {
                    if starts_with_at(bytes, cursor, b"/>") {
                        // Self-closing `E_END` carries no position of its own
                        // per the data model's invariant 3.
                        tokens.push(Token::without_pos(TokenKind::EEnd, "/>"));
                        return Ok(AttrLoopEnd::SelfClosed(cursor + 2));
                    }
                    return Err(self.syntax_err(cursor, "stray '/' in opening tag"));
                }
                b'>' => return Ok(AttrLoopEnd::OpeningTagDone(cursor + 1)),
                b'{' => {
                    if starts_with_at(bytes, cursor, b"{...") {
                        let (text, end) = self.scan_balanced(cursor)?;
                        tokens.push(Token::new(TokenKind::EProp, text, end));
                        cursor = end;
                    } else {
                        return Err(self.syntax_err(cursor, "unexpected '{' in attribute position"));
                    }
                }
                _ => {
                    let name_start = cursor;
                    while cursor < len
                        && !matches!(bytes[cursor], b' ' | b'\t' | b'\n' | b'\r' | b'=' | b'/' | b'>')
                    {
                        cursor += 1;
                    }
                    if cursor == name_start {
                        return Err(self.syntax_err(cursor, "unhandled character in attribute position"));
                    }
                    tokens.push(Token::new(TokenKind::EProp, &input[name_start..cursor], cursor));

                    if cursor < len && bytes[cursor] == b'=' {
                        cursor += 1;
                        match bytes.get(cursor) {
                            Some(b'"') | Some(b'\'') => {
                                let (value, end) = self.scan_quoted_string(cursor)?;
                                let json = serde_json::to_string(&value)
                                    .expect("String serialization never fails");
                                tokens.push(Token::new(TokenKind::EValue, json, end));
                                cursor = end;
                            }
                            Some(b'{') => {
                                cursor = self.scan_brace_expr(tokens, cursor, TokenKind::EValue)?;
                            }
                            _ => return Err(self.syntax_err(cursor, "expected attribute value after '='")),
                        }
                    }
                }
            }
        }
    }

    fn children_loop(&mut self, tokens: &mut Vec<Token>, mut cursor: usize) -> CompileResult<usize> {
        let bytes = self.bytes;
        let input = self.input;
        let len = bytes.len();

        loop {
            self.tick(cursor)?;
            if cursor >= len {
                // No closing tag before end of input: leave this element's
                // `E_START` without a matching `E_END` rather than failing
                // here, so the parser's own start/end count check is what
                // surfaces this as `ParserUnbalanced` (spec §4.3/§7/§9).
                return Ok(cursor);
            }

            if bytes[cursor] == b'<' && starts_with_at(bytes, cursor, b"</") {
                let tag_start = cursor + 2;
                let mut j = tag_start;
                while j < len && is_tag_name_char(bytes[j]) {
                    j += 1;
                }
                let mut k = j;
                while k < len && bytes[k].is_ascii_whitespace() {
                    k += 1;
                }
                if k >= len || bytes[k] != b'>' {
                    return Err(self.syntax_err(k.min(len.saturating_sub(1)), "expected '>' to close tag"));
                }
                tokens.push(Token::new(TokenKind::EEnd, &input[cursor..=k], k + 1));
                return Ok(k + 1);
            }

            if bytes[cursor] == b'<' && is_element_start(bytes, cursor) {
                cursor = self.tokenize_element(tokens, cursor)?;
                continue;
            }

            if bytes[cursor] == b'{' {
                cursor = self.scan_brace_expr(tokens, cursor, TokenKind::EChildJs)?;
                continue;
            }

            let text_start = cursor;
            while cursor < len {
                let b = bytes[cursor];
                if b == b'{' {
                    break;
                }
                if b == b'<' && (starts_with_at(bytes, cursor, b"</") || is_element_start(bytes, cursor)) {
                    break;
                }
                cursor += 1;
                self.tick(cursor)?;
            }
            if cursor > text_start {
                let raw = &input[text_start..cursor];
                let kind = if raw.chars().all(char::is_whitespace) {
                    TokenKind::EChildWhitespace
                } else {
                    TokenKind::EChildText
                };
                tokens.push(Token::new(kind, raw, cursor));
            } else {
                // A stray `<` that is neither a closing tag nor a valid
                // element start (fails `isExpression`); keep it as a single
                // character of text so the cursor always advances.
                tokens.push(Token::new(TokenKind::EChildText, &input[cursor..cursor + 1], cursor + 1));
                cursor += 1;
            }
        }
    }

    /// Scans a quoted attribute value starting at the opening quote,
    /// returning its unescaped content and the offset just past the closing
    /// quote.
    fn scan_quoted_string(&mut self, open: usize) -> CompileResult<(String, usize)> {
        let bytes = self.bytes;
        let input = self.input;
        let len = bytes.len();
        let quote = bytes[open];
        let mut i = open + 1;
        let content_start = i;

        loop {
            self.tick(i)?;
            if i >= len {
                return Err(self.syntax_err(i, "unterminated attribute string"));
            }
            if bytes[i] == b'\\' && i + 1 < len {
                i += 2;
                continue;
            }
            if bytes[i] == quote {
                break;
            }
            i += 1;
        }

        let raw = &input[content_start..i];
        Ok((unescape_js_string(raw), i + 1))
    }

    /// Scans a balanced `{ ... }` span (used for `{...spread}` prop names),
    /// honoring string literals inside but not nested elements. Returns the
    /// full `{...}` text and the offset just past the closing brace.
    fn scan_balanced(&mut self, open: usize) -> CompileResult<(String, usize)> {
        let bytes = self.bytes;
        let input = self.input;
        let len = bytes.len();
        let mut depth = 1i32;
        let mut i = open + 1;
        let mut in_str: Option<u8> = None;

        loop {
            self.tick(i)?;
            if i >= len {
                return Err(self.syntax_err(i, "unterminated expression"));
            }
            if let Some(q) = in_str {
                if bytes[i] == b'\\' && i + 1 < len {
                    i += 2;
                    continue;
                }
                if bytes[i] == q {
                    in_str = None;
                }
                i += 1;
                continue;
            }
            match bytes[i] {
                b'\'' | b'"' | b'`' => {
                    in_str = Some(bytes[i]);
                    i += 1;
                }
                b'{' => {
                    depth += 1;
                    i += 1;
                }
                b'}' => {
                    depth -= 1;
                    i += 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => i += 1,
            }
        }
        Ok((input[open..i].to_string(), i))
    }

    /// Scans a `{ ... }` JS expression, splitting it around any nested
    /// element found at the expression's own depth (per §4.2's
    /// `E_CHILD_JS_START`/`E_CHILD_JS_END` rule for both attribute values
    /// and children). When no nested element is found, pushes a single
    /// token of `whole_kind` spanning the entire `{ ... }`. Returns the
    /// offset just past the closing brace.
    fn scan_brace_expr(
        &mut self,
        tokens: &mut Vec<Token>,
        open: usize,
        whole_kind: TokenKind,
    ) -> CompileResult<usize> {
        let bytes = self.bytes;
        let input = self.input;
        let len = bytes.len();
        let mut depth = 1i32;
        let mut i = open + 1;
        let mut in_str: Option<u8> = None;
        let mut seg_start = open;
        let mut had_nested = false;

        loop {
            self.tick(i)?;
            if i >= len {
                return Err(self.syntax_err(i, "unterminated expression"));
            }
            if let Some(q) = in_str {
                if bytes[i] == b'\\' && i + 1 < len {
                    i += 2;
                    continue;
                }
                if bytes[i] == q {
                    in_str = None;
                }
                i += 1;
                continue;
            }
            match bytes[i] {
                b'\'' | b'"' | b'`' => {
                    in_str = Some(bytes[i]);
                    i += 1;
                }
                b'{' => {
                    depth += 1;
                    i += 1;
                }
                b'}' => {
                    depth -= 1;
                    i += 1;
                    if depth == 0 {
                        break;
                    }
                }
                b'<' if depth == 1 && is_element_start(bytes, i) => {
                    tokens.push(Token::new(TokenKind::EChildJsStart, &input[seg_start..i], i));
                    had_nested = true;
                    let next = self.tokenize_element(tokens, i)?;
                    seg_start = next;
                    i = next;
                }
                _ => i += 1,
            }
        }

        if had_nested {
            tokens.push(Token::new(TokenKind::EChildJsEnd, &input[seg_start..i], i));
        } else {
            tokens.push(Token::new(whole_kind, &input[open..i], i));
        }
        Ok(i)
    }
}

/// Outcome of scanning an opening tag's attribute list.
enum AttrLoopEnd {
    /// A self-closing `/>` ended the element; carries the offset just past it.
    SelfClosed(usize),
    /// The opening tag's `>` was consumed; carries the offset just past it.
    OpeningTagDone(usize),
}

fn unescape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some('\'') => out.push('\''),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn simple_element_with_text_child() {
        let toks = tokenize(r#"const x = <div id="a">hi</div>;"#, 1000).unwrap();
        assert_eq!(
            kinds(&toks),
            vec![
                TokenKind::Js,
                TokenKind::EStart,
                TokenKind::EProp,
                TokenKind::EValue,
                TokenKind::EChildText,
                TokenKind::EEnd,
                TokenKind::Js,
            ]
        );
        assert_eq!(toks[3].value, "\"a\"");
    }

    #[test]
    fn self_closing_at_end_of_input() {
        let toks = tokenize("const a = <br/>", 1000).unwrap();
        let last_two: Vec<_> = kinds(&toks).into_iter().rev().take(2).collect();
        assert_eq!(last_two, vec![TokenKind::EEnd, TokenKind::EStart]);
    }

    #[test]
    fn bare_attribute_has_no_value_token() {
        let toks = tokenize("<input disabled/>", 1000).unwrap();
        assert_eq!(
            kinds(&toks),
            vec![TokenKind::EStart, TokenKind::EProp, TokenKind::EEnd]
        );
    }

    #[test]
    fn spread_attribute_is_one_prop_token() {
        let toks = tokenize("<div {...rest}/>", 1000).unwrap();
        assert_eq!(
            kinds(&toks),
            vec![TokenKind::EStart, TokenKind::EProp, TokenKind::EEnd]
        );
        assert_eq!(toks[1].value, "{...rest}");
    }

    #[test]
    fn nested_element_inside_child_expression() {
        let toks = tokenize("<ul>{items.map(i => <li key={i}>{i}</li>)}</ul>", 1000).unwrap();
        assert!(kinds(&toks).contains(&TokenKind::EChildJsStart));
        assert!(kinds(&toks).contains(&TokenKind::EChildJsEnd));
    }

    #[test]
    fn fragment_tokenizes_with_empty_name() {
        let toks = tokenize("<><span/></>", 1000).unwrap();
        assert_eq!(toks[0].kind, TokenKind::EStart);
        assert_eq!(toks[0].value, "<");
    }

    #[test]
    fn ternary_with_lt_stays_one_js_token() {
        let toks = tokenize("let c = a<b?c:d;", 1000).unwrap();
        assert_eq!(kinds(&toks), vec![TokenKind::Js]);
    }

    #[test]
    fn recursion_limit_is_enforced() {
        let deeply_nested = "<a>".repeat(50) + &"</a>".repeat(50);
        let err = tokenize(&deeply_nested, 10).unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::LexerRuntime);
    }
}
