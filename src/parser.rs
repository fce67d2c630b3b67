//! Parser stage (spec §4.3): turns the flat token stream into a [`Program`].
//! Grounded on the teacher's own `jsx_parser/parser.rs` recursive-descent
//! shape, but driven off this crate's token kinds instead of the teacher's
//! character-level `JSXNode` builder.

use crate::ast::{Child, Element, MixedFragment, Node, Program, Prop, PropValue};
use crate::error::{CompileError, CompileErrorKind, CompileResult};
use crate::token::{Token, TokenKind};

/// Parses `tokens` (produced by [`crate::lexer::tokenize`] over `input`)
/// into a [`Program`]. `pragma_frag` is substituted for any fragment
/// (`<>...</>`) element name, per the data model's invariant 2.
pub fn parse(tokens: &[Token], input: &str, pragma_frag: &str) -> CompileResult<Program> {
    check_balanced(tokens)?;

    let mut parser = Parser {
        tokens,
        input,
        pragma_frag,
        pos: 0,
    };
    let mut body = Vec::new();
    while parser.pos < parser.tokens.len() {
        body.push(parser.walk_top_level()?);
    }
    Ok(Program { body })
}

fn check_balanced(tokens: &[Token]) -> CompileResult<()> {
    let starts = tokens.iter().filter(|t| t.kind == TokenKind::EStart).count();
    let ends = tokens.iter().filter(|t| t.kind == TokenKind::EEnd).count();
    if starts != ends {
        return Err(CompileError::without_position(
            CompileErrorKind::ParserUnbalanced,
            "unbalanced elements",
        ));
    }
    Ok(())
}

struct Parser<'a> {
    tokens: &'a [Token],
    input: &'a str,
    pragma_frag: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn order_err(&self, token: &Token, expected: &str) -> CompileError {
        let pos = token.pos.unwrap_or(self.input.len());
        CompileError::at(
            self.input,
            pos,
            CompileErrorKind::ParserOrder,
            format!("unexpected token {} ({expected})", token.kind),
        )
    }

    /// Top-level `walk`: a program body node is either a bare JS chunk or a
    /// whole element.
    fn walk_top_level(&mut self) -> CompileResult<Node> {
        let token = self
            .peek()
            .expect("walk_top_level called with no tokens remaining")
            .clone();
        match token.kind {
            TokenKind::Js => {
                self.pos += 1;
                Ok(Node::JsChunk(token.value))
            }
            TokenKind::EStart => {
                let el = self.parse_element(0)?;
                Ok(Node::Element(el))
            }
            _ => Err(self.order_err(&token, "expected JS or E_START")),
        }
    }

    /// Parses one element starting at the current `E_START` token, through
    /// its matching `E_END`, at nesting `depth`.
    fn parse_element(&mut self, depth: usize) -> CompileResult<Element> {
        let start = self.peek().expect("parse_element requires E_START").clone();
        debug_assert_eq!(start.kind, TokenKind::EStart);
        self.pos += 1;

        let opening_name = start.value.trim_start_matches('<').to_string();
        let (name, is_class) = if opening_name.is_empty() {
            (self.pragma_frag.to_string(), true)
        } else {
            let is_class = opening_name
                .starts_with(|c: char| c.is_ascii_uppercase())
                || opening_name.contains('.');
            (opening_name.clone(), is_class)
        };

        let mut props = Vec::new();
        let mut children = Vec::new();

        loop {
            let token = self
                .peek()
                .ok_or_else(|| {
                    CompileError::at(
                        self.input,
                        self.input.len(),
                        CompileErrorKind::ParserOrder,
                        "unexpected end of tokens inside element",
                    )
                })?
                .clone();

            match token.kind {
                TokenKind::EEnd => {
                    self.pos += 1;
                    self.validate_close(&token, &opening_name)?;
                    break;
                }
                TokenKind::EProp => {
                    self.pos += 1;
                    props.push(self.parse_prop(token, depth)?);
                }
                TokenKind::EChildText => {
                    self.pos += 1;
                    children.push(Child::Text(token.value));
                }
                TokenKind::EChildWhitespace => {
                    self.pos += 1;
                    children.push(Child::Whitespace(token.value));
                }
                TokenKind::EChildJs => {
                    self.pos += 1;
                    children.push(Child::Js(strip_braces(&token.value)));
                }
                TokenKind::Js => {
                    self.pos += 1;
                    children.push(Child::Js(token.value));
                }
                TokenKind::EStart => {
                    let child_el = self.parse_element(depth + 1)?;
                    children.push(Child::Element(child_el));
                }
                TokenKind::EChildJsStart => {
                    let fragments = self.parse_mixed(depth)?;
                    children.push(Child::Mixed(fragments));
                }
                TokenKind::EValue | TokenKind::EChildJsEnd => {
                    return Err(self.order_err(&token, "not valid at element-body position"));
                }
            }
        }

        Ok(Element {
            name,
            is_class,
            props,
            children,
            depth,
        })
    }

    /// `closing_token` is the `E_END` that just closed `opening_name`;
    /// validates the name matches when the closing text names one at all
    /// (self-closing `/>` carries no name to check).
    fn validate_close(&self, closing_token: &Token, opening_name: &str) -> CompileResult<()> {
        let text = closing_token.value.as_str();
        if text == "/>" {
            return Ok(());
        }
        let closing_name = text.trim_start_matches("</").trim_end_matches('>').trim();
        if !closing_name.is_empty() && closing_name != opening_name {
            let pos = closing_token.pos.unwrap_or(self.input.len());
            return Err(CompileError::at(
                self.input,
                pos,
                CompileErrorKind::ParserMismatch,
                format!("mismatched tags: expected </{opening_name}>, found {text}"),
            ));
        }
        Ok(())
    }

    fn parse_prop(&mut self, prop_token: Token, depth: usize) -> CompileResult<Prop> {
        if prop_token.value.starts_with("{...") {
            return Ok(Prop {
                name: prop_token.value,
                value: None,
            });
        }

        let value = match self.peek() {
            Some(t) if t.kind == TokenKind::EValue => {
                let value_tok = t.clone();
                self.pos += 1;
                Some(parse_prop_value_token(&value_tok.value))
            }
            Some(t) if t.kind == TokenKind::EStart => {
                let nested = self.parse_element(depth + 1)?;
                Some(PropValue::Element(Box::new(nested)))
            }
            Some(t) if t.kind == TokenKind::EChildJsStart => {
                let fragments = self.parse_mixed(depth)?;
                Some(PropValue::Mixed(fragments))
            }
            _ => None,
        };

        Ok(Prop {
            name: prop_token.value,
            value,
        })
    }

    /// Collects an `E_CHILD_JS_START` / nested-element / `E_CHILD_JS_END`
    /// run into an ordered list of JS-and-element fragments, per §4.3's
    /// `startingToken = E_CHILD_JS_START` delegation.
    fn parse_mixed(&mut self, depth: usize) -> CompileResult<Vec<MixedFragment>> {
        let start = self
            .peek()
            .expect("parse_mixed requires E_CHILD_JS_START")
            .clone();
        debug_assert_eq!(start.kind, TokenKind::EChildJsStart);
        self.pos += 1;

        let mut fragments = vec![MixedFragment::Js(strip_leading_brace(&start.value))];
        loop {
            let token = self
                .peek()
                .ok_or_else(|| {
                    CompileError::at(
                        self.input,
                        self.input.len(),
                        CompileErrorKind::ParserOrder,
                        "unterminated child expression",
                    )
                })?
                .clone();
            match token.kind {
                TokenKind::EStart => {
                    let el = self.parse_element(depth + 1)?;
                    fragments.push(MixedFragment::Element(el));
                }
                TokenKind::EChildJsEnd => {
                    self.pos += 1;
                    fragments.push(MixedFragment::Js(strip_trailing_brace(&token.value)));
                    break;
                }
                _ => return Err(self.order_err(&token, "expected E_START or E_CHILD_JS_END")),
            }
        }
        Ok(fragments)
    }
}

fn strip_braces(s: &str) -> String {
    strip_trailing_brace(&strip_leading_brace(s))
}

fn strip_leading_brace(s: &str) -> String {
    s.strip_prefix('{').unwrap_or(s).to_string()
}

fn strip_trailing_brace(s: &str) -> String {
    s.strip_suffix('}').unwrap_or(s).to_string()
}

/// `E_VALUE` tokens carry either an already JSON-encoded string literal
/// (quotes included, emitted verbatim by codegen) or a `{ ... }`-wrapped JS
/// expression (braces stripped here, trimmed).
fn parse_prop_value_token(value: &str) -> PropValue {
    if value.starts_with('"') {
        PropValue::LiteralString(value.to_string())
    } else {
        PropValue::JsExpression(strip_braces(value).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_str(src: &str) -> Program {
        let tokens = tokenize(src, 1000).unwrap();
        parse(&tokens, src, "React.Fragment").unwrap()
    }

    #[test]
    fn simple_element_with_prop_and_text() {
        let program = parse_str(r#"const x = <div id="a">hi</div>;"#);
        assert_eq!(program.body.len(), 2);
        match &program.body[1] {
            Node::Element(el) => {
                assert_eq!(el.name, "div");
                assert!(!el.is_class);
                assert_eq!(el.props.len(), 1);
                assert_eq!(el.props[0].name, "id");
                assert_eq!(
                    el.props[0].value,
                    Some(PropValue::LiteralString("\"a\"".to_string()))
                );
                assert_eq!(el.children, vec![Child::Text("hi".to_string())]);
            }
            other => panic!("expected Element, got {other:?}"),
        }
    }

    #[test]
    fn fragment_uses_pragma_frag_name() {
        let program = parse_str("<><span/></>");
        match &program.body[0] {
            Node::Element(el) => {
                assert_eq!(el.name, "React.Fragment");
                assert!(el.is_class);
                assert_eq!(el.children.len(), 1);
            }
            other => panic!("expected Element, got {other:?}"),
        }
    }

    #[test]
    fn bare_attribute_has_no_value() {
        let program = parse_str("<input disabled/>");
        match &program.body[0] {
            Node::Element(el) => {
                assert_eq!(el.props[0].name, "disabled");
                assert_eq!(el.props[0].value, None);
            }
            other => panic!("expected Element, got {other:?}"),
        }
    }

    #[test]
    fn spread_prop_has_no_value() {
        let program = parse_str("<div {...rest}/>");
        match &program.body[0] {
            Node::Element(el) => {
                assert_eq!(el.props[0].name, "{...rest}");
                assert_eq!(el.props[0].value, None);
            }
            other => panic!("expected Element, got {other:?}"),
        }
    }

    #[test]
    fn nested_element_in_child_expression_becomes_mixed() {
        let program = parse_str("<ul>{items.map(i => <li key={i}>{i}</li>)}</ul>");
        match &program.body[0] {
            Node::Element(ul) => {
                assert_eq!(ul.children.len(), 1);
                match &ul.children[0] {
                    Child::Mixed(fragments) => {
                        assert_eq!(fragments.len(), 3);
                        match &fragments[1] {
                            MixedFragment::Element(li) => assert_eq!(li.name, "li"),
                            other => panic!("expected nested element, got {other:?}"),
                        }
                    }
                    other => panic!("expected Mixed child, got {other:?}"),
                }
            }
            other => panic!("expected Element, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_closing_tag_is_an_error() {
        let tokens = tokenize("<div>hi</span>", 1000).unwrap();
        let err = parse(&tokens, "<div>hi</span>", "React.Fragment").unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::ParserMismatch);
    }

    #[test]
    fn closing_tag_with_trailing_space_before_gt_is_accepted() {
        let src = "<div>hi</div >";
        let tokens = tokenize(src, 1000).unwrap();
        let program = parse(&tokens, src, "React.Fragment").unwrap();
        match &program.body[0] {
            Node::Element(div) => assert_eq!(div.name, "div"),
            other => panic!("expected Element, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_element_is_unbalanced_not_a_lexer_error() {
        let tokens = tokenize("const a = <div>hi;", 1000).unwrap();
        let err = parse(&tokens, "const a = <div>hi;", "React.Fragment").unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::ParserUnbalanced);
    }

    #[test]
    fn depth_is_stamped_on_nested_elements() {
        let program = parse_str("<div><span/></div>");
        match &program.body[0] {
            Node::Element(div) => {
                assert_eq!(div.depth, 0);
                match &div.children[0] {
                    Child::Element(span) => assert_eq!(span.depth, 1),
                    other => panic!("expected nested element, got {other:?}"),
                }
            }
            other => panic!("expected Element, got {other:?}"),
        }
    }
}
