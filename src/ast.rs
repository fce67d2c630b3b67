//! AST produced by the parser (spec §3).

/// Top-level parse result: a flat list of sibling nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Node>,
}

/// One of the three node shapes the parser ever produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A span of raw JavaScript, copied verbatim by the code generator.
    JsChunk(String),
    /// A JSX element (or fragment, when `name` is empty) rewritten to a
    /// pragma call.
    Element(Element),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Empty for a fragment (`<>...</>`), which the code generator rewrites
    /// to the configured fragment pragma instead of a quoted name.
    pub name: String,
    /// True iff `name` starts with an uppercase ASCII letter or contains a
    /// `.` (member access) — an HTML tag otherwise.
    pub is_class: bool,
    pub props: Vec<Prop>,
    pub children: Vec<Child>,
    /// Nesting depth, stamped by the parser so the code generator can
    /// pretty-print without re-deriving it.
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub name: String,
    pub value: Option<PropValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// A JSON-encoded string literal token straight from the lexer (already
    /// quoted).
    LiteralString(String),
    /// Raw JS expression text, emitted verbatim.
    JsExpression(String),
    /// A nested element used as a prop value.
    Element(Box<Element>),
    /// A `{...}` expression containing a nested element: JS-and-element
    /// fragments in source order (`items.map(i => <li/>)`-style content
    /// used as a prop value).
    Mixed(Vec<MixedFragment>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    /// Raw JS, copied verbatim (covers `E_CHILD_JS` after its enclosing
    /// braces are stripped, and any top-level `JsChunk` appearing as a
    /// child of the element's own token run).
    Js(String),
    /// Non-whitespace literal text.
    Text(String),
    /// A run of whitespace between children.
    Whitespace(String),
    /// A nested element.
    Element(Element),
    /// JS-and-element fragments produced by an `E_CHILD_JS_START` /
    /// nested-element / `E_CHILD_JS_END` run.
    Mixed(Vec<MixedFragment>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MixedFragment {
    Js(String),
    Element(Element),
}
