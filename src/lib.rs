//! A standalone JSX-to-JavaScript compiler: comment elision, a
//! string/template/JSX-aware lexer, a recursive-descent parser, and a code
//! generator that rewrites every JSX element into a call of a configurable
//! factory (`pragma`), typically `React.createElement`.
//!
//! ```
//! use jsx_compile::{compile, CompileOptions};
//!
//! let js = compile(r#"const x = <div id="a">hi</div>;"#, &CompileOptions::default()).unwrap();
//! assert!(js.contains(r#"React.createElement("div", {id: "a"}, "hi")"#));
//! ```

mod ast;
mod codegen;
mod comments;
mod directives;
mod entities;
mod error;
mod lexer;
mod options;
mod parser;
mod scan;
mod token;
mod visitor;

pub use ast::{Child, Element, MixedFragment, Node, Program, Prop, PropValue};
pub use error::{CompileError, CompileErrorKind, CompileResult};
pub use options::CompileOptions;
pub use token::{Token, TokenKind};
pub use visitor::{walk_child, walk_element, walk_node, walk_nodes, walk_program, JSXVisitor};

/// Runs the full four-stage pipeline — comment stripping, lexing, parsing,
/// code generation — over `input`, returning the equivalent JavaScript with
/// every JSX element rewritten to a `pragma(...)` call.
///
/// Reentrant and side-effect free: two concurrent calls on disjoint inputs
/// share no state beyond `opts` itself.
pub fn compile(input: &str, opts: &CompileOptions) -> CompileResult<String> {
    let pragma = directives::find_pragma(input).unwrap_or_else(|| opts.pragma.clone());
    let pragma_frag = directives::find_pragma_frag(input).unwrap_or_else(|| opts.pragma_frag.clone());
    if pragma != opts.pragma {
        log::debug!("compile: @jsx hint overrides pragma to {pragma}");
    }
    if pragma_frag != opts.pragma_frag {
        log::debug!("compile: @jsxFrag hint overrides pragmaFrag to {pragma_frag}");
    }

    let stripped = comments::strip(input);
    log::trace!("compile: stripped {} bytes of comments", input.len());

    let tokens = lexer::tokenize(&stripped, opts.max_recursive_calls)?;
    let program = parser::parse(&tokens, &stripped, &pragma_frag)?;
    let output = codegen::generate(&program, &pragma, opts.add_use_strict);

    Ok(output)
}

#[cfg(feature = "wasm")]
mod wasm_bindings {
    use super::{compile, CompileOptions};
    use wasm_bindgen::prelude::*;

    /// Thin embedding surface for a browser-side harness (out of scope for
    /// this crate): takes the source text and a JS options object
    /// deserializing into [`CompileOptions`], and returns the compiled
    /// string or throws a `JsValue` built from the compile error's message.
    #[wasm_bindgen(js_name = compile)]
    pub fn compile_wasm(input: &str, opts: JsValue) -> Result<String, JsValue> {
        let opts: CompileOptions = if opts.is_undefined() || opts.is_null() {
            CompileOptions::default()
        } else {
            serde_wasm_bindgen::from_value(opts).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        compile(input, &opts).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(start)]
    pub fn init() {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_simple_element() {
        let out = compile(r#"const x = <div id="a">hi</div>;"#, &CompileOptions::default()).unwrap();
        assert!(out.contains(r#"React.createElement("div", {id: "a"}, "hi")"#));
    }

    #[test]
    fn honors_jsx_directive_hints() {
        let src = "// @jsx h\n// @jsxFrag Fragment\nconst a = <><span/></>;";
        let out = compile(src, &CompileOptions::default()).unwrap();
        assert!(out.contains("h(Fragment, null, "));
        assert!(out.contains(r#"h("span", null)"#));
    }

    #[test]
    fn passthrough_for_plain_js() {
        let src = "const a = 1 < 2 ? 'yes' : 'no';";
        let out = compile(src, &CompileOptions::default()).unwrap();
        assert_eq!(out, format!("\"use strict\";\n{src}"));
    }

    #[test]
    fn unbalanced_elements_is_an_error() {
        let err = compile("const a = <div>hi;", &CompileOptions::default()).unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::ParserUnbalanced);
    }

    #[test]
    fn recursion_limit_is_a_lexer_runtime_error() {
        let src = "<a>".repeat(50) + &"</a>".repeat(50);
        let opts = CompileOptions {
            max_recursive_calls: 10,
            ..CompileOptions::default()
        };
        let err = compile(&src, &opts).unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::LexerRuntime);
    }
}
