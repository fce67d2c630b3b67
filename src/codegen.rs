//! Code Generator stage (spec §4.4): walks the AST and emits a JavaScript
//! string. Grounded on the teacher's `transform.rs` stack-of-frames
//! recursion shape, adapted to build `pragma(...)` calls instead of the
//! teacher's template-literal output.

use crate::ast::{Child, Element, MixedFragment, Node, Program, PropValue};
use crate::entities;

/// Emits `program` as a single JavaScript string. `pragma` has already had
/// any `// @jsx` hint applied by the caller; `add_use_strict` controls the
/// `"use strict";\n` prefix per §4.4/§6.
pub fn generate(program: &Program, pragma: &str, add_use_strict: bool) -> String {
    let mut body = String::new();
    for node in &program.body {
        body.push_str(&generate_node(node, pragma));
    }

    if add_use_strict && !has_strict_directive(&body) {
        log::debug!("codegen: prepending \"use strict\" directive");
        format!("\"use strict\";\n{body}")
    } else {
        body
    }
}

fn has_strict_directive(text: &str) -> bool {
    text.contains("\"use strict\"") || text.contains("'use strict'")
}

fn generate_node(node: &Node, pragma: &str) -> String {
    match node {
        Node::JsChunk(text) => text.clone(),
        Node::Element(el) => generate_element(el, pragma, false),
    }
}

/// Emits one `pragma(name, props, ...children)` call. `skip_indent`
/// suppresses the multi-line pretty-printing an element otherwise gets when
/// nested inside props or children, per §4.4's "skip-indent" context.
fn generate_element(el: &Element, pragma: &str, skip_indent: bool) -> String {
    let name_expr = if el.is_class {
        el.name.clone()
    } else {
        serde_json::to_string(&el.name).expect("String serialization never fails")
    };

    let props_expr = generate_props(el, pragma, skip_indent);

    let mut args = vec![name_expr, props_expr];
    args.extend(generate_children(el, pragma, skip_indent));

    format!("{pragma}({})", args.join(", "))
}

fn generate_props(el: &Element, pragma: &str, skip_indent: bool) -> String {
    if el.props.is_empty() {
        return "null".to_string();
    }

    let parts: Vec<String> = el
        .props
        .iter()
        .map(|prop| {
            if prop.value.is_none() && prop.name.starts_with("{...") {
                let inner = prop
                    .name
                    .trim_start_matches("{...")
                    .trim_end_matches('}');
                return format!("...{inner}");
            }

            let value_expr = match &prop.value {
                None => "true".to_string(),
                Some(PropValue::LiteralString(s)) => s.clone(),
                Some(PropValue::JsExpression(s)) => s.clone(),
                Some(PropValue::Element(nested)) => generate_element(nested, pragma, true),
                Some(PropValue::Mixed(fragments)) => generate_mixed(fragments, pragma),
            };
            let key = if prop.name.contains('-') {
                serde_json::to_string(&prop.name).expect("String serialization never fails")
            } else {
                prop.name.clone()
            };
            format!("{key}: {value_expr}")
        })
        .collect();

    let joined = parts.join(", ");
    if joined.len() <= 80 {
        return format!("{{{joined}}}");
    }

    let entry_indent = if skip_indent {
        " ".to_string()
    } else {
        " ".repeat((el.depth + 3) * 4)
    };
    let close_indent = if skip_indent {
        String::new()
    } else {
        " ".repeat((el.depth + 2) * 4)
    };
    let body = parts
        .iter()
        .map(|p| format!("{entry_indent}{p}"))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{{\n{body}\n{close_indent}}}")
}

/// Classifies, filters and emits an element's children into the ordered
/// list of `pragma(...)` call arguments that follow its props.
fn generate_children(el: &Element, pragma: &str, skip_indent: bool) -> Vec<String> {
    let mut children: Vec<&Child> = el.children.iter().collect();
    if matches!(children.first(), Some(Child::Whitespace(_))) {
        children.remove(0);
    }
    if matches!(children.last(), Some(Child::Whitespace(_))) {
        children.pop();
    }
    if children.is_empty() {
        return Vec::new();
    }

    let multi = children.len() > 1;
    let mut parts: Vec<String> = Vec::new();
    let mut prev_was_concat_trigger = false;

    for (idx, child) in children.iter().enumerate() {
        let text = match child {
            Child::Whitespace(s) => serde_json::to_string(s).expect("String serialization never fails"),
            Child::Text(s) => {
                let mut text = s.as_str();
                if multi && idx == 0 {
                    text = text.trim_start();
                }
                let trimmed_end;
                if multi && idx == children.len() - 1 {
                    trimmed_end = text.trim_end();
                    text = trimmed_end;
                }
                let decoded = if text.contains('&') {
                    entities::decode(text)
                } else {
                    text.to_string()
                };
                serde_json::to_string(&decoded).expect("String serialization never fails")
            }
            Child::Js(s) => s.clone(),
            Child::Element(nested) => {
                if skip_indent {
                    generate_element(nested, pragma, true)
                } else {
                    let indent = " ".repeat((el.depth + 2) * 4);
                    format!("\n{indent}{}", generate_element(nested, pragma, false))
                }
            }
            Child::Mixed(fragments) => generate_mixed(fragments, pragma),
        };

        let merge_with_prev = prev_was_concat_trigger && matches!(child, Child::Element(_));
        if merge_with_prev {
            if let Some(last) = parts.last_mut() {
                last.push_str(&text);
            } else {
                parts.push(text);
            }
        } else {
            parts.push(text);
        }

        prev_was_concat_trigger = matches!(child, Child::Js(js) if ends_with_concat_trigger(js));
    }

    parts
}

/// Joins an `E_CHILD_JS_START`/element/`E_CHILD_JS_END` fragment run back
/// into one inline expression (e.g. `items.map(i => pragma(...))`). No
/// separators are inserted: the JS fragments already carry whatever
/// punctuation and whitespace belongs between them and the element.
fn generate_mixed(fragments: &[MixedFragment], pragma: &str) -> String {
    let mut out = String::new();
    for fragment in fragments {
        match fragment {
            MixedFragment::Js(s) => out.push_str(s),
            MixedFragment::Element(el) => out.push_str(&generate_element(el, pragma, true)),
        }
    }
    out
}

/// True when trimmed JS text ends in a token after which a following
/// element is that expression's *value* rather than a sibling to
/// comma-join — `&&`, `?`, `(`, `:`, or the `return` keyword.
fn ends_with_concat_trigger(js: &str) -> bool {
    let t = js.trim_end();
    if t.ends_with("&&") || t.ends_with('?') || t.ends_with('(') || t.ends_with(':') {
        return true;
    }
    if let Some(prefix) = t.strip_suffix("return") {
        return prefix.is_empty() || !prefix.ends_with(|c: char| c.is_alphanumeric() || c == '_' || c == '$');
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn compile_simple(src: &str, pragma: &str, pragma_frag: &str) -> String {
        let tokens = tokenize(src, 1000).unwrap();
        let program = parse(&tokens, src, pragma_frag).unwrap();
        generate(&program, pragma, true)
    }

    #[test]
    fn scenario_1_simple_element_with_text() {
        let out = compile_simple(
            r#"const x = <div id="a">hi</div>;"#,
            "React.createElement",
            "React.Fragment",
        );
        assert!(out.contains(r#"React.createElement("div", {id: "a"}, "hi")"#));
        assert!(out.starts_with("\"use strict\";\n"));
    }

    #[test]
    fn scenario_2_component_with_expression_prop() {
        let out = compile_simple(
            "const x = <Foo bar={1+2} />;",
            "React.createElement",
            "React.Fragment",
        );
        assert!(out.contains("React.createElement(Foo, {bar: 1+2})"));
    }

    #[test]
    fn scenario_3_mapped_children() {
        let out = compile_simple(
            "const a = <ul>{items.map(i => <li key={i}>{i}</li>)}</ul>;",
            "React.createElement",
            "React.Fragment",
        );
        assert!(out.contains(
            r#"React.createElement("ul", null, items.map(i => React.createElement("li", {key: i}, i)))"#
        ));
    }

    #[test]
    fn scenario_4_directive_hints_are_honored_by_caller() {
        let src = "const a = <><span/></>;";
        let out = compile_simple(src, "h", "Fragment");
        assert!(out.contains("h(Fragment, null, "));
        assert!(out.contains(r#"h("span", null)"#));
    }

    #[test]
    fn scenario_5_spread_and_entity_decoded_child() {
        let out = compile_simple(
            r#"const a = <div data-x="1" {...rest}>&amp;</div>;"#,
            "React.createElement",
            "React.Fragment",
        );
        assert!(out.contains(r#"{"data-x": "1", ...rest}"#));
        assert!(out.contains("\"&\""));
    }

    #[test]
    fn self_closing_element_has_null_props() {
        let out = compile_simple("const a = <br/>;", "React.createElement", "React.Fragment");
        assert!(out.contains(r#"React.createElement("br", null)"#));
    }

    #[test]
    fn bare_attribute_compiles_to_true() {
        let out = compile_simple("<input disabled/>", "React.createElement", "React.Fragment");
        assert!(out.contains("{disabled: true}"));
    }

    #[test]
    fn hyphenated_attribute_name_is_json_encoded() {
        let out = compile_simple(r#"<div data-x="1"/>"#, "React.createElement", "React.Fragment");
        assert!(out.contains(r#"{"data-x": "1"}"#));
    }

    #[test]
    fn use_strict_not_duplicated_when_already_present() {
        let out = compile_simple(
            "\"use strict\";\nconst a = <br/>;",
            "React.createElement",
            "React.Fragment",
        );
        assert_eq!(out.matches("use strict").count(), 1);
    }

    #[test]
    fn concat_trigger_glues_element_without_comma() {
        assert!(ends_with_concat_trigger("cond &&"));
        assert!(ends_with_concat_trigger("cond ? "));
        assert!(!ends_with_concat_trigger("returnValue"));
        assert!(ends_with_concat_trigger("  return"));
    }
}
