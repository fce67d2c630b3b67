//! AST visitor, grounded on the teacher's `jsx_parser/visitor.rs`: a trait
//! of no-op-by-default enter/exit hooks plus a free `walk_*` pair that
//! drives a depth-first traversal. The code generator does not use this
//! (it needs return values threaded back up, which a pure visitor doesn't
//! give you for free), but it is the traversal other tooling embedding this
//! crate — a linter, a pretty-printer, a source-map builder — would reach
//! for instead of hand-rolling recursion again.

use crate::ast::{Child, Element, MixedFragment, Node, Program};

pub trait JSXVisitor {
    fn enter_element(&mut self, _el: &Element) {}
    fn exit_element(&mut self, _el: &Element) {}
    fn visit_js_chunk(&mut self, _text: &str) {}
    fn visit_text(&mut self, _text: &str) {}
    fn visit_whitespace(&mut self, _text: &str) {}
}

pub fn walk_program<V: JSXVisitor>(visitor: &mut V, program: &Program) {
    walk_nodes(visitor, &program.body);
}

pub fn walk_nodes<V: JSXVisitor>(visitor: &mut V, nodes: &[Node]) {
    for node in nodes {
        walk_node(visitor, node);
    }
}

pub fn walk_node<V: JSXVisitor>(visitor: &mut V, node: &Node) {
    match node {
        Node::JsChunk(text) => visitor.visit_js_chunk(text),
        Node::Element(el) => walk_element(visitor, el),
    }
}

pub fn walk_element<V: JSXVisitor>(visitor: &mut V, el: &Element) {
    visitor.enter_element(el);
    for child in &el.children {
        walk_child(visitor, child);
    }
    visitor.exit_element(el);
}

pub fn walk_child<V: JSXVisitor>(visitor: &mut V, child: &Child) {
    match child {
        Child::Js(text) => visitor.visit_js_chunk(text),
        Child::Text(text) => visitor.visit_text(text),
        Child::Whitespace(text) => visitor.visit_whitespace(text),
        Child::Element(el) => walk_element(visitor, el),
        Child::Mixed(fragments) => {
            for fragment in fragments {
                match fragment {
                    MixedFragment::Js(text) => visitor.visit_js_chunk(text),
                    MixedFragment::Element(el) => walk_element(visitor, el),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Prop;

    #[derive(Default)]
    struct NameCollector(Vec<String>);

    impl JSXVisitor for NameCollector {
        fn enter_element(&mut self, el: &Element) {
            self.0.push(el.name.clone());
        }
    }

    #[test]
    fn collects_names_depth_first() {
        let inner = Element {
            name: "span".into(),
            is_class: false,
            props: Vec::<Prop>::new(),
            children: vec![],
            depth: 1,
        };
        let outer = Element {
            name: "div".into(),
            is_class: false,
            props: vec![],
            children: vec![Child::Element(inner)],
            depth: 0,
        };
        let program = Program {
            body: vec![Node::Element(outer)],
        };
        let mut collector = NameCollector::default();
        walk_program(&mut collector, &program);
        assert_eq!(collector.0, vec!["div", "span"]);
    }
}
