//! Lexical body summaries.
//!
//! The walk records constructions, calls and outermost member reads in
//! source order, plus `this.<field>` assignments. Nested class and function
//! declarations, including `const f = () => ...` bindings, are skipped
//! because they are extracted on their own; callbacks and other expressions
//! are walked as part of the body.

use ood_lint_core::{BodySummary, CallSite, CallSiteKind};
use tree_sitter::Node;

use crate::syntax::{bound_function, collapsed, position, text};

/// Summarizes a `statement_block` (or expression body).
pub(crate) fn summarize(body: &Node<'_>, src: &[u8]) -> BodySummary {
    let mut walker = BodyWalker {
        src,
        summary: BodySummary::default(),
    };
    walker.walk(body);
    walker.summary
}

/// Dotted symbol for a callee or member chain.
///
/// Call links become `()` and subscripts become `[]`, so
/// `fs.promises.readFile(p).then` reads `fs.promises.readFile().then`.
pub(crate) fn symbol_of(node: &Node<'_>, src: &[u8]) -> String {
    match node.kind() {
        "member_expression" => {
            let object = node
                .child_by_field_name("object")
                .map(|o| symbol_of(&o, src))
                .unwrap_or_default();
            let property = node
                .child_by_field_name("property")
                .map(|p| text(&p, src))
                .unwrap_or_default();
            format!("{object}.{property}")
        }
        "call_expression" => {
            let callee = node
                .child_by_field_name("function")
                .map(|f| symbol_of(&f, src))
                .unwrap_or_default();
            format!("{callee}()")
        }
        "subscript_expression" => {
            let object = node
                .child_by_field_name("object")
                .map(|o| symbol_of(&o, src))
                .unwrap_or_default();
            format!("{object}[]")
        }
        "non_null_expression" | "parenthesized_expression" => node
            .named_child(0)
            .map(|inner| symbol_of(&inner, src))
            .unwrap_or_default(),
        _ => collapsed(node, src).replace("?.", ".").replace(' ', ""),
    }
}

fn is_rooted_at_this(symbol: &str) -> bool {
    ["this", "super"].iter().any(|root| {
        symbol == *root
            || symbol
                .strip_prefix(root)
                .is_some_and(|rest| rest.starts_with(['.', '(', '[']))
    })
}

struct BodyWalker<'s> {
    src: &'s [u8],
    summary: BodySummary,
}

impl BodyWalker<'_> {
    fn record(&mut self, kind: CallSiteKind, symbol: String, node: &Node<'_>) {
        let (line, _) = position(node);
        self.summary.call_sites.push(CallSite::new(kind, symbol, line));
    }

    fn walk_field(&mut self, node: &Node<'_>, field: &str) {
        if let Some(child) = node.child_by_field_name(field) {
            self.walk(&child);
        }
    }

    fn walk(&mut self, node: &Node<'_>) {
        match node.kind() {
            "class_declaration"
            | "abstract_class_declaration"
            | "function_declaration"
            | "generator_function_declaration" => return,
            "variable_declarator" if bound_function(node).is_some() => return,
            "new_expression" => {
                if let Some(ctor) = node.child_by_field_name("constructor") {
                    self.record(CallSiteKind::Construction, symbol_of(&ctor, self.src), node);
                    self.walk_chain(&ctor);
                }
                self.walk_field(node, "arguments");
                return;
            }
            "call_expression" => {
                if let Some(callee) = node.child_by_field_name("function") {
                    self.record(CallSiteKind::Call, symbol_of(&callee, self.src), node);
                    self.walk_chain(&callee);
                }
                self.walk_field(node, "arguments");
                return;
            }
            "member_expression" => {
                let symbol = symbol_of(node, self.src);
                if !is_rooted_at_this(&symbol) {
                    self.record(CallSiteKind::Access, symbol, node);
                }
                self.walk_chain(node);
                return;
            }
            "assignment_expression" | "augmented_assignment_expression" => {
                if let Some(left) = node.child_by_field_name("left") {
                    match self.this_field(&left) {
                        Some(field) => self.summary.assigned_fields.push(field),
                        None => self.walk_chain(&left),
                    }
                }
                self.walk_field(node, "right");
                return;
            }
            _ => {}
        }

        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        for child in &children {
            self.walk(child);
        }
    }

    /// Walks the inside of a member or call chain without recording the
    /// chain itself as a read.
    fn walk_chain(&mut self, node: &Node<'_>) {
        match node.kind() {
            "member_expression" => {
                if let Some(object) = node.child_by_field_name("object") {
                    self.walk_chain(&object);
                }
            }
            "subscript_expression" => {
                if let Some(object) = node.child_by_field_name("object") {
                    self.walk_chain(&object);
                }
                self.walk_field(node, "index");
            }
            "non_null_expression" | "parenthesized_expression" => {
                if let Some(inner) = node.named_child(0) {
                    self.walk_chain(&inner);
                }
            }
            "identifier" | "this" | "super" | "property_identifier" => {}
            _ => self.walk(node),
        }
    }

    /// `this.<field>` target of an assignment.
    fn this_field(&self, left: &Node<'_>) -> Option<String> {
        if left.kind() != "member_expression" {
            return None;
        }
        let object = left.child_by_field_name("object")?;
        if object.kind() != "this" {
            return None;
        }
        let property = left.child_by_field_name("property")?;
        Some(text(&property, self.src).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn this_rooted_symbols() {
        assert!(is_rooted_at_this("this"));
        assert!(is_rooted_at_this("this.repo.find"));
        assert!(is_rooted_at_this("super.dispose"));
        assert!(!is_rooted_at_this("thisWorld.spin"));
        assert!(!is_rooted_at_this("process.env"));
    }
}
