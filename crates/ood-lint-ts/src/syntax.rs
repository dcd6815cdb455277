//! Small helpers over tree-sitter nodes: text, positions, types and parameters.

use ood_lint_core::{Parameter, TypeRef};
use tree_sitter::Node;

pub(crate) fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

/// Node text with runs of whitespace collapsed to one space.
pub(crate) fn collapsed(node: &Node<'_>, src: &[u8]) -> String {
    text(node, src).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 1-indexed (line, column) of the node start.
pub(crate) fn position(node: &Node<'_>) -> (usize, usize) {
    let pos = node.start_position();
    (pos.row + 1, pos.column + 1)
}

/// Field child, falling back to the first named child of `kind`.
///
/// Some grammar versions expose annotations positionally only.
pub(crate) fn field_or_kind<'t>(node: &Node<'t>, field: &str, kind: &str) -> Option<Node<'t>> {
    if let Some(child) = node.child_by_field_name(field) {
        return Some(child);
    }
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// Whether the node has an anonymous child token `token` (e.g. `get`, `readonly`).
pub(crate) fn has_token(node: &Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token);
    found
}

/// Builds a [`TypeRef`] from a `type_annotation` node or a bare type node.
pub(crate) fn type_ref(node: &Node<'_>, src: &[u8]) -> Option<TypeRef> {
    let ty = if node.kind() == "type_annotation" {
        node.named_child(0)?
    } else {
        *node
    };

    let mut shapes = Vec::new();
    flatten_union(&ty, src, &mut shapes);
    Some(TypeRef::new(collapsed(&ty, src), shapes))
}

fn flatten_union(node: &Node<'_>, src: &[u8], shapes: &mut Vec<String>) {
    match node.kind() {
        "union_type" | "parenthesized_type" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if child.kind() != "comment" {
                    flatten_union(&child, src, shapes);
                }
            }
        }
        _ => shapes.push(collapsed(node, src)),
    }
}

/// Parameters of a `formal_parameters` node, skipping a `this` pseudo-parameter.
pub(crate) fn parameters(node: Option<Node<'_>>, src: &[u8]) -> Vec<Parameter> {
    let Some(node) = node else {
        return Vec::new();
    };

    let mut params = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        let optional = match child.kind() {
            "required_parameter" => false,
            "optional_parameter" => true,
            _ => continue,
        };
        let Some(pattern) = child.child_by_field_name("pattern") else {
            continue;
        };
        if pattern.kind() == "this" {
            continue;
        }

        let declared_type =
            field_or_kind(&child, "type", "type_annotation").and_then(|t| type_ref(&t, src));
        let param = Parameter::new(collapsed(&pattern, src), declared_type);
        params.push(if optional || child.child_by_field_name("value").is_some() {
            param.with_default()
        } else {
            param
        });
    }
    params
}

/// Parameters of a callable, including the bare `x => ...` arrow form.
pub(crate) fn callable_parameters(callable: &Node<'_>, src: &[u8]) -> Vec<Parameter> {
    if let Some(params) = callable.child_by_field_name("parameters") {
        return parameters(Some(params), src);
    }
    callable
        .child_by_field_name("parameter")
        .map(|p| vec![Parameter::new(text(&p, src), None)])
        .unwrap_or_default()
}

/// The function a `const f = () => ...` declarator or a `f = () => ...`
/// class field binds, if its value is one.
pub(crate) fn bound_function<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    let value = node.child_by_field_name("value")?;
    matches!(
        value.kind(),
        "arrow_function" | "function_expression" | "function" | "generator_function"
    )
    .then_some(value)
}

/// Whether a constructor parameter also declares a field (`private readonly x: X`).
pub(crate) fn is_parameter_property(param: &Node<'_>) -> bool {
    let mut cursor = param.walk();
    let has_modifier = param
        .children(&mut cursor)
        .any(|c| c.kind() == "accessibility_modifier" || c.kind() == "readonly");
    has_modifier
}

/// Finds the first error or missing node, in source order.
pub(crate) fn first_error<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(*node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    children.iter().find_map(first_error)
}
