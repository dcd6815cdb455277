//! TypeScript language extractor using Tree-sitter.

use ood_lint_core::{
    Accessor, DeclKind, Declaration, FieldInfo, Owner, ParseError, SourceExtractor, TypeRef,
};
use tracing::debug;
use tree_sitter::{Language, Node, Parser};

use crate::body::summarize;
use crate::syntax::{
    bound_function, callable_parameters, collapsed, field_or_kind, first_error, has_token,
    is_parameter_property, parameters, position, text, type_ref,
};

/// Extracts classes, interfaces, constructors, methods and functions from
/// TypeScript source.
///
/// Arrow functions and function expressions bound to a `const` or to a
/// class field count as functions and methods respectively.
pub struct TypeScriptExtractor {
    language: Language,
    language_id: &'static str,
    extensions: &'static [&'static str],
}

impl TypeScriptExtractor {
    /// Creates an extractor for `.ts`, `.mts` and `.cts` files.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            language_id: "typescript",
            extensions: &[".ts", ".mts", ".cts"],
        }
    }

    /// Creates an extractor for `.tsx` files.
    #[must_use]
    pub fn tsx() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TSX.into(),
            language_id: "tsx",
            extensions: &[".tsx"],
        }
    }
}

impl Default for TypeScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceExtractor for TypeScriptExtractor {
    fn language_id(&self) -> &'static str {
        self.language_id
    }

    fn extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    fn extract(&self, source: &str) -> Result<Vec<Declaration>, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::unpositioned(format!("failed to load grammar: {e}")))?;

        let src = source.as_bytes();
        let tree = parser
            .parse(src, None)
            .ok_or_else(|| ParseError::unpositioned("parser produced no tree"))?;
        let root = tree.root_node();

        if root.has_error() {
            return Err(syntax_error(&root, src));
        }

        let mut collector = Collector {
            src,
            declarations: Vec::new(),
        };
        collector.visit(&root);

        let mut declarations = collector.declarations;
        declarations.sort_by_key(|d| (d.line, d.column));
        debug!("Extracted {} declaration(s)", declarations.len());
        Ok(declarations)
    }
}

fn syntax_error(root: &Node<'_>, src: &[u8]) -> ParseError {
    let Some(node) = first_error(root) else {
        return ParseError::new(1, 1, "syntax error");
    };
    let (line, column) = position(&node);
    if node.is_missing() {
        return ParseError::new(line, column, format!("missing `{}`", node.kind()));
    }

    let snippet: String = collapsed(&node, src).chars().take(40).collect();
    if snippet.is_empty() {
        ParseError::new(line, column, "syntax error")
    } else {
        ParseError::new(line, column, format!("unexpected `{snippet}`"))
    }
}

struct Collector<'s> {
    src: &'s [u8],
    declarations: Vec<Declaration>,
}

impl Collector<'_> {
    /// Visits every node, emitting declarations wherever they are nested.
    fn visit(&mut self, node: &Node<'_>) {
        match node.kind() {
            "class_declaration" | "abstract_class_declaration" | "interface_declaration" => {
                self.class_like(node);
            }
            "function_declaration" | "generator_function_declaration" => {
                self.function(node);
            }
            "variable_declarator" => {
                self.bound(node);
            }
            _ => {}
        }

        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        for child in &children {
            self.visit(child);
        }
    }

    fn function(&mut self, node: &Node<'_>) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let decl = self.callable(text(&name, self.src), DeclKind::Function, node, node);
        self.declarations.push(decl);
    }

    /// `const name = (...) => ...` and `const name = function (...) {...}`.
    fn bound(&mut self, declarator: &Node<'_>) {
        let Some(value) = bound_function(declarator) else {
            return;
        };
        let Some(name) = declarator.child_by_field_name("name") else {
            return;
        };
        if name.kind() != "identifier" {
            return;
        }
        let decl = self.callable(text(&name, self.src), DeclKind::Function, declarator, &value);
        self.declarations.push(decl);
    }

    /// Builds a declaration positioned at `at` from the signature and body of
    /// `callable`.
    fn callable(
        &self,
        name: impl Into<String>,
        kind: DeclKind,
        at: &Node<'_>,
        callable: &Node<'_>,
    ) -> Declaration {
        let (line, column) = position(at);
        let mut decl = Declaration::new(name, kind, line, column);
        decl.parameters = callable_parameters(callable, self.src);
        decl.return_type = return_type(callable, self.src);
        decl.body = callable
            .child_by_field_name("body")
            .map(|b| summarize(&b, self.src));
        decl
    }

    fn class_like(&mut self, node: &Node<'_>) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let (line, column) = position(node);
        self.declarations.push(Declaration::new(
            text(&name, self.src),
            DeclKind::Class,
            line,
            column,
        ));

        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let mut cursor = body.walk();
        let members: Vec<Node<'_>> = body.named_children(&mut cursor).collect();

        let owner = self.owner(text(&name, self.src), &members);
        for member in &members {
            if let Some(decl) = self.member(member, &owner) {
                self.declarations.push(decl);
            }
        }
    }

    /// Collects constructor parameters and declared fields of a class body.
    fn owner(&self, name: &str, members: &[Node<'_>]) -> Owner {
        let mut owner = Owner::new(name);

        let constructors: Vec<&Node<'_>> = members
            .iter()
            .filter(|m| {
                is_callable_member(m) && self.member_name(m).as_deref() == Some("constructor")
            })
            .collect();
        let constructor = constructors
            .iter()
            .find(|c| c.child_by_field_name("body").is_some())
            .or_else(|| constructors.first());

        if let Some(params) = constructor.and_then(|c| c.child_by_field_name("parameters")) {
            owner.constructor_params = parameters(Some(params), self.src)
                .into_iter()
                .map(|p| p.name)
                .collect();

            let mut cursor = params.walk();
            for param in params.named_children(&mut cursor) {
                if !is_parameter_property(&param) {
                    continue;
                }
                if let Some(pattern) = param.child_by_field_name("pattern") {
                    owner.fields.push(FieldInfo {
                        name: text(&pattern, self.src).to_string(),
                        declared_type: field_or_kind(&param, "type", "type_annotation")
                            .and_then(|t| type_ref(&t, self.src)),
                    });
                }
            }
        }

        for member in members {
            if !matches!(member.kind(), "public_field_definition" | "property_signature") {
                continue;
            }
            if let Some(name) = self.member_name(member) {
                owner.fields.push(FieldInfo {
                    name,
                    declared_type: field_or_kind(member, "type", "type_annotation")
                        .and_then(|t| type_ref(&t, self.src)),
                });
            }
        }

        owner
    }

    fn member_name(&self, member: &Node<'_>) -> Option<String> {
        member
            .child_by_field_name("name")
            .map(|n| collapsed(&n, self.src))
    }

    fn member(&self, member: &Node<'_>, owner: &Owner) -> Option<Declaration> {
        if member.kind() == "public_field_definition" {
            let value = bound_function(member)?;
            let mut decl =
                self.callable(self.member_name(member)?, DeclKind::Method, member, &value);
            decl.owner = Some(owner.clone());
            return Some(decl);
        }
        if !is_callable_member(member) {
            return None;
        }
        let name = self.member_name(member)?;
        let kind = if name == "constructor" {
            DeclKind::Constructor
        } else {
            DeclKind::Method
        };

        let mut decl = self.callable(name, kind, member, member);
        decl.owner = Some(owner.clone());
        decl.accessor = if has_token(member, "get") {
            Some(Accessor::Get)
        } else if has_token(member, "set") {
            Some(Accessor::Set)
        } else {
            None
        };
        Some(decl)
    }
}

fn is_callable_member(member: &Node<'_>) -> bool {
    matches!(
        member.kind(),
        "method_definition" | "method_signature" | "abstract_method_signature"
    )
}

fn return_type(node: &Node<'_>, src: &[u8]) -> Option<TypeRef> {
    let annotation = node.child_by_field_name("return_type")?;
    if annotation.kind() != "type_annotation" {
        return None;
    }
    type_ref(&annotation, src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ood_lint_core::CallSiteKind;

    fn extract(src: &str) -> Vec<Declaration> {
        TypeScriptExtractor::new()
            .extract(src)
            .expect("source parses")
    }

    fn find<'a>(decls: &'a [Declaration], name: &str) -> &'a Declaration {
        decls
            .iter()
            .find(|d| d.name == name)
            .unwrap_or_else(|| panic!("no declaration `{name}`"))
    }

    #[test]
    fn empty_source() {
        assert!(extract("").is_empty());
    }

    #[test]
    fn extracts_declarations_in_source_order() {
        let decls = extract(
            r"
export class Mailer {
  constructor(private readonly logger: Logger) {}
  send(to: string): void {}
}

function helper(): number { return 1; }

interface Clock {
  now(): Date;
}
",
        );
        let names: Vec<(&str, DeclKind)> =
            decls.iter().map(|d| (d.name.as_str(), d.kind)).collect();
        assert_eq!(
            names,
            vec![
                ("Mailer", DeclKind::Class),
                ("constructor", DeclKind::Constructor),
                ("send", DeclKind::Method),
                ("helper", DeclKind::Function),
                ("Clock", DeclKind::Class),
                ("now", DeclKind::Method),
            ]
        );
        assert_eq!(find(&decls, "send").qualified_name(), "Mailer.send");
        assert_eq!((decls[0].line, decls[0].column), (2, 8));
    }

    #[test]
    fn extracts_parameters_and_defaults() {
        let decls = extract(
            "class A {\n  constructor(a: string, b?: Logger, c: Logger | null, d = 3) {}\n}\n",
        );
        let params = &find(&decls, "constructor").parameters;
        let summary: Vec<(&str, bool, bool)> = params
            .iter()
            .map(|p| (p.name.as_str(), p.has_default, p.is_nullable))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("a", false, false),
                ("b", true, false),
                ("c", false, true),
                ("d", true, false),
            ]
        );
        assert_eq!(
            params[2].declared_type.as_ref().map(|t| t.shapes.clone()),
            Some(vec!["Logger".to_string(), "null".to_string()])
        );
        assert!(params[3].declared_type.is_none());
    }

    #[test]
    fn flattens_return_unions() {
        let decls = extract("function f(): (User | string) | null { return null; }\n");
        let ret = find(&decls, "f").return_type.clone().expect("annotated");
        assert_eq!(ret.shapes, vec!["User", "string", "null"]);
        assert_eq!(ret.primary_name(), None);
    }

    #[test]
    fn owner_records_constructor_params_and_fields() {
        let decls = extract(
            r"
class Mailer {
  private cache: TemplateCache;
  subject = 'hi';
  constructor(private logger: Logger, retries: number) {}
  setLogger(logger: Logger): void { this.logger = logger; }
}
",
        );
        let owner = find(&decls, "setLogger").owner.clone().expect("member");
        assert_eq!(owner.constructor_params, vec!["logger", "retries"]);
        let fields: Vec<&str> = owner.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["logger", "cache", "subject"]);
        assert_eq!(
            owner.field("cache").and_then(|f| f.declared_type.as_ref()).map(|t| t.text.as_str()),
            Some("TemplateCache")
        );
    }

    #[test]
    fn summarizes_bodies() {
        let decls = extract(
            r"
class Job {
  constructor(queue: Queue) {
    super();
    this.queue = queue;
    this.startedAt = new Date();
    this.queue.push(Math.random());
    const home = process.env.HOME;
  }
}
",
        );
        let body = find(&decls, "constructor").body.clone().expect("body");
        let sites: Vec<(CallSiteKind, &str)> = body
            .call_sites
            .iter()
            .map(|c| (c.kind, c.symbol.as_str()))
            .collect();
        assert_eq!(
            sites,
            vec![
                (CallSiteKind::Call, "super"),
                (CallSiteKind::Construction, "Date"),
                (CallSiteKind::Call, "this.queue.push"),
                (CallSiteKind::Call, "Math.random"),
                (CallSiteKind::Access, "process.env.HOME"),
            ]
        );
        assert_eq!(body.assigned_fields, vec!["queue", "startedAt"]);
        assert_eq!(body.call_sites[1].line, 6);
    }

    #[test]
    fn nested_functions_are_separate_declarations() {
        let decls = extract(
            r"
function outer(): void {
  function inner(): void { Date.now(); }
  [1, 2].forEach((n) => fetch('/x'));
}
",
        );
        let outer: Vec<&str> = find(&decls, "outer")
            .body
            .as_ref()
            .map(|b| b.call_sites.iter().map(|c| c.symbol.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(outer, vec!["[1,2].forEach", "fetch"]);
        let inner = find(&decls, "inner").body.as_ref().expect("body");
        assert_eq!(inner.call_sites[0].symbol, "Date.now");
    }

    #[test]
    fn extracts_bound_arrow_functions_and_expressions() {
        let decls = extract(
            r"
export const loadConfig = (): string => fs.readFileSync('x');
const double = n => n * 2;
const hash = function (input: string): number { return crypto.hash(input); };
const limit = 10;
class Svc {
  load = (): Date => new Date();
  retries = 3;
}
",
        );
        let names: Vec<(&str, DeclKind)> =
            decls.iter().map(|d| (d.name.as_str(), d.kind)).collect();
        assert_eq!(
            names,
            vec![
                ("loadConfig", DeclKind::Function),
                ("double", DeclKind::Function),
                ("hash", DeclKind::Function),
                ("Svc", DeclKind::Class),
                ("load", DeclKind::Method),
            ]
        );

        let load_config = find(&decls, "loadConfig");
        assert_eq!((load_config.line, load_config.column), (2, 14));
        assert_eq!(
            load_config.return_type.as_ref().map(|t| t.text.as_str()),
            Some("string")
        );
        let body = load_config.body.as_ref().expect("expression body");
        assert_eq!(body.call_sites[0].symbol, "fs.readFileSync");

        let double = find(&decls, "double");
        assert_eq!(double.parameters.len(), 1);
        assert_eq!(double.parameters[0].name, "n");
        assert_eq!(find(&decls, "hash").parameters[0].name, "input");

        let load = find(&decls, "load");
        assert_eq!(load.qualified_name(), "Svc.load");
        let body = load.body.as_ref().expect("expression body");
        assert_eq!(body.call_sites[0].kind, CallSiteKind::Construction);
        assert_eq!(body.call_sites[0].symbol, "Date");
    }

    #[test]
    fn bound_functions_are_not_part_of_the_enclosing_body() {
        let decls = extract(
            r"
function outer(): void {
  const stamp = () => Date.now();
  log(stamp());
}
",
        );
        let outer: Vec<&str> = find(&decls, "outer")
            .body
            .as_ref()
            .map(|b| b.call_sites.iter().map(|c| c.symbol.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(outer, vec!["log", "stamp"]);
        let stamp = find(&decls, "stamp").body.as_ref().expect("body");
        assert_eq!(stamp.call_sites[0].symbol, "Date.now");
    }

    #[test]
    fn detects_accessors_and_signatures() {
        let decls = extract(
            r"
abstract class Store {
  get size(): number { return 0; }
  set logger(value: Logger) { this.logger = value; }
  abstract load(id: string): Item | Error;
}
",
        );
        assert_eq!(find(&decls, "size").accessor, Some(Accessor::Get));
        assert_eq!(find(&decls, "logger").accessor, Some(Accessor::Set));
        let load = find(&decls, "load");
        assert!(load.body.is_none());
        assert_eq!(load.return_type.as_ref().map(|t| t.shapes.len()), Some(2));
    }

    #[test]
    fn unbalanced_braces_fail() {
        let err = TypeScriptExtractor::new()
            .extract("class A {\n  run() {\n    call(;\n")
            .unwrap_err();
        assert!(err.line >= 1);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn tsx_extractor_handles_jsx() {
        let extractor = TypeScriptExtractor::tsx();
        assert!(extractor.handles_extension("tsx"));
        assert!(!extractor.handles_extension("ts"));
        let decls = extractor
            .extract("function View(): JSX.Element { return <div>{Date.now()}</div>; }\n")
            .expect("tsx parses");
        assert_eq!(decls.len(), 1);
    }
}
