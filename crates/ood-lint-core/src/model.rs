//! Language-agnostic structural model of source declarations.
//!
//! Extractors produce [`Declaration`]s once per parse pass; rules only ever
//! read them.

use crate::config::CheckSettings;
use serde::{Deserialize, Serialize};

/// Markers that make a type nullable.
pub const NULL_MARKERS: &[&str] = &["null", "undefined"];

/// Kind of declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    /// `class Foo`, `abstract class Foo` or `interface Foo`.
    Class,
    /// Free-standing `function foo()`.
    Function,
    /// Method, method signature or accessor inside a class or interface.
    Method,
    /// `constructor(...)` of a class.
    Constructor,
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Function => write!(f, "function"),
            Self::Method => write!(f, "method"),
            Self::Constructor => write!(f, "constructor"),
        }
    }
}

/// Property accessor flavour of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessor {
    /// `get name()`
    Get,
    /// `set name(value)`
    Set,
}

/// A type annotation with its top-level union members flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    /// Annotation text with whitespace collapsed (e.g. `Logger | null`).
    pub text: String,
    /// Top-level union members in source order (a single entry for non-unions).
    pub shapes: Vec<String>,
}

impl TypeRef {
    /// Creates a type reference from its text and union members.
    #[must_use]
    pub fn new(text: impl Into<String>, shapes: Vec<String>) -> Self {
        Self {
            text: text.into(),
            shapes,
        }
    }

    /// Creates a non-union type reference.
    #[must_use]
    pub fn simple(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            text: name.clone(),
            shapes: vec![name],
        }
    }

    /// Whether one of the union members is `null` or `undefined`.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.shapes.iter().any(|s| NULL_MARKERS.contains(&s.as_str()))
    }

    /// Union members other than `null` and `undefined`.
    pub fn concrete_shapes(&self) -> impl Iterator<Item = &str> {
        self.shapes
            .iter()
            .map(String::as_str)
            .filter(|s| !NULL_MARKERS.contains(s))
    }

    /// The base name of the only concrete shape, if there is exactly one.
    ///
    /// Generic arguments and namespace qualifiers are stripped, so
    /// `infra.Repository<User>` yields `Repository`.
    #[must_use]
    pub fn primary_name(&self) -> Option<&str> {
        let mut shapes = self.concrete_shapes();
        let first = shapes.next()?;
        if shapes.next().is_some() {
            return None;
        }
        Some(base_name(first))
    }
}

/// Strips generic arguments, array suffixes and namespace qualifiers.
#[must_use]
pub fn base_name(shape: &str) -> &str {
    let end = shape.find(['<', '[']).unwrap_or(shape.len());
    let head = shape[..end].trim();
    head.rsplit('.').next().unwrap_or(head)
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Declared type, if annotated.
    pub declared_type: Option<TypeRef>,
    /// Whether the parameter can be omitted (default value or `?` marker).
    pub has_default: bool,
    /// Whether the declared type admits `null`/`undefined`.
    pub is_nullable: bool,
}

impl Parameter {
    /// Creates a required, non-nullable parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, declared_type: Option<TypeRef>) -> Self {
        let is_nullable = declared_type.as_ref().is_some_and(TypeRef::is_nullable);
        Self {
            name: name.into(),
            declared_type,
            has_default: false,
            is_nullable,
        }
    }

    /// Marks the parameter as having a default value.
    #[must_use]
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Whether callers may leave this parameter out or pass nothing.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.has_default || self.is_nullable
    }
}

/// What a call site does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallSiteKind {
    /// `new Symbol(...)`
    Construction,
    /// `symbol(...)`
    Call,
    /// Outermost member read not rooted at `this`, e.g. `process.env.HOME`.
    Access,
}

/// A symbol referenced from a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    /// What kind of reference this is.
    pub kind: CallSiteKind,
    /// Dotted symbol with whitespace and optional chaining normalized.
    pub symbol: String,
    /// Line of the reference (1-indexed).
    pub line: usize,
}

impl CallSite {
    /// Creates a new call site.
    #[must_use]
    pub fn new(kind: CallSiteKind, symbol: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            symbol: symbol.into(),
            line,
        }
    }

    /// Whether this is an invocation (call or construction) rather than a read.
    #[must_use]
    pub fn is_invocation(&self) -> bool {
        matches!(self.kind, CallSiteKind::Call | CallSiteKind::Construction)
    }

    /// Whether the symbol equals `banned` or is a dotted member of it.
    #[must_use]
    pub fn matches(&self, banned: &str) -> bool {
        self.symbol == banned
            || self
                .symbol
                .strip_prefix(banned)
                .is_some_and(|rest| rest.starts_with('.'))
    }
}

/// Coarse lexical summary of a body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodySummary {
    /// References in source order.
    pub call_sites: Vec<CallSite>,
    /// Instance fields assigned through `this.<field> = ...`, in source order.
    pub assigned_fields: Vec<String>,
}

impl BodySummary {
    /// Invocations other than the `super(...)` chain call, plus reads of
    /// banned system symbols such as `process.env.HOME`.
    pub fn side_effects<'a>(
        &'a self,
        settings: &'a CheckSettings,
    ) -> impl Iterator<Item = &'a CallSite> + 'a {
        self.call_sites.iter().filter(move |c| {
            if c.is_invocation() {
                c.symbol != "super"
            } else {
                settings.banned_symbol(c).is_some()
            }
        })
    }

    /// Whether the body assigns `this.<field>`.
    #[must_use]
    pub fn assigns_field(&self, field: &str) -> bool {
        self.assigned_fields.iter().any(|f| f == field)
    }
}

/// A field declared on a class body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    /// Field name.
    pub name: String,
    /// Declared type, if annotated.
    pub declared_type: Option<TypeRef>,
}

/// The class or interface that encloses a member declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Class or interface name.
    pub name: String,
    /// Parameter names of the class constructor, in order.
    pub constructor_params: Vec<String>,
    /// Fields declared in the class body.
    pub fields: Vec<FieldInfo>,
}

impl Owner {
    /// Creates an owner with no constructor and no fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Looks up a declared field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Structural record of a class, function or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Simple name (`constructor` for constructors).
    pub name: String,
    /// Declaration kind.
    pub kind: DeclKind,
    /// Enclosing class or interface for members.
    pub owner: Option<Owner>,
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// Annotated return type.
    pub return_type: Option<TypeRef>,
    /// Body summary; `None` for signatures without a body.
    pub body: Option<BodySummary>,
    /// Accessor flavour for `get`/`set` members.
    pub accessor: Option<Accessor>,
    /// Line of the declaration (1-indexed).
    pub line: usize,
    /// Column of the declaration (1-indexed).
    pub column: usize,
}

impl Declaration {
    /// Creates a declaration with no parameters, types or body.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: DeclKind, line: usize, column: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            owner: None,
            parameters: Vec::new(),
            return_type: None,
            body: None,
            accessor: None,
            line,
            column,
        }
    }

    /// `Owner.name` for members, the plain name otherwise.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{}.{}", owner.name, self.name),
            None => self.name.clone(),
        }
    }

    /// Whether this is a class constructor.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.kind == DeclKind::Constructor
    }

    /// Whether this declaration has executable code (functions, methods, constructors).
    #[must_use]
    pub fn is_callable(&self) -> bool {
        self.kind != DeclKind::Class
    }
}
