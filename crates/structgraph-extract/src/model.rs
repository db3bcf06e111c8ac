//! Program model interface
//!
//! The extractor never parses or resolves source code itself. It walks an
//! already-resolved model through [`ProgramModel`]; names in the model are
//! fully qualified so they can be matched against graph node ids.

use serde::{Deserialize, Serialize};

/// Read access to a resolved codebase.
pub trait ProgramModel {
    /// Every package, including parents of nested packages.
    fn packages(&self) -> &[Package];

    /// Top-level types. Nested types hang off [`TypeDecl::nested_types`].
    fn types(&self) -> &[TypeDecl];

    /// Find a declared type by qualified name, nested types included.
    fn find_type(&self, qualified_name: &str) -> Option<&TypeDecl>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Empty for the unnamed package.
    #[serde(default)]
    pub qualified_name: String,
    #[serde(default)]
    pub simple_name: String,
    #[serde(default)]
    pub parent: Option<String>,
}

impl Package {
    pub fn is_unnamed(&self) -> bool {
        self.qualified_name.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
    #[default]
    Package,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
            Visibility::Package => "package",
        }
    }
}

/// A declared class, interface, enum, record or annotation type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeDecl {
    pub qualified_name: String,
    pub simple_name: String,
    /// Qualified name of the declaring package; empty for the unnamed one.
    pub package: String,
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub visibility: Visibility,
    pub doc_comment: Option<String>,
    pub source_text: Option<String>,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<Field>,
    pub methods: Vec<Executable>,
    pub constructors: Vec<Executable>,
    pub initializers: Vec<Executable>,
    pub nested_types: Vec<TypeDecl>,
}

impl TypeDecl {
    /// Superclass first, then interfaces in declaration order.
    pub fn ancestors(&self) -> impl Iterator<Item = &str> {
        self.superclass
            .iter()
            .chain(self.interfaces.iter())
            .map(String::as_str)
    }

    pub fn find_method(&self, signature: &str) -> Option<&Executable> {
        self.methods.iter().find(|m| m.signature == signature)
    }
}

/// A reference to a type, e.g. `java.util.Map<K, V>[]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeRef {
    /// Qualified name of the (element) type.
    pub name: String,
    pub array_depth: u32,
    pub arguments: Vec<TypeRef>,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_array(&self) -> bool {
        self.array_depth > 0
    }

    /// Type arguments at every nesting depth, outermost first.
    pub fn all_arguments(&self) -> Vec<&TypeRef> {
        let mut out = Vec::new();
        let mut stack: Vec<&TypeRef> = self.arguments.iter().rev().collect();
        while let Some(arg) = stack.pop() {
            out.push(arg);
            stack.extend(arg.arguments.iter().rev());
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    pub name: String,
    pub type_ref: TypeRef,
    pub visibility: Visibility,
    pub is_static: bool,
    pub doc_comment: Option<String>,
    pub source_text: Option<String>,
    pub initializer: Option<Body>,
}

/// A method, constructor or initializer block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Executable {
    /// e.g. `add(int,int)`. Unique within the declaring type.
    pub signature: String,
    pub simple_name: String,
    pub is_static: bool,
    pub is_abstract: bool,
    pub visibility: Visibility,
    pub doc_comment: Option<String>,
    pub source_text: Option<String>,
    pub return_type: Option<TypeRef>,
    pub parameters: Vec<Parameter>,
    pub body: Body,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameter {
    pub name: String,
    pub type_ref: TypeRef,
}

/// References made by a block of code, in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Body {
    pub statement_count: u32,
    pub accesses: Vec<FieldAccess>,
    pub invocations: Vec<Invocation>,
    pub constructions: Vec<Construction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldAccess {
    pub declaring_type: String,
    pub field: String,
    /// Static type of the target expression, when there is one.
    pub receiver: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invocation {
    pub declaring_type: String,
    pub signature: String,
    pub receiver: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Construction {
    pub type_ref: TypeRef,
}

impl FieldAccess {
    /// The type the access depends on: receiver if known, else the declaring type.
    pub fn target_type(&self) -> &str {
        self.receiver.as_deref().unwrap_or(&self.declaring_type)
    }
}

impl Invocation {
    pub fn target_type(&self) -> &str {
        self.receiver.as_deref().unwrap_or(&self.declaring_type)
    }
}
