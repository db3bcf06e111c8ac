//! Structure extraction strategy
//!
//! One configurable pass that maps a [`ProgramModel`] onto a property graph.
//! Nodes are created before any edge that could point at them, so every
//! reference is resolved by a plain id lookup in the graph under
//! construction. Anything that does not resolve is dropped.

use structgraph_core::{EdgeBatch, Graph, Node, Properties, PropertyValue, identity};
use tracing::{debug, info, trace, warn};

use crate::extractor::GraphExtractor;
use crate::features;
use crate::model::{Executable, ProgramModel, TypeDecl, TypeKind, TypeRef, Visibility};
use crate::options::ExtractOptions;
use crate::vocabulary::{metric, node, rel};

/// The extraction strategy, parameterized by [`ExtractOptions`].
#[derive(Debug, Clone, Default)]
pub struct StructureExtractor {
    options: ExtractOptions,
}

impl StructureExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }
}

impl GraphExtractor for StructureExtractor {
    fn extract(&self, project_name: &str, model: &dyn ProgramModel) -> Graph {
        let mut pass = Pass {
            graph: Graph::new(project_name),
            model,
            options: &self.options,
        };
        pass.run();
        pass.graph
    }
}

/// A declared type together with its enclosing type.
type TypeEntry<'m> = (&'m TypeDecl, Option<&'m TypeDecl>);

/// A type and the operations whose nodes it inserted.
type MemberEntry<'m> = (&'m TypeDecl, Vec<OperationDecl<'m>>);

/// Depth-first, declaration order.
fn flatten_types<'m>(types: &'m [TypeDecl], parent: Option<&'m TypeDecl>, out: &mut Vec<TypeEntry<'m>>) {
    for ty in types {
        out.push((ty, parent));
        flatten_types(&ty.nested_types, Some(ty), out);
    }
}

fn type_kind(ty: &TypeDecl) -> &'static str {
    match ty.kind {
        TypeKind::Interface => "interface",
        TypeKind::Enum => "enum",
        TypeKind::Record => "record",
        TypeKind::Annotation => "annotation",
        TypeKind::Class if ty.is_abstract => "abstract class",
        TypeKind::Class => "class",
    }
}

fn kind_property(kind: &str) -> Properties {
    let mut props = Properties::new();
    props.insert("kind".to_string(), PropertyValue::from(kind));
    props
}

/// A method, constructor or initializer with its node id, label and kind.
struct OperationDecl<'m> {
    exec: &'m Executable,
    id: String,
    label: &'static str,
    kind: &'static str,
}

fn operations(ty: &TypeDecl) -> Vec<OperationDecl<'_>> {
    let type_id = ty.qualified_name.as_str();
    let methods = ty.methods.iter().map(|m| OperationDecl {
        exec: m,
        id: identity::operation_id(type_id, &m.signature),
        label: node::OPERATION,
        kind: if m.is_abstract {
            "abstract method"
        } else if m.is_static {
            "static method"
        } else {
            "method"
        },
    });
    let constructors = ty.constructors.iter().map(|c| OperationDecl {
        exec: c,
        id: identity::operation_id(type_id, &c.signature),
        label: node::CONSTRUCTOR,
        kind: "constructor",
    });
    let initializers = ty.initializers.iter().enumerate().map(|(i, init)| {
        // Initializer blocks have no name; fall back to their position.
        let signature = if init.signature.is_empty() {
            format!("{}{}", if init.is_static { "<clinit>" } else { "<init>" }, i)
        } else {
            init.signature.clone()
        };
        OperationDecl {
            exec: init,
            id: identity::operation_id(type_id, &signature),
            label: node::SCRIPT,
            kind: if init.is_static {
                "class initializer"
            } else {
                "object initializer"
            },
        }
    });
    methods.chain(constructors).chain(initializers).collect()
}

struct Pass<'a> {
    graph: Graph,
    model: &'a dyn ProgramModel,
    options: &'a ExtractOptions,
}

impl<'a> Pass<'a> {
    fn run(&mut self) {
        let model = self.model;
        let options = self.options;

        self.seed_primitives();
        self.add_packages();

        let mut declared = Vec::new();
        flatten_types(model.types(), None, &mut declared);
        // Later phases only see types whose node this pass inserted.
        let types: Vec<TypeEntry<'a>> = declared
            .into_iter()
            .filter(|&(ty, parent)| self.add_type(ty, parent))
            .collect();
        debug!("Added {} types", types.len());

        for &(ty, _) in &types {
            self.add_specializations(ty);
            self.add_type_relations(ty);
        }

        let mut members: Vec<MemberEntry<'a>> = Vec::new();
        if options.include_members() {
            for &(ty, _) in &types {
                let ops = self.add_members(ty);
                members.push((ty, ops));
            }
            for (ty, ops) in &members {
                for op in ops {
                    self.add_member_relations(ty, op);
                }
            }
            debug!("Added member nodes and relations");
        }

        if options.include_metrics {
            self.add_metrics(&types, &members);
        }

        let project_name = self.graph.name().to_string();
        self.graph.set_metadata("projectName", project_name);
        self.graph.set_metadata("schemaVersion", options.schema_version.as_str());
        self.graph.set_metadata("detailLevel", options.detail.to_string());

        info!(
            "Extracted {} nodes, {} edges ({} detail)",
            self.graph.node_count(),
            self.graph.edge_count(),
            options.detail
        );
    }

    /// Insert a node, keeping the first one on an id clash.
    /// Returns whether this call inserted it.
    fn add_node(&mut self, node: Node) -> bool {
        match self.graph.add_node(node) {
            Ok(inserted) => inserted,
            Err(err) => {
                warn!("{err}; keeping the first");
                false
            }
        }
    }

    fn resolves(&self, id: &str) -> bool {
        let found = self.graph.contains_node(id);
        if !found {
            trace!("Dropping unresolved reference to {id}");
        }
        found
    }

    fn link(&mut self, source: &str, target: &str, label: &str) {
        self.graph.add_or_accumulate(source, target, &[label], 1, Properties::new());
    }

    fn seed_primitives(&mut self) {
        let options = self.options;
        for name in &options.primitive_types {
            self.add_node(
                Node::new(name.as_str(), [node::PRIMITIVE])
                    .with_property("simpleName", name.as_str())
                    .with_property("qualifiedName", name.as_str())
                    .with_property("kind", "primitive"),
            );
        }

        let string = options.string_type.as_str();
        let simple = string.rsplit('.').next().unwrap_or(string);
        self.add_node(
            Node::new(string, [node::PRIMITIVE])
                .with_property("simpleName", simple)
                .with_property("qualifiedName", string)
                .with_property("kind", "string"),
        );
    }

    fn add_packages(&mut self) {
        let model = self.model;
        let packages: Vec<_> = model
            .packages()
            .iter()
            .filter(|p| !p.is_unnamed())
            .filter(|pkg| {
                self.add_node(
                    Node::new(pkg.qualified_name.as_str(), [node::CONTAINER])
                        .with_property("simpleName", pkg.simple_name.as_str())
                        .with_property("qualifiedName", pkg.qualified_name.as_str())
                        .with_property("kind", "package"),
                )
            })
            .collect();

        for pkg in &packages {
            if let Some(parent) = pkg.parent.as_deref().filter(|p| !p.is_empty()) {
                if self.resolves(parent) {
                    self.link(parent, &pkg.qualified_name, rel::CONTAINS);
                }
            }
        }
        debug!("Added {} packages", packages.len());
    }

    /// Returns whether the type's node was inserted.
    fn add_type(&mut self, ty: &TypeDecl, parent: Option<&TypeDecl>) -> bool {
        let mut labels = vec![node::STRUCTURE];
        if !ty.nested_types.is_empty() {
            labels.push(node::CONTAINER);
        }
        let mut type_node = Node::new(ty.qualified_name.as_str(), labels)
            .with_property("simpleName", ty.simple_name.as_str())
            .with_property("qualifiedName", ty.qualified_name.as_str())
            .with_property("kind", type_kind(ty))
            .with_property("visibility", ty.visibility.as_str())
            .with_optional("docComment", ty.doc_comment.as_deref())
            .with_optional("sourceText", ty.source_text.as_deref());
        if self.options.include_features {
            type_node = type_node.with_properties(features::type_features(ty, self.options));
        }
        if !self.add_node(type_node) {
            return false;
        }

        let container = match parent {
            Some(outer) => Some(outer.qualified_name.as_str()),
            None if !ty.package.is_empty() => Some(ty.package.as_str()),
            None => None,
        };
        if let Some(container) = container {
            if self.resolves(container) {
                self.link(container, &ty.qualified_name, rel::CONTAINS);
            }
        }
        true
    }

    fn add_specializations(&mut self, ty: &TypeDecl) {
        // Interfaces extend their super-interfaces.
        let interface_kind = if ty.kind == TypeKind::Interface {
            "extends"
        } else {
            "implements"
        };
        let ancestors = ty
            .superclass
            .iter()
            .map(|s| (s, "extends"))
            .chain(ty.interfaces.iter().map(|i| (i, interface_kind)));

        for (ancestor, kind) in ancestors {
            if self.resolves(ancestor) {
                self.graph.add_or_accumulate(
                    &ty.qualified_name,
                    ancestor,
                    &[rel::SPECIALIZES],
                    1,
                    kind_property(kind),
                );
            }
        }
    }

    /// Count a type reference and its type arguments.
    fn push_type_ref(&self, batch: &mut EdgeBatch, type_ref: &TypeRef) {
        for t in std::iter::once(type_ref).chain(type_ref.all_arguments()) {
            if self.resolves(&t.name) {
                batch.push(t.name.as_str());
            }
        }
    }

    fn add_type_relations(&mut self, ty: &TypeDecl) {
        let type_id = ty.qualified_name.as_str();

        let mut holds = EdgeBatch::new(type_id, rel::HOLDS);
        for field in &ty.fields {
            self.push_type_ref(&mut holds, &field.type_ref);
        }

        let mut returns = EdgeBatch::new(type_id, rel::RETURNS);
        for method in &ty.methods {
            if let Some(return_type) = &method.return_type {
                self.push_type_ref(&mut returns, return_type);
            }
        }

        let mut accepts = EdgeBatch::new(type_id, rel::ACCEPTS);
        for exec in ty.methods.iter().chain(&ty.constructors) {
            for param in &exec.parameters {
                self.push_type_ref(&mut accepts, &param.type_ref);
            }
        }

        let mut accesses = EdgeBatch::new(type_id, rel::ACCESSES);
        let mut calls = EdgeBatch::new(type_id, rel::CALLS);
        let mut constructs = EdgeBatch::new(type_id, rel::CONSTRUCTS);
        let bodies = ty
            .methods
            .iter()
            .chain(&ty.constructors)
            .chain(&ty.initializers)
            .map(|e| &e.body)
            .chain(ty.fields.iter().filter_map(|f| f.initializer.as_ref()));
        for body in bodies {
            for access in &body.accesses {
                let target = access.target_type();
                if target != type_id && self.resolves(target) {
                    accesses.push(target);
                }
            }
            for call in &body.invocations {
                let target = call.target_type();
                if target != type_id && self.resolves(target) {
                    calls.push(target);
                }
            }
            for construction in &body.constructions {
                self.push_type_ref(&mut constructs, &construction.type_ref);
            }
        }

        for batch in [holds, returns, accepts, accesses, calls, constructs] {
            batch.flush(&mut self.graph);
        }
    }

    /// `type`/`returnType` edges from a member to the types it is declared with.
    fn add_typing(&mut self, source: &str, type_ref: &TypeRef, label: &str) {
        let mut batch = EdgeBatch::new(source, label);
        let kind = if type_ref.is_array() { "array" } else { "type" };
        if self.resolves(&type_ref.name) {
            batch.push_with(type_ref.name.as_str(), kind_property(kind));
        }
        for arg in type_ref.all_arguments() {
            if self.resolves(&arg.name) {
                batch.push_with(arg.name.as_str(), kind_property("type argument"));
            }
        }
        batch.flush(&mut self.graph);
    }

    /// Returns the operations whose nodes were inserted.
    fn add_members(&mut self, ty: &'a TypeDecl) -> Vec<OperationDecl<'a>> {
        let type_id = ty.qualified_name.as_str();

        for field in &ty.fields {
            let id = identity::field_id(type_id, &field.name);
            let field_node = Node::new(id.as_str(), [node::VARIABLE])
                .with_property("simpleName", field.name.as_str())
                .with_property("qualifiedName", id.as_str())
                .with_property("kind", "field")
                .with_property("visibility", field.visibility.as_str())
                .with_property("isStatic", field.is_static)
                .with_optional("docComment", field.doc_comment.as_deref())
                .with_optional("sourceText", field.source_text.as_deref());
            if self.add_node(field_node) {
                self.link(type_id, &id, rel::HAS_VARIABLE);
                self.add_typing(&id, &field.type_ref, rel::TYPE);
            }
        }

        let mut inserted = Vec::new();
        for op in operations(ty) {
            let exec = op.exec;
            let mut op_node = Node::new(op.id.as_str(), [op.label])
                .with_property("simpleName", exec.simple_name.as_str())
                .with_property("qualifiedName", op.id.as_str())
                .with_property("signature", exec.signature.as_str())
                .with_property("kind", op.kind)
                .with_property("visibility", exec.visibility.as_str())
                .with_property("isStatic", exec.is_static)
                .with_optional("docComment", exec.doc_comment.as_deref())
                .with_optional("sourceText", exec.source_text.as_deref());
            if self.options.include_features {
                op_node = op_node.with_properties(features::operation_features(exec, op.label));
            }
            if !self.add_node(op_node) {
                continue;
            }
            self.link(type_id, &op.id, rel::HAS_SCRIPT);
            if let Some(return_type) = &exec.return_type {
                self.add_typing(&op.id, return_type, rel::RETURN_TYPE);
            }

            for (index, param) in exec.parameters.iter().enumerate() {
                let id = identity::parameter_id(&op.id, index);
                let param_node = Node::new(id.as_str(), [node::VARIABLE])
                    .with_property("simpleName", param.name.as_str())
                    .with_property("qualifiedName", id.as_str())
                    .with_property("kind", "parameter")
                    .with_property("parameterIndex", index);
                if self.add_node(param_node) {
                    self.link(&op.id, &id, rel::HAS_PARAMETER);
                    self.add_typing(&id, &param.type_ref, rel::TYPE);
                }
            }
            inserted.push(op);
        }
        inserted
    }

    fn add_member_relations(&mut self, ty: &TypeDecl, op: &OperationDecl<'_>) {
        let body = &op.exec.body;

        let mut invokes = EdgeBatch::new(op.id.as_str(), rel::INVOKES);
        for call in &body.invocations {
            let target = identity::operation_id(&call.declaring_type, &call.signature);
            if self.resolves(&target) {
                invokes.push(target);
            }
        }

        let mut accesses = EdgeBatch::new(op.id.as_str(), rel::ACCESSES);
        for access in &body.accesses {
            let target = identity::field_id(&access.declaring_type, &access.field);
            if self.resolves(&target) {
                accesses.push(target);
            }
        }

        let mut constructs = EdgeBatch::new(op.id.as_str(), rel::CONSTRUCTS);
        for construction in &body.constructions {
            if self.resolves(&construction.type_ref.name) {
                constructs.push(construction.type_ref.name.as_str());
            }
        }

        for batch in [invokes, accesses, constructs] {
            batch.flush(&mut self.graph);
        }

        if op.label == node::OPERATION {
            self.add_overrides(ty, op);
        }
    }

    /// `overrides` edges to same-signature methods of direct ancestors.
    fn add_overrides(&mut self, ty: &TypeDecl, op: &OperationDecl<'_>) {
        if op.exec.is_static {
            return;
        }
        let model = self.model;
        let signature = op.exec.signature.as_str();
        for ancestor in ty.ancestors() {
            let Some(decl) = model.find_type(ancestor) else {
                trace!("Ancestor {ancestor} of {} is not declared", ty.qualified_name);
                continue;
            };
            let overridable = decl
                .find_method(signature)
                .is_some_and(|m| !m.is_static && m.visibility != Visibility::Private);
            if !overridable {
                continue;
            }
            let target = identity::operation_id(&decl.qualified_name, signature);
            if self.resolves(&target) {
                self.link(&op.id, &target, rel::OVERRIDES);
            }
        }
    }

    fn add_metrics(&mut self, types: &[TypeEntry<'_>], members: &[MemberEntry<'_>]) {
        let with_members = self.options.include_members();
        let mut names = vec![metric::NUM_METHODS, metric::NUM_FIELDS];
        if with_members {
            names.push(metric::NUM_STATEMENTS);
        }
        for name in &names {
            let id = identity::metric_id(name);
            self.add_node(
                Node::new(id.as_str(), [node::METRIC])
                    .with_property("simpleName", *name)
                    .with_property("qualifiedName", id.as_str())
                    .with_property("kind", "metric"),
            );
        }

        for &(ty, _) in types {
            self.measure(&ty.qualified_name, metric::NUM_METHODS, ty.methods.len());
            self.measure(&ty.qualified_name, metric::NUM_FIELDS, ty.fields.len());
        }
        for op in members.iter().flat_map(|(_, ops)| ops) {
            self.measure(&op.id, metric::NUM_STATEMENTS, op.exec.body.statement_count);
        }
        debug!("Added {} metrics", names.len());
    }

    fn measure(&mut self, source: &str, metric_name: &str, value: impl Into<PropertyValue>) {
        let mut props = Properties::new();
        props.insert("value".to_string(), value.into());
        self.graph
            .add_or_accumulate(source, &identity::metric_id(metric_name), &[rel::MEASURES], 1, props);
    }
}
