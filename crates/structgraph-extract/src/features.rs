//! Per-type and per-operation feature properties
//!
//! Counts and ratios computed from the declarations alone, for consumers
//! that classify types or methods from graph properties.

use structgraph_core::{Properties, PropertyValue};

use crate::model::{Executable, TypeDecl, TypeKind, Visibility};
use crate::options::ExtractOptions;
use crate::vocabulary::node;

/// `prefix` followed by an uppercase letter, e.g. `getName`.
fn has_accessor_prefix(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

pub fn is_getter(name: &str) -> bool {
    has_accessor_prefix(name, "get") || has_accessor_prefix(name, "is")
}

pub fn is_setter(name: &str) -> bool {
    has_accessor_prefix(name, "set")
}

/// `part / whole`, or `0.0` when there is nothing to divide by.
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 { 0.0 } else { part as f64 / whole as f64 }
}

fn put(props: &mut Properties, key: &str, value: impl Into<PropertyValue>) {
    props.insert(key.to_string(), value.into());
}

pub fn type_features(ty: &TypeDecl, options: &ExtractOptions) -> Properties {
    let name = ty.simple_name.as_str();
    let fields = &ty.fields;
    let methods = &ty.methods;

    let num_fields = fields.len();
    let public_fields = fields.iter().filter(|f| f.visibility == Visibility::Public).count();
    let private_fields = fields.iter().filter(|f| f.visibility == Visibility::Private).count();
    let primitive_fields = fields
        .iter()
        .filter(|f| !f.type_ref.is_array() && options.primitive_types.contains(&f.type_ref.name))
        .count();

    let num_methods = methods.len();
    let public_methods = methods.iter().filter(|m| m.visibility == Visibility::Public).count();
    let private_methods = methods.iter().filter(|m| m.visibility == Visibility::Private).count();
    let abstract_methods = methods.iter().filter(|m| m.is_abstract).count();
    let getters = methods.iter().filter(|m| is_getter(&m.simple_name)).count();
    let setters = methods.iter().filter(|m| is_setter(&m.simple_name)).count();

    let statements: usize = methods.iter().map(|m| m.body.statement_count as usize).sum();
    let parameters: usize = methods.iter().map(|m| m.parameters.len()).sum();

    let mut props = Properties::new();
    put(&mut props, "isPublic", ty.visibility == Visibility::Public);
    put(&mut props, "isClass", ty.kind == TypeKind::Class);
    put(&mut props, "isInterface", ty.kind == TypeKind::Interface);
    put(&mut props, "isAbstract", ty.is_abstract);
    put(&mut props, "isEnum", ty.kind == TypeKind::Enum);

    put(&mut props, "namedController", name.ends_with("Controller"));
    put(&mut props, "namedManager", name.ends_with("Manager"));
    put(&mut props, "namedListener", name.ends_with("Listener"));
    put(&mut props, "namedTest", name.starts_with("Test") || name.ends_with("Test"));

    put(&mut props, "numFields", num_fields);
    put(&mut props, "numPublicFields", public_fields);
    put(&mut props, "numPrivateFields", private_fields);
    put(&mut props, "numPrimitiveFields", primitive_fields);
    put(&mut props, "ratioPublicFields", ratio(public_fields, num_fields));
    put(&mut props, "ratioPrivateFields", ratio(private_fields, num_fields));

    put(&mut props, "numMethods", num_methods);
    put(&mut props, "numPublicMethods", public_methods);
    put(&mut props, "numPrivateMethods", private_methods);
    put(&mut props, "numAbstractMethods", abstract_methods);
    put(&mut props, "numGetters", getters);
    put(&mut props, "numSetters", setters);
    put(&mut props, "ratioPublicMethods", ratio(public_methods, num_methods));
    put(&mut props, "ratioPrivateMethods", ratio(private_methods, num_methods));
    put(&mut props, "ratioAbstractMethods", ratio(abstract_methods, num_methods));
    put(&mut props, "ratioGetters", ratio(getters, num_methods));
    put(&mut props, "ratioSetters", ratio(setters, num_methods));
    put(&mut props, "ratioGettersToFields", ratio(getters, num_fields));
    put(&mut props, "ratioSettersToFields", ratio(setters, num_fields));

    put(&mut props, "numStatementsInMethods", statements);
    put(&mut props, "averageStatementsPerMethod", ratio(statements, num_methods));
    put(&mut props, "numParametersInMethods", parameters);
    put(&mut props, "averageParametersPerMethod", ratio(parameters, num_methods));
    props
}

/// Features of a method, constructor or initializer node with the given label.
pub fn operation_features(exec: &Executable, label: &str) -> Properties {
    let is_method = label == node::OPERATION;
    let mut props = Properties::new();
    put(&mut props, "isPublic", exec.visibility == Visibility::Public);
    put(&mut props, "isMethod", is_method);
    put(&mut props, "isConstructor", label == node::CONSTRUCTOR);
    put(&mut props, "isGetter", is_method && is_getter(&exec.simple_name));
    put(&mut props, "isSetter", is_method && is_setter(&exec.simple_name));
    put(&mut props, "numParameters", exec.parameters.len());
    put(&mut props, "numStatements", exec.body.statement_count);
    props
}
