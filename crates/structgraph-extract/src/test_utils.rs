//! Test utilities for structgraph-extract

use crate::model::*;
use crate::snapshot::ModelSnapshot;

pub fn package(qualified_name: &str, parent: Option<&str>) -> Package {
    Package {
        qualified_name: qualified_name.to_string(),
        simple_name: qualified_name.rsplit('.').next().unwrap_or_default().to_string(),
        parent: parent.map(str::to_string),
    }
}

pub fn class(package: &str, simple_name: &str) -> TypeDecl {
    let qualified_name = if package.is_empty() {
        simple_name.to_string()
    } else {
        format!("{package}.{simple_name}")
    };
    TypeDecl {
        qualified_name,
        simple_name: simple_name.to_string(),
        package: package.to_string(),
        visibility: Visibility::Public,
        ..Default::default()
    }
}

pub fn field(name: &str, type_name: &str) -> Field {
    Field {
        name: name.to_string(),
        type_ref: TypeRef::named(type_name),
        visibility: Visibility::Private,
        ..Default::default()
    }
}

/// A public method; the simple name is the signature up to `(`.
pub fn method(signature: &str, return_type: Option<&str>) -> Executable {
    Executable {
        signature: signature.to_string(),
        simple_name: signature.split('(').next().unwrap_or_default().to_string(),
        visibility: Visibility::Public,
        return_type: return_type.map(TypeRef::named),
        ..Default::default()
    }
}

pub fn param(name: &str, type_name: &str) -> Parameter {
    Parameter {
        name: name.to_string(),
        type_ref: TypeRef::named(type_name),
    }
}

pub fn invocation(declaring_type: &str, signature: &str) -> Invocation {
    Invocation {
        declaring_type: declaring_type.to_string(),
        signature: signature.to_string(),
        receiver: None,
    }
}

pub fn access(declaring_type: &str, field: &str) -> FieldAccess {
    FieldAccess {
        declaring_type: declaring_type.to_string(),
        field: field.to_string(),
        receiver: None,
    }
}

pub fn construction(type_name: &str) -> Construction {
    Construction {
        type_ref: TypeRef::named(type_name),
    }
}

/// `com.example.Foo { int x; void run() {} }`
pub fn single_class_model() -> ModelSnapshot {
    let mut foo = class("com.example", "Foo");
    foo.fields.push(field("x", "int"));
    foo.methods.push(method("run()", Some("void")));
    ModelSnapshot::new(vec![package("com.example", None)], vec![foo])
}

/// A small shop domain with inheritance, generics, nesting and method bodies.
///
/// ```text
/// com.shop
///   Cart { List<Item> items; Cart(); double total(); void add(Item,int); static {} }
///     Cart.Line { int qty; }
/// com.shop.model
///   Priced (interface) { double getPrice(); }
///   Item extends java.lang.Object implements Priced { double price; String name; double getPrice(); }
/// ```
pub fn shop_model() -> ModelSnapshot {
    let mut priced = class("com.shop.model", "Priced");
    priced.kind = TypeKind::Interface;
    let mut get_price = method("getPrice()", Some("double"));
    get_price.is_abstract = true;
    priced.methods.push(get_price);

    let mut item = class("com.shop.model", "Item");
    item.superclass = Some("java.lang.Object".to_string());
    item.interfaces.push("com.shop.model.Priced".to_string());
    item.fields.push(field("price", "double"));
    item.fields.push(field("name", "java.lang.String"));
    let mut item_price = method("getPrice()", Some("double"));
    item_price.body.statement_count = 1;
    item_price.body.accesses.push(access("com.shop.model.Item", "price"));
    item.methods.push(item_price);

    let mut cart = class("com.shop", "Cart");
    cart.fields.push(Field {
        type_ref: TypeRef {
            name: "java.util.List".to_string(),
            array_depth: 0,
            arguments: vec![TypeRef::named("com.shop.model.Item")],
        },
        ..field("items", "java.util.List")
    });
    let mut ctor = method("Cart()", None);
    ctor.simple_name = "Cart".to_string();
    cart.constructors.push(ctor);

    let mut total = method("total()", Some("double"));
    total.body.statement_count = 4;
    for _ in 0..3 {
        total
            .body
            .invocations
            .push(invocation("com.shop.model.Item", "getPrice()"));
    }
    total.body.accesses.push(access("com.shop.Cart", "items"));
    total.body.accesses.push(access("com.shop.model.Item", "price"));
    cart.methods.push(total);

    let mut add = method("add(com.shop.model.Item,int)", Some("void"));
    add.parameters.push(param("item", "com.shop.model.Item"));
    add.parameters.push(param("quantity", "int"));
    add.body.statement_count = 2;
    add.body.constructions.push(construction("com.shop.Cart.Line"));
    add.body.invocations.push(invocation("com.shop.Cart", "total()"));
    cart.methods.push(add);

    let mut init = Executable {
        is_static: true,
        ..Default::default()
    };
    init.body.constructions.push(construction("com.shop.model.Item"));
    cart.initializers.push(init);

    let mut line = class("com.shop", "Line");
    line.qualified_name = "com.shop.Cart.Line".to_string();
    line.fields.push(field("qty", "int"));
    cart.nested_types.push(line);

    ModelSnapshot::new(
        vec![package("com.shop", None), package("com.shop.model", Some("com.shop"))],
        vec![cart, priced, item],
    )
}
