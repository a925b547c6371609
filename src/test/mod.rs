//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::metadata::{
    assembly::{Assembly, AssemblyRc, AssemblyVersion, Module},
    members::{
        Event, Field, FieldAttributes, Method, MethodAccessFlags, MethodModifiers, MethodRc,
        Property,
    },
    typesystem::{CilTypeRc, TypeBuilder},
};

// Helper function to create an accessor method (getter, setter, add, remove, raise)
pub fn create_accessor(
    row: u32,
    name: &str,
    access: MethodAccessFlags,
    modifiers: MethodModifiers,
) -> MethodRc {
    let modifiers = modifiers | MethodModifiers::SPECIAL_NAME | MethodModifiers::HIDE_BY_SIG;
    Arc::new(Method::new(row, name, access.bits() | modifiers.bits()))
}

// Helper function to create a type declaring x (public instance), y (private static) and z (public static)
pub fn create_type_with_fields() -> CilTypeRc {
    let scenario = TypeBuilder::new("Contoso", "Scenario")
        .public()
        .build()
        .unwrap();
    scenario
        .add_field(Field::new(1, "x", FieldAttributes::PUBLIC))
        .unwrap();
    scenario
        .add_field(Field::new(
            2,
            "y",
            FieldAttributes::PRIVATE | FieldAttributes::STATIC,
        ))
        .unwrap();
    scenario
        .add_field(Field::new(
            3,
            "z",
            FieldAttributes::PUBLIC | FieldAttributes::STATIC,
        ))
        .unwrap();
    scenario
}

// Helper function to create a type with one member of every kind, plus a type initializer
//
// Methods in declaration order: .ctor, .cctor, Foo, get_Size, add_Changed
pub fn create_type_with_members() -> CilTypeRc {
    let widget = TypeBuilder::new("Contoso", "Widget")
        .public()
        .build()
        .unwrap();

    widget
        .add_method(Method::constructor(1, MethodAccessFlags::PUBLIC.bits()))
        .unwrap();
    widget.add_method(Method::type_initializer(2)).unwrap();
    widget
        .add_method(Method::new(3, "Foo", MethodAccessFlags::PUBLIC.bits()))
        .unwrap();
    let getter = widget
        .add_method(create_accessor(
            4,
            "get_Size",
            MethodAccessFlags::PUBLIC,
            MethodModifiers::empty(),
        ))
        .unwrap();
    let add = widget
        .add_method(create_accessor(
            5,
            "add_Changed",
            MethodAccessFlags::PUBLIC,
            MethodModifiers::empty(),
        ))
        .unwrap();

    widget
        .add_field(Field::new(1, "count", FieldAttributes::PUBLIC))
        .unwrap();
    widget
        .add_property(Property::new(1, "Size", 0).with_getter(&getter))
        .unwrap();
    widget
        .add_event(Event::new(1, "Changed", 0).with_add(&add))
        .unwrap();
    widget
}

// Helper function to create `Contoso.Widget` inside `Contoso.Core` 1.2.0.0
//
// The assembly owns the graph, keep it alive for as long as the type is used.
pub fn create_loaded_widget() -> (AssemblyRc, CilTypeRc) {
    let assembly = Assembly::new("Contoso.Core", AssemblyVersion::new(1, 2, 0, 0));
    let module = Module::new("Contoso.Core.dll");
    assembly.add_module(&module).unwrap();

    let widget = TypeBuilder::new("Contoso", "Widget")
        .public()
        .row(1)
        .build()
        .unwrap();
    module.add_type(&widget).unwrap();
    (assembly, widget)
}
