//! Integration tests for the reflection query surface.
//!
//! Every scenario builds a small metadata graph through the public builders, loads it into a
//! universe where cross-assembly references are needed, and queries it through handles.

use std::sync::Arc;

use dotreflect::{prelude::*, reflection::filter, Result};

/// A universe with `Contoso.Api` (interfaces) and `Contoso.App` (implementations) loaded.
///
/// The universe owns both assemblies, it has to outlive every handle issued from them.
struct Fixture {
    universe: Arc<MetadataUniverse>,
    app: AssemblyRc,
}

fn load_fixture() -> Result<Fixture> {
    let universe = MetadataUniverse::new(UniverseConfig::default());

    let api = Assembly::new("Contoso.Api", AssemblyVersion::new(2, 0, 0, 0));
    let api_module = Module::new("Contoso.Api.dll");
    api.add_module(&api_module)?;
    api_module.add_type(
        &TypeBuilder::new("Contoso.Api", "IFOO")
            .public()
            .interface()
            .row(1)
            .build()?,
    )?;
    api_module.add_type(
        &TypeBuilder::new("Contoso.Api", "WidgetBase")
            .public()
            .row(2)
            .base(TypeReference::imported("System.Runtime", "System", "Object"))
            .build()?,
    )?;
    universe.load(&api)?;

    let app = Assembly::new("Contoso.App", AssemblyVersion::new(1, 0, 0, 0));
    let app_module = Module::new("Contoso.App.dll");
    app.add_module(&app_module)?;

    let widget = TypeBuilder::new("Contoso.App", "Widget")
        .public()
        .row(1)
        .base(TypeReference::imported("Contoso.Api", "Contoso.Api", "WidgetBase"))
        .implements(TypeReference::imported("Contoso.Api", "Contoso.Api", "IFOO"))
        .implements(TypeReference::imported("Missing.Assembly", "Missing", "IGone"))
        .build()?;
    app_module.add_type(&widget)?;

    widget.add_field(Field::new(1, "x", FieldAttributes::PUBLIC))?;
    widget.add_field(Field::new(
        2,
        "y",
        FieldAttributes::PRIVATE | FieldAttributes::STATIC,
    ))?;

    widget.add_method(Method::constructor(1, MethodAccessFlags::PUBLIC.bits()))?;
    widget.add_method(Method::type_initializer(2))?;
    widget.add_method(Method::new(3, "Foo", MethodAccessFlags::PUBLIC.bits()))?;
    let getter = widget.add_method(Method::new(
        4,
        "get_Name",
        MethodAccessFlags::PUBLIC.bits() | MethodModifiers::SPECIAL_NAME.bits(),
    ))?;
    let add = widget.add_method(Method::new(
        5,
        "add_Changed",
        MethodAccessFlags::PUBLIC.bits() | MethodModifiers::SPECIAL_NAME.bits(),
    ))?;
    let helper = widget.add_method(Method::new(
        6,
        "Helper",
        MethodAccessFlags::PRIVATE.bits() | MethodModifiers::STATIC.bits(),
    ))?;

    widget.add_property(Property::new(1, "Name", 0).with_getter(&getter))?;
    widget.add_property(Property::new(2, "Cache", 0).with_setter(&helper))?;
    widget.add_event(Event::new(1, "Changed", 0).with_add(&add))?;

    let nested = TypeBuilder::new("", "Part")
        .nested_public()
        .base(TypeReference::imported("Missing.Assembly", "Missing", "PartBase"))
        .build()?;
    widget.add_nested_type(&nested)?;

    let array = TypeBuilder::new("Contoso.App", "Widget[]")
        .public()
        .row(2)
        .array(1, TypeReference::definition(&widget))
        .build()?;
    app_module.add_type(&array)?;

    universe.load(&app)?;
    Ok(Fixture { universe, app })
}

fn widget(fixture: &Fixture) -> TypeHandle {
    AssemblyHandle::new(fixture.app.clone())
        .get_type("Contoso.App.Widget")
        .expect("widget is defined")
}

fn all_flag_values() -> Vec<BindingFlags> {
    (0..=0x3F_u32)
        .map(BindingFlags::from_bits_truncate)
        .collect()
}

fn names<T>(items: &[T], name: impl Fn(&T) -> &str) -> Vec<String> {
    items.iter().map(|item| name(item).to_string()).collect()
}

#[test]
fn test_fields_by_quadrant() -> Result<()> {
    let fixture = load_fixture()?;
    let widget = widget(&fixture);

    let public_instance = widget.get_fields(BindingFlags::PUBLIC | BindingFlags::INSTANCE);
    assert_eq!(names(&public_instance, |f| f.name()), ["x"]);

    let non_public_static = widget.get_fields(BindingFlags::NON_PUBLIC | BindingFlags::STATIC);
    assert_eq!(names(&non_public_static, |f| f.name()), ["y"]);

    let everything = widget.get_fields(
        BindingFlags::PUBLIC | BindingFlags::NON_PUBLIC | BindingFlags::INSTANCE | BindingFlags::STATIC,
    );
    assert_eq!(names(&everything, |f| f.name()), ["x", "y"]);
    Ok(())
}

#[test]
fn test_constructors_and_methods_are_disjoint() -> Result<()> {
    let fixture = load_fixture()?;
    let widget = widget(&fixture);

    let ctors = widget.get_constructors(BindingFlags::DEFAULT);
    let methods = widget.get_methods(BindingFlags::DEFAULT);
    assert_eq!(names(&ctors, |c| c.name()), [".ctor"]);
    assert_eq!(names(&methods, |m| m.name()), ["Foo", "get_Name", "add_Changed"]);

    for flags in all_flag_values() {
        let ctors = widget.get_constructors(flags);
        let methods = widget.get_methods(flags);
        assert!(ctors
            .iter()
            .all(|ctor| methods.iter().all(|method| method.token() != ctor.token())));
    }
    Ok(())
}

#[test]
fn test_unresolved_base_type_is_absent() -> Result<()> {
    let fixture = load_fixture()?;
    let widget = widget(&fixture);

    // Resolves across assemblies loaded into the same universe
    let base = widget.base_type().expect("Contoso.Api is loaded");
    assert_eq!(base.full_name(), "Contoso.Api.WidgetBase");

    // System.Runtime was never loaded
    assert!(base.base_type().is_none());

    let part = widget.get_nested_type("Part", BindingFlags::PUBLIC).expect("nested type");
    assert!(part.base_type().is_none());
    Ok(())
}

#[test]
fn test_get_interface_case() -> Result<()> {
    let fixture = load_fixture()?;
    let widget = widget(&fixture);

    let interface = widget.get_interface("IFoo", true).expect("IFOO matches ignoring case");
    assert_eq!(interface.full_name(), "Contoso.Api.IFOO");
    assert!(interface.is_interface());
    assert!(widget.get_interface("IFoo", false).is_none());
    assert!(widget.get_interface("IFOO", false).is_some());

    // Named, but its assembly is not loaded
    assert!(widget.get_interface("IGone", false).is_none());
    Ok(())
}

#[test]
fn test_get_interfaces_keeps_unresolved_as_none() -> Result<()> {
    let fixture = load_fixture()?;
    let widget = widget(&fixture);

    assert_eq!(widget.interface_references().len(), 2);
    let interfaces = widget.get_interfaces();
    assert_eq!(interfaces.len(), 2);
    assert_eq!(interfaces[0].as_ref().map(TypeHandle::name), Some("IFOO"));
    // Missing.Assembly is not loaded
    assert!(interfaces[1].is_none());
    Ok(())
}

#[test]
fn test_ignore_case_lookup_maps_one_to_one() -> Result<()> {
    let street = TypeBuilder::new("Contoso.App", "Street").public().build()?;
    street.add_field(Field::new(1, "straße", FieldAttributes::PUBLIC))?;
    let street = TypeHandle::new(street);
    let flags = BindingFlags::PUBLIC | BindingFlags::INSTANCE | BindingFlags::IGNORE_CASE;

    assert!(street.get_field("STRASSE", flags).is_none());
    assert!(street.get_field("STRAßE", flags).is_some());
    Ok(())
}

#[test]
fn test_get_members_order_for_every_flag_value() -> Result<()> {
    let fixture = load_fixture()?;
    let widget = widget(&fixture);

    for flags in all_flag_values() {
        let mut expected: Vec<MemberInfo> = Vec::new();
        expected.extend(widget.get_constructors(flags).into_iter().map(MemberInfo::from));
        expected.extend(widget.get_events(flags).into_iter().map(MemberInfo::from));
        expected.extend(widget.get_fields(flags).into_iter().map(MemberInfo::from));
        expected.extend(widget.get_methods(flags).into_iter().map(MemberInfo::from));
        expected.extend(widget.get_properties(flags).into_iter().map(MemberInfo::from));

        assert_eq!(widget.get_members(flags), expected, "flags {flags:?}");
    }
    Ok(())
}

#[test]
fn test_default_equals_public_instance_for_every_kind() -> Result<()> {
    let fixture = load_fixture()?;
    let widget = widget(&fixture);
    let explicit = BindingFlags::PUBLIC | BindingFlags::INSTANCE;

    assert_eq!(widget.get_fields(BindingFlags::DEFAULT), widget.get_fields(explicit));
    assert_eq!(widget.get_methods(BindingFlags::DEFAULT), widget.get_methods(explicit));
    assert_eq!(
        widget.get_constructors(BindingFlags::DEFAULT),
        widget.get_constructors(explicit)
    );
    assert_eq!(
        widget.get_properties(BindingFlags::DEFAULT),
        widget.get_properties(explicit)
    );
    assert_eq!(widget.get_events(BindingFlags::DEFAULT), widget.get_events(explicit));
    assert_eq!(
        widget.get_nested_types(BindingFlags::DEFAULT),
        widget.get_nested_types(explicit)
    );
    assert_eq!(widget.get_members(BindingFlags::DEFAULT), widget.get_members(explicit));
    Ok(())
}

#[test]
fn test_filtering_is_idempotent() -> Result<()> {
    let fixture = load_fixture()?;
    let widget = widget(&fixture);
    let definition = widget.definition();

    for flags in all_flag_values() {
        let spec = FilterSpec::from(flags);

        let once = filter::filter(definition.fields.iter().map(|(_, f)| f), spec);
        let twice = filter::filter(&once, spec);
        assert_eq!(once.len(), twice.len());
        assert!(once.iter().zip(&twice).all(|(a, b)| Arc::ptr_eq(a, b)));

        let once = filter::filter(definition.properties.iter().map(|(_, p)| p), spec);
        let twice = filter::filter(&once, spec);
        assert_eq!(once.len(), twice.len());
        assert!(once.iter().zip(&twice).all(|(a, b)| Arc::ptr_eq(a, b)));
    }
    Ok(())
}

#[test]
fn test_property_matches_through_setter() -> Result<()> {
    let fixture = load_fixture()?;
    let widget = widget(&fixture);

    let public = widget.get_properties(BindingFlags::DEFAULT);
    assert_eq!(names(&public, |p| p.name()), ["Name"]);

    let hidden = widget.get_properties(BindingFlags::NON_PUBLIC | BindingFlags::STATIC);
    assert_eq!(names(&hidden, |p| p.name()), ["Cache"]);
    assert!(widget.get_property("cache", BindingFlags::NON_PUBLIC | BindingFlags::STATIC).is_none());
    assert!(widget
        .get_property(
            "cache",
            BindingFlags::NON_PUBLIC | BindingFlags::STATIC | BindingFlags::IGNORE_CASE
        )
        .is_some());
    Ok(())
}

#[test]
fn test_absence_propagates_through_chains() -> Result<()> {
    let fixture = load_fixture()?;
    let app = AssemblyHandle::new(fixture.app.clone());

    // Widget[] -> Widget -> WidgetBase -> System.Object (not loaded)
    let array = app.get_type("Contoso.App.Widget[]").expect("array type");
    let element = array.element_type().expect("element resolves");
    let base = element.base_type().expect("base resolves");
    assert!(base.base_type().is_none());
    assert!(array
        .element_type()
        .and_then(|t| t.base_type())
        .and_then(|t| t.base_type())
        .and_then(|t| t.element_type())
        .is_none());

    // Part -> Widget -> not nested -> anything
    let part = app.get_type("Contoso.App.Widget/Part").expect("nested type");
    assert!(part
        .declaring_type()
        .and_then(|t| t.declaring_type())
        .and_then(|t| t.base_type())
        .and_then(|t| t.element_type())
        .is_none());

    // Part -> unresolved base -> anything
    assert!(part
        .base_type()
        .and_then(|t| t.declaring_type())
        .and_then(|t| t.base_type())
        .is_none());

    // A class has no element type even when asked through a chain
    assert!(part
        .declaring_type()
        .and_then(|t| t.element_type())
        .is_none());
    Ok(())
}

#[test]
fn test_assembly_handle_is_memoized() -> Result<()> {
    let fixture = load_fixture()?;
    let widget = TypeHandle::new(fixture.app.find_type("Contoso.App.Widget").expect("widget"));

    let first = widget.assembly().expect("owned by Contoso.App");
    let second = widget.assembly().expect("owned by Contoso.App");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.name(), "Contoso.App");

    let module = widget.module().expect("owned by Contoso.App.dll");
    assert!(Arc::ptr_eq(&module, &widget.module().expect("memoized")));
    assert_eq!(module.name(), "Contoso.App.dll");

    // A separately constructed handle memoizes its own instance
    let again = TypeHandle::new(widget.definition().clone());
    let third = again.assembly().expect("owned by Contoso.App");
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(*first, *third);
    assert_eq!(again, widget);
    Ok(())
}

#[test]
fn test_unsupported_and_unimplemented_are_distinct() -> Result<()> {
    let fixture = load_fixture()?;
    let widget = widget(&fixture);

    assert!(matches!(widget.guid(), Err(Error::NotSupported(_))));
    assert!(matches!(widget.is_com_object(), Err(Error::NotSupported(_))));
    assert!(matches!(widget.assembly_qualified_name(), Err(Error::NotImplemented(_))));

    let ctor = widget
        .get_constructor(".ctor", BindingFlags::DEFAULT)
        .expect("public constructor");
    assert!(matches!(ctor.invoke(), Err(Error::NotImplemented(_))));
    assert!(matches!(ctor.parameters(), Err(Error::NotImplemented(_))));
    Ok(())
}

#[test]
fn test_universe_resolution_counts() -> Result<()> {
    let fixture = load_fixture()?;

    assert_eq!(fixture.universe.len(), 2);
    assert!(fixture
        .universe
        .resolve(&ImportedType::new("contoso.api", "Contoso.Api", "IFOO"))
        .is_some());
    assert!(fixture
        .universe
        .resolve(&ImportedType::new("Missing.Assembly", "Missing", "IGone"))
        .is_none());
    Ok(())
}
