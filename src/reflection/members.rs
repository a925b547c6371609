//! Query handles for fields, methods, constructors, properties and events.
//!
//! Each handle wraps exactly one member definition. Handles are cheap to clone and compare
//! equal when they wrap the same definition.

use std::{fmt, sync::Arc};

use crate::{
    metadata::{
        members::{
            EventRc, FieldRc, MethodAccessFlags, MethodModifiers, MethodRc, PropertyRc,
        },
        token::Token,
        typesystem::{CilTypeRc, TypeReference},
    },
    reflection::{convert, types::TypeHandle},
    Error, Result,
};

/// Resolve a reference of a member, in the context of its declaring type
fn resolve_member_reference(
    declaring: Option<CilTypeRc>,
    reference: Option<&TypeReference>,
) -> Option<TypeHandle> {
    match declaring {
        Some(declaring) => convert::resolve_in(&declaring, reference),
        None => convert::reference_to_handle(reference, None),
    }
}

/// An accessor is returned if it is public, or if non-public accessors were asked for
fn visible_accessor(accessor: Option<&MethodRc>, non_public: bool) -> Option<MethodHandle> {
    accessor
        .filter(|method| non_public || method.is_public())
        .map(|method| MethodHandle::new(method.clone()))
}

/// A handle to a field
#[derive(Clone)]
pub struct FieldHandle {
    definition: FieldRc,
}

impl FieldHandle {
    /// Wrap a field definition
    pub fn new(definition: FieldRc) -> Self {
        FieldHandle { definition }
    }

    /// The wrapped definition
    pub fn definition(&self) -> &FieldRc {
        &self.definition
    }

    /// The name of the field
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// The token of the field
    pub fn token(&self) -> Token {
        self.definition.token
    }

    /// The raw `FieldAttributes`
    pub fn attributes(&self) -> u32 {
        self.definition.flags
    }

    /// Is the field public
    pub fn is_public(&self) -> bool {
        self.definition.is_public()
    }

    /// Is the field static
    pub fn is_static(&self) -> bool {
        self.definition.is_static()
    }

    /// Is the field a compile-time constant
    pub fn is_literal(&self) -> bool {
        self.definition.is_literal()
    }

    /// The type declaring this field
    pub fn declaring_type(&self) -> Option<TypeHandle> {
        convert::to_handle(self.definition.declaring())
    }

    /// The type of the field, `None` if it can not be resolved
    pub fn field_type(&self) -> Option<TypeHandle> {
        resolve_member_reference(
            self.definition.declaring(),
            self.definition.field_type.as_ref(),
        )
    }
}

impl From<FieldRc> for FieldHandle {
    fn from(definition: FieldRc) -> Self {
        FieldHandle::new(definition)
    }
}

impl PartialEq for FieldHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.definition, &other.definition)
    }
}

impl fmt::Debug for FieldHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHandle")
            .field("token", &self.definition.token)
            .field("name", &self.definition.name)
            .finish()
    }
}

/// A handle to an ordinary method
#[derive(Clone)]
pub struct MethodHandle {
    definition: MethodRc,
}

impl MethodHandle {
    /// Wrap a method definition
    pub fn new(definition: MethodRc) -> Self {
        MethodHandle { definition }
    }

    /// The wrapped definition
    pub fn definition(&self) -> &MethodRc {
        &self.definition
    }

    /// The name of the method
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// The token of the method
    pub fn token(&self) -> Token {
        self.definition.token
    }

    /// The access part of the `MethodAttributes`
    pub fn access(&self) -> MethodAccessFlags {
        self.definition.access()
    }

    /// The modifier part of the `MethodAttributes`
    pub fn modifiers(&self) -> MethodModifiers {
        self.definition.modifiers()
    }

    /// Is the method public
    pub fn is_public(&self) -> bool {
        self.definition.is_public()
    }

    /// Is the method static
    pub fn is_static(&self) -> bool {
        self.definition.is_static()
    }

    /// Is the method virtual
    pub fn is_virtual(&self) -> bool {
        self.definition.is_virtual()
    }

    /// Is the method abstract
    pub fn is_abstract(&self) -> bool {
        self.definition.is_abstract()
    }

    /// The type declaring this method
    pub fn declaring_type(&self) -> Option<TypeHandle> {
        convert::to_handle(self.definition.declaring())
    }

    /// # Errors
    /// Always returns [`Error::NotImplemented`], parameters are not modeled.
    pub fn parameters(&self) -> Result<Vec<TypeHandle>> {
        Err(Error::NotImplemented("MethodHandle::parameters"))
    }

    /// # Errors
    /// Always returns [`Error::NotImplemented`], nothing is ever executed.
    pub fn invoke(&self) -> Result<()> {
        Err(Error::NotImplemented("MethodHandle::invoke"))
    }
}

impl From<MethodRc> for MethodHandle {
    fn from(definition: MethodRc) -> Self {
        MethodHandle::new(definition)
    }
}

impl PartialEq for MethodHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.definition, &other.definition)
    }
}

impl fmt::Debug for MethodHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodHandle")
            .field("token", &self.definition.token)
            .field("name", &self.definition.name)
            .finish()
    }
}

/// A handle to a constructor or type initializer
#[derive(Clone)]
pub struct ConstructorHandle {
    definition: MethodRc,
}

impl ConstructorHandle {
    /// Wrap a constructor definition
    pub fn new(definition: MethodRc) -> Self {
        ConstructorHandle { definition }
    }

    /// The wrapped definition
    pub fn definition(&self) -> &MethodRc {
        &self.definition
    }

    /// Either `.ctor` or `.cctor`
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// The token of the constructor
    pub fn token(&self) -> Token {
        self.definition.token
    }

    /// Is the constructor public
    pub fn is_public(&self) -> bool {
        self.definition.is_public()
    }

    /// Is this the static type initializer
    pub fn is_static(&self) -> bool {
        self.definition.is_static()
    }

    /// The type declaring this constructor
    pub fn declaring_type(&self) -> Option<TypeHandle> {
        convert::to_handle(self.definition.declaring())
    }

    /// # Errors
    /// Always returns [`Error::NotImplemented`].
    pub fn method_implementation_flags(&self) -> Result<u32> {
        Err(Error::NotImplemented("ConstructorHandle::method_implementation_flags"))
    }

    /// # Errors
    /// Always returns [`Error::NotImplemented`], parameters are not modeled.
    pub fn parameters(&self) -> Result<Vec<TypeHandle>> {
        Err(Error::NotImplemented("ConstructorHandle::parameters"))
    }

    /// # Errors
    /// Always returns [`Error::NotImplemented`], nothing is ever executed.
    pub fn invoke(&self) -> Result<()> {
        Err(Error::NotImplemented("ConstructorHandle::invoke"))
    }
}

impl From<MethodRc> for ConstructorHandle {
    fn from(definition: MethodRc) -> Self {
        ConstructorHandle::new(definition)
    }
}

impl PartialEq for ConstructorHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.definition, &other.definition)
    }
}

impl fmt::Debug for ConstructorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorHandle")
            .field("token", &self.definition.token)
            .field("name", &self.definition.name)
            .finish()
    }
}

/// A handle to a property
#[derive(Clone)]
pub struct PropertyHandle {
    definition: PropertyRc,
}

impl PropertyHandle {
    /// Wrap a property definition
    pub fn new(definition: PropertyRc) -> Self {
        PropertyHandle { definition }
    }

    /// The wrapped definition
    pub fn definition(&self) -> &PropertyRc {
        &self.definition
    }

    /// The name of the property
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// The token of the property
    pub fn token(&self) -> Token {
        self.definition.token
    }

    /// Is the getter, else the setter, public; false without accessors
    pub fn is_public(&self) -> bool {
        self.definition
            .primary_accessor()
            .is_some_and(|accessor| accessor.is_public())
    }

    /// Is the getter, else the setter, static; false without accessors
    pub fn is_static(&self) -> bool {
        self.definition
            .primary_accessor()
            .is_some_and(|accessor| accessor.is_static())
    }

    /// Does the property have a getter
    pub fn can_read(&self) -> bool {
        self.definition.fn_getter.is_some()
    }

    /// Does the property have a setter
    pub fn can_write(&self) -> bool {
        self.definition.fn_setter.is_some()
    }

    /// The getter
    ///
    /// ## Arguments
    /// * 'non_public' - Also return a non-public getter
    pub fn getter(&self, non_public: bool) -> Option<MethodHandle> {
        visible_accessor(self.definition.fn_getter.as_ref(), non_public)
    }

    /// The setter
    ///
    /// ## Arguments
    /// * 'non_public' - Also return a non-public setter
    pub fn setter(&self, non_public: bool) -> Option<MethodHandle> {
        visible_accessor(self.definition.fn_setter.as_ref(), non_public)
    }

    /// The type declaring this property
    pub fn declaring_type(&self) -> Option<TypeHandle> {
        convert::to_handle(self.definition.declaring())
    }
}

impl From<PropertyRc> for PropertyHandle {
    fn from(definition: PropertyRc) -> Self {
        PropertyHandle::new(definition)
    }
}

impl PartialEq for PropertyHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.definition, &other.definition)
    }
}

impl fmt::Debug for PropertyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyHandle")
            .field("token", &self.definition.token)
            .field("name", &self.definition.name)
            .finish()
    }
}

/// A handle to an event
#[derive(Clone)]
pub struct EventHandle {
    definition: EventRc,
}

impl EventHandle {
    /// Wrap an event definition
    pub fn new(definition: EventRc) -> Self {
        EventHandle { definition }
    }

    /// The wrapped definition
    pub fn definition(&self) -> &EventRc {
        &self.definition
    }

    /// The name of the event
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// The token of the event
    pub fn token(&self) -> Token {
        self.definition.token
    }

    /// The delegate type of the event, `None` if it can not be resolved
    pub fn event_type(&self) -> Option<TypeHandle> {
        resolve_member_reference(
            self.definition.declaring(),
            self.definition.event_type.as_ref(),
        )
    }

    /// The add accessor
    ///
    /// ## Arguments
    /// * 'non_public' - Also return a non-public accessor
    pub fn add_method(&self, non_public: bool) -> Option<MethodHandle> {
        visible_accessor(self.definition.fn_on_add.as_ref(), non_public)
    }

    /// The remove accessor
    ///
    /// ## Arguments
    /// * 'non_public' - Also return a non-public accessor
    pub fn remove_method(&self, non_public: bool) -> Option<MethodHandle> {
        visible_accessor(self.definition.fn_on_remove.as_ref(), non_public)
    }

    /// The raise accessor
    ///
    /// ## Arguments
    /// * 'non_public' - Also return a non-public accessor
    pub fn raise_method(&self, non_public: bool) -> Option<MethodHandle> {
        visible_accessor(self.definition.fn_on_raise.as_ref(), non_public)
    }

    /// The type declaring this event
    pub fn declaring_type(&self) -> Option<TypeHandle> {
        convert::to_handle(self.definition.declaring())
    }
}

impl From<EventRc> for EventHandle {
    fn from(definition: EventRc) -> Self {
        EventHandle::new(definition)
    }
}

impl PartialEq for EventHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.definition, &other.definition)
    }
}

impl fmt::Debug for EventHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandle")
            .field("token", &self.definition.token)
            .field("name", &self.definition.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{
            members::{Event, Field, FieldAttributes, Method, Property},
            typesystem::{TypeBuilder, TypeReference},
        },
        test::create_accessor,
    };

    #[test]
    fn test_field_handle() {
        let widget = TypeBuilder::new("Contoso", "Widget").build().unwrap();
        let pointee = TypeBuilder::new("Contoso", "Gadget").build().unwrap();
        let field = widget
            .add_field(
                Field::new(1, "gadget", FieldAttributes::PUBLIC)
                    .with_type(TypeReference::definition(&pointee)),
            )
            .unwrap();

        let handle = FieldHandle::from(field.clone());
        assert_eq!(handle.name(), "gadget");
        assert!(handle.is_public());
        assert!(!handle.is_static());
        assert_eq!(handle.declaring_type().unwrap().full_name(), "Contoso.Widget");
        assert_eq!(handle.field_type().unwrap().full_name(), "Contoso.Gadget");
        assert_eq!(handle, FieldHandle::new(field));
    }

    #[test]
    fn test_field_type_unresolved() {
        let widget = TypeBuilder::new("Contoso", "Widget").build().unwrap();
        let field = widget
            .add_field(
                Field::new(1, "remote", FieldAttributes::PRIVATE)
                    .with_type(TypeReference::imported("Elsewhere", "Remote", "Thing")),
            )
            .unwrap();

        assert!(FieldHandle::new(field).field_type().is_none());
    }

    #[test]
    fn test_property_accessors() {
        let widget = TypeBuilder::new("Contoso", "Widget").build().unwrap();
        let getter = widget
            .add_method(create_accessor(1, "get_Size", MethodAccessFlags::PUBLIC, MethodModifiers::empty()))
            .unwrap();
        let setter = widget
            .add_method(create_accessor(2, "set_Size", MethodAccessFlags::PRIVATE, MethodModifiers::empty()))
            .unwrap();
        let property = widget
            .add_property(Property::new(1, "Size", 0).with_getter(&getter).with_setter(&setter))
            .unwrap();

        let handle = PropertyHandle::new(property);
        assert!(handle.is_public());
        assert!(!handle.is_static());
        assert!(handle.can_read());
        assert!(handle.can_write());
        assert_eq!(handle.getter(false).unwrap().name(), "get_Size");
        assert!(handle.setter(false).is_none());
        assert_eq!(handle.setter(true).unwrap().name(), "set_Size");
        assert_eq!(handle.declaring_type().unwrap().name(), "Widget");
    }

    #[test]
    fn test_event_accessors() {
        let widget = TypeBuilder::new("Contoso", "Widget").build().unwrap();
        let add = widget
            .add_method(create_accessor(1, "add_Changed", MethodAccessFlags::PUBLIC, MethodModifiers::empty()))
            .unwrap();
        let raise = widget
            .add_method(create_accessor(2, "raise_Changed", MethodAccessFlags::FAMILY, MethodModifiers::empty()))
            .unwrap();
        let event = widget
            .add_event(
                Event::new(1, "Changed", 0)
                    .with_add(&add)
                    .with_raise(&raise)
                    .with_type(TypeReference::imported("System.Runtime", "System", "EventHandler")),
            )
            .unwrap();

        let handle = EventHandle::new(event);
        assert_eq!(handle.add_method(false).unwrap().name(), "add_Changed");
        assert!(handle.remove_method(true).is_none());
        assert!(handle.raise_method(false).is_none());
        assert!(handle.raise_method(true).is_some());
        // The widget is not part of any universe, the imported delegate type stays unresolved
        assert!(handle.event_type().is_none());
    }

    #[test]
    fn test_constructor_unimplemented_surface() {
        let widget = TypeBuilder::new("Contoso", "Widget").build().unwrap();
        let ctor = widget
            .add_method(Method::constructor(1, MethodAccessFlags::PUBLIC.bits()))
            .unwrap();

        let handle = ConstructorHandle::new(ctor);
        assert_eq!(handle.name(), ".ctor");
        assert!(!handle.is_static());
        assert!(matches!(handle.invoke(), Err(Error::NotImplemented(_))));
        assert!(matches!(handle.parameters(), Err(Error::NotImplemented(_))));
        assert!(matches!(
            handle.method_implementation_flags(),
            Err(Error::NotImplemented(_))
        ));
    }

    #[test]
    fn test_method_handle() {
        let widget = TypeBuilder::new("Contoso", "Widget").build().unwrap();
        let flags = MethodAccessFlags::PUBLIC.bits()
            | MethodModifiers::VIRTUAL.bits()
            | MethodModifiers::ABSTRACT.bits();
        let method = widget.add_method(Method::new(1, "Render", flags)).unwrap();

        let handle = MethodHandle::new(method);
        assert!(handle.is_public());
        assert!(handle.is_virtual());
        assert!(handle.is_abstract());
        assert_eq!(handle.access(), MethodAccessFlags::PUBLIC);
        assert!(matches!(handle.invoke(), Err(Error::NotImplemented(_))));
        assert!(matches!(handle.parameters(), Err(Error::NotImplemented(_))));
    }
}
