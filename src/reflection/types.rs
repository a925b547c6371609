//! The query handle for type definitions.
//!
//! [`TypeHandle`] is the entry point of the query API: the per-kind member queries, the
//! interface lookups and the attribute accessors of a type all live here.
//!
//! # Identity
//!
//! A handle memoizes the [`AssemblyHandle`] and [`ModuleHandle`] it belongs to. The first
//! access fills the slot, every later access through the same handle (or a clone of it taken
//! afterwards) returns that same instance. Independently constructed handles for the same
//! definition memoize independently; they still compare equal, since equality is defined by
//! the wrapped definition. Handles issued by [`AssemblyHandle::get_types`] are pre-seeded with
//! the issuing assembly handle.
//!
//! # Examples
//!
//! ```rust
//! use dotreflect::prelude::*;
//!
//! let widget = TypeBuilder::new("Contoso", "Widget").public().build()?;
//! widget.add_field(Field::new(1, "count", FieldAttributes::PUBLIC))?;
//! widget.add_field(Field::new(2, "cache", FieldAttributes::PRIVATE | FieldAttributes::STATIC))?;
//!
//! let handle = TypeHandle::new(widget);
//! let public: Vec<_> = handle.get_fields(BindingFlags::DEFAULT);
//! assert_eq!(public.len(), 1);
//!
//! let hidden = handle.get_field("cache", BindingFlags::NON_PUBLIC | BindingFlags::STATIC);
//! assert!(hidden.is_some());
//! # Ok::<(), dotreflect::Error>(())
//! ```

use std::{
    borrow::Cow,
    fmt,
    sync::{Arc, OnceLock},
};

use tracing::trace;

use crate::{
    metadata::{
        members::{EventRc, FieldRc, MethodRc, PropertyRc},
        naming::NameCase,
        token::Token,
        typesystem::{CilFlavor, CilTypeRc, TypeReference},
    },
    reflection::{
        assembly::{AssemblyHandle, ModuleHandle},
        convert,
        filter::{self, find, find_all},
        flags::FilterSpec,
        member::MemberInfo,
        members::{ConstructorHandle, EventHandle, FieldHandle, MethodHandle, PropertyHandle},
    },
    Error, Result,
};

fn field_name(field: &FieldRc) -> Option<Cow<'_, str>> {
    Some(Cow::Borrowed(field.name.as_str()))
}

fn method_name(method: &MethodRc) -> Option<Cow<'_, str>> {
    Some(Cow::Borrowed(method.name.as_str()))
}

fn property_name(property: &PropertyRc) -> Option<Cow<'_, str>> {
    Some(Cow::Borrowed(property.name.as_str()))
}

fn event_name(event: &EventRc) -> Option<Cow<'_, str>> {
    Some(Cow::Borrowed(event.name.as_str()))
}

fn type_name(nested: &CilTypeRc) -> Option<Cow<'_, str>> {
    Some(Cow::Borrowed(nested.name.as_str()))
}

fn member_name(member: &MemberInfo) -> Option<Cow<'_, str>> {
    Some(Cow::Borrowed(member.name()))
}

/// A handle to a type definition
#[derive(Clone)]
pub struct TypeHandle {
    definition: CilTypeRc,
    assembly: OnceLock<Arc<AssemblyHandle>>,
    module: OnceLock<Arc<ModuleHandle>>,
}

impl TypeHandle {
    /// Wrap a type definition, with empty assembly and module slots
    pub fn new(definition: CilTypeRc) -> Self {
        TypeHandle {
            definition,
            assembly: OnceLock::new(),
            module: OnceLock::new(),
        }
    }

    /// Wrap a type definition whose owning assembly handle is already known
    ///
    /// ## Arguments
    /// * 'definition' - The type to wrap
    /// * 'assembly'   - The handle returned by [`TypeHandle::assembly`] from now on
    pub fn with_assembly(definition: CilTypeRc, assembly: Arc<AssemblyHandle>) -> Self {
        let handle = TypeHandle::new(definition);
        handle.assembly.set(assembly).ok();
        handle
    }

    pub(crate) fn with_module(definition: CilTypeRc, module: Arc<ModuleHandle>) -> Self {
        let handle = TypeHandle::new(definition);
        if let Some(assembly) = module.assembly() {
            handle.assembly.set(assembly).ok();
        }
        handle.module.set(module).ok();
        handle
    }

    /// The wrapped definition
    pub fn definition(&self) -> &CilTypeRc {
        &self.definition
    }

    /// The token of the type
    pub fn token(&self) -> Token {
        self.definition.token
    }

    /// The simple name of the type
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// The namespace of the type, empty for nested types
    pub fn namespace(&self) -> &str {
        &self.definition.namespace
    }

    /// `Namespace.Name`, with `/` separating nested types from their declaring type
    pub fn full_name(&self) -> String {
        self.definition.fullname()
    }

    /// The base type, `None` without a base or if it can not be resolved
    pub fn base_type(&self) -> Option<TypeHandle> {
        convert::resolve_in(&self.definition, self.definition.base())
    }

    /// The type this type is nested in
    pub fn declaring_type(&self) -> Option<TypeHandle> {
        convert::resolve_in(&self.definition, self.definition.declaring())
    }

    /// The element type of an array, pointer or byref type; `None` for every other flavor
    pub fn element_type(&self) -> Option<TypeHandle> {
        if !self.definition.flavor.is_composite() {
            return None;
        }
        convert::resolve_in(&self.definition, self.definition.element())
    }

    /// The owning assembly; computed on first access, then returned from the slot
    pub fn assembly(&self) -> Option<Arc<AssemblyHandle>> {
        if let Some(assembly) = self.assembly.get() {
            return Some(assembly.clone());
        }

        let definition = self.definition.assembly()?;
        trace!(name = %self.definition.name, assembly = %definition.name, "memoize assembly");
        // A concurrent first access may have won, its value is kept
        self.assembly.set(AssemblyHandle::new(definition)).ok();
        self.assembly.get().cloned()
    }

    /// The owning module; computed on first access, then returned from the slot
    pub fn module(&self) -> Option<Arc<ModuleHandle>> {
        if let Some(module) = self.module.get() {
            return Some(module.clone());
        }

        let definition = self.definition.module()?;
        trace!(name = %self.definition.name, module = %definition.name, "memoize module");
        self.module.set(ModuleHandle::new(definition)).ok();
        self.module.get().cloned()
    }

    /// Does the type declare generic parameters
    pub fn contains_generic_parameters(&self) -> bool {
        self.definition.generic_params.count() != 0
    }

    /// Is the type visible outside its assembly, top-level or nested
    pub fn is_public(&self) -> bool {
        self.definition.is_public()
    }

    /// Is the type nested in another type
    pub fn is_nested(&self) -> bool {
        self.definition.is_nested()
    }

    /// Is the type an array
    pub fn is_array(&self) -> bool {
        matches!(self.definition.flavor, CilFlavor::Array { .. })
    }

    /// Is the type an unmanaged pointer
    pub fn is_pointer(&self) -> bool {
        self.definition.flavor == CilFlavor::Pointer
    }

    /// Is the type a managed reference
    pub fn is_by_ref(&self) -> bool {
        self.definition.flavor == CilFlavor::ByRef
    }

    /// Is the type one of the primitive types
    pub fn is_primitive(&self) -> bool {
        self.definition.flavor.is_primitive()
    }

    /// Is the type an interface
    pub fn is_interface(&self) -> bool {
        self.definition.is_interface()
    }

    /// Is the type a value type
    pub fn is_value_type(&self) -> bool {
        self.definition.flavor.is_value_type()
    }

    /// Does the type wrap an element type, resolvable or not
    pub fn has_element_type(&self) -> bool {
        self.definition.flavor.is_composite() && self.definition.element().is_some()
    }

    /// The fields matching `flags`
    pub fn get_fields(&self, flags: impl Into<FilterSpec>) -> Vec<FieldHandle> {
        filter::filter(self.definition.fields.iter().map(|(_, f)| f), flags.into())
            .into_iter()
            .map(FieldHandle::new)
            .collect()
    }

    /// The first field named `name` among those matching `flags`
    pub fn get_field(&self, name: &str, flags: impl Into<FilterSpec>) -> Option<FieldHandle> {
        let spec = flags.into();
        let fields = filter::filter(self.definition.fields.iter().map(|(_, f)| f), spec);
        find(&fields, field_name, name, spec.case).map(FieldHandle::new)
    }

    /// The ordinary methods matching `flags`, constructors excluded
    pub fn get_methods(&self, flags: impl Into<FilterSpec>) -> Vec<MethodHandle> {
        filter::filter_methods(self.definition.methods.iter().map(|(_, m)| m), flags.into())
            .into_iter()
            .map(MethodHandle::new)
            .collect()
    }

    /// The first ordinary method named `name` among those matching `flags`
    pub fn get_method(&self, name: &str, flags: impl Into<FilterSpec>) -> Option<MethodHandle> {
        let spec = flags.into();
        let methods =
            filter::filter_methods(self.definition.methods.iter().map(|(_, m)| m), spec);
        find(&methods, method_name, name, spec.case).map(MethodHandle::new)
    }

    /// The constructors matching `flags`
    pub fn get_constructors(&self, flags: impl Into<FilterSpec>) -> Vec<ConstructorHandle> {
        filter::filter_constructors(self.definition.methods.iter().map(|(_, m)| m), flags.into())
            .into_iter()
            .map(ConstructorHandle::new)
            .collect()
    }

    /// The first constructor named `name` (`.ctor` or `.cctor`) among those matching `flags`
    pub fn get_constructor(
        &self,
        name: &str,
        flags: impl Into<FilterSpec>,
    ) -> Option<ConstructorHandle> {
        let spec = flags.into();
        let ctors =
            filter::filter_constructors(self.definition.methods.iter().map(|(_, m)| m), spec);
        find(&ctors, method_name, name, spec.case).map(ConstructorHandle::new)
    }

    /// The properties matching `flags`, checked through their getter, else setter
    pub fn get_properties(&self, flags: impl Into<FilterSpec>) -> Vec<PropertyHandle> {
        filter::filter(self.definition.properties.iter().map(|(_, p)| p), flags.into())
            .into_iter()
            .map(PropertyHandle::new)
            .collect()
    }

    /// The first property named `name` among those matching `flags`
    pub fn get_property(&self, name: &str, flags: impl Into<FilterSpec>) -> Option<PropertyHandle> {
        let spec = flags.into();
        let properties = filter::filter(self.definition.properties.iter().map(|(_, p)| p), spec);
        find(&properties, property_name, name, spec.case).map(PropertyHandle::new)
    }

    /// The events matching `flags`, checked through their add accessor first
    pub fn get_events(&self, flags: impl Into<FilterSpec>) -> Vec<EventHandle> {
        filter::filter(self.definition.events.iter().map(|(_, e)| e), flags.into())
            .into_iter()
            .map(EventHandle::new)
            .collect()
    }

    /// The first event named `name` among those matching `flags`
    pub fn get_event(&self, name: &str, flags: impl Into<FilterSpec>) -> Option<EventHandle> {
        let spec = flags.into();
        let events = filter::filter(self.definition.events.iter().map(|(_, e)| e), spec);
        find(&events, event_name, name, spec.case).map(EventHandle::new)
    }

    /// The nested types matching the visibility axis of `flags`
    pub fn get_nested_types(&self, flags: impl Into<FilterSpec>) -> Vec<TypeHandle> {
        filter::filter(self.definition.nested_types.iter().map(|(_, t)| t), flags.into())
            .into_iter()
            .map(TypeHandle::new)
            .collect()
    }

    /// The first nested type named `name` among those matching `flags`
    pub fn get_nested_type(&self, name: &str, flags: impl Into<FilterSpec>) -> Option<TypeHandle> {
        let spec = flags.into();
        let nested = filter::filter(self.definition.nested_types.iter().map(|(_, t)| t), spec);
        find(&nested, type_name, name, spec.case).map(TypeHandle::new)
    }

    /// The interface references of the type, in declaration order, unresolved
    pub fn interface_references(&self) -> Vec<TypeReference> {
        self.definition
            .interfaces
            .iter()
            .map(|(_, interface)| interface.clone())
            .collect()
    }

    /// The implemented interfaces, one entry per reference in declaration order; no flags apply
    ///
    /// An interface that can not be resolved keeps its position as `None`.
    pub fn get_interfaces(&self) -> Vec<Option<TypeHandle>> {
        self.definition
            .interfaces
            .iter()
            .map(|(_, interface)| convert::resolve_in(&self.definition, Some(interface)))
            .collect()
    }

    /// The first interface whose name is `name`
    ///
    /// The name carried by the reference is matched before resolving, so a matching
    /// interface that can not be resolved yields `None`.
    ///
    /// ## Arguments
    /// * 'name'        - The simple name of the interface
    /// * 'ignore_case' - Fold case when comparing
    pub fn get_interface(&self, name: &str, ignore_case: bool) -> Option<TypeHandle> {
        let interface = find(
            self.definition.interfaces.iter().map(|(_, i)| i),
            TypeReference::name,
            name,
            NameCase::from_ignore_case(ignore_case),
        )?;
        convert::resolve_in(&self.definition, Some(&interface))
    }

    /// Constructors, events, fields, methods and properties matching `flags`, in that order
    pub fn get_members(&self, flags: impl Into<FilterSpec>) -> Vec<MemberInfo> {
        let spec = flags.into();
        let mut members: Vec<MemberInfo> = Vec::new();
        members.extend(self.get_constructors(spec).into_iter().map(MemberInfo::from));
        members.extend(self.get_events(spec).into_iter().map(MemberInfo::from));
        members.extend(self.get_fields(spec).into_iter().map(MemberInfo::from));
        members.extend(self.get_methods(spec).into_iter().map(MemberInfo::from));
        members.extend(self.get_properties(spec).into_iter().map(MemberInfo::from));
        members
    }

    /// Every member named `name` among [`TypeHandle::get_members`], in the same order
    pub fn get_member(&self, name: &str, flags: impl Into<FilterSpec>) -> Vec<MemberInfo> {
        let spec = flags.into();
        find_all(&self.get_members(spec), member_name, name, spec.case)
    }

    /// # Errors
    /// Always returns [`Error::NotSupported`], a GUID is assigned by the runtime.
    pub fn guid(&self) -> Result<[u8; 16]> {
        Err(Error::NotSupported("TypeHandle::guid"))
    }

    /// # Errors
    /// Always returns [`Error::NotSupported`], there is no runtime type behind a handle.
    pub fn underlying_system_type(&self) -> Result<TypeHandle> {
        Err(Error::NotSupported("TypeHandle::underlying_system_type"))
    }

    /// The types of the custom attributes applied to this type
    ///
    /// # Errors
    /// Always returns [`Error::NotSupported`], attribute instances need a runtime.
    pub fn custom_attributes(&self) -> Result<Vec<TypeHandle>> {
        Err(Error::NotSupported("TypeHandle::custom_attributes"))
    }

    /// # Errors
    /// Always returns [`Error::NotSupported`].
    pub fn is_com_object(&self) -> Result<bool> {
        Err(Error::NotSupported("TypeHandle::is_com_object"))
    }

    /// # Errors
    /// Always returns [`Error::NotImplemented`].
    pub fn is_defined(&self, _attribute: &TypeHandle) -> Result<bool> {
        Err(Error::NotImplemented("TypeHandle::is_defined"))
    }

    /// # Errors
    /// Always returns [`Error::NotImplemented`].
    pub fn attribute_flags(&self) -> Result<u32> {
        Err(Error::NotImplemented("TypeHandle::attribute_flags"))
    }

    /// # Errors
    /// Always returns [`Error::NotImplemented`].
    pub fn assembly_qualified_name(&self) -> Result<String> {
        Err(Error::NotImplemented("TypeHandle::assembly_qualified_name"))
    }

    /// # Errors
    /// Always returns [`Error::NotImplemented`], nothing is ever executed.
    pub fn invoke_member(&self, _name: &str, _flags: impl Into<FilterSpec>) -> Result<()> {
        Err(Error::NotImplemented("TypeHandle::invoke_member"))
    }

    /// Look up a method by name and parameter types
    ///
    /// # Errors
    /// Always returns [`Error::NotImplemented`], signatures are not modeled.
    pub fn get_method_by_signature(
        &self,
        _name: &str,
        _flags: impl Into<FilterSpec>,
        _parameter_types: &[TypeHandle],
    ) -> Result<Option<MethodHandle>> {
        Err(Error::NotImplemented("TypeHandle::get_method_by_signature"))
    }

    /// Look up a constructor by parameter types
    ///
    /// # Errors
    /// Always returns [`Error::NotImplemented`], signatures are not modeled.
    pub fn get_constructor_by_signature(
        &self,
        _flags: impl Into<FilterSpec>,
        _parameter_types: &[TypeHandle],
    ) -> Result<Option<ConstructorHandle>> {
        Err(Error::NotImplemented("TypeHandle::get_constructor_by_signature"))
    }

    /// Look up a property by name, return type and index parameter types
    ///
    /// # Errors
    /// Always returns [`Error::NotImplemented`], signatures are not modeled.
    pub fn get_property_by_signature(
        &self,
        _name: &str,
        _flags: impl Into<FilterSpec>,
        _return_type: Option<&TypeHandle>,
        _parameter_types: &[TypeHandle],
    ) -> Result<Option<PropertyHandle>> {
        Err(Error::NotImplemented("TypeHandle::get_property_by_signature"))
    }
}

impl From<CilTypeRc> for TypeHandle {
    fn from(definition: CilTypeRc) -> Self {
        TypeHandle::new(definition)
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.definition, &other.definition)
    }
}

impl Eq for TypeHandle {}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHandle")
            .field("token", &self.definition.token)
            .field("full_name", &self.definition.fullname())
            .finish_non_exhaustive()
    }
}
