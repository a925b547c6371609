//! .NET type definitions of the in-memory metadata graph.
//!
//! This module provides the type half of the metadata source the reflection layer queries:
//! type definitions with their member collections, references to other types, flavors and
//! generic parameters.
//!
//! # Key Components
//!
//! - [`CilType`]: A type definition, owning its members and nested types
//! - [`TypeReference`]: A possibly unresolvable reference to a type
//! - [`CilTypeRef`]: A weak link to a definition, used for back-references
//! - [`TypeBuilder`]: Builder pattern for constructing type definitions
//! - [`CilFlavor`]: The kind of type (class, interface, array, pointer, primitive, ...)
//!
//! # Ownership
//!
//! A module owns its top-level types, a type owns its nested types and members. Every link
//! pointing the other way (member to declaring type, type to module) is weak, so dropping the
//! owning [`crate::metadata::assembly::Assembly`] releases the whole graph.
//!
//! # Examples
//!
//! ```rust
//! use dotreflect::metadata::typesystem::{TypeBuilder, TypeReference};
//!
//! let widget = TypeBuilder::new("Contoso", "Widget")
//!     .public()
//!     .base(TypeReference::imported("System.Runtime", "System", "Object"))
//!     .build()?;
//!
//! assert_eq!(widget.fullname(), "Contoso.Widget");
//! assert!(widget.is_public());
//! # Ok::<(), dotreflect::Error>(())
//! ```

mod base;
mod builder;

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc, OnceLock, Weak,
};

pub use base::{
    CilFlavor, CilTypeRef, GenericParam, GenericParamList, ImportedType, TypeReference,
    TypeReferenceList,
};
pub use builder::TypeBuilder;

use crate::{
    metadata::{
        assembly::{AssemblyRc, Module, ModuleRc},
        members::{
            EventList, EventRc, FieldList, FieldRc, MethodList, MethodRc, PropertyList, PropertyRc,
        },
        naming::{nested_name, qualified_name},
        token::Token,
        universe::MetadataUniverse,
    },
    Result,
};

/// A vector that holds a list of `CilType`
pub type CilTypeList = Arc<boxcar::Vec<CilTypeRc>>;
/// Reference to a `CilType`
pub type CilTypeRc = Arc<CilType>;

/// Upper bound for walking declaring-type chains
pub(crate) const MAX_DECLARING_CHAIN: usize = 256;

#[allow(non_snake_case)]
/// All possible flags for `TypeAttributes`
pub mod TypeAttributes {
    /// Use this mask to retrieve visibility information. These 3 bits contain one of the following values:
    pub const VISIBILITY_MASK: u32 = 0x0000_0007;
    /// Class has no public scope
    pub const NOT_PUBLIC: u32 = 0x0000_0000;
    /// Class has public scope
    pub const PUBLIC: u32 = 0x0000_0001;
    /// Class is nested with public visibility
    pub const NESTED_PUBLIC: u32 = 0x0000_0002;
    /// Class is nested with private visibility
    pub const NESTED_PRIVATE: u32 = 0x0000_0003;
    /// Class is nested with family visibility
    pub const NESTED_FAMILY: u32 = 0x0000_0004;
    /// Class is nested with assembly visibility
    pub const NESTED_ASSEMBLY: u32 = 0x0000_0005;
    /// Class is nested with family and assembly visibility
    pub const NESTED_FAM_AND_ASSEM: u32 = 0x0000_0006;
    /// Class is nested with family or assembly visibility
    pub const NESTED_FAM_OR_ASSEM: u32 = 0x0000_0007;
    /// Type is an interface
    pub const INTERFACE: u32 = 0x0000_0020;
    /// Class is abstract
    pub const ABSTRACT: u32 = 0x0000_0080;
    /// Class cannot be extended
    pub const SEALED: u32 = 0x0000_0100;
    /// Class name is special
    pub const SPECIAL_NAME: u32 = 0x0000_0400;
}

static NEXT_ARTIFICIAL_ROW: AtomicU32 = AtomicU32::new(1);

/// Allocate a token for a type built without an explicit one
pub(crate) fn artificial_token() -> Token {
    Token::from_parts(0xF0, NEXT_ARTIFICIAL_ROW.fetch_add(1, Ordering::Relaxed))
}

/// A type definition of the metadata graph.
///
/// Member collections are append-only and keep declaration order; names are not required to
/// be unique. Flavor-dependent links (base, element, declaring) are set at most once.
pub struct CilType {
    /// Token
    pub token: Token,
    /// `TypeNamespace` (can be empty, e.g. for nested types or the artificial `<Module>`)
    pub namespace: String,
    /// `TypeName`
    pub name: String,
    /// Flags (a 4-byte bitmask of type `TypeAttributes`, §II.23.1.15)
    pub flags: u32,
    /// The `CilFlavor`
    pub flavor: CilFlavor,
    /// This types base aka 'extends'
    base: OnceLock<TypeReference>,
    /// The element type of arrays, pointers and byrefs
    element: OnceLock<TypeReference>,
    /// The type this type is nested in
    declaring: OnceLock<TypeReference>,
    /// The module this type belongs to
    module: OnceLock<Weak<Module>>,
    /// All interfaces this type implements, in declaration order, without duplicates
    pub interfaces: TypeReferenceList,
    /// All generic parameters this type has (type information, not the instantiated version)
    pub generic_params: GenericParamList,
    /// All types that are 'contained' in this type
    pub nested_types: CilTypeList,
    /// All fields this type has
    pub fields: FieldList,
    /// All methods this type has, constructors included
    pub methods: MethodList,
    /// All properties this type has
    pub properties: PropertyList,
    /// All events this type has
    pub events: EventList,
}

impl CilType {
    /// Create a new instance of a `CilType`, without members
    pub fn new(
        token: Token,
        namespace: String,
        name: String,
        flags: u32,
        flavor: CilFlavor,
    ) -> Self {
        CilType {
            token,
            namespace,
            name,
            flags,
            flavor,
            base: OnceLock::new(),
            element: OnceLock::new(),
            declaring: OnceLock::new(),
            module: OnceLock::new(),
            interfaces: Arc::new(boxcar::Vec::new()),
            generic_params: Arc::new(boxcar::Vec::new()),
            nested_types: Arc::new(boxcar::Vec::new()),
            fields: Arc::new(boxcar::Vec::new()),
            methods: Arc::new(boxcar::Vec::new()),
            properties: Arc::new(boxcar::Vec::new()),
            events: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Access the base type reference of this type, if it exists
    pub fn base(&self) -> Option<&TypeReference> {
        self.base.get()
    }

    /// Access the element type reference of an array, pointer or byref type
    pub fn element(&self) -> Option<&TypeReference> {
        self.element.get()
    }

    /// Access the declaring type reference of a nested type
    pub fn declaring(&self) -> Option<&TypeReference> {
        self.declaring.get()
    }

    pub(crate) fn set_base(&self, base: TypeReference) {
        self.base.set(base).ok();
    }

    pub(crate) fn set_element(&self, element: TypeReference) {
        self.element.set(element).ok();
    }

    /// The module this type (or its outermost declaring type) was added to
    pub fn module(&self) -> Option<ModuleRc> {
        if let Some(module) = self.module.get() {
            return module.upgrade();
        }

        let mut current = self.declaring_definition()?;
        for _ in 0..MAX_DECLARING_CHAIN {
            if let Some(module) = current.module.get() {
                return module.upgrade();
            }
            current = current.declaring_definition()?;
        }
        None
    }

    pub(crate) fn set_module(&self, module: &ModuleRc) -> bool {
        self.module.set(Arc::downgrade(module)).is_ok()
    }

    /// The assembly owning the module of this type
    pub fn assembly(&self) -> Option<AssemblyRc> {
        self.module()?.assembly()
    }

    /// The universe the owning assembly is loaded into
    pub fn universe(&self) -> Option<Arc<MetadataUniverse>> {
        self.assembly()?.universe()
    }

    fn declaring_definition(&self) -> Option<CilTypeRc> {
        match self.declaring.get()? {
            TypeReference::Definition(declaring) => declaring.upgrade(),
            TypeReference::Imported(_) => None,
        }
    }

    /// Returns the full name of the type, `Namespace.Name`, or `Declaring/Name` for nested types
    pub fn fullname(&self) -> String {
        if self.declaring.get().is_none() {
            return qualified_name(&self.namespace, &self.name);
        }

        let mut names = vec![self.name.clone()];
        let mut root = None;
        let mut link = self.declaring.get().cloned();
        for _ in 0..MAX_DECLARING_CHAIN {
            match link.take() {
                Some(TypeReference::Definition(declaring)) => {
                    let Some(declaring) = declaring.upgrade() else {
                        break;
                    };
                    if declaring.declaring.get().is_none() {
                        root = Some(qualified_name(&declaring.namespace, &declaring.name));
                        break;
                    }
                    names.push(declaring.name.clone());
                    link = declaring.declaring.get().cloned();
                }
                Some(TypeReference::Imported(imported)) => {
                    root = Some(imported.fullname());
                    break;
                }
                None => break,
            }
        }

        // A dropped declaring type leaves the outermost known name as the root
        let mut fullname = match root {
            Some(root) => root,
            None => names.pop().unwrap_or_default(),
        };
        for name in names.iter().rev() {
            fullname = nested_name(&fullname, name);
        }
        fullname
    }

    /// Is this type visible outside its assembly, as a top-level or nested public type
    pub fn is_public(&self) -> bool {
        matches!(
            self.flags & TypeAttributes::VISIBILITY_MASK,
            TypeAttributes::PUBLIC | TypeAttributes::NESTED_PUBLIC
        )
    }

    /// Is this type nested in another type
    pub fn is_nested(&self) -> bool {
        self.declaring.get().is_some()
            || (self.flags & TypeAttributes::VISIBILITY_MASK) >= TypeAttributes::NESTED_PUBLIC
    }

    /// Is this type an interface
    pub fn is_interface(&self) -> bool {
        self.flags & TypeAttributes::INTERFACE != 0 || self.flavor == CilFlavor::Interface
    }

    /// Count of declaring types above this one
    pub fn nesting_depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.declaring_definition();
        while let Some(declaring) = current {
            depth += 1;
            if depth >= MAX_DECLARING_CHAIN {
                break;
            }
            current = declaring.declaring_definition();
        }
        depth
    }

    /// Add a field to this type, and set the field's declaring type
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the field is already declared by a type.
    pub fn add_field(self: &Arc<Self>, field: impl Into<FieldRc>) -> Result<FieldRc> {
        let field: FieldRc = field.into();
        if !field.set_declaring(self) {
            return Err(malformed_error!(
                "Field '{}' ({}) is already declared by another type",
                field.name,
                field.token
            ));
        }
        self.fields.push(field.clone());
        Ok(field)
    }

    /// Add a method or constructor to this type, and set the method's declaring type
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the method is already declared by a type.
    pub fn add_method(self: &Arc<Self>, method: impl Into<MethodRc>) -> Result<MethodRc> {
        let method: MethodRc = method.into();
        if !method.set_declaring(self) {
            return Err(malformed_error!(
                "Method '{}' ({}) is already declared by another type",
                method.name,
                method.token
            ));
        }
        self.methods.push(method.clone());
        Ok(method)
    }

    /// Add a property to this type
    ///
    /// The accessors of the property have to be declared by this type already.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if an accessor belongs to another type, or if the
    /// property is already declared by a type.
    pub fn add_property(self: &Arc<Self>, property: impl Into<PropertyRc>) -> Result<PropertyRc> {
        let property: PropertyRc = property.into();
        for accessor in property.accessors() {
            if !self.declares_method(&accessor) {
                return Err(malformed_error!(
                    "Accessor '{}' of property '{}' is not declared by '{}'",
                    accessor.name,
                    property.name,
                    self.name
                ));
            }
        }
        if !property.set_declaring(self) {
            return Err(malformed_error!(
                "Property '{}' ({}) is already declared by another type",
                property.name,
                property.token
            ));
        }
        self.properties.push(property.clone());
        Ok(property)
    }

    /// Add an event to this type
    ///
    /// The accessors of the event have to be declared by this type already.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if an accessor belongs to another type, or if the
    /// event is already declared by a type.
    pub fn add_event(self: &Arc<Self>, event: impl Into<EventRc>) -> Result<EventRc> {
        let event: EventRc = event.into();
        for accessor in event.accessors() {
            if !self.declares_method(&accessor) {
                return Err(malformed_error!(
                    "Accessor '{}' of event '{}' is not declared by '{}'",
                    accessor.name,
                    event.name,
                    self.name
                ));
            }
        }
        if !event.set_declaring(self) {
            return Err(malformed_error!(
                "Event '{}' ({}) is already declared by another type",
                event.name,
                event.token
            ));
        }
        self.events.push(event.clone());
        Ok(event)
    }

    /// Add a nested type to this type, and set the nested type's declaring type
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the type is already nested somewhere, is a
    /// top-level type of a module, or is this type itself.
    pub fn add_nested_type(self: &Arc<Self>, nested: &CilTypeRc) -> Result<()> {
        if Arc::ptr_eq(self, nested) {
            return Err(malformed_error!("Type '{}' can not be nested in itself", self.name));
        }
        if nested.module.get().is_some() {
            return Err(malformed_error!(
                "Type '{}' is a top-level type of a module and can not be nested",
                nested.name
            ));
        }
        if nested.declaring.set(TypeReference::definition(self)).is_err() {
            return Err(malformed_error!(
                "Type '{}' is already nested in another type",
                nested.name
            ));
        }
        self.nested_types.push(nested.clone());
        Ok(())
    }

    /// Add an interface to this type; a reference to an already listed interface is ignored
    pub fn add_interface(&self, interface: TypeReference) {
        let listed = self
            .interfaces
            .iter()
            .any(|(_, existing)| existing.same_target(&interface));
        if !listed {
            self.interfaces.push(interface);
        }
    }

    /// Add a generic parameter to this type
    pub fn add_generic_param(&self, name: &str) {
        let number = self.generic_params.count() as u32;
        self.generic_params.push(GenericParam {
            number,
            name: name.to_string(),
        });
    }

    /// Look up a nested type by its simple name
    pub fn nested_type_by_name(&self, name: &str) -> Option<CilTypeRc> {
        self.nested_types
            .iter()
            .find(|(_, nested)| nested.name == name)
            .map(|(_, nested)| nested.clone())
    }

    fn declares_method(self: &Arc<Self>, method: &MethodRc) -> bool {
        method
            .declaring()
            .is_some_and(|declaring| Arc::ptr_eq(&declaring, self))
    }
}

impl std::fmt::Debug for CilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CilType")
            .field("token", &self.token)
            .field("fullname", &self.fullname())
            .field("flags", &format_args!("0x{:08x}", self.flags))
            .field("flavor", &self.flavor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{
            assembly::{Assembly, AssemblyVersion},
            members::{Event, Field, FieldAttributes, Method, MethodAccessFlags, Property},
        },
        Error,
    };

    #[test]
    fn test_fullname() {
        let top = TypeBuilder::new("Contoso", "Outer").build().unwrap();
        let global = TypeBuilder::new("", "<Module>").build().unwrap();
        assert_eq!(top.fullname(), "Contoso.Outer");
        assert_eq!(global.fullname(), "<Module>");

        let inner = TypeBuilder::new("", "Inner").nested_public().build().unwrap();
        let innermost = TypeBuilder::new("", "Innermost")
            .nested_private()
            .build()
            .unwrap();
        top.add_nested_type(&inner).unwrap();
        inner.add_nested_type(&innermost).unwrap();

        assert_eq!(inner.fullname(), "Contoso.Outer/Inner");
        assert_eq!(innermost.fullname(), "Contoso.Outer/Inner/Innermost");
        assert_eq!(innermost.nesting_depth(), 2);
        assert!(innermost.is_nested());
        assert!(!top.is_nested());
    }

    #[test]
    fn test_fullname_with_dropped_declaring() {
        let inner = TypeBuilder::new("", "Inner").nested_public().build().unwrap();
        {
            let outer = TypeBuilder::new("Contoso", "Outer").build().unwrap();
            outer.add_nested_type(&inner).unwrap();
        }
        assert_eq!(inner.fullname(), "Inner");
        assert!(inner.module().is_none());
    }

    #[test]
    fn test_module_through_declaring_chain() {
        let assembly = Assembly::new("Contoso.Core", AssemblyVersion::default());
        let module = Module::new("Contoso.Core.dll");
        assembly.add_module(&module).unwrap();

        let outer = TypeBuilder::new("Contoso", "Outer").build().unwrap();
        let inner = TypeBuilder::new("", "Inner").nested_public().build().unwrap();
        module.add_type(&outer).unwrap();
        outer.add_nested_type(&inner).unwrap();

        assert!(Arc::ptr_eq(&inner.module().unwrap(), &module));
        assert!(Arc::ptr_eq(&inner.assembly().unwrap(), &assembly));
        assert!(inner.universe().is_none());
    }

    #[test]
    fn test_nested_type_errors() {
        let outer = TypeBuilder::new("Contoso", "Outer").build().unwrap();
        let other = TypeBuilder::new("Contoso", "Other").build().unwrap();
        let inner = TypeBuilder::new("", "Inner").nested_public().build().unwrap();

        assert!(matches!(outer.add_nested_type(&outer), Err(Error::Malformed { .. })));

        outer.add_nested_type(&inner).unwrap();
        assert!(matches!(other.add_nested_type(&inner), Err(Error::Malformed { .. })));

        let module = Module::new("Contoso.Core.dll");
        let top = TypeBuilder::new("Contoso", "Top").build().unwrap();
        module.add_type(&top).unwrap();
        assert!(matches!(outer.add_nested_type(&top), Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_member_declared_once() {
        let first = TypeBuilder::new("Contoso", "First").build().unwrap();
        let second = TypeBuilder::new("Contoso", "Second").build().unwrap();

        let field = first
            .add_field(Field::new(1, "value", FieldAttributes::PUBLIC))
            .unwrap();
        assert!(Arc::ptr_eq(&field.declaring().unwrap(), &first));
        assert!(matches!(second.add_field(field), Err(Error::Malformed { .. })));
        assert_eq!(second.fields.count(), 0);

        let method = first
            .add_method(Method::new(1, "Run", MethodAccessFlags::PUBLIC.bits()))
            .unwrap();
        assert!(matches!(second.add_method(method), Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_accessors_must_be_declared_by_type() {
        let owner = TypeBuilder::new("Contoso", "Owner").build().unwrap();
        let stranger = TypeBuilder::new("Contoso", "Stranger").build().unwrap();
        let getter = stranger
            .add_method(Method::new(1, "get_Value", MethodAccessFlags::PUBLIC.bits()))
            .unwrap();
        let loose = Arc::new(Method::new(2, "add_Changed", MethodAccessFlags::PUBLIC.bits()));

        let property = Property::new(1, "Value", 0).with_getter(&getter);
        assert!(matches!(owner.add_property(property), Err(Error::Malformed { .. })));

        let event = Event::new(1, "Changed", 0).with_add(&loose);
        assert!(matches!(owner.add_event(event), Err(Error::Malformed { .. })));

        let property = stranger
            .add_property(Property::new(2, "Value", 0).with_getter(&getter))
            .unwrap();
        assert!(Arc::ptr_eq(&property.declaring().unwrap(), &stranger));
    }

    #[test]
    fn test_interfaces_without_duplicates() {
        let widget = TypeBuilder::new("Contoso", "Widget").build().unwrap();
        let local = TypeBuilder::new("Contoso", "ILocal").interface().build().unwrap();

        widget.add_interface(TypeReference::imported("System.Runtime", "System", "IDisposable"));
        widget.add_interface(TypeReference::imported("System.Runtime", "System", "IDisposable"));
        widget.add_interface(TypeReference::definition(&local));
        widget.add_interface(TypeReference::definition(&local));

        assert_eq!(widget.interfaces.count(), 2);
        assert!(local.is_interface());
    }

    #[test]
    fn test_visibility() {
        let public = TypeBuilder::new("Contoso", "A").public().build().unwrap();
        let internal = TypeBuilder::new("Contoso", "B").not_public().build().unwrap();
        let nested_public = TypeBuilder::new("", "C").nested_public().build().unwrap();
        let nested_private = TypeBuilder::new("", "D").nested_private().build().unwrap();

        assert!(public.is_public());
        assert!(!internal.is_public());
        assert!(nested_public.is_public());
        assert!(!nested_private.is_public());
        assert!(nested_private.is_nested());
    }

    #[test]
    fn test_generic_params_numbered() {
        let pair = TypeBuilder::new("Contoso", "Pair`2")
            .generic_param("TKey")
            .generic_param("TValue")
            .build()
            .unwrap();

        let params: Vec<(u32, String)> = pair
            .generic_params
            .iter()
            .map(|(_, param)| (param.number, param.name.clone()))
            .collect();
        assert_eq!(
            params,
            [(0, "TKey".to_string()), (1, "TValue".to_string())]
        );
    }
}
