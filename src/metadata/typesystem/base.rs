use std::{
    borrow::Cow,
    sync::{Arc, Weak},
};

use crate::metadata::{
    naming::qualified_name,
    typesystem::{CilType, CilTypeRc},
    universe::MetadataUniverse,
};

/// A vector that holds `TypeReference` instances
pub type TypeReferenceList = Arc<boxcar::Vec<TypeReference>>;
/// A vector that holds the generic parameters of a type
pub type GenericParamList = Arc<boxcar::Vec<GenericParam>>;

/// A smart reference to a `CilType` that automatically handles weak references
/// to prevent circular reference memory leaks while providing a clean API
#[derive(Clone, Debug)]
pub struct CilTypeRef {
    weak_ref: Weak<CilType>,
}

impl CilTypeRef {
    /// Create a new `CilTypeRef` from a strong reference
    pub fn new(strong_ref: &CilTypeRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the type, returning None if the type has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<CilTypeRc> {
        self.weak_ref.upgrade()
    }

    /// Check if both references point at the same definition
    #[must_use]
    pub fn ptr_eq(&self, other: &CilTypeRef) -> bool {
        Weak::ptr_eq(&self.weak_ref, &other.weak_ref)
    }
}

impl From<CilTypeRc> for CilTypeRef {
    fn from(strong_ref: CilTypeRc) -> Self {
        Self::new(&strong_ref)
    }
}

impl From<&CilTypeRc> for CilTypeRef {
    fn from(strong_ref: &CilTypeRc) -> Self {
        Self::new(strong_ref)
    }
}

/// A type that lives in another assembly, identified by scope and name only.
///
/// Whether it can be turned into a definition depends on the assemblies loaded into the
/// [`MetadataUniverse`]; the reference itself carries no link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportedType {
    /// Simple name of the assembly the type is expected in
    pub scope: String,
    /// `TypeNamespace`
    pub namespace: String,
    /// `TypeName`; nested types use `Outer/Inner`
    pub name: String,
}

impl ImportedType {
    /// Create a new imported type reference
    ///
    /// ## Arguments
    /// * 'scope'     - Simple name of the defining assembly
    /// * 'namespace' - Namespace of the type
    /// * 'name'      - Name of the type
    pub fn new(scope: &str, namespace: &str, name: &str) -> Self {
        ImportedType {
            scope: scope.to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    /// Returns the full name (Namespace.Name) of the referenced type
    #[must_use]
    pub fn fullname(&self) -> String {
        qualified_name(&self.namespace, &self.name)
    }
}

/// A reference to a type, as found at base type, interface, element type or declaring
/// type positions.
///
/// Either the definition is part of the loaded graph, or the reference names a type of
/// another assembly and has to be resolved through the universe, which may fail when that
/// assembly was never loaded.
#[derive(Clone, Debug)]
pub enum TypeReference {
    /// A definition of the loaded graph
    Definition(CilTypeRef),
    /// A type defined elsewhere, resolved by scope and full name
    Imported(ImportedType),
}

impl TypeReference {
    /// Create a reference to a loaded definition
    pub fn definition(target: &CilTypeRc) -> Self {
        TypeReference::Definition(CilTypeRef::new(target))
    }

    /// Create a reference to a type of another assembly
    ///
    /// ## Arguments
    /// * 'scope'     - Simple name of the defining assembly
    /// * 'namespace' - Namespace of the type
    /// * 'name'      - Name of the type
    pub fn imported(scope: &str, namespace: &str, name: &str) -> Self {
        TypeReference::Imported(ImportedType::new(scope, namespace, name))
    }

    /// The name carried by the reference, without resolving it
    ///
    /// Returns `None` only for a definition that has been dropped.
    #[must_use]
    pub fn name(&self) -> Option<Cow<'_, str>> {
        match self {
            TypeReference::Definition(target) => {
                target.upgrade().map(|t| Cow::Owned(t.name.clone()))
            }
            TypeReference::Imported(imported) => Some(Cow::Borrowed(imported.name.as_str())),
        }
    }

    /// The full name carried by the reference, without resolving it
    #[must_use]
    pub fn fullname(&self) -> Option<String> {
        match self {
            TypeReference::Definition(target) => target.upgrade().map(|t| t.fullname()),
            TypeReference::Imported(imported) => Some(imported.fullname()),
        }
    }

    /// Check whether two references name the same type
    #[must_use]
    pub fn same_target(&self, other: &TypeReference) -> bool {
        match (self, other) {
            (TypeReference::Definition(left), TypeReference::Definition(right)) => {
                left.ptr_eq(right)
            }
            (TypeReference::Imported(left), TypeReference::Imported(right)) => left == right,
            _ => false,
        }
    }

    /// Turn the reference into a definition of the loaded graph
    ///
    /// Definitions resolve directly. Imported references are looked up in `universe`;
    /// without a universe, or when the scope or the type is missing from it, the result is
    /// `None`. This never fails.
    ///
    /// ## Arguments
    /// * 'universe' - The universe the referencing type is loaded into
    #[must_use]
    pub fn resolve(&self, universe: Option<&MetadataUniverse>) -> Option<CilTypeRc> {
        match self {
            TypeReference::Definition(target) => target.upgrade(),
            TypeReference::Imported(imported) => universe?.resolve(imported),
        }
    }
}

impl From<&CilTypeRc> for TypeReference {
    fn from(target: &CilTypeRc) -> Self {
        TypeReference::definition(target)
    }
}

impl From<ImportedType> for TypeReference {
    fn from(imported: ImportedType) -> Self {
        TypeReference::Imported(imported)
    }
}

/// A generic parameter declared by a type (type information, not an instantiation)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericParam {
    /// 2-byte index of the generic parameter, numbered left-to-right, from zero
    pub number: u32,
    /// The name of the generic parameter
    pub name: String,
}

#[allow(missing_docs)]
/// Represents complex type flavors in the type system
#[derive(Debug, Clone, PartialEq)]
pub enum CilFlavor {
    // Base primitive types
    Void,
    Boolean,
    Char,
    I1,
    U1,
    I2,
    U2,
    I4,
    U4,
    I8,
    U8,
    R4,
    R8,
    I,
    U,
    Object,
    String,

    // Composite types, these have an element type
    Array {
        /// The rank (number of dimensions)
        rank: u32,
    },
    Pointer,
    ByRef,

    GenericParameter {
        /// Index in the generic parameters list
        index: u32,
        /// Whether it's a method parameter (true) or type parameter (false)
        method: bool,
    },

    // Type categories
    Class,
    ValueType,
    Interface,
}

impl CilFlavor {
    /// Check if this is a primitive type
    ///
    /// `Void`, `Object` and `String` have dedicated element types but are not primitives.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            CilFlavor::Boolean
                | CilFlavor::Char
                | CilFlavor::I1
                | CilFlavor::U1
                | CilFlavor::I2
                | CilFlavor::U2
                | CilFlavor::I4
                | CilFlavor::U4
                | CilFlavor::I8
                | CilFlavor::U8
                | CilFlavor::R4
                | CilFlavor::R8
                | CilFlavor::I
                | CilFlavor::U
        )
    }

    /// Check if this is a value type
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        self.is_primitive() || matches!(self, CilFlavor::ValueType)
    }

    /// Check if this flavor wraps an element type (array, pointer, byref)
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            CilFlavor::Array { .. } | CilFlavor::Pointer | CilFlavor::ByRef
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::TypeBuilder;

    #[test]
    fn test_cil_flavor_is_primitive() {
        assert!(CilFlavor::Boolean.is_primitive());
        assert!(CilFlavor::I4.is_primitive());
        assert!(CilFlavor::R8.is_primitive());
        assert!(CilFlavor::U.is_primitive());

        assert!(!CilFlavor::Void.is_primitive());
        assert!(!CilFlavor::Object.is_primitive());
        assert!(!CilFlavor::String.is_primitive());
        assert!(!CilFlavor::Array { rank: 1 }.is_primitive());
        assert!(!CilFlavor::Class.is_primitive());
        assert!(!CilFlavor::ValueType.is_primitive());
    }

    #[test]
    fn test_cil_flavor_categories() {
        assert!(CilFlavor::ValueType.is_value_type());
        assert!(CilFlavor::I8.is_value_type());
        assert!(!CilFlavor::Interface.is_value_type());

        assert!(CilFlavor::Pointer.is_composite());
        assert!(CilFlavor::ByRef.is_composite());
        assert!(CilFlavor::Array { rank: 2 }.is_composite());
        assert!(!CilFlavor::Class.is_composite());
    }

    #[test]
    fn test_reference_names() {
        let imported = TypeReference::imported("Other", "Contoso.Api", "IFoo");
        assert_eq!(imported.name().as_deref(), Some("IFoo"));
        assert_eq!(imported.fullname().as_deref(), Some("Contoso.Api.IFoo"));

        let target = TypeBuilder::new("Contoso", "Widget").build().unwrap();
        let reference = TypeReference::definition(&target);
        assert_eq!(reference.name().as_deref(), Some("Widget"));
        assert_eq!(reference.fullname().as_deref(), Some("Contoso.Widget"));
    }

    #[test]
    fn test_dropped_definition_has_no_name() {
        let reference = {
            let target = TypeBuilder::new("Contoso", "Transient").build().unwrap();
            TypeReference::definition(&target)
        };

        assert!(reference.name().is_none());
        assert!(reference.fullname().is_none());
        assert!(reference.resolve(None).is_none());
    }

    #[test]
    fn test_imported_without_universe_is_absent() {
        let imported = TypeReference::imported("Other", "Contoso.Api", "IFoo");
        assert!(imported.resolve(None).is_none());
    }

    #[test]
    fn test_same_target() {
        let target = TypeBuilder::new("Contoso", "Widget").build().unwrap();
        let left = TypeReference::definition(&target);
        let right = TypeReference::from(&target);
        assert!(left.same_target(&right));

        let imported = TypeReference::imported("Other", "Contoso", "Widget");
        assert!(!left.same_target(&imported));
        assert!(imported.same_target(&TypeReference::imported("Other", "Contoso", "Widget")));
        assert!(!imported.same_target(&TypeReference::imported("Third", "Contoso", "Widget")));
    }
}
