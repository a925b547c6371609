//! Builder for type definitions.
//!
//! This module provides the [`TypeBuilder`] struct, which offers a fluent API for constructing
//! [`CilType`] definitions: classes, value types, interfaces, primitives and the composite
//! array, pointer and byref types. Members are added to the built type afterwards, since they
//! need the shared reference of their declaring type.
//!
//! # Example
//!
//! ```rust
//! use dotreflect::metadata::typesystem::{CilFlavor, TypeBuilder, TypeReference};
//!
//! let element = TypeBuilder::new("System", "Int32").primitive(CilFlavor::I4).public().build()?;
//! let array = TypeBuilder::new("System", "Int32[]")
//!     .array(1, TypeReference::definition(&element))
//!     .public()
//!     .build()?;
//!
//! assert!(array.flavor.is_composite());
//! # Ok::<(), dotreflect::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    metadata::{
        token::{TableKind, Token},
        typesystem::{
            artificial_token, CilFlavor, CilType, CilTypeRc, TypeAttributes, TypeReference,
        },
    },
    Result,
};

/// Provides a fluent API for building type definitions
pub struct TypeBuilder {
    /// Token for the type, artificial if not set
    token: Option<Token>,
    /// Namespace of the type
    namespace: String,
    /// Name of the type
    name: String,
    /// `TypeAttributes` flags
    flags: u32,
    /// The flavor of the type
    flavor: CilFlavor,
    /// The base type
    base: Option<TypeReference>,
    /// The element type for composite flavors
    element: Option<TypeReference>,
    /// Implemented interfaces, in declaration order
    interfaces: Vec<TypeReference>,
    /// Generic parameter names, in declaration order
    generic_params: Vec<String>,
}

impl TypeBuilder {
    /// Create a new builder for a class with the given name
    ///
    /// ## Arguments
    /// * 'namespace' - Namespace for the type, may be empty
    /// * 'name'      - Name for the type
    pub fn new(namespace: &str, name: &str) -> Self {
        TypeBuilder {
            token: None,
            namespace: namespace.to_string(),
            name: name.to_string(),
            flags: TypeAttributes::NOT_PUBLIC,
            flavor: CilFlavor::Class,
            base: None,
            element: None,
            interfaces: Vec::new(),
            generic_params: Vec::new(),
        }
    }

    /// Set the `TypeDef` row of the type
    ///
    /// ## Arguments
    /// * 'row' - The row index within the `TypeDef` table
    #[must_use]
    pub fn row(mut self, row: u32) -> Self {
        self.token = Some(Token::from_parts(TableKind::TYPE_DEF, row));
        self
    }

    /// Set an explicit token
    ///
    /// ## Arguments
    /// * 'token' - The token to use
    #[must_use]
    pub fn token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Replace the raw `TypeAttributes` flags
    ///
    /// ## Arguments
    /// * 'flags' - The `TypeAttributes` bitmask
    #[must_use]
    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Set the visibility bits, keeping every other flag
    fn visibility(mut self, visibility: u32) -> Self {
        self.flags = (self.flags & !TypeAttributes::VISIBILITY_MASK) | visibility;
        self
    }

    /// Make the type public (top-level)
    #[must_use]
    pub fn public(self) -> Self {
        self.visibility(TypeAttributes::PUBLIC)
    }

    /// Make the type non-public (top-level)
    #[must_use]
    pub fn not_public(self) -> Self {
        self.visibility(TypeAttributes::NOT_PUBLIC)
    }

    /// Make the type nested public
    #[must_use]
    pub fn nested_public(self) -> Self {
        self.visibility(TypeAttributes::NESTED_PUBLIC)
    }

    /// Make the type nested private
    #[must_use]
    pub fn nested_private(self) -> Self {
        self.visibility(TypeAttributes::NESTED_PRIVATE)
    }

    /// Build an interface instead of a class
    #[must_use]
    pub fn interface(mut self) -> Self {
        self.flavor = CilFlavor::Interface;
        self.flags |= TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT;
        self
    }

    /// Build a value type instead of a class
    #[must_use]
    pub fn value_type(mut self) -> Self {
        self.flavor = CilFlavor::ValueType;
        self.flags |= TypeAttributes::SEALED;
        self
    }

    /// Build a primitive of the given flavor
    ///
    /// ## Arguments
    /// * 'flavor' - The primitive flavor, e.g. `CilFlavor::I4`
    #[must_use]
    pub fn primitive(mut self, flavor: CilFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    /// Build an array of `element` with the given rank
    ///
    /// ## Arguments
    /// * 'rank'    - Number of dimensions
    /// * 'element' - The element type
    #[must_use]
    pub fn array(mut self, rank: u32, element: TypeReference) -> Self {
        self.flavor = CilFlavor::Array { rank };
        self.element = Some(element);
        self
    }

    /// Build an unmanaged pointer to `element`
    #[must_use]
    pub fn pointer(mut self, element: TypeReference) -> Self {
        self.flavor = CilFlavor::Pointer;
        self.element = Some(element);
        self
    }

    /// Build a managed reference to `element`
    #[must_use]
    pub fn by_ref(mut self, element: TypeReference) -> Self {
        self.flavor = CilFlavor::ByRef;
        self.element = Some(element);
        self
    }

    /// Set the base type
    ///
    /// ## Arguments
    /// * 'base' - The type this type extends
    #[must_use]
    pub fn base(mut self, base: TypeReference) -> Self {
        self.base = Some(base);
        self
    }

    /// Add an implemented interface
    ///
    /// ## Arguments
    /// * 'interface' - The implemented interface
    #[must_use]
    pub fn implements(mut self, interface: TypeReference) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Add a generic parameter
    ///
    /// ## Arguments
    /// * 'name' - The name of the generic parameter, e.g. `T`
    #[must_use]
    pub fn generic_param(mut self, name: &str) -> Self {
        self.generic_params.push(name.to_string());
        self
    }

    /// Finish the type
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the name is empty, if a composite flavor has no
    /// element type, or if a non-composite flavor was given one.
    pub fn build(self) -> Result<CilTypeRc> {
        if self.name.is_empty() {
            return Err(malformed_error!(
                "Type in namespace '{}' has an empty name",
                self.namespace
            ));
        }

        match (self.flavor.is_composite(), self.element.is_some()) {
            (true, false) => {
                return Err(malformed_error!(
                    "Type '{}' of flavor {:?} has no element type",
                    self.name,
                    self.flavor
                ))
            }
            (false, true) => {
                return Err(malformed_error!(
                    "Type '{}' of flavor {:?} can not have an element type",
                    self.name,
                    self.flavor
                ))
            }
            _ => {}
        }

        let new_type = Arc::new(CilType::new(
            self.token.unwrap_or_else(artificial_token),
            self.namespace,
            self.name,
            self.flags,
            self.flavor,
        ));

        if let Some(base) = self.base {
            new_type.set_base(base);
        }
        if let Some(element) = self.element {
            new_type.set_element(element);
        }
        for interface in self.interfaces {
            new_type.add_interface(interface);
        }
        for name in &self.generic_params {
            new_type.add_generic_param(name);
        }

        Ok(new_type)
    }
}
