//! # dotreflect Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dotreflect library. Import this module to get quick access to the essential
//! types for building a metadata graph and querying it.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotreflect operations
pub use crate::Error;

/// The result type used throughout dotreflect
pub use crate::Result;

/// Configuration for loading assemblies into a universe
pub use crate::UniverseConfig;

/// The set of loaded assemblies
pub use crate::MetadataUniverse;

// ================================================================================================
// Metadata Graph
// ================================================================================================

/// Metadata token type for identifying definitions
pub use crate::metadata::token::Token;

/// Name comparison
pub use crate::metadata::naming::NameCase;

/// Assemblies and modules
pub use crate::metadata::assembly::{Assembly, AssemblyRc, AssemblyVersion, Module, ModuleRc};

/// Core type system components
pub use crate::metadata::typesystem::{
    CilFlavor, CilType, CilTypeList, CilTypeRc, CilTypeRef, ImportedType, TypeAttributes,
    TypeBuilder, TypeReference,
};

/// Member definitions and their attribute flags
pub use crate::metadata::members::{
    Event, EventAttributes, EventRc, Field, FieldAttributes, FieldRc, Method, MethodAccessFlags,
    MethodModifiers, MethodRc, Property, PropertyAttributes, PropertyRc,
};

// ================================================================================================
// Reflection
// ================================================================================================

/// Filter flags
pub use crate::reflection::{Binding, BindingFlags, FilterSpec, Visibility};

/// Query handles
pub use crate::reflection::{
    AssemblyHandle, ConstructorHandle, EventHandle, FieldHandle, MethodHandle, ModuleHandle,
    PropertyHandle, TypeHandle,
};

/// Cross-kind member results
pub use crate::reflection::{MemberInfo, MemberKind};
