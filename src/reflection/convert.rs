//! Conversions from references to definitions, and from definitions to handles.
//!
//! Both steps take and return `Option`, so a missing link anywhere along a chain such as
//! `declaring type -> base type -> element type` ends in `None` instead of an error.

use crate::{
    metadata::{
        typesystem::{CilType, CilTypeRc, TypeReference},
        universe::MetadataUniverse,
    },
    reflection::types::TypeHandle,
};

/// Turn a possibly absent reference into a definition
///
/// ## Arguments
/// * 'reference' - The reference, if the position holds one
/// * 'universe'  - The universe imported references are looked up in
pub fn resolve(
    reference: Option<&TypeReference>,
    universe: Option<&MetadataUniverse>,
) -> Option<CilTypeRc> {
    reference?.resolve(universe)
}

/// Wrap a possibly absent definition in a fresh handle
pub fn to_handle(definition: Option<CilTypeRc>) -> Option<TypeHandle> {
    definition.map(TypeHandle::new)
}

/// Resolve a reference and wrap the result, the composition of [`resolve`] and [`to_handle`]
///
/// ## Arguments
/// * 'reference' - The reference, if the position holds one
/// * 'universe'  - The universe imported references are looked up in
pub fn reference_to_handle(
    reference: Option<&TypeReference>,
    universe: Option<&MetadataUniverse>,
) -> Option<TypeHandle> {
    to_handle(resolve(reference, universe))
}

/// Resolve a reference found on `context`
///
/// Imported references are looked up in the universe `context` is loaded into. A type outside
/// any universe can only resolve references to definitions.
pub(crate) fn resolve_in(context: &CilType, reference: Option<&TypeReference>) -> Option<TypeHandle> {
    let reference = reference?;
    let universe = match reference {
        TypeReference::Imported(_) => context.universe(),
        TypeReference::Definition(_) => None,
    };
    reference_to_handle(Some(reference), universe.as_deref())
}
