//! Member definitions of the in-memory metadata graph.
//!
//! Fields, methods (constructors included), properties and events, each declared by exactly
//! one [`crate::metadata::typesystem::CilType`]. A member stores a weak link back to its
//! declaring type, which is set once when the member is added to the type.
//!
//! Visibility and binding facts are derived from the ECMA-335 attribute flags:
//! - fields and methods carry their own access and `STATIC` bits
//! - properties and events carry neither, the facts come from their accessor methods

mod event;
mod field;
mod method;
mod property;

use std::sync::{Arc, OnceLock};

pub use event::{Event, EventAttributes, EventList, EventRc};
pub use field::{Field, FieldAttributes, FieldList, FieldRc};
pub use method::{
    Method, MethodAccessFlags, MethodList, MethodModifiers, MethodRc, METHOD_ACCESS_MASK,
};
pub use property::{Property, PropertyAttributes, PropertyList, PropertyRc};

use crate::metadata::typesystem::{CilTypeRc, CilTypeRef};

/// The write-once back-reference from a member to its declaring type
#[derive(Default)]
pub(crate) struct DeclaringSlot(OnceLock<CilTypeRef>);

impl DeclaringSlot {
    pub(crate) fn get(&self) -> Option<CilTypeRc> {
        self.0.get().and_then(CilTypeRef::upgrade)
    }

    /// Returns false if the slot was already taken
    pub(crate) fn set(&self, declaring: &CilTypeRc) -> bool {
        self.0.set(CilTypeRef::new(declaring)).is_ok()
    }
}

/// Accessor methods of a property or an event, in preference order
pub(crate) fn present_accessors<const N: usize>(slots: [&Option<MethodRc>; N]) -> Vec<MethodRc> {
    slots.into_iter().flatten().map(Arc::clone).collect()
}
