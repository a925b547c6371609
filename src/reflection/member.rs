//! The tagged member variant returned by cross-kind queries.

use strum::{Display, EnumIter};

use crate::{
    metadata::token::Token,
    reflection::{
        members::{ConstructorHandle, EventHandle, FieldHandle, MethodHandle, PropertyHandle},
        types::TypeHandle,
    },
};

/// The kinds of members a type exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum MemberKind {
    /// An instance constructor or type initializer
    Constructor,
    /// An event
    Event,
    /// A field
    Field,
    /// An ordinary method
    Method,
    /// A property
    Property,
    /// A type nested in the declaring type
    NestedType,
}

/// One member of a type, as returned by [`TypeHandle::get_members`]
#[derive(Debug, Clone, PartialEq)]
pub enum MemberInfo {
    /// A constructor
    Constructor(ConstructorHandle),
    /// An event
    Event(EventHandle),
    /// A field
    Field(FieldHandle),
    /// An ordinary method
    Method(MethodHandle),
    /// A property
    Property(PropertyHandle),
}

impl MemberInfo {
    /// The kind of this member
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        match self {
            MemberInfo::Constructor(_) => MemberKind::Constructor,
            MemberInfo::Event(_) => MemberKind::Event,
            MemberInfo::Field(_) => MemberKind::Field,
            MemberInfo::Method(_) => MemberKind::Method,
            MemberInfo::Property(_) => MemberKind::Property,
        }
    }

    /// The name of this member
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            MemberInfo::Constructor(handle) => handle.name(),
            MemberInfo::Event(handle) => handle.name(),
            MemberInfo::Field(handle) => handle.name(),
            MemberInfo::Method(handle) => handle.name(),
            MemberInfo::Property(handle) => handle.name(),
        }
    }

    /// The token of this member
    #[must_use]
    pub fn token(&self) -> Token {
        match self {
            MemberInfo::Constructor(handle) => handle.token(),
            MemberInfo::Event(handle) => handle.token(),
            MemberInfo::Field(handle) => handle.token(),
            MemberInfo::Method(handle) => handle.token(),
            MemberInfo::Property(handle) => handle.token(),
        }
    }

    /// The type declaring this member
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeHandle> {
        match self {
            MemberInfo::Constructor(handle) => handle.declaring_type(),
            MemberInfo::Event(handle) => handle.declaring_type(),
            MemberInfo::Field(handle) => handle.declaring_type(),
            MemberInfo::Method(handle) => handle.declaring_type(),
            MemberInfo::Property(handle) => handle.declaring_type(),
        }
    }
}

impl From<ConstructorHandle> for MemberInfo {
    fn from(handle: ConstructorHandle) -> Self {
        MemberInfo::Constructor(handle)
    }
}

impl From<EventHandle> for MemberInfo {
    fn from(handle: EventHandle) -> Self {
        MemberInfo::Event(handle)
    }
}

impl From<FieldHandle> for MemberInfo {
    fn from(handle: FieldHandle) -> Self {
        MemberInfo::Field(handle)
    }
}

impl From<MethodHandle> for MemberInfo {
    fn from(handle: MethodHandle) -> Self {
        MemberInfo::Method(handle)
    }
}

impl From<PropertyHandle> for MemberInfo {
    fn from(handle: PropertyHandle) -> Self {
        MemberInfo::Property(handle)
    }
}
