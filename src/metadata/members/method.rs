//! Method definitions and their attribute flags.
//!
//! Constructors are ordinary methods distinguished by their special names, `.ctor` for
//! instance constructors and `.cctor` for the type initializer, both flagged as
//! `SPECIAL_NAME` and `RTSPECIAL_NAME`.

use std::sync::Arc;

use bitflags::bitflags;

use crate::metadata::{
    members::DeclaringSlot,
    token::{TableKind, Token},
    typesystem::CilTypeRc,
};

/// A vector that holds a list of `Method`
pub type MethodList = Arc<boxcar::Vec<MethodRc>>;
/// A reference to a `Method`
pub type MethodRc = Arc<Method>;

/// Bitmask for `ACCESS` state extraction
pub const METHOD_ACCESS_MASK: u32 = 0x0007;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Method access flags
    pub struct MethodAccessFlags: u32 {
        /// Member not referenceable
        const COMPILER_CONTROLLED = 0x0000;
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by sub-types only in this Assembly
        const FAM_AND_ASSEM = 0x0002;
        /// Accessibly by anyone in the Assembly
        const ASSEM = 0x0003;
        /// Accessible only by type and sub-types
        const FAMILY = 0x0004;
        /// Accessibly by sub-types anywhere, plus anyone in assembly
        const FAM_OR_ASSEM = 0x0005;
        /// Accessibly by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
    }
}

impl MethodAccessFlags {
    /// Extract access flags from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        let access = flags & METHOD_ACCESS_MASK;
        Self::from_bits_truncate(access)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Method modifiers and properties
    pub struct MethodModifiers: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name+sig, else just by name
        const HIDE_BY_SIG = 0x0080;
        /// Method always gets a new slot in the vtable
        const NEW_SLOT = 0x0100;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// CLI provides 'special' behavior, dpending upon the name of the method
        const RTSPECIAL_NAME = 0x1000;
    }
}

impl MethodModifiers {
    /// Extract method modifiers from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & !METHOD_ACCESS_MASK)
    }
}

/// A method declared by a type, constructors included
pub struct Method {
    /// Token
    pub token: Token,
    /// a 2-byte bitmask of type `MethodAttributes`, §II.23.1.10
    pub flags: u32,
    /// The name of the method
    pub name: String,
    declaring: DeclaringSlot,
}

impl Method {
    /// Name of instance constructors
    pub const CONSTRUCTOR_NAME: &'static str = ".ctor";
    /// Name of the type initializer
    pub const TYPE_INITIALIZER_NAME: &'static str = ".cctor";

    /// Create a new method
    ///
    /// ## Arguments
    /// * 'row'   - The row index within the `MethodDef` table
    /// * 'name'  - The name of the method
    /// * 'flags' - The `MethodAttributes` bitmask
    pub fn new(row: u32, name: &str, flags: u32) -> Self {
        Method {
            token: Token::from_parts(TableKind::METHOD_DEF, row),
            flags,
            name: name.to_string(),
            declaring: DeclaringSlot::default(),
        }
    }

    /// Create an instance constructor, `flags` supplies access and other modifiers
    pub fn constructor(row: u32, flags: u32) -> Self {
        Self::special(row, Self::CONSTRUCTOR_NAME, flags & !MethodModifiers::STATIC.bits())
    }

    /// Create the static type initializer
    pub fn type_initializer(row: u32) -> Self {
        Self::special(
            row,
            Self::TYPE_INITIALIZER_NAME,
            MethodAccessFlags::PRIVATE.bits() | MethodModifiers::STATIC.bits(),
        )
    }

    fn special(row: u32, name: &str, flags: u32) -> Self {
        let special = MethodModifiers::SPECIAL_NAME | MethodModifiers::RTSPECIAL_NAME;
        Self::new(row, name, flags | special.bits())
    }

    /// The access part of the attribute flags
    pub fn access(&self) -> MethodAccessFlags {
        MethodAccessFlags::from_method_flags(self.flags)
    }

    /// The modifier part of the attribute flags
    pub fn modifiers(&self) -> MethodModifiers {
        MethodModifiers::from_method_flags(self.flags)
    }

    /// Is this method accessible by anyone
    pub fn is_public(&self) -> bool {
        self.access() == MethodAccessFlags::PUBLIC
    }

    /// Is this method defined on the type rather than per instance
    pub fn is_static(&self) -> bool {
        self.modifiers().contains(MethodModifiers::STATIC)
    }

    /// Is this method virtual
    pub fn is_virtual(&self) -> bool {
        self.modifiers().contains(MethodModifiers::VIRTUAL)
    }

    /// Is this method abstract
    pub fn is_abstract(&self) -> bool {
        self.modifiers().contains(MethodModifiers::ABSTRACT)
    }

    /// Is this method an instance constructor or the type initializer
    pub fn is_constructor(&self) -> bool {
        self.modifiers()
            .contains(MethodModifiers::SPECIAL_NAME | MethodModifiers::RTSPECIAL_NAME)
            && (self.name == Self::CONSTRUCTOR_NAME || self.name == Self::TYPE_INITIALIZER_NAME)
    }

    /// The type declaring this method
    pub fn declaring(&self) -> Option<CilTypeRc> {
        self.declaring.get()
    }

    pub(crate) fn set_declaring(&self, declaring: &CilTypeRc) -> bool {
        self.declaring.set(declaring)
    }
}
