use std::sync::Arc;

use crate::metadata::{
    members::DeclaringSlot,
    token::{TableKind, Token},
    typesystem::{CilTypeRc, TypeReference},
};

/// A vector that holds a list of `Field`
pub type FieldList = Arc<boxcar::Vec<FieldRc>>;
/// A reference to a field
pub type FieldRc = Arc<Field>;

#[allow(non_snake_case)]
/// All possible flags for `FieldAttributes`
pub mod FieldAttributes {
    /// These 3 bits contain one of the following values:
    pub const FIELD_ACCESS_MASK: u32 = 0x0007;
    /// Member not referenceable
    pub const COMPILER_CONTROLLED: u32 = 0x0000;
    /// Accessible only by the parent type
    pub const PRIVATE: u32 = 0x0001;
    /// Accessible by sub-types only in this Assembly
    pub const FAM_AND_ASSEM: u32 = 0x0002;
    /// Accessibly by anyone in the Assembly
    pub const ASSEMBLY: u32 = 0x0003;
    /// Accessible only by type and sub-types
    pub const FAMILY: u32 = 0x0004;
    /// Accessibly by sub-types anywhere, plus anyone in assembly
    pub const FAM_OR_ASSEM: u32 = 0x0005;
    /// Accessibly by anyone who has visibility to this scope field contract attributes
    pub const PUBLIC: u32 = 0x0006;
    /// Defined on type, else per instance
    pub const STATIC: u32 = 0x0010;
    /// Field can only be initialized, not written to after init
    pub const INIT_ONLY: u32 = 0x0020;
    /// Value is compile time constant
    pub const LITERAL: u32 = 0x0040;
    /// Field is special
    pub const SPECIAL_NAME: u32 = 0x0200;
    /// CLI provides 'special' behavior, depending upon the name of the field
    pub const RTSPECIAL_NAME: u32 = 0x0400;
}

/// A field declared by a type
pub struct Field {
    /// Token
    pub token: Token,
    /// a 2-byte bitmask of type `FieldAttributes`, §II.23.1.5
    pub flags: u32,
    /// The name of the field
    pub name: String,
    /// The type of the field, if known
    pub field_type: Option<TypeReference>,
    declaring: DeclaringSlot,
}

impl Field {
    /// Create a new field
    ///
    /// ## Arguments
    /// * 'row'   - The row index within the `Field` table
    /// * 'name'  - The name of the field
    /// * 'flags' - The `FieldAttributes` bitmask
    pub fn new(row: u32, name: &str, flags: u32) -> Self {
        Field {
            token: Token::from_parts(TableKind::FIELD, row),
            flags,
            name: name.to_string(),
            field_type: None,
            declaring: DeclaringSlot::default(),
        }
    }

    /// Set the type of the field
    #[must_use]
    pub fn with_type(mut self, field_type: TypeReference) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Is this field accessible by anyone
    pub fn is_public(&self) -> bool {
        self.flags & FieldAttributes::FIELD_ACCESS_MASK == FieldAttributes::PUBLIC
    }

    /// Is this field defined on the type rather than per instance
    pub fn is_static(&self) -> bool {
        self.flags & FieldAttributes::STATIC != 0
    }

    /// Is this field a compile time constant
    pub fn is_literal(&self) -> bool {
        self.flags & FieldAttributes::LITERAL != 0
    }

    /// The type declaring this field
    pub fn declaring(&self) -> Option<CilTypeRc> {
        self.declaring.get()
    }

    pub(crate) fn set_declaring(&self, declaring: &CilTypeRc) -> bool {
        self.declaring.set(declaring)
    }
}
