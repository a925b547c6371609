use std::sync::Arc;

use crate::metadata::{
    members::{present_accessors, DeclaringSlot, MethodRc},
    token::{TableKind, Token},
    typesystem::CilTypeRc,
};

/// A vector that holds a list of `Property`
pub type PropertyList = Arc<boxcar::Vec<PropertyRc>>;
/// A reference to a `Property`
pub type PropertyRc = Arc<Property>;

#[allow(non_snake_case)]
/// All possible flags for `PropertyAttributes`
pub mod PropertyAttributes {
    /// Property is special
    pub const SPECIAL_NAME: u32 = 0x0200;
    /// Runtime (metadata internal APIs) should check name encoding
    pub const RT_SPECIAL_NAME: u32 = 0x0400;
    /// Property has default
    pub const HAS_DEFAULT: u32 = 0x1000;
}

/// A property declared by a type.
///
/// Carries no visibility or binding of its own; both are properties of its accessors.
pub struct Property {
    /// Token
    pub token: Token,
    /// a 2-byte bitmask of type `PropertyAttributes`, §II.23.1.14
    pub flags: u32,
    /// The name of this property
    pub name: String,
    /// The `Method` that retrieves this property
    pub fn_getter: Option<MethodRc>,
    /// The `Method` that sets this property
    pub fn_setter: Option<MethodRc>,
    /// 'Other' associated method with this property
    pub fn_other: Option<MethodRc>,
    declaring: DeclaringSlot,
}

impl Property {
    /// Create a new property without accessors
    ///
    /// ## Arguments
    /// * 'row'   - The row index within the `Property` table
    /// * 'name'  - The name of the property
    /// * 'flags' - The `PropertyAttributes` bitmask
    pub fn new(row: u32, name: &str, flags: u32) -> Self {
        Property {
            token: Token::from_parts(TableKind::PROPERTY, row),
            flags,
            name: name.to_string(),
            fn_getter: None,
            fn_setter: None,
            fn_other: None,
            declaring: DeclaringSlot::default(),
        }
    }

    /// Set the getter
    #[must_use]
    pub fn with_getter(mut self, getter: &MethodRc) -> Self {
        self.fn_getter = Some(getter.clone());
        self
    }

    /// Set the setter
    #[must_use]
    pub fn with_setter(mut self, setter: &MethodRc) -> Self {
        self.fn_setter = Some(setter.clone());
        self
    }

    /// Set the 'other' accessor
    #[must_use]
    pub fn with_other(mut self, other: &MethodRc) -> Self {
        self.fn_other = Some(other.clone());
        self
    }

    /// The accessor visibility and binding are read from: the getter, else the setter
    pub fn primary_accessor(&self) -> Option<&MethodRc> {
        self.fn_getter.as_ref().or(self.fn_setter.as_ref())
    }

    /// All present accessors
    pub fn accessors(&self) -> Vec<MethodRc> {
        present_accessors([&self.fn_getter, &self.fn_setter, &self.fn_other])
    }

    /// The type declaring this property
    pub fn declaring(&self) -> Option<CilTypeRc> {
        self.declaring.get()
    }

    pub(crate) fn set_declaring(&self, declaring: &CilTypeRc) -> bool {
        self.declaring.set(declaring)
    }
}
