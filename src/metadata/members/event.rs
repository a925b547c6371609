use std::sync::Arc;

use crate::metadata::{
    members::{present_accessors, DeclaringSlot, MethodRc},
    token::{TableKind, Token},
    typesystem::{CilTypeRc, TypeReference},
};

/// A vector that holds a list of `Event`
pub type EventList = Arc<boxcar::Vec<EventRc>>;
/// A reference to an `Event`
pub type EventRc = Arc<Event>;

#[allow(non_snake_case)]
/// All possible flags for `EventAttributes`
pub mod EventAttributes {
    /// Event is special
    pub const SPECIAL_NAME: u32 = 0x0200;
    /// CLI provides 'special' behavior, depending upon the name of the event
    pub const RTSPECIAL_NAME: u32 = 0x0400;
}

/// An event declared by a type
pub struct Event {
    /// Token
    pub token: Token,
    /// a 2-byte bitmask of type `EventAttributes`, §II.23.1.4
    pub flags: u32,
    /// The name of the event
    pub name: String,
    /// The delegate type of the event, if known
    pub event_type: Option<TypeReference>,
    /// The `Method` that triggers '`OnAdd`'
    pub fn_on_add: Option<MethodRc>,
    /// The `Method` that triggers '`OnRemove`'
    pub fn_on_remove: Option<MethodRc>,
    /// The `Method` that triggers '`OnRaise`'
    pub fn_on_raise: Option<MethodRc>,
    declaring: DeclaringSlot,
}

impl Event {
    /// Create a new event without accessors
    ///
    /// ## Arguments
    /// * 'row'   - The row index within the `Event` table
    /// * 'name'  - The name of the event
    /// * 'flags' - The `EventAttributes` bitmask
    pub fn new(row: u32, name: &str, flags: u32) -> Self {
        Event {
            token: Token::from_parts(TableKind::EVENT, row),
            flags,
            name: name.to_string(),
            event_type: None,
            fn_on_add: None,
            fn_on_remove: None,
            fn_on_raise: None,
            declaring: DeclaringSlot::default(),
        }
    }

    /// Set the delegate type
    #[must_use]
    pub fn with_type(mut self, event_type: TypeReference) -> Self {
        self.event_type = Some(event_type);
        self
    }

    /// Set the add accessor
    #[must_use]
    pub fn with_add(mut self, add: &MethodRc) -> Self {
        self.fn_on_add = Some(add.clone());
        self
    }

    /// Set the remove accessor
    #[must_use]
    pub fn with_remove(mut self, remove: &MethodRc) -> Self {
        self.fn_on_remove = Some(remove.clone());
        self
    }

    /// Set the raise accessor
    #[must_use]
    pub fn with_raise(mut self, raise: &MethodRc) -> Self {
        self.fn_on_raise = Some(raise.clone());
        self
    }

    /// The accessor visibility and binding are read from: add, else remove, else raise
    pub fn primary_accessor(&self) -> Option<&MethodRc> {
        self.fn_on_add
            .as_ref()
            .or(self.fn_on_remove.as_ref())
            .or(self.fn_on_raise.as_ref())
    }

    /// All present accessors
    pub fn accessors(&self) -> Vec<MethodRc> {
        present_accessors([&self.fn_on_add, &self.fn_on_remove, &self.fn_on_raise])
    }

    /// The type declaring this event
    pub fn declaring(&self) -> Option<CilTypeRc> {
        self.declaring.get()
    }

    pub(crate) fn set_declaring(&self, declaring: &CilTypeRc) -> bool {
        self.declaring.set(declaring)
    }
}
