//! Binding flags and the decomposed filter they select.
//!
//! [`BindingFlags`] keeps the familiar bitset encoding. Matching works on its decomposition,
//! [`FilterSpec`], which holds the two filter axes and the name comparison as separate fields.
//! Each axis has four states, one per combination of its two bits, so the decomposition is
//! lossless: requesting neither bit of an axis is representable and matches nothing.

use bitflags::bitflags;

use crate::metadata::naming::NameCase;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Flags selecting members, with the values of `System.Reflection.BindingFlags`
    pub struct BindingFlags: u32 {
        /// Compare member names ignoring case
        const IGNORE_CASE = 0x0001;
        /// Only members declared by the type itself; lookups never walk base types here
        const DECLARED_ONLY = 0x0002;
        /// Include instance members
        const INSTANCE = 0x0004;
        /// Include static members
        const STATIC = 0x0008;
        /// Include public members
        const PUBLIC = 0x0010;
        /// Include non-public members
        const NON_PUBLIC = 0x0020;
    }
}

impl BindingFlags {
    /// No flags at all, treated as `PUBLIC | INSTANCE`
    pub const DEFAULT: Self = Self::empty();
}

/// Selection on the public / non-public axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Neither bit requested, nothing matches
    #[default]
    Unspecified,
    /// Public members only
    Public,
    /// Non-public members only
    NonPublic,
    /// Every member, regardless of visibility
    Both,
}

impl Visibility {
    fn from_bits(public: bool, non_public: bool) -> Self {
        match (public, non_public) {
            (true, true) => Visibility::Both,
            (true, false) => Visibility::Public,
            (false, true) => Visibility::NonPublic,
            (false, false) => Visibility::Unspecified,
        }
    }

    /// Check the axis against a member that is, or is not, public
    #[must_use]
    pub fn matches(&self, is_public: bool) -> bool {
        match self {
            Visibility::Both => true,
            Visibility::Public => is_public,
            Visibility::NonPublic => !is_public,
            Visibility::Unspecified => false,
        }
    }
}

/// Selection on the instance / static axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Binding {
    /// Neither bit requested, nothing matches
    #[default]
    Unspecified,
    /// Instance members only
    Instance,
    /// Static members only
    Static,
    /// Every member, regardless of binding
    Both,
}

impl Binding {
    fn from_bits(instance: bool, is_static: bool) -> Self {
        match (instance, is_static) {
            (true, true) => Binding::Both,
            (true, false) => Binding::Instance,
            (false, true) => Binding::Static,
            (false, false) => Binding::Unspecified,
        }
    }

    /// Check the axis against a member that is, or is not, static
    #[must_use]
    pub fn matches(&self, is_static: bool) -> bool {
        match self {
            Binding::Both => true,
            Binding::Instance => !is_static,
            Binding::Static => is_static,
            Binding::Unspecified => false,
        }
    }
}

/// The decomposed selector controlling which members a query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FilterSpec {
    /// The public / non-public axis
    pub visibility: Visibility,
    /// The instance / static axis
    pub binding: Binding,
    /// How names are compared by name lookups
    pub case: NameCase,
}

impl FilterSpec {
    /// The sentinel for "no flags", normalized to public instance members before matching
    pub const DEFAULT: Self = FilterSpec {
        visibility: Visibility::Unspecified,
        binding: Binding::Unspecified,
        case: NameCase::Sensitive,
    };

    /// Public instance members, the meaning of [`FilterSpec::DEFAULT`]
    pub const PUBLIC_INSTANCE: Self = FilterSpec {
        visibility: Visibility::Public,
        binding: Binding::Instance,
        case: NameCase::Sensitive,
    };

    /// Every declared member
    pub const ALL: Self = FilterSpec {
        visibility: Visibility::Both,
        binding: Binding::Both,
        case: NameCase::Sensitive,
    };

    /// Create a case-sensitive filter from both axes
    #[must_use]
    pub const fn new(visibility: Visibility, binding: Binding) -> Self {
        FilterSpec {
            visibility,
            binding,
            case: NameCase::Sensitive,
        }
    }

    /// The same filter, with case-insensitive name lookups
    #[must_use]
    pub const fn ignore_case(self) -> Self {
        FilterSpec {
            case: NameCase::Insensitive,
            ..self
        }
    }

    /// Is this the "no flags" sentinel
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }

    /// Replace the "no flags" sentinel by public instance members; any other filter is kept
    #[must_use]
    pub fn normalize(self) -> Self {
        if self.is_default() {
            Self::PUBLIC_INSTANCE
        } else {
            self
        }
    }
}

impl From<BindingFlags> for FilterSpec {
    fn from(flags: BindingFlags) -> Self {
        FilterSpec {
            visibility: Visibility::from_bits(
                flags.contains(BindingFlags::PUBLIC),
                flags.contains(BindingFlags::NON_PUBLIC),
            ),
            binding: Binding::from_bits(
                flags.contains(BindingFlags::INSTANCE),
                flags.contains(BindingFlags::STATIC),
            ),
            case: NameCase::from_ignore_case(flags.contains(BindingFlags::IGNORE_CASE)),
        }
    }
}

impl From<FilterSpec> for BindingFlags {
    fn from(spec: FilterSpec) -> Self {
        let mut flags = BindingFlags::empty();
        match spec.visibility {
            Visibility::Public => flags |= BindingFlags::PUBLIC,
            Visibility::NonPublic => flags |= BindingFlags::NON_PUBLIC,
            Visibility::Both => flags |= BindingFlags::PUBLIC | BindingFlags::NON_PUBLIC,
            Visibility::Unspecified => {}
        }
        match spec.binding {
            Binding::Instance => flags |= BindingFlags::INSTANCE,
            Binding::Static => flags |= BindingFlags::STATIC,
            Binding::Both => flags |= BindingFlags::INSTANCE | BindingFlags::STATIC,
            Binding::Unspecified => {}
        }
        if spec.case == NameCase::Insensitive {
            flags |= BindingFlags::IGNORE_CASE;
        }
        flags
    }
}
