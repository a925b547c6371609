//! Configuration of a metadata universe
//!
//! Controls how imported type references find their assembly, and how deep nested types may
//! go before an assembly is refused at load time.

use crate::metadata::naming::NameCase;

/// Configuration for loading assemblies into a [`crate::MetadataUniverse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniverseConfig {
    /// How the scope name of an imported reference is compared with loaded assembly names.
    /// Assembly names are case-insensitive in .NET, so the default folds case
    pub scope_name_case: NameCase,

    /// Maximum nesting depth for nested types (default: 64)
    pub max_nesting_depth: usize,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            scope_name_case: NameCase::Insensitive,
            max_nesting_depth: 64,
        }
    }
}

impl UniverseConfig {
    /// Creates a configuration that matches scope names exactly and keeps the default depth
    #[must_use]
    pub fn strict() -> Self {
        Self {
            scope_name_case: NameCase::Sensitive,
            max_nesting_depth: 64,
        }
    }

    /// Creates a configuration that folds scope name case and sets no nesting limit of its own
    ///
    /// Loading still stops at the fixed declaring-chain bound of 256 levels, reported as
    /// [`crate::Error::RecursionLimit`]`(256)`.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            scope_name_case: NameCase::Insensitive,
            max_nesting_depth: usize::MAX,
        }
    }
}
