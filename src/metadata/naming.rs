//! Ordinal name comparison and full-name composition.
//!
//! Names in metadata are compared ordinally, code point by code point, never with culture
//! rules. [`NameCase`] selects between the exact comparison and the case-folded variant
//! that upper-cases both sides before comparing. Folding maps one character to one
//! character, so a case-insensitive match never changes the length of a name.

/// How two names are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameCase {
    /// Ordinal, exact comparison
    #[default]
    Sensitive,
    /// Ordinal comparison after a 1:1 upper-case mapping of each character of both sides
    Insensitive,
}

impl NameCase {
    /// Select the comparison from an `ignore_case` switch
    #[must_use]
    pub fn from_ignore_case(ignore_case: bool) -> Self {
        if ignore_case {
            NameCase::Insensitive
        } else {
            NameCase::Sensitive
        }
    }

    /// Check whether `left` and `right` are equal under this comparison
    ///
    /// ## Arguments
    /// * 'left'  - The first name
    /// * 'right' - The second name
    #[must_use]
    pub fn eq(&self, left: &str, right: &str) -> bool {
        match self {
            NameCase::Sensitive => left == right,
            NameCase::Insensitive => left.chars().map(fold).eq(right.chars().map(fold)),
        }
    }

    /// The key `name` is stored under, so that keys compare with [`NameCase::eq`]
    ///
    /// ## Arguments
    /// * 'name' - The name to fold
    #[must_use]
    pub fn key(&self, name: &str) -> String {
        match self {
            NameCase::Sensitive => name.to_string(),
            NameCase::Insensitive => name.chars().map(fold).collect(),
        }
    }
}

/// Simple upper-case mapping; characters whose upper case is not a single character are kept
fn fold(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}

/// Compose `Namespace.Name`, or just `Name` for the empty namespace
#[must_use]
pub fn qualified_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

/// Compose the full name of a nested type, `Declaring/Name`
#[must_use]
pub fn nested_name(declaring: &str, name: &str) -> String {
    format!("{declaring}/{name}")
}
