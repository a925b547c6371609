//! Metadata tokens, the identity of every definition in the graph.
//!
//! A token packs the table a definition belongs to and its row within that table, as in
//! ECMA-335 §II.22. Builders allocate them, modules index their types by them.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A metadata token identifying one definition of the metadata graph.
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the table type
/// - The low 24 bits (bits 0-23) indicate the row index within that table
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

#[allow(non_snake_case, missing_docs)]
/// Table identifiers used in the high byte of a [`Token`], §II.22
pub mod TableKind {
    pub const MODULE: u8 = 0x00;
    pub const TYPE_DEF: u8 = 0x02;
    pub const FIELD: u8 = 0x04;
    pub const METHOD_DEF: u8 = 0x06;
    pub const EVENT: u8 = 0x14;
    pub const PROPERTY: u8 = 0x17;
    pub const ASSEMBLY: u8 = 0x20;
}

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table identifier and a row index
    ///
    /// ## Arguments
    /// * 'table' - One of the [`TableKind`] identifiers
    /// * 'row'   - The row index, only the low 24 bits are kept
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (row 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.row() == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_parts() {
        let token = Token::from_parts(TableKind::FIELD, 3);
        assert_eq!(token.value(), 0x04000003);
        assert_eq!(token.table(), TableKind::FIELD);
        assert_eq!(token.row(), 3);
    }

    #[test]
    fn test_token_from_parts_truncates_row() {
        let token = Token::from_parts(TableKind::METHOD_DEF, 0x0100_0001);
        assert_eq!(token.table(), TableKind::METHOD_DEF);
        assert_eq!(token.row(), 1);
    }

    #[test]
    fn test_token_is_null() {
        assert!(Token::from_parts(TableKind::TYPE_DEF, 0).is_null());
        assert!(!Token::from_parts(TableKind::TYPE_DEF, 1).is_null());
    }

    #[test]
    fn test_token_display_debug() {
        let token = Token(0x06000001);
        assert_eq!(format!("{}", token), "0x06000001");
        assert_eq!(
            format!("{:?}", token),
            "Token(0x06000001, table: 0x06, row: 1)"
        );
    }

    #[test]
    fn test_token_ordering() {
        let first = Token::from_parts(TableKind::TYPE_DEF, 1);
        let second = Token::from_parts(TableKind::TYPE_DEF, 2);
        assert!(first < second);
        assert_eq!(u32::from(first), 0x02000001);
    }
}
