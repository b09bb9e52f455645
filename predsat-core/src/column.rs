//! Typed column references.
//!
//! A [`Column`] names one variable slot of a relation. Identity is the
//! qualified `table.name` pair: two columns with the same qualified name
//! denote the same solver variable in every backend, so qualified names must
//! be unique within one formula.

use crate::encode::BITS_PER_CHAR;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Unbounded integer.
    Integer,
    /// Real number.
    Real,
    /// Boolean flag.
    Boolean,
    /// Fixed-length text of `len` characters.
    Varchar {
        /// Declared length in characters.
        len: u32,
    },
}

impl ColumnType {
    /// Bit width of a value of this type when modeled as a bit vector.
    ///
    /// Only text columns have one; every character contributes
    /// [`BITS_PER_CHAR`] bits.
    #[must_use]
    pub fn bit_width(&self) -> Option<u32> {
        match self {
            ColumnType::Varchar { len } => Some(len * BITS_PER_CHAR),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::Real => write!(f, "real"),
            ColumnType::Boolean => write!(f, "boolean"),
            ColumnType::Varchar { len } => write!(f, "varchar({len})"),
        }
    }
}

/// A table-qualified, typed column reference.
///
/// Equality and hashing consider only the qualified name; the declared type
/// and flags are carried metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    table: String,
    name: String,
    ordinal: u16,
    ty: ColumnType,
    nullable: bool,
    primary_key: bool,
}

impl Column {
    /// Create a column with default flags (not nullable, not part of a key).
    pub fn new(
        table: impl Into<String>,
        name: impl Into<String>,
        ordinal: u16,
        ty: ColumnType,
    ) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
            ordinal,
            ty,
            nullable: false,
            primary_key: false,
        }
    }

    /// Create a column with explicit nullability and key flags.
    pub fn with_flags(
        table: impl Into<String>,
        name: impl Into<String>,
        ordinal: u16,
        ty: ColumnType,
        nullable: bool,
        primary_key: bool,
    ) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
            ordinal,
            ty,
            nullable,
            primary_key,
        }
    }

    /// Owning relation name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Column name within the relation.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordinal position within the relation.
    #[must_use]
    pub fn ordinal(&self) -> u16 {
        self.ordinal
    }

    /// Declared type.
    #[must_use]
    pub fn ty(&self) -> ColumnType {
        self.ty
    }

    /// Whether the column admits NULL.
    #[must_use]
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Whether the column is part of the primary key.
    #[must_use]
    pub fn primary_key(&self) -> bool {
        self.primary_key
    }

    /// The `table.name` form under which every backend declares the
    /// variable.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table, self.name)
    }

    /// Bit width when used in a text comparison.
    #[must_use]
    pub fn bit_width(&self) -> Option<u32> {
        self.ty.bit_width()
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table && self.name == other.name
    }
}

impl Eq for Column {}

impl std::hash::Hash for Column {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.table.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_the_qualified_name() {
        let a = Column::new("t", "x", 1, ColumnType::Integer);
        let b = Column::with_flags("t", "x", 7, ColumnType::Real, true, true);
        let c = Column::new("u", "x", 1, ColumnType::Integer);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.qualified_name(), "t.x");
    }

    #[test]
    fn varchar_width_counts_sixteen_bits_per_character() {
        let s = Column::new("t", "s", 1, ColumnType::Varchar { len: 3 });
        assert_eq!(s.bit_width(), Some(48));
        assert_eq!(Column::new("t", "i", 1, ColumnType::Integer).bit_width(), None);
    }
}
