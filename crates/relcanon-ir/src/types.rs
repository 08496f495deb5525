//! Type system for relational plans

use serde::{Deserialize, Serialize};
use std::fmt;

/// SQL type names attached to every column and scalar expression.
///
/// Names outside the common set are kept verbatim in `Named`, so planner
/// types such as `INTERVAL_DAY` or `SARG` pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SqlType {
    // Primitives
    Boolean,
    Tinyint,
    Smallint,
    Integer,
    Bigint,
    Decimal,
    Float,
    Real,
    Double,

    // Temporal
    Date,
    Time,
    Timestamp,
    IntervalDaySecond,
    IntervalYearMonth,

    // Text
    Char,
    Varchar,

    // Binary
    Binary,
    Varbinary,

    // Complex
    Array,
    Map,
    Multiset,
    Row,

    // Special
    Null,
    Any,
    Symbol,
    Other,

    /// Any other type name reported by the planner
    Named(String),
}

const KNOWN: [SqlType; 26] = [
    SqlType::Boolean,
    SqlType::Tinyint,
    SqlType::Smallint,
    SqlType::Integer,
    SqlType::Bigint,
    SqlType::Decimal,
    SqlType::Float,
    SqlType::Real,
    SqlType::Double,
    SqlType::Date,
    SqlType::Time,
    SqlType::Timestamp,
    SqlType::IntervalDaySecond,
    SqlType::IntervalYearMonth,
    SqlType::Char,
    SqlType::Varchar,
    SqlType::Binary,
    SqlType::Varbinary,
    SqlType::Array,
    SqlType::Map,
    SqlType::Multiset,
    SqlType::Row,
    SqlType::Null,
    SqlType::Any,
    SqlType::Symbol,
    SqlType::Other,
];

impl SqlType {
    /// Canonical upper-case name, as emitted in `"type"` fields.
    pub fn name(&self) -> &str {
        match self {
            SqlType::Boolean => "BOOLEAN",
            SqlType::Tinyint => "TINYINT",
            SqlType::Smallint => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::Bigint => "BIGINT",
            SqlType::Decimal => "DECIMAL",
            SqlType::Float => "FLOAT",
            SqlType::Real => "REAL",
            SqlType::Double => "DOUBLE",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::IntervalDaySecond => "INTERVAL_DAY_SECOND",
            SqlType::IntervalYearMonth => "INTERVAL_YEAR_MONTH",
            SqlType::Char => "CHAR",
            SqlType::Varchar => "VARCHAR",
            SqlType::Binary => "BINARY",
            SqlType::Varbinary => "VARBINARY",
            SqlType::Array => "ARRAY",
            SqlType::Map => "MAP",
            SqlType::Multiset => "MULTISET",
            SqlType::Row => "ROW",
            SqlType::Null => "NULL",
            SqlType::Any => "ANY",
            SqlType::Symbol => "SYMBOL",
            SqlType::Other => "OTHER",
            SqlType::Named(name) => name.as_str(),
        }
    }
}

impl From<String> for SqlType {
    fn from(name: String) -> Self {
        KNOWN
            .iter()
            .find(|ty| ty.name() == name)
            .cloned()
            .unwrap_or(SqlType::Named(name))
    }
}

impl From<SqlType> for String {
    fn from(ty: SqlType) -> Self {
        match ty {
            SqlType::Named(name) => name,
            known => known.name().to_string(),
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
