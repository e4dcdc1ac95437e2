mod table_schema;
mod value;

pub use table_schema::{Field, TableSchema, TableSchemaBuilder};
pub use value::Value;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// JDBC-style type codes. Columns are translated into this vocabulary by
/// the DdlParser before a `TableSchema` derives field types from them —
/// stable and externally observable, see the canonical mapping table in
/// the type-code section this mirrors.
#[derive(Debug, PartialEq, Eq, Clone, Copy, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum JdbcType {
    TinyInt = 0,
    SmallInt = 1,
    Int = 2,
    BigInt = 3,
    Float = 4,
    Double = 5,
    Decimal = 6,
    Char = 7,
    Varchar = 8,
    Text = 9,
    Binary = 10,
    Varbinary = 11,
    Blob = 12,
    Date = 13,
    Time = 14,
    DateTime = 15,
    Timestamp = 16,
    Bit = 17,
    Boolean = 18,
}

/// The runtime representation a `JdbcType` translates into. Several JDBC
/// codes collapse onto the same canonical type (CHAR/VARCHAR/TEXT are all
/// `StringT`) — this is the level `Value` and `Field::type_name` actually
/// operate at.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CanonicalType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    StringT,
    Bytes,
    /// Days since the Unix epoch.
    DateDays,
    /// Microseconds since midnight.
    TimeMicros,
    /// Microseconds since the Unix epoch.
    DateTimeMicros,
}

impl JdbcType {
    pub fn canonical(&self) -> CanonicalType {
        match self {
            JdbcType::TinyInt => CanonicalType::Int8,
            JdbcType::SmallInt => CanonicalType::Int16,
            JdbcType::Int => CanonicalType::Int32,
            JdbcType::BigInt => CanonicalType::Int64,
            JdbcType::Float => CanonicalType::Float32,
            JdbcType::Double => CanonicalType::Float64,
            JdbcType::Decimal => CanonicalType::Decimal,
            JdbcType::Char | JdbcType::Varchar | JdbcType::Text => CanonicalType::StringT,
            JdbcType::Binary | JdbcType::Varbinary | JdbcType::Blob | JdbcType::Bit => CanonicalType::Bytes,
            JdbcType::Date => CanonicalType::DateDays,
            JdbcType::Time => CanonicalType::TimeMicros,
            JdbcType::DateTime | JdbcType::Timestamp => CanonicalType::DateTimeMicros,
            JdbcType::Boolean => CanonicalType::Boolean,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_jdbc_type_maps_to_a_canonical_type() {
        let all = [
            JdbcType::TinyInt, JdbcType::SmallInt, JdbcType::Int, JdbcType::BigInt,
            JdbcType::Float, JdbcType::Double, JdbcType::Decimal,
            JdbcType::Char, JdbcType::Varchar, JdbcType::Text,
            JdbcType::Binary, JdbcType::Varbinary, JdbcType::Blob,
            JdbcType::Date, JdbcType::Time, JdbcType::DateTime, JdbcType::Timestamp,
            JdbcType::Bit, JdbcType::Boolean,
        ];
        for t in all {
            let _ = t.canonical();
        }
    }

    #[test]
    fn jdbc_type_round_trips_through_its_code() {
        let code: i32 = JdbcType::BigInt.into();
        let back = JdbcType::try_from(code).unwrap();
        assert_eq!(back, JdbcType::BigInt);
    }
}
