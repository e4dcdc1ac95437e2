use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// A translated column value. `Null` stands for SQL NULL and is distinct
/// from "field absent from the bitmap", which `TableSchema::extract_value`
/// represents by omitting the field from the produced record entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Decimal(BigDecimal),
    String(String),
    Bytes(Vec<u8>),
    /// Days since the Unix epoch.
    DateDays(i32),
    /// Microseconds since midnight.
    TimeMicros(i64),
    /// Microseconds since the Unix epoch.
    DateTimeMicros(i64),
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn decimal_values_compare_by_value() {
        let a = Value::Decimal(BigDecimal::from_str("1.50").unwrap());
        let b = Value::Decimal(BigDecimal::from_str("1.50").unwrap());
        assert_eq!(a, b);
    }
}
