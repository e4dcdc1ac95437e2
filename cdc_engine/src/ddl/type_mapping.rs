use sqlparser::ast::{CharacterLength, DataType, ExactNumberInfo};

use crate::schema::JdbcType;

/// Maps a parsed SQL column type to (JdbcType, vendor type name, length,
/// scale). Length/scale are -1 when the type carries none. Unrecognized
/// types fall back to `Varchar` with the vendor name preserved verbatim —
/// the DDL still parsed, and a best-effort string type beats dropping the
/// column.
pub fn sql_data_type_to_jdbc(dt: &DataType) -> (JdbcType, String, i64, i32) {
    let vendor = dt.to_string();
    match dt {
        DataType::TinyInt(_) => (JdbcType::TinyInt, vendor, -1, -1),
        DataType::SmallInt(_) => (JdbcType::SmallInt, vendor, -1, -1),
        DataType::Int(_) | DataType::Integer(_) | DataType::MediumInt(_) => (JdbcType::Int, vendor, -1, -1),
        DataType::BigInt(_) => (JdbcType::BigInt, vendor, -1, -1),
        DataType::Float(_) | DataType::Real => (JdbcType::Float, vendor, -1, -1),
        DataType::Double | DataType::DoublePrecision => (JdbcType::Double, vendor, -1, -1),
        DataType::Decimal(info) | DataType::Numeric(info) => {
            let (length, scale) = exact_number(info);
            (JdbcType::Decimal, vendor, length, scale)
        }
        DataType::Char(len) => (JdbcType::Char, vendor, char_length(len), -1),
        DataType::Varchar(len) | DataType::Nvarchar(len) => (JdbcType::Varchar, vendor, char_length(len), -1),
        DataType::Text | DataType::MediumText | DataType::TinyText | DataType::LongText => {
            (JdbcType::Text, vendor, -1, -1)
        }
        DataType::Binary(len) => (JdbcType::Binary, vendor, len.map(|l| l as i64).unwrap_or(-1), -1),
        DataType::Varbinary(len) => (JdbcType::Varbinary, vendor, len.map(|l| l as i64).unwrap_or(-1), -1),
        DataType::Blob(len) | DataType::TinyBlob | DataType::MediumBlob | DataType::LongBlob => {
            let _ = len;
            (JdbcType::Blob, vendor, -1, -1)
        }
        DataType::Date => (JdbcType::Date, vendor, -1, -1),
        DataType::Time(_, _) => (JdbcType::Time, vendor, -1, -1),
        DataType::Datetime(_) => (JdbcType::DateTime, vendor, -1, -1),
        DataType::Timestamp(_, _) => (JdbcType::Timestamp, vendor, -1, -1),
        DataType::Boolean | DataType::Bool => (JdbcType::Boolean, vendor, -1, -1),
        DataType::Bit(len) => (JdbcType::Bit, vendor, len.map(|l| l as i64).unwrap_or(-1), -1),
        _ => (JdbcType::Varchar, vendor, -1, -1),
    }
}

fn char_length(len: &Option<CharacterLength>) -> i64 {
    match len {
        Some(CharacterLength::IntegerLength { length, .. }) => *length as i64,
        _ => -1,
    }
}

fn exact_number(info: &ExactNumberInfo) -> (i64, i32) {
    match info {
        ExactNumberInfo::None => (-1, -1),
        ExactNumberInfo::Precision(p) => (*p as i64, -1),
        ExactNumberInfo::PrecisionAndScale(p, s) => (*p as i64, *s as i32),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use sqlparser::dialect::MySqlDialect;
    use sqlparser::parser::Parser;

    fn parse_column_type(ddl: &str) -> DataType {
        let stmts = Parser::parse_sql(&MySqlDialect {}, ddl).unwrap();
        match &stmts[0] {
            sqlparser::ast::Statement::CreateTable { columns, .. } => columns[0].data_type.clone(),
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn maps_decimal_with_precision_and_scale() {
        let dt = parse_column_type("CREATE TABLE t (amount DECIMAL(10,2))");
        let (jdbc, _, length, scale) = sql_data_type_to_jdbc(&dt);
        assert_eq!(jdbc, JdbcType::Decimal);
        assert_eq!(length, 10);
        assert_eq!(scale, 2);
    }

    #[test]
    fn maps_varchar_with_length() {
        let dt = parse_column_type("CREATE TABLE t (name VARCHAR(32))");
        let (jdbc, _, length, _) = sql_data_type_to_jdbc(&dt);
        assert_eq!(jdbc, JdbcType::Varchar);
        assert_eq!(length, 32);
    }

    #[test]
    fn maps_integer_family() {
        assert_eq!(sql_data_type_to_jdbc(&parse_column_type("CREATE TABLE t (x TINYINT)")).0, JdbcType::TinyInt);
        assert_eq!(sql_data_type_to_jdbc(&parse_column_type("CREATE TABLE t (x BIGINT)")).0, JdbcType::BigInt);
    }
}
