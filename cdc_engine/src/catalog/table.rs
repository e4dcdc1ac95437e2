use crate::schema::JdbcType;

/// One column of a `Table`. Immutable; a schema-altering DDL statement
/// produces a brand new `Table` rather than mutating a `Column` in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    /// 1-based position within the table; dense, no gaps.
    pub position: u32,
    pub jdbc_type: JdbcType,
    pub vendor_type: Option<String>,
    /// -1 when unspecified.
    pub length: i64,
    /// -1 when unspecified.
    pub scale: i32,
    pub optional: bool,
    pub auto_incremented: bool,
    pub generated: bool,
}

impl Column {
    pub fn new(
        name: impl Into<String>,
        position: u32,
        jdbc_type: JdbcType,
        vendor_type: Option<String>,
        length: i64,
        scale: i32,
        optional: bool,
        auto_incremented: bool,
        generated: bool,
    ) -> Self {
        Column {
            name: name.into(),
            position,
            jdbc_type,
            vendor_type,
            length,
            scale,
            optional,
            auto_incremented,
            generated,
        }
    }
}

/// An immutable snapshot of a table's structure. Replaced wholesale on
/// every schema-altering DDL statement; never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    primary_key: Vec<String>,
    default_charset: Option<String>,
}

impl Table {
    /// `primary_key` names every PK column in key order. Panics in debug
    /// builds only via the invariant check below — callers construct
    /// tables from already-validated DDL, so a violation here means the
    /// DdlParser built a bad `Table`, not that bad input reached it.
    pub fn new(columns: Vec<Column>, primary_key: Vec<String>) -> Self {
        Table::with_charset(columns, primary_key, None)
    }

    pub fn with_charset(columns: Vec<Column>, primary_key: Vec<String>, default_charset: Option<String>) -> Self {
        let table = Table { columns, primary_key, default_charset };
        debug_assert!(
            table.primary_key.iter().all(|pk| table.column(pk).is_some()),
            "every primary key column must resolve to a column in the table"
        );
        table
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    pub fn default_charset(&self) -> Option<&str> {
        self.default_charset.as_deref()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_primary_key(&self) -> bool {
        !self.primary_key.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn col(name: &str, pos: u32) -> Column {
        Column::new(name, pos, JdbcType::Int, Some("INT".into()), -1, -1, true, false, false)
    }

    #[test]
    fn column_lookup_by_name() {
        let table = Table::new(vec![col("id", 1), col("name", 2)], vec!["id".into()]);
        assert!(table.column("id").is_some());
        assert!(table.column("missing").is_none());
        assert!(table.has_primary_key());
    }

    #[test]
    fn table_without_primary_key() {
        let table = Table::new(vec![col("id", 1)], vec![]);
        assert!(!table.has_primary_key());
    }
}
