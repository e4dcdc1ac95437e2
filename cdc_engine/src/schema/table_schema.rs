use crate::catalog::Table;
use crate::schema::{CanonicalType, Value};

/// One field of a derived key or value schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub canonical_type: CanonicalType,
    pub optional: bool,
}

/// The schema a `Table` translates into: a key schema derived from the
/// primary key (absent if the table has none) and a value schema
/// covering every column in position order. `TableSchema` is
/// referentially transparent given the `Table` it was built from — two
/// tables with identical columns and PK produce equal schemas.
#[derive(Debug, Clone)]
pub struct TableSchema {
    key_schema: Option<Vec<Field>>,
    value_schema: Vec<Field>,
    /// 0-based column index for each key field, parallel to `key_schema`.
    key_positions: Vec<usize>,
}

impl TableSchema {
    pub fn key_schema(&self) -> Option<&[Field]> {
        self.key_schema.as_deref()
    }

    pub fn value_schema(&self) -> &[Field] {
        &self.value_schema
    }

    /// Projects a row tuple's PK columns into a structured key. A row
    /// tuple is positional, one slot per table column, `None` meaning
    /// "not present in this event's bitmap". Returns `None` if the table
    /// has no PK, or if any PK column is absent from the row — a key
    /// that can't be fully formed is not a key.
    pub fn extract_key(&self, row: &[Option<Value>]) -> Option<Vec<(String, Value)>> {
        let key_schema = self.key_schema.as_ref()?;
        let mut out = Vec::with_capacity(key_schema.len());
        for (field, &pos) in key_schema.iter().zip(self.key_positions.iter()) {
            let value = row.get(pos)?.clone()?;
            out.push((field.name.clone(), value));
        }
        Some(out)
    }

    /// Projects a row tuple into a structured value, one entry per column
    /// actually present in the row (columns absent from the bitmap are
    /// omitted, not emitted as `Value::Null`).
    pub fn extract_value(&self, row: &[Option<Value>]) -> Vec<(String, Value)> {
        self.value_schema
            .iter()
            .enumerate()
            .filter_map(|(pos, field)| {
                let value = row.get(pos)?.clone()?;
                Some((field.name.clone(), value))
            })
            .collect()
    }
}

pub struct TableSchemaBuilder;

impl TableSchemaBuilder {
    pub fn build(table: &Table) -> TableSchema {
        let value_schema: Vec<Field> = table
            .columns()
            .iter()
            .map(|c| Field {
                name: c.name.clone(),
                canonical_type: c.jdbc_type.canonical(),
                optional: c.optional,
            })
            .collect();

        if table.primary_key().is_empty() {
            return TableSchema {
                key_schema: None,
                value_schema,
                key_positions: vec![],
            };
        }

        let mut key_schema = Vec::with_capacity(table.primary_key().len());
        let mut key_positions = Vec::with_capacity(table.primary_key().len());
        for pk_name in table.primary_key() {
            let (pos, column) = table
                .columns()
                .iter()
                .enumerate()
                .find(|(_, c)| &c.name == pk_name)
                .expect("primary key column must exist on the table");
            key_schema.push(Field {
                name: column.name.clone(),
                canonical_type: column.jdbc_type.canonical(),
                optional: false,
            });
            key_positions.push(pos);
        }

        TableSchema {
            key_schema: Some(key_schema),
            value_schema,
            key_positions,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::Column;
    use crate::schema::JdbcType;

    fn table() -> Table {
        Table::new(
            vec![
                Column::new("id", 1, JdbcType::Int, None, -1, -1, false, false, false),
                Column::new("name", 2, JdbcType::Varchar, None, 32, -1, true, false, false),
                Column::new("age", 3, JdbcType::Int, None, -1, -1, true, false, false),
            ],
            vec!["id".into()],
        )
    }

    #[test]
    fn key_schema_follows_pk_order() {
        let schema = TableSchemaBuilder::build(&table());
        let key_schema = schema.key_schema().unwrap();
        assert_eq!(key_schema.len(), 1);
        assert_eq!(key_schema[0].name, "id");
        assert!(!key_schema[0].optional);
    }

    #[test]
    fn value_schema_covers_every_column_in_position_order() {
        let schema = TableSchemaBuilder::build(&table());
        let names: Vec<&str> = schema.value_schema().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "age"]);
    }

    #[test]
    fn table_without_pk_has_no_key_schema() {
        let t = Table::new(vec![Column::new("id", 1, JdbcType::Int, None, -1, -1, true, false, false)], vec![]);
        let schema = TableSchemaBuilder::build(&t);
        assert!(schema.key_schema().is_none());
        assert!(schema.extract_key(&[Some(Value::Int32(1))]).is_none());
    }

    #[test]
    fn extract_key_and_value_project_row_tuple() {
        let schema = TableSchemaBuilder::build(&table());
        let row = vec![Some(Value::Int32(1)), Some(Value::String("a".into())), Some(Value::Int32(30))];

        let key = schema.extract_key(&row).unwrap();
        assert_eq!(key, vec![("id".to_string(), Value::Int32(1))]);

        let value = schema.extract_value(&row);
        assert_eq!(
            value,
            vec![
                ("id".to_string(), Value::Int32(1)),
                ("name".to_string(), Value::String("a".into())),
                ("age".to_string(), Value::Int32(30)),
            ]
        );
    }

    #[test]
    fn absent_columns_are_omitted_not_nulled() {
        let schema = TableSchemaBuilder::build(&table());
        let row = vec![Some(Value::Int32(1)), None, Some(Value::Int32(30))];
        let value = schema.extract_value(&row);
        assert_eq!(
            value,
            vec![("id".to_string(), Value::Int32(1)), ("age".to_string(), Value::Int32(30))]
        );
    }

    #[test]
    fn missing_pk_column_in_row_yields_no_key() {
        let schema = TableSchemaBuilder::build(&table());
        let row = vec![None, Some(Value::String("a".into())), Some(Value::Int32(30))];
        assert!(schema.extract_key(&row).is_none());
    }
}
