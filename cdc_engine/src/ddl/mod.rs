mod type_mapping;

pub use type_mapping::sql_data_type_to_jdbc;

use sqlparser::ast::{
    AlterColumnOperation, AlterTableOperation, ColumnOption, ObjectType, Statement,
    TableConstraint,
};
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;
use tracing::debug;

use crate::catalog::{Catalog, Column, QualifiedTableId, Table};

/// Statement prefixes the binlog carries that never touch table
/// structure. Matched case-insensitively against the trimmed statement
/// text before a parse is even attempted.
const IGNORABLE_PREFIXES: &[&str] = &[
    "BEGIN", "COMMIT", "ROLLBACK", "START TRANSACTION", "SAVEPOINT",
    "SET", "GRANT", "REVOKE", "FLUSH", "ANALYZE", "OPTIMIZE", "USE",
    "LOCK TABLES", "UNLOCK TABLES",
];

/// Parses DDL against a `Catalog`, in the same spirit as this lineage's
/// own `ast::query_parser` module: a statement that fails to parse is
/// logged and skipped rather than aborting the stream, because the
/// binlog carries operational DDL a CDC stream cannot usefully reject.
pub struct DdlParser;

impl DdlParser {
    /// Applies `sql` (as seen in one QUERY event, scoped to `database`)
    /// to `catalog`. Returns whether the statement was successfully
    /// parsed — independent of whether it actually mutated the catalog
    /// (a `SELECT` inside a QUERY event, say, parses fine and changes
    /// nothing). Never returns an error: a malformed statement is a
    /// recoverable condition, not a fatal one.
    pub fn apply(catalog: &mut Catalog, database: Option<&str>, sql: &str, include_views: bool) -> bool {
        let trimmed = sql.trim();
        if is_ignorable(trimmed) {
            return true;
        }

        let statements = match Parser::parse_sql(&MySqlDialect {}, trimmed) {
            Ok(statements) => statements,
            Err(err) => {
                debug!("ddl parse failed, skipping: {err} ({trimmed:?})");
                return false;
            }
        };

        for statement in statements {
            apply_statement(catalog, database, statement, include_views);
        }
        true
    }
}

fn is_ignorable(sql: &str) -> bool {
    let upper = sql.trim_start().to_ascii_uppercase();
    IGNORABLE_PREFIXES.iter().any(|p| upper.starts_with(p))
}

fn qualify(database: Option<&str>, name: &sqlparser::ast::ObjectName) -> QualifiedTableId {
    let parts: Vec<String> = name.0.iter().map(|ident| ident.value.clone()).collect();
    match parts.as_slice() {
        [schema, table] => QualifiedTableId::new(None, Some(schema.clone()), table.clone()),
        [table] => QualifiedTableId::with_table(database.map(|d| d.to_string()), table.clone()),
        _ => {
            let table = parts.last().cloned().unwrap_or_default();
            let schema = parts.get(parts.len().saturating_sub(2)).cloned();
            QualifiedTableId::with_table(schema.or_else(|| database.map(|d| d.to_string())), table)
        }
    }
}

fn apply_statement(catalog: &mut Catalog, database: Option<&str>, statement: Statement, include_views: bool) {
    match statement {
        Statement::CreateTable { name, columns, constraints, .. } => {
            let id = qualify(database, &name);
            let table = build_table(&columns, &constraints);
            catalog.put(id, table);
        }
        Statement::AlterTable { name, operations, .. } => {
            let id = qualify(database, &name);
            apply_alter(catalog, id, operations);
        }
        Statement::Drop { object_type: ObjectType::Table, names, .. } => {
            for name in names {
                catalog.remove(&qualify(database, &name));
            }
        }
        Statement::RenameTable(renames) => {
            for rename in renames {
                let old_id = qualify(database, &rename.old_name);
                let new_id = qualify(database, &rename.new_name);
                match catalog.get(&old_id).cloned() {
                    Some(table) => {
                        catalog.remove(&old_id);
                        catalog.put(new_id, table);
                    }
                    None => debug!("rename of unknown table {old_id}, ignoring"),
                }
            }
        }
        Statement::Drop { object_type: ObjectType::View, .. } if !include_views => {
            // views carry no row schema; nothing to drop from the catalog
        }
        Statement::CreateView { .. } if !include_views => {
            // views are tracked only when include_views is enabled, and
            // even then they have no columns/rows of their own to model
        }
        #[allow(deprecated)]
        Statement::Truncate { .. } => {
            // schema is unaffected by a truncate
        }
        other => {
            debug!("ddl statement not applicable to schema, ignoring: {other}");
        }
    }
}

fn apply_alter(catalog: &mut Catalog, id: QualifiedTableId, operations: Vec<AlterTableOperation>) {
    let Some(existing) = catalog.get(&id).cloned() else {
        debug!("alter table on unknown table {id}, ignoring");
        return;
    };

    let mut columns: Vec<Column> = existing.columns().to_vec();
    let mut primary_key: Vec<String> = existing.primary_key().to_vec();
    let mut renamed_to: Option<QualifiedTableId> = None;

    for op in operations {
        match op {
            AlterTableOperation::AddColumn { column_def, .. } => {
                let next_pos = columns.len() as u32 + 1;
                columns.push(column_from_def(&column_def, next_pos));
                if is_primary_key_column(&column_def) && !primary_key.contains(&column_def.name.value) {
                    primary_key.push(column_def.name.value.clone());
                }
            }
            AlterTableOperation::DropColumn { column_name, .. } => {
                columns.retain(|c| c.name != column_name.value);
                primary_key.retain(|pk| pk != &column_name.value);
                renumber(&mut columns);
            }
            AlterTableOperation::RenameColumn { old_column_name, new_column_name } => {
                if let Some(c) = columns.iter_mut().find(|c| c.name == old_column_name.value) {
                    c.name = new_column_name.value.clone();
                }
                for pk in primary_key.iter_mut() {
                    if pk == &old_column_name.value {
                        *pk = new_column_name.value.clone();
                    }
                }
            }
            AlterTableOperation::ChangeColumn { old_name, new_name, data_type, options, .. } => {
                if let Some(pos) = columns.iter().position(|c| c.name == old_name.value) {
                    let position = columns[pos].position;
                    columns[pos] = column_from_parts(&new_name, &data_type, &options, position);
                    if old_name.value != new_name.value {
                        for pk in primary_key.iter_mut() {
                            if pk == &old_name.value {
                                *pk = new_name.value.clone();
                            }
                        }
                    }
                }
            }
            AlterTableOperation::AlterColumn { column_name, op } => {
                if let AlterColumnOperation::SetDataType { data_type, .. } = op {
                    if let Some(c) = columns.iter_mut().find(|c| c.name == column_name.value) {
                        let (jdbc_type, vendor, length, scale) = sql_data_type_to_jdbc(&data_type);
                        c.jdbc_type = jdbc_type;
                        c.vendor_type = Some(vendor);
                        c.length = length;
                        c.scale = scale;
                    }
                }
            }
            AlterTableOperation::AddConstraint(TableConstraint::Unique { is_primary: true, columns: pk_cols, .. }) => {
                primary_key = pk_cols.iter().map(|i| i.value.clone()).collect();
            }
            AlterTableOperation::DropPrimaryKey => {
                primary_key.clear();
            }
            AlterTableOperation::RenameTable { table_name } => {
                renamed_to = Some(qualify(id.schema.as_deref(), &table_name));
            }
            other => {
                debug!("alter table operation not applied to schema: {other:?}");
            }
        }
    }

    let new_table = Table::with_charset(columns, primary_key, existing.default_charset().map(|s| s.to_string()));
    match renamed_to {
        Some(new_id) => {
            catalog.remove(&id);
            catalog.put(new_id, new_table);
        }
        None => catalog.put(id, new_table),
    }
}

fn renumber(columns: &mut [Column]) {
    for (idx, c) in columns.iter_mut().enumerate() {
        c.position = idx as u32 + 1;
    }
}

fn is_primary_key_column(column_def: &sqlparser::ast::ColumnDef) -> bool {
    column_def.options.iter().any(|opt| matches!(&opt.option, ColumnOption::Unique { is_primary: true, .. }))
}

fn column_from_def(column_def: &sqlparser::ast::ColumnDef, position: u32) -> Column {
    let options: Vec<ColumnOption> = column_def.options.iter().map(|opt| opt.option.clone()).collect();
    column_from_parts(&column_def.name, &column_def.data_type, &options, position)
}

fn column_from_parts(
    name: &sqlparser::ast::Ident,
    data_type: &sqlparser::ast::DataType,
    options: &[ColumnOption],
    position: u32,
) -> Column {
    let (jdbc_type, vendor, length, scale) = sql_data_type_to_jdbc(data_type);
    let not_null = options
        .iter()
        .any(|opt| matches!(opt, ColumnOption::NotNull) || matches!(opt, ColumnOption::Unique { is_primary: true, .. }));
    let auto_incremented = options.iter().any(|opt| {
        matches!(opt, ColumnOption::DialectSpecific(tokens) if tokens.iter().any(|t| t.to_string().eq_ignore_ascii_case("AUTO_INCREMENT")))
    });
    let generated = options.iter().any(|opt| matches!(opt, ColumnOption::Generated { .. }));

    Column::new(
        name.value.clone(),
        position,
        jdbc_type,
        Some(vendor),
        length,
        scale,
        !not_null,
        auto_incremented,
        generated,
    )
}

fn build_table(columns: &[sqlparser::ast::ColumnDef], constraints: &[TableConstraint]) -> Table {
    let cols: Vec<Column> = columns
        .iter()
        .enumerate()
        .map(|(idx, c)| column_from_def(c, idx as u32 + 1))
        .collect();

    let mut primary_key: Vec<String> = columns
        .iter()
        .filter(|c| is_primary_key_column(c))
        .map(|c| c.name.value.clone())
        .collect();

    if primary_key.is_empty() {
        for constraint in constraints {
            if let TableConstraint::Unique { is_primary: true, columns: pk_cols, .. } = constraint {
                primary_key = pk_cols.iter().map(|i| i.value.clone()).collect();
            }
        }
    }

    Table::new(cols, primary_key)
}
