use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::catalog::QualifiedTableId;
use crate::schema::TableSchema;

/// Turns `(server, db, table)` into a sink topic, and `server` alone into
/// the topic schema-change records land on.
pub trait TopicSelector: Send {
    fn topic_for(&self, server: &str, db: &str, table: &str) -> String;
    fn schema_change_topic(&self, server: &str) -> String;
}

/// `{server}.{db}.{table}` / `{server}.schema-changes`.
pub struct DefaultTopicSelector;

impl TopicSelector for DefaultTopicSelector {
    fn topic_for(&self, server: &str, db: &str, table: &str) -> String {
        format!("{server}.{db}.{table}")
    }

    fn schema_change_topic(&self, server: &str) -> String {
        format!("{server}.schema-changes")
    }
}

/// An ephemeral binding from the numeric table id a binlog file uses to
/// the schema needed to translate its row events.
#[derive(Debug, Clone)]
pub struct Converter {
    pub table_id: QualifiedTableId,
    pub topic: String,
    pub partition_hint: Option<i32>,
    pub table_schema: TableSchema,
}

/// Maps the numeric table id used inside one binlog file to a bound
/// `Converter`. Owned by the single `EventProcessor`; no interior
/// mutability needed. Mirrors this lineage's `TableCache`/
/// `TableCacheManager` lineage, minus their LRU bound — here eviction is
/// driven by ROTATE and by table-number reassignment, not by capacity.
#[derive(Debug, Default)]
pub struct ConverterCache {
    by_number: HashMap<u64, Converter>,
    name_to_number: HashMap<QualifiedTableId, u64>,
    unknown_numbers: HashSet<u64>,
    warned_unknown: HashSet<u64>,
    filtered_numbers: HashSet<u64>,
    filtered_row_count: u64,
}

pub enum RowLookup<'a> {
    Known(&'a Converter),
    /// Row events for this numeric id are dropped; `warn` is true the
    /// first time this is surfaced for this id.
    Unknown { warn: bool },
    Filtered,
}

impl ConverterCache {
    pub fn new() -> Self {
        ConverterCache::default()
    }

    /// Registers `converter` under `table_number`, evicting any previous
    /// numeric id that mapped to the same table (MySQL re-assigns table
    /// numbers within a file after a schema change).
    pub fn register(&mut self, table_number: u64, converter: Converter) {
        if let Some(&old_number) = self.name_to_number.get(&converter.table_id) {
            if old_number != table_number {
                self.by_number.remove(&old_number);
            }
        }
        self.name_to_number.insert(converter.table_id.clone(), table_number);
        self.unknown_numbers.remove(&table_number);
        self.warned_unknown.remove(&table_number);
        self.filtered_numbers.remove(&table_number);
        self.by_number.insert(table_number, converter);
    }

    /// Records that `table_number` refers to a table with no Catalog
    /// entry. No converter is created; subsequent row events for this
    /// number are dropped (see `lookup`).
    pub fn register_unknown(&mut self, table_number: u64) {
        self.by_number.remove(&table_number);
        self.unknown_numbers.insert(table_number);
    }

    /// Records that `table_number` refers to a known table excluded by
    /// the table filter.
    pub fn register_filtered(&mut self, table_number: u64) {
        self.by_number.remove(&table_number);
        self.filtered_numbers.insert(table_number);
    }

    pub fn lookup(&mut self, table_number: u64) -> RowLookup<'_> {
        if self.filtered_numbers.contains(&table_number) {
            self.filtered_row_count += 1;
            return RowLookup::Filtered;
        }
        if self.unknown_numbers.contains(&table_number) {
            let first = self.warned_unknown.insert(table_number);
            return RowLookup::Unknown { warn: first };
        }
        match self.by_number.get(&table_number) {
            Some(converter) => RowLookup::Known(converter),
            None => {
                // A row event arrived with no preceding TABLE_MAP at all;
                // treat it the same as an unknown table.
                self.unknown_numbers.insert(table_number);
                let first = self.warned_unknown.insert(table_number);
                RowLookup::Unknown { warn: first }
            }
        }
    }

    pub fn warn_unknown_once(&self, table_number: u64) {
        warn!("row event for unregistered table number {table_number}, dropping");
    }

    pub fn filtered_row_count(&self) -> u64 {
        self.filtered_row_count
    }

    /// Clears every numeric-id binding — numeric ids are only unique
    /// within one binlog file, so a ROTATE invalidates all of them. The
    /// Catalog and TableSchema cache are untouched.
    pub fn clear(&mut self) {
        self.by_number.clear();
        self.name_to_number.clear();
        self.unknown_numbers.clear();
        self.warned_unknown.clear();
        self.filtered_numbers.clear();
    }

    pub fn len(&self) -> usize {
        self.by_number.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::{Column, Table};
    use crate::schema::{JdbcType, TableSchemaBuilder};

    fn converter(table: &str) -> Converter {
        let t = Table::new(vec![Column::new("id", 1, JdbcType::Int, None, -1, -1, false, false, false)], vec!["id".into()]);
        Converter {
            table_id: QualifiedTableId::with_table(Some("shop".into()), table),
            topic: format!("shop.{table}"),
            partition_hint: None,
            table_schema: TableSchemaBuilder::build(&t),
        }
    }

    #[test]
    fn rotate_clears_all_numeric_bindings() {
        let mut cache = ConverterCache::new();
        cache.register(10, converter("orders"));
        cache.register_unknown(20);
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(matches!(cache.lookup(10), RowLookup::Unknown { warn: true }));
    }

    #[test]
    fn reassigned_table_number_evicts_the_old_one() {
        let mut cache = ConverterCache::new();
        cache.register(10, converter("orders"));
        cache.register(11, converter("orders"));
        assert!(matches!(cache.lookup(10), RowLookup::Unknown { .. }));
        assert!(matches!(cache.lookup(11), RowLookup::Known(_)));
    }

    #[test]
    fn unknown_table_warns_once() {
        let mut cache = ConverterCache::new();
        cache.register_unknown(30);
        assert!(matches!(cache.lookup(30), RowLookup::Unknown { warn: true }));
        assert!(matches!(cache.lookup(30), RowLookup::Unknown { warn: false }));
    }

    #[test]
    fn filtered_table_counts_without_warning() {
        let mut cache = ConverterCache::new();
        cache.register_filtered(40);
        assert!(matches!(cache.lookup(40), RowLookup::Filtered));
        assert!(matches!(cache.lookup(40), RowLookup::Filtered));
        assert_eq!(cache.filtered_row_count(), 2);
    }
}
