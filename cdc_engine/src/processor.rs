use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use common::err::cdc_error::CdcError;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::cache::{Converter, ConverterCache, RowLookup, TopicSelector};
use crate::catalog::{Catalog, QualifiedTableId};
use crate::config::EngineConfig;
use crate::ddl::DdlParser;
use crate::event::{Event, EventSource, Row};
use crate::history::{HistoryRecord, HistoryStore};
use crate::position::SourcePosition;
use crate::schema::TableSchemaBuilder;
use crate::sink::{Record, Sink};

/// Dispatches a stream of binlog events onto a Catalog, a ConverterCache
/// and a sink, in strict event order. Single-writer, single-threaded —
/// see the concurrency notes this mirrors: the only suspension point is
/// the synchronous call into `Sink::emit`.
pub struct EventProcessor<H, S, T> {
    config: EngineConfig,
    position: SourcePosition,
    catalog: Catalog,
    cache: ConverterCache,
    history: H,
    sink: S,
    topic_selector: T,
    table_filter: Option<Regex>,
    stop: Arc<AtomicBool>,
}

impl<H: HistoryStore, S: Sink, T: TopicSelector> EventProcessor<H, S, T> {
    pub fn new(config: EngineConfig, history: H, sink: S, topic_selector: T) -> Result<Self, CdcError> {
        let table_filter = config.compiled_table_filter()?;
        let position = SourcePosition::new(config.server_name.clone(), String::new(), 4);

        Ok(EventProcessor {
            config,
            position,
            catalog: Catalog::new(),
            cache: ConverterCache::new(),
            history,
            sink,
            topic_selector,
            table_filter,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// A cooperative cancellation flag the runner can set from another
    /// thread. Checked between events, never mid-event — the processor
    /// always finishes every row of the event it is currently
    /// dispatching before it returns.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Replays the history store to rebuild the catalog before any new
    /// event is processed. Re-attempts the parse for every record
    /// regardless of its stored `parsed` flag: a previously-unparsed
    /// statement that now parses (because the parser improved) logs a
    /// one-line WARN rather than silently changing behavior.
    pub fn replay_history(&mut self) -> Result<(), CdcError> {
        let mut pending_errors: Option<CdcError> = None;
        let catalog = &mut self.catalog;
        let include_views = self.config.include_views;

        let result = self.history.replay(&mut |record: &HistoryRecord| {
            let applied = DdlParser::apply(catalog, record.database.as_deref(), &record.ddl, include_views);
            if applied && !record.parsed {
                warn!("ddl now parses on replay though it previously did not: {:?}", record.ddl);
            }
            if !applied && record.parsed {
                pending_errors = Some(CdcError::Other(format!(
                    "ddl that previously parsed now fails on replay: {:?}",
                    record.ddl
                )));
            }
        });
        result?;
        if let Some(e) = pending_errors {
            warn!("{e}");
        }
        Ok(())
    }

    /// Drives `source` until it is exhausted or `stop_handle()` is set.
    pub fn run(&mut self, source: &mut dyn EventSource) -> Result<(), CdcError> {
        loop {
            if self.stop.load(Ordering::Relaxed) {
                info!("stop requested, processor returning after last dispatched event");
                return Ok(());
            }
            match source.next_event()? {
                Some(event) => self.process(event)?,
                None => return Ok(()),
            }
        }
    }

    pub fn process(&mut self, event: Event) -> Result<(), CdcError> {
        match event {
            Event::Rotate { next_binlog_filename, position } => {
                self.position.rotate(next_binlog_filename, position);
                self.cache.clear();
                Ok(())
            }
            Event::Query { database, sql } => self.process_query(database, sql),
            Event::TableMap { table_number, database, table } => {
                self.process_table_map(table_number, database, table)
            }
            Event::WriteRows { table_number, rows } => self.process_write_rows(table_number, rows),
            Event::UpdateRows { table_number, rows } => self.process_update_rows(table_number, rows),
            Event::DeleteRows { table_number, rows } => self.process_delete_rows(table_number, rows),
        }
    }

    fn process_query(&mut self, database: Option<String>, sql: String) -> Result<(), CdcError> {
        let parsed = DdlParser::apply(&mut self.catalog, database.as_deref(), &sql, self.config.include_views);

        let record = HistoryRecord {
            partition: self.position.partition(),
            offset: self.position.offset(),
            database,
            ddl: sql,
            parsed,
        };
        self.history
            .record(record)
            .map_err(|e| CdcError::HistoryWriteError(e.to_string()))?;

        if parsed && self.config.schema_change_topic_enabled {
            let changed = self.catalog.drain_changes();
            for id in changed {
                self.emit_schema_change(&id)?;
            }
        } else if parsed {
            self.catalog.drain_changes();
        }

        Ok(())
    }

    fn emit_schema_change(&mut self, id: &QualifiedTableId) -> Result<(), CdcError> {
        let topic = self.topic_selector.schema_change_topic(&self.config.server_name);
        let record = Record {
            partition: self.position.partition(),
            offset: self.position.offset(),
            topic,
            partition_hint: None,
            key_schema: None,
            key: None,
            value_schema: None,
            value: Some(vec![("table".to_string(), crate::schema::Value::String(id.to_string()))]),
            before: None,
        };
        self.sink.emit(&record).map_err(|e| CdcError::SinkError(e.to_string()))
    }

    fn process_table_map(&mut self, table_number: u64, database: String, table: String) -> Result<(), CdcError> {
        let id = QualifiedTableId::with_table(Some(database.clone()), table.clone());

        if let Some(filter) = &self.table_filter {
            if !filter.is_match(&format!("{database}.{table}")) {
                self.cache.register_filtered(table_number);
                return Ok(());
            }
        }

        match self.catalog.get(&id) {
            None => {
                self.cache.register_unknown(table_number);
            }
            Some(schema_table) => {
                let table_schema = TableSchemaBuilder::build(schema_table);
                let topic = self.topic_selector.topic_for(&self.config.server_name, &database, &table);
                self.cache.register(
                    table_number,
                    Converter { table_id: id, topic, partition_hint: None, table_schema },
                );
            }
        }
        Ok(())
    }

    fn process_write_rows(&mut self, table_number: u64, rows: Vec<Row>) -> Result<(), CdcError> {
        self.for_each_row(table_number, rows, |processor, converter, row, row_index| {
            processor.position.set_row_in_event(row_index as u32);
            let value = converter.table_schema.extract_value(&row);
            let key = converter.table_schema.extract_key(&row);
            let record = Record {
                partition: processor.position.partition(),
                offset: processor.position.offset(),
                topic: converter.topic.clone(),
                partition_hint: converter.partition_hint,
                key_schema: converter.table_schema.key_schema().map(|f| f.to_vec()),
                key,
                value_schema: Some(converter.table_schema.value_schema().to_vec()),
                value: Some(value),
                before: None,
            };
            processor.sink.emit(&record).map_err(|e| CdcError::SinkError(e.to_string()))
        })
    }

    fn process_delete_rows(&mut self, table_number: u64, rows: Vec<Row>) -> Result<(), CdcError> {
        self.for_each_row(table_number, rows, |processor, converter, row, row_index| {
            processor.position.set_row_in_event(row_index as u32);
            let key = converter.table_schema.extract_key(&row);
            let record = Record {
                partition: processor.position.partition(),
                offset: processor.position.offset(),
                topic: converter.topic.clone(),
                partition_hint: converter.partition_hint,
                key_schema: converter.table_schema.key_schema().map(|f| f.to_vec()),
                key,
                value_schema: None,
                value: None,
                before: None,
            };
            processor.sink.emit(&record).map_err(|e| CdcError::SinkError(e.to_string()))
        })
    }

    fn process_update_rows(&mut self, table_number: u64, rows: Vec<(Row, Row)>) -> Result<(), CdcError> {
        let emit_before = self.config.emit_update_before_image;
        let converter = match self.cache.lookup(table_number) {
            RowLookup::Known(c) => c.clone(),
            RowLookup::Unknown { warn } => {
                if warn {
                    self.cache.warn_unknown_once(table_number);
                }
                return Ok(());
            }
            RowLookup::Filtered => return Ok(()),
        };

        for (row_index, (before_row, after_row)) in rows.into_iter().enumerate() {
            self.position.set_row_in_event(row_index as u32);
            let value = converter.table_schema.extract_value(&after_row);
            let key = converter.table_schema.extract_key(&after_row);
            let before = if emit_before {
                Some(converter.table_schema.extract_value(&before_row))
            } else {
                None
            };

            let record = Record {
                partition: self.position.partition(),
                offset: self.position.offset(),
                topic: converter.topic.clone(),
                partition_hint: converter.partition_hint,
                key_schema: converter.table_schema.key_schema().map(|f| f.to_vec()),
                key,
                value_schema: Some(converter.table_schema.value_schema().to_vec()),
                value: Some(value),
                before,
            };
            self.sink.emit(&record).map_err(|e| CdcError::SinkError(e.to_string()))?;
        }
        Ok(())
    }

    fn for_each_row(
        &mut self,
        table_number: u64,
        rows: Vec<Row>,
        mut emit_one: impl FnMut(&mut Self, &Converter, Row, usize) -> Result<(), CdcError>,
    ) -> Result<(), CdcError> {
        let converter = match self.cache.lookup(table_number) {
            RowLookup::Known(c) => c.clone(),
            RowLookup::Unknown { warn } => {
                if warn {
                    self.cache.warn_unknown_once(table_number);
                } else {
                    debug!("dropping row for already-warned unknown table number {table_number}");
                }
                return Ok(());
            }
            RowLookup::Filtered => return Ok(()),
        };

        for (row_index, row) in rows.into_iter().enumerate() {
            emit_one(self, &converter, row, row_index)?;
        }
        Ok(())
    }
}
