use common::err::cdc_error::CdcError;

use crate::position::{Offset, Partition};
use crate::schema::{Field, Value};

/// One translated change, ready for the sink. A DELETE carries a `null`
/// value and `value_schema: None` — a tombstone — while still carrying a
/// non-null key.
#[derive(Debug, Clone)]
pub struct Record {
    pub partition: Partition,
    pub offset: Offset,
    pub topic: String,
    /// Nullable: routed by the sink, not interpreted by the core.
    pub partition_hint: Option<i32>,
    pub key_schema: Option<Vec<Field>>,
    pub key: Option<Vec<(String, Value)>>,
    pub value_schema: Option<Vec<Field>>,
    pub value: Option<Vec<(String, Value)>>,
    /// Populated only for UPDATE events when `EngineConfig.emit_update_before_image`
    /// is set.
    pub before: Option<Vec<(String, Value)>>,
}

/// The external consumer of emitted records. `emit` is called
/// synchronously from the processor's dispatch loop — see the
/// concurrency notes on `EventProcessor` — and is considered to have
/// taken durable ownership of the record once it returns `Ok`.
pub trait Sink {
    fn emit(&mut self, record: &Record) -> Result<(), CdcError>;
}

/// A `Sink` that collects every record in memory, for tests.
#[derive(Debug, Default)]
pub struct VecSink {
    records: Vec<Record>,
}

impl VecSink {
    pub fn new() -> Self {
        VecSink::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl Sink for VecSink {
    fn emit(&mut self, record: &Record) -> Result<(), CdcError> {
        self.records.push(record.clone());
        Ok(())
    }
}
