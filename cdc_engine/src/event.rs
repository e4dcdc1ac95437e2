use common::err::cdc_error::CdcError;
use serde::{Deserialize, Serialize};

use crate::schema::Value;

/// A positional row tuple, one slot per table column. `None` means the
/// column was not present in the event's inclusion bitmap, not that its
/// value is SQL NULL — `Some(Value::Null)` is how a real NULL travels.
pub type Row = Vec<Option<Value>>;

/// A decoded binlog event. Everything below this line in a real
/// deployment is decoded off the wire by the binlog client library; this
/// core only ever sees the typed shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Rotate {
        next_binlog_filename: String,
        position: u64,
    },
    Query {
        database: Option<String>,
        sql: String,
    },
    TableMap {
        table_number: u64,
        database: String,
        table: String,
    },
    WriteRows {
        table_number: u64,
        rows: Vec<Row>,
    },
    UpdateRows {
        table_number: u64,
        /// (before image, after image) per updated row.
        rows: Vec<(Row, Row)>,
    },
    DeleteRows {
        table_number: u64,
        rows: Vec<Row>,
    },
}

/// The engine's view of the binlog client library: a pull source of
/// typed events. Implementations decode the wire protocol; this core
/// only consumes what comes out the other end.
pub trait EventSource {
    fn next_event(&mut self) -> Result<Option<Event>, CdcError>;
}

/// An `EventSource` over a fixed in-memory sequence, for tests and for
/// the demo CLI's fixture-replay mode.
pub struct VecEventSource {
    events: std::vec::IntoIter<Event>,
}

impl VecEventSource {
    pub fn new(events: Vec<Event>) -> Self {
        VecEventSource { events: events.into_iter() }
    }
}

impl EventSource for VecEventSource {
    fn next_event(&mut self) -> Result<Option<Event>, CdcError> {
        Ok(self.events.next())
    }
}
