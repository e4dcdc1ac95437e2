mod file_store;
mod memory_store;

pub use file_store::FileHistoryStore;
pub use memory_store::MemoryHistoryStore;

use common::err::cdc_error::CdcError;
use serde::{Deserialize, Serialize};

use crate::position::{Offset, Partition};

/// One durable DDL record: enough to both audit what happened and to
/// replay the catalog from scratch on restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub partition: Partition,
    pub offset: Offset,
    pub database: Option<String>,
    pub ddl: String,
    /// Whether the DdlParser was able to parse this statement when it was
    /// first seen. A later parser fix can successfully re-parse a
    /// previously-unparsed statement during replay; `parsed` lets that
    /// show up as a one-line WARN instead of silently changing what the
    /// replayed catalog looks like compared to what was live at the time.
    pub parsed: bool,
}

/// Append-only log of `HistoryRecord`s. A successful `record` call must
/// be durable before the corresponding row event is emitted to the sink
/// (see the concurrency notes on `EventProcessor`) — replay must then
/// deliver records in the exact order they were appended.
pub trait HistoryStore: Send {
    fn record(&mut self, record: HistoryRecord) -> Result<(), CdcError>;

    /// Feeds every record, in append order, to `consumer`.
    fn replay(&self, consumer: &mut dyn FnMut(&HistoryRecord)) -> Result<(), CdcError>;
}

#[cfg(test)]
pub(crate) fn sample_record(ddl: &str) -> HistoryRecord {
    HistoryRecord {
        partition: Partition::new("server1"),
        offset: Offset::new("bin.000001", 4, 0),
        database: Some("shop".to_string()),
        ddl: ddl.to_string(),
        parsed: true,
    }
}
