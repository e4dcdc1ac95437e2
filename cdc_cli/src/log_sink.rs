use cdc_engine::sink::{Record, Sink};
use common::err::cdc_error::CdcError;

/// A `Sink` that logs every record via `tracing`, for the demo CLI. A
/// real deployment would plug in a Kafka or similar producer here
/// instead.
#[derive(Debug, Default)]
pub struct LoggingSink {
    emitted: u64,
}

impl LoggingSink {
    pub fn new() -> Self {
        LoggingSink::default()
    }
}

impl Sink for LoggingSink {
    fn emit(&mut self, record: &Record) -> Result<(), CdcError> {
        self.emitted += 1;
        tracing::info!(
            topic = %record.topic,
            offset = ?record.offset,
            key = ?record.key,
            value = ?record.value,
            before = ?record.before,
            "emitted record #{}", self.emitted
        );
        Ok(())
    }
}
