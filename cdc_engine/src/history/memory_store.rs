use common::err::cdc_error::CdcError;

use super::{HistoryRecord, HistoryStore};

/// In-memory history, for tests — no I/O, no durability.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    records: Vec<HistoryRecord>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        MemoryHistoryStore::default()
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn record(&mut self, record: HistoryRecord) -> Result<(), CdcError> {
        self.records.push(record);
        Ok(())
    }

    fn replay(&self, consumer: &mut dyn FnMut(&HistoryRecord)) -> Result<(), CdcError> {
        for record in &self.records {
            consumer(record);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::history::sample_record;

    #[test]
    fn records_accumulate_in_order() {
        let mut store = MemoryHistoryStore::new();
        store.record(sample_record("CREATE TABLE t1 (id INT)")).unwrap();
        store.record(sample_record("DROP TABLE t1")).unwrap();
        assert_eq!(store.records().len(), 2);
    }
}
