use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use common::err::cdc_error::CdcError;

use super::{HistoryRecord, HistoryStore};

/// Newline-delimited JSON history, opened in append mode and `sync_all`'d
/// after every write — the durable-before-emit contract this lineage's
/// own relay-log storage follows, without that storage's segment-file
/// rotation machinery: one growing file is enough for a DDL history,
/// which is orders of magnitude smaller than a row-event log.
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileHistoryStore { path: path.into() }
    }
}

impl HistoryStore for FileHistoryStore {
    fn record(&mut self, record: HistoryRecord) -> Result<(), CdcError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let line = serde_json::to_string(&record)
            .map_err(|e| CdcError::HistoryWriteError(e.to_string()))?;
        writeln!(file, "{line}")?;
        file.sync_all()?;
        Ok(())
    }

    fn replay(&self, consumer: &mut dyn FnMut(&HistoryRecord)) -> Result<(), CdcError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: HistoryRecord = serde_json::from_str(&line)
                .map_err(|e| CdcError::HistoryWriteError(format!("corrupt history line: {e}")))?;
            consumer(&record);
        }
        Ok(())
    }
}
