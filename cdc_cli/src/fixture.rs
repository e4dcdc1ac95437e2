use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use cdc_engine::event::Event;
use common::err::cdc_error::CdcError;

/// Reads a newline-delimited JSON file of `Event` values, one per line.
/// Blank lines are skipped.
pub fn load_fixture(path: impl AsRef<Path>) -> Result<Vec<Event>, CdcError> {
    let file = File::open(path)?;
    let mut events = Vec::new();

    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: Event = serde_json::from_str(&line)
            .map_err(|e| CdcError::EventDecodeError(format!("malformed fixture line: {e}")))?;
        events.push(event);
    }

    Ok(events)
}
