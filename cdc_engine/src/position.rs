use std::collections::HashMap;

use common::err::cdc_error::CdcError;
use serde::{Deserialize, Serialize};

/// The persisted partition identity: just the logical server name. Two
/// engines sharing a server name share a resumption point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Partition {
    pub server: String,
}

impl Partition {
    pub fn new(server: impl Into<String>) -> Self {
        Partition { server: server.into() }
    }

    /// Shape the runner persists this partition as: `{"server": "..."}`.
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::with_capacity(1);
        map.insert("server".to_string(), self.server.clone());
        map
    }
}

/// A resumable offset within one server's binlog stream: the file name,
/// the byte position of the event that produced a row, and the row's
/// 0-based index within that event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offset {
    pub file: String,
    pub pos: u64,
    pub row: u32,
}

impl Offset {
    pub fn new(file: impl Into<String>, pos: u64, row: u32) -> Self {
        Offset { file: file.into(), pos, row }
    }

    /// Shape the runner persists this offset as: `{"file", "pos", "row"}`.
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::with_capacity(3);
        map.insert("file".to_string(), self.file.clone());
        map.insert("pos".to_string(), self.pos.to_string());
        map.insert("row".to_string(), self.row.to_string());
        map
    }

    /// Rebuilds an `Offset` from the runner's persisted map. Missing
    /// `row` defaults to 0; `pos`/`row` may be encoded as strings or as
    /// numbers-as-strings — both parse the same way here since the map
    /// is string-valued. A missing `file` is fatal: there is nothing to
    /// resume from.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Offset, CdcError> {
        let file = map
            .get("file")
            .ok_or_else(|| CdcError::OffsetDecodeError("missing `file`".to_string()))?
            .clone();

        let pos = match map.get("pos") {
            Some(v) => v.parse::<u64>().map_err(|e| {
                CdcError::OffsetDecodeError(format!("invalid `pos`: {e}"))
            })?,
            None => return Err(CdcError::OffsetDecodeError("missing `pos`".to_string())),
        };

        let row = match map.get("row") {
            Some(v) => v
                .parse::<u32>()
                .map_err(|e| CdcError::OffsetDecodeError(format!("invalid `row`: {e}")))?,
            None => 0,
        };

        Ok(Offset::new(file, pos, row))
    }
}

/// The processor's mutable view of where it is in the stream. Advances
/// monotonically within a file; a ROTATE event swaps the file and resets
/// the position.
#[derive(Debug, Clone)]
pub struct SourcePosition {
    server_name: String,
    binlog_file: String,
    binlog_position: u64,
    row_in_event: u32,
}

impl SourcePosition {
    pub fn new(server_name: impl Into<String>, binlog_file: impl Into<String>, binlog_position: u64) -> Self {
        SourcePosition {
            server_name: server_name.into(),
            binlog_file: binlog_file.into(),
            binlog_position,
            row_in_event: 0,
        }
    }

    pub fn partition(&self) -> Partition {
        Partition::new(self.server_name.clone())
    }

    /// The offset for the row currently being processed.
    pub fn offset(&self) -> Offset {
        Offset::new(self.binlog_file.clone(), self.binlog_position, self.row_in_event)
    }

    pub fn set_row_in_event(&mut self, row: u32) {
        self.row_in_event = row;
    }

    pub fn rotate(&mut self, next_file: impl Into<String>, position: u64) {
        self.binlog_file = next_file.into();
        self.binlog_position = position;
        self.row_in_event = 0;
    }

    pub fn advance(&mut self, position: u64) {
        self.binlog_position = position;
        self.row_in_event = 0;
    }

    pub fn binlog_file(&self) -> &str {
        &self.binlog_file
    }

    pub fn binlog_position(&self) -> u64 {
        self.binlog_position
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn offset_round_trips_through_its_map() {
        let offset = Offset::new("bin.000003", 4521, 2);
        let map = offset.to_map();
        let back = Offset::from_map(&map).unwrap();
        assert_eq!(offset, back);
    }

    #[test]
    fn offset_defaults_missing_row_to_zero() {
        let mut map = HashMap::new();
        map.insert("file".to_string(), "bin.000001".to_string());
        map.insert("pos".to_string(), "4".to_string());
        let offset = Offset::from_map(&map).unwrap();
        assert_eq!(offset.row, 0);
    }

    #[test]
    fn offset_requires_file() {
        let mut map = HashMap::new();
        map.insert("pos".to_string(), "4".to_string());
        assert!(Offset::from_map(&map).is_err());
    }

    #[test]
    fn rotate_resets_row_and_position() {
        let mut pos = SourcePosition::new("s1", "bin.000001", 1200);
        pos.set_row_in_event(3);
        pos.rotate("bin.000002", 4);
        assert_eq!(pos.binlog_file(), "bin.000002");
        assert_eq!(pos.binlog_position(), 4);
        assert_eq!(pos.offset().row, 0);
    }
}
