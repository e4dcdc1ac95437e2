use std::fmt;
use std::io;
use std::num::ParseIntError;

/// Errors that abort the processing loop. Recoverable conditions (an
/// unparsable DDL statement, a row event for an unknown table) are logged
/// at the point of detection and never become a `CdcError` — see the
/// failure-semantics notes on `EventProcessor`.
#[derive(Debug)]
pub enum CdcError {
    /// The source emitted an event the core could not decode.
    EventDecodeError(String),
    /// The sink rejected or failed to accept a record.
    SinkError(String),
    /// The history store failed to durably append a record.
    HistoryWriteError(String),
    /// A persisted offset could not be parsed back into a SourcePosition.
    OffsetDecodeError(String),
    /// Configuration failed to load or did not pass validation.
    ConfigError(String),
    Io(io::Error),
    ParseIntError(ParseIntError),
    /// Catch-all for conditions that don't yet warrant their own variant.
    Other(String),
}

impl fmt::Display for CdcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CdcError::EventDecodeError(msg) => write!(f, "event decode error: {msg}"),
            CdcError::SinkError(msg) => write!(f, "sink error: {msg}"),
            CdcError::HistoryWriteError(msg) => write!(f, "history write error: {msg}"),
            CdcError::OffsetDecodeError(msg) => write!(f, "offset decode error: {msg}"),
            CdcError::ConfigError(msg) => write!(f, "config error: {msg}"),
            CdcError::Io(err) => write!(f, "io error: {err}"),
            CdcError::ParseIntError(err) => write!(f, "parse int error: {err}"),
            CdcError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CdcError {}

impl From<io::Error> for CdcError {
    fn from(err: io::Error) -> Self {
        CdcError::Io(err)
    }
}

impl From<ParseIntError> for CdcError {
    fn from(err: ParseIntError) -> Self {
        CdcError::ParseIntError(err)
    }
}

impl From<serde_json::Error> for CdcError {
    fn from(err: serde_json::Error) -> Self {
        CdcError::EventDecodeError(err.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn displays_are_non_empty_and_stable() {
        let cases = vec![
            CdcError::EventDecodeError("bad bytes".into()),
            CdcError::SinkError("closed".into()),
            CdcError::HistoryWriteError("disk full".into()),
            CdcError::OffsetDecodeError("missing file".into()),
            CdcError::ConfigError("bad toml".into()),
            CdcError::Other("generic".into()),
        ];
        for case in cases {
            assert!(!case.to_string().is_empty());
        }
    }
}
