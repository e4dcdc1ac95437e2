pub mod cdc_error;

use crate::err::cdc_error::CdcError;

pub type CResult<T> = Result<T, CdcError>;
