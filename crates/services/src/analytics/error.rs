use thiserror::Error;

use crate::dao::base::DaoError;

/// Failure taxonomy for the analytics engine.
///
/// `InvalidParameter` is a caller mistake and maps to a 4xx at the
/// transport layer. `Source` is an upstream storage fault and maps to a
/// 5xx with an opaque message; the full detail is logged where it occurs.
/// Data-integrity gaps in the rows themselves (unresolvable timestamps,
/// malformed telemetry JSON) never become errors — they degrade to the
/// documented defaults.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("{0}")]
    InvalidParameter(String),
    #[error("analytics source failure: {0}")]
    Source(String),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

impl From<DaoError> for AnalyticsError {
    fn from(err: DaoError) -> Self {
        AnalyticsError::Source(err.to_string())
    }
}
