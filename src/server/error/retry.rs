use sea_orm::DbErr;

use super::Error;

/// Strategy for handling errors in a retry context
pub enum ErrorRetryStrategy {
    /// Retry with exponential backoff (transient database faults)
    Retry,
    /// Failed permanently
    Fail,
}

impl Error {
    /// Determine error retry strategy based upon application Error type
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Self::DbErr(db_err) => {
                match db_err {
                    // Connection acquisition errors - pool exhausted or database restarting
                    DbErr::ConnectionAcquire(_) => ErrorRetryStrategy::Retry,
                    // Connection errors - dropped connection mid-transaction
                    DbErr::Conn(_) => ErrorRetryStrategy::Retry,

                    // Query, constraint and conversion errors won't resolve with a retry
                    _ => ErrorRetryStrategy::Fail,
                }
            }

            // Conflicts and missing records are answers, not faults
            Self::ReferralError(_) => ErrorRetryStrategy::Fail,

            Self::ConfigError(_) => ErrorRetryStrategy::Fail,
            Self::InternalError(_) => ErrorRetryStrategy::Fail,
            Self::SchedulerError(_) => ErrorRetryStrategy::Fail,
            Self::IoError(_) => ErrorRetryStrategy::Fail,
        }
    }
}
