//! Error types for the uplink server.
//!
//! Errors are split by domain: configuration problems found at startup and referral
//! engine conflicts raised while processing package requests or audits. Everything
//! implements `IntoResponse` so controllers can return `Result<_, Error>` directly.
//!
//! Data-quality anomalies in the referral graph such as dangling referrers or cycles
//! never become an `Error`. They are reported as values on commission plans and audit
//! reports.

pub mod config;
pub mod referral;
pub mod retry;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{config::ConfigError, referral::ReferralError},
};

/// Main error type for the uplink server.
///
/// Aggregates the domain-specific error types and external library errors. `#[from]`
/// conversions let services propagate any of them with `?`.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Referral engine error (state conflicts, missing records, invalid input).
    #[error(transparent)]
    ReferralError(#[from] ReferralError),
    /// Internal error indicating a bug in uplink's code.
    #[error("Internal error with uplink's code, this indicates a bug: {0:?}")]
    InternalError(String),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
    /// I/O error (binding the HTTP listener, serving connections).
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Converts application errors into HTTP responses.
///
/// # Returns
/// - 400 Bad Request - Invalid audit remediation
/// - 404 Not Found - Missing package request, user or package
/// - 409 Conflict - Package request already approved or rejected
/// - 500 Internal Server Error - For all other errors (with error logging)
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::ReferralError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error and returns a generic message so database details never reach the client.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
