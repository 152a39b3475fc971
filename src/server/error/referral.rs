use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use entity::sea_orm_active_enums::PackageRequestStatus;
use thiserror::Error;

use crate::{model::api::ErrorDto, server::error::InternalServerError};

#[derive(Error, Debug)]
pub enum ReferralError {
    #[error("Package request {request_id} was already processed with status {status:?}")]
    AlreadyProcessed {
        request_id: i32,
        status: PackageRequestStatus,
    },
    #[error("Package request {0} not found")]
    RequestNotFound(i32),
    #[error("Buyer with user ID {user_id} for package request {request_id} not found")]
    BuyerNotFound { request_id: i32, user_id: i32 },
    #[error("Package {0} not found")]
    PackageNotFound(i32),
    #[error("User {0:?} not found")]
    UserNotFound(String),
    #[error("Rank ladder has more than one rank requiring {required_points} points")]
    InvalidRankLadder { required_points: i64 },
    #[error("Package {package_id} is invalid: {reason}")]
    InvalidPackage { package_id: i32, reason: String },
    #[error("Invalid audit remediation: {0}")]
    InvalidRemediation(String),
}

impl ReferralError {
    fn respond(status: StatusCode, error: &ReferralError) -> Response {
        (
            status,
            Json(ErrorDto {
                error: error.to_string(),
            }),
        )
            .into_response()
    }
}

impl IntoResponse for ReferralError {
    fn into_response(self) -> Response {
        match self {
            Self::AlreadyProcessed { .. } => {
                tracing::debug!("{}", self);

                Self::respond(StatusCode::CONFLICT, &self)
            }
            Self::RequestNotFound(_)
            | Self::BuyerNotFound { .. }
            | Self::PackageNotFound(_)
            | Self::UserNotFound(_) => {
                tracing::debug!("{}", self);

                Self::respond(StatusCode::NOT_FOUND, &self)
            }
            Self::InvalidRemediation(_) => Self::respond(StatusCode::BAD_REQUEST, &self),
            Self::InvalidRankLadder { .. } | Self::InvalidPackage { .. } => {
                InternalServerError(self).into_response()
            }
        }
    }
}
