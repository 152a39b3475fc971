//! HTTP controller endpoints for the uplink admin API.
//!
//! Controllers extract request parameters, call the services and convert their results
//! into the DTOs in [`crate::model`]. They carry no business logic of their own.

pub mod audit;
pub mod package_request;
pub mod user;
