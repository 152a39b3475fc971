//! Request and response bodies of the HTTP API.

pub mod api;
pub mod audit;
pub mod package_request;
pub mod user;
