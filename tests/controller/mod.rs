//! Tests for HTTP controller endpoints.
//!
//! Handlers are called directly with application state built from the test
//! database, checking status codes and response bodies.

mod audit;
mod package_request;
mod router;
mod user;

use axum::{body::Body, response::Response};
use http_body_util::BodyExt;
use uplink_test_utils::prelude::*;

use crate::util::TestContextExt;

/// Reads a response body as JSON.
async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();

    serde_json::from_slice(&bytes).expect("body should be JSON")
}
