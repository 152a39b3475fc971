//! Tests for the get_user_downline endpoint.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uplink::server::controller::user::get_user_downline;

use super::*;

/// Tests listing a downline.
///
/// Expected: 200 OK with members and level counts
#[tokio::test]
async fn returns_downline() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_referral_tables()
        .with_user("top", None)
        .with_user("kid", Some("top"))
        .build()
        .await?;

    let result =
        get_user_downline(State(test.into_app_state()), Path("top".to_string())).await;

    let resp = result.expect("downline should load").into_response();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["total_members"], 1);
    assert_eq!(body["members"][0]["username"], "kid");
    assert_eq!(body["level_counts"][0], 1);

    Ok(())
}

/// Tests an unknown username.
///
/// Expected: 404 NOT_FOUND
#[tokio::test]
async fn not_found_for_unknown_user() -> Result<(), TestError> {
    let test = test_setup_with_referral_tables!()?;

    let result =
        get_user_downline(State(test.into_app_state()), Path("nobody".to_string())).await;

    let resp = result.err().expect("downline should fail").into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}
