//! Tests for the reject_package_request endpoint.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use entity::sea_orm_active_enums::PackageRequestStatus;
use rust_decimal::Decimal;
use uplink::server::controller::package_request::reject_package_request;

use super::*;

/// Tests rejecting a pending request.
///
/// Expected: 200 OK with status "rejected"
#[tokio::test]
async fn returns_rejected_request() -> Result<(), TestError> {
    let test = test_setup_with_referral_tables!()?;
    let buyer = test.user().insert_user("solo", None).await?;
    let package = test
        .package()
        .insert_package(Decimal::from(10), Decimal::from(5), 0)
        .await?;
    let request = test
        .package_request()
        .insert_request(buyer.id, package.id)
        .await?;

    let result =
        reject_package_request(State(test.into_app_state()), Path(request.id), None).await;

    let resp = result.expect("rejection should succeed").into_response();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["id"], request.id);

    Ok(())
}

/// Tests rejecting an already rejected request.
///
/// Expected: 409 CONFLICT
#[tokio::test]
async fn conflict_for_processed_request() -> Result<(), TestError> {
    let test = test_setup_with_referral_tables!()?;
    let buyer = test.user().insert_user("solo", None).await?;
    let package = test
        .package()
        .insert_package(Decimal::from(10), Decimal::from(5), 0)
        .await?;
    let request = test
        .package_request()
        .insert_request_with_status(buyer.id, package.id, PackageRequestStatus::Rejected)
        .await?;

    let result =
        reject_package_request(State(test.into_app_state()), Path(request.id), None).await;

    let resp = result.err().expect("rejection should fail").into_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    Ok(())
}
