//! Tests for the assembled HTTP router.

use axum::http::{Method, Request, StatusCode};
use rust_decimal::Decimal;
use tower::ServiceExt;
use uplink::server::router::routes;

use super::*;

/// Tests approving through the router without a body.
///
/// Verifies that the path parameter reaches the handler and a bodyless POST is
/// accepted.
///
/// Expected: 200 OK
#[tokio::test]
async fn approves_through_router() -> Result<(), TestError> {
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
    let app = routes().with_state(test.into_app_state());

    let resp = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(format!("/api/package-requests/{}/approve", request.id))
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

/// Tests serving the OpenAPI document.
///
/// Expected: 200 OK listing the audit path
#[tokio::test]
async fn serves_openapi_document() -> Result<(), TestError> {
    let test = test_setup_with_referral_tables!()?;
    let app = routes().with_state(test.into_app_state());

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/docs/openapi.json")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert!(body["paths"]["/api/audit"].is_object());

    Ok(())
}
