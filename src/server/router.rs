//! HTTP routing and OpenAPI documentation configuration.
//!
//! Every admin endpoint is registered here together with its utoipa path, and
//! Swagger UI serves the collected document at `/api/docs`.

use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{controller, model::app::AppState};

/// Builds the application's HTTP router with all API endpoints and Swagger UI documentation.
///
/// # Registered Endpoints
/// - `POST /api/package-requests/{id}/approve` - Approve a request and pay commissions
/// - `POST /api/package-requests/{id}/reject` - Reject a request
/// - `POST /api/audit` - Audit, and optionally repair, referral integrity
/// - `GET /api/users/{username}/downline` - List a user's downline
///
/// The OpenAPI document is available at `/api/docs/openapi.json`.
///
/// # Example
/// ```ignore
/// let app_state = AppState { db, referral: ReferralSettings::default() };
/// let router = routes().with_state(app_state);
/// ```
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(info(title = "uplink", description = "Referral commission engine admin API"), tags(
        (name = controller::package_request::PACKAGE_REQUEST_TAG, description = "Package request approval"),
        (name = controller::audit::AUDIT_TAG, description = "Referral integrity audits"),
        (name = controller::user::USER_TAG, description = "User referral analytics"),
    ))]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::package_request::approve_package_request))
        .routes(routes!(controller::package_request::reject_package_request))
        .routes(routes!(controller::audit::run_audit))
        .routes(routes!(controller::user::get_user_downline))
        .split_for_parts();

    routes.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}
