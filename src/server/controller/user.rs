use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        user::{DownlineDto, DownlineMemberDto},
    },
    server::{error::Error, model::app::AppState, service::downline::DownlineService},
};

pub static USER_TAG: &str = "user";

/// Get every direct and indirect referral of a user
#[utoipa::path(
    get,
    path = "/api/users/{username}/downline",
    tag = USER_TAG,
    params(("username" = String, Path, description = "Username whose downline to list")),
    responses(
        (status = 200, description = "Downline ordered by depth", body = DownlineDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user_downline(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let report = DownlineService::new(&state.db)
        .get_downline(&username)
        .await?;

    let downline = DownlineDto {
        username: report.username,
        total_members: report.total_members,
        level_counts: report.level_counts,
        members: report
            .members
            .into_iter()
            .map(|member| DownlineMemberDto {
                username: member.username,
                depth: member.depth,
                rank_id: member.rank_id,
            })
            .collect(),
        cycle_detected: report.cycle_detected,
    };

    Ok((StatusCode::OK, Json(downline)))
}
