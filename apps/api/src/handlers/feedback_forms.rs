use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use formdesk_domain::FormConfig;

use crate::dto::{
    DeleteFeedbackFormResponse, FeedbackFormListResponse, FeedbackFormResponse,
    FeedbackFormsQuery, SaveFeedbackFormRequest, SingleFeedbackFormResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

const DELETED_MESSAGE: &str = "Form configuration deleted successfully";

fn single(form_config: FormConfig) -> Json<SingleFeedbackFormResponse> {
    Json(SingleFeedbackFormResponse {
        success: true,
        data: FeedbackFormResponse::from(form_config),
    })
}

pub async fn list_feedback_forms_handler(
    State(state): State<AppState>,
    query: Result<Query<FeedbackFormsQuery>, QueryRejection>,
) -> ApiResult<Json<FeedbackFormListResponse>> {
    let Query(query) = query?;
    let listing = state.form_config_service.list(query.into()).await?;

    Ok(Json(FeedbackFormListResponse {
        success: true,
        total: listing.total,
        feedbacks: listing
            .items
            .into_iter()
            .map(FeedbackFormResponse::from)
            .collect(),
    }))
}

pub async fn create_feedback_form_handler(
    State(state): State<AppState>,
    payload: Result<Json<SaveFeedbackFormRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SingleFeedbackFormResponse>)> {
    let Json(payload) = payload?;
    // Creation has nothing to compare a version against.
    let (input, _) = payload.into_parts();
    let form_config = state.form_config_service.create(input).await?;

    Ok((StatusCode::CREATED, single(form_config)))
}

pub async fn get_feedback_form_handler(
    State(state): State<AppState>,
    Path(form_config_id): Path<String>,
) -> ApiResult<Json<SingleFeedbackFormResponse>> {
    let form_config = state
        .form_config_service
        .get(form_config_id.as_str())
        .await?;

    Ok(single(form_config))
}

pub async fn update_feedback_form_handler(
    State(state): State<AppState>,
    Path(form_config_id): Path<String>,
    payload: Result<Json<SaveFeedbackFormRequest>, JsonRejection>,
) -> ApiResult<Json<SingleFeedbackFormResponse>> {
    let Json(payload) = payload?;
    let (input, expected_version) = payload.into_parts();
    let form_config = state
        .form_config_service
        .update(form_config_id.as_str(), input, expected_version)
        .await?;

    Ok(single(form_config))
}

pub async fn toggle_feedback_form_active_handler(
    State(state): State<AppState>,
    Path(form_config_id): Path<String>,
) -> ApiResult<Json<SingleFeedbackFormResponse>> {
    let form_config = state
        .form_config_service
        .toggle_active(form_config_id.as_str())
        .await?;

    Ok(single(form_config))
}

pub async fn delete_feedback_form_handler(
    State(state): State<AppState>,
    Path(form_config_id): Path<String>,
) -> ApiResult<Json<DeleteFeedbackFormResponse>> {
    state
        .form_config_service
        .delete(form_config_id.as_str())
        .await?;

    Ok(Json(DeleteFeedbackFormResponse {
        success: true,
        message: DELETED_MESSAGE.to_owned(),
    }))
}
