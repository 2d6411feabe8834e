use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for feedback form create and update.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-feedback-form-request.ts"
)]
pub struct SaveFeedbackFormRequest {
    #[serde(rename = "feedbackName", alias = "name")]
    pub name: Option<String>,
    #[serde(rename = "feedbackTitle", alias = "title")]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub audience_type: Option<String>,
    pub assigned_for: Option<Vec<String>>,
    pub fields: Option<FormFieldsDto>,
    pub questions: Option<Vec<FormQuestionDto>>,
    pub active: Option<bool>,
    pub is_default: Option<bool>,
    /// Version the caller last read; the update is rejected if it moved on.
    pub version: Option<i64>,
}

/// Respondent identity inputs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/form-fields-dto.ts"
)]
pub struct FormFieldsDto {
    pub name: bool,
    pub mobile: bool,
    pub email_id: bool,
    pub age: bool,
    pub active: bool,
    pub default: bool,
}

/// One question as sent and returned by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/form-question-dto.ts"
)]
pub struct FormQuestionDto {
    pub question: Option<String>,
    #[serde(rename = "type")]
    pub question_type: Option<String>,
}

/// Raw listing query string.
///
/// Values stay strings so malformed numbers fall back to defaults instead of
/// rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct FeedbackFormsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub export: Option<String>,
}

/// API representation of a stored feedback form configuration.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/feedback-form-response.ts"
)]
pub struct FeedbackFormResponse {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub audience_type: String,
    pub assigned_for: Vec<String>,
    pub active: bool,
    pub is_default: bool,
    pub form_link: String,
    pub questions: Vec<FormQuestionDto>,
    pub fields: FormFieldsDto,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
    pub created_date: String,
    pub modified_date: String,
}

/// Envelope for one feedback form.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/single-feedback-form-response.ts"
)]
pub struct SingleFeedbackFormResponse {
    pub success: bool,
    pub data: FeedbackFormResponse,
}

/// Envelope for a page or export of feedback forms.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/feedback-form-list-response.ts"
)]
pub struct FeedbackFormListResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub total: Option<u64>,
    pub feedbacks: Vec<FeedbackFormResponse>,
}

/// Envelope for a completed delete.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/delete-feedback-form-response.ts"
)]
pub struct DeleteFeedbackFormResponse {
    pub success: bool,
    pub message: String,
}
