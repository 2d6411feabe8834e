use formdesk_core::FieldViolation;
use serde::Serialize;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    errors: Option<Vec<FieldErrorResponse>>,
}

/// One failing input field.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/field-error-response.ts"
)]
pub struct FieldErrorResponse {
    field: String,
    message: String,
}

impl ErrorResponse {
    pub(super) fn new(message: String, violations: &[FieldViolation]) -> Self {
        Self {
            success: false,
            message,
            errors: (!violations.is_empty()).then(|| {
                violations
                    .iter()
                    .map(|violation| FieldErrorResponse {
                        field: violation.field.clone(),
                        message: violation.message.clone(),
                    })
                    .collect()
            }),
        }
    }
}
