use chrono::{DateTime, SecondsFormat, Utc};
use formdesk_application::FormConfigListRequest;
use formdesk_domain::{FormConfig, FormConfigDraftInput, FormFields, FormQuestionInput};

use super::types::{
    FeedbackFormResponse, FeedbackFormsQuery, FormFieldsDto, FormQuestionDto,
    SaveFeedbackFormRequest,
};

impl SaveFeedbackFormRequest {
    /// Splits the payload into the draft input and the expected version.
    pub fn into_parts(self) -> (FormConfigDraftInput, Option<i64>) {
        let input = FormConfigDraftInput {
            name: self.name,
            title: self.title,
            audience_type: self.audience_type,
            assigned_for: self.assigned_for,
            fields: self.fields.map(FormFields::from),
            questions: self.questions.map(|questions| {
                questions
                    .into_iter()
                    .map(|question| FormQuestionInput {
                        question: question.question,
                        question_type: question.question_type,
                    })
                    .collect()
            }),
            active: self.active,
            is_default: self.is_default,
        };

        (input, self.version)
    }
}

impl From<FormFieldsDto> for FormFields {
    fn from(value: FormFieldsDto) -> Self {
        Self {
            name: value.name,
            mobile: value.mobile,
            email_id: value.email_id,
            age: value.age,
            active: value.active,
            default: value.default,
        }
    }
}

impl From<FormFields> for FormFieldsDto {
    fn from(value: FormFields) -> Self {
        Self {
            name: value.name,
            mobile: value.mobile,
            email_id: value.email_id,
            age: value.age,
            active: value.active,
            default: value.default,
        }
    }
}

impl From<FeedbackFormsQuery> for FormConfigListRequest {
    fn from(value: FeedbackFormsQuery) -> Self {
        Self {
            page: value.page.as_deref().and_then(parse_count),
            limit: value.limit.as_deref().and_then(parse_count),
            search: value.search,
            export: value
                .export
                .as_deref()
                .is_some_and(|flag| flag.eq_ignore_ascii_case("true")),
        }
    }
}

// Negative and non-numeric values count as absent.
fn parse_count(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<FormConfig> for FeedbackFormResponse {
    fn from(value: FormConfig) -> Self {
        let draft = value.draft();
        let created_at = timestamp(value.created_at());
        let updated_at = timestamp(value.updated_at());

        Self {
            id: value.id().to_string(),
            name: draft.name().as_str().to_owned(),
            title: draft.title().as_str().to_owned(),
            audience_type: draft.audience_type().as_str().to_owned(),
            assigned_for: draft
                .assigned_for()
                .iter()
                .map(|tag| tag.as_str().to_owned())
                .collect(),
            active: draft.active(),
            is_default: draft.is_default(),
            form_link: value.form_link().as_str().to_owned(),
            questions: draft
                .questions()
                .iter()
                .map(|question| FormQuestionDto {
                    question: Some(question.question().as_str().to_owned()),
                    question_type: Some(question.question_type().as_str().to_owned()),
                })
                .collect(),
            fields: draft.fields().into(),
            version: value.version(),
            created_date: created_at.clone(),
            modified_date: updated_at.clone(),
            created_at,
            updated_at,
        }
    }
}
