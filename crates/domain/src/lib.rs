//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod form_config;
mod form_link;
mod question;

pub use form_config::{
    AudienceType, FormConfig, FormConfigDraft, FormConfigDraftInput, FormConfigId, FormFields,
    FormQuestionInput,
};
pub use form_link::{FORM_LINK_ALPHABET, FORM_LINK_PREFIX, FORM_LINK_TOKEN_LENGTH, FormLink};
pub use question::{FormQuestion, QuestionType};
