use std::str::FromStr;

use formdesk_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Answer widget a respondent sees for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Free text answer.
    Text,
    /// Numeric answer.
    Number,
    /// Single choice.
    Select,
    /// Multiple choice.
    Multiselect,
}

impl QuestionType {
    /// Every accepted question type, in display order.
    pub const ALL: [Self; 4] = [Self::Text, Self::Number, Self::Select, Self::Multiselect];

    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
        }
    }
}

impl FromStr for QuestionType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "select" => Ok(Self::Select),
            "multiselect" => Ok(Self::Multiselect),
            _ => Err(AppError::Validation(format!(
                "unknown question type '{value}'"
            ))),
        }
    }
}

/// One free-form question on a feedback form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormQuestion {
    question: NonEmptyString,
    question_type: QuestionType,
}

impl FormQuestion {
    /// Creates a validated question.
    pub fn new(question: impl Into<String>, question_type: QuestionType) -> AppResult<Self> {
        Ok(Self {
            question: NonEmptyString::new(question)?,
            question_type,
        })
    }

    /// Returns the question prompt.
    #[must_use]
    pub fn question(&self) -> &NonEmptyString {
        &self.question
    }

    /// Returns the answer type.
    #[must_use]
    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }
}
