use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use formdesk_core::{AppError, AppResult, FieldViolation, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form_link::FormLink;
use crate::question::{FormQuestion, QuestionType};

/// Unique identifier for a form configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormConfigId(Uuid);

impl FormConfigId {
    /// Creates a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for FormConfigId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for FormConfigId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for FormConfigId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid form id '{value}': {error}")))
    }
}

/// Organisational level a form is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudienceType {
    /// Assigned to branches.
    Branch,
    /// Assigned to departments.
    Department,
    /// Assigned to divisions.
    Division,
}

impl AudienceType {
    /// Every accepted audience type, in display order.
    pub const ALL: [Self; 3] = [Self::Branch, Self::Department, Self::Division];

    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Branch => "branch",
            Self::Department => "department",
            Self::Division => "division",
        }
    }
}

impl FromStr for AudienceType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "branch" => Ok(Self::Branch),
            "department" => Ok(Self::Department),
            "division" => Ok(Self::Division),
            _ => Err(AppError::Validation(format!(
                "unknown audience type '{value}'"
            ))),
        }
    }
}

/// Respondent identity inputs collected by the rendered form.
///
/// `active` and `default` duplicate the record level flags. They are kept for
/// older clients and are never read by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    /// Collect the respondent name.
    pub name: bool,
    /// Collect a mobile number.
    pub mobile: bool,
    /// Collect an email address.
    pub email_id: bool,
    /// Collect the respondent age.
    pub age: bool,
    /// Legacy copy of the active flag.
    pub active: bool,
    /// Legacy copy of the default flag.
    pub default: bool,
}

/// Unvalidated question as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormQuestionInput {
    /// Question prompt.
    pub question: Option<String>,
    /// Question type storage value.
    pub question_type: Option<String>,
}

/// Input payload used to construct a validated form configuration draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormConfigDraftInput {
    /// Internal form name.
    pub name: Option<String>,
    /// Title shown to respondents.
    pub title: Option<String>,
    /// Audience type storage value.
    pub audience_type: Option<String>,
    /// Audience tags.
    pub assigned_for: Option<Vec<String>>,
    /// Identity inputs; absent means every flag is off.
    pub fields: Option<FormFields>,
    /// Questions; absent means none.
    pub questions: Option<Vec<FormQuestionInput>>,
    /// Absent means false.
    pub active: Option<bool>,
    /// Absent means false.
    pub is_default: Option<bool>,
}

/// Every mutable attribute of a form configuration, validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormConfigDraft {
    name: NonEmptyString,
    title: NonEmptyString,
    audience_type: AudienceType,
    assigned_for: Vec<NonEmptyString>,
    fields: FormFields,
    questions: Vec<FormQuestion>,
    active: bool,
    is_default: bool,
}

impl FormConfigDraft {
    /// Validates a draft, reporting every failing field at once.
    pub fn new(input: FormConfigDraftInput) -> AppResult<Self> {
        let FormConfigDraftInput {
            name,
            title,
            audience_type,
            assigned_for,
            fields,
            questions,
            active,
            is_default,
        } = input;

        let mut violations = Vec::new();

        let name = required_text(name, "name", "Feedback name is required", &mut violations);
        let title = required_text(title, "title", "Feedback title is required", &mut violations);
        let audience_type = parse_audience_type(audience_type, &mut violations);
        let assigned_for = parse_assigned_for(assigned_for, &mut violations);
        let questions = parse_questions(questions.unwrap_or_default(), &mut violations);

        match (name, title, audience_type, assigned_for) {
            (Some(name), Some(title), Some(audience_type), Some(assigned_for))
                if violations.is_empty() =>
            {
                Ok(Self {
                    name,
                    title,
                    audience_type,
                    assigned_for,
                    fields: fields.unwrap_or_default(),
                    questions,
                    active: active.unwrap_or(false),
                    is_default: is_default.unwrap_or(false),
                })
            }
            _ => Err(AppError::InvalidFields(violations)),
        }
    }

    /// Returns the internal form name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the respondent-facing title.
    #[must_use]
    pub fn title(&self) -> &NonEmptyString {
        &self.title
    }

    /// Returns the audience type.
    #[must_use]
    pub fn audience_type(&self) -> AudienceType {
        self.audience_type
    }

    /// Returns the audience tags in caller order.
    #[must_use]
    pub fn assigned_for(&self) -> &[NonEmptyString] {
        &self.assigned_for
    }

    /// Returns the identity input flags.
    #[must_use]
    pub fn fields(&self) -> FormFields {
        self.fields
    }

    /// Returns the questions in caller order.
    #[must_use]
    pub fn questions(&self) -> &[FormQuestion] {
        &self.questions
    }

    /// Returns whether the form is served to respondents.
    #[must_use]
    pub fn active(&self) -> bool {
        self.active
    }

    /// Returns whether the form is the default one.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.is_default
    }
}

fn required_text(
    value: Option<String>,
    field: &str,
    message: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<NonEmptyString> {
    let parsed = value.and_then(|value| NonEmptyString::new(value).ok());
    if parsed.is_none() {
        violations.push(FieldViolation::new(field, message));
    }

    parsed
}

fn parse_audience_type(
    value: Option<String>,
    violations: &mut Vec<FieldViolation>,
) -> Option<AudienceType> {
    let Some(value) = value.filter(|value| !value.trim().is_empty()) else {
        violations.push(FieldViolation::new("type", "Type is required"));
        return None;
    };

    match AudienceType::from_str(value.trim()) {
        Ok(audience_type) => Some(audience_type),
        Err(_) => {
            violations.push(FieldViolation::new(
                "type",
                format!(
                    "'{value}' is not a valid type; expected one of {}",
                    expected_values(AudienceType::ALL.iter().map(AudienceType::as_str))
                ),
            ));
            None
        }
    }
}

fn parse_assigned_for(
    value: Option<Vec<String>>,
    violations: &mut Vec<FieldViolation>,
) -> Option<Vec<NonEmptyString>> {
    let values = value.unwrap_or_default();
    if values.is_empty() {
        violations.push(FieldViolation::new(
            "assignedFor",
            "At least one assignment is required",
        ));
        return None;
    }

    let mut tags = Vec::with_capacity(values.len());
    let mut valid = true;
    for (index, value) in values.into_iter().enumerate() {
        match NonEmptyString::new(value) {
            Ok(tag) => tags.push(tag),
            Err(_) => {
                valid = false;
                violations.push(FieldViolation::new(
                    format!("assignedFor[{index}]"),
                    "Assignment must not be blank",
                ));
            }
        }
    }

    valid.then_some(tags)
}

fn parse_questions(
    inputs: Vec<FormQuestionInput>,
    violations: &mut Vec<FieldViolation>,
) -> Vec<FormQuestion> {
    let mut questions = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.into_iter().enumerate() {
        let prompt = input
            .question
            .and_then(|value| NonEmptyString::new(value).ok());
        if prompt.is_none() {
            violations.push(FieldViolation::new(
                format!("questions[{index}].question"),
                "Question text is required",
            ));
        }

        let question_type = match input
            .question_type
            .filter(|value| !value.trim().is_empty())
        {
            None => {
                violations.push(FieldViolation::new(
                    format!("questions[{index}].type"),
                    "Question type is required",
                ));
                None
            }
            Some(value) => match QuestionType::from_str(value.trim()) {
                Ok(question_type) => Some(question_type),
                Err(_) => {
                    violations.push(FieldViolation::new(
                        format!("questions[{index}].type"),
                        format!(
                            "'{value}' is not a valid question type; expected one of {}",
                            expected_values(QuestionType::ALL.iter().map(QuestionType::as_str))
                        ),
                    ));
                    None
                }
            },
        };

        if let (Some(prompt), Some(question_type)) = (prompt, question_type)
            && let Ok(question) = FormQuestion::new(prompt, question_type)
        {
            questions.push(question);
        }
    }

    questions
}

fn expected_values<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(", ")
}

/// Persisted feedback form configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormConfig {
    id: FormConfigId,
    form_link: FormLink,
    draft: FormConfigDraft,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FormConfig {
    /// Creates a brand new record at version 1.
    #[must_use]
    pub fn create(
        id: FormConfigId,
        form_link: FormLink,
        draft: FormConfigDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            form_link,
            draft,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a record loaded from storage.
    pub fn restore(
        id: FormConfigId,
        form_link: FormLink,
        draft: FormConfigDraft,
        version: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        if version < 1 {
            return Err(AppError::Validation(format!(
                "form configuration '{id}' has invalid version {version}"
            )));
        }

        if updated_at < created_at {
            return Err(AppError::Validation(format!(
                "form configuration '{id}' was updated before it was created"
            )));
        }

        Ok(Self {
            id,
            form_link,
            draft,
            version,
            created_at,
            updated_at,
        })
    }

    /// Replaces every mutable attribute.
    pub fn replace_draft(&mut self, draft: FormConfigDraft, now: DateTime<Utc>) {
        self.draft = draft;
        self.touch(now);
    }

    /// Flips the active flag.
    pub fn toggle_active(&mut self, now: DateTime<Utc>) {
        self.draft.active = !self.draft.active;
        self.touch(now);
    }

    // updated_at never moves backwards, even if the wall clock does.
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = self.updated_at.max(now);
        self.version += 1;
    }

    /// Returns the immutable identifier.
    #[must_use]
    pub fn id(&self) -> FormConfigId {
        self.id
    }

    /// Returns the public link token.
    #[must_use]
    pub fn form_link(&self) -> &FormLink {
        &self.form_link
    }

    /// Returns the mutable attributes.
    #[must_use]
    pub fn draft(&self) -> &FormConfigDraft {
        &self.draft
    }

    /// Returns the internal form name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        self.draft.name()
    }

    /// Returns the respondent-facing title.
    #[must_use]
    pub fn title(&self) -> &NonEmptyString {
        self.draft.title()
    }

    /// Returns whether the form is served to respondents.
    #[must_use]
    pub fn active(&self) -> bool {
        self.draft.active()
    }

    /// Returns the optimistic concurrency version.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether `term` occurs in the name, title or link, ignoring case.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        [
            self.draft.name().as_str(),
            self.draft.title().as_str(),
            self.form_link.as_str(),
        ]
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(needle.as_str()))
    }
}
