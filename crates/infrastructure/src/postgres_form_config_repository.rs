use async_trait::async_trait;
use chrono::{DateTime, Utc};
use formdesk_application::{FormConfigListQuery, FormConfigPage, FormConfigRepository};
use formdesk_core::{AppError, AppResult};
use formdesk_domain::{
    FormConfig, FormConfigDraft, FormConfigDraftInput, FormConfigId, FormFields, FormLink,
    FormQuestionInput,
};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

/// PostgreSQL-backed repository for feedback form configurations.
#[derive(Clone)]
pub struct PostgresFormConfigRepository {
    pool: PgPool,
}

impl PostgresFormConfigRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const FORM_CONFIG_COLUMNS: &str = r#"
    id,
    name,
    title,
    audience_type,
    assigned_for,
    active,
    is_default,
    form_link,
    questions,
    fields,
    version,
    created_at,
    updated_at
"#;

#[derive(Debug, FromRow)]
struct FormConfigRow {
    id: Uuid,
    name: String,
    title: String,
    audience_type: String,
    assigned_for: Json<Vec<String>>,
    active: bool,
    is_default: bool,
    form_link: String,
    questions: Json<Vec<FormQuestionDocument>>,
    fields: Json<FormFieldsDocument>,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FormQuestionDocument {
    question: String,
    #[serde(rename = "type")]
    question_type: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
struct FormFieldsDocument {
    name: bool,
    mobile: bool,
    email_id: bool,
    age: bool,
    active: bool,
    default: bool,
}

impl From<FormFields> for FormFieldsDocument {
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

impl From<FormFieldsDocument> for FormFields {
    fn from(value: FormFieldsDocument) -> Self {
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

#[derive(Debug, FromRow)]
struct VersionRow {
    version: i64,
}

#[derive(Debug, FromRow)]
struct CountRow {
    total: i64,
}

fn question_documents(draft: &FormConfigDraft) -> Json<Vec<FormQuestionDocument>> {
    Json(
        draft
            .questions()
            .iter()
            .map(|question| FormQuestionDocument {
                question: question.question().as_str().to_owned(),
                question_type: question.question_type().as_str().to_owned(),
            })
            .collect(),
    )
}

fn assigned_for_document(draft: &FormConfigDraft) -> Json<Vec<String>> {
    Json(
        draft
            .assigned_for()
            .iter()
            .map(|tag| tag.as_str().to_owned())
            .collect(),
    )
}

// Stored rows pass back through domain validation; a row that fails it is
// reported as an internal error rather than served.
fn form_config_from_row(row: FormConfigRow) -> AppResult<FormConfig> {
    let id = FormConfigId::from_uuid(row.id);
    let decode_error = |error: AppError| {
        warn!(form_config_id = %id, %error, "stored form configuration failed validation");
        AppError::Internal(format!("stored form configuration '{id}' is invalid: {error}"))
    };

    let draft = FormConfigDraft::new(FormConfigDraftInput {
        name: Some(row.name),
        title: Some(row.title),
        audience_type: Some(row.audience_type),
        assigned_for: Some(row.assigned_for.0),
        fields: Some(row.fields.0.into()),
        questions: Some(
            row.questions
                .0
                .into_iter()
                .map(|document| FormQuestionInput {
                    question: Some(document.question),
                    question_type: Some(document.question_type),
                })
                .collect(),
        ),
        active: Some(row.active),
        is_default: Some(row.is_default),
    })
    .map_err(decode_error)?;
    let form_link = FormLink::new(row.form_link).map_err(decode_error)?;

    FormConfig::restore(
        id,
        form_link,
        draft,
        row.version,
        row.created_at,
        row.updated_at,
    )
    .map_err(decode_error)
}

// Windows past the end of any table hold no rows, so clamping keeps the result.
fn saturating_bigint(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Database(database_error) if database_error.code().as_deref() == Some("23505")
    )
}

impl PostgresFormConfigRepository {
    async fn current_version(&self, id: FormConfigId) -> AppResult<Option<i64>> {
        sqlx::query_as::<_, VersionRow>(
            r#"
            SELECT version
            FROM form_configs
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(|value| value.version))
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to read version of form configuration '{id}': {error}"
            ))
        })
    }
}

#[async_trait]
impl FormConfigRepository for PostgresFormConfigRepository {
    async fn insert_form_config(&self, form_config: FormConfig) -> AppResult<()> {
        let draft = form_config.draft();

        let result = sqlx::query(
            r#"
            INSERT INTO form_configs (
                id,
                name,
                title,
                audience_type,
                assigned_for,
                active,
                is_default,
                form_link,
                questions,
                fields,
                version,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(form_config.id().as_uuid())
        .bind(draft.name().as_str())
        .bind(draft.title().as_str())
        .bind(draft.audience_type().as_str())
        .bind(assigned_for_document(draft))
        .bind(draft.active())
        .bind(draft.is_default())
        .bind(form_config.form_link().as_str())
        .bind(question_documents(draft))
        .bind(Json(FormFieldsDocument::from(draft.fields())))
        .bind(form_config.version())
        .bind(form_config.created_at())
        .bind(form_config.updated_at())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(error) if is_unique_violation(&error) => Err(AppError::Conflict(format!(
                "form link '{}' is already in use",
                form_config.form_link()
            ))),
            Err(error) => Err(AppError::Internal(format!(
                "failed to insert form configuration '{}': {error}",
                form_config.id()
            ))),
        }
    }

    async fn find_form_config(&self, id: FormConfigId) -> AppResult<Option<FormConfig>> {
        let row = sqlx::query_as::<_, FormConfigRow>(&format!(
            r#"
            SELECT {FORM_CONFIG_COLUMNS}
            FROM form_configs
            WHERE id = $1
            "#
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find form configuration '{id}': {error}"
            ))
        })?;

        row.map(form_config_from_row).transpose()
    }

    async fn list_form_configs(&self, query: FormConfigListQuery) -> AppResult<FormConfigPage> {
        let (limit, offset) = match query.window {
            Some(window) => (
                Some(saturating_bigint(window.limit)),
                Some(saturating_bigint(window.offset)),
            ),
            None => (None, None),
        };
        let search = query.search.as_deref();

        let count = sqlx::query_as::<_, CountRow>(
            r#"
            SELECT COUNT(*) AS total
            FROM form_configs
            WHERE $1::TEXT IS NULL
                OR POSITION(LOWER($1) IN LOWER(name)) > 0
                OR POSITION(LOWER($1) IN LOWER(title)) > 0
                OR POSITION(LOWER($1) IN LOWER(form_link)) > 0
            "#,
        )
        .bind(search)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to count form configurations: {error}"))
        })?;

        // LIMIT NULL and OFFSET NULL behave as if omitted.
        let rows = sqlx::query_as::<_, FormConfigRow>(&format!(
            r#"
            SELECT {FORM_CONFIG_COLUMNS}
            FROM form_configs
            WHERE $1::TEXT IS NULL
                OR POSITION(LOWER($1) IN LOWER(name)) > 0
                OR POSITION(LOWER($1) IN LOWER(title)) > 0
                OR POSITION(LOWER($1) IN LOWER(form_link)) > 0
            ORDER BY created_at DESC, insert_sequence DESC
            LIMIT $2
            OFFSET $3
            "#
        ))
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list form configurations: {error}"))
        })?;

        let items = rows
            .into_iter()
            .map(form_config_from_row)
            .collect::<AppResult<Vec<_>>>()?;
        let total = u64::try_from(count.total).map_err(|error| {
            AppError::Internal(format!("form configuration count is negative: {error}"))
        })?;

        Ok(FormConfigPage { items, total })
    }

    async fn replace_form_config(
        &self,
        id: FormConfigId,
        draft: FormConfigDraft,
        expected_version: Option<i64>,
        now: DateTime<Utc>,
    ) -> AppResult<FormConfig> {
        let row = sqlx::query_as::<_, FormConfigRow>(&format!(
            r#"
            UPDATE form_configs
            SET
                name = $2,
                title = $3,
                audience_type = $4,
                assigned_for = $5,
                active = $6,
                is_default = $7,
                questions = $8,
                fields = $9,
                version = version + 1,
                updated_at = GREATEST(updated_at, $10)
            WHERE id = $1
                AND ($11::BIGINT IS NULL OR version = $11)
            RETURNING {FORM_CONFIG_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(draft.name().as_str())
        .bind(draft.title().as_str())
        .bind(draft.audience_type().as_str())
        .bind(assigned_for_document(&draft))
        .bind(draft.active())
        .bind(draft.is_default())
        .bind(question_documents(&draft))
        .bind(Json(FormFieldsDocument::from(draft.fields())))
        .bind(now)
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update form configuration '{id}': {error}"
            ))
        })?;

        if let Some(row) = row {
            return form_config_from_row(row);
        }

        match self.current_version(id).await? {
            Some(version) => Err(AppError::Conflict(format!(
                "form configuration '{id}' is at version {version} but version {} was expected",
                expected_version.unwrap_or(version)
            ))),
            None => Err(AppError::NotFound(format!(
                "form configuration '{id}' does not exist"
            ))),
        }
    }

    async fn toggle_form_config_active(
        &self,
        id: FormConfigId,
        now: DateTime<Utc>,
    ) -> AppResult<FormConfig> {
        let row = sqlx::query_as::<_, FormConfigRow>(&format!(
            r#"
            UPDATE form_configs
            SET
                active = NOT active,
                version = version + 1,
                updated_at = GREATEST(updated_at, $2)
            WHERE id = $1
            RETURNING {FORM_CONFIG_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to toggle form configuration '{id}': {error}"
            ))
        })?;

        row.map(form_config_from_row).transpose()?.ok_or_else(|| {
            AppError::NotFound(format!("form configuration '{id}' does not exist"))
        })
    }

    async fn delete_form_config(&self, id: FormConfigId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM form_configs
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to delete form configuration '{id}': {error}"
            ))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "form configuration '{id}' does not exist"
            )));
        }

        Ok(())
    }
}
