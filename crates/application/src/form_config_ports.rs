use async_trait::async_trait;
use chrono::{DateTime, Utc};
use formdesk_core::AppResult;
use formdesk_domain::{FormConfig, FormConfigDraft, FormConfigId, FormLink};

/// Offset window applied to a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Number of rows skipped.
    pub offset: usize,
    /// Maximum rows returned.
    pub limit: usize,
}

/// Query inputs for form configuration listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormConfigListQuery {
    /// Case-insensitive substring matched against name, title and form link.
    pub search: Option<String>,
    /// Window to return; `None` returns every match.
    pub window: Option<PageWindow>,
}

/// One page of form configurations, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfigPage {
    /// Records inside the requested window.
    pub items: Vec<FormConfig>,
    /// Number of records matching the search, ignoring the window.
    pub total: u64,
}

/// Repository port for form configuration persistence.
///
/// Mutating methods are single atomic read-modify-write operations against
/// one record.
#[async_trait]
pub trait FormConfigRepository: Send + Sync {
    /// Persists a new record.
    ///
    /// Returns `AppError::Conflict` when the form link is already taken.
    async fn insert_form_config(&self, form_config: FormConfig) -> AppResult<()>;

    /// Looks up a record by identifier.
    async fn find_form_config(&self, id: FormConfigId) -> AppResult<Option<FormConfig>>;

    /// Lists records matching the query ordered by creation time descending.
    async fn list_form_configs(&self, query: FormConfigListQuery) -> AppResult<FormConfigPage>;

    /// Replaces every mutable attribute of a record.
    ///
    /// Returns `AppError::NotFound` for unknown identifiers and
    /// `AppError::Conflict` when `expected_version` no longer matches.
    async fn replace_form_config(
        &self,
        id: FormConfigId,
        draft: FormConfigDraft,
        expected_version: Option<i64>,
        now: DateTime<Utc>,
    ) -> AppResult<FormConfig>;

    /// Flips the active flag of a record.
    async fn toggle_form_config_active(
        &self,
        id: FormConfigId,
        now: DateTime<Utc>,
    ) -> AppResult<FormConfig>;

    /// Hard-deletes a record.
    async fn delete_form_config(&self, id: FormConfigId) -> AppResult<()>;
}

/// Port producing candidate form links.
///
/// Candidates are not guaranteed to be unique; storage enforces uniqueness.
pub trait FormLinkGenerator: Send + Sync {
    /// Generates a fresh candidate link.
    fn generate(&self) -> AppResult<FormLink>;
}
