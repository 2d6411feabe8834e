use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use formdesk_application::{FormConfigListQuery, FormConfigPage, FormConfigRepository};
use formdesk_core::{AppError, AppResult};
use formdesk_domain::{FormConfig, FormConfigDraft, FormConfigId};
use tokio::sync::RwLock;

/// In-memory form configuration repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryFormConfigRepository {
    state: RwLock<InMemoryState>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    records: HashMap<FormConfigId, StoredFormConfig>,
    links: HashMap<String, FormConfigId>,
    next_sequence: u64,
}

// Sequence breaks created_at ties in favour of the later insert.
#[derive(Debug, Clone)]
struct StoredFormConfig {
    sequence: u64,
    record: FormConfig,
}

impl InMemoryFormConfigRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl InMemoryState {
    fn record_mut(&mut self, id: FormConfigId) -> AppResult<&mut FormConfig> {
        self.records
            .get_mut(&id)
            .map(|stored| &mut stored.record)
            .ok_or_else(|| AppError::NotFound(format!("form configuration '{id}' does not exist")))
    }
}

#[async_trait]
impl FormConfigRepository for InMemoryFormConfigRepository {
    async fn insert_form_config(&self, form_config: FormConfig) -> AppResult<()> {
        let mut state = self.state.write().await;
        let link = form_config.form_link().as_str().to_owned();

        if state.links.contains_key(&link) {
            return Err(AppError::Conflict(format!(
                "form link '{link}' is already in use"
            )));
        }

        if state.records.contains_key(&form_config.id()) {
            return Err(AppError::Conflict(format!(
                "form configuration '{}' already exists",
                form_config.id()
            )));
        }

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.links.insert(link, form_config.id());
        state.records.insert(
            form_config.id(),
            StoredFormConfig {
                sequence,
                record: form_config,
            },
        );

        Ok(())
    }

    async fn find_form_config(&self, id: FormConfigId) -> AppResult<Option<FormConfig>> {
        Ok(self
            .state
            .read()
            .await
            .records
            .get(&id)
            .map(|stored| stored.record.clone()))
    }

    async fn list_form_configs(&self, query: FormConfigListQuery) -> AppResult<FormConfigPage> {
        let state = self.state.read().await;

        let mut matching: Vec<&StoredFormConfig> = state
            .records
            .values()
            .filter(|stored| {
                query
                    .search
                    .as_deref()
                    .is_none_or(|term| stored.record.matches_search(term))
            })
            .collect();
        matching.sort_by_key(|stored| Reverse((stored.record.created_at(), stored.sequence)));

        let total = u64::try_from(matching.len()).map_err(|error| {
            AppError::Internal(format!("form configuration count overflowed: {error}"))
        })?;

        let items = match query.window {
            Some(window) => matching
                .into_iter()
                .skip(window.offset)
                .take(window.limit)
                .map(|stored| stored.record.clone())
                .collect(),
            None => matching
                .into_iter()
                .map(|stored| stored.record.clone())
                .collect(),
        };

        Ok(FormConfigPage { items, total })
    }

    async fn replace_form_config(
        &self,
        id: FormConfigId,
        draft: FormConfigDraft,
        expected_version: Option<i64>,
        now: DateTime<Utc>,
    ) -> AppResult<FormConfig> {
        let mut state = self.state.write().await;
        let record = state.record_mut(id)?;

        if let Some(expected_version) = expected_version
            && expected_version != record.version()
        {
            return Err(AppError::Conflict(format!(
                "form configuration '{id}' is at version {} but version {expected_version} was expected",
                record.version()
            )));
        }

        record.replace_draft(draft, now);
        Ok(record.clone())
    }

    async fn toggle_form_config_active(
        &self,
        id: FormConfigId,
        now: DateTime<Utc>,
    ) -> AppResult<FormConfig> {
        let mut state = self.state.write().await;
        let record = state.record_mut(id)?;

        record.toggle_active(now);
        Ok(record.clone())
    }

    async fn delete_form_config(&self, id: FormConfigId) -> AppResult<()> {
        let mut state = self.state.write().await;
        let stored = state
            .records
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("form configuration '{id}' does not exist")))?;

        state.links.remove(stored.record.form_link().as_str());
        Ok(())
    }
}
