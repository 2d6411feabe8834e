use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use formdesk_core::{AppError, AppResult};
use formdesk_domain::{FormConfig, FormConfigDraft, FormConfigDraftInput, FormConfigId};
use tracing::{info, warn};

use crate::form_config_ports::{FormConfigRepository, FormLinkGenerator};

mod link_generator;
mod listing;

pub use link_generator::RandomFormLinkGenerator;
pub use listing::{DEFAULT_PAGE_LIMIT, FormConfigListRequest, FormConfigListing, MAX_PAGE_LIMIT};

/// Total insert attempts made before giving up on link collisions.
pub const MAX_FORM_LINK_ATTEMPTS: usize = 5;

/// Application service for feedback form configurations.
#[derive(Clone)]
pub struct FormConfigService {
    repository: Arc<dyn FormConfigRepository>,
    link_generator: Arc<dyn FormLinkGenerator>,
}

impl FormConfigService {
    /// Creates a new service from a repository and link generator.
    #[must_use]
    pub fn new(
        repository: Arc<dyn FormConfigRepository>,
        link_generator: Arc<dyn FormLinkGenerator>,
    ) -> Self {
        Self {
            repository,
            link_generator,
        }
    }

    /// Validates and stores a new form configuration with a fresh form link.
    pub async fn create(&self, input: FormConfigDraftInput) -> AppResult<FormConfig> {
        let draft = FormConfigDraft::new(input)?;
        let id = FormConfigId::new();

        for attempt in 1..=MAX_FORM_LINK_ATTEMPTS {
            let form_link = self.link_generator.generate()?;
            let form_config = FormConfig::create(id, form_link, draft.clone(), Utc::now());

            match self
                .repository
                .insert_form_config(form_config.clone())
                .await
            {
                Ok(()) => {
                    info!(
                        form_config_id = %form_config.id(),
                        form_link = %form_config.form_link(),
                        "created form configuration"
                    );
                    return Ok(form_config);
                }
                Err(AppError::Conflict(detail)) => {
                    warn!(
                        attempt,
                        form_link = %form_config.form_link(),
                        %detail,
                        "form link collision, regenerating"
                    );
                }
                Err(error) => return Err(error),
            }
        }

        Err(AppError::Conflict(format!(
            "could not allocate a unique form link after {MAX_FORM_LINK_ATTEMPTS} attempts"
        )))
    }

    /// Lists form configurations with search and pagination.
    pub async fn list(&self, request: FormConfigListRequest) -> AppResult<FormConfigListing> {
        let page = self
            .repository
            .list_form_configs(request.to_query()?)
            .await?;

        Ok(FormConfigListing {
            items: page.items,
            total: (!request.export).then_some(page.total),
        })
    }

    /// Returns one form configuration.
    pub async fn get(&self, id: &str) -> AppResult<FormConfig> {
        let id = parse_id(id)?;
        self.repository
            .find_form_config(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Replaces every mutable attribute of a form configuration.
    ///
    /// When `expected_version` is set the update only applies to that version.
    pub async fn update(
        &self,
        id: &str,
        input: FormConfigDraftInput,
        expected_version: Option<i64>,
    ) -> AppResult<FormConfig> {
        let id = parse_id(id)?;
        let draft = FormConfigDraft::new(input)?;
        let form_config = self
            .repository
            .replace_form_config(id, draft, expected_version, Utc::now())
            .await?;

        info!(
            form_config_id = %form_config.id(),
            version = form_config.version(),
            "updated form configuration"
        );

        Ok(form_config)
    }

    /// Flips whether a form configuration is served to respondents.
    pub async fn toggle_active(&self, id: &str) -> AppResult<FormConfig> {
        let id = parse_id(id)?;
        let form_config = self
            .repository
            .toggle_form_config_active(id, Utc::now())
            .await?;

        info!(
            form_config_id = %form_config.id(),
            active = form_config.active(),
            "toggled form configuration"
        );

        Ok(form_config)
    }

    /// Hard-deletes a form configuration.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = parse_id(id)?;
        self.repository.delete_form_config(id).await?;
        info!(form_config_id = %id, "deleted form configuration");
        Ok(())
    }
}

// Malformed identifiers can never match a record.
fn parse_id(value: &str) -> AppResult<FormConfigId> {
    FormConfigId::from_str(value).map_err(|_| {
        AppError::NotFound(format!("form configuration '{value}' does not exist"))
    })
}

fn not_found(id: FormConfigId) -> AppError {
    AppError::NotFound(format!("form configuration '{id}' does not exist"))
}

#[cfg(test)]
mod tests;
