use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use formdesk_core::{AppError, AppResult};
use formdesk_domain::{
    FormConfig, FormConfigDraft, FormConfigDraftInput, FormConfigId, FormLink, FormQuestionInput,
};
use tokio::sync::Mutex;

use crate::{
    FormConfigListQuery, FormConfigListRequest, FormConfigPage, FormConfigRepository,
    FormLinkGenerator, MAX_FORM_LINK_ATTEMPTS, RandomFormLinkGenerator,
};

use super::FormConfigService;

/// Keeps records in insertion order; newest last.
#[derive(Default)]
struct FakeRepository {
    records: Mutex<Vec<FormConfig>>,
}

impl FakeRepository {
    async fn len(&self) -> usize {
        self.records.lock().await.len()
    }
}

#[async_trait]
impl FormConfigRepository for FakeRepository {
    async fn insert_form_config(&self, form_config: FormConfig) -> AppResult<()> {
        let mut records = self.records.lock().await;
        if records
            .iter()
            .any(|existing| existing.form_link() == form_config.form_link())
        {
            return Err(AppError::Conflict(format!(
                "form link '{}' is already in use",
                form_config.form_link()
            )));
        }

        records.push(form_config);
        Ok(())
    }

    async fn find_form_config(&self, id: FormConfigId) -> AppResult<Option<FormConfig>> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .find(|record| record.id() == id)
            .cloned())
    }

    async fn list_form_configs(&self, query: FormConfigListQuery) -> AppResult<FormConfigPage> {
        let records = self.records.lock().await;
        let matching: Vec<FormConfig> = records
            .iter()
            .rev()
            .filter(|record| {
                query
                    .search
                    .as_deref()
                    .is_none_or(|term| record.matches_search(term))
            })
            .cloned()
            .collect();

        let total = matching.len() as u64;
        let items = match query.window {
            Some(window) => matching
                .into_iter()
                .skip(window.offset)
                .take(window.limit)
                .collect(),
            None => matching,
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
        let mut records = self.records.lock().await;
        let record = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("form configuration '{id}' does not exist")))?;

        if let Some(expected_version) = expected_version
            && expected_version != record.version()
        {
            return Err(AppError::Conflict(format!(
                "form configuration '{id}' is at version {}",
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
        let mut records = self.records.lock().await;
        let record = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("form configuration '{id}' does not exist")))?;

        record.toggle_active(now);
        Ok(record.clone())
    }

    async fn delete_form_config(&self, id: FormConfigId) -> AppResult<()> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return Err(AppError::NotFound(format!(
                "form configuration '{id}' does not exist"
            )));
        }

        Ok(())
    }
}

/// Replays a fixed list of links, repeating the last one forever.
struct ScriptedLinkGenerator {
    links: std::sync::Mutex<VecDeque<&'static str>>,
    last: &'static str,
}

impl ScriptedLinkGenerator {
    fn new(links: &[&'static str]) -> Self {
        Self {
            links: std::sync::Mutex::new(links.iter().copied().collect()),
            last: links.last().copied().unwrap_or("FORM-AAAAAAAA"),
        }
    }
}

impl FormLinkGenerator for ScriptedLinkGenerator {
    fn generate(&self) -> AppResult<FormLink> {
        let next = self
            .links
            .lock()
            .map_err(|_| AppError::Internal("link script lock poisoned".to_owned()))?
            .pop_front()
            .unwrap_or(self.last);
        FormLink::new(next)
    }
}

fn draft_input(name: &str) -> FormConfigDraftInput {
    FormConfigDraftInput {
        name: Some(name.to_owned()),
        title: Some(format!("{name} title")),
        audience_type: Some("department".to_owned()),
        assigned_for: Some(vec!["finance".to_owned()]),
        fields: None,
        questions: Some(vec![FormQuestionInput {
            question: Some("Rate us".to_owned()),
            question_type: Some("number".to_owned()),
        }]),
        active: None,
        is_default: None,
    }
}

fn service_with(
    repository: Arc<FakeRepository>,
    generator: Arc<dyn FormLinkGenerator>,
) -> FormConfigService {
    FormConfigService::new(repository, generator)
}

fn random_service() -> (FormConfigService, Arc<FakeRepository>) {
    let repository = Arc::new(FakeRepository::default());
    let service = service_with(repository.clone(), Arc::new(RandomFormLinkGenerator::new()));
    (service, repository)
}

async fn create(service: &FormConfigService, name: &str) -> FormConfig {
    service
        .create(draft_input(name))
        .await
        .unwrap_or_else(|error| panic!("failed to create '{name}': {error}"))
}

#[tokio::test]
async fn create_assigns_identity_link_and_timestamps() {
    let (service, _) = random_service();

    let created = create(&service, "Finance pulse").await;

    assert!(created.form_link().as_str().starts_with("FORM-"));
    assert_eq!(created.form_link().as_str().len(), 13);
    assert_eq!(created.version(), 1);
    assert_eq!(created.created_at(), created.updated_at());
    assert!(!created.active());
}

#[tokio::test]
async fn create_rejects_missing_name_without_persisting() {
    let (service, repository) = random_service();
    create(&service, "Existing").await;

    let result = service
        .create(FormConfigDraftInput {
            name: None,
            ..draft_input("ignored")
        })
        .await;

    assert!(matches!(result, Err(AppError::InvalidFields(_))));
    assert_eq!(repository.len().await, 1);
}

#[tokio::test]
async fn create_regenerates_link_after_collision() {
    let repository = Arc::new(FakeRepository::default());
    let first = service_with(
        repository.clone(),
        Arc::new(ScriptedLinkGenerator::new(&["FORM-TAKEN001"])),
    );
    create(&first, "First").await;

    let second = service_with(
        repository.clone(),
        Arc::new(ScriptedLinkGenerator::new(&["FORM-TAKEN001", "FORM-FRESH002"])),
    );
    let created = create(&second, "Second").await;

    assert_eq!(created.form_link().as_str(), "FORM-FRESH002");
    assert_eq!(repository.len().await, 2);
}

#[tokio::test]
async fn create_gives_up_after_bounded_attempts() {
    let repository = Arc::new(FakeRepository::default());
    let service = service_with(
        repository.clone(),
        Arc::new(ScriptedLinkGenerator::new(&["FORM-TAKEN001"])),
    );
    create(&service, "First").await;

    let result = service.create(draft_input("Second")).await;

    assert!(matches!(result, Err(AppError::Conflict(detail)) if detail.contains(&MAX_FORM_LINK_ATTEMPTS.to_string())));
    assert_eq!(repository.len().await, 1);
}

#[tokio::test]
async fn created_links_are_unique() {
    let (service, _) = random_service();
    let mut links = std::collections::HashSet::new();

    for index in 0..50 {
        let created = create(&service, &format!("Form {index}")).await;
        assert!(links.insert(created.form_link().as_str().to_owned()));
    }
}

#[tokio::test]
async fn get_reports_unknown_and_malformed_ids_as_not_found() {
    let (service, _) = random_service();

    let unknown = service.get(&FormConfigId::new().to_string()).await;
    let malformed = service.get("not-an-id").await;

    assert!(matches!(unknown, Err(AppError::NotFound(_))));
    assert!(matches!(malformed, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn update_keeps_id_link_and_advances_updated_at() {
    let (service, _) = random_service();
    let created = create(&service, "Before").await;

    let updated = service
        .update(
            &created.id().to_string(),
            FormConfigDraftInput {
                active: Some(true),
                ..draft_input("After")
            },
            None,
        )
        .await
        .unwrap_or_else(|error| panic!("update failed: {error}"));

    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.form_link(), created.form_link());
    assert_eq!(updated.created_at(), created.created_at());
    assert!(updated.updated_at() >= created.updated_at());
    assert_eq!(updated.name().as_str(), "After");
    assert!(updated.active());
    assert_eq!(updated.version(), 2);
}

#[tokio::test]
async fn update_validates_before_touching_storage() {
    let (service, _) = random_service();
    let created = create(&service, "Before").await;

    let result = service
        .update(
            &created.id().to_string(),
            FormConfigDraftInput {
                audience_type: Some("region".to_owned()),
                ..draft_input("After")
            },
            None,
        )
        .await;

    assert!(matches!(result, Err(AppError::InvalidFields(_))));
    let stored = service.get(&created.id().to_string()).await;
    assert!(stored.is_ok_and(|stored| stored.name().as_str() == "Before"));
}

#[tokio::test]
async fn update_with_stale_version_conflicts() {
    let (service, _) = random_service();
    let created = create(&service, "Before").await;
    let id = created.id().to_string();

    let first = service.update(&id, draft_input("First"), Some(1)).await;
    assert!(first.is_ok());

    let stale = service.update(&id, draft_input("Stale"), Some(1)).await;
    assert!(matches!(stale, Err(AppError::Conflict(_))));

    let stored = service.get(&id).await;
    assert!(stored.is_ok_and(|stored| stored.name().as_str() == "First"));
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let (service, _) = random_service();

    let result = service
        .update(&FormConfigId::new().to_string(), draft_input("Ghost"), None)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn toggle_active_twice_restores_original_value() {
    let (service, _) = random_service();
    let created = create(&service, "Toggle").await;
    let id = created.id().to_string();

    let once = service.toggle_active(&id).await;
    assert!(once.is_ok_and(|record| record.active()));

    let twice = service.toggle_active(&id).await;
    assert!(twice.is_ok_and(|record| record.active() == created.active()));
}

#[tokio::test]
async fn delete_removes_record_and_rejects_unknown_ids() {
    let (service, _) = random_service();
    let created = create(&service, "Doomed").await;
    let id = created.id().to_string();

    assert!(service.delete(&id).await.is_ok());
    assert!(matches!(service.get(&id).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        service.delete(&id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn second_page_of_thirty_returns_the_oldest_five() {
    let (service, _) = random_service();
    let mut created = Vec::new();
    for index in 1..=30 {
        created.push(create(&service, &format!("Form {index:02}")).await);
    }

    let listing = service
        .list(FormConfigListRequest {
            page: Some(2),
            limit: Some(25),
            ..FormConfigListRequest::default()
        })
        .await
        .unwrap_or_else(|error| panic!("list failed: {error}"));

    let names: Vec<&str> = listing
        .items
        .iter()
        .map(|record| record.name().as_str())
        .collect();
    assert_eq!(listing.total, Some(30));
    assert_eq!(names, vec!["Form 05", "Form 04", "Form 03", "Form 02", "Form 01"]);
}

#[tokio::test]
async fn search_matches_substring_case_insensitively() {
    let (service, _) = random_service();
    create(&service, "Branch1 Form").await;
    create(&service, "Division survey").await;
    create(&service, "Branch2 Form").await;

    let listing = service
        .list(FormConfigListRequest {
            search: Some("branch1".to_owned()),
            ..FormConfigListRequest::default()
        })
        .await
        .unwrap_or_else(|error| panic!("list failed: {error}"));

    assert_eq!(listing.total, Some(1));
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.items[0].name().as_str(), "Branch1 Form");
}

#[tokio::test]
async fn export_returns_every_match_without_total() {
    let (service, _) = random_service();
    for index in 0..7 {
        create(&service, &format!("Branch {index}")).await;
    }
    create(&service, "Division survey").await;

    let listing = service
        .list(FormConfigListRequest {
            page: Some(3),
            limit: Some(2),
            search: Some("BRANCH".to_owned()),
            export: true,
        })
        .await
        .unwrap_or_else(|error| panic!("list failed: {error}"));

    assert_eq!(listing.total, None);
    assert_eq!(listing.items.len(), 7);
}
