use std::sync::Arc;

use formdesk_application::{FormConfigRepository, FormConfigService, RandomFormLinkGenerator};
use formdesk_infrastructure::{InMemoryFormConfigRepository, PostgresFormConfigRepository};
use sqlx::PgPool;

use crate::state::AppState;

/// Wires the form configuration service onto PostgreSQL when a pool is given,
/// and onto process memory otherwise.
pub fn build_app_state(postgres_pool: Option<PgPool>) -> AppState {
    let repository: Arc<dyn FormConfigRepository> = match &postgres_pool {
        Some(pool) => Arc::new(PostgresFormConfigRepository::new(pool.clone())),
        None => Arc::new(InMemoryFormConfigRepository::new()),
    };

    AppState {
        form_config_service: FormConfigService::new(
            repository,
            Arc::new(RandomFormLinkGenerator::new()),
        ),
        postgres_pool,
    }
}
