use formdesk_application::FormConfigService;
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub form_config_service: FormConfigService,
    /// Present when form configurations live in PostgreSQL.
    pub postgres_pool: Option<PgPool>,
}
