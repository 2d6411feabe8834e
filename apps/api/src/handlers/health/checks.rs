use super::*;

pub(super) async fn check_storage(pool: Option<sqlx::PgPool>) -> HealthDependencyStatus {
    let Some(pool) = pool else {
        return HealthDependencyStatus {
            backend: "memory",
            status: "ok",
            detail: None,
        };
    };

    let check = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&pool)
        .await;

    match check {
        Ok(_) => HealthDependencyStatus {
            backend: "postgres",
            status: "ok",
            detail: None,
        },
        Err(error) => HealthDependencyStatus {
            backend: "postgres",
            status: "error",
            detail: Some(format!("postgres check failed: {error}")),
        },
    }
}
