//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_form_config_repository;
mod postgres_form_config_repository;

pub use in_memory_form_config_repository::InMemoryFormConfigRepository;
pub use postgres_form_config_repository::PostgresFormConfigRepository;
