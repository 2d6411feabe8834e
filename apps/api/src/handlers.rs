pub mod feedback_forms;
pub mod health;
