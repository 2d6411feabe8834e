mod feedback_forms;
mod health;

pub use feedback_forms::{
    DeleteFeedbackFormResponse, FeedbackFormListResponse, FeedbackFormResponse,
    FeedbackFormsQuery, SaveFeedbackFormRequest, SingleFeedbackFormResponse,
};
pub use health::{HealthDependencyStatus, HealthResponse};
