mod conversions;
mod types;

pub use types::{
    DeleteFeedbackFormResponse, FeedbackFormListResponse, FeedbackFormResponse,
    FeedbackFormsQuery, SaveFeedbackFormRequest, SingleFeedbackFormResponse,
};
