//! Analysis request/response wire models and the request builder.

mod builder;
mod models;

pub use builder::{build_request, ChordFailure, RequestValidationError, MAX_PROGRESSION_LEN};
pub use models::{AnalysisRequest, AnalysisResponse, ExplanationStep};
