//! Response-pair comparison: captured response types, the body gate, and the
//! orchestrator that turns a pair into one [`ComparisonResult`](crate::diff::ComparisonResult).

pub mod body;
pub mod orchestrator;
pub mod response;

pub use body::{compare_bodies, BodyComparison};
pub use orchestrator::{ResponseComparator, COMPARED_HEADERS, PERFORMANCE_THRESHOLD_MS};
pub use response::{is_json_content_type, CapturedResponse, Headers};
