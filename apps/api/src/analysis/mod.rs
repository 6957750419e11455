// Career readiness analysis: POST /analyze.
// Scoring is pure; the mentor call is the only external dependency.

pub mod handlers;
pub mod models;
pub mod readiness;
