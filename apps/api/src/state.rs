use std::sync::Arc;

use crate::catalog::CareerCatalog;
use crate::mentor::Mentor;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once at startup; nothing in it is mutated while serving.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CareerCatalog>,
    pub mentor: Mentor,
}
