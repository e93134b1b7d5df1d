use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::storage::DocumentStore;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Record persistence. Production: `PgStore`.
    pub store: Arc<dyn Store>,
    /// Uploaded file storage. Production: `S3DocumentStore`.
    pub storage: Arc<dyn DocumentStore>,
    /// Generative-AI provider. Production: `GeminiClient`.
    pub llm: Arc<dyn TextGenerator>,
    pub jwt: JwtKeys,
    pub config: Config,
}
