use std::sync::Arc;

use crate::assistant::AssistantGateway;
use crate::models::profile::GlobalData;
use crate::profile::ProfileOrigin;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Resolved once at startup; never replaced.
    pub profile: Arc<GlobalData>,
    pub profile_origin: ProfileOrigin,
    pub assistant: AssistantGateway,
}
