//! The profile record compiled into the binary. Served whenever the remote CMS
//! is disabled or unreachable.

use std::sync::{Arc, OnceLock};

use crate::models::profile::GlobalData;

const FALLBACK_JSON: &str = include_str!("../../data/profile.json");

static FALLBACK: OnceLock<Arc<GlobalData>> = OnceLock::new();

/// Returns the embedded fallback snapshot, parsing it on first use.
pub fn fallback_profile() -> Arc<GlobalData> {
    FALLBACK
        .get_or_init(|| {
            Arc::new(
                serde_json::from_str(FALLBACK_JSON)
                    .expect("embedded data/profile.json must match the GlobalData shape"),
            )
        })
        .clone()
}
