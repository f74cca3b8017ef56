//! The review engine.
//!
//! Single entry point for every review mutation and query. Adapters map
//! their domain signals onto quality grades and call in here; the engine
//! owns seeding, scheduling, status transitions, and persistence through the
//! injected store. No adapter re-implements lookup/seed/persist logic.

mod due;
mod recorder;

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::EngineConfig;
use crate::error::{RepriseError, RepriseResult};
use crate::scheduler::Sm2Scheduler;
use crate::traits::ReviewStore;

/// Accepted identifier shape for user and content ids: alphanumeric head,
/// then alphanumerics plus `.`/`_`/`:`/`-`, 128 characters at most. Platform
/// ids are UUID- or slug-shaped; anything else is a malformed request.
static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._:-]{0,127}$").expect("valid id pattern"));

fn validate_identifier(field: &str, value: &str) -> RepriseResult<()> {
    if ID_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(RepriseError::malformed_id(field, value))
    }
}

/// Review scheduling engine.
///
/// Holds the scheduler and the injected record store; shared behind an
/// `Arc` by every content adapter.
pub struct ReviewEngine {
    config: EngineConfig,
    scheduler: Sm2Scheduler,
    store: Arc<dyn ReviewStore>,
}

impl ReviewEngine {
    /// Create an engine over the given store.
    pub fn new(config: EngineConfig, store: Arc<dyn ReviewStore>) -> Self {
        let scheduler = Sm2Scheduler::with_config(config.scheduler.clone());
        Self {
            config,
            scheduler,
            store,
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
