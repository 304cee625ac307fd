//! Application state shared by the CLI commands.

use std::path::PathBuf;
use std::sync::Arc;

use sprintbot_core::clock::Clock;
use sprintbot_core::sprint::SprintService;
use sprintbot_infra::config::{load_sprint_config, resolve_data_dir};
use sprintbot_infra::console::ConsoleTransport;
use sprintbot_types::config::SprintConfig;

/// The sprint service pinned to the in-process transport.
pub type ConcreteSprintService = SprintService<ConsoleTransport>;

#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: Arc<SprintConfig>,
}

impl AppState {
    /// Resolve the data directory and load its configuration.
    pub async fn init() -> Self {
        let data_dir = resolve_data_dir();
        let config = Arc::new(load_sprint_config(&data_dir).await);
        tracing::debug!(data_dir = %data_dir.display(), "configuration loaded");
        Self { data_dir, config }
    }

    pub fn sprint_service(
        &self,
        transport: Arc<ConsoleTransport>,
        clock: Arc<dyn Clock>,
    ) -> ConcreteSprintService {
        SprintService::new(transport, clock, Arc::clone(&self.config))
    }
}
