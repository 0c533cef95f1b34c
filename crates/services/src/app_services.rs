use std::sync::Arc;

use parrot_core::model::ScenarioSettings;
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::ingest::IngestService;
use crate::scenario::ScenarioService;
use crate::turn::TurnHandler;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    scenario: Arc<ScenarioService>,
    turns: Arc<TurnHandler>,
    ingest: Arc<IngestService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        settings: ScenarioSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, settings))
    }

    /// Build services over an in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock, settings: ScenarioSettings) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, settings)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, settings: ScenarioSettings) -> Self {
        let scenario = Arc::new(ScenarioService::new(
            clock,
            settings,
            Arc::clone(&storage.articles),
        ));
        let turns = Arc::new(TurnHandler::new(Arc::clone(&scenario)));
        let ingest = Arc::new(IngestService::new(clock, Arc::clone(&storage.articles)));

        Self {
            scenario,
            turns,
            ingest,
        }
    }

    #[must_use]
    pub fn scenario(&self) -> Arc<ScenarioService> {
        Arc::clone(&self.scenario)
    }

    #[must_use]
    pub fn turns(&self) -> Arc<TurnHandler> {
        Arc::clone(&self.turns)
    }

    #[must_use]
    pub fn ingest(&self) -> Arc<IngestService> {
        Arc::clone(&self.ingest)
    }
}
