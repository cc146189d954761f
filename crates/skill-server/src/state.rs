use std::sync::Arc;

use pomodoro_state::{AudioAssets, StateMachine};
use session_store::{FileSessionStorage, InMemorySessionStorage, SessionManager, SessionStorage};

use crate::config::{SkillConfig, StorageKind};

pub struct AppState {
    pub machine: StateMachine<AudioAssets>,
    pub sessions: SessionManager<dyn SessionStorage>,
    /// Expected application id; `None` accepts any caller.
    pub app_id: Option<String>,
}

impl AppState {
    pub fn new(
        machine: StateMachine<AudioAssets>,
        storage: Arc<dyn SessionStorage>,
        app_id: Option<String>,
    ) -> Self {
        Self {
            machine,
            sessions: SessionManager::with_storage(storage),
            app_id,
        }
    }

    pub fn from_config(config: &SkillConfig) -> Self {
        let storage: Arc<dyn SessionStorage> = match config.storage {
            StorageKind::File => {
                log::info!("Storing sessions under {}", config.data_dir.display());
                Arc::new(FileSessionStorage::new(&config.data_dir))
            }
            StorageKind::Memory => {
                log::warn!("Using in-memory session storage; sessions are lost on restart");
                Arc::new(InMemorySessionStorage::new())
            }
        };

        Self::new(
            StateMachine::new(AudioAssets::new(config.audio_base_url.clone())),
            storage,
            config.app_id.clone(),
        )
    }

    /// In-memory state for tests and local runs.
    pub fn in_memory(audio_base_url: &str, app_id: Option<String>) -> Self {
        Self::new(
            StateMachine::new(AudioAssets::new(audio_base_url)),
            Arc::new(InMemorySessionStorage::new()),
            app_id,
        )
    }

    pub fn accepts_application(&self, application_id: Option<&str>) -> bool {
        match (&self.app_id, application_id) {
            (None, _) => true,
            (Some(expected), Some(actual)) => expected == actual,
            (Some(_), None) => false,
        }
    }
}
