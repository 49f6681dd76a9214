use crate::config::Config;
use crate::db::Directory;
use crate::services::notification::Notifier;
use std::sync::Arc;

/// Process-wide dependencies, built once in `main` and cloned into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub directory: Arc<dyn Directory>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(config: Config, directory: Arc<dyn Directory>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config: Arc::new(config),
            directory,
            notifier,
        }
    }
}
