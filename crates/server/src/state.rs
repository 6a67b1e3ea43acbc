use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use qbank_core::{Config, PrintTarget, SanitizedConfig, Session};

/// Shared application state
pub struct AppState {
    config: Config,
    session: Mutex<Session>,
    print_target: Option<Arc<dyn PrintTarget>>,
}

impl AppState {
    pub fn new(
        config: Config,
        session: Session,
        print_target: Option<Arc<dyn PrintTarget>>,
    ) -> Self {
        Self {
            config,
            session: Mutex::new(session),
            print_target,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    /// The browsing session. Handlers hold the lock for a whole operation.
    pub fn session(&self) -> &Mutex<Session> {
        &self.session
    }

    pub fn print_target(&self) -> Option<&dyn PrintTarget> {
        self.print_target.as_deref()
    }

    /// Local asset tree served under `/questions` and `/mark-schemes`.
    pub fn asset_root(&self) -> Option<&Path> {
        self.config.assets.root_dir.as_deref()
    }
}
