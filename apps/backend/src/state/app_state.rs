use std::sync::Arc;

use parking_lot::RwLock;

use crate::events::EventBus;
use crate::store::SessionStore;
use crate::ws::hub::ConnectionRegistry;

use super::security_config::SecurityConfig;

/// Shared application state: the session store behind one lock, the
/// security config, the event bus, and the realtime connection registry.
///
/// Engine operations are synchronous in-memory mutations; one RwLock over
/// the store makes each of them atomic. The lock is never held across an
/// await point.
pub struct AppState {
    pub store: RwLock<SessionStore>,
    pub security: SecurityConfig,
    pub events: EventBus,
    pub registry: Arc<ConnectionRegistry>,
}

impl AppState {
    pub fn new(security: SecurityConfig) -> Self {
        Self {
            store: RwLock::new(SessionStore::new()),
            security,
            events: EventBus::new(),
            registry: Arc::new(ConnectionRegistry::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SecurityConfig::default())
    }
}
