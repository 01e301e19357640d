use std::sync::{Arc, Mutex};

use lunden_session_core::{NavigationPort, NavigationTarget, PortError};

/// In-memory navigation boundary: records every `replace` so the driver
/// and the tests can observe where the flow ended up.
#[derive(Debug, Clone, Default)]
pub struct NavigationRecorder {
    inner: Arc<Mutex<Vec<NavigationTarget>>>,
}

impl NavigationRecorder {
    pub fn last(&self) -> Option<NavigationTarget> {
        self.inner.lock().ok().and_then(|g| g.last().cloned())
    }

    pub fn history(&self) -> Vec<NavigationTarget> {
        self.inner.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl NavigationPort for NavigationRecorder {
    fn replace(&self, target: NavigationTarget) -> Result<(), PortError> {
        let mut g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("navigation lock poisoned: {e}")))?;
        g.push(target);
        Ok(())
    }
}
