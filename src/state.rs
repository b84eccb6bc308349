use std::sync::Arc;

use crate::config::Config;
use crate::fixture::OrgData;
use crate::ws::SimulationHub;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Read-only organization snapshot
    pub data: Arc<OrgData>,
    /// Application configuration
    pub config: Arc<Config>,
    /// Live force simulations by session
    pub simulations: Arc<SimulationHub>,
}

impl AppState {
    /// Create new application state
    pub fn new(data: OrgData, config: Config) -> Self {
        Self {
            data: Arc::new(data),
            config: Arc::new(config),
            simulations: Arc::new(SimulationHub::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_shares_snapshot() {
        let state = AppState::new(OrgData::sample(), Config::default());
        let clone = state.clone();
        assert!(Arc::ptr_eq(&state.data, &clone.data));
        assert_eq!(clone.data.staff.len(), 17);
        assert!(clone.simulations.is_empty());
    }
}
