//! Application state for the meal voucher engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::BenefitConfig;

/// Shared application state.
///
/// Holds the benefit configuration loaded at startup. Runs only read it.
#[derive(Clone)]
pub struct AppState {
    config: Arc<BenefitConfig>,
}

impl AppState {
    /// Creates a new application state with the given configuration.
    pub fn new(config: BenefitConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the benefit configuration.
    pub fn config(&self) -> &BenefitConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_clones_share_configuration() {
        let state = AppState::new(BenefitConfig::default());
        let clone = state.clone();
        assert!(std::ptr::eq(state.config(), clone.config()));
    }
}
