use bruteguard_application::DecisionEngine;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The authorization decision engine, stateless and cheap to clone.
    pub engine: DecisionEngine,
}
