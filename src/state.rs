use crate::store::Store;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}
