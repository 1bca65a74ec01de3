use daybook_auth::{IdentityProvider, TokenVerifier};
use daybook_store::{ChangeFeed, RecordStore};
use std::sync::Arc;

/// Shared application state. Generic over the store and identity provider
/// so the router tests run against the in-memory implementations.
pub struct AppState<S, P> {
    pub store: Arc<S>,
    pub idp: Arc<P>,
    pub verifier: Arc<TokenVerifier>,
    pub feed: ChangeFeed,
}

impl<S: RecordStore, P: IdentityProvider> AppState<S, P> {
    pub fn new(store: S, idp: P, verifier: TokenVerifier) -> Self {
        Self {
            store: Arc::new(store),
            idp: Arc::new(idp),
            verifier: Arc::new(verifier),
            feed: ChangeFeed::new(),
        }
    }
}

impl<S, P> Clone for AppState<S, P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            idp: Arc::clone(&self.idp),
            verifier: Arc::clone(&self.verifier),
            feed: self.feed.clone(),
        }
    }
}
