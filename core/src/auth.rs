//! Bearer-token sources.
//!
//! The gateway asks its `TokenProvider` for the token on every request, so
//! a provider refreshed elsewhere (login, logout, renewal) takes effect on
//! the next call without rebuilding the gateway.

use std::sync::{Arc, RwLock};

/// Supplies the current bearer token, if the user is authenticated.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

impl<P: TokenProvider + ?Sized> TokenProvider for Arc<P> {
    fn bearer_token(&self) -> Option<String> {
        (**self).bearer_token()
    }
}

/// A fixed token, mostly for scripts and tests.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Cloneable handle to a token that is set and cleared by whoever owns the
/// login flow. All clones observe the same value.
#[derive(Debug, Clone, Default)]
pub struct SharedToken {
    inner: Arc<RwLock<Option<String>>>,
}

impl SharedToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        if let Ok(mut slot) = self.inner.write() {
            *slot = Some(token.into());
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.inner.write() {
            *slot = None;
        }
    }
}

impl TokenProvider for SharedToken {
    fn bearer_token(&self) -> Option<String> {
        self.inner.read().ok().and_then(|slot| slot.clone())
    }
}
