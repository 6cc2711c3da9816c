//! Per-client auth token cache.

use std::future::Future;
use tokio::sync::Mutex;
use tracing::debug;

/// Bearer token shared by every request of one [`Gateway`](crate::Gateway).
///
/// Each successful login bumps a generation counter. A request that was
/// rejected with token generation `n` asks for a refresh of generation `n`;
/// if another request already replaced that token, the fresh one is reused
/// and no second login happens.
#[derive(Debug, Default)]
pub struct Session {
    state: Mutex<SessionState>,
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    generation: u64,
}

impl Session {
    /// Empty session; the first request logs in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session seeded with a previously issued token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(SessionState {
                token: Some(token.into()),
                generation: 1,
            }),
        }
    }

    /// Currently cached token, if any.
    pub async fn token(&self) -> Option<String> {
        self.state.lock().await.token.clone()
    }

    /// Number of tokens this session has held.
    pub async fn generation(&self) -> u64 {
        self.state.lock().await.generation
    }

    /// Forget the cached token.
    pub async fn clear(&self) {
        self.state.lock().await.token = None;
    }

    /// Cached token, logging in first when there is none.
    ///
    /// The lock is held across `login`, so concurrent callers wait for a
    /// single login instead of racing.
    pub(crate) async fn get_or_login<F, Fut, E>(&self, login: F) -> Result<(String, u64), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let mut state = self.state.lock().await;
        if let Some(token) = &state.token {
            return Ok((token.clone(), state.generation));
        }
        let token = login().await?;
        state.generation += 1;
        state.token = Some(token.clone());
        debug!(generation = state.generation, "Session token issued");
        Ok((token, state.generation))
    }

    /// Replace the token of generation `stale`, unless someone already did.
    pub(crate) async fn refresh<F, Fut, E>(&self, stale: u64, login: F) -> Result<(String, u64), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let mut state = self.state.lock().await;
        if state.generation != stale
            && let Some(token) = &state.token
        {
            debug!(generation = state.generation, "Reusing token refreshed by another request");
            return Ok((token.clone(), state.generation));
        }
        state.token = None;
        let token = login().await?;
        state.generation += 1;
        state.token = Some(token.clone());
        debug!(generation = state.generation, "Session token refreshed");
        Ok((token, state.generation))
    }
}
