//! Session management for the HR service.
//!
//! The [`SessionManager`] owns the one session credential of the process. It
//! is shared by `Arc` between every fetch; the first caller runs the login
//! flow and everybody afterwards reads the cached credential without locking.
//!
//! Callers that queue up behind a login share its outcome: they get the
//! credential it produced, or the error it failed with. A failure is kept
//! only for those waiters; the next caller to arrive logs in again.
//!
//! The credential is never refreshed. A session that expires server-side
//! shows up as upstream errors until the process restarts.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};

use super::login::{LoginFlow, SessionCredential};

/// Obtains and caches the HR session credential.
pub struct SessionManager {
    http: reqwest::Client,
    flow: Box<dyn LoginFlow>,
    credential: OnceLock<SessionCredential>,
    /// Number of finished login sequences.
    attempts: AtomicU64,
    /// Serializes logins; holds the error of the latest failed one.
    last_failure: Mutex<Option<EngineError>>,
}

impl SessionManager {
    /// Creates a manager that logs in through `flow` on first use.
    pub fn new(http: reqwest::Client, flow: Box<dyn LoginFlow>) -> Self {
        Self {
            http,
            flow,
            credential: OnceLock::new(),
            attempts: AtomicU64::new(0),
            last_failure: Mutex::new(None),
        }
    }

    /// Returns the session credential, logging in if there is none yet.
    ///
    /// Concurrent callers run at most one login sequence: the lock is held
    /// for the whole sequence, and a caller that waited on it returns the
    /// credential or the error of the sequence that finished meanwhile.
    /// Failures are not cached beyond that, so a later caller retries.
    pub async fn ensure_session(&self) -> EngineResult<&SessionCredential> {
        if let Some(credential) = self.credential.get() {
            return Ok(credential);
        }

        let seen = self.attempts.load(Ordering::SeqCst);
        let mut last_failure = self.last_failure.lock().await;
        if let Some(credential) = self.credential.get() {
            debug!("session established while waiting for the login lock");
            return Ok(credential);
        }
        if self.attempts.load(Ordering::SeqCst) != seen {
            if let Some(error) = last_failure.as_ref() {
                debug!("login failed while waiting for the login lock");
                return Err(error.clone());
            }
        }

        info!("logging in to HR service");
        let outcome = self.flow.login(&self.http).await;
        self.attempts.fetch_add(1, Ordering::SeqCst);

        match outcome {
            Ok(credential) => {
                *last_failure = None;
                info!(cookie = credential.name(), "HR session established");
                Ok(self.credential.get_or_init(|| credential))
            }
            Err(error) => {
                warn!(error = %error, "HR login failed");
                *last_failure = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Returns true once a credential has been cached.
    pub fn is_established(&self) -> bool {
        self.credential.get().is_some()
    }
}
