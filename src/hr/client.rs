//! HR directory and leave fetching.
//!
//! [`HrDirectory`] is the seam the pipeline fetches through; [`HrClient`] is
//! its implementation over the HR service's REST API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use reqwest::header::COOKIE;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::HrConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{HrUser, LeaveRecord};

use super::login::login_flow;
use super::period::LeaveWindow;
use super::session::SessionManager;

/// Path of the user directory endpoint.
pub const USERS_PATH: &str = "/api/v3/users";

/// Path of the leave endpoint.
pub const LEAVES_PATH: &str = "/api/v3/leaves";

const USER_FIELDS: &str = "name,department[name],legalEntity[name]";
const LEAVE_FIELDS: &str = "leavePeriod[owner[name]]";

/// Source of the two collections a grouping is built from.
///
/// Both methods may be called concurrently.
#[async_trait]
pub trait HrDirectory: Send + Sync {
    /// Fetches every user of the directory.
    async fn fetch_users(&self) -> EngineResult<Vec<HrUser>>;

    /// Fetches the short leaves of the coming working week.
    async fn fetch_leaves(&self) -> EngineResult<Vec<LeaveRecord>>;
}

/// Authenticated client for the HR service.
pub struct HrClient {
    base_url: String,
    http: reqwest::Client,
    session: Arc<SessionManager>,
    leave_legal_entity_id: Option<String>,
}

impl HrClient {
    /// Builds a client and its session manager from configuration.
    ///
    /// Redirects are never followed, so an expired or rejected session shows
    /// up as a non-success status instead of a login page.
    pub fn new(config: &HrConfig) -> EngineResult<Self> {
        let http = reqwest::Client::builder()
            .redirect(Policy::none())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::invalid_config("hr", e.to_string()))?;
        let session = Arc::new(SessionManager::new(http.clone(), login_flow(config)));
        Ok(Self::with_session(config, http, session))
    }

    /// Builds a client sharing an existing session manager.
    pub fn with_session(
        config: &HrConfig,
        http: reqwest::Client,
        session: Arc<SessionManager>,
    ) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            http,
            session,
            leave_legal_entity_id: config.leave_legal_entity_id.clone(),
        }
    }

    /// The session manager used by this client.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Fetches the leaves of an explicit window.
    pub async fn fetch_leaves_in(&self, window: LeaveWindow) -> EngineResult<Vec<LeaveRecord>> {
        let mut query = vec![
            ("date", window.to_filter()),
            ("fields", LEAVE_FIELDS.to_string()),
        ];
        if let Some(id) = &self.leave_legal_entity_id {
            query.push(("leavePeriod.owner.legalEntityID", id.clone()));
        }
        self.get_items(LEAVES_PATH, &query).await
    }

    async fn get_items<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> EngineResult<Vec<T>> {
        let credential = self.session.ensure_session().await?;

        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .header(COOKIE, credential.cookie_header())
            .send()
            .await
            .map_err(|e| EngineError::RequestFailed {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| EngineError::RequestFailed {
                url: url.clone(),
                message: e.to_string(),
            })?;

        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "HR service returned an error");
            return Err(EngineError::UpstreamError {
                url,
                status: status.as_u16(),
                body,
            });
        }

        let items = decode_items::<T>(&url, &body)?;
        debug!(url = %url, items = items.len(), "fetched HR items");
        Ok(items)
    }
}

#[async_trait]
impl HrDirectory for HrClient {
    async fn fetch_users(&self) -> EngineResult<Vec<HrUser>> {
        self.get_items(USERS_PATH, &[("fields", USER_FIELDS.to_string())])
            .await
    }

    async fn fetch_leaves(&self) -> EngineResult<Vec<LeaveRecord>> {
        let window = LeaveWindow::starting_from(Local::now().date_naive());
        self.fetch_leaves_in(window).await
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: EnvelopeData<T>,
}

#[derive(Deserialize)]
struct EnvelopeData<T> {
    items: Vec<T>,
}

/// Decodes the `{"data": {"items": [...]}}` envelope of a response body.
pub fn decode_items<T: DeserializeOwned>(url: &str, body: &str) -> EngineResult<Vec<T>> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(|envelope| envelope.data.items)
        .map_err(|e| EngineError::DecodeError {
            url: url.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_users_envelope() {
        let body = r#"{
            "header": {},
            "data": {
                "items": [
                    {"name": "Alice", "department": {"name": "Sales"}, "legalEntity": {"name": "Acme"}},
                    {"name": "Bob", "department": {"name": "Ops"}, "legalEntity": {"name": "Acme"}}
                ]
            }
        }"#;

        let users: Vec<HrUser> = decode_items("http://hr/api/v3/users", body).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].department, "Ops");
    }

    #[test]
    fn test_decode_leaves_envelope() {
        let body = r#"{"data": {"items": [
            {"leavePeriod": {"owner": {"name": "Alice"}}},
            {"leavePeriod": {"owner": {"name": "Alice"}}}
        ]}}"#;

        let leaves: Vec<LeaveRecord> = decode_items("http://hr/api/v3/leaves", body).unwrap();
        assert_eq!(leaves, vec![LeaveRecord::for_owner("Alice"); 2]);
    }

    #[test]
    fn test_decode_empty_items() {
        let users: Vec<HrUser> = decode_items("u", r#"{"data": {"items": []}}"#).unwrap();
        assert!(users.is_empty());
    }

    #[test]
    fn test_decode_missing_envelope_is_decode_error() {
        match decode_items::<HrUser>("http://hr/api/v3/users", r#"{"items": []}"#) {
            Err(EngineError::DecodeError { url, .. }) => {
                assert_eq!(url, "http://hr/api/v3/users");
            }
            other => panic!("Expected DecodeError, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_html_body_is_decode_error() {
        let result = decode_items::<LeaveRecord>("u", "<html>login</html>");
        assert!(matches!(result, Err(EngineError::DecodeError { .. })));
    }
}
