//! Login sequences against the HR service.
//!
//! Two flows share one contract: [`FormLogin`] first loads the login page and
//! replays the hidden fields of its form, [`DirectLogin`] posts the credentials
//! straight away. Both post to [`LOGIN_PATH`] without following redirects and
//! read the session cookie off that single response.

use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::COOKIE;
use scraper::{Html, Selector};
use tracing::debug;

use crate::config::{HrConfig, LoginFlowKind};
use crate::error::{EngineError, EngineResult};

/// Path of the login page and of the credential form target.
pub const LOGIN_PATH: &str = "/identity/login";

const USERNAME_FIELD: &str = "UserName";
const PASSWORD_FIELD: &str = "Password";

/// The cookie proving a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential {
    name: String,
    value: String,
}

impl SessionCredential {
    /// Creates a credential from a cookie name and value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value for a `Cookie` request header.
    pub fn cookie_header(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredential")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// What a login flow needs to know about the HR service.
#[derive(Clone)]
pub struct LoginSettings {
    base_url: String,
    login: String,
    password: String,
    session_cookie: String,
}

impl LoginSettings {
    /// Creates settings from explicit values.
    pub fn new(
        base_url: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
        session_cookie: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            login: login.into(),
            password: password.into(),
            session_cookie: session_cookie.into(),
        }
    }

    fn login_url(&self) -> String {
        format!("{}{}", self.base_url, LOGIN_PATH)
    }
}

impl From<&HrConfig> for LoginSettings {
    fn from(config: &HrConfig) -> Self {
        LoginSettings::new(
            config.base_url(),
            config.login.clone(),
            config.password.clone(),
            config.session_cookie.clone(),
        )
    }
}

/// A login sequence yielding a session credential.
#[async_trait]
pub trait LoginFlow: Send + Sync {
    /// Runs the whole sequence once, without retrying.
    async fn login(&self, http: &reqwest::Client) -> EngineResult<SessionCredential>;
}

/// Builds the flow selected in the configuration.
pub fn login_flow(config: &HrConfig) -> Box<dyn LoginFlow> {
    let settings = LoginSettings::from(config);
    match config.login_flow {
        LoginFlowKind::Form => Box::new(FormLogin::new(settings)),
        LoginFlowKind::Direct => Box::new(DirectLogin::new(settings)),
    }
}

/// Loads the login page, harvests its form fields, then posts credentials.
pub struct FormLogin {
    settings: LoginSettings,
}

impl FormLogin {
    /// Creates the flow.
    pub fn new(settings: LoginSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl LoginFlow for FormLogin {
    async fn login(&self, http: &reqwest::Client) -> EngineResult<SessionCredential> {
        let url = self.settings.login_url();
        let response = http
            .get(&url)
            .send()
            .await
            .map_err(|e| request_failed(&url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(EngineError::authentication(format!(
                "login page: expected {}, got {}",
                StatusCode::OK.as_u16(),
                status.as_u16()
            )));
        }

        let page_cookies = response_cookies(&response);
        let body = response.text().await.map_err(|e| request_failed(&url, e))?;
        let fields = harvest_form_fields(&body)?;
        debug!(
            fields = fields.len(),
            cookies = page_cookies.len(),
            "harvested login form"
        );

        post_credentials(http, &self.settings, fields, &page_cookies).await
    }
}

/// Posts credentials without visiting the login page first.
pub struct DirectLogin {
    settings: LoginSettings,
}

impl DirectLogin {
    /// Creates the flow.
    pub fn new(settings: LoginSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl LoginFlow for DirectLogin {
    async fn login(&self, http: &reqwest::Client) -> EngineResult<SessionCredential> {
        post_credentials(http, &self.settings, Vec::new(), &[]).await
    }
}

async fn post_credentials(
    http: &reqwest::Client,
    settings: &LoginSettings,
    mut fields: Vec<(String, String)>,
    cookies: &[(String, String)],
) -> EngineResult<SessionCredential> {
    fields.retain(|(name, _)| name != USERNAME_FIELD && name != PASSWORD_FIELD);
    fields.push((USERNAME_FIELD.to_string(), settings.login.clone()));
    fields.push((PASSWORD_FIELD.to_string(), settings.password.clone()));

    let url = settings.login_url();
    let mut request = http.post(&url).form(&fields);
    if !cookies.is_empty() {
        let header = cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        request = request.header(COOKIE, header);
    }

    let response = request
        .send()
        .await
        .map_err(|e| request_failed(&url, e))?;

    // Redirects are not followed, so a 3xx is the usual answer to a good login.
    let status = response.status();
    if status != StatusCode::OK && !status.is_redirection() {
        return Err(EngineError::authentication(format!(
            "credential post: expected {} or a redirect, got {}",
            StatusCode::OK.as_u16(),
            status.as_u16()
        )));
    }

    extract_credential(&response, &settings.session_cookie)
}

/// Picks the session cookie out of a login response.
///
/// Exactly one non-empty cookie named `cookie_name` must be set; zero or
/// several is an [`EngineError::AuthenticationError`].
pub fn extract_credential(
    response: &reqwest::Response,
    cookie_name: &str,
) -> EngineResult<SessionCredential> {
    let mut matching: Vec<(String, String)> = response_cookies(response)
        .into_iter()
        .filter(|(name, _)| name == cookie_name)
        .collect();

    if matching.len() != 1 {
        return Err(EngineError::authentication(format!(
            "expected exactly one '{}' cookie, got {}",
            cookie_name,
            matching.len()
        )));
    }

    let (name, value) = matching.remove(0);
    if value.is_empty() {
        return Err(EngineError::authentication(format!(
            "'{}' cookie is empty",
            cookie_name
        )));
    }
    Ok(SessionCredential::new(name, value))
}

/// Name and value of every cookie the response sets.
fn response_cookies(response: &reqwest::Response) -> Vec<(String, String)> {
    response
        .cookies()
        .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
        .collect()
}

/// Returns the named inputs of the first form on the page.
///
/// Inputs lacking a `name` or a `value` are skipped.
fn harvest_form_fields(body: &str) -> EngineResult<Vec<(String, String)>> {
    let document = Html::parse_document(body);
    let form = document
        .select(&selector("form")?)
        .next()
        .ok_or_else(|| EngineError::authentication("login page has no form element"))?;

    let inputs = selector("input")?;
    Ok(form
        .select(&inputs)
        .filter_map(|input| {
            let element = input.value();
            let name = element.attr("name").filter(|name| !name.is_empty())?;
            let value = element.attr("value").filter(|value| !value.is_empty())?;
            Some((name.to_string(), value.to_string()))
        })
        .collect())
}

fn selector(css: &str) -> EngineResult<Selector> {
    Selector::parse(css)
        .map_err(|e| EngineError::authentication(format!("invalid selector '{}': {:?}", css, e)))
}

fn request_failed(url: &str, error: reqwest::Error) -> EngineError {
    EngineError::RequestFailed {
        url: url.to_string(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::SET_COOKIE;

    fn response_with_cookies(cookies: &[&str]) -> reqwest::Response {
        let mut builder = axum::http::Response::builder().status(302);
        for cookie in cookies {
            builder = builder.header(SET_COOKIE, *cookie);
        }
        reqwest::Response::from(builder.body("").unwrap())
    }

    #[test]
    fn test_extract_single_session_cookie() {
        let response = response_with_cookies(&[
            "tracking=abc; Path=/",
            "authToken=s3ss10n; Path=/; HttpOnly; Secure",
        ]);

        let credential = extract_credential(&response, "authToken").unwrap();
        assert_eq!(credential.name(), "authToken");
        assert_eq!(credential.cookie_header(), "authToken=s3ss10n");
    }

    #[test]
    fn test_extract_rejects_two_session_cookies() {
        let response =
            response_with_cookies(&["authToken=one; Path=/", "authToken=two; Path=/"]);

        match extract_credential(&response, "authToken") {
            Err(EngineError::AuthenticationError { message }) => {
                assert!(message.contains("got 2"));
            }
            other => panic!("Expected AuthenticationError, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_keeps_equals_signs_in_value() {
        let response = response_with_cookies(&[
            "authToken=YWJj=; Expires=Wed, 21 Oct 2026 07:28:00 GMT; HttpOnly",
        ]);

        let credential = extract_credential(&response, "authToken").unwrap();
        assert_eq!(credential.cookie_header(), "authToken=YWJj=");
    }

    #[test]
    fn test_extract_rejects_missing_session_cookie() {
        let response = response_with_cookies(&["tracking=abc"]);
        assert!(matches!(
            extract_credential(&response, "authToken"),
            Err(EngineError::AuthenticationError { .. })
        ));
    }

    #[test]
    fn test_extract_rejects_cleared_session_cookie() {
        let response = response_with_cookies(&["authToken=; Max-Age=0"]);
        assert!(matches!(
            extract_credential(&response, "authToken"),
            Err(EngineError::AuthenticationError { .. })
        ));
    }

    #[test]
    fn test_harvest_form_fields_keeps_named_inputs_with_values() {
        let page = r#"
            <html><body>
              <form method="post" action="/identity/login">
                <input type="hidden" name="__RequestVerificationToken" value="tok123">
                <input type="hidden" name="ReturnUrl" value="/home">
                <input type="text" name="UserName" value="">
                <input type="password" name="Password">
                <input type="submit" value="Sign in">
              </form>
              <form><input name="other" value="ignored"></form>
            </body></html>
        "#;

        let fields = harvest_form_fields(page).unwrap();
        assert_eq!(
            fields,
            vec![
                (
                    "__RequestVerificationToken".to_string(),
                    "tok123".to_string()
                ),
                ("ReturnUrl".to_string(), "/home".to_string()),
            ]
        );
    }

    #[test]
    fn test_harvest_form_fields_requires_form() {
        let page = "<html><body><p>Maintenance</p></body></html>";
        match harvest_form_fields(page) {
            Err(EngineError::AuthenticationError { message }) => {
                assert!(message.contains("no form element"));
            }
            other => panic!("Expected AuthenticationError, got {:?}", other),
        }
    }

    #[test]
    fn test_credential_debug_redacts_value() {
        let credential = SessionCredential::new("authToken", "very-secret");
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn test_login_settings_trim_trailing_slash() {
        let settings = LoginSettings::new("https://hr.example/", "robot", "pw", "authToken");
        assert_eq!(settings.login_url(), "https://hr.example/identity/login");
    }
}
