//! Access to the external HR service.
//!
//! This module covers logging in ([`LoginFlow`]), caching the session
//! ([`SessionManager`]), and fetching the user directory and the leave
//! calendar ([`HrClient`]).

mod client;
mod login;
mod period;
mod session;

pub use client::{HrClient, HrDirectory, LEAVES_PATH, USERS_PATH, decode_items};
pub use login::{
    DirectLogin, FormLogin, LOGIN_PATH, LoginFlow, LoginSettings, SessionCredential,
    extract_credential, login_flow,
};
pub use period::LeaveWindow;
pub use session::SessionManager;
