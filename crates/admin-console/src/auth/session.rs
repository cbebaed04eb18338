//! Session Management
//!
//! `SessionStore` owns every persisted auth key. The guards below read it on
//! each navigation.

use std::rc::Rc;

use chrono::{DateTime, NaiveDateTime, Utc};
use gloo_timers::callback::Interval;
use leptos::*;
use leptos_router::{use_location, use_navigate, NavigateOptions};

use crate::state::use_app_state;
use crate::storage::KeyValueStore;
use crate::types::{Company, LoginSuccess, SessionUser};

/// How often an open protected page re-checks the token expiry
const EXPIRY_CHECK_INTERVAL_MS: u32 = 60 * 1000;

/// Storage keys
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const USER: &str = "user";
    pub const TOKEN_EXPIRY: &str = "token_expiry";
    pub const SELECTED_COMPANY: &str = "selected_company";
    pub const COMPANY_ID: &str = "company_id";
    pub const COMPANY_NAME: &str = "company_name";
    pub const REMEMBER_ME: &str = "remember_me";
    pub const SAVED_EMAIL: &str = "saved_email";

    /// Removed when the session expires
    pub const AUTH: [&str; 4] = [ACCESS_TOKEN, REFRESH_TOKEN, USER, TOKEN_EXPIRY];
    /// Removed on logout, together with `AUTH`
    pub const COMPANY: [&str; 3] = [SELECTED_COMPANY, COMPANY_ID, COMPANY_NAME];
}

/// Outcome of a guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
    /// The stored expiry has passed; auth keys were cleared
    Expired,
}

/// Read/write access to the persisted session
#[derive(Clone)]
pub struct SessionStore {
    storage: Rc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(storage: Rc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn token(&self) -> Option<String> {
        self.non_empty(keys::ACCESS_TOKEN)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.non_empty(keys::REFRESH_TOKEN)
    }

    /// Stored profile; unreadable JSON counts as absent
    pub fn user(&self) -> Option<SessionUser> {
        let raw = self.non_empty(keys::USER)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Stored user is not valid JSON");
                None
            }
        }
    }

    /// Raw expiry string as stored
    pub fn expiry(&self) -> Option<String> {
        self.non_empty(keys::TOKEN_EXPIRY)
    }

    pub fn company_id(&self) -> Option<String> {
        self.non_empty(keys::COMPANY_ID)
    }

    pub fn selected_company(&self) -> Option<Company> {
        let raw = self.non_empty(keys::SELECTED_COMPANY)?;
        serde_json::from_str(&raw).ok()
    }

    /// Token and user both present
    pub fn is_signed_in(&self) -> bool {
        self.token().is_some() && self.storage.get(keys::USER).is_some_and(|u| !u.is_empty())
    }

    /// Guard check; an elapsed expiry clears the auth keys
    pub fn check_access(&self, now: DateTime<Utc>) -> Access {
        if !self.is_signed_in() {
            return Access::Denied;
        }

        if let Some(raw) = self.expiry() {
            match parse_expiry(&raw) {
                Some(expires_at) if expires_at < now => {
                    self.clear_auth();
                    return Access::Expired;
                }
                Some(_) => {}
                None => tracing::warn!(expiry = %raw, "Ignoring unparseable token expiry"),
            }
        }

        Access::Granted
    }

    /// Persist everything a successful login returned
    pub fn persist_login(&self, login: &LoginSuccess) {
        self.storage.set(keys::ACCESS_TOKEN, &login.access_token);

        match login.refresh_token.as_deref() {
            Some(token) => self.storage.set(keys::REFRESH_TOKEN, token),
            None => self.storage.remove(keys::REFRESH_TOKEN),
        }

        match serde_json::to_string(&login.user) {
            Ok(json) => self.storage.set(keys::USER, &json),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize user"),
        }

        match login.expires_at.as_deref() {
            Some(expiry) => self.storage.set(keys::TOKEN_EXPIRY, expiry),
            None => self.storage.remove(keys::TOKEN_EXPIRY),
        }

        if let Some(company) = login.companies.first() {
            self.select_company(company);
        }
    }

    pub fn select_company(&self, company: &Company) {
        if let Ok(json) = serde_json::to_string(company) {
            self.storage.set(keys::SELECTED_COMPANY, &json);
        }
        self.storage.set(keys::COMPANY_ID, company.id.as_str());
        self.storage.set(keys::COMPANY_NAME, &company.company_name);
    }

    /// Remove token, refresh token, user and expiry; leave everything else
    pub fn clear_auth(&self) {
        for key in keys::AUTH {
            self.storage.remove(key);
        }
    }

    /// Logout: auth and company keys; the remembered email stays
    pub fn clear_all(&self) {
        self.clear_auth();
        for key in keys::COMPANY {
            self.storage.remove(key);
        }
    }

    /// Save (`Some`) or forget (`None`) the login email
    pub fn remember_email(&self, email: Option<&str>) {
        match email {
            Some(email) => {
                self.storage.set(keys::REMEMBER_ME, "true");
                self.storage.set(keys::SAVED_EMAIL, email);
            }
            None => {
                self.storage.remove(keys::REMEMBER_ME);
                self.storage.remove(keys::SAVED_EMAIL);
            }
        }
    }

    /// Email to pre-fill, only when remember-me was ticked
    pub fn remembered_email(&self) -> Option<String> {
        if self.storage.get(keys::REMEMBER_ME).as_deref() != Some("true") {
            return None;
        }
        self.non_empty(keys::SAVED_EMAIL)
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        self.storage.get(key).filter(|v| !v.is_empty())
    }
}

/// Parse an expiry as RFC 3339, or `YYYY-MM-DD HH:MM:SS` in UTC
pub fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn replace() -> NavigateOptions {
    NavigateOptions {
        replace: true,
        ..Default::default()
    }
}

/// Protected route wrapper
/// Re-checks the session on every path change (and once a minute) and
/// redirects when it fails
#[component]
pub fn ProtectedRoute(
    children: Children,
    #[prop(default = "/login")] redirect: &'static str,
) -> impl IntoView {
    let state = use_app_state();
    let navigate = use_navigate();
    let location = use_location();

    let access = create_rw_signal(state.check_access());
    let tick = create_rw_signal(0u32);

    let interval = Interval::new(EXPIRY_CHECK_INTERVAL_MS, move || tick.update(|t| *t = t.wrapping_add(1)));
    on_cleanup(move || { interval.cancel(); });

    create_effect(move |_| {
        location.pathname.track();
        tick.track();
        let current = state.check_access();
        access.set(current);
        if current != Access::Granted {
            navigate(redirect, replace());
        }
    });

    let children = store_value(children());

    view! {
        <Show
            when=move || access.get() == Access::Granted
            fallback=|| view! {} // Will redirect via effect
        >
            {children.get_value()}
        </Show>
    }
}

/// Wraps the login page; signed-in visitors go straight to the dashboard
#[component]
pub fn GuestRoute(
    children: Children,
    #[prop(default = "/dashboard")] redirect: &'static str,
) -> impl IntoView {
    let state = use_app_state();
    let navigate = use_navigate();

    let signed_in = move || state.user.get().is_some() && state.session.is_signed_in();
    let signed_in_effect = signed_in.clone();

    create_effect(move |_| {
        if signed_in_effect() {
            navigate(redirect, replace());
        }
    });

    let children = store_value(children());

    view! {
        <Show when=move || !signed_in() fallback=|| view! {}>
            {children.get_value()}
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::types::RecordId;
    use chrono::TimeZone;

    fn store() -> (Rc<MemoryStorage>, SessionStore) {
        let storage = Rc::new(MemoryStorage::new());
        (storage.clone(), SessionStore::new(storage))
    }

    fn login(expires_at: Option<&str>) -> LoginSuccess {
        LoginSuccess {
            access_token: "tok".into(),
            refresh_token: Some("ref".into()),
            expires_at: expires_at.map(str::to_string),
            user: SessionUser {
                name: Some("Admin 2".into()),
                ..Default::default()
            },
            companies: vec![Company {
                id: RecordId::from(4),
                company_name: "Acme".into(),
                extra: Default::default(),
            }],
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_persist_and_read_back() {
        let (storage, session) = store();
        session.persist_login(&login(Some("2030-01-01T00:00:00Z")));

        assert_eq!(session.token().as_deref(), Some("tok"));
        assert_eq!(session.refresh_token().as_deref(), Some("ref"));
        assert_eq!(session.user().unwrap().name.as_deref(), Some("Admin 2"));
        assert_eq!(session.company_id().as_deref(), Some("4"));
        assert_eq!(session.selected_company().unwrap().company_name, "Acme");
        assert_eq!(storage.get(keys::COMPANY_NAME).as_deref(), Some("Acme"));
        assert!(session.is_signed_in());
    }

    #[test]
    fn test_access_denied_without_user() {
        let (storage, session) = store();
        storage.set(keys::ACCESS_TOKEN, "tok");
        assert_eq!(session.check_access(at(2026, 1, 1)), Access::Denied);
    }

    #[test]
    fn test_expired_session_clears_only_auth_keys() {
        let (storage, session) = store();
        session.persist_login(&login(Some("2025-06-01 12:00:00")));
        session.remember_email(Some("admin2@gmail.com"));
        storage.set("theme", "dark");

        assert_eq!(session.check_access(at(2025, 1, 1)), Access::Granted);
        assert_eq!(session.check_access(at(2026, 1, 1)), Access::Expired);

        for key in keys::AUTH {
            assert!(!storage.contains(key), "{key} should be cleared");
        }
        assert!(storage.contains(keys::COMPANY_ID));
        assert_eq!(storage.get("theme").as_deref(), Some("dark"));
        assert_eq!(session.remembered_email().as_deref(), Some("admin2@gmail.com"));
        assert_eq!(session.check_access(at(2026, 1, 1)), Access::Denied);
    }

    #[test]
    fn test_unparseable_expiry_is_ignored() {
        let (storage, session) = store();
        session.persist_login(&login(None));
        storage.set(keys::TOKEN_EXPIRY, "next tuesday");
        assert_eq!(session.check_access(at(2026, 1, 1)), Access::Granted);
    }

    #[test]
    fn test_corrupt_user_reads_as_absent() {
        let (storage, session) = store();
        storage.set(keys::USER, "{not json");
        assert!(session.user().is_none());
    }

    #[test]
    fn test_clear_all_keeps_remembered_email() {
        let (storage, session) = store();
        session.persist_login(&login(None));
        session.remember_email(Some("admin2@gmail.com"));

        session.clear_all();
        assert!(!session.is_signed_in());
        assert!(!storage.contains(keys::COMPANY_ID));
        assert_eq!(session.remembered_email().as_deref(), Some("admin2@gmail.com"));

        session.remember_email(None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_parse_expiry_formats() {
        assert_eq!(parse_expiry("2026-03-01T10:00:00+02:00"), Some(Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()));
        assert_eq!(parse_expiry("2026-03-01 10:00:00"), Some(Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()));
        assert_eq!(parse_expiry("garbage"), None);
    }
}
