//! Login Page Component

use leptos::*;
use leptos_router::*;

use crate::api::ApiClient;
use crate::auth::session::SessionStore;
use crate::components::{forms::*, icons::*, spinner::*};
use crate::config::use_config;
use crate::error::{ApiError, ApiResult};
use crate::state::use_app_state;
use crate::types::{LoginRequest, LoginResponse, LoginSuccess};
use crate::validation::is_valid_email;

pub const INVALID_FORM_MESSAGE: &str = "Please enter valid email and password";

/// Values on the login screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Caller IP, empty when the lookup failed
    pub ip_address: String,
    pub remember_me: bool,
}

impl LoginForm {
    pub fn is_valid(&self) -> bool {
        is_valid_email(self.email.trim()) && !self.password.trim().is_empty()
    }

    pub fn request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            ip_address: self.ip_address.clone(),
        }
    }
}

/// A 2xx login body only counts as a login when it carries a token
pub fn interpret_login(response: LoginResponse) -> Result<LoginSuccess, String> {
    match response.access_token.filter(|t| !t.is_empty()) {
        Some(access_token) => Ok(LoginSuccess {
            access_token,
            refresh_token: response.refresh_token,
            expires_at: response.expires_at,
            user: response.user.unwrap_or_default(),
            companies: response.companies,
        }),
        None => Err(response
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Unexpected response from server".to_string())),
    }
}

/// Inline error text for a failed login request
pub fn login_error_message(err: &ApiError) -> String {
    let server = err.server_message().map(str::to_string);

    match err {
        ApiError::Http { status: 422, .. } => {
            let joined = err
                .field_errors()
                .map(|errors| {
                    errors
                        .values()
                        .flatten()
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            if joined.is_empty() {
                "Validation failed".to_string()
            } else {
                joined
            }
        }
        ApiError::Http { status: 401, .. } => {
            server.unwrap_or_else(|| "The login credentials are incorrect.".to_string())
        }
        ApiError::Http { status: 500, .. } => {
            server.unwrap_or_else(|| "Something went wrong. Please try again later.".to_string())
        }
        ApiError::Http { status, .. } => {
            server.unwrap_or_else(|| format!("Error {}: Please try again", status))
        }
        ApiError::Network(_) => "Network error. Please check your connection.".to_string(),
        ApiError::Rejected { .. } | ApiError::Decode(_) | ApiError::Request(_) => {
            server.unwrap_or_else(|| "An error occurred. Please try again.".to_string())
        }
    }
}

/// Persist a successful login (and the remember-me choice); nothing is
/// written when the attempt failed
pub fn complete_login(
    session: &SessionStore,
    form: &LoginForm,
    result: ApiResult<LoginResponse>,
) -> Result<LoginSuccess, String> {
    let success = result
        .map_err(|e| {
            tracing::warn!(error = %e, "Login request failed");
            login_error_message(&e)
        })
        .and_then(interpret_login)?;

    session.persist_login(&success);
    let email = form.email.trim();
    session.remember_email(form.remember_me.then_some(email));

    Ok(success)
}

/// Login page component
#[component]
pub fn LoginPage() -> impl IntoView {
    let state = use_app_state();
    let config = use_config();
    let navigate = use_navigate();
    let client = ApiClient::new(config, state.session.clone());

    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let remember_me = create_rw_signal(false);
    let ip_address = create_rw_signal(String::new());
    let loading = create_rw_signal(false);
    let error = create_rw_signal::<Option<String>>(None);

    if let Some(saved) = state.session.remembered_email() {
        email.set(saved);
        remember_me.set(true);
    }

    // Best effort; the login still goes ahead without it
    {
        let client = client.clone();
        spawn_local(async move {
            match client.client_ip().await {
                Ok(ip) => ip_address.set(ip),
                Err(e) => tracing::debug!(error = %e, "IP lookup failed"),
            }
        });
    }

    let current_form = move || LoginForm {
        email: email.get(),
        password: password.get(),
        ip_address: ip_address.get(),
        remember_me: remember_me.get(),
    };
    let form_valid = create_memo(move |_| current_form().is_valid());

    let handle_submit = move |e: web_sys::SubmitEvent| {
        e.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let form = current_form();
        if !form.is_valid() {
            error.set(Some(INVALID_FORM_MESSAGE.to_string()));
            return;
        }

        loading.set(true);
        error.set(None);

        let state = state.clone();
        let client = client.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = client.login(&form.request()).await;
            match complete_login(&state.session, &form, result) {
                Ok(success) => {
                    state.set_auth(success.user);
                    navigate("/dashboard", Default::default());
                }
                Err(message) => error.set(Some(message)),
            }
            loading.set(false);
        });
    };

    let clear_error = Callback::new(move |_: String| error.set(None));

    view! {
        <div class="auth-page">
            <div class="auth-logo-text">"LOGO"</div>
            <div class="auth-container">
                <div class="auth-header">
                    <h1 class="auth-title">"Sign in"</h1>
                    <p class="auth-subtitle">"Log in to manage your account"</p>
                </div>

                <form class="auth-form" on:submit=handle_submit novalidate=true>
                    <TextInput
                        value=email
                        input_type=InputType::Email
                        label="Email"
                        placeholder="Enter your email"
                        required=true
                        disabled=Signal::from(loading)
                        icon=view! { <IconMail size=IconSize::Sm /> }.into_view()
                        on_input=clear_error
                    />

                    <TextInput
                        value=password
                        input_type=InputType::Password
                        label="Password"
                        placeholder="Enter your password"
                        required=true
                        disabled=Signal::from(loading)
                        icon=view! { <IconLock size=IconSize::Sm /> }.into_view()
                        on_input=clear_error
                    />

                    <div class="auth-options">
                        <Checkbox
                            checked=Signal::from(remember_me)
                            label="Remember me"
                            on_toggle=Callback::new(move |checked: bool| remember_me.set(checked))
                        />
                        <a href="#forgot" class="link">"Forgot password?"</a>
                    </div>

                    <Show when=move || error.get().is_some()>
                        <div class="alert alert-error">
                            <IconAlertCircle size=IconSize::Sm />
                            <span>{move || error.get().unwrap_or_default()}</span>
                        </div>
                    </Show>

                    <button
                        type="submit"
                        class="btn btn-primary btn-block"
                        disabled=move || loading.get() || !form_valid.get()
                    >
                        <Show when=move || loading.get() fallback=|| "Sign In">
                            <Spinner size=SpinnerSize::Sm />
                            <span>"Signing in..."</span>
                        </Show>
                    </button>
                </form>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::keys;
    use crate::storage::{KeyValueStore, MemoryStorage};
    use crate::types::{Company, RecordId, SessionUser};
    use std::collections::BTreeMap;
    use std::rc::Rc;

    fn session() -> (Rc<MemoryStorage>, SessionStore) {
        let storage = Rc::new(MemoryStorage::new());
        (storage.clone(), SessionStore::new(storage))
    }

    fn form(remember_me: bool) -> LoginForm {
        LoginForm {
            email: "admin@example.com".into(),
            password: "secret".into(),
            ip_address: "203.0.113.9".into(),
            remember_me,
        }
    }

    fn http(status: u16, message: Option<&str>) -> ApiError {
        ApiError::Http {
            status,
            message: message.map(str::to_string),
            field_errors: BTreeMap::new(),
        }
    }

    fn granted() -> LoginResponse {
        LoginResponse {
            access_token: Some("tok".into()),
            refresh_token: Some("ref".into()),
            expires_at: None,
            user: Some(SessionUser {
                name: Some("Admin".into()),
                ..Default::default()
            }),
            companies: vec![Company {
                id: RecordId::from(7),
                company_name: "Acme".into(),
                extra: Default::default(),
            }],
            message: None,
        }
    }

    #[test]
    fn test_form_validity() {
        assert!(form(false).is_valid());

        let mut bad = form(false);
        bad.email = "admin@".into();
        assert!(!bad.is_valid());

        let mut blank = form(false);
        blank.password = "   ".into();
        assert!(!blank.is_valid());
    }

    #[test]
    fn test_locked_response_persists_nothing() {
        let (storage, session) = session();
        let response = LoginResponse {
            message: Some("locked".into()),
            ..Default::default()
        };

        let outcome = complete_login(&session, &form(true), Ok(response));
        assert_eq!(outcome.unwrap_err(), "locked");
        assert!(storage.is_empty());
    }

    #[test]
    fn test_tokenless_response_without_message() {
        assert_eq!(
            interpret_login(LoginResponse::default()).unwrap_err(),
            "Unexpected response from server"
        );
    }

    #[test]
    fn test_success_persists_session_and_company() {
        let (storage, session) = session();
        let outcome = complete_login(&session, &form(true), Ok(granted()));

        assert!(outcome.is_ok());
        assert_eq!(storage.get(keys::ACCESS_TOKEN).as_deref(), Some("tok"));
        assert_eq!(storage.get(keys::COMPANY_ID).as_deref(), Some("7"));
        assert_eq!(storage.get(keys::COMPANY_NAME).as_deref(), Some("Acme"));
        assert_eq!(session.remembered_email().as_deref(), Some("admin@example.com"));
    }

    #[test]
    fn test_unchecked_remember_me_clears_saved_email() {
        let (storage, session) = session();
        session.remember_email(Some("old@example.com"));

        complete_login(&session, &form(false), Ok(granted())).unwrap();
        assert!(!storage.contains(keys::SAVED_EMAIL));
        assert!(!storage.contains(keys::REMEMBER_ME));
    }

    #[test]
    fn test_failed_request_persists_nothing() {
        let (storage, session) = session();
        let outcome = complete_login(&session, &form(true), Err(http(401, None)));

        assert_eq!(outcome.unwrap_err(), "The login credentials are incorrect.");
        assert!(storage.is_empty());
    }

    #[test]
    fn test_error_messages_by_status() {
        let mut field_errors = BTreeMap::new();
        field_errors.insert("email".to_string(), vec!["Email is invalid".to_string()]);
        field_errors.insert(
            "password".to_string(),
            vec!["Password is required".to_string(), "Too short".to_string()],
        );
        let validation = ApiError::Http {
            status: 422,
            message: Some("The given data was invalid.".into()),
            field_errors,
        };
        assert_eq!(
            login_error_message(&validation),
            "Email is invalid, Password is required, Too short"
        );
        assert_eq!(login_error_message(&http(422, None)), "Validation failed");

        assert_eq!(login_error_message(&http(401, Some("Account disabled"))), "Account disabled");
        assert_eq!(
            login_error_message(&http(500, None)),
            "Something went wrong. Please try again later."
        );
        assert_eq!(login_error_message(&http(429, None)), "Error 429: Please try again");
        assert_eq!(
            login_error_message(&ApiError::Network("offline".into())),
            "Network error. Please check your connection."
        );
    }
}
