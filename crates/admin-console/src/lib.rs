//! Admin Console - Leptos/WASM Frontend
//!
//! Login, a protected sidebar/header shell and user management against the
//! console HTTP API.

use std::rc::Rc;

use leptos::*;
use leptos_router::*;

pub mod api;
pub mod auth;
pub mod components;
pub mod config;
pub mod error;
pub mod pages;
pub mod repository;
pub mod state;
pub mod storage;
pub mod types;
pub mod users;
pub mod validation;

use auth::{GuestRoute, LoginPage, ProtectedRoute};
use components::{layout::AppShell, toast::ToastContainer};
use config::{provide_config, ConsoleConfig};
use pages::{DashboardPage, UserManagementPage};
use state::{provide_app_state, AppState};
use storage::BrowserStorage;

/// Main application component
#[component]
pub fn App() -> impl IntoView {
    let config = provide_config(ConsoleConfig::from_build_env());
    provide_app_state(AppState::new(
        Rc::new(BrowserStorage),
        config.mobile_breakpoint_px,
        config.toast_duration_ms,
    ));

    view! {
        <Router>
            <Routes>
                <Route path="/login" view=|| view! {
                    <GuestRoute>
                        <LoginPage />
                    </GuestRoute>
                } />

                // Protected shell; pages render into its outlet
                <Route path="" view=|| view! {
                    <ProtectedRoute>
                        <AppShell />
                    </ProtectedRoute>
                }>
                    <Route path="dashboard" view=DashboardPage />
                    <Route path="user-management" view=UserManagementPage />
                    <Route path="" view=|| view! { <Redirect path="/dashboard" /> } />
                </Route>

                <Route path="/*any" view=|| view! { <Redirect path="/dashboard" /> } />
            </Routes>
            <ToastContainer />
        </Router>
    }
}

/// WASM entry point
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    mount_to_body(App);
}
