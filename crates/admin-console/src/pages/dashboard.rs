//! Dashboard Page

use leptos::*;
use leptos_router::*;

use crate::components::icons::*;
use crate::state::use_app_state;

/// Landing page after sign-in
#[component]
pub fn DashboardPage() -> impl IntoView {
    let state = use_app_state();
    let name = move || state.display_name();

    view! {
        <div class="dashboard-page">
            <div class="welcome-section">
                <h1>"Welcome to the Dashboard!"</h1>
                <p class="page-subtitle">"Signed in as " {name}</p>
                <p>"Select a menu option from the sidebar to get started."</p>
            </div>

            <div class="quick-actions">
                <A href="/user-management" class="quick-action">
                    <IconUsers size=IconSize::Lg />
                    <span>"Manage Users"</span>
                </A>
            </div>
        </div>
    }
}
