//! Top Header Component

use leptos::*;
use leptos_router::*;

use crate::components::icons::*;
use crate::state::use_app_state;

/// Title shown in the header for a route path
pub fn page_title(path: &str) -> &'static str {
    let path = path.trim_end_matches('/');
    if path.starts_with("/user-management") {
        "User Management"
    } else if path.starts_with("/team") {
        "Team"
    } else if path.starts_with("/settings") {
        "Settings"
    } else {
        "Dashboard"
    }
}

/// Top header with the menu toggle and the signed-in operator
#[component]
pub fn Header() -> impl IntoView {
    let state = use_app_state();
    let location = use_location();
    let layout = state.layout;

    let title = move || page_title(&location.pathname.get());
    let shifted = move || {
        let layout = layout.get();
        layout.sidebar_open && !layout.is_mobile
    };

    let state_for_toggle = state.clone();
    let state_for_name = state.clone();

    view! {
        <header class=move || format!("top-navbar {}", if shifted() { "sidebar-open" } else { "" })>
            <div class="header-left">
                <button class="btn btn-ghost menu-toggle" title="Toggle menu" on:click=move |_| state_for_toggle.toggle_sidebar()>
                    <IconMenu />
                </button>
                <h1 class="page-title">{title}</h1>
            </div>

            <div class="header-right">
                <div class="user-profile">
                    <div class="avatar">
                        <IconUser size=IconSize::Md />
                    </div>
                    <div class="user-info">
                        <span class="user-name">{move || state_for_name.display_name()}</span>
                        <span class="user-role">{move || state.display_role()}</span>
                    </div>
                </div>
            </div>
        </header>
    }
}
