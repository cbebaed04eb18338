//! Sidebar Navigation Component

use leptos::*;
use leptos_router::*;

use crate::components::icons::*;
use crate::state::use_app_state;

/// Sidebar navigation item
#[component]
fn SidebarItem<F, V>(
    #[prop(into)] href: String,
    #[prop(into)] label: String,
    icon: F,
) -> impl IntoView
where
    F: Fn() -> V + 'static,
    V: IntoView,
{
    let state = use_app_state();
    let location = use_location();

    let is_active = {
        let href = href.clone();
        move || location.pathname.get().starts_with(&href)
    };

    view! {
        <li on:click=move |_| state.close_sidebar_on_mobile()>
            <A
                href=href
                class=move || format!("nav-link {}", if is_active() { "active" } else { "" })
            >
                <span class="nav-icon">{icon()}</span>
                <span class="nav-label">{label}</span>
                <IconChevronRight size=IconSize::Xs class="nav-arrow" />
            </A>
        </li>
    }
}

/// Sidebar section header
#[component]
fn SidebarSection(#[prop(into)] label: String, children: Children) -> impl IntoView {
    view! {
        <div class="nav-section">
            <h3 class="section-title">{label}</h3>
            <ul class="nav-menu">{children()}</ul>
        </div>
    }
}

/// Main sidebar component
#[component]
pub fn Sidebar() -> impl IntoView {
    let state = use_app_state();
    let navigate = use_navigate();
    let layout = state.layout;

    let is_open = move || layout.get().sidebar_open;
    let is_mobile = move || layout.get().is_mobile;

    let state_for_close = state.clone();
    let on_logout = move |_| {
        state.sign_out();
        navigate("/login", Default::default());
    };

    view! {
        <aside class=move || format!("sidebar {}", if is_open() { "open" } else { "" })>
            <div class="sidebar-header">
                <div class="logo-container">
                    <span class="logo-text">"LOGO"</span>
                </div>
                <Show when=is_mobile>
                    <button class="btn btn-ghost close-sidebar" on:click={
                        let state = state_for_close.clone();
                        move |_| state.close_sidebar_on_mobile()
                    }>
                        <IconX />
                    </button>
                </Show>
            </div>

            <nav class="sidebar-nav">
                <SidebarSection label="MAIN MENU">
                    <SidebarItem href="/dashboard" label="Dashboard" icon=|| view! { <IconDashboard /> } />
                    <SidebarItem href="/user-management" label="User Management" icon=|| view! { <IconUsers /> } />
                    <SidebarItem href="/team" label="Team" icon=|| view! { <IconLayers /> } />
                </SidebarSection>

                <SidebarSection label="SETTINGS">
                    <SidebarItem href="/settings" label="Settings" icon=|| view! { <IconSettings /> } />
                </SidebarSection>
            </nav>

            <div class="sidebar-footer">
                <button class="btn btn-ghost logout-btn" on:click=on_logout>
                    <IconLogout />
                    <span>"Logout"</span>
                </button>
            </div>
        </aside>
    }
}
