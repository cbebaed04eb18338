//! Application Shell
//!
//! Sidebar, header and the routed page for every signed-in screen.

use leptos::*;
use leptos_router::*;

use crate::components::header::Header;
use crate::components::sidebar::Sidebar;
use crate::state::use_app_state;

fn viewport_width() -> Option<f64> {
    window().inner_width().ok().and_then(|w| w.as_f64())
}

/// Layout for protected routes; nested routes render into the outlet
#[component]
pub fn AppShell() -> impl IntoView {
    let state = use_app_state();
    let layout = state.layout;

    if let Some(width) = viewport_width() {
        state.on_resize(width);
    }

    let resize = window_event_listener(ev::resize, {
        let state = state.clone();
        move |_| {
            if let Some(width) = viewport_width() {
                state.on_resize(width);
            }
        }
    });
    on_cleanup(move || resize.remove());

    let sidebar_open = move || layout.get().sidebar_open;
    let shows_overlay = move || layout.get().shows_overlay();

    view! {
        <div class="layout-container">
            <Sidebar />
            <div class=move || format!("main-content {}", if sidebar_open() { "sidebar-open" } else { "" })>
                <Header />
                <main class="content-area">
                    <Outlet />
                </main>
            </div>

            <Show when=shows_overlay>
                <div class="sidebar-overlay" on:click={
                    let state = state.clone();
                    move |_| state.close_sidebar_on_mobile()
                }></div>
            </Show>
        </div>
    }
}
