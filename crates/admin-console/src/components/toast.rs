//! Toast Notification Components

use crate::components::icons::*;
use crate::state::{use_app_state, Toast, ToastType};
use leptos::*;

/// Toast container component - renders all active toasts
#[component]
pub fn ToastContainer() -> impl IntoView {
    let state = use_app_state();
    let toasts = state.toasts;

    view! {
        <div class="toast-container">
            <For
                each=move || toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let state = state.clone();
                    view! { <ToastItem toast=toast on_close=Callback::new(move |_| state.remove_toast(id)) /> }
                }
            />
        </div>
    }
}

/// Individual toast item
#[component]
fn ToastItem(toast: Toast, on_close: Callback<()>) -> impl IntoView {
    let exiting = create_rw_signal(false);

    let handle_close = move |_| {
        exiting.set(true);
        set_timeout(move || on_close.call(()), std::time::Duration::from_millis(300));
    };

    let toast_type = toast.toast_type;

    view! {
        <div
            class=move || format!(
                "toast {} {}",
                toast_type.class(),
                if exiting.get() { "toast-exit" } else { "toast-enter" }
            )
            role="status"
        >
            <div class="toast-icon">
                {match toast_type {
                    ToastType::Success => view! { <IconCheckCircle size=IconSize::Md /> }.into_view(),
                    ToastType::Error => view! { <IconXCircle size=IconSize::Md /> }.into_view(),
                    ToastType::Info => view! { <IconInfo size=IconSize::Md /> }.into_view(),
                }}
            </div>
            <div class="toast-content">
                <div class="toast-title">{toast.title}</div>
                // Validation summaries span several lines
                <div class="toast-message" style="white-space: pre-line">{toast.message}</div>
            </div>
            <button class="toast-close" on:click=handle_close>
                <IconX size=IconSize::Sm />
            </button>
        </div>
    }
}
