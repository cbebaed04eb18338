//! Modal Dialog Components

use crate::components::icons::*;
use leptos::*;

/// Modal size variants
#[derive(Debug, Clone, Copy, Default)]
pub enum ModalSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl ModalSize {
    pub fn class(&self) -> &'static str {
        match self {
            Self::Small => "modal-sm",
            Self::Medium => "modal-md",
            Self::Large => "modal-lg",
        }
    }
}

/// Modal component
///
/// Visibility is owned by the caller; the close button, backdrop and Escape
/// all go through `on_close`.
#[component]
pub fn Modal(
    #[prop(into)] show: Signal<bool>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(optional, into)] title: MaybeSignal<String>,
    #[prop(default = ModalSize::Medium)] size: ModalSize,
    #[prop(default = true)] close_on_backdrop: bool,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let escape = window_event_listener(ev::keydown, move |e| {
        if e.key() == "Escape" && show.get_untracked() {
            on_close.call(());
        }
    });
    on_cleanup(move || escape.remove());

    let on_backdrop_click = move |_| {
        if close_on_backdrop {
            on_close.call(());
        }
    };

    let children_stored = store_value(children());
    let title_stored = store_value(title);

    view! {
        <Show when=move || show.get()>
            <div class="modal-backdrop" on:click=on_backdrop_click>
                <div
                    class=format!("modal {} {}", size.class(), class)
                    role="dialog"
                    on:click=|e| e.stop_propagation()
                >
                    <div class="modal-header">
                        <h3 class="modal-title">{move || title_stored.with_value(|t| t.get())}</h3>
                        <button class="btn btn-ghost modal-close" on:click=move |_| on_close.call(())>
                            <IconX />
                        </button>
                    </div>

                    <div class="modal-body">
                        {children_stored.get_value()}
                    </div>
                </div>
            </div>
        </Show>
    }
}

/// Confirmation dialog
#[component]
pub fn ConfirmDialog(
    #[prop(into)] show: RwSignal<bool>,
    #[prop(into)] title: String,
    #[prop(into)] message: String,
    #[prop(default = "Confirm".to_string())] confirm_text: String,
    #[prop(default = "Cancel".to_string())] cancel_text: String,
    #[prop(default = false)] danger: bool,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let on_confirm_click = move |_| {
        show.set(false);
        on_confirm.call(());
    };

    let confirm_text_stored = store_value(confirm_text);

    view! {
        <Modal
            show=Signal::from(show)
            on_close=Callback::new(move |_: ()| show.set(false))
            size=ModalSize::Small
        >
            <div class="confirm-dialog">
                <div class=move || format!("confirm-icon {}", if danger { "danger" } else { "" })>
                    <Show
                        when=move || danger
                        fallback=|| view! { <IconAlertCircle size=IconSize::Xl /> }
                    >
                        <IconAlertTriangle size=IconSize::Xl />
                    </Show>
                </div>
                <h3 class="confirm-title">{title}</h3>
                <p class="confirm-message">{message}</p>
                <div class="confirm-actions">
                    <button class="btn btn-ghost" on:click=move |_| show.set(false)>
                        {cancel_text}
                    </button>
                    <button
                        class=move || format!("btn {}", if danger { "btn-danger" } else { "btn-primary" })
                        on:click=on_confirm_click
                    >
                        {confirm_text_stored.get_value()}
                    </button>
                </div>
            </div>
        </Modal>
    }
}
