//! Loading Spinner Components

use leptos::*;

/// Spinner size variants
#[derive(Debug, Clone, Copy, Default)]
pub enum SpinnerSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl SpinnerSize {
    pub fn class(&self) -> &'static str {
        match self {
            Self::Sm => "spinner-sm",
            Self::Md => "spinner-md",
            Self::Lg => "spinner-lg",
        }
    }

    pub fn size(&self) -> u32 {
        match self {
            Self::Sm => 16,
            Self::Md => 32,
            Self::Lg => 48,
        }
    }
}

/// Basic spinning loader
#[component]
pub fn Spinner(
    #[prop(default = SpinnerSize::Md)] size: SpinnerSize,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    let s = size.size();

    view! {
        <svg
            class=format!("spinner {} {}", size.class(), class)
            width=s
            height=s
            viewBox="0 0 24 24"
            xmlns="http://www.w3.org/2000/svg"
        >
            <circle cx="12" cy="12" r="10" fill="none" stroke="var(--border)" stroke-width="3" />
            <circle
                cx="12"
                cy="12"
                r="10"
                fill="none"
                stroke="var(--primary)"
                stroke-width="3"
                stroke-linecap="round"
                stroke-dasharray="31.4 31.4"
                class="spinner-arc"
            />
        </svg>
    }
}

/// Centred spinner with a caption, for sections waiting on data
#[component]
pub fn LoadingState(#[prop(optional, into)] text: String) -> impl IntoView {
    let text_empty = text.is_empty();
    let text_stored = store_value(text);

    view! {
        <div class="loading-state">
            <Spinner size=SpinnerSize::Lg />
            <Show when=move || !text_empty>
                <p class="loading-text">{text_stored.get_value()}</p>
            </Show>
        </div>
    }
}
