//! Form Input Components

use crate::components::icons::*;
use leptos::*;

/// Input field types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputType {
    #[default]
    Text,
    Email,
    Password,
    Tel,
    Search,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Tel => "tel",
            Self::Search => "search",
        }
    }
}

/// Text input component
///
/// `on_input` fires after `value` is updated, for callers that need to
/// clear errors or mirror the value elsewhere.
#[component]
pub fn TextInput(
    #[prop(into)] value: RwSignal<String>,
    #[prop(default = InputType::Text)] input_type: InputType,
    #[prop(optional, into)] label: String,
    #[prop(optional, into)] placeholder: String,
    #[prop(optional, into)] error: MaybeSignal<Option<String>>,
    #[prop(default = false)] required: bool,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] maxlength: Option<usize>,
    #[prop(optional)] icon: Option<View>,
    #[prop(optional, into)] class: String,
    #[prop(optional)] on_input: Option<Callback<String>>,
) -> impl IntoView {
    let (show_password, set_show_password) = create_signal(false);
    let is_password = input_type == InputType::Password;

    // Store values for use in closures
    let label_empty = label.is_empty();
    let label_display = store_value(label);
    let has_icon = icon.is_some();
    let icon_stored = store_value(icon);
    let error_stored = store_value(error);

    let actual_type = move || {
        if is_password && show_password.get() {
            "text"
        } else {
            input_type.as_str()
        }
    };

    view! {
        <div class=format!("form-group {}", class)>
            <Show when=move || !label_empty>
                <label class="form-label">
                    {label_display.get_value()}
                    <Show when=move || required>
                        <span class="required-mark">"*"</span>
                    </Show>
                </label>
            </Show>

            <div class=move || format!("input-wrapper {}", if error_stored.with_value(|e| e.get().is_some()) { "has-error" } else { "" })>
                <Show when=move || has_icon>
                    <span class="input-icon">{icon_stored.get_value()}</span>
                </Show>

                <input
                    type=actual_type
                    class="form-input"
                    placeholder=placeholder
                    maxlength=maxlength
                    disabled=move || disabled.get()
                    prop:value=move || value.get()
                    on:input=move |e| {
                        let text = event_target_value(&e);
                        value.set(text.clone());
                        if let Some(cb) = on_input {
                            cb.call(text);
                        }
                    }
                />

                <Show when=move || is_password>
                    <button
                        type="button"
                        class="input-toggle-password"
                        title=move || if show_password.get() { "Hide password" } else { "Show password" }
                        on:click=move |_| set_show_password.update(|v| *v = !*v)
                    >
                        <Show
                            when=move || show_password.get()
                            fallback=|| view! { <IconEye size=IconSize::Sm /> }
                        >
                            <IconEyeOff size=IconSize::Sm />
                        </Show>
                    </button>
                </Show>
            </div>

            <Show when=move || error_stored.with_value(|e| e.get().is_some())>
                <p class="form-error">
                    <IconAlertCircle size=IconSize::Xs />
                    {move || error_stored.with_value(|e| e.get().unwrap_or_default())}
                </p>
            </Show>
        </div>
    }
}

/// Select dropdown bound to a string value; `""` is the placeholder
#[component]
pub fn Select(
    #[prop(into)] value: RwSignal<String>,
    #[prop(into)] options: Signal<Vec<(String, String)>>,
    #[prop(optional, into)] label: String,
    #[prop(optional, into)] placeholder: MaybeSignal<String>,
    #[prop(optional, into)] error: MaybeSignal<Option<String>>,
    #[prop(optional, into)] warning: MaybeSignal<Option<String>>,
    #[prop(default = false)] required: bool,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional, into)] class: String,
    #[prop(optional)] on_change: Option<Callback<String>>,
) -> impl IntoView {
    let label_empty = label.is_empty();
    let label_display = store_value(label);
    let error_stored = store_value(error);
    let warning_stored = store_value(warning);

    view! {
        <div class=format!("form-group {}", class)>
            <Show when=move || !label_empty>
                <label class="form-label">
                    {label_display.get_value()}
                    <Show when=move || required>
                        <span class="required-mark">"*"</span>
                    </Show>
                </label>
            </Show>

            <div class="select-wrapper">
                <select
                    class=move || format!("form-select {}", if error_stored.with_value(|e| e.get().is_some()) { "has-error" } else { "" })
                    disabled=move || disabled.get()
                    on:change=move |e| {
                        let selected = event_target_value(&e);
                        value.set(selected.clone());
                        if let Some(cb) = on_change {
                            cb.call(selected);
                        }
                    }
                >
                    <option value="" selected=move || value.get().is_empty()>{move || placeholder.get()}</option>
                    {move || options.get().into_iter().map(|(id, text)| {
                        let selected_id = id.clone();
                        view! {
                            <option value=id selected=move || value.get() == selected_id>{text}</option>
                        }
                    }).collect_view()}
                </select>
                <IconChevronDown size=IconSize::Sm class="select-icon" />
            </div>

            <Show when=move || warning_stored.with_value(|w| w.get().is_some())>
                <p class="form-warning">
                    <IconAlertTriangle size=IconSize::Xs />
                    {move || warning_stored.with_value(|w| w.get().unwrap_or_default())}
                </p>
            </Show>

            <Show when=move || error_stored.with_value(|e| e.get().is_some())>
                <p class="form-error">
                    <IconAlertCircle size=IconSize::Xs />
                    {move || error_stored.with_value(|e| e.get().unwrap_or_default())}
                </p>
            </Show>
        </div>
    }
}

/// Checkbox component
#[component]
pub fn Checkbox(
    #[prop(into)] checked: MaybeSignal<bool>,
    #[prop(into)] label: String,
    #[prop(into)] on_toggle: Callback<bool>,
    #[prop(default = false)] disabled: bool,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    view! {
        <div class=format!("form-checkbox {}", class)>
            <label class="checkbox-label">
                <input
                    type="checkbox"
                    class="checkbox-input"
                    disabled=disabled
                    prop:checked=move || checked.get()
                    on:change=move |e| on_toggle.call(event_target_checked(&e))
                />
                <span class="checkbox-box">
                    <IconCheck size=IconSize::Sm />
                </span>
                <span class="checkbox-text">{label}</span>
            </label>
        </div>
    }
}

/// Single-file picker rendered as a button-styled label
#[component]
pub fn FileInput(
    #[prop(into)] on_select: Callback<web_sys::File>,
    #[prop(into)] label: MaybeSignal<String>,
    #[prop(optional, into)] accept: String,
    #[prop(optional, into)] hint: String,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    // Generate unique ID for the input using random number
    let input_id = format!("file-input-{}", js_sys::Math::random().to_bits());
    let input_id_for_label = input_id.clone();
    let hint_empty = hint.is_empty();
    let hint_display = store_value(hint);

    let on_file_change = move |e: web_sys::Event| {
        let input: web_sys::HtmlInputElement = event_target(&e);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            on_select.call(file);
        }
        // Let the same file be picked again after a rejection
        input.set_value("");
    };

    view! {
        <div class=format!("file-picker {}", class)>
            <input
                type="file"
                id=input_id
                class="file-input-hidden"
                accept=accept
                disabled=move || disabled.get()
                on:change=on_file_change
            />
            <label for=input_id_for_label class="btn btn-secondary btn-sm">
                <IconUpload size=IconSize::Sm />
                <span>{move || label.get()}</span>
            </label>
            <Show when=move || !hint_empty>
                <p class="form-helper">{hint_display.get_value()}</p>
            </Show>
        </div>
    }
}
