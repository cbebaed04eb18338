//! Add/Edit User Modal
//!
//! Renders a `UserForm` held by the page. Text inputs keep their own signals
//! for the lifetime of one opening and push every edit back into the form.

use leptos::*;

use crate::components::forms::*;
use crate::components::icons::*;
use crate::components::modal::*;
use crate::components::spinner::*;
use crate::config::use_config;
use crate::types::{Designation, Role};
use crate::users::form::{Field, PendingImage, UserForm, UserPayload};
use crate::validation::ALLOWED_IMAGE_TYPES;

/// Role and designation options as the modal sees them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalOptions {
    pub loading: bool,
    pub roles: Vec<Role>,
    pub roles_error: Option<String>,
    pub designations: Vec<Designation>,
    pub designations_error: Option<String>,
}

/// Add/edit user dialog
///
/// `on_submit` receives a validated payload; the form is already in its
/// submitting phase and the caller must finish it.
#[component]
pub fn UserModal(
    form: RwSignal<UserForm>,
    #[prop(into)] options: Signal<ModalOptions>,
    #[prop(into)] on_submit: Callback<UserPayload>,
) -> impl IntoView {
    let is_open = create_memo(move |_| form.with(UserForm::is_open));
    let title = Signal::derive(move || form.with(|f| f.title().to_string()));

    view! {
        <Modal
            show=Signal::from(is_open)
            on_close=Callback::new(move |_: ()| {
                if !form.with_untracked(UserForm::is_submitting) {
                    form.update(UserForm::close);
                }
            })
            title=title
            size=ModalSize::Large
            close_on_backdrop=false
        >
            // Rebuilt on every opening so field signals start from the draft
            {move || is_open.get().then(|| view! {
                <UserFormBody form=form options=options on_submit=on_submit />
            })}
        </Modal>
    }
}

#[component]
fn UserFormBody(
    form: RwSignal<UserForm>,
    options: Signal<ModalOptions>,
    on_submit: Callback<UserPayload>,
) -> impl IntoView {
    let config = use_config();
    let max_mb = config.max_image_megabytes();

    let submitting = Signal::derive(move || form.with(UserForm::is_submitting));
    let roles_loading = Signal::derive(move || options.with(|o| o.loading));

    // Role select mirrors the draft so a role adopted by title shows up
    let draft_role = create_memo(move |_| form.with(|f| f.draft().role.clone()));
    let role_value = create_rw_signal(draft_role.get_untracked());
    create_effect(move |_| role_value.set(draft_role.get()));

    let role_options = Signal::derive(move || {
        options.with(|o| {
            o.roles
                .iter()
                .map(|r| (r.id.to_string(), r.title.clone()))
                .collect::<Vec<_>>()
        })
    });
    let role_placeholder = Signal::derive(move || {
        if options.with(|o| o.loading) {
            "Loading roles...".to_string()
        } else {
            "Select role".to_string()
        }
    });
    let role_warning = Signal::derive(move || {
        options.with(|o| {
            o.roles_error.clone().or_else(|| {
                (!o.loading && o.roles.is_empty()).then(|| "No roles available".to_string())
            })
        })
    });

    let preview = move || form.with(UserForm::preview_url);
    let upload_label = Signal::derive(move || form.with(|f| f.upload_label().to_string()));
    let image_error = move || form.with(|f| f.errors().message(Field::ProfileImage).map(str::to_string));
    let initials_preview = move || {
        form.with(|f| {
            let initials = f.draft().initials.trim().to_uppercase();
            if initials.is_empty() {
                "US".to_string()
            } else {
                initials
            }
        })
    };

    let on_pick = Callback::new(move |file: web_sys::File| {
        let mime_type = file.type_();
        let size = file.size() as u64;
        let accepted = form
            .try_update(|f| f.accept_image_meta(&mime_type, size))
            .unwrap_or(false);
        if !accepted {
            tracing::debug!(mime = %mime_type, size, "Image rejected");
            return;
        }

        let file = gloo_file::File::from(file);
        spawn_local(async move {
            match gloo_file::futures::read_as_bytes(&file).await {
                Ok(bytes) => form.update(|f| {
                    f.select_image(PendingImage {
                        file_name: file.name(),
                        mime_type,
                        bytes,
                    });
                }),
                Err(e) => tracing::warn!(error = %e, "Could not read image"),
            }
        });
    });

    let on_submit_form = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let roles = options.with_untracked(|o| o.roles.clone());
        if let Some(payload) = form.try_update(|f| f.begin_submit(&roles)).flatten() {
            on_submit.call(payload);
        }
    };

    let other_errors = move || form.with(|f| f.errors().other().to_vec());

    view! {
        <form class="user-form" on:submit=on_submit_form novalidate=true>
            <div class="profile-image-section">
                <div class="profile-preview">
                    {move || match preview() {
                        Some(url) => view! { <img src=url alt="Profile preview" class="avatar avatar-lg" /> }.into_view(),
                        None => view! { <div class="avatar avatar-lg">{initials_preview}</div> }.into_view(),
                    }}
                </div>
                <div class="profile-actions">
                    <FileInput
                        on_select=on_pick
                        label=upload_label
                        accept=ALLOWED_IMAGE_TYPES.join(",")
                        hint=format!("JPG, PNG or GIF. Max {}MB", max_mb)
                        disabled=submitting
                    />
                    <Show when=move || preview().is_some()>
                        <button
                            type="button"
                            class="btn btn-ghost btn-sm text-danger"
                            disabled=move || submitting.get()
                            on:click=move |_| form.update(UserForm::remove_image)
                        >
                            <IconTrash size=IconSize::Sm />
                            <span>"Remove"</span>
                        </button>
                    </Show>
                </div>
                <Show when=move || image_error().is_some()>
                    <p class="form-error">
                        <IconAlertCircle size=IconSize::Xs />
                        {move || image_error().unwrap_or_default()}
                    </p>
                </Show>
            </div>

            <div class="form-grid">
                <DraftInput form=form field=Field::Name label="Full Name" placeholder="Enter full name" required=true disabled=submitting />
                <DraftInput form=form field=Field::Email label="Email" placeholder="Enter email address" input_type=InputType::Email required=true disabled=submitting />
                <DraftInput form=form field=Field::Phone label="Phone" placeholder="Enter phone number" input_type=InputType::Tel disabled=submitting />
                <DraftInput form=form field=Field::Title label="Title" placeholder="Enter job title" disabled=submitting />
                <DraftInput form=form field=Field::Initials label="Initials" placeholder="e.g. JD" maxlength=crate::users::form::MAX_INITIALS disabled=submitting />

                <Select
                    value=role_value
                    options=role_options
                    label="Role"
                    placeholder=role_placeholder
                    error=Signal::derive(move || form.with(|f| f.errors().message(Field::Role).map(str::to_string)))
                    warning=role_warning
                    required=true
                    disabled=Signal::derive(move || submitting.get() || roles_loading.get())
                    on_change=Callback::new(move |role: String| form.update(|f| f.set_field(Field::Role, role)))
                />
            </div>

            <div class="form-group">
                <label class="form-label">"Designations"</label>
                {move || {
                    let (loading, error, designations) =
                        options.with(|o| (o.loading, o.designations_error.clone(), o.designations.clone()));
                    if loading {
                        view! {
                            <div class="designations-loading">
                                <Spinner size=SpinnerSize::Sm />
                                <span>"Loading designations..."</span>
                            </div>
                        }.into_view()
                    } else if let Some(error) = error {
                        view! { <p class="form-warning">{error}</p> }.into_view()
                    } else if designations.is_empty() {
                        view! { <p class="text-muted">"No designations available"</p> }.into_view()
                    } else {
                        view! {
                            <div class="designation-list">
                                {designations.into_iter().map(|d| {
                                    let id = d.id.clone();
                                    let toggle_id = d.id.clone();
                                    view! {
                                        <Checkbox
                                            checked=Signal::derive(move || form.with(|f| f.draft().has_designation(&id)))
                                            label=d.name
                                            on_toggle=Callback::new(move |_: bool| form.update(|f| f.toggle_designation(&toggle_id)))
                                        />
                                    }
                                }).collect_view()}
                            </div>
                        }.into_view()
                    }
                }}
            </div>

            <Show when=move || !other_errors().is_empty()>
                <div class="form-errors">
                    {move || other_errors().into_iter().map(|e| view! { <p class="form-error">{e}</p> }).collect_view()}
                </div>
            </Show>

            <div class="modal-footer">
                <button
                    type="button"
                    class="btn btn-ghost"
                    disabled=move || submitting.get()
                    on:click=move |_| form.update(UserForm::close)
                >
                    "Cancel"
                </button>
                <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                    <Show
                        when=move || submitting.get()
                        fallback=move || view! { <span>{move || form.with(|f| f.submit_label())}</span> }
                    >
                        <Spinner size=SpinnerSize::Sm />
                        <span>"Saving..."</span>
                    </Show>
                </button>
            </div>
        </form>
    }
}

/// Text input bound to one draft field
#[component]
fn DraftInput(
    form: RwSignal<UserForm>,
    field: Field,
    #[prop(into)] label: String,
    #[prop(optional, into)] placeholder: String,
    #[prop(default = InputType::Text)] input_type: InputType,
    #[prop(default = false)] required: bool,
    #[prop(optional)] maxlength: Option<usize>,
    #[prop(into)] disabled: Signal<bool>,
) -> impl IntoView {
    let value = create_rw_signal(form.with_untracked(|f| f.draft().text(field).to_string()));
    let error = Signal::derive(move || form.with(|f| f.errors().message(field).map(str::to_string)));

    view! {
        <TextInput
            value=value
            input_type=input_type
            label=label
            placeholder=placeholder
            error=error
            required=required
            disabled=disabled
            maxlength=maxlength.unwrap_or(255)
            on_input=Callback::new(move |text: String| form.update(|f| f.set_field(field, text)))
        />
    }
}
