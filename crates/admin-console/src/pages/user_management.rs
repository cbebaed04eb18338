//! User Management Page

use std::rc::Rc;

use leptos::*;
use leptos_router::*;

use crate::api::ApiClient;
use crate::components::{icons::*, modal::*, spinner::*, table::*, user_modal::*};
use crate::config::use_config;
use crate::repository::HttpUserRepository;
use crate::state::use_app_state;
use crate::types::{RecordId, StatusFilter, UserRecord, UserStatus};
use crate::users::{
    ListChange, ListSource, Notice, NoticeLevel, SortKey, UserDirectory, UserForm, UserListState, UserPayload,
};

type Directory = Rc<UserDirectory<HttpUserRepository>>;

fn split_options<T>(loaded: Result<Vec<T>, String>) -> (Vec<T>, Option<String>) {
    match loaded {
        Ok(items) => (items, None),
        Err(message) => (Vec::new(), Some(message)),
    }
}

/// User list with search, filter, sort, pagination and the add/edit modal
#[component]
pub fn UserManagementPage() -> impl IntoView {
    let state = use_app_state();
    let config = use_config();
    let navigate = use_navigate();

    let client = ApiClient::new(config.clone(), state.session.clone());
    let directory: StoredValue<Directory> = store_value(Rc::new(UserDirectory::new(
        HttpUserRepository::new(client),
        config.demo_fallback,
    )));

    let list = create_rw_signal(UserListState::new(config.page_size));
    let loading = create_rw_signal(true);
    let form = create_rw_signal(UserForm::new(config.max_image_bytes));
    let options = create_rw_signal(ModalOptions::default());
    let confirm_open = create_rw_signal(false);
    let pending_delete = create_rw_signal::<Option<RecordId>>(None);
    let layout = state.layout;

    // ------------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------------

    let on_session_expired = {
        let state = state.clone();
        Callback::new(move |_: ()| {
            state.sign_out();
            navigate(
                "/login",
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        })
    };

    let notify = {
        let state = state.clone();
        Callback::new(move |notice: Notice| {
            match notice.level {
                NoticeLevel::Success => state.toast_success("Success", notice.message),
                NoticeLevel::Error => state.toast_error("Error", notice.message),
            }
            if notice.session_expired {
                on_session_expired.call(());
            }
        })
    };

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    let fetch_users = {
        let state = state.clone();
        Callback::new(move |_: ()| {
            let dir = directory.get_value();
            let state = state.clone();
            let filter = list.with_untracked(UserListState::status_filter);
            loading.set(true);

            spawn_local(async move {
                match dir.fetch(filter).await {
                    Ok(loaded) => {
                        if loaded.source == ListSource::Fallback {
                            state.toast_info("Offline", "Could not reach the server, showing demo users");
                        }
                        list.update(|l| l.apply(ListChange::Replace(loaded.records)));
                    }
                    Err(notice) => notify.call(notice),
                }
                loading.set(false);
            });
        })
    };

    fetch_users.call(());

    let load_options = move || {
        options.set(ModalOptions {
            loading: true,
            ..Default::default()
        });
        let dir = directory.get_value();

        spawn_local(async move {
            let lists = dir.load_options().await;
            let (roles, roles_error) = split_options(lists.roles);
            let (designations, designations_error) = split_options(lists.designations);

            form.update(|f| f.adopt_role_title(&roles));
            options.set(ModalOptions {
                loading: false,
                roles,
                roles_error,
                designations,
                designations_error,
            });
        });
    };

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    let open_add = move |_| {
        form.update(UserForm::open_add);
        load_options();
    };

    let open_edit = Callback::new(move |id: RecordId| {
        let Some(record) = list.with_untracked(|l| l.find(&id).cloned()) else {
            return;
        };
        form.update(|f| f.open_edit(&record));
        load_options();
    });

    let toggle_status = Callback::new(move |id: RecordId| {
        let Some(record) = list.with_untracked(|l| l.find(&id).cloned()) else {
            return;
        };
        let dir = directory.get_value();

        spawn_local(async move {
            match dir.toggle_status(&record).await {
                Ok(change) => list.update(|l| l.apply(change)),
                Err(notice) => notify.call(notice),
            }
        });
    });

    let request_delete = Callback::new(move |id: RecordId| {
        pending_delete.set(Some(id));
        confirm_open.set(true);
    });

    let confirm_delete = Callback::new(move |_: ()| {
        let Some(id) = pending_delete.get_untracked() else {
            return;
        };
        pending_delete.set(None);
        let dir = directory.get_value();

        spawn_local(async move {
            match dir.delete(&id).await {
                Ok((change, notice)) => {
                    list.update(|l| l.apply(change));
                    notify.call(notice);
                }
                Err(notice) => notify.call(notice),
            }
        });
    });

    let save_user = Callback::new(move |payload: UserPayload| {
        let dir = directory.get_value();

        spawn_local(async move {
            match dir.save(&payload).await {
                Ok(notice) => {
                    form.update(|f| f.finish_submit(Ok(())));
                    notify.call(notice);
                    fetch_users.call(());
                }
                Err(failure) => {
                    form.update(|f| f.finish_submit(Err(failure.field_errors)));
                    notify.call(failure.notice);
                }
            }
        });
    });

    let on_sort = Callback::new(move |key: SortKey| list.update(|l| l.sort_by(key)));
    let on_page = Callback::new(move |page: usize| list.update(|l| l.go_to_page(page)));

    // ------------------------------------------------------------------------
    // Derived view
    // ------------------------------------------------------------------------

    let search = create_memo(move |_| list.with(|l| l.search().to_string()));
    let status_filter = create_memo(move |_| list.with(UserListState::status_filter));
    let sort = Signal::derive(move || list.with(UserListState::sort));
    let filtered_len = create_memo(move |_| list.with(UserListState::filtered_len));
    let current_page = Signal::derive(move || list.with(UserListState::page));
    let total_pages = Signal::derive(move || list.with(UserListState::total_pages));
    let page_window = Signal::derive(move || list.with(UserListState::page_window));
    let rows = create_memo(move |_| {
        list.with(|l| {
            let offset = (l.page() - 1) * l.page_size();
            l.current_page_rows()
                .into_iter()
                .cloned()
                .enumerate()
                .map(|(i, user)| (offset + i + 1, user))
                .collect::<Vec<_>>()
        })
    });

    let showing = move || {
        list.with(|l| {
            let total = l.filtered_len();
            let start = (l.page() - 1) * l.page_size() + 1;
            let end = (l.page() * l.page_size()).min(total);
            format!("Showing {} to {} of {} users", start, end, total)
        })
    };

    let is_mobile = move || layout.get().is_mobile;

    let empty_state = || {
        view! {
            <div class="empty-state">
                <IconUsers size=IconSize::Xl class="text-muted" />
                <h3>"No users found"</h3>
                <p>"Try adjusting your search or filter criteria"</p>
            </div>
        }
    };

    view! {
        <div class="user-management-page">
            <div class="page-header">
                <div class="header-content">
                    <h1>"User Management"</h1>
                    <p class="page-subtitle">"Manage users and their permissions"</p>
                </div>
                <button class="btn btn-primary" on:click=open_add>
                    <IconPlus size=IconSize::Sm />
                    <span>"Add User"</span>
                </button>
            </div>

            <div class="filters-bar">
                <div class="search-container">
                    <IconSearch size=IconSize::Sm />
                    <input
                        type="text"
                        class="search-input"
                        placeholder="Search by name or email..."
                        prop:value=move || search.get()
                        on:input=move |e| {
                            let term = event_target_value(&e);
                            list.update(|l| l.set_search(term));
                        }
                    />
                    <Show when=move || !search.get().is_empty()>
                        <button class="btn btn-ghost btn-sm" title="Clear search" on:click=move |_| list.update(|l| l.set_search(""))>
                            <IconX size=IconSize::Xs />
                        </button>
                    </Show>
                </div>

                <select
                    class="form-select status-filter"
                    on:change=move |e| {
                        let value = event_target_value(&e);
                        let filter = StatusFilter::ALL
                            .into_iter()
                            .find(|f| f.label() == value)
                            .unwrap_or_default();
                        list.update(|l| l.set_status_filter(filter));
                        fetch_users.call(());
                    }
                >
                    {StatusFilter::ALL.into_iter().map(|filter| {
                        let text = match filter {
                            StatusFilter::All => "All Status",
                            other => other.label(),
                        };
                        view! {
                            <option value=filter.label() selected=move || status_filter.get() == filter>{text}</option>
                        }
                    }).collect_view()}
                </select>

                <button class="btn btn-secondary" on:click=move |_| fetch_users.call(())>
                    <IconRefresh size=IconSize::Sm />
                    <span>"Refresh"</span>
                </button>
            </div>

            <div class="card">
                <Show
                    when=move || !loading.get()
                    fallback=|| view! { <LoadingState text="Loading users..." /> }
                >
                    <Show when=move || { filtered_len.get() > 0 } fallback=empty_state>
                        <Show
                            when=move || !is_mobile()
                            fallback=move || view! {
                                <div class="user-cards">
                                    {move || rows.get().into_iter().map(|(_, user)| view! {
                                        <UserCard user=user on_edit=open_edit on_delete=request_delete on_toggle=toggle_status />
                                    }).collect_view()}
                                </div>
                            }
                        >
                            <div class="table-container">
                                <table class="table">
                                    <thead>
                                        <tr>
                                            <SortHeader key=SortKey::Id sort=sort on_sort=on_sort />
                                            <SortHeader key=SortKey::Name sort=sort on_sort=on_sort />
                                            <SortHeader key=SortKey::Email sort=sort on_sort=on_sort />
                                            <SortHeader key=SortKey::Initials sort=sort on_sort=on_sort />
                                            <SortHeader key=SortKey::Phone sort=sort on_sort=on_sort />
                                            <SortHeader key=SortKey::Role sort=sort on_sort=on_sort />
                                            <SortHeader key=SortKey::Status sort=sort on_sort=on_sort />
                                            <SortHeader key=SortKey::Title sort=sort on_sort=on_sort />
                                            <th>"Actions"</th>
                                        </tr>
                                    </thead>
                                    <tbody>
                                        {move || rows.get().into_iter().map(|(index, user)| view! {
                                            <UserRow index=index user=user on_edit=open_edit on_delete=request_delete on_toggle=toggle_status />
                                        }).collect_view()}
                                    </tbody>
                                </table>
                            </div>
                        </Show>

                        <div class="pagination-bar">
                            <span class="pagination-info">{showing}</span>
                            <Pagination
                                current_page=current_page
                                total_pages=total_pages
                                pages=page_window
                                on_page=on_page
                            />
                        </div>
                    </Show>
                </Show>
            </div>

            <UserModal form=form options=options on_submit=save_user />

            <ConfirmDialog
                show=confirm_open
                title="Delete User"
                message="Are you sure you want to delete this user?"
                confirm_text="Delete".to_string()
                danger=true
                on_confirm=confirm_delete
            />
        </div>
    }
}

/// On/off switch for a user's status
#[component]
fn StatusToggle(id: RecordId, status: UserStatus, on_toggle: Callback<RecordId>, #[prop(default = false)] with_label: bool) -> impl IntoView {
    let active = status == UserStatus::Active;

    view! {
        <button
            class=format!("toggle-button {}", if active { "toggle-on" } else { "toggle-off" })
            title=if active { "Click to deactivate" } else { "Click to activate" }
            on:click=move |_| on_toggle.call(id.clone())
        >
            <span class="toggle-track">
                <span class="toggle-thumb"></span>
            </span>
            <Show when=move || with_label>
                <span class="toggle-label">{if active { "ON" } else { "OFF" }}</span>
            </Show>
        </button>
    }
}

#[component]
fn RowActions(id: RecordId, on_edit: Callback<RecordId>, on_delete: Callback<RecordId>) -> impl IntoView {
    let edit_id = id.clone();

    view! {
        <div class="action-buttons">
            <button class="btn btn-ghost btn-sm" title="Edit" on:click=move |_| on_edit.call(edit_id.clone())>
                <IconEdit size=IconSize::Sm />
            </button>
            <button class="btn btn-ghost btn-sm text-danger" title="Delete" on:click=move |_| on_delete.call(id.clone())>
                <IconTrash size=IconSize::Sm />
            </button>
        </div>
    }
}

/// Table row
#[component]
fn UserRow(
    index: usize,
    user: UserRecord,
    on_edit: Callback<RecordId>,
    on_delete: Callback<RecordId>,
    on_toggle: Callback<RecordId>,
) -> impl IntoView {
    view! {
        <tr>
            <td>{index}</td>
            <td><span class="user-name">{user.name}</span></td>
            <td class="email-cell">{user.email}</td>
            <td>{user.initials}</td>
            <td>{user.phone}</td>
            <td><RoleBadge role=user.role /></td>
            <td><StatusToggle id=user.id.clone() status=user.status on_toggle=on_toggle /></td>
            <td>{user.title}</td>
            <td><RowActions id=user.id on_edit=on_edit on_delete=on_delete /></td>
        </tr>
    }
}

/// Stacked card used on narrow screens
#[component]
fn UserCard(
    user: UserRecord,
    on_edit: Callback<RecordId>,
    on_delete: Callback<RecordId>,
    on_toggle: Callback<RecordId>,
) -> impl IntoView {
    let avatar = user.avatar_text().to_string();

    view! {
        <div class="user-card">
            <div class="user-card-header">
                <div class="avatar">{avatar}</div>
                <div class="user-info">
                    <h3 class="user-name">{user.name}</h3>
                    <RoleBadge role=user.role />
                </div>
                <RowActions id=user.id.clone() on_edit=on_edit on_delete=on_delete />
            </div>
            <div class="user-card-details">
                <div class="detail-row">
                    <span class="detail-label">"Email:"</span>
                    <span class="detail-value">{user.email}</span>
                </div>
                <div class="detail-row">
                    <span class="detail-label">"Phone:"</span>
                    <span class="detail-value">{user.phone}</span>
                </div>
                <div class="detail-row">
                    <span class="detail-label">"Title:"</span>
                    <span class="detail-value">{user.title}</span>
                </div>
                <div class="detail-row">
                    <span class="detail-label">"Initials:"</span>
                    <span class="detail-value">{user.initials}</span>
                </div>
                <div class="detail-row">
                    <span class="detail-label">"Status:"</span>
                    <StatusToggle id=user.id status=user.status on_toggle=on_toggle with_label=true />
                </div>
            </div>
        </div>
    }
}
