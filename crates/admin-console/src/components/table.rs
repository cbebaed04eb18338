//! Data Table Components

use leptos::*;

use crate::components::icons::*;
use crate::users::list::{SortDirection, SortKey, SortState};

/// Sortable column header
#[component]
pub fn SortHeader(
    key: SortKey,
    #[prop(into)] sort: Signal<SortState>,
    #[prop(into)] on_sort: Callback<SortKey>,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    let is_sorted = move || sort.get().key == key;

    view! {
        <th
            class=move || format!("table-header sortable {} {}", if is_sorted() { "sorted" } else { "" }, class)
            on:click=move |_| on_sort.call(key)
        >
            <div class="header-content">
                <span>{key.label()}</span>
                <span class="sort-icon">
                    {move || {
                        if !is_sorted() {
                            view! { <IconChevronsUpDown size=IconSize::Xs class="text-muted" /> }.into_view()
                        } else {
                            match sort.get().direction {
                                SortDirection::Ascending => view! { <IconChevronDown size=IconSize::Xs /> }.into_view(),
                                SortDirection::Descending => view! { <IconChevronUp size=IconSize::Xs /> }.into_view(),
                            }
                        }
                    }}
                </span>
            </div>
        </th>
    }
}

/// Role badge; the CSS class is derived from the role title
#[component]
pub fn RoleBadge(#[prop(into)] role: String) -> impl IntoView {
    let role_class = format!("role-{}", role.to_lowercase().replace(' ', "_"));

    view! {
        <span class=format!("badge role-badge {}", role_class)>{role}</span>
    }
}

/// Pagination component
///
/// The page window is computed by the caller; this only renders it.
#[component]
pub fn Pagination(
    #[prop(into)] current_page: Signal<usize>,
    #[prop(into)] total_pages: Signal<usize>,
    #[prop(into)] pages: Signal<Vec<usize>>,
    #[prop(into)] on_page: Callback<usize>,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    view! {
        <Show when=move || { total_pages.get() > 1 }>
            <div class=format!("pagination {}", class)>
                <button
                    class="btn btn-ghost pagination-btn"
                    title="Previous page"
                    disabled=move || current_page.get() <= 1
                    on:click=move |_| on_page.call(current_page.get().saturating_sub(1))
                >
                    <IconChevronLeft size=IconSize::Sm />
                </button>

                {move || {
                    pages.get().into_iter().map(|page| {
                        let is_current = move || current_page.get() == page;
                        view! {
                            <button
                                class=move || format!(
                                    "btn pagination-btn {}",
                                    if is_current() { "btn-primary" } else { "btn-ghost" }
                                )
                                on:click=move |_| on_page.call(page)
                            >
                                {page}
                            </button>
                        }
                    }).collect_view()
                }}

                <button
                    class="btn btn-ghost pagination-btn"
                    title="Next page"
                    disabled=move || current_page.get() >= total_pages.get()
                    on:click=move |_| on_page.call(current_page.get() + 1)
                >
                    <IconChevronRight size=IconSize::Sm />
                </button>
            </div>
        </Show>
    }
}
