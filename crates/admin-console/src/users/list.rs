//! Derived user list: search, status filter, sort and pagination
//!
//! `UserListState` keeps the last fetched collection untouched and projects
//! it on demand, so the visible rows are always a function of the records
//! plus the current criteria.

use std::cmp::Ordering;

use crate::types::{RecordId, StatusFilter, UserRecord, UserStatus};

/// Number of page buttons shown at once
pub const PAGE_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    Id,
    #[default]
    Name,
    Email,
    Initials,
    Phone,
    Role,
    Title,
    Status,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Id => "S.No",
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Initials => "Initials",
            Self::Phone => "Phone",
            Self::Role => "Role",
            Self::Title => "Title",
            Self::Status => "Status",
        }
    }

    fn value<'a>(&self, record: &'a UserRecord) -> &'a str {
        match self {
            Self::Id => record.id.as_str(),
            Self::Name => &record.name,
            Self::Email => &record.email,
            Self::Initials => &record.initials,
            Self::Phone => &record.phone,
            Self::Role => &record.role,
            Self::Title => &record.title,
            Self::Status => record.status.as_str(),
        }
    }

    /// Numeric ids compare as numbers, everything else case-insensitively
    fn compare(&self, a: &UserRecord, b: &UserRecord) -> Ordering {
        let (a, b) = (self.value(a), self.value(b));
        if let (Self::Id, Ok(x), Ok(y)) = (self, a.parse::<i64>(), b.parse::<i64>()) {
            return x.cmp(&y);
        }
        a.to_lowercase().cmp(&b.to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    /// Header click: same column flips direction, a new column starts ascending
    pub fn clicked(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.toggle(),
            }
        } else {
            Self {
                key,
                direction: SortDirection::Ascending,
            }
        }
    }
}

/// Local edits applied after a confirmed mutation
#[derive(Debug, Clone, PartialEq)]
pub enum ListChange {
    Replace(Vec<UserRecord>),
    SetStatus { id: RecordId, status: UserStatus },
    Remove(RecordId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserListState {
    records: Vec<UserRecord>,
    search: String,
    status_filter: StatusFilter,
    sort: SortState,
    page: usize,
    page_size: usize,
}

impl UserListState {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            search: String::new(),
            status_filter: StatusFilter::All,
            sort: SortState::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn find(&self, id: &RecordId) -> Option<&UserRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn replace_all(&mut self, records: Vec<UserRecord>) {
        self.records = records;
        self.page = 1;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
        self.page = 1;
    }

    pub fn sort_by(&mut self, key: SortKey) {
        self.sort = self.sort.clicked(key);
        self.page = 1;
    }

    /// Filtered and sorted records
    pub fn view(&self) -> Vec<&UserRecord> {
        let term = self.search.to_lowercase();

        let mut rows: Vec<&UserRecord> = self
            .records
            .iter()
            .filter(|r| {
                term.is_empty()
                    || r.name.to_lowercase().contains(&term)
                    || r.email.to_lowercase().contains(&term)
            })
            .filter(|r| self.status_filter.matches(r.status))
            .collect();

        // sort_by is stable
        let key = self.sort.key;
        match self.sort.direction {
            SortDirection::Ascending => rows.sort_by(|a, b| key.compare(a, b)),
            SortDirection::Descending => rows.sort_by(|a, b| key.compare(b, a)),
        }

        rows
    }

    pub fn filtered_len(&self) -> usize {
        self.view().len()
    }

    /// `ceil(filtered / page_size)`; zero when nothing matches
    pub fn total_pages(&self) -> usize {
        self.filtered_len().div_ceil(self.page_size)
    }

    /// Move to a page, clamped to the valid range
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn page_rows(&self, page: usize) -> Vec<&UserRecord> {
        let start = page.saturating_sub(1) * self.page_size;
        self.view().into_iter().skip(start).take(self.page_size).collect()
    }

    pub fn current_page_rows(&self) -> Vec<&UserRecord> {
        self.page_rows(self.page)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Up to `PAGE_WINDOW` page numbers centred on the current page
    pub fn page_window(&self) -> Vec<usize> {
        let total = self.total_pages();
        if total == 0 {
            return Vec::new();
        }

        let mut start = self.page.saturating_sub(PAGE_WINDOW / 2).max(1);
        let end = (start + PAGE_WINDOW - 1).min(total);
        if end + 1 - start < PAGE_WINDOW {
            start = (end + 1).saturating_sub(PAGE_WINDOW).max(1);
        }

        (start..=end).collect()
    }

    /// Apply a confirmed mutation; only the targeted record changes
    pub fn apply(&mut self, change: ListChange) {
        match change {
            ListChange::Replace(records) => self.replace_all(records),
            ListChange::SetStatus { id, status } => {
                if let Some(record) = self.records.iter_mut().find(|r| r.id == id) {
                    record.status = status;
                }
            }
            ListChange::Remove(id) => {
                self.records.retain(|r| r.id != id);
                self.go_to_page(self.page);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::fallback::demo_users;

    fn state() -> UserListState {
        let mut state = UserListState::new(10);
        state.replace_all(demo_users());
        state
    }

    fn names(rows: &[&UserRecord]) -> Vec<String> {
        rows.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_default_sort_is_name_ascending() {
        let state = state();
        let view = state.view();
        assert_eq!(view.first().unwrap().name, "Admin 2");
        assert_eq!(view.last().unwrap().name, "Test User");
    }

    #[test]
    fn test_search_matches_name_or_email() {
        let mut state = state();
        state.set_search("SALES");
        assert_eq!(names(&state.view()), vec!["Sales Rep 2_1", "Sales Rep 2_2"]);

        state.set_search("example.com");
        assert_eq!(names(&state.view()), vec!["Test User"]);
    }

    #[test]
    fn test_search_term_is_matched_verbatim() {
        let mut state = state();
        state.set_search("2 ");
        assert!(state.view().is_empty());

        state.set_search("Rep 2");
        assert_eq!(names(&state.view()), vec!["Sales Rep 2_1", "Sales Rep 2_2"]);

        state.set_search(" ");
        let spaced: Vec<_> = demo_users()
            .into_iter()
            .filter(|u| u.name.contains(' ') || u.email.contains(' '))
            .map(|u| u.name)
            .collect();
        assert_eq!(names(&state.view()).len(), spaced.len());

        state.set_search("   ");
        assert!(state.view().is_empty());

        state.set_search("");
        assert_eq!(state.filtered_len(), demo_users().len());
    }

    #[test]
    fn test_sort_by_id_is_numeric() {
        let mut state = state();
        state.sort_by(SortKey::Id);
        let ids: Vec<_> = state.view().iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "3", "6", "8", "9", "21", "22"]);

        state.sort_by(SortKey::Id);
        assert_eq!(state.view().first().unwrap().id.as_str(), "22");
    }

    #[test]
    fn test_sort_by_initials() {
        let mut state = state();
        state.sort_by(SortKey::Initials);
        let initials: Vec<_> = state.view().iter().map(|r| r.initials.as_str()).collect();
        assert_eq!(initials, vec!["A2", "O2", "RC", "RC", "SR", "SR", "TU"]);
    }

    #[test]
    fn test_status_filter() {
        let mut state = state();
        state.set_status_filter(StatusFilter::Inactive);
        assert_eq!(names(&state.view()), vec!["Test User"]);

        state.set_status_filter(StatusFilter::Active);
        assert_eq!(state.filtered_len(), 6);
    }

    #[test]
    fn test_sort_clicks() {
        let sort = SortState::default();
        let sort = sort.clicked(SortKey::Name);
        assert_eq!(sort.direction, SortDirection::Descending);
        let sort = sort.clicked(SortKey::Email);
        assert_eq!(sort, SortState { key: SortKey::Email, direction: SortDirection::Ascending });
        let sort = sort.clicked(SortKey::Email);
        assert_eq!(sort.direction, SortDirection::Descending);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut state = state();
        state.sort_by(SortKey::Role);
        let roles: Vec<_> = state.view().iter().map(|r| r.role.as_str()).collect();
        assert_eq!(roles, vec!["Admin", "Normal User", "Normal User", "Normal User", "Normal User", "Owner", "User"]);

        // Ties keep their fetched order
        let normal: Vec<_> = state.view().iter().filter(|r| r.role == "Normal User").map(|r| r.id.to_string()).collect();
        assert_eq!(normal, vec!["21", "22", "8", "9"]);
    }

    #[test]
    fn test_criteria_reset_page() {
        let mut state = UserListState::new(2);
        state.replace_all(demo_users());
        state.go_to_page(3);
        assert_eq!(state.page(), 3);

        state.set_search("a");
        assert_eq!(state.page(), 1);

        state.go_to_page(2);
        state.sort_by(SortKey::Email);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_pagination_bounds() {
        let mut state = UserListState::new(3);
        state.replace_all(demo_users());
        assert_eq!(state.total_pages(), 3);

        state.go_to_page(99);
        assert_eq!(state.page(), 3);
        assert_eq!(state.current_page_rows().len(), 1);
        assert!(!state.has_next());

        state.go_to_page(0);
        assert_eq!(state.page(), 1);
        assert!(!state.has_previous());
    }

    #[test]
    fn test_page_window() {
        let mut state = UserListState::new(1);
        state.replace_all(demo_users());
        assert_eq!(state.page_window(), vec![1, 2, 3, 4, 5]);

        state.go_to_page(4);
        assert_eq!(state.page_window(), vec![2, 3, 4, 5, 6]);

        state.go_to_page(7);
        assert_eq!(state.page_window(), vec![3, 4, 5, 6, 7]);

        state.set_search("nobody");
        assert!(state.page_window().is_empty());
        assert_eq!(state.total_pages(), 0);
    }

    #[test]
    fn test_remove_clamps_page() {
        let mut state = UserListState::new(3);
        state.replace_all(demo_users());
        state.go_to_page(3);

        let last = state.current_page_rows()[0].id.clone();
        state.apply(ListChange::Remove(last));
        assert_eq!(state.total_pages(), 2);
        assert_eq!(state.page(), 2);
    }
}
