//! Global State Management for the Admin Console
//!
//! Provides reactive state signals for the application.

use std::rc::Rc;
use std::time::Duration;

use leptos::*;

use crate::auth::session::{Access, SessionStore};
use crate::storage::KeyValueStore;
use crate::types::SessionUser;

// ============================================================================
// Layout
// ============================================================================

/// Sidebar visibility and viewport class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutState {
    pub sidebar_open: bool,
    pub is_mobile: bool,
    breakpoint_px: u32,
}

impl LayoutState {
    pub fn new(breakpoint_px: u32) -> Self {
        Self {
            sidebar_open: true,
            is_mobile: false,
            breakpoint_px,
        }
    }

    /// Re-classify the viewport; entering mobile width closes the sidebar
    pub fn on_resize(&mut self, width_px: f64) {
        self.is_mobile = width_px <= f64::from(self.breakpoint_px);
        if self.is_mobile {
            self.sidebar_open = false;
        }
    }

    pub fn toggle(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// Navigation and overlay clicks only close the sidebar on mobile
    pub fn close_on_mobile(&mut self) {
        if self.is_mobile {
            self.sidebar_open = false;
        }
    }

    /// Dimmed backdrop behind an open sidebar on mobile
    pub fn shows_overlay(&self) -> bool {
        self.is_mobile && self.sidebar_open
    }
}

// ============================================================================
// Toasts
// ============================================================================

/// Toast notification type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Success,
    Error,
    Info,
}

impl ToastType {
    pub fn class(&self) -> &'static str {
        match self {
            Self::Success => "toast-success",
            Self::Error => "toast-error",
            Self::Info => "toast-info",
        }
    }
}

/// Toast notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub toast_type: ToastType,
    pub title: String,
    pub message: String,
}

// ============================================================================
// App State
// ============================================================================

/// Global application state
#[derive(Clone)]
pub struct AppState {
    /// Persisted session
    pub session: SessionStore,
    /// Profile of the signed-in operator
    pub user: RwSignal<Option<SessionUser>>,
    /// Sidebar and viewport
    pub layout: RwSignal<LayoutState>,
    /// Active toast notifications
    pub toasts: RwSignal<Vec<Toast>>,
    toast_counter: RwSignal<u64>,
    toast_duration: Duration,
}

impl AppState {
    pub fn new(storage: Rc<dyn KeyValueStore>, mobile_breakpoint_px: u32, toast_duration_ms: u64) -> Self {
        let session = SessionStore::new(storage);
        let stored_user = session.user();

        Self {
            session,
            user: RwSignal::new(stored_user),
            layout: RwSignal::new(LayoutState::new(mobile_breakpoint_px)),
            toasts: RwSignal::new(Vec::new()),
            toast_counter: RwSignal::new(0),
            toast_duration: Duration::from_millis(toast_duration_ms),
        }
    }

    /// Run the guard check against the current time
    pub fn check_access(&self) -> Access {
        let access = self.session.check_access(chrono::Utc::now());
        match access {
            Access::Granted => {
                if self.user.get_untracked().is_none() {
                    self.user.set(self.session.user());
                }
            }
            Access::Expired => {
                tracing::info!("Session expired, signing out");
                self.user.set(None);
            }
            Access::Denied => {}
        }
        access
    }

    /// Publish the user of a login that has already been persisted
    pub fn set_auth(&self, user: SessionUser) {
        tracing::info!(user = ?user.display_name(), "Signed in");
        self.user.set(Some(user));
    }

    /// Forget the session (remembered email stays)
    pub fn sign_out(&self) {
        self.session.clear_all();
        self.user.set(None);
        tracing::info!("Signed out");
    }

    /// Header name, falling back to a generic label
    pub fn display_name(&self) -> String {
        self.user
            .get()
            .and_then(|u| u.display_name())
            .unwrap_or_else(|| "Admin User".to_string())
    }

    pub fn display_role(&self) -> String {
        self.user
            .get()
            .and_then(|u| u.role_label())
            .unwrap_or_else(|| "Administrator".to_string())
    }

    pub fn toggle_sidebar(&self) {
        self.layout.update(LayoutState::toggle);
    }

    pub fn close_sidebar_on_mobile(&self) {
        self.layout.update(LayoutState::close_on_mobile);
    }

    pub fn on_resize(&self, width_px: f64) {
        self.layout.update(|layout| layout.on_resize(width_px));
    }

    /// Show a toast notification
    pub fn show_toast(&self, toast_type: ToastType, title: impl Into<String>, message: impl Into<String>) {
        self.toast_counter.update(|c| *c += 1);
        let id = self.toast_counter.get_untracked();

        let toast = Toast {
            id,
            toast_type,
            title: title.into(),
            message: message.into(),
        };

        self.toasts.update(|toasts| toasts.push(toast));

        // Auto-remove toast after duration
        let toasts = self.toasts;
        set_timeout(
            move || {
                toasts.update(|t| t.retain(|toast| toast.id != id));
            },
            self.toast_duration,
        );
    }

    pub fn toast_success(&self, title: impl Into<String>, message: impl Into<String>) {
        self.show_toast(ToastType::Success, title, message);
    }

    pub fn toast_error(&self, title: impl Into<String>, message: impl Into<String>) {
        self.show_toast(ToastType::Error, title, message);
    }

    pub fn toast_info(&self, title: impl Into<String>, message: impl Into<String>) {
        self.show_toast(ToastType::Info, title, message);
    }

    /// Remove a specific toast
    pub fn remove_toast(&self, id: u64) {
        self.toasts.update(|t| t.retain(|toast| toast.id != id));
    }
}

/// Provide app state context
pub fn provide_app_state(state: AppState) -> AppState {
    provide_context(state.clone());
    state
}

/// Use app state from context
pub fn use_app_state() -> AppState {
    expect_context::<AppState>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_starts_open() {
        let layout = LayoutState::new(768);
        assert!(layout.sidebar_open);
        assert!(!layout.is_mobile);
        assert!(!layout.shows_overlay());
    }

    #[test]
    fn test_mobile_resize_closes_sidebar() {
        let mut layout = LayoutState::new(768);
        layout.on_resize(768.0);
        assert!(layout.is_mobile);
        assert!(!layout.sidebar_open);

        layout.toggle();
        assert!(layout.shows_overlay());

        layout.close_on_mobile();
        assert!(!layout.sidebar_open);
    }

    #[test]
    fn test_desktop_keeps_sidebar_on_navigation() {
        let mut layout = LayoutState::new(768);
        layout.on_resize(1280.0);
        layout.close_on_mobile();
        assert!(layout.sidebar_open);

        // Growing back to desktop does not reopen a closed sidebar
        layout.toggle();
        layout.on_resize(1440.0);
        assert!(!layout.sidebar_open);
        assert!(!layout.is_mobile);
    }
}
