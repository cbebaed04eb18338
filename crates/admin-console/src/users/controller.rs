//! User management operations
//!
//! `UserDirectory` turns repository results into list changes and the
//! notification text the page shows. Nothing here touches signals, so the
//! page decides when to apply a change.

use crate::error::{ApiError, ServerFieldErrors};
use crate::repository::UserRepository;
use crate::types::{Designation, RecordId, Role, StatusFilter, UserRecord};
use crate::users::fallback::demo_users;
use crate::users::form::{FormMode, UserPayload};
use crate::users::list::ListChange;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized - Please login again";
pub const NETWORK_MESSAGE: &str = "Network error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A message for the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// The API answered 401; the session should be dropped
    pub session_expired: bool,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            session_expired: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            session_expired: false,
        }
    }

    fn for_error(err: &ApiError, message: impl Into<String>) -> Self {
        Self {
            session_expired: err.is_unauthorized(),
            ..Self::error(message)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSource {
    Remote,
    /// The illustrative dataset
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub records: Vec<UserRecord>,
    pub source: ListSource,
}

/// A rejected save: what to tell the operator and what to show on the form
#[derive(Debug, Clone, PartialEq)]
pub struct SaveFailure {
    pub notice: Notice,
    pub field_errors: Option<ServerFieldErrors>,
}

/// Role and designation options, each loaded independently
#[derive(Debug, Clone, PartialEq)]
pub struct OptionLists {
    pub roles: Result<Vec<Role>, String>,
    pub designations: Result<Vec<Designation>, String>,
}

pub struct UserDirectory<R> {
    repo: R,
    demo_fallback: bool,
}

impl<R: UserRepository> UserDirectory<R> {
    pub fn new(repo: R, demo_fallback: bool) -> Self {
        Self { repo, demo_fallback }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Load the collection; a failed fetch may install the demo list
    pub async fn fetch(&self, filter: StatusFilter) -> Result<Loaded, Notice> {
        match self.repo.list(filter).await {
            Ok(records) => {
                tracing::debug!(count = records.len(), "Fetched users");
                Ok(Loaded {
                    records,
                    source: ListSource::Remote,
                })
            }
            Err(e) if e.is_unauthorized() => Err(Notice::for_error(&e, UNAUTHORIZED_MESSAGE)),
            Err(e) if self.demo_fallback => {
                tracing::warn!(error = %e, "User fetch failed, showing demo users");
                Ok(Loaded {
                    records: demo_users(),
                    source: ListSource::Fallback,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "User fetch failed");
                let message = e.server_message().unwrap_or("Failed to load users").to_string();
                Err(Notice::for_error(&e, message))
            }
        }
    }

    /// Flip a record's status; the change is only returned once the API agrees
    pub async fn toggle_status(&self, record: &UserRecord) -> Result<ListChange, Notice> {
        let status = record.status.toggled();
        match self.repo.set_status(&record.id, status).await {
            Ok(_) => Ok(ListChange::SetStatus {
                id: record.id.clone(),
                status,
            }),
            Err(e) => {
                tracing::warn!(id = %record.id, error = %e, "Status update failed");
                Err(Notice::for_error(&e, "Failed to update user status"))
            }
        }
    }

    pub async fn delete(&self, id: &RecordId) -> Result<(ListChange, Notice), Notice> {
        match self.repo.delete(id).await {
            Ok(_) => Ok((ListChange::Remove(id.clone()), Notice::success("User deleted successfully"))),
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Delete failed");
                Err(Notice::for_error(&e, "Failed to delete user"))
            }
        }
    }

    /// Create or update; on success the caller refetches the list
    pub async fn save(&self, payload: &UserPayload) -> Result<Notice, SaveFailure> {
        let (result, verb) = match &payload.mode {
            FormMode::Add => (self.repo.create(payload).await, "added"),
            FormMode::Edit(id) => (self.repo.update(id, payload).await, "updated"),
        };

        match result {
            Ok(_) => Ok(Notice::success(format!("User {} successfully!", verb))),
            Err(e) => {
                tracing::warn!(error = %e, "Saving user failed");
                Err(SaveFailure {
                    notice: Notice::for_error(&e, save_error_message(&e, &payload.mode)),
                    field_errors: e.field_errors().cloned(),
                })
            }
        }
    }

    /// Fetch roles and designations concurrently
    pub async fn load_options(&self) -> OptionLists {
        let (roles, designations) = futures::join!(self.repo.roles(), self.repo.designations());

        OptionLists {
            roles: roles.map_err(|e| option_error(&e, "Failed to load roles")),
            designations: designations.map_err(|e| option_error(&e, "Failed to load designations")),
        }
    }
}

/// Notification text for a failed create/update
pub fn save_error_message(err: &ApiError, mode: &FormMode) -> String {
    if let Some(errors) = err.field_errors() {
        let lines: Vec<String> = errors
            .iter()
            .filter_map(|(field, messages)| messages.first().map(|m| format!("{}: {}", field, m)))
            .collect();
        return format!("Validation errors:\n{}", lines.join("\n"));
    }

    if let Some(message) = err.server_message() {
        return format!("Error: {}", message);
    }

    if err.is_network() {
        return NETWORK_MESSAGE.to_string();
    }

    match mode {
        FormMode::Add => "Failed to add user".to_string(),
        FormMode::Edit(_) => "Failed to update user".to_string(),
    }
}

fn option_error(err: &ApiError, fallback: &str) -> String {
    tracing::warn!(error = %err, "Loading form options failed");
    if err.is_unauthorized() {
        UNAUTHORIZED_MESSAGE.to_string()
    } else {
        err.server_message().unwrap_or(fallback).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_save_error_validation_lines() {
        let mut errors = BTreeMap::new();
        errors.insert("email".to_string(), vec!["The email has already been taken.".to_string()]);
        errors.insert("phone".to_string(), vec!["Too short.".to_string(), "Digits only.".to_string()]);
        let err = ApiError::Http {
            status: 422,
            message: Some("The given data was invalid.".into()),
            field_errors: errors,
        };

        assert_eq!(
            save_error_message(&err, &FormMode::Add),
            "Validation errors:\nemail: The email has already been taken.\nphone: Too short."
        );
    }

    #[test]
    fn test_save_error_fallbacks() {
        let rejected = ApiError::Rejected {
            message: Some("Seat limit reached".into()),
            field_errors: BTreeMap::new(),
        };
        assert_eq!(save_error_message(&rejected, &FormMode::Add), "Error: Seat limit reached");

        let offline = ApiError::Network("Failed to fetch".into());
        assert_eq!(save_error_message(&offline, &FormMode::Add), NETWORK_MESSAGE);

        let bare = ApiError::Http {
            status: 500,
            message: None,
            field_errors: BTreeMap::new(),
        };
        assert_eq!(save_error_message(&bare, &FormMode::Edit(RecordId::from(3))), "Failed to update user");
    }

    #[test]
    fn test_option_error_text() {
        let unauthorized = ApiError::Http {
            status: 401,
            message: Some("Unauthenticated.".into()),
            field_errors: BTreeMap::new(),
        };
        assert_eq!(option_error(&unauthorized, "Failed to load roles"), UNAUTHORIZED_MESSAGE);
        assert_eq!(
            option_error(&ApiError::Decode("bad".into()), "Failed to load designations"),
            "Failed to load designations"
        );
    }
}
