//! Common test utilities for integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;

use async_trait::async_trait;

use admin_console::error::{ApiError, ApiResult};
use admin_console::repository::UserRepository;
use admin_console::types::{Designation, RecordId, Role, StatusFilter, UserRecord, UserStatus};
use admin_console::users::UserPayload;

/// A repository call, as recorded by `MockRepository`
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(StatusFilter),
    Create(UserPayload),
    Update(RecordId, UserPayload),
    Delete(RecordId),
    SetStatus(RecordId, UserStatus),
    Roles,
    Designations,
}

/// In-memory repository with canned results
pub struct MockRepository {
    pub list_result: ApiResult<Vec<UserRecord>>,
    pub save_result: ApiResult<Option<String>>,
    pub status_result: ApiResult<Option<String>>,
    pub delete_result: ApiResult<Option<String>>,
    pub roles_result: ApiResult<Vec<Role>>,
    pub designations_result: ApiResult<Vec<Designation>>,
    calls: RefCell<Vec<Call>>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self {
            list_result: Ok(Vec::new()),
            save_result: Ok(None),
            status_result: Ok(None),
            delete_result: Ok(Some("User deleted".to_string())),
            roles_result: Ok(Vec::new()),
            designations_result: Ok(Vec::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            list_result: Ok(users),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

#[async_trait(?Send)]
impl UserRepository for MockRepository {
    async fn list(&self, filter: StatusFilter) -> ApiResult<Vec<UserRecord>> {
        self.record(Call::List(filter));
        self.list_result.clone()
    }

    async fn create(&self, payload: &UserPayload) -> ApiResult<Option<String>> {
        self.record(Call::Create(payload.clone()));
        self.save_result.clone()
    }

    async fn update(&self, id: &RecordId, payload: &UserPayload) -> ApiResult<Option<String>> {
        self.record(Call::Update(id.clone(), payload.clone()));
        self.save_result.clone()
    }

    async fn delete(&self, id: &RecordId) -> ApiResult<Option<String>> {
        self.record(Call::Delete(id.clone()));
        self.delete_result.clone()
    }

    async fn set_status(&self, id: &RecordId, status: UserStatus) -> ApiResult<Option<String>> {
        self.record(Call::SetStatus(id.clone(), status));
        self.status_result.clone()
    }

    async fn roles(&self) -> ApiResult<Vec<Role>> {
        self.record(Call::Roles);
        self.roles_result.clone()
    }

    async fn designations(&self) -> ApiResult<Vec<Designation>> {
        self.record(Call::Designations);
        self.designations_result.clone()
    }
}

/// Non-2xx response with an optional message
pub fn http_error(status: u16, message: Option<&str>) -> ApiError {
    ApiError::Http {
        status,
        message: message.map(str::to_string),
        field_errors: BTreeMap::new(),
    }
}

/// 422 response carrying field errors
pub fn validation_error(fields: &[(&str, &str)]) -> ApiError {
    let mut field_errors = BTreeMap::new();
    for (field, message) in fields {
        field_errors.insert(field.to_string(), vec![message.to_string()]);
    }
    ApiError::Http {
        status: 422,
        message: Some("The given data was invalid.".to_string()),
        field_errors,
    }
}

pub fn roles() -> Vec<Role> {
    vec![
        Role {
            id: RecordId::from(1),
            title: "Admin".to_string(),
        },
        Role {
            id: RecordId::from(3),
            title: "Normal User".to_string(),
        },
    ]
}
