//! User repository
//!
//! The list page talks to this trait rather than to `ApiClient` directly so
//! the fetch/refetch policy can be exercised against an in-memory backend.

use async_trait::async_trait;

use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::types::{Designation, RecordId, Role, StatusFilter, UserRecord, UserStatus};
use crate::users::form::UserPayload;

// =============================================================================
// Repository Trait
// =============================================================================

/// Remote user operations; mutations return the server's message, if any
#[async_trait(?Send)]
pub trait UserRepository {
    async fn list(&self, filter: StatusFilter) -> ApiResult<Vec<UserRecord>>;

    async fn create(&self, payload: &UserPayload) -> ApiResult<Option<String>>;

    async fn update(&self, id: &RecordId, payload: &UserPayload) -> ApiResult<Option<String>>;

    async fn delete(&self, id: &RecordId) -> ApiResult<Option<String>>;

    async fn set_status(&self, id: &RecordId, status: UserStatus) -> ApiResult<Option<String>>;

    async fn roles(&self) -> ApiResult<Vec<Role>>;

    async fn designations(&self) -> ApiResult<Vec<Designation>>;
}

// =============================================================================
// HTTP Backend
// =============================================================================

/// Repository backed by the console API
#[derive(Clone)]
pub struct HttpUserRepository {
    client: ApiClient,
}

impl HttpUserRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl UserRepository for HttpUserRepository {
    async fn list(&self, filter: StatusFilter) -> ApiResult<Vec<UserRecord>> {
        self.client.list_users(filter).await
    }

    async fn create(&self, payload: &UserPayload) -> ApiResult<Option<String>> {
        self.client.create_user(payload).await
    }

    async fn update(&self, id: &RecordId, payload: &UserPayload) -> ApiResult<Option<String>> {
        self.client.update_user(id, payload).await
    }

    async fn delete(&self, id: &RecordId) -> ApiResult<Option<String>> {
        self.client.delete_user(id).await
    }

    async fn set_status(&self, id: &RecordId, status: UserStatus) -> ApiResult<Option<String>> {
        self.client.set_user_status(id, status).await
    }

    async fn roles(&self) -> ApiResult<Vec<Role>> {
        self.client.role_options().await
    }

    async fn designations(&self) -> ApiResult<Vec<Designation>> {
        self.client.designation_options().await
    }
}
