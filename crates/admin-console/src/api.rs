//! HTTP API Client for the console backend
//!
//! Every call goes through `ApiClient`, which stamps the bearer token and the
//! selected company onto the request.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use web_sys::FormData;

use crate::auth::session::SessionStore;
use crate::config::ConsoleConfig;
use crate::error::{ApiError, ApiResult};
use crate::types::*;
use crate::users::form::UserPayload;

/// Authenticated client for the console API
#[derive(Clone)]
pub struct ApiClient {
    config: ConsoleConfig,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: ConsoleConfig, session: SessionStore) -> Self {
        Self { config, session }
    }

    /// Build a request with JSON accept, bearer token and company headers
    fn build_request(&self, method: &str, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        tracing::debug!(method, url = %url, "API request");

        let mut builder = match method {
            "POST" => Request::post(&url),
            "PUT" => Request::put(&url),
            "DELETE" => Request::delete(&url),
            _ => Request::get(&url),
        };

        builder = builder.header("Accept", "application/json");
        if let Some(token) = self.session.token() {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }
        if let Some(company_id) = self.session.company_id() {
            builder = builder.header("company_id", &company_id);
        }

        builder
    }

    async fn send_json<B: Serialize>(&self, builder: RequestBuilder, body: &B) -> ApiResult<Response> {
        let request = builder
            .json(body)
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(request.send().await?)
    }

    async fn send_form(&self, builder: RequestBuilder, form: FormData) -> ApiResult<Response> {
        let request = builder
            .body(form)
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(request.send().await?)
    }

    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let request = builder
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(request.send().await?)
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    pub async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let builder = Request::post(&self.config.endpoint("/login")).header("Accept", "application/json");
        let response = self.send_json(builder, request).await?;
        read_json(response).await
    }

    /// Caller's public IP, from the configured lookup service
    pub async fn client_ip(&self) -> ApiResult<String> {
        let response = self.send(Request::get(&self.config.ip_lookup_url)).await?;
        let lookup: IpLookup = read_json(response).await?;
        Ok(lookup.ip)
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn list_users(&self, filter: StatusFilter) -> ApiResult<Vec<UserRecord>> {
        let mut builder = self.build_request("GET", "/user");
        if let Some(status) = filter.query_value() {
            builder = builder.query([("status", status.to_string())]);
        }

        let response = self.send(builder).await?;
        let users: Option<Vec<RawUser>> = read_envelope(response).await?;
        Ok(users.unwrap_or_default().into_iter().map(UserRecord::from).collect())
    }

    pub async fn create_user(&self, payload: &UserPayload) -> ApiResult<Option<String>> {
        let form = build_form(payload)?;
        let response = self.send_form(self.build_request("POST", "/user"), form).await?;
        read_ack(response).await
    }

    /// Update through `POST /user/{id}` with `_method=put`
    pub async fn update_user(&self, id: &RecordId, payload: &UserPayload) -> ApiResult<Option<String>> {
        let form = build_form(payload)?;
        let path = format!("/user/{}", id);
        let response = self.send_form(self.build_request("POST", &path), form).await?;
        read_ack(response).await
    }

    pub async fn delete_user(&self, id: &RecordId) -> ApiResult<Option<String>> {
        let path = format!("/user/{}", id);
        let response = self.send(self.build_request("DELETE", &path)).await?;
        read_ack(response).await
    }

    pub async fn set_user_status(&self, id: &RecordId, status: UserStatus) -> ApiResult<Option<String>> {
        let path = format!("/user/{}/status", id);
        let response = self
            .send_json(self.build_request("POST", &path), &status_body(status))
            .await?;
        read_ack(response).await
    }

    // ========================================================================
    // Dropdowns
    // ========================================================================

    pub async fn role_options(&self) -> ApiResult<Vec<Role>> {
        let body = serde_json::json!({ "type": "0", "id": "" });
        let response = self.send_json(self.build_request("POST", "/role/dropdown"), &body).await?;
        let data: Option<Value> = read_envelope(response).await?;
        Ok(data.as_ref().map(roles_from_mapping).unwrap_or_default())
    }

    pub async fn designation_options(&self) -> ApiResult<Vec<Designation>> {
        let response = self.send(self.build_request("GET", "/user/dropdown-responsibility")).await?;
        let raw: Vec<RawDesignation> = read_json(response)
            .await
            .map_err(|e| match e {
                ApiError::Decode(_) => ApiError::Decode("Invalid designations response format".into()),
                other => other,
            })?;
        Ok(raw.into_iter().map(Designation::from).collect())
    }
}

/// JSON body for the status endpoint
pub fn status_body(status: UserStatus) -> Value {
    serde_json::json!({ "status": status.as_flag() })
}

fn build_form(payload: &UserPayload) -> ApiResult<FormData> {
    let js_err = |e: wasm_bindgen::JsValue| ApiError::Request(format!("{:?}", e));

    let form = FormData::new().map_err(js_err)?;
    for (name, value) in payload.text_fields() {
        form.append_with_str(&name, &value).map_err(js_err)?;
    }

    if let Some(image) = &payload.image {
        let blob = gloo_file::Blob::new_with_options(image.bytes.as_slice(), Some(image.mime_type.as_str()));
        form.append_with_blob_and_filename("user_picture", blob.as_ref(), &image.file_name)
            .map_err(js_err)?;
    }

    Ok(form)
}

/// Decode a 2xx body, or turn the error body into `ApiError::Http`
async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    if (200..300).contains(&status) {
        return response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()));
    }

    let text = response.text().await.unwrap_or_default();
    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
    tracing::warn!(status, message = ?body.message, "API call failed");

    Err(ApiError::Http {
        status,
        message: body.message,
        field_errors: body
            .errors
            .into_iter()
            .map(|(field, messages)| (field, messages.0))
            .collect(),
    })
}

/// Decode a `{status, data}` envelope; `status: false` becomes `Rejected`
async fn read_envelope<T: DeserializeOwned>(response: Response) -> ApiResult<Option<T>> {
    let envelope: ApiEnvelope<T> = read_json(response).await?;
    if !envelope.status {
        return Err(ApiError::Rejected {
            field_errors: envelope.field_errors(),
            message: envelope.message,
        });
    }
    Ok(envelope.data)
}

/// Envelope whose payload is not needed; returns the server message
async fn read_ack(response: Response) -> ApiResult<Option<String>> {
    let envelope: ApiEnvelope<Value> = read_json(response).await?;
    if !envelope.status {
        return Err(ApiError::Rejected {
            field_errors: envelope.field_errors(),
            message: envelope.message,
        });
    }
    Ok(envelope.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_body_is_numeric() {
        assert_eq!(status_body(UserStatus::Inactive), serde_json::json!({"status": 0}));
        assert_eq!(status_body(UserStatus::Active), serde_json::json!({"status": 1}));
    }
}
