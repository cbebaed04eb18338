//! Data types for the admin console
//!
//! Wire types mirror the backend payloads; display types are what the
//! views render. The backend is loose about encodings (ids arrive as numbers
//! or strings, flags as booleans or 0/1), so those fields go through lenient
//! deserializers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ServerFieldErrors;

/// Placeholder shown for values the API left empty
pub const NOT_AVAILABLE: &str = "N/A";

// ============================================================================
// Lenient scalars
// ============================================================================

/// Record identifier; the API sends either a number or a string
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Self(n.to_string()),
            Raw::Float(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

/// Interpret a JSON value as a flag (`true`, `1`, `"1"`, `"true"`, `"active"`)
pub fn flag_from_value(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "active"),
        _ => false,
    }
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(flag_from_value(&Value::deserialize(deserializer)?))
}

/// Explicit `null` reads the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One message or a list of messages
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Messages(pub Vec<String>);

impl<'de> Deserialize<'de> for Messages {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(String),
            Many(Vec<String>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::One(m) => Self(vec![m]),
            Raw::Many(m) => Self(m),
        })
    }
}

// ============================================================================
// Authentication Types
// ============================================================================

/// Profile of the signed-in operator as returned by the login endpoint
///
/// Unknown fields are kept so the stored copy round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl SessionUser {
    /// Name for the header: explicit name, then first/last, then email
    pub fn display_name(&self) -> Option<String> {
        let explicit = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        if let Some(name) = explicit {
            return Some(name.to_string());
        }

        let joined = join_name(self.first_name.as_deref(), self.last_name.as_deref());
        if !joined.is_empty() {
            return Some(joined);
        }

        self.email.clone().filter(|e| !e.is_empty())
    }

    /// Role label; the API sends either a string or an object with a title
    pub fn role_label(&self) -> Option<String> {
        match self.role.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Object(obj) => obj
                .get("title")
                .or_else(|| obj.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        }
    }
}

/// Company the operator belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: RecordId,
    #[serde(default)]
    pub company_name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub ip_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Everything persisted after a successful sign-in
#[derive(Debug, Clone, PartialEq)]
pub struct LoginSuccess {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<String>,
    pub user: SessionUser,
    pub companies: Vec<Company>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IpLookup {
    pub ip: String,
}

// ============================================================================
// API Envelopes
// ============================================================================

/// `{status, data?, message?, errors?}` wrapper used by the user endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub status: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: BTreeMap<String, Messages>,
}

impl<T> ApiEnvelope<T> {
    pub fn field_errors(&self) -> ServerFieldErrors {
        self.errors
            .iter()
            .map(|(field, messages)| (field.clone(), messages.0.clone()))
            .collect()
    }
}

/// Error body returned alongside non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: BTreeMap<String, Messages>,
}

// ============================================================================
// User Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }

    /// Numeric form used in requests
    pub fn as_flag(self) -> u8 {
        match self {
            Self::Active => 1,
            Self::Inactive => 0,
        }
    }
}

impl From<bool> for UserStatus {
    fn from(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

/// Status filter shown above the user table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [Self::All, Self::Active, Self::Inactive];

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    /// `status` query parameter; `None` means "do not send"
    pub fn query_value(&self) -> Option<u8> {
        match self {
            Self::All => None,
            Self::Active => Some(1),
            Self::Inactive => Some(0),
        }
    }

    pub fn matches(&self, status: UserStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => status == UserStatus::Active,
            Self::Inactive => status == UserStatus::Inactive,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRole {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawResponsibility {
    Id(RecordId),
    Object { id: RecordId },
}

impl RawResponsibility {
    pub fn into_id(self) -> RecordId {
        match self {
            Self::Id(id) | Self::Object { id } => id,
        }
    }
}

/// User as returned by `GET /user`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawUser {
    pub id: RecordId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub initials: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub role: Option<RawRole>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub status: bool,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub responsibilities: Vec<RawResponsibility>,
}

/// User as displayed in the management table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub initials: String,
    pub phone: String,
    pub role: String,
    pub role_id: Option<RecordId>,
    pub status: UserStatus,
    pub title: String,
    pub profile_image_url: Option<String>,
    pub responsibilities: Vec<RecordId>,
}

impl UserRecord {
    /// Text for the avatar bubble
    pub fn avatar_text(&self) -> &str {
        if self.initials.is_empty() {
            "US"
        } else {
            &self.initials
        }
    }
}

impl From<RawUser> for UserRecord {
    fn from(raw: RawUser) -> Self {
        let first = raw.first_name.as_deref().unwrap_or_default();
        let last = raw.last_name.as_deref().unwrap_or_default();

        let initials = non_empty(raw.initials).unwrap_or_else(|| {
            first.chars().take(1).chain(last.chars().take(1)).collect()
        });

        let (role, role_id) = match raw.role {
            Some(role) => (non_empty(role.title).unwrap_or_else(na), role.id),
            None => (na(), None),
        };

        Self {
            name: join_name(Some(first), Some(last)),
            email: raw.email.unwrap_or_default(),
            initials,
            phone: non_empty(raw.phone).unwrap_or_else(na),
            role,
            role_id,
            status: UserStatus::from(raw.status),
            title: non_empty(raw.title).unwrap_or_else(na),
            profile_image_url: non_empty(raw.profile_image_url),
            responsibilities: raw.responsibilities.into_iter().map(RawResponsibility::into_id).collect(),
            id: raw.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RecordId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawDesignation {
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Designation {
    pub id: RecordId,
    pub name: String,
}

impl From<RawDesignation> for Designation {
    fn from(raw: RawDesignation) -> Self {
        Self {
            id: raw.id,
            name: raw.title,
        }
    }
}

/// The role dropdown answers with a `title -> id` object
pub fn roles_from_mapping(data: &Value) -> Vec<Role> {
    let Some(map) = data.as_object() else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(title, id)| {
            let id = match id {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            Some(Role {
                id: RecordId(id),
                title: title.clone(),
            })
        })
        .collect()
}

fn join_name(first: Option<&str>, last: Option<&str>) -> String {
    format!("{} {}", first.unwrap_or_default(), last.unwrap_or_default())
        .trim()
        .to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn na() -> String {
    NOT_AVAILABLE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_accepts_numbers_and_strings() {
        let ids: Vec<RecordId> = serde_json::from_value(json!([21, "01kfashbm81jr195yza9wfhsna"])).unwrap();
        assert_eq!(ids[0].as_str(), "21");
        assert_eq!(ids[1].as_str(), "01kfashbm81jr195yza9wfhsna");
    }

    #[test]
    fn test_flag_values() {
        assert!(flag_from_value(&json!(true)));
        assert!(flag_from_value(&json!(1)));
        assert!(flag_from_value(&json!("1")));
        assert!(!flag_from_value(&json!(0)));
        assert!(!flag_from_value(&json!("0")));
        assert!(!flag_from_value(&Value::Null));
    }

    #[test]
    fn test_raw_user_mapping() {
        let raw: RawUser = serde_json::from_value(json!({
            "id": 22,
            "first_name": "Raghavan",
            "last_name": "Chandran",
            "email": "raghavan1@gmail.com",
            "phone": "9748555774",
            "role": {"id": 3, "title": "Normal User"},
            "status": 1,
            "title": null,
            "responsibilities": [4, {"id": "7"}]
        }))
        .unwrap();

        let record = UserRecord::from(raw);
        assert_eq!(record.name, "Raghavan Chandran");
        assert_eq!(record.initials, "RC");
        assert_eq!(record.role, "Normal User");
        assert_eq!(record.role_id, Some(RecordId::from(3)));
        assert_eq!(record.status, UserStatus::Active);
        assert_eq!(record.title, NOT_AVAILABLE);
        assert_eq!(record.responsibilities, vec![RecordId::from(4), RecordId::from("7")]);
    }

    #[test]
    fn test_raw_user_sentinels() {
        let raw: RawUser = serde_json::from_value(json!({
            "id": "9",
            "first_name": "Sales",
            "email": "sales2_2@gmail.com",
            "initials": "SR",
            "status": false
        }))
        .unwrap();

        let record = UserRecord::from(raw);
        assert_eq!(record.name, "Sales");
        assert_eq!(record.initials, "SR");
        assert_eq!(record.phone, NOT_AVAILABLE);
        assert_eq!(record.role, NOT_AVAILABLE);
        assert_eq!(record.role_id, None);
        assert_eq!(record.status, UserStatus::Inactive);
    }

    #[test]
    fn test_user_list_with_null_collections() {
        let env: ApiEnvelope<Vec<RawUser>> = serde_json::from_value(json!({
            "status": true,
            "errors": null,
            "data": [
                {
                    "id": 5,
                    "first_name": "Owner",
                    "last_name": "2",
                    "email": "owner2@gmail.com",
                    "role": null,
                    "status": 1,
                    "profile_image_url": null,
                    "responsibilities": null
                },
                {"id": 6, "first_name": "Appu", "email": "appu@gmail.com", "responsibilities": [{"id": 2}]}
            ]
        }))
        .unwrap();

        assert!(env.errors.is_empty());
        let records: Vec<UserRecord> = env.data.unwrap().into_iter().map(UserRecord::from).collect();
        assert_eq!(records.len(), 2);
        assert!(records[0].responsibilities.is_empty());
        assert_eq!(records[0].role, NOT_AVAILABLE);
        assert_eq!(records[1].responsibilities, vec![RecordId::from(2)]);
    }

    #[test]
    fn test_envelope_with_mixed_error_shapes() {
        let env: ApiEnvelope<Value> = serde_json::from_value(json!({
            "status": false,
            "message": "Validation failed",
            "errors": {"email": ["taken", "invalid"], "name": "required"}
        }))
        .unwrap();

        assert!(!env.status);
        let errors = env.field_errors();
        assert_eq!(errors["email"], vec!["taken", "invalid"]);
        assert_eq!(errors["name"], vec!["required"]);
    }

    #[test]
    fn test_roles_from_mapping_keeps_order() {
        let roles = roles_from_mapping(&json!({"Owner": 1, "Admin": "2", "Normal User": 3}));
        let titles: Vec<_> = roles.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Owner", "Admin", "Normal User"]);
        assert_eq!(roles[1].id, RecordId::from("2"));
    }

    #[test]
    fn test_session_user_display() {
        let user: SessionUser = serde_json::from_value(json!({
            "id": 1,
            "first_name": "Admin",
            "last_name": "Two",
            "role": {"title": "Owner"},
            "company_ids": [4]
        }))
        .unwrap();

        assert_eq!(user.display_name().as_deref(), Some("Admin Two"));
        assert_eq!(user.role_label().as_deref(), Some("Owner"));
        assert!(user.extra.contains_key("company_ids"));

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["company_ids"], json!([4]));
    }
}
