//! User form state machine
//!
//! `UserForm` holds everything the add/edit modal shows: the draft values,
//! the picked image, and one error map fed by both client validation and the
//! server's 422 response.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::ServerFieldErrors;
use crate::types::{RecordId, Role, UserRecord, NOT_AVAILABLE};
use crate::validation::{is_valid_email, is_valid_phone, validate_image};

pub const MAX_INITIALS: usize = 5;

// ============================================================================
// Fields and errors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Title,
    Initials,
    Role,
    Responsibilities,
    ProfileImage,
}

impl Field {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Title => "title",
            Self::Initials => "initials",
            Self::Role => "role",
            Self::Responsibilities => "responsibilities",
            Self::ProfileImage => "profile_image",
        }
    }

    /// Map a server error key onto a form field
    pub fn from_key(key: &str) -> Option<Self> {
        let field = match key {
            "name" => Self::Name,
            "email" => Self::Email,
            "phone" => Self::Phone,
            "title" => Self::Title,
            "initials" => Self::Initials,
            "role" => Self::Role,
            "profile_image" | "user_picture" => Self::ProfileImage,
            k if k.starts_with("responsibilities") => Self::Responsibilities,
            _ => return None,
        };
        Some(field)
    }
}

/// Where a field message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueOrigin {
    Client,
    Server,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub origin: IssueOrigin,
    pub message: String,
}

/// Per-field messages plus server messages for keys the form does not show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    fields: BTreeMap<Field, FieldIssue>,
    other: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_client(&mut self, field: Field, message: impl Into<String>) {
        self.fields.insert(
            field,
            FieldIssue {
                origin: IssueOrigin::Client,
                message: message.into(),
            },
        );
    }

    /// Fold in `{field: [messages]}` from the API, first message per field
    pub fn merge_server(&mut self, errors: &ServerFieldErrors) {
        for (key, messages) in errors {
            let Some(first) = messages.first() else {
                continue;
            };
            match Field::from_key(key) {
                Some(field) => {
                    self.fields.insert(
                        field,
                        FieldIssue {
                            origin: IssueOrigin::Server,
                            message: first.clone(),
                        },
                    );
                }
                None => self.other.push(format!("{}: {}", key, first)),
            }
        }
    }

    pub fn get(&self, field: Field) -> Option<&FieldIssue> {
        self.fields.get(&field)
    }

    pub fn message(&self, field: Field) -> Option<&str> {
        self.get(field).map(|issue| issue.message.as_str())
    }

    pub fn clear(&mut self, field: Field) {
        self.fields.remove(&field);
    }

    pub fn other(&self) -> &[String] {
        &self.other
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.other.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len() + self.other.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldIssue)> {
        self.fields.iter().map(|(field, issue)| (*field, issue))
    }
}

// ============================================================================
// Draft and image
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub title: String,
    pub initials: String,
    /// Selected role id
    pub role: String,
    pub responsibilities: Vec<RecordId>,
}

impl UserDraft {
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Title => &self.title,
            Field::Initials => &self.initials,
            Field::Role => &self.role,
            Field::Responsibilities | Field::ProfileImage => "",
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Name => Some(&mut self.name),
            Field::Email => Some(&mut self.email),
            Field::Phone => Some(&mut self.phone),
            Field::Title => Some(&mut self.title),
            Field::Initials => Some(&mut self.initials),
            Field::Role => Some(&mut self.role),
            Field::Responsibilities | Field::ProfileImage => None,
        }
    }

    pub fn has_designation(&self, id: &RecordId) -> bool {
        self.responsibilities.contains(id)
    }
}

/// An image read from the file picker, not yet uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl PendingImage {
    /// `data:` URL for the local preview
    pub fn preview_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageChoice {
    /// Keep whatever the server has
    #[default]
    Unchanged,
    Selected(PendingImage),
    Removed,
}

// ============================================================================
// Form
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(RecordId),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Closed,
    Open,
    Validating,
    Submitting,
}

/// Validated values ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPayload {
    pub mode: FormMode,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub title: String,
    pub initials: String,
    pub role: String,
    pub responsibilities: Vec<RecordId>,
    /// Only set when a new image was picked
    pub image: Option<PendingImage>,
}

impl UserPayload {
    /// Multipart text fields, in submission order
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("phone", self.phone.clone()),
            ("title", self.title.clone()),
            ("initials", self.initials.clone()),
            ("role", self.role.clone()),
        ];

        match self.mode {
            FormMode::Add => fields.push(("overwite_data", "1".to_string())),
            FormMode::Edit(_) => fields.push(("_method", "put".to_string())),
        }

        if self.responsibilities.is_empty() {
            fields.push(("responsibilities", String::new()));
        } else {
            fields.extend(
                self.responsibilities
                    .iter()
                    .map(|id| ("responsibilities[]", id.to_string())),
            );
        }

        fields
    }
}

/// State behind the add/edit user modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserForm {
    phase: FormPhase,
    mode: FormMode,
    draft: UserDraft,
    image: ImageChoice,
    existing_image_url: Option<String>,
    errors: FieldErrors,
    role_hint: Option<String>,
    max_image_bytes: u64,
}

impl UserForm {
    pub fn new(max_image_bytes: u64) -> Self {
        Self {
            phase: FormPhase::Closed,
            mode: FormMode::Add,
            draft: UserDraft::default(),
            image: ImageChoice::Unchanged,
            existing_image_url: None,
            errors: FieldErrors::new(),
            role_hint: None,
            max_image_bytes,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn draft(&self) -> &UserDraft {
        &self.draft
    }

    pub fn image(&self) -> &ImageChoice {
        &self.image
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_open(&self) -> bool {
        self.phase != FormPhase::Closed
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Add => "Add new user",
            FormMode::Edit(_) => "Edit user",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Add => "Add new user",
            FormMode::Edit(_) => "Update user",
        }
    }

    pub fn upload_label(&self) -> &'static str {
        match self.mode {
            FormMode::Add => "Upload Photo",
            FormMode::Edit(_) => "Change Photo",
        }
    }

    fn reset(&mut self) {
        self.draft = UserDraft::default();
        self.image = ImageChoice::Unchanged;
        self.existing_image_url = None;
        self.errors = FieldErrors::new();
        self.role_hint = None;
    }

    pub fn open_add(&mut self) {
        self.reset();
        self.mode = FormMode::Add;
        self.phase = FormPhase::Open;
    }

    /// Pre-fill from a listed record; `N/A` placeholders become empty
    pub fn open_edit(&mut self, record: &UserRecord) {
        self.reset();

        let unplaceholder = |value: &str| {
            if value == NOT_AVAILABLE {
                String::new()
            } else {
                value.to_string()
            }
        };

        self.draft = UserDraft {
            name: record.name.clone(),
            email: record.email.clone(),
            phone: unplaceholder(&record.phone),
            title: unplaceholder(&record.title),
            initials: unplaceholder(&record.initials),
            role: record.role_id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            responsibilities: record.responsibilities.clone(),
        };

        if record.role_id.is_none() && record.role != NOT_AVAILABLE {
            self.role_hint = Some(record.role.clone());
        }

        self.existing_image_url = record
            .profile_image_url
            .clone()
            .filter(|url| url.contains("storage/"));

        self.mode = FormMode::Edit(record.id.clone());
        self.phase = FormPhase::Open;
    }

    /// Resolve a role known only by title once the options arrive
    pub fn adopt_role_title(&mut self, roles: &[Role]) {
        if !self.draft.role.is_empty() {
            return;
        }
        let Some(hint) = self.role_hint.as_deref() else {
            return;
        };
        if let Some(role) = roles.iter().find(|r| r.title.eq_ignore_ascii_case(hint)) {
            self.draft.role = role.id.to_string();
            self.role_hint = None;
        }
    }

    /// Edit a text field; its error clears
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        if let Some(slot) = self.draft.text_mut(field) {
            *slot = value.into();
            self.errors.clear(field);
        }
    }

    pub fn toggle_designation(&mut self, id: &RecordId) {
        let list = &mut self.draft.responsibilities;
        if let Some(pos) = list.iter().position(|r| r == id) {
            list.remove(pos);
        } else {
            list.push(id.clone());
        }
    }

    /// Check a picked file before reading it; a rejection leaves the current image alone
    pub fn accept_image_meta(&mut self, mime_type: &str, size: u64) -> bool {
        match validate_image(mime_type, size, self.max_image_bytes) {
            Ok(()) => true,
            Err(message) => {
                self.errors.insert_client(Field::ProfileImage, message);
                false
            }
        }
    }

    /// Take a file that has been read into memory
    pub fn select_image(&mut self, image: PendingImage) -> bool {
        if !self.accept_image_meta(&image.mime_type, image.size()) {
            return false;
        }
        self.image = ImageChoice::Selected(image);
        self.errors.clear(Field::ProfileImage);
        true
    }

    pub fn remove_image(&mut self) {
        self.image = ImageChoice::Removed;
        self.existing_image_url = None;
        self.errors.clear(Field::ProfileImage);
    }

    /// What the avatar slot should show
    pub fn preview_url(&self) -> Option<String> {
        match &self.image {
            ImageChoice::Selected(image) => Some(image.preview_url()),
            ImageChoice::Removed => None,
            ImageChoice::Unchanged => self.existing_image_url.clone(),
        }
    }

    /// Client-side rules against the currently loaded role options
    pub fn validate(&self, roles: &[Role]) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let draft = &self.draft;

        let name = draft.name.trim();
        if name.is_empty() {
            errors.insert_client(Field::Name, "Name is required");
        } else if name.chars().count() < 2 {
            errors.insert_client(Field::Name, "Name must be at least 2 characters");
        }

        let email = draft.email.trim();
        if email.is_empty() {
            errors.insert_client(Field::Email, "Email is required");
        } else if !is_valid_email(email) {
            errors.insert_client(Field::Email, "Please enter a valid email address");
        }

        if !draft.phone.is_empty() && !is_valid_phone(&draft.phone) {
            errors.insert_client(Field::Phone, "Please enter a valid phone number");
        }

        if draft.initials.chars().count() > MAX_INITIALS {
            errors.insert_client(Field::Initials, "Initials cannot exceed 5 characters");
        }

        if draft.role.is_empty() {
            errors.insert_client(Field::Role, "Role is required");
        } else if !roles.iter().any(|r| r.id.as_str() == draft.role) {
            errors.insert_client(Field::Role, "Please select a valid role");
        }

        errors
    }

    /// Validate and, if clean, move to `Submitting` and hand back the payload
    pub fn begin_submit(&mut self, roles: &[Role]) -> Option<UserPayload> {
        if self.phase != FormPhase::Open {
            return None;
        }

        self.phase = FormPhase::Validating;
        self.errors = self.validate(roles);
        if !self.errors.is_empty() {
            self.phase = FormPhase::Open;
            return None;
        }

        self.phase = FormPhase::Submitting;
        let draft = &self.draft;
        Some(UserPayload {
            mode: self.mode.clone(),
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            title: draft.title.trim().to_string(),
            initials: draft.initials.trim().to_string(),
            role: draft.role.clone(),
            responsibilities: draft.responsibilities.clone(),
            image: match &self.image {
                ImageChoice::Selected(image) => Some(image.clone()),
                _ => None,
            },
        })
    }

    /// Close on success; reopen with any server field errors otherwise
    pub fn finish_submit(&mut self, outcome: Result<(), Option<ServerFieldErrors>>) {
        match outcome {
            Ok(()) => self.close(),
            Err(server_errors) => {
                self.phase = FormPhase::Open;
                if let Some(errors) = server_errors {
                    self.errors.merge_server(&errors);
                }
            }
        }
    }

    pub fn close(&mut self) {
        self.reset();
        self.phase = FormPhase::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserStatus;

    fn roles() -> Vec<Role> {
        vec![
            Role { id: RecordId::from(1), title: "Owner".into() },
            Role { id: RecordId::from(3), title: "Normal User".into() },
        ]
    }

    fn filled(form: &mut UserForm) {
        form.set_field(Field::Name, "Appu s");
        form.set_field(Field::Email, "appu@gmail.com");
        form.set_field(Field::Role, "3");
    }

    fn png(size: usize) -> PendingImage {
        PendingImage {
            file_name: "me.png".into(),
            mime_type: "image/png".into(),
            bytes: vec![0; size],
        }
    }

    fn record() -> UserRecord {
        UserRecord {
            id: RecordId::from(21),
            name: "Appu s".into(),
            email: "appu@gmail.com".into(),
            initials: "RC".into(),
            phone: NOT_AVAILABLE.into(),
            role: "Normal User".into(),
            role_id: None,
            status: UserStatus::Active,
            title: NOT_AVAILABLE.into(),
            profile_image_url: Some("http://host/storage/users/21.png".into()),
            responsibilities: vec![RecordId::from(4)],
        }
    }

    #[test]
    fn test_empty_form_errors() {
        let mut form = UserForm::new(5 * 1024 * 1024);
        form.open_add();
        let errors = form.validate(&roles());
        assert_eq!(errors.message(Field::Name), Some("Name is required"));
        assert_eq!(errors.message(Field::Email), Some("Email is required"));
        assert_eq!(errors.message(Field::Role), Some("Role is required"));
        assert!(errors.get(Field::Phone).is_none());
    }

    #[test]
    fn test_field_rules() {
        let mut form = UserForm::new(5 * 1024 * 1024);
        form.open_add();
        form.set_field(Field::Name, "A");
        form.set_field(Field::Email, "bad@");
        form.set_field(Field::Phone, "call me");
        form.set_field(Field::Initials, "ABCDEF");
        form.set_field(Field::Role, "99");

        let errors = form.validate(&roles());
        assert_eq!(errors.message(Field::Name), Some("Name must be at least 2 characters"));
        assert_eq!(errors.message(Field::Email), Some("Please enter a valid email address"));
        assert_eq!(errors.message(Field::Phone), Some("Please enter a valid phone number"));
        assert_eq!(errors.message(Field::Initials), Some("Initials cannot exceed 5 characters"));
        assert_eq!(errors.message(Field::Role), Some("Please select a valid role"));
        assert!(errors.iter().all(|(_, issue)| issue.origin == IssueOrigin::Client));
    }

    #[test]
    fn test_editing_clears_field_error() {
        let mut form = UserForm::new(5 * 1024 * 1024);
        form.open_add();
        assert!(form.begin_submit(&roles()).is_none());
        assert_eq!(form.phase(), FormPhase::Open);
        assert!(form.errors().get(Field::Name).is_some());

        form.set_field(Field::Name, "Test User");
        assert!(form.errors().get(Field::Name).is_none());
        assert!(form.errors().get(Field::Email).is_some());
    }

    #[test]
    fn test_submit_payload_add() {
        let mut form = UserForm::new(5 * 1024 * 1024);
        form.open_add();
        filled(&mut form);
        form.set_field(Field::Title, "  CS Engineer ");
        form.toggle_designation(&RecordId::from(4));
        form.toggle_designation(&RecordId::from(7));
        form.toggle_designation(&RecordId::from(4));

        let payload = form.begin_submit(&roles()).unwrap();
        assert!(form.is_submitting());
        assert_eq!(payload.title, "CS Engineer");
        assert_eq!(payload.image, None);

        let fields = payload.text_fields();
        assert!(fields.contains(&("overwite_data", "1".to_string())));
        assert!(fields.contains(&("responsibilities[]", "7".to_string())));
        assert!(!fields.iter().any(|(k, _)| *k == "_method"));
        assert!(!fields.iter().any(|(k, _)| *k == "responsibilities"));
    }

    #[test]
    fn test_edit_prefill_and_payload() {
        let mut form = UserForm::new(5 * 1024 * 1024);
        form.open_edit(&record());

        assert_eq!(form.title(), "Edit user");
        assert_eq!(form.submit_label(), "Update user");
        assert_eq!(form.draft().phone, "");
        assert_eq!(form.draft().title, "");
        assert_eq!(form.draft().role, "");
        assert_eq!(form.preview_url().as_deref(), Some("http://host/storage/users/21.png"));

        form.adopt_role_title(&roles());
        assert_eq!(form.draft().role, "3");

        form.toggle_designation(&RecordId::from(4));
        let payload = form.begin_submit(&roles()).unwrap();
        assert_eq!(payload.mode, FormMode::Edit(RecordId::from(21)));

        let fields = payload.text_fields();
        assert!(fields.contains(&("_method", "put".to_string())));
        assert!(fields.contains(&("responsibilities", String::new())));
    }

    #[test]
    fn test_preview_requires_storage_path() {
        let mut rec = record();
        rec.profile_image_url = Some("https://gravatar.example/avatar.png".into());
        let mut form = UserForm::new(5 * 1024 * 1024);
        form.open_edit(&rec);
        assert_eq!(form.preview_url(), None);
    }

    #[test]
    fn test_image_rejections_keep_previous() {
        let mut form = UserForm::new(5 * 1024 * 1024);
        form.open_add();
        assert!(form.select_image(png(16)));

        assert!(!form.select_image(png(6 * 1024 * 1024)));
        assert_eq!(form.errors().message(Field::ProfileImage), Some("File size must be less than 5MB"));
        assert_eq!(form.image(), &ImageChoice::Selected(png(16)));

        let pdf = PendingImage {
            mime_type: "application/pdf".into(),
            ..png(16)
        };
        assert!(!form.select_image(pdf));
        assert_eq!(form.errors().message(Field::ProfileImage), Some("Only JPG, PNG and GIF files are allowed"));

        assert!(form.select_image(png(8)));
        assert!(form.errors().get(Field::ProfileImage).is_none());
        assert_eq!(form.preview_url().as_deref(), Some("data:image/png;base64,AAAAAAAAAAA="));
    }

    #[test]
    fn test_remove_image() {
        let mut form = UserForm::new(5 * 1024 * 1024);
        form.open_edit(&record());
        form.remove_image();
        assert_eq!(form.preview_url(), None);
        assert_eq!(form.image(), &ImageChoice::Removed);
    }

    #[test]
    fn test_server_errors_keep_modal_open() {
        let mut form = UserForm::new(5 * 1024 * 1024);
        form.open_add();
        filled(&mut form);
        assert!(form.begin_submit(&roles()).is_some());

        let mut server = ServerFieldErrors::new();
        server.insert("email".into(), vec!["The email has already been taken.".into(), "second".into()]);
        server.insert("user_picture".into(), vec!["The user picture failed to upload.".into()]);
        server.insert("company".into(), vec!["Company missing.".into()]);
        form.finish_submit(Err(Some(server)));

        assert_eq!(form.phase(), FormPhase::Open);
        let issue = form.errors().get(Field::Email).unwrap();
        assert_eq!(issue.origin, IssueOrigin::Server);
        assert_eq!(issue.message, "The email has already been taken.");
        assert_eq!(form.errors().message(Field::ProfileImage), Some("The user picture failed to upload."));
        assert_eq!(form.errors().other(), ["company: Company missing.".to_string()]);
        assert_eq!(form.draft().email, "appu@gmail.com");
    }

    #[test]
    fn test_success_resets_and_closes() {
        let mut form = UserForm::new(5 * 1024 * 1024);
        form.open_add();
        filled(&mut form);
        form.begin_submit(&roles()).unwrap();
        form.finish_submit(Ok(()));

        assert_eq!(form.phase(), FormPhase::Closed);
        assert_eq!(form.draft(), &UserDraft::default());
    }

    #[test]
    fn test_begin_submit_requires_open() {
        let mut form = UserForm::new(5 * 1024 * 1024);
        assert!(form.begin_submit(&roles()).is_none());
        assert_eq!(form.phase(), FormPhase::Closed);
    }
}
