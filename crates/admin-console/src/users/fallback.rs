//! Illustrative user list installed when the fetch fails and
//! `demo_fallback` is enabled

use crate::types::{RecordId, UserRecord, UserStatus, NOT_AVAILABLE};

#[allow(clippy::too_many_arguments)]
fn user(
    id: i64,
    name: &str,
    email: &str,
    initials: &str,
    phone: &str,
    role: &str,
    status: UserStatus,
    title: &str,
) -> UserRecord {
    UserRecord {
        id: RecordId::from(id),
        name: name.to_string(),
        email: email.to_string(),
        initials: initials.to_string(),
        phone: phone.to_string(),
        role: role.to_string(),
        role_id: None,
        status,
        title: title.to_string(),
        profile_image_url: None,
        responsibilities: Vec::new(),
    }
}

pub fn demo_users() -> Vec<UserRecord> {
    use UserStatus::{Active, Inactive};
    const NA: &str = NOT_AVAILABLE;

    vec![
        user(1, "Admin 2", "admin2@gmail.com", "A2", NA, "Admin", Active, NA),
        user(21, "Appu s", "appu@gmail.com", "RC", "9748555774", "Normal User", Active, "CS Engineer"),
        user(6, "Owner 2", "owner2@gmail.com", "O2", NA, "Owner", Active, NA),
        user(22, "Raghavan 5", "raghavan1@gmail.com", "RC", "9748555774", "Normal User", Active, "Mechanical Engineer"),
        user(8, "Sales Rep 2_1", "sales2_1@gmail.com", "SR", NA, "Normal User", Active, NA),
        user(9, "Sales Rep 2_2", "sales2_2@gmail.com", "SR", NA, "Normal User", Active, NA),
        user(3, "Test User", "test@example.com", "TU", "1234567890", "User", Inactive, "Tester"),
    ]
}
