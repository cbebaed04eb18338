//! Integration tests for login and the route guard over in-memory storage

use std::rc::Rc;

use chrono::{TimeZone, Utc};

use admin_console::auth::{complete_login, keys, Access, LoginForm, SessionStore};
use admin_console::storage::{KeyValueStore, MemoryStorage};
use admin_console::types::{Company, LoginResponse, RecordId, SessionUser};

fn session() -> (Rc<MemoryStorage>, SessionStore) {
    let storage = Rc::new(MemoryStorage::new());
    (storage.clone(), SessionStore::new(storage))
}

fn form() -> LoginForm {
    LoginForm {
        email: "owner2@gmail.com".to_string(),
        password: "password".to_string(),
        ip_address: String::new(),
        remember_me: true,
    }
}

fn response(expires_at: &str) -> LoginResponse {
    LoginResponse {
        access_token: Some("token-1".to_string()),
        refresh_token: None,
        expires_at: Some(expires_at.to_string()),
        user: Some(SessionUser {
            first_name: Some("Owner".to_string()),
            last_name: Some("2".to_string()),
            ..Default::default()
        }),
        companies: vec![Company {
            id: RecordId::from(12),
            company_name: "Northwind".to_string(),
            extra: Default::default(),
        }],
        message: None,
    }
}

#[test]
fn test_locked_account_shows_message_and_stores_nothing() {
    let (storage, session) = session();
    let locked = LoginResponse {
        message: Some("locked".to_string()),
        ..Default::default()
    };

    let outcome = complete_login(&session, &form(), Ok(locked));

    assert_eq!(outcome.unwrap_err(), "locked");
    assert!(storage.is_empty());
    assert_eq!(session.check_access(Utc::now()), Access::Denied);
}

#[test]
fn test_login_then_guard_until_expiry() {
    let (storage, session) = session();
    complete_login(&session, &form(), Ok(response("2030-01-01 00:00:00"))).unwrap();

    let before = Utc.with_ymd_and_hms(2029, 12, 31, 23, 0, 0).unwrap();
    assert_eq!(session.check_access(before), Access::Granted);
    assert_eq!(session.company_id().as_deref(), Some("12"));

    let after = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 1).unwrap();
    assert_eq!(session.check_access(after), Access::Expired);

    // Only the auth keys go
    for key in keys::AUTH {
        assert!(!storage.contains(key), "{} should be cleared", key);
    }
    assert_eq!(storage.get(keys::COMPANY_ID).as_deref(), Some("12"));
    assert_eq!(storage.get(keys::SAVED_EMAIL).as_deref(), Some("owner2@gmail.com"));
    assert_eq!(session.check_access(after), Access::Denied);
}

#[test]
fn test_logout_keeps_remembered_email() {
    let (storage, session) = session();
    complete_login(&session, &form(), Ok(response("2030-01-01T00:00:00Z"))).unwrap();

    session.clear_all();

    assert!(!session.is_signed_in());
    for key in keys::COMPANY {
        assert!(!storage.contains(key));
    }
    assert_eq!(session.remembered_email().as_deref(), Some("owner2@gmail.com"));
}
